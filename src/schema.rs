//! Capability query output for schema generators.

use serde::Serialize;

use crate::strategy::Strategy;
use crate::wire::WireToken;

/// One declared value and its wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaMember {
    pub value: WireToken,
    pub identifier: &'static str,
}

/// Wire forms of every declared value of a type, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumSchema {
    pub type_name: &'static str,
    pub is_flags: bool,
    pub strategy: Strategy,
    pub members: Vec<SchemaMember>,
}

impl EnumSchema {
    /// Enumerated wire values, as listed in an OpenAPI `enum`.
    pub fn values(&self) -> impl Iterator<Item = &WireToken> + '_ {
        self.members.iter().map(|m| &m.value)
    }

    /// HTML list pairing each string wire value with its identifier.
    ///
    /// Empty when no member is written as a non-blank string.
    pub fn member_docs(&self) -> String {
        let mut items = String::new();
        for member in &self.members {
            let Some(text) = member.value.as_str() else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            items.push_str(&format!("<li><i>{}</i> - {}</li>", text, member.identifier.trim()));
        }

        if items.is_empty() {
            return items;
        }
        format!("\n<p>Members:</p>\n<ul>{}</ul>\n", items)
    }
}

// =============================================================================
// Tests
// =============================================================================
