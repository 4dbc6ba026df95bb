//! Wire tokens: the string or number a single enum value occupies.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CodecError;
use crate::numeric::WireNumber;

const EXPECTED: &str = "string or number";

/// A string or number token. Any other JSON kind is unsupported.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireToken {
    String(String),
    Number(WireNumber),
}

impl WireToken {
    /// Token kind as used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for WireToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => write!(f, "{:?}", text),
            Self::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<String> for WireToken {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<&str> for WireToken {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<WireNumber> for WireToken {
    fn from(number: WireNumber) -> Self {
        Self::Number(number)
    }
}

impl Serialize for WireToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(text) => serializer.serialize_str(text),
            Self::Number(number) => number.serialize(serializer),
        }
    }
}

fn unsupported<E: de::Error>(found: &'static str) -> E {
    E::custom(CodecError::UnsupportedToken {
        expected: EXPECTED,
        found,
    })
}

struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = WireToken;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(EXPECTED)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WireToken, E> {
        Ok(WireToken::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<WireToken, E> {
        Ok(WireToken::String(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireToken, E> {
        Ok(WireToken::Number(WireNumber::Signed(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireToken, E> {
        Ok(WireToken::Number(WireNumber::Unsigned(v)))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<WireToken, E> {
        Err(unsupported("boolean"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<WireToken, E> {
        Err(unsupported("float"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<WireToken, E> {
        Err(unsupported("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<WireToken, E> {
        Err(unsupported("null"))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, _: A) -> Result<WireToken, A::Error> {
        Err(unsupported("array"))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, _: A) -> Result<WireToken, A::Error> {
        Err(unsupported("object"))
    }
}

impl<'de> Deserialize<'de> for WireToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

impl TryFrom<&serde_json::Value> for WireToken {
    type Error = CodecError;

    fn try_from(value: &serde_json::Value) -> Result<Self, CodecError> {
        use serde_json::Value;

        let found = match value {
            Value::String(text) => return Ok(Self::String(text.clone())),
            Value::Number(number) => {
                if let Some(v) = number.as_u64() {
                    return Ok(Self::Number(WireNumber::Unsigned(v)));
                }
                if let Some(v) = number.as_i64() {
                    return Ok(Self::Number(WireNumber::Signed(v)));
                }
                "float"
            }
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(CodecError::UnsupportedToken {
            expected: EXPECTED,
            found,
        })
    }
}

impl From<WireToken> for serde_json::Value {
    fn from(token: WireToken) -> Self {
        match token {
            WireToken::String(text) => Self::String(text),
            WireToken::Number(WireNumber::Signed(v)) => Self::from(v),
            WireToken::Number(WireNumber::Unsigned(v)) => Self::from(v),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_strings_and_numbers() {
        let token: WireToken = serde_json::from_str(r#""Read, Write""#).unwrap();
        assert_eq!(token, WireToken::from("Read, Write"));

        let token: WireToken = serde_json::from_str("-5").unwrap();
        assert_eq!(token, WireToken::Number(WireNumber::Signed(-5)));

        let token: WireToken = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(token, WireToken::Number(WireNumber::Unsigned(u64::MAX)));
    }

    #[test]
    fn other_kinds_are_unsupported() {
        for input in ["true", "1.5", "null", "[1]", r#"{"a":1}"#] {
            let err = serde_json::from_str::<WireToken>(input).unwrap_err();
            assert!(err.to_string().contains("unsupported token"), "{}: {}", input, err);
        }
    }

    #[test]
    fn writes_plain_json() {
        assert_eq!(serde_json::to_string(&WireToken::from("a")).unwrap(), r#""a""#);
        assert_eq!(
            serde_json::to_string(&WireToken::Number(WireNumber::Signed(-1))).unwrap(),
            "-1"
        );
    }

    #[test]
    fn converts_from_json_value() {
        assert_eq!(
            WireToken::try_from(&json!(7)).unwrap(),
            WireToken::Number(WireNumber::Unsigned(7))
        );
        assert_eq!(
            WireToken::try_from(&json!(false)),
            Err(CodecError::UnsupportedToken {
                expected: EXPECTED,
                found: "boolean"
            })
        );
        assert_eq!(serde_json::Value::from(WireToken::from("x")), json!("x"));
    }
}
