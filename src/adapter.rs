//! serde integration through the process-wide registry.
//!
//! Either wrap a field in [`Wire`], or keep the plain type and point serde at
//! this module:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Request {
//!     #[serde(with = "enum_wire::adapter")]
//!     color: Color,
//!     flags: Wire<Permissions>,
//! }
//! ```

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

use crate::registry::registry;
use crate::traits::WireEnum;
use crate::wire::WireToken;

/// Serialize `value` with its codec from the process-wide registry.
pub fn serialize<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: WireEnum,
    S: Serializer,
{
    registry()
        .encode(value)
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

/// Deserialize a value with its codec from the process-wide registry.
pub fn deserialize<'de, E, D>(deserializer: D) -> Result<E, D::Error>
where
    E: WireEnum,
    D: Deserializer<'de>,
{
    let token = WireToken::deserialize(deserializer)?;
    registry().decode(&token).map_err(de::Error::custom)
}

/// Newtype that serializes its enum through the codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wire<E>(pub E);

impl<E> Wire<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> From<E> for Wire<E> {
    fn from(value: E) -> Self {
        Self(value)
    }
}

impl<E> Deref for Wire<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.0
    }
}

impl<E> DerefMut for Wire<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.0
    }
}

impl<E: WireEnum> Serialize for Wire<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de, E: WireEnum> Deserialize<'de> for Wire<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(Wire)
    }
}
