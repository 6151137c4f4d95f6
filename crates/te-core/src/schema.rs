//! # Schema Round-Trip Surface
//!
//! Every document type exchanged with the Trends.Earth platform is a plain
//! serde type whose `Deserialize` impl routes through a validating
//! constructor. The [`Schema`] trait gives all of them the same surface:
//!
//! - `dump()` / `dumps()` — serialize to a JSON value / JSON text.
//! - `load()` / `loads()` — deserialize and validate.
//! - `validate()` — re-check the invariants after in-place mutation.
//!
//! The default `validate()` dumps and reloads the object, which re-runs
//! every constructor check. Types with a direct checker override it so the
//! caller receives a typed [`ValidationError`](crate::ValidationError)
//! instead of a serde message.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TeError;

#[doc(hidden)]
pub use serde as __serde;

/// JSON round-trip and validation surface shared by all document types.
pub trait Schema: Serialize + DeserializeOwned + Sized {
    /// Serialize to a JSON value.
    fn dump(&self) -> Result<Value, TeError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize to JSON text.
    fn dumps(&self) -> Result<String, TeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize and validate from a JSON value.
    fn load(value: Value) -> Result<Self, TeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Deserialize and validate from JSON text.
    fn loads(s: &str) -> Result<Self, TeError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Validate this instance, for example after making changes.
    fn validate(&self) -> Result<(), TeError> {
        Self::load(self.dump()?).map(|_| ())
    }
}

/// Implement `Deserialize` for a type by deserializing a plain record type
/// first and routing it through `TryFrom<Record>`, so invalid documents are
/// rejected at load time instead of being silently accepted.
///
/// ```ignore
/// impl_validating_deserialize!(Legend, LegendRecord);
/// ```
#[macro_export]
macro_rules! impl_validating_deserialize {
    ($ty:ty, $record:ty) => {
        impl<'de> $crate::schema::__serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::schema::__serde::Deserializer<'de>,
            {
                let record =
                    <$record as $crate::schema::__serde::Deserialize>::deserialize(deserializer)?;
                <$ty>::try_from(record).map_err(<D::Error as $crate::schema::__serde::de::Error>::custom)
            }
        }
    };
}
