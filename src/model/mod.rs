//! Wire data structures for the collections managed by the admin client.
//!
//! Entities deserialize from the API's records (`_id` for the identifier);
//! drafts hold the form fields as the operator typed them.

/// Declares a type-safe identifier around the server's opaque id.
///
/// The id is kept as a string. Numeric ids on the wire are accepted and
/// stringified, so `1` and `"1"` name the same record.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <$crate::model::RawId as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self(raw.into_string()))
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub(crate) use record_id;

/// Wire form of an id: a string or a JSON number.
#[doc(hidden)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

pub mod credential;
pub mod message;
pub mod project;
pub mod skill;

pub use credential::*;
pub use message::*;
pub use project::*;
pub use skill::*;
