use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Bearer token plus the identity the server returned at login.
///
/// The login response is `{ token, ...identity }`, so the identity fields are
/// flattened next to the token both on the wire and on disk.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(flatten)]
    pub identity: Identity,
}

impl Credential {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            identity: Identity {
                username: Some(username.into()),
                ..Identity::default()
            },
        }
    }

    /// Last characters of the token, for logs.
    pub fn token_hint(&self) -> String {
        let skip = self.token.chars().count().saturating_sub(6);
        format!("...{}", self.token.chars().skip(skip).collect::<String>())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token_hint())
            .field("identity", &self.identity)
            .finish()
    }
}

/// Display identity of the logged-in operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Whatever else the server sent along with the token.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
