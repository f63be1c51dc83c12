use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

super::record_id!(
    /// Server-assigned identifier of a [`Message`].
    MessageId
);

/// A visitor message left through the public contact form.
///
/// Read-only here; the admin client can only delete it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}
