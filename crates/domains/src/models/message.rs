use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact-form message sent to a listing's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub recipient_email: String,
    pub subject: String,
    #[serde(rename = "message")]
    pub body: String,
    pub sender_email: String,
    pub sender_name: String,
    #[serde(default)]
    pub sender_phone: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Contact form input. When the sender is logged in, the session's name
/// and email replace the typed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageDraft {
    pub recipient_email: String,
    pub subject: String,
    #[serde(rename = "message")]
    pub body: String,
    pub sender_email: String,
    pub sender_name: String,
    pub sender_phone: String,
}
