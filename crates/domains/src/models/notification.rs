use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    System,
    /// Decision on the recipient's own booking
    Booking,
    /// Decision on the recipient's own visit
    Visit,
    /// A buyer asked to book one of the recipient's listings
    BookingRequest,
    /// A buyer asked to visit one of the recipient's listings
    VisitRequest,
}

/// An informational record addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_email: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Points at a booking or visit; may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn is_for(&self, email: &str) -> bool {
        self.recipient_email == email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::BookingRequest).unwrap(),
            "\"booking-request\""
        );
        assert_eq!(serde_json::to_string(&NotificationKind::System).unwrap(), "\"system\"");
    }

    #[test]
    fn read_defaults_to_false() {
        let n: Notification = serde_json::from_str(
            r#"{"id":"notif_1_a","recipientEmail":"b@x.com","title":"t","message":"m",
                "type":"visit","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(!n.read);
        assert_eq!(n.reference_id, None);
    }
}
