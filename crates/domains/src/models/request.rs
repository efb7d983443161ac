use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, NotificationKind};
use crate::error::DomainError;
use crate::ports::Collection;

/// Which of the two request flows a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Booking,
    Visit,
}

impl RequestKind {
    pub const ALL: [RequestKind; 2] = [Self::Booking, Self::Visit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Visit => "visit",
        }
    }

    /// Collection the records of this kind live in.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Booking => Collection::Bookings,
            Self::Visit => Collection::Visits,
        }
    }

    /// Notification type sent to the seller when a request arrives.
    pub fn received_notification(&self) -> NotificationKind {
        match self {
            Self::Booking => NotificationKind::BookingRequest,
            Self::Visit => NotificationKind::VisitRequest,
        }
    }

    /// Notification type sent to the requester once the seller decides.
    pub fn decided_notification(&self) -> NotificationKind {
        match self {
            Self::Booking => NotificationKind::Booking,
            Self::Visit => NotificationKind::Visit,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "booking" => Ok(Self::Booking),
            "visit" => Ok(Self::Visit),
            other => Err(DomainError::validation(format!("unknown request type `{other}`"))),
        }
    }
}

/// Kind-specific fields, tagged by `type` in the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequestDetails {
    #[serde(rename_all = "camelCase")]
    Booking {
        start_date: NaiveDate,
        end_date: NaiveDate,
        guests: u32,
    },
    #[serde(rename_all = "camelCase")]
    Visit {
        visit_date: NaiveDate,
        #[serde(with = "hour_minute")]
        visit_time: NaiveTime,
    },
}

impl RequestDetails {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Booking { .. } => RequestKind::Booking,
            Self::Visit { .. } => RequestKind::Visit,
        }
    }
}

/// The buyer behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// A booking or visit inquiry against one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub property_id: String,
    /// Title at the time of the request; the property may change or vanish later
    pub property_title: String,
    #[serde(default)]
    pub seller_email: String,
    pub requester: Requester,
    #[serde(flatten)]
    pub details: RequestDetails,
    #[serde(default)]
    pub notes: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        self.details.kind()
    }
}

/// Buyer input for a new request. Identity comes from the session; `name`
/// overrides the session's display name when given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub details: RequestDetails,
    #[serde(default)]
    pub notes: String,
}

/// Visit times are entered and stored as `HH:MM`.
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn visit_details_use_short_time() {
        let details = RequestDetails::Visit {
            visit_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            visit_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        };
        let value = serde_json::to_value(details).unwrap();
        assert_eq!(
            value,
            json!({ "type": "visit", "visitDate": "2024-06-03", "visitTime": "14:30" })
        );
        let back: RequestDetails = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind(), RequestKind::Visit);
    }

    #[test]
    fn booking_draft_reads_flat_form_fields() {
        let draft: RequestDraft = serde_json::from_value(json!({
            "phone": "0170000000",
            "type": "booking",
            "startDate": "2024-07-01",
            "endDate": "2024-07-05",
            "guests": 2
        }))
        .unwrap();
        assert_eq!(draft.details.kind(), RequestKind::Booking);
        assert_eq!(draft.name, None);
    }

    #[test]
    fn kinds_map_to_collections_and_notifications() {
        assert_eq!(RequestKind::Booking.collection(), Collection::Bookings);
        assert_eq!(
            RequestKind::Visit.received_notification(),
            NotificationKind::VisitRequest
        );
        assert_eq!(RequestKind::Visit.decided_notification(), NotificationKind::Visit);
    }
}
