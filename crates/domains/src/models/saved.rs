use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A buyer's bookmark on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProperty {
    pub id: String,
    pub property_id: String,
    pub user_email: String,
    pub saved_at: DateTime<Utc>,
}
