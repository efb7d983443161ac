//! # Domain Models
//!
//! These structs represent the records persisted by the listing store.
//! Field names serialize in camelCase. Kind-specific data (sale vs rent,
//! booking vs visit) is carried by tagged enums, so stored records are
//! this crate's own layout rather than a copy of any earlier format.

mod attachment;
mod message;
mod notification;
mod property;
mod request;
mod saved;
mod user;

pub use attachment::*;
pub use message::*;
pub use notification::*;
pub use property::*;
pub use request::*;
pub use saved::*;
pub use user::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Review state shared by properties and booking/visit requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome a seller (or admin) picks for a pending request.
///
/// Pending is deliberately absent: a request can only move to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for ApprovalStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}
