//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the services.
//! All of them are synchronous: every store read and write completes
//! before the call returns.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Named JSON collections persisted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Properties,
    Bookings,
    Visits,
    Notifications,
    RegisteredUsers,
    SavedProperties,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Properties,
        Self::Bookings,
        Self::Visits,
        Self::Notifications,
        Self::RegisteredUsers,
        Self::SavedProperties,
        Self::Messages,
    ];

    /// Storage key the collection is persisted under.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Bookings => "bookings",
            Self::Visits => "visits",
            Self::Notifications => "notifications",
            Self::RegisteredUsers => "registeredUsers",
            Self::SavedProperties => "savedProperties",
            Self::Messages => "messages",
        }
    }
}

/// Storage key of the single current-session record.
pub const SESSION_KEY: &str = "userData";

/// Durable string key-value storage (the browser's local storage, a
/// directory of files, or a map in memory).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the whole value. Readers never observe a partial write.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Time source for ids and timestamps.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One-way password hashing for registered accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}
