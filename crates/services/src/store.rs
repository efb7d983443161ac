//! Typed access to the named collections.
//!
//! Reads never fail: a missing key is an empty collection, and so is a
//! value that no longer parses. Individual records that fail to decode are
//! skipped so one bad entry does not hide the rest.

use std::sync::Arc;

use domains::{Collection, DomainError, KeyValueStore, Result, Session, SESSION_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Loads a collection, falling back to an empty one on any problem.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let raw = match self.backend.get(collection.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(collection = collection.key(), error = %err, "read failed, using an empty collection");
                return Vec::new();
            }
        };

        match decode_collection(collection, &raw) {
            Ok(records) => {
                debug!(collection = collection.key(), count = records.len(), "loaded collection");
                records
            }
            Err(err) => {
                warn!(error = %err, "recovered corrupt collection as empty");
                Vec::new()
            }
        }
    }

    /// Overwrites a collection in one write.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)
            .map_err(|e| DomainError::Storage(format!("encoding {}: {e}", collection.key())))?;
        self.backend.set(collection.key(), &raw)
    }

    pub fn load_session(&self) -> Option<Session> {
        let raw = match self.backend.get(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "session read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session record");
                None
            }
        }
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)
            .map_err(|e| DomainError::Storage(format!("encoding session: {e}")))?;
        self.backend.set(SESSION_KEY, &raw)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.backend.remove(SESSION_KEY)
    }
}

fn decode_collection<T: DeserializeOwned>(collection: Collection, raw: &str) -> Result<Vec<T>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| DomainError::StorageCorrupt {
            collection: collection.key().to_string(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(collection = collection.key(), index, error = %err, "skipping malformed record")
            }
        }
    }
    Ok(records)
}
