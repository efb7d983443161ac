//! A buyer's saved (favourite) listings.

use std::sync::Arc;

use domains::{Clock, Collection, DomainError, Property, Result, SavedProperty, Session};
use tracing::info;

use crate::ids;
use crate::store::Store;

#[derive(Clone)]
pub struct SavedPropertyService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SavedPropertyService {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn save(&self, session: &Session, property_id: &str) -> Result<SavedProperty> {
        let exists = self
            .store
            .load::<Property>(Collection::Properties)
            .iter()
            .any(|p| p.id == property_id);
        if !exists {
            return Err(DomainError::not_found("Property", property_id));
        }

        let mut saved = self.entries();
        if saved
            .iter()
            .any(|s| s.user_email == session.email && s.property_id == property_id)
        {
            return Err(DomainError::Conflict(format!("{property_id} is already saved")));
        }

        let now = self.clock.now();
        let entry = SavedProperty {
            id: ids::stamped_id("saved", now, |candidate| saved.iter().any(|s| s.id == candidate)),
            property_id: property_id.to_string(),
            user_email: session.email.clone(),
            saved_at: now,
        };
        saved.push(entry.clone());
        self.store.save(Collection::SavedProperties, &saved)?;

        info!(property_id, user = %session.email, "property saved");
        Ok(entry)
    }

    /// Returns `false` when nothing was saved under that id.
    pub fn remove(&self, session: &Session, property_id: &str) -> Result<bool> {
        let mut saved = self.entries();
        let before = saved.len();
        saved.retain(|s| !(s.user_email == session.email && s.property_id == property_id));
        if saved.len() == before {
            return Ok(false);
        }
        self.store.save(Collection::SavedProperties, &saved)?;
        info!(property_id, user = %session.email, "saved property removed");
        Ok(true)
    }

    /// Saved listings that still exist, most recently saved first.
    pub fn list_for(&self, email: &str) -> Vec<Property> {
        let properties: Vec<Property> = self.store.load(Collection::Properties);
        let mut mine: Vec<SavedProperty> = self
            .entries()
            .into_iter()
            .filter(|s| s.user_email == email)
            .collect();
        mine.reverse();
        mine.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        mine.iter()
            .filter_map(|s| properties.iter().find(|p| p.id == s.property_id).cloned())
            .collect()
    }

    pub fn is_saved(&self, email: &str, property_id: &str) -> bool {
        self.entries()
            .iter()
            .any(|s| s.user_email == email && s.property_id == property_id)
    }

    pub(crate) fn count_for(&self, email: &str) -> usize {
        self.entries().iter().filter(|s| s.user_email == email).count()
    }

    fn entries(&self) -> Vec<SavedProperty> {
        self.store.load(Collection::SavedProperties)
    }
}
