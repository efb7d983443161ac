//! Contact messages sent from a listing to its seller.

use std::sync::Arc;

use domains::{Clock, Collection, DomainError, Message, MessageDraft, Result, Session};
use tracing::{debug, info};

use crate::ids;
use crate::store::Store;

#[derive(Clone)]
pub struct MessageService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Sends a message. A logged-in sender's identity replaces whatever the
    /// draft says about the sender.
    pub fn send(&self, session: Option<&Session>, draft: MessageDraft) -> Result<Message> {
        let recipient_email = draft.recipient_email.trim().to_string();
        if recipient_email.is_empty() {
            return Err(DomainError::validation("recipient is required"));
        }
        if draft.body.trim().is_empty() {
            return Err(DomainError::validation("message is required"));
        }

        let (sender_name, sender_email) = match session {
            Some(s) => (s.name.clone(), s.email.clone()),
            None => (draft.sender_name.trim().to_string(), draft.sender_email.trim().to_string()),
        };

        let mut messages = self.messages();
        let now = self.clock.now();
        let message = Message {
            id: ids::stamped_id("msg", now, |candidate| messages.iter().any(|m| m.id == candidate)),
            recipient_email,
            subject: draft.subject.trim().to_string(),
            body: draft.body.trim().to_string(),
            sender_email,
            sender_name,
            sender_phone: draft.sender_phone.trim().to_string(),
            created_at: now,
            read: false,
        };
        messages.push(message.clone());
        self.store.save(Collection::Messages, &messages)?;

        info!(message_id = %message.id, recipient = %message.recipient_email, "message sent");
        Ok(message)
    }

    /// Newest first.
    pub fn list_for(&self, email: &str) -> Vec<Message> {
        let mut mine: Vec<Message> = self
            .messages()
            .into_iter()
            .filter(|m| m.recipient_email == email)
            .collect();
        mine.reverse();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    pub fn unread_count_for(&self, email: &str) -> usize {
        self.messages()
            .iter()
            .filter(|m| m.recipient_email == email && !m.read)
            .count()
    }

    pub fn mark_read(&self, id: &str) -> Result<Message> {
        let mut messages = self.messages();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::not_found("Message", id))?;
        if message.read {
            return Ok(message.clone());
        }
        message.read = true;
        let updated = message.clone();
        self.store.save(Collection::Messages, &messages)?;
        debug!(message_id = id, "message marked read");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut messages = self.messages();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Ok(false);
        }
        self.store.save(Collection::Messages, &messages)?;
        info!(message_id = id, "message deleted");
        Ok(true)
    }

    fn messages(&self) -> Vec<Message> {
        self.store.load(Collection::Messages)
    }
}
