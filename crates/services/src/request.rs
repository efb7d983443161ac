//! # Request Lifecycle Manager
//!
//! Booking and visit requests against a property. Every transition tells
//! the counterparty through the notification dispatcher; if that write
//! fails the request collection is put back the way it was.

use std::sync::Arc;

use domains::{
    ApprovalStatus, Clock, Collection, Decision, DomainError, Property, Request, RequestDetails,
    RequestDraft, RequestKind, Requester, Result, Session,
};
use tracing::{error, info};

use crate::ids;
use crate::notification::{request_decided, request_received, NotificationService};
use crate::store::Store;

/// Used in the decision message once the property itself is gone.
pub const FALLBACK_PROPERTY_TITLE: &str = "the property";

#[derive(Clone)]
pub struct RequestService {
    store: Store,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
}

impl RequestService {
    pub fn new(store: Store, clock: Arc<dyn Clock>, notifications: NotificationService) -> Self {
        Self {
            store,
            clock,
            notifications,
        }
    }

    /// Files a booking or visit request and tells the seller.
    ///
    /// The property's approval status is not checked.
    pub fn create(&self, session: &Session, property_id: &str, draft: RequestDraft) -> Result<Request> {
        let property = self.property(property_id)?;
        validate_details(&draft.details)?;

        let requester = Requester {
            name: draft
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| session.name.clone()),
            email: session.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
        };
        if requester.email.is_empty() {
            return Err(DomainError::validation("requester email is required"));
        }

        let kind = draft.details.kind();
        let collection = kind.collection();
        let previous: Vec<Request> = self.store.load(collection);
        let now = self.clock.now();
        let id = ids::stamped_id(kind.as_str(), now, |candidate| {
            previous.iter().any(|r| r.id == candidate)
        });

        let request = Request {
            id,
            property_id: property.id.clone(),
            property_title: property.title.clone(),
            seller_email: property.seller.email.clone(),
            requester,
            details: draft.details,
            notes: draft.notes.trim().to_string(),
            status: ApprovalStatus::Pending,
            created_at: now,
            updated_at: None,
        };

        let mut next = previous.clone();
        next.push(request.clone());
        self.store.save(collection, &next)?;

        if !request.seller_email.is_empty() {
            let template = request_received(kind, &request.property_title);
            let sent = self.notifications.notify_with(
                &request.seller_email,
                template,
                kind.received_notification(),
                &request.id,
            );
            if let Err(err) = sent {
                self.restore(collection, &previous);
                return Err(err);
            }
        }

        info!(
            request_id = %request.id,
            property_id = %request.property_id,
            kind = %kind,
            requester = %request.requester.email,
            "request created"
        );
        Ok(request)
    }

    /// Records the seller's decision and tells the requester.
    ///
    /// A decided request may be decided again; the latest call wins.
    pub fn update_status(&self, id: &str, kind: RequestKind, decision: Decision) -> Result<Request> {
        let collection = kind.collection();
        let previous: Vec<Request> = self.store.load(collection);
        let index = previous
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(entity(kind), id))?;

        let mut next = previous.clone();
        let request = &mut next[index];
        let from = request.status;
        request.status = decision.into();
        request.updated_at = Some(self.clock.now());
        let updated = request.clone();
        self.store.save(collection, &next)?;

        let title = self
            .store
            .load::<Property>(Collection::Properties)
            .into_iter()
            .find(|p| p.id == updated.property_id)
            .map(|p| p.title)
            .unwrap_or_else(|| FALLBACK_PROPERTY_TITLE.to_string());
        let template = request_decided(kind, decision, &title);
        if let Err(err) = self.notifications.notify_with(
            &updated.requester.email,
            template,
            kind.decided_notification(),
            &updated.id,
        ) {
            self.restore(collection, &previous);
            return Err(err);
        }

        info!(
            request_id = id,
            kind = %kind,
            from = %from,
            to = %updated.status,
            "request status changed"
        );
        Ok(updated)
    }

    pub fn get(&self, id: &str, kind: RequestKind) -> Result<Request> {
        self.store
            .load::<Request>(kind.collection())
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(entity(kind), id))
    }

    /// Bookings and visits for one property. Unknown or deleted ids give an
    /// empty list; the orphaned requests stay stored.
    pub fn list_for_property(&self, property_id: &str) -> Vec<Request> {
        if self.property(property_id).is_err() {
            return Vec::new();
        }
        self.combined(|r| r.property_id == property_id)
    }

    /// Requests on properties the seller currently owns.
    pub fn list_for_seller(&self, email: &str) -> Vec<Request> {
        let owned: Vec<String> = self
            .store
            .load::<Property>(Collection::Properties)
            .into_iter()
            .filter(|p| p.is_listed_by(email))
            .map(|p| p.id)
            .collect();
        self.combined(|r| owned.contains(&r.property_id))
    }

    pub fn list_for_requester(&self, email: &str) -> Vec<Request> {
        self.combined(|r| r.requester.email == email)
    }

    pub fn list_all(&self) -> Vec<Request> {
        self.combined(|_| true)
    }

    fn property(&self, id: &str) -> Result<Property> {
        self.store
            .load::<Property>(Collection::Properties)
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Property", id))
    }

    /// Both kinds merged, newest first.
    fn combined(&self, keep: impl Fn(&Request) -> bool) -> Vec<Request> {
        let mut all: Vec<Request> = RequestKind::ALL
            .iter()
            .flat_map(|kind| self.store.load::<Request>(kind.collection()))
            .filter(|r| keep(r))
            .collect();
        // later writes first among equal timestamps
        all.reverse();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    fn restore(&self, collection: Collection, previous: &[Request]) {
        match self.store.save(collection, previous) {
            Ok(()) => info!(collection = collection.key(), "request change rolled back"),
            Err(err) => error!(
                collection = collection.key(),
                error = %err,
                "rollback failed, request collection may be ahead of notifications"
            ),
        }
    }
}

fn entity(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Booking => "Booking",
        RequestKind::Visit => "Visit",
    }
}

fn validate_details(details: &RequestDetails) -> Result<()> {
    match *details {
        RequestDetails::Booking {
            start_date,
            end_date,
            guests,
        } => {
            if end_date < start_date {
                return Err(DomainError::validation("end date must not precede start date"));
            }
            if guests == 0 {
                return Err(DomainError::validation("guests must be at least 1"));
            }
            Ok(())
        }
        RequestDetails::Visit { .. } => Ok(()),
    }
}
