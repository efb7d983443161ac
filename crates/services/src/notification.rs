//! # Notification Dispatcher
//!
//! Appends notification records in reaction to request transitions and
//! exposes the read side of a user's inbox.

use std::sync::Arc;

use chrono::Duration;
use domains::{
    Clock, Collection, Decision, DomainError, Notification, NotificationKind, Request, RequestKind,
    Result,
};
use tracing::{debug, info};

use crate::ids;
use crate::store::Store;

pub const WELCOME_TITLE: &str = "Welcome to PropertyHub";
pub const WELCOME_MESSAGE: &str =
    "Thank you for using our platform. Explore available properties or list your own!";

/// Title and body of a generated notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub title: String,
    pub message: String,
}

/// Sent to the seller when a buyer files a request.
pub fn request_received(kind: RequestKind, property_title: &str) -> Template {
    let (title, verb) = match kind {
        RequestKind::Booking => ("New Booking Request", "book"),
        RequestKind::Visit => ("New Visit Request", "visit"),
    };
    Template {
        title: title.to_string(),
        message: format!("A buyer has requested to {verb} your property: \"{property_title}\""),
    }
}

/// Sent to the requester once the seller decides.
pub fn request_decided(kind: RequestKind, decision: Decision, property_title: &str) -> Template {
    let noun = kind.as_str();
    let plural = match kind {
        RequestKind::Booking => "bookings",
        RequestKind::Visit => "visits",
    };
    match decision {
        Decision::Approved => Template {
            title: format!("Your {noun} request has been approved"),
            message: format!(
                "Great news! Your {noun} request for \"{property_title}\" has been approved. \
                 Please check your {plural} for more details."
            ),
        },
        Decision::Rejected => Template {
            title: format!("Your {noun} request has been declined"),
            message: format!(
                "Unfortunately, your {noun} request for \"{property_title}\" has been declined. \
                 Please contact the property owner for more information."
            ),
        },
    }
}

#[derive(Clone)]
pub struct NotificationService {
    store: Store,
    clock: Arc<dyn Clock>,
    welcome_window: Duration,
}

impl NotificationService {
    pub fn new(store: Store, clock: Arc<dyn Clock>, welcome_window: Duration) -> Self {
        Self {
            store,
            clock,
            welcome_window,
        }
    }

    /// Appends a notification. Only a failed write can make this fail.
    pub fn notify(
        &self,
        recipient_email: &str,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        reference_id: Option<&str>,
    ) -> Result<Notification> {
        let now = self.clock.now();
        let notification = Notification {
            id: ids::notification_id(now),
            recipient_email: recipient_email.to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            reference_id: reference_id.map(str::to_string),
            created_at: now,
            read: false,
        };

        let mut all: Vec<Notification> = self.store.load(Collection::Notifications);
        all.push(notification.clone());
        self.store.save(Collection::Notifications, &all)?;

        info!(
            notification_id = %notification.id,
            recipient = recipient_email,
            kind = ?kind,
            "notification dispatched"
        );
        Ok(notification)
    }

    pub(crate) fn notify_with(
        &self,
        recipient_email: &str,
        template: Template,
        kind: NotificationKind,
        reference_id: &str,
    ) -> Result<Notification> {
        self.notify(recipient_email, template.title, template.message, kind, Some(reference_id))
    }

    /// Greets a user at most once per rolling window.
    pub fn welcome(&self, email: &str) -> Result<Option<Notification>> {
        let cutoff = self.clock.now() - self.welcome_window;
        let all: Vec<Notification> = self.store.load(Collection::Notifications);
        let recent = all
            .iter()
            .any(|n| n.is_for(email) && n.title == WELCOME_TITLE && n.created_at > cutoff);
        if recent {
            debug!(recipient = email, "welcome already sent within window");
            return Ok(None);
        }
        self.notify(email, WELCOME_TITLE, WELCOME_MESSAGE, NotificationKind::System, None)
            .map(Some)
    }

    /// The recipient's notifications, newest first.
    pub fn list_for(&self, email: &str) -> Vec<Notification> {
        let mut mine: Vec<Notification> = self
            .store
            .load::<Notification>(Collection::Notifications)
            .into_iter()
            .filter(|n| n.is_for(email))
            .collect();
        // later writes first among equal timestamps
        mine.reverse();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    pub fn unread_count_for(&self, email: &str) -> usize {
        self.store
            .load::<Notification>(Collection::Notifications)
            .iter()
            .filter(|n| n.is_for(email) && !n.read)
            .count()
    }

    /// Marks one notification read. Already-read notifications are left
    /// untouched and nothing is written.
    pub fn mark_read(&self, id: &str) -> Result<Notification> {
        let mut all: Vec<Notification> = self.store.load(Collection::Notifications);
        let target = all
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DomainError::not_found("Notification", id))?;
        if target.read {
            return Ok(target.clone());
        }
        target.read = true;
        let updated = target.clone();
        self.store.save(Collection::Notifications, &all)?;
        debug!(notification_id = id, "notification marked read");
        Ok(updated)
    }

    /// Marks every notification of `email` read; returns how many changed.
    pub fn mark_all_read_for(&self, email: &str) -> Result<usize> {
        let mut all: Vec<Notification> = self.store.load(Collection::Notifications);
        let mut changed = 0;
        for n in all.iter_mut().filter(|n| n.is_for(email) && !n.read) {
            n.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.store.save(Collection::Notifications, &all)?;
            info!(recipient = email, changed, "notifications marked read");
        }
        Ok(changed)
    }

    /// Follows `referenceId` of a booking/visit notification. Dangling or
    /// absent references yield `None`.
    pub fn resolve_reference(&self, notification: &Notification) -> Option<Request> {
        let reference = notification.reference_id.as_deref()?;
        let kind = match notification.kind {
            NotificationKind::Booking | NotificationKind::BookingRequest => RequestKind::Booking,
            NotificationKind::Visit | NotificationKind::VisitRequest => RequestKind::Visit,
            NotificationKind::System => return None,
        };
        self.store
            .load::<Request>(kind.collection())
            .into_iter()
            .find(|r| r.id == reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use domains::MockClock;
    use insta::assert_snapshot;
    use storage_adapters::MemoryStore;

    fn service_at(now: DateTime<Utc>) -> (NotificationService, Store) {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        let store = Store::new(Arc::new(MemoryStore::new()));
        let service = NotificationService::new(store.clone(), Arc::new(clock), Duration::hours(24));
        (service, store)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn decided_templates() {
        let approved = request_decided(RequestKind::Booking, Decision::Approved, "Loft A");
        assert_snapshot!(approved.title, @"Your booking request has been approved");
        assert_snapshot!(approved.message, @r#"Great news! Your booking request for "Loft A" has been approved. Please check your bookings for more details."#);

        let declined = request_decided(RequestKind::Booking, Decision::Rejected, "Loft A");
        assert_snapshot!(declined.title, @"Your booking request has been declined");
        assert_snapshot!(declined.message, @r#"Unfortunately, your booking request for "Loft A" has been declined. Please contact the property owner for more information."#);

        let visit = request_decided(RequestKind::Visit, Decision::Approved, "Loft A");
        assert_snapshot!(visit.message, @r#"Great news! Your visit request for "Loft A" has been approved. Please check your visits for more details."#);
    }

    #[test]
    fn received_templates() {
        let booking = request_received(RequestKind::Booking, "Loft A");
        assert_eq!(booking.title, "New Booking Request");
        assert_eq!(booking.message, "A buyer has requested to book your property: \"Loft A\"");
        let visit = request_received(RequestKind::Visit, "Loft A");
        assert_eq!(visit.title, "New Visit Request");
        assert_eq!(visit.message, "A buyer has requested to visit your property: \"Loft A\"");
    }

    #[test]
    fn unread_count_and_mark_all_read_are_idempotent() {
        let (service, _) = service_at(t0());
        service.notify("b@x.com", "one", "m", NotificationKind::System, None).unwrap();
        service.notify("b@x.com", "two", "m", NotificationKind::System, None).unwrap();
        service.notify("other@x.com", "three", "m", NotificationKind::System, None).unwrap();

        assert_eq!(service.unread_count_for("b@x.com"), 2);
        assert_eq!(service.mark_all_read_for("b@x.com").unwrap(), 2);
        assert_eq!(service.unread_count_for("b@x.com"), 0);
        assert_eq!(service.mark_all_read_for("b@x.com").unwrap(), 0);
        assert_eq!(service.unread_count_for("other@x.com"), 1);
    }

    #[test]
    fn mark_read_is_a_no_op_the_second_time() {
        let (service, _) = service_at(t0());
        let n = service.notify("b@x.com", "t", "m", NotificationKind::System, None).unwrap();
        assert!(service.mark_read(&n.id).unwrap().read);
        assert!(service.mark_read(&n.id).unwrap().read);
        assert!(service.mark_read("notif_missing").unwrap_err().is_not_found());
    }

    #[test]
    fn welcome_is_sent_once_per_window() {
        let (service, store) = service_at(t0());
        assert!(service.welcome("b@x.com").unwrap().is_some());
        assert!(service.welcome("b@x.com").unwrap().is_none());
        assert!(service.welcome("c@x.com").unwrap().is_some());

        // a day and a minute later the old greeting no longer counts
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .return_const(t0() + Duration::hours(24) + Duration::minutes(1));
        let later = NotificationService::new(store, Arc::new(clock), Duration::hours(24));
        assert!(later.welcome("b@x.com").unwrap().is_some());
        assert_eq!(later.list_for("b@x.com").len(), 2);
    }

    #[test]
    fn same_instant_notifications_list_latest_first() {
        let (service, _) = service_at(t0());
        let first = service.notify("b@x.com", "first", "m", NotificationKind::System, None).unwrap();
        let second = service.notify("b@x.com", "second", "m", NotificationKind::System, None).unwrap();
        assert_eq!(first.created_at, second.created_at);

        let listed: Vec<_> = service.list_for("b@x.com").into_iter().map(|n| n.id).collect();
        assert_eq!(listed, [second.id, first.id]);
    }

    #[test]
    fn list_is_newest_first_and_dangling_reference_resolves_to_none() {
        let (service, store) = service_at(t0());
        let older = Notification {
            id: "notif_1_aaaaaaaaa".into(),
            recipient_email: "b@x.com".into(),
            title: "older".into(),
            message: "m".into(),
            kind: NotificationKind::Booking,
            reference_id: Some("booking_gone".into()),
            created_at: t0() - Duration::hours(1),
            read: false,
        };
        store.save(Collection::Notifications, &[older]).unwrap();
        service.notify("b@x.com", "newer", "m", NotificationKind::System, None).unwrap();

        let listed = service.list_for("b@x.com");
        assert_eq!(listed[0].title, "newer");
        assert_eq!(listed[1].title, "older");
        assert_eq!(service.resolve_reference(&listed[1]), None);
        assert_eq!(service.resolve_reference(&listed[0]), None);
    }
}
