//! Shared fixtures for the integration tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use domains::{
    Clock, KeyValueStore, ListingType, PropertyDraft, PropertyType, RequestDetails, RequestDraft,
    Role, Session,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use services::{PropertyHub, ServiceOptions};
use storage_adapters::MemoryStore;

/// A clock the test moves by hand. Starts at 2024-01-01T09:00:00Z.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Services over a shared backend and a hand-driven clock.
pub struct TestHub {
    pub hub: PropertyHub,
    pub clock: Arc<ManualClock>,
    pub backend: Arc<dyn KeyValueStore>,
}

impl TestHub {
    pub fn in_memory() -> Self {
        Self::over(Arc::new(MemoryStore::new()))
    }

    pub fn over(backend: Arc<dyn KeyValueStore>) -> Self {
        let clock = Arc::new(ManualClock::new());
        let hub = PropertyHub::new(
            backend.clone(),
            clock.clone(),
            Arc::new(auth_adapters::Argon2Hasher::new()),
            ServiceOptions::default(),
        );
        Self { hub, clock, backend }
    }

    /// Moves the clock one second so successive records get distinct times.
    pub fn tick(&self) {
        self.clock.advance(Duration::seconds(1));
    }
}

impl std::ops::Deref for TestHub {
    type Target = PropertyHub;

    fn deref(&self) -> &PropertyHub {
        &self.hub
    }
}

pub fn seller(email: &str) -> Session {
    Session::new("Sam Seller", email, Role::Seller)
}

pub fn random_buyer() -> Session {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    Session::new(name, email, Role::Buyer)
}

pub fn sale_draft(title: &str, price: u64) -> PropertyDraft {
    PropertyDraft {
        title: Some(title.into()),
        kind: Some(PropertyType::Apartment),
        listing_type: Some(ListingType::Sale),
        price: Some(price),
        area: Some(800.0),
        address: Some("1 Main".into()),
        city: Some("Dhaka".into()),
        description: Some("nice".into()),
        beds: Some(2),
        baths: Some(1),
        ..Default::default()
    }
}

pub fn booking_draft() -> RequestDraft {
    RequestDraft {
        name: None,
        phone: "01700000000".into(),
        details: RequestDetails::Booking {
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or_default(),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 3).unwrap_or_default(),
            guests: 2,
        },
        notes: String::new(),
    }
}

pub fn visit_draft() -> RequestDraft {
    RequestDraft {
        details: RequestDetails::Visit {
            visit_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 10).unwrap_or_default(),
            visit_time: chrono::NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default(),
        },
        ..booking_draft()
    }
}
