//! # Services
//!
//! Application logic of the listing store: property and request
//! lifecycles, the notification inbox, accounts, saved listings and
//! messages. Everything here talks to storage through the ports defined in
//! `domains`; adapters are injected by the caller.

pub mod dashboard;
pub mod ids;
pub mod message;
pub mod notification;
pub mod property;
pub mod request;
pub mod saved;
pub mod store;
pub mod user;

use std::sync::Arc;

use chrono::Duration;
use domains::{Clock, KeyValueStore, PasswordHasher};

pub use dashboard::{BuyerStats, DashboardService, SellerStats};
pub use message::MessageService;
pub use notification::{NotificationService, Template, WELCOME_MESSAGE, WELCOME_TITLE};
pub use property::{sort_listings, ListingSort, PriceRange, PropertyFilter, PropertyService};
pub use request::{RequestService, FALLBACK_PROPERTY_TITLE};
pub use saved::SavedPropertyService;
pub use store::Store;
pub use user::UserService;

/// Tunables that are not adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// A welcome notification is not repeated within this window
    pub welcome_window: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            welcome_window: Duration::hours(24),
        }
    }
}

/// Every service wired over one backend.
#[derive(Clone)]
pub struct PropertyHub {
    pub store: Store,
    pub properties: PropertyService,
    pub requests: RequestService,
    pub notifications: NotificationService,
    pub users: UserService,
    pub saved: SavedPropertyService,
    pub messages: MessageService,
    pub dashboard: DashboardService,
}

impl PropertyHub {
    pub fn new(
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn PasswordHasher>,
        options: ServiceOptions,
    ) -> Self {
        let store = Store::new(backend);
        let notifications =
            NotificationService::new(store.clone(), clock.clone(), options.welcome_window);
        let properties = PropertyService::new(store.clone(), clock.clone());
        let requests = RequestService::new(store.clone(), clock.clone(), notifications.clone());
        let users = UserService::new(store.clone(), hasher);
        let saved = SavedPropertyService::new(store.clone(), clock.clone());
        let messages = MessageService::new(store.clone(), clock);
        let dashboard = DashboardService::new(
            properties.clone(),
            requests.clone(),
            notifications.clone(),
            saved.clone(),
            messages.clone(),
        );

        Self {
            store,
            properties,
            requests,
            notifications,
            users,
            saved,
            messages,
            dashboard,
        }
    }
}
