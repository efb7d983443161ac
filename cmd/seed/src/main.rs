//! Prepares a data directory: registers the admin account and, when
//! enabled, a handful of approved demo listings. Running it twice changes
//! nothing the second time.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::Argon2Hasher;
use configs::{LogSettings, Settings, StorageBackend};
use domains::{
    KeyValueStore, ListingType, PropertyDraft, PropertyType, RegistrationForm, Role, Session,
    SystemClock,
};
use secrecy::ExposeSecret;
use services::{PropertyHub, ServiceOptions};
use storage_adapters::{FileStore, MemoryStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEMO_SELLER_EMAIL: &str = "demo.seller@propertyhub.local";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    let backend: Arc<dyn KeyValueStore> = match settings.storage.backend {
        StorageBackend::File => Arc::new(
            FileStore::open(&settings.storage.data_dir)
                .with_context(|| format!("opening {}", settings.storage.data_dir.display()))?,
        ),
        StorageBackend::Memory => {
            warn!("memory backend selected, seeded data will not outlive this run");
            Arc::new(MemoryStore::new())
        }
    };

    let options = ServiceOptions {
        welcome_window: chrono::Duration::hours(i64::from(
            settings.notifications.welcome_window_hours,
        )),
    };
    let hub = PropertyHub::new(backend, Arc::new(SystemClock), Arc::new(Argon2Hasher::new()), options);

    seed_admin(&hub, &settings)?;
    if settings.seed.demo_listings {
        seed_demo_listings(&hub)?;
    }

    info!(
        properties = hub.properties.list_all().len(),
        approved = hub.properties.list_approved().len(),
        "seed complete"
    );
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn seed_admin(hub: &PropertyHub, settings: &Settings) -> anyhow::Result<()> {
    let seed = &settings.seed;
    if hub.users.find(&seed.admin_email).is_some() {
        info!(email = %seed.admin_email, "admin already registered");
        return Ok(());
    }
    let password = seed
        .admin_password
        .as_ref()
        .map(|secret| secret.expose_secret().to_string())
        .context("seed.admin_password is not set")?;
    hub.users
        .register(RegistrationForm {
            name: seed.admin_name.clone(),
            email: seed.admin_email.clone(),
            phone: "N/A".into(),
            password: password.clone(),
            confirm_password: password,
            role: Some(Role::Admin),
        })
        .context("registering admin")?;
    hub.notifications
        .welcome(&seed.admin_email)
        .context("greeting admin")?;
    Ok(())
}

fn seed_demo_listings(hub: &PropertyHub) -> anyhow::Result<()> {
    if !hub.properties.list_by_seller(DEMO_SELLER_EMAIL).is_empty() {
        info!("demo listings already present");
        return Ok(());
    }

    let seller = Session::new("Demo Seller", DEMO_SELLER_EMAIL, Role::Seller);
    for draft in demo_drafts() {
        let property = hub
            .properties
            .submit(&seller, draft)
            .context("submitting demo listing")?;
        hub.properties
            .approve(&property.id)
            .with_context(|| format!("approving {}", property.id))?;
    }
    Ok(())
}

fn demo_drafts() -> Vec<PropertyDraft> {
    let base = |title: &str, kind: PropertyType, city: &str| PropertyDraft {
        title: Some(title.into()),
        kind: Some(kind),
        address: Some("House 12, Road 7".into()),
        city: Some(city.into()),
        description: Some(format!("{} in central {city}.", kind.label())),
        ..Default::default()
    };

    vec![
        PropertyDraft {
            listing_type: Some(ListingType::Sale),
            price: Some(8_500_000),
            area: Some(1_250.0),
            beds: Some(3),
            baths: Some(2),
            features: vec!["Balcony".into(), "Lift".into()],
            ..base("Lakeview Apartment", PropertyType::Apartment, "Dhaka")
        },
        PropertyDraft {
            listing_type: Some(ListingType::Rent),
            rent: Some(120_000),
            service_charge: Some(15_000),
            area: Some(2_400.0),
            amenities: vec!["Parking".into(), "Generator".into()],
            ..base("Corner Office Floor", PropertyType::Office, "Chattogram")
        },
        PropertyDraft {
            listing_type: Some(ListingType::Sale),
            price: Some(22_000_000),
            area: Some(5_400.0),
            ..base("Riverside Plot", PropertyType::Plot, "Sylhet")
        },
    ]
}
