//! # configs
//!
//! Layered settings: built-in defaults, then `config/default.toml`, then
//! `config/local.toml`, then `PROPERTYHUB__SECTION__KEY` environment
//! variables. A `.env` file is read first so its entries count as
//! environment variables.

use std::path::PathBuf;

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "PROPERTYHUB";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("loading settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    pub welcome_window_hours: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedSettings {
    pub admin_email: String,
    pub admin_name: String,
    /// No built-in default; must come from a config file or the environment
    #[serde(default, deserialize_with = "secret_string")]
    pub admin_password: Option<SecretString>,
    pub demo_listings: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
    pub log: LogSettings,
    pub seed: SeedSettings,
}

impl Settings {
    /// Reads `.env`, the config files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let config = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Self::from_config(config)
    }

    /// Defaults overlaid with a TOML document. Ignores files and the
    /// environment.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.welcome_window_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "notifications.welcome_window_hours",
                reason: "must be at least 1".into(),
            });
        }
        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid {
                key: "storage.data_dir",
                reason: "required for the file backend".into(),
            });
        }
        if !self.seed.admin_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: "seed.admin_email",
                reason: format!("`{}` is not an email address", self.seed.admin_email),
            });
        }
        let password_set = self
            .seed
            .admin_password
            .as_ref()
            .is_some_and(|secret| !secret.expose_secret().is_empty());
        if !password_set {
            return Err(ConfigError::Invalid {
                key: "seed.admin_password",
                reason: "must be set, e.g. with PROPERTYHUB__SEED__ADMIN_PASSWORD".into(),
            });
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("storage.backend", "file")?
        .set_default("storage.data_dir", "./data")?
        .set_default("notifications.welcome_window_hours", 24)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?
        .set_default("seed.admin_email", "admin@propertyhub.local")?
        .set_default("seed.admin_name", "PropertyHub Admin")?
        .set_default("seed.demo_listings", true)?)
}

fn secret_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|raw| raw.map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(settings: &Settings) -> &str {
        settings.seed.admin_password.as_ref().unwrap().expose_secret()
    }

    #[test]
    fn defaults_are_usable_once_a_password_is_given() {
        let settings = Settings::from_toml("[seed]\nadmin_password = \"pw\"").unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(settings.notifications.welcome_window_hours, 24);
        assert!(!settings.log.json);
        assert_eq!(secret(&settings), "pw");
    }

    #[test]
    fn admin_password_has_no_default() {
        let err = Settings::from_toml("").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "seed.admin_password", .. }));

        let blank = Settings::from_toml("[seed]\nadmin_password = \"\"").unwrap_err();
        assert!(matches!(blank, ConfigError::Invalid { key: "seed.admin_password", .. }));
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            [storage]
            backend = "memory"

            [seed]
            admin_password = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(secret(&settings), "s3cret");
        assert!(!format!("{settings:?}").contains("s3cret"));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = Settings::from_toml(
            "[notifications]\nwelcome_window_hours = 0\n[seed]\nadmin_password = \"pw\"",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "notifications.welcome_window_hours", .. }
        ));
    }

    #[test]
    fn unknown_backend_fails_to_load() {
        let err = Settings::from_toml("[storage]\nbackend = \"s3\"").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
