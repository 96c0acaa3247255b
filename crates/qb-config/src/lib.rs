//! # qb-config
//!
//! Layered configuration loading for Quotebook using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Command-line overrides ([`ConfigOverrides`])
//! 2. Environment variables (`QUOTEBOOK_*` prefix)
//! 3. `./quotebook.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `QUOTEBOOK_QUOTES_DIR` -> `quotes_dir`, `QUOTEBOOK_PASSWORD` -> `password`,
//! and so on. `QUOTEBOOK_LOG` is the log filter and is not part of the config.
//!
//! # Usage
//!
//! ```no_run
//! use qb_config::QuoteConfig;
//!
//! let config = QuoteConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.listen);
//! ```

mod error;

pub use error::ConfigError;

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "QUOTEBOOK_";

/// Project-local configuration file.
pub const CONFIG_FILE: &str = "quotebook.toml";

fn default_quotes_dir() -> PathBuf {
    PathBuf::from("quotes")
}

fn default_password() -> String {
    "banana".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:8990".to_string()
}

const fn default_workers() -> usize {
    4
}

const fn default_csrf_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// Directory holding one JSON file per quote.
    #[serde(default = "default_quotes_dir")]
    pub quotes_dir: PathBuf,

    /// Shared secret required to submit a quote.
    #[serde(default = "default_password")]
    pub password: String,

    /// Address the HTTP server binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Number of request-handling threads.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Lifetime of an issued CSRF token.
    #[serde(default = "default_csrf_ttl_secs")]
    pub csrf_ttl_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            quotes_dir: default_quotes_dir(),
            password: default_password(),
            listen: default_listen(),
            workers: default_workers(),
            csrf_ttl_secs: default_csrf_ttl_secs(),
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl QuoteConfig {
    /// Load configuration from defaults, `quotebook.toml` and the environment.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Load configuration with command-line values layered on top.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_overrides(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::extract(Self::figment().merge(Serialized::defaults(overrides)))
    }

    /// Build the figment provider chain, without command-line overrides.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = Path::new(CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["log"]))
    }

    /// Reject values the server cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "password".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn csrf_ttl(&self) -> Duration {
        Duration::from_secs(self.csrf_ttl_secs)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
