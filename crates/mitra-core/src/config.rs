//! Process-wide configuration, built once at startup and injected.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MITRA_API_READ_ACCESS_TOKEN` | (required) | Catalog bearer token |
//! | `MITRA_API_BASE_URL` | `https://api.themoviedb.org/3` | Catalog base URL |
//! | `MITRA_REQUEST_TIMEOUT_SECS` | (unset) | Client-wide catalog timeout |
//! | `MITRA_SEARCH_DEBOUNCE_MS` | `500` | Quiet window for typed queries |
//!
//! Inference backend selection is configured separately by
//! `mitra_inference::InferenceConfig`.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::defaults;
use crate::error::{Error, Result};

pub const ENV_API_TOKEN: &str = "MITRA_API_READ_ACCESS_TOKEN";
pub const ENV_API_BASE_URL: &str = "MITRA_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "MITRA_REQUEST_TIMEOUT_SECS";
pub const ENV_DEBOUNCE_MS: &str = "MITRA_SEARCH_DEBOUNCE_MS";

/// Catalog API connection settings.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_token: String,
    /// Client-wide timeout; `None` leaves it to the transport.
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::Config(format!("{} is empty", ENV_API_TOKEN)));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "catalog base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    /// Quiet window before a typed query settles.
    pub search_debounce_ms: u64,
}

impl AppConfig {
    /// Load `.env` (if present), then read the process environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to read .env: {}", e))),
        }
        Self::from_env()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Fails fast when the API token is missing so no unauthenticated
    /// request is ever sent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(ENV_API_TOKEN)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_API_TOKEN)))?;

        let base_url = lookup(ENV_API_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::CATALOG_BASE_URL.to_string());

        let timeout_secs = match lookup(ENV_REQUEST_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got: {}",
                    ENV_REQUEST_TIMEOUT, raw
                ))
            })?),
            None => None,
        };

        let search_debounce_ms = match lookup(ENV_DEBOUNCE_MS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of milliseconds, got: {}",
                    ENV_DEBOUNCE_MS, raw
                ))
            })?,
            None => defaults::SEARCH_DEBOUNCE_MS,
        };

        let catalog = CatalogConfig {
            base_url,
            api_token,
            timeout_secs,
        };
        catalog.validate()?;

        info!(
            base_url = %catalog.base_url,
            timeout_secs = ?catalog.timeout_secs,
            search_debounce_ms,
            "Configuration loaded"
        );

        Ok(Self {
            catalog,
            search_debounce_ms,
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains(ENV_API_TOKEN)),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_token_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_API_TOKEN, "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_API_TOKEN, "secret")])).unwrap();
        assert_eq!(config.catalog.base_url, defaults::CATALOG_BASE_URL);
        assert_eq!(config.catalog.api_token, "secret");
        assert_eq!(config.catalog.timeout_secs, None);
        assert_eq!(config.search_debounce_ms, defaults::SEARCH_DEBOUNCE_MS);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_overrides_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_API_BASE_URL, "http://localhost:9000/3"),
            (ENV_REQUEST_TIMEOUT, "15"),
            (ENV_DEBOUNCE_MS, "250"),
        ]))
        .unwrap();
        assert_eq!(config.catalog.base_url, "http://localhost:9000/3");
        assert_eq!(config.catalog.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.search_debounce_ms, 250);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_DEBOUNCE_MS, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_DEBOUNCE_MS));

        let err = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_REQUEST_TIMEOUT, "-1"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_REQUEST_TIMEOUT));
    }

    #[test]
    fn test_base_url_scheme_validated() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_API_BASE_URL, "ftp://catalog"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CatalogConfig::new("https://example.com", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
