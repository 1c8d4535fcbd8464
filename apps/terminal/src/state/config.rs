//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KARU_*`)
//! 2. Config file (`--config`, or `config.toml` in the platform config dir)
//! 3. Defaults (this file)
//!
//! ```toml
//! store_name = "KarU Mart"
//! cashier_id = "5b0c6a4e-0000-4000-8000-000000000001"
//! cashier_name = "Achieng"
//!
//! [backend]
//! kind = "remote"
//! url = "https://abc.supabase.co"
//! api_key = "anon-key"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use karu_core::validation::validate_uuid;
use karu_core::Money;
use karu_remote::RestConfig;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown in headers and on receipts)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Cashier recorded on every transaction
    pub cashier_id: String,

    /// Name used in the dashboard greeting
    pub cashier_name: String,

    /// How many customers the sales screen loads
    pub customer_limit: u32,

    /// Low-stock products listed before "+N more"
    pub low_stock_preview: usize,

    pub backend: BackendSettings,
}

/// Which store the terminal talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite file on this machine
    #[default]
    Local,

    /// Hosted PostgREST / Supabase project
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub kind: BackendKind,

    /// Local database file. Platform data dir when unset.
    pub database_path: Option<PathBuf>,

    pub url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            kind: BackendKind::Local,
            database_path: None,
            url: None,
            api_key: None,
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl BackendSettings {
    /// REST settings for the remote backend.
    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::invalid("backend.url", "required for the remote backend"))?;
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::invalid("backend.api_key", "required for the remote backend")
            })?;

        let mut config = RestConfig::new(url, api_key).with_timeout(self.timeout_secs);
        if let Some(token) = &self.access_token {
            config = config.with_access_token(token.clone());
        }
        Ok(config)
    }
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "KarU Mart"
    /// - Currency: $ with 2 decimals
    /// - 50 customers, 5 low-stock rows
    /// - Local SQLite backend
    fn default() -> Self {
        ConfigState {
            store_name: "KarU Mart".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            cashier_id: "cashier-01".to_string(),
            cashier_name: "Cashier".to_string(),
            customer_limit: 50,
            low_stock_preview: 5,
            backend: BackendSettings::default(),
        }
    }
}

impl ConfigState {
    /// Builds the configuration from all layers.
    ///
    /// An explicit `path` must exist. Without one, the platform
    /// `config.toml` is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(path) => {
                info!(path = %path.display(), "Loading config file");
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Self::from_toml(&text)?
            }
            None => {
                debug!("No config file, using defaults");
                ConfigState::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that only the chosen backend cares about.
    ///
    /// The hosted schema keys `cashier_id` to a user profile, so it must
    /// be a UUID there.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Remote {
            validate_uuid(&self.cashier_id)
                .map_err(|e| ConfigError::invalid("cashier_id", e.to_string()))?;
        }
        Ok(())
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlays `KARU_*` variables.
    ///
    /// ## Environment Variables
    /// - `KARU_STORE_NAME`, `KARU_CASHIER_ID`, `KARU_CASHIER_NAME`
    /// - `KARU_CUSTOMER_LIMIT`, `KARU_LOW_STOCK_PREVIEW`
    /// - `KARU_BACKEND` (`local` or `remote`)
    /// - `KARU_REMOTE_URL`, `KARU_REMOTE_API_KEY`, `KARU_REMOTE_ACCESS_TOKEN`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KARU_STORE_NAME") {
            self.store_name = v;
        }
        if let Some(v) = lookup("KARU_CASHIER_ID") {
            self.cashier_id = v;
        }
        if let Some(v) = lookup("KARU_CASHIER_NAME") {
            self.cashier_name = v;
        }
        if let Some(v) = lookup("KARU_CUSTOMER_LIMIT") {
            self.customer_limit = v
                .parse()
                .map_err(|_| ConfigError::invalid("KARU_CUSTOMER_LIMIT", "expected a number"))?;
        }
        if let Some(v) = lookup("KARU_LOW_STOCK_PREVIEW") {
            self.low_stock_preview = v
                .parse()
                .map_err(|_| ConfigError::invalid("KARU_LOW_STOCK_PREVIEW", "expected a number"))?;
        }
        if let Some(v) = lookup("KARU_BACKEND") {
            self.backend.kind = match v.to_lowercase().as_str() {
                "local" => BackendKind::Local,
                "remote" => BackendKind::Remote,
                _ => return Err(ConfigError::invalid("KARU_BACKEND", "expected local or remote")),
            };
        }
        if let Some(v) = lookup("KARU_REMOTE_URL") {
            self.backend.url = Some(v);
        }
        if let Some(v) = lookup("KARU_REMOTE_API_KEY") {
            self.backend.api_key = Some(v);
        }
        if let Some(v) = lookup("KARU_REMOTE_ACCESS_TOKEN") {
            self.backend.access_token = Some(v);
        }
        Ok(())
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }
}

/// Platform config file location.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "karu", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }

    #[test]
    fn test_toml_layer_keeps_defaults_for_missing_keys() {
        let config = ConfigState::from_toml(
            r#"
            cashier_name = "Achieng"

            [backend]
            kind = "remote"
            url = "https://abc.supabase.co"
            api_key = "anon"
            "#,
        )
        .unwrap();

        assert_eq!(config.cashier_name, "Achieng");
        assert_eq!(config.store_name, "KarU Mart");
        assert_eq!(config.customer_limit, 50);
        assert_eq!(config.backend.kind, BackendKind::Remote);
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ConfigState::from_toml(r#"store_name = "From File""#).unwrap();

        config
            .apply_env(env(&[
                ("KARU_STORE_NAME", "From Env"),
                ("KARU_LOW_STOCK_PREVIEW", "3"),
                ("KARU_BACKEND", "Remote"),
            ]))
            .unwrap();

        assert_eq!(config.store_name, "From Env");
        assert_eq!(config.low_stock_preview, 3);
        assert_eq!(config.backend.kind, BackendKind::Remote);
    }

    #[test]
    fn test_env_rejects_bad_numbers() {
        let mut config = ConfigState::default();
        let err = config
            .apply_env(env(&[("KARU_CUSTOMER_LIMIT", "lots")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_remote_backend_needs_uuid_cashier() {
        let mut config = ConfigState::default();
        assert!(config.validate().is_ok());

        config.backend.kind = BackendKind::Remote;
        assert!(config.validate().is_err());

        config.cashier_id = "5b0c6a4e-0000-4000-8000-000000000001".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_config_requires_url_and_key() {
        let mut backend = BackendSettings::default();
        assert!(backend.rest_config().is_err());

        backend.url = Some("https://abc.supabase.co".to_string());
        backend.api_key = Some("anon".to_string());
        backend.access_token = Some("jwt".to_string());

        let rest = backend.rest_config().unwrap();
        assert_eq!(rest.bearer(), "Bearer jwt");
    }
}
