//! Gate configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use tixgate_contract::RpcSettings;
use tixgate_types::Address;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("no contract address configured (set contract_address or --contract)")]
    MissingContract,
}

/// Configuration for the gate.
///
/// Can be loaded from a TOML file via [`GateConfig::from_toml_file`];
/// command-line flags override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateConfig {
    /// Node JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Deployed ticket contract.
    #[serde(default)]
    pub contract_address: Option<Address>,

    /// Operator account. The node must be able to sign for it.
    #[serde(default)]
    pub account: Option<Address>,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long to wait for a receipt after submitting.
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// Delay between receipt polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_confirmation_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Connection settings for the contract backend.
    pub fn rpc_settings(&self) -> Result<RpcSettings, ConfigError> {
        let contract_address = self.contract_address.ok_or(ConfigError::MissingContract)?;
        let mut settings = RpcSettings::new(self.rpc_url.clone(), contract_address);
        settings.request_timeout = Duration::from_secs(self.request_timeout_secs.max(1));
        settings.confirmation_timeout = Duration::from_secs(self.confirmation_timeout_secs);
        settings.poll_interval = Duration::from_millis(self.poll_interval_ms.max(1));
        Ok(settings)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: None,
            account: None,
            request_timeout_secs: default_request_timeout_secs(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONTRACT: &str = "0xd1220a0cf47c7b9be7a2e6ba89f429762e7b9adb";

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = GateConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.confirmation_timeout_secs, 120);
        assert_eq!(config.log_format, "human");
        assert!(config.contract_address.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = format!(
            r#"
            rpc_url = "http://node:8545"
            contract_address = "{CONTRACT}"
            poll_interval_ms = 250
        "#
        );
        let config = GateConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.contract_address, Some(Address::parse(CONTRACT).unwrap()));
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn bad_address_is_a_parse_error() {
        let err = GateConfig::from_toml_str(r#"account = "not-an-address""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = GateConfig {
            contract_address: Some(Address::parse(CONTRACT).unwrap()),
            ..Default::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = GateConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.contract_address, config.contract_address);
        assert_eq!(parsed.poll_interval_ms, config.poll_interval_ms);
    }

    #[test]
    fn rpc_settings_require_contract() {
        let err = GateConfig::default().rpc_settings().unwrap_err();
        assert!(matches!(err, ConfigError::MissingContract));
    }

    #[test]
    fn rpc_settings_convert_units() {
        let config = GateConfig {
            contract_address: Some(Address::parse(CONTRACT).unwrap()),
            confirmation_timeout_secs: 5,
            poll_interval_ms: 0,
            ..Default::default()
        };
        let settings = config.rpc_settings().unwrap();
        assert_eq!(settings.confirmation_timeout, Duration::from_secs(5));
        assert_eq!(settings.poll_interval, Duration::from_millis(1));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "confirmation_timeout_secs = 10").unwrap();
        let config = GateConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.confirmation_timeout_secs, 10);
    }

    #[test]
    fn missing_file_returns_read_error() {
        let err = GateConfig::from_toml_file(Path::new("/nonexistent/tixgate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
