use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    BRIDGE_URL_ENV, DEFAULT_BRIDGE_URL, DEFAULT_JOIN_SETTLE_MS, DEFAULT_LOG_FILE,
    DEFAULT_WALLET_NAME, TESTNET_FEDERATION_CODE,
};

/// User settings, read from `config.yaml` in the config directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebSocket address of the wallet bridge
    pub bridge_url: String,
    /// Wallet name used to open and join
    pub wallet_name: String,
    /// Invite code prefilled in the join panel
    pub invite_code: String,
    pub log_file: PathBuf,
    /// Wait before re-checking the open flag after a join
    pub join_settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bridge_url: String::from(DEFAULT_BRIDGE_URL),
            wallet_name: String::from(DEFAULT_WALLET_NAME),
            invite_code: String::from(TESTNET_FEDERATION_CODE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            join_settle_ms: DEFAULT_JOIN_SETTLE_MS,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fedimint-tui-demo")
            .join("config.yaml")
    }

    /// Load the config from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        if let Ok(url) = std::env::var(BRIDGE_URL_ENV) {
            config.bridge_url = url;
        }
        Ok(config)
    }

    /// Load the config at `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.wallet_name, "fm-client");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "bridge_url: ws://10.0.0.2:9000\nwallet_name: alice\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bridge_url, "ws://10.0.0.2:9000");
        assert_eq!(config.wallet_name, "alice");
        assert_eq!(config.join_settle_ms, 1000);
        assert_eq!(config.invite_code, TESTNET_FEDERATION_CODE);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "join_settle_ms: [not, a, number]\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
