//! Process configuration. Read once at startup, never reloaded.

use crate::error::ConfigError;
use crate::ingest::LogSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Access log appended by the request-logging endpoint
    pub access_log: PathBuf,
    /// Append-only list of blocked addresses (one per line)
    pub block_ledger: PathBuf,
    /// Model manifest (feature schema, scaler, classifier)
    pub model_path: PathBuf,
    /// Field layout of the access log
    pub schema: LogSchema,
    /// Seconds between polling cycles; 0 runs a single cycle and exits
    pub poll_interval_secs: u64,
    /// Upper bound for aggregation + scoring in one cycle
    pub cycle_timeout_secs: u64,
    /// Where block decisions are sent
    pub block_action: BlockActionConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockActionConfig {
    /// Log the decision only
    Simulated,
    /// POST each decision to an enforcement endpoint
    Webhook {
        endpoint: String,
        #[serde(default = "default_webhook_timeout")]
        timeout_secs: u64,
    },
}

fn default_webhook_timeout() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            access_log: PathBuf::from("logs/access.log"),
            block_ledger: PathBuf::from("logs/blocked_ips.log"),
            model_path: PathBuf::from("model/IsolationForest.json"),
            schema: LogSchema::FiveField,
            poll_interval_secs: 5,
            cycle_timeout_secs: 60,
            block_action: BlockActionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for BlockActionConfig {
    fn default() -> Self {
        BlockActionConfig::Simulated
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl SentinelConfig {
    /// Load from a JSON file. A missing file yields the defaults; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SentinelConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, p) in [
            ("access_log", &self.access_log),
            ("block_ledger", &self.block_ledger),
            ("model_path", &self.model_path),
        ] {
            if p.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} is empty")));
            }
        }
        if self.cycle_timeout_secs == 0 {
            return Err(ConfigError::Invalid("cycle_timeout_secs must be > 0".into()));
        }
        if let BlockActionConfig::Webhook { endpoint, .. } = &self.block_action {
            if endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("webhook endpoint is empty".into()));
            }
        }
        Ok(())
    }

    /// One-shot mode: run a single cycle and exit.
    pub fn run_once(&self) -> bool {
        self.poll_interval_secs == 0
    }
}
