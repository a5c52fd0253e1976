//! Block action: tell the enforcement side an address was blocked.
//! Enforcement itself happens elsewhere; a failure here is logged and the
//! ledger entry stands.
//!
//! [`SimulatedBlock`] is the default and does no I/O. [`WebhookBlock`] is
//! opt-in: it makes one blocking HTTP call per new block on the polling
//! thread, outside the cycle timeout, capped by `timeout_secs` (and a 5 s
//! connect timeout). A slow endpoint delays the cycle by at most that much
//! per newly blocked address.

use crate::config::BlockActionConfig;
use crate::error::{ActionError, ConfigError};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

pub trait BlockAction {
    fn notify_block(&self, address: &str) -> Result<(), ActionError>;
}

/// Build the configured action.
pub fn from_config(config: &BlockActionConfig) -> Result<Box<dyn BlockAction>, ConfigError> {
    match config {
        BlockActionConfig::Simulated => Ok(Box::new(SimulatedBlock)),
        BlockActionConfig::Webhook {
            endpoint,
            timeout_secs,
        } => Ok(Box::new(WebhookBlock::new(endpoint, *timeout_secs)?)),
    }
}

/// Records the decision in the log only.
pub struct SimulatedBlock;

impl BlockAction for SimulatedBlock {
    fn notify_block(&self, address: &str) -> Result<(), ActionError> {
        warn!(address, "blocking address (simulated)");
        Ok(())
    }
}

#[derive(Serialize)]
struct BlockPayload<'a> {
    address: &'a str,
    blocked_at: String,
    source: &'static str,
}

/// POSTs each decision to an external enforcement endpoint.
pub struct WebhookBlock {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl WebhookBlock {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("webhook client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl BlockAction for WebhookBlock {
    fn notify_block(&self, address: &str) -> Result<(), ActionError> {
        let payload = BlockPayload {
            address,
            blocked_at: Utc::now().to_rfc3339(),
            source: env!("CARGO_PKG_NAME"),
        };
        let res = self.client.post(&self.endpoint).json(&payload).send()?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_default();
            return Err(ActionError::Status { status, body });
        }
        tracing::info!(address, endpoint = %self.endpoint, "block sent to enforcement");
        Ok(())
    }
}
