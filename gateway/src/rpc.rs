//! The RPC seam: trait, commitment levels, and gateway configuration.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use solbridge_types::{AccountAddress, Blockhash, Lamports, TxSignature};

use crate::error::GatewayError;

/// Commitment level requested from the node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    /// Whether a reported status satisfies this commitment target.
    pub fn satisfied_by(&self, reported: &str) -> bool {
        let rank = |s: &str| match s {
            "processed" => 1,
            "confirmed" => 2,
            "finalized" => 3,
            _ => 0,
        };
        rank(reported) >= rank(self.as_str())
    }
}

/// Terminal outcome of waiting for a confirmation.
///
/// `TimedOut` is not a failure: the transaction may still land after the
/// caller stopped waiting, so it is surfaced as an unknown outcome and the
/// caller must not resubmit automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmStatus {
    Confirmed,
    TimedOut,
}

/// Gateway configuration with TOML-friendly defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// The single configured node endpoint.
    pub endpoint: String,

    #[serde(default)]
    pub commitment: Commitment,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Interval between confirmation polls.
    #[serde(default = "default_confirm_poll_ms")]
    pub confirm_poll_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_confirm_poll_ms() -> u64 {
    500
}

impl RpcConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            commitment: Commitment::default(),
            request_timeout_ms: default_request_timeout_ms(),
            confirm_poll_ms: default_confirm_poll_ms(),
        }
    }
}

/// Typed operations the client needs from the remote node.
///
/// Every call is independently failable; implementations map transport
/// faults to [`GatewayError::NetworkUnavailable`] and node-level refusals
/// to [`GatewayError::NodeRejected`].
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current balance of an account, in the smallest unit.
    async fn get_balance(&self, address: &AccountAddress) -> Result<Lamports, GatewayError>;

    /// Smallest balance an account must retain to remain rent exempt.
    async fn get_minimum_rent_exempt_balance(&self) -> Result<Lamports, GatewayError>;

    /// A recent anchor token for binding a transaction's validity window.
    async fn get_recent_anchor(&self) -> Result<Blockhash, GatewayError>;

    /// Submit a signed transaction; returns its id.
    async fn broadcast(&self, signed_tx: &[u8]) -> Result<TxSignature, GatewayError>;

    /// Wait until the node reports the transaction at the target
    /// commitment, or until `timeout` elapses.
    async fn confirm(
        &self,
        signature: &TxSignature,
        timeout: Duration,
    ) -> Result<ConfirmStatus, GatewayError>;
}
