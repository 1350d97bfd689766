//! HTTP implementation of the ledger RPC seam.
//!
//! Wraps `reqwest::Client` with the node's endpoint and speaks the node's
//! JSON-RPC 2.0 dialect. One instance serves the whole client; every
//! method is a single request except [`LedgerRpc::confirm`], which polls
//! until the target commitment or the caller's deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};

use solbridge_types::{AccountAddress, Blockhash, Lamports, TxSignature};

use crate::error::GatewayError;
use crate::rpc::{ConfirmStatus, LedgerRpc, RpcConfig};

/// JSON-RPC client for the configured ledger node.
pub struct LedgerGateway {
    http: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl LedgerGateway {
    /// Create a gateway targeting the configured endpoint.
    pub fn new(config: RpcConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                GatewayError::NetworkUnavailable(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        tracing::debug!(method, "ledger rpc call");

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::NetworkUnavailable(format!("{method} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GatewayError::NodeRejected(format!(
                "{method} returned HTTP {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::NodeRejected(format!("invalid JSON response: {e}")))?;

        extract_result(payload)
    }

    fn commitment_param(&self) -> Value {
        json!({ "commitment": self.config.commitment.as_str() })
    }
}

/// Pull `result` out of a JSON-RPC response, converting the node's error
/// object into a rejection.
fn extract_result(payload: Value) -> Result<Value, GatewayError> {
    if let Some(err) = payload.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified node error");
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        return Err(GatewayError::NodeRejected(format!("{message} (code {code})")));
    }
    payload
        .get("result")
        .cloned()
        .ok_or_else(|| GatewayError::NodeRejected("response missing result".into()))
}

/// `{ "value": ... }` envelope most account queries come wrapped in.
#[derive(Debug, Deserialize)]
struct ValueEnvelope<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// One entry of a `getSignatureStatuses` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    #[serde(default)]
    confirmation_status: Option<String>,
    #[serde(default)]
    err: Option<Value>,
}

fn decode<T: for<'de> Deserialize<'de>>(
    method: &str,
    result: Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(result)
        .map_err(|e| GatewayError::NodeRejected(format!("invalid {method} response: {e}")))
}

#[async_trait]
impl LedgerRpc for LedgerGateway {
    async fn get_balance(&self, address: &AccountAddress) -> Result<Lamports, GatewayError> {
        let result = self
            .rpc_call(
                "getBalance",
                json!([address.as_str(), self.commitment_param()]),
            )
            .await?;
        let envelope: ValueEnvelope<u64> = decode("getBalance", result)?;
        Ok(Lamports::new(envelope.value))
    }

    async fn get_minimum_rent_exempt_balance(&self) -> Result<Lamports, GatewayError> {
        // Data length 0: the floor for a plain system account.
        let result = self
            .rpc_call("getMinimumBalanceForRentExemption", json!([0]))
            .await?;
        let raw: u64 = decode("getMinimumBalanceForRentExemption", result)?;
        Ok(Lamports::new(raw))
    }

    async fn get_recent_anchor(&self) -> Result<Blockhash, GatewayError> {
        let result = self
            .rpc_call("getLatestBlockhash", json!([self.commitment_param()]))
            .await?;
        let envelope: ValueEnvelope<BlockhashValue> = decode("getLatestBlockhash", result)?;
        Ok(Blockhash::new(envelope.value.blockhash))
    }

    async fn broadcast(&self, signed_tx: &[u8]) -> Result<TxSignature, GatewayError> {
        let encoded = BASE64.encode(signed_tx);
        let result = self
            .rpc_call("sendTransaction", json!([encoded, { "encoding": "base64" }]))
            .await?;
        let signature: String = decode("sendTransaction", result)?;
        tracing::info!(signature = %signature, "transaction broadcast");
        Ok(TxSignature::new(signature))
    }

    async fn confirm(
        &self,
        signature: &TxSignature,
        timeout: Duration,
    ) -> Result<ConfirmStatus, GatewayError> {
        let deadline = Instant::now() + timeout;
        let poll = Duration::from_millis(self.config.confirm_poll_ms);

        loop {
            let result = self
                .rpc_call(
                    "getSignatureStatuses",
                    json!([[signature.as_str()], { "searchTransactionHistory": false }]),
                )
                .await?;
            let envelope: ValueEnvelope<Vec<Option<SignatureStatus>>> =
                decode("getSignatureStatuses", result)?;

            if let Some(Some(status)) = envelope.value.first() {
                if let Some(err) = &status.err {
                    return Err(GatewayError::NodeRejected(format!(
                        "transaction failed on chain: {err}"
                    )));
                }
                if let Some(reported) = &status.confirmation_status {
                    if self.config.commitment.satisfied_by(reported) {
                        tracing::info!(signature = %signature, status = %reported, "transaction confirmed");
                        return Ok(ConfirmStatus::Confirmed);
                    }
                }
            }

            if Instant::now() + poll > deadline {
                tracing::warn!(signature = %signature, "confirmation wait timed out");
                return Ok(ConfirmStatus::TimedOut);
            }
            sleep(poll).await;
        }
    }
}
