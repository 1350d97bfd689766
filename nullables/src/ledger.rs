//! Nullable ledger — scripted RPC results and call accounting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use solbridge_gateway::{ConfirmStatus, GatewayError, LedgerRpc};
use solbridge_types::{AccountAddress, Blockhash, Lamports, TxSignature};

/// A scripted outcome for one RPC operation.
#[derive(Clone, Debug)]
pub enum Scripted<T> {
    Ok(T),
    NetworkUnavailable(String),
    NodeRejected(String),
}

impl<T: Clone> Scripted<T> {
    fn resolve(&self) -> Result<T, GatewayError> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::NetworkUnavailable(msg) => {
                Err(GatewayError::NetworkUnavailable(msg.clone()))
            }
            Scripted::NodeRejected(msg) => Err(GatewayError::NodeRejected(msg.clone())),
        }
    }
}

/// A [`LedgerRpc`] implementation backed entirely by scripted values.
///
/// Every operation counts its invocations so tests can assert on what
/// network traffic a flow did (or did not) produce.
pub struct NullLedger {
    balance: Mutex<Scripted<u64>>,
    min_rent: Mutex<Scripted<u64>>,
    anchor: Mutex<Scripted<String>>,
    broadcast: Mutex<Scripted<String>>,
    confirm: Mutex<Scripted<ConfirmStatus>>,
    confirm_gate: Mutex<Option<Arc<Notify>>>,

    pub balance_calls: AtomicUsize,
    pub rent_calls: AtomicUsize,
    pub anchor_calls: AtomicUsize,
    pub broadcast_calls: AtomicUsize,
    pub confirm_calls: AtomicUsize,

    /// Raw payloads handed to `broadcast`, in call order.
    pub broadcasts: Mutex<Vec<Vec<u8>>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            balance: Mutex::new(Scripted::Ok(0)),
            min_rent: Mutex::new(Scripted::Ok(0)),
            anchor: Mutex::new(Scripted::Ok("NULLANCHOR".to_string())),
            broadcast: Mutex::new(Scripted::Ok(
                "5SignatureSignatureSignatureSignature1111".to_string(),
            )),
            confirm: Mutex::new(Scripted::Ok(ConfirmStatus::Confirmed)),
            confirm_gate: Mutex::new(None),
            balance_calls: AtomicUsize::new(0),
            rent_calls: AtomicUsize::new(0),
            anchor_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(self, lamports: u64) -> Self {
        self.set_balance(Scripted::Ok(lamports));
        self
    }

    pub fn with_min_rent(self, lamports: u64) -> Self {
        *self.min_rent.lock().unwrap() = Scripted::Ok(lamports);
        self
    }

    pub fn with_confirm(self, status: ConfirmStatus) -> Self {
        *self.confirm.lock().unwrap() = Scripted::Ok(status);
        self
    }

    pub fn with_broadcast_result(self, scripted: Scripted<String>) -> Self {
        *self.broadcast.lock().unwrap() = scripted;
        self
    }

    pub fn with_anchor_result(self, scripted: Scripted<String>) -> Self {
        *self.anchor.lock().unwrap() = scripted;
        self
    }

    pub fn with_balance_result(self, scripted: Scripted<u64>) -> Self {
        self.set_balance(scripted);
        self
    }

    /// Change the scripted balance mid-test.
    pub fn set_balance(&self, scripted: Scripted<u64>) {
        *self.balance.lock().unwrap() = scripted;
    }

    /// Hold every `confirm` call until the gate is notified, so tests can
    /// overlap attempts deterministically.
    pub fn gated_confirm(self, gate: Arc<Notify>) -> Self {
        *self.confirm_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.rent_calls.load(Ordering::SeqCst)
            + self.anchor_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.confirm_calls.load(Ordering::SeqCst)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for NullLedger {
    async fn get_balance(&self, _address: &AccountAddress) -> Result<Lamports, GatewayError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance.lock().unwrap().resolve().map(Lamports::new)
    }

    async fn get_minimum_rent_exempt_balance(&self) -> Result<Lamports, GatewayError> {
        self.rent_calls.fetch_add(1, Ordering::SeqCst);
        self.min_rent.lock().unwrap().resolve().map(Lamports::new)
    }

    async fn get_recent_anchor(&self) -> Result<Blockhash, GatewayError> {
        self.anchor_calls.fetch_add(1, Ordering::SeqCst);
        self.anchor.lock().unwrap().resolve().map(Blockhash::new)
    }

    async fn broadcast(&self, signed_tx: &[u8]) -> Result<TxSignature, GatewayError> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        self.broadcasts.lock().unwrap().push(signed_tx.to_vec());
        self.broadcast.lock().unwrap().resolve().map(TxSignature::new)
    }

    async fn confirm(
        &self,
        _signature: &TxSignature,
        _timeout: Duration,
    ) -> Result<ConfirmStatus, GatewayError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.confirm_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.confirm.lock().unwrap().resolve()
    }
}
