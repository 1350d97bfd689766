//! Nullable wallet provider — scripted connect/sign outcomes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use solbridge_session::{ProviderError, ProviderKind, WalletProvider};
use solbridge_types::AccountAddress;

/// A [`WalletProvider`] that connects and signs without any key material.
///
/// Signing "works" by echoing the payload back with a marker prefix, so
/// tests can verify exactly what was signed and broadcast.
pub struct NullProvider {
    kind: ProviderKind,
    address: String,
    decline_connect: AtomicBool,
    decline_sign: AtomicBool,

    pub connect_calls: AtomicUsize,
    pub sign_calls: AtomicUsize,
    /// Payloads handed to `sign_transfer`, in call order.
    pub signed_payloads: Mutex<Vec<Vec<u8>>>,
}

/// Marker prepended to signed payloads.
pub const SIGNED_PREFIX: &[u8] = b"signed:";

impl NullProvider {
    pub fn new(kind: ProviderKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
            decline_connect: AtomicBool::new(false),
            decline_sign: AtomicBool::new(false),
            connect_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
            signed_payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn declining_connect(self) -> Self {
        self.decline_connect.store(true, Ordering::SeqCst);
        self
    }

    pub fn declining_sign(self) -> Self {
        self.decline_sign.store(true, Ordering::SeqCst);
        self
    }

    /// Flip the sign behavior mid-test.
    pub fn set_decline_sign(&self, decline: bool) {
        self.decline_sign.store(decline, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletProvider for NullProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn connect(&self) -> Result<AccountAddress, ProviderError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.decline_connect.load(Ordering::SeqCst) {
            return Err(ProviderError::Declined("connection declined".into()));
        }
        AccountAddress::parse(&self.address)
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    async fn sign_transfer(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.signed_payloads.lock().unwrap().push(payload.to_vec());
        if self.decline_sign.load(Ordering::SeqCst) {
            return Err(ProviderError::Declined("signature declined".into()));
        }
        let mut signed = SIGNED_PREFIX.to_vec();
        signed.extend_from_slice(payload);
        Ok(signed)
    }
}
