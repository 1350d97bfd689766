//! The wallet-provider contract.
//!
//! A provider is a browser- or app-level agent holding the user's key
//! material. The client never sees keys; it asks the provider to connect
//! (yielding the account address) and to sign transfer payloads. Each
//! known provider gets its own adapter implementing [`WalletProvider`] —
//! no duck typing.

use async_trait::async_trait;
use thiserror::Error;

use solbridge_types::AccountAddress;

/// The wallet products this client knows how to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Phantom,
    Solflare,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Phantom => "Phantom",
            ProviderKind::Solflare => "Solflare",
        }
    }

    /// Whether this provider is preferred when several are installed.
    pub fn is_primary(&self) -> bool {
        matches!(self, ProviderKind::Phantom)
    }
}

/// Failures raised by a provider adapter.
///
/// Adapters must catch whatever their underlying provider throws and
/// express it here; raw provider errors never cross this boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("request declined: {0}")]
    Declined(String),
}

/// Connect/sign operations a wallet provider exposes.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Run the connection handshake; yields the authenticated address.
    async fn connect(&self) -> Result<AccountAddress, ProviderError>;

    /// Sign a serialized transfer payload; yields the signed transaction
    /// bytes ready for broadcast.
    async fn sign_transfer(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError>;
}
