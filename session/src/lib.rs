//! Wallet session management for the solbridge client.
//!
//! Owns the connect/disconnect lifecycle and the authenticated identity —
//! the single source of truth for "is a wallet attached". Providers are
//! explicit [`WalletProvider`] adapters selected by [`ProviderDetector`];
//! mobile hand-off and the extension-store fallback are one-way signals
//! emitted through the [`HostActions`] seam.

pub mod detect;
pub mod error;
pub mod host;
pub mod provider;
pub mod session;

pub use detect::{BrowserFamily, Capabilities, HostEnvironment, ProviderDetector};
pub use error::SessionError;
pub use host::{HandoffConfig, HostActions, SessionConfig, StoreConfig};
pub use provider::{ProviderError, ProviderKind, WalletProvider};
pub use session::{ConnectOutcome, SessionState, WalletIdentity, WalletSession};
