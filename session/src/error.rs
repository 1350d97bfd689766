use thiserror::Error;

use solbridge_gateway::GatewayError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A ledger lookup made on the session's behalf failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// No wallet provider is installed in the host environment.
    #[error("no wallet provider found")]
    NoProviderFound,

    /// The provider declined the connection handshake, or the user
    /// abandoned it.
    #[error("connection handshake rejected: {0}")]
    HandshakeRejected(String),

    /// The provider declined to sign, or the user abandoned the request.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// A signature was requested without a connected wallet.
    #[error("no wallet connected")]
    NotConnected,

    /// A connect was issued while another connect is still in flight.
    #[error("a connection attempt is already in progress")]
    ConnectInProgress,

    /// A connect was issued while a wallet is already attached.
    #[error("a wallet is already connected")]
    AlreadyConnected,
}
