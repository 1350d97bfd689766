use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint could not be reached at the transport level.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The node answered but refused or garbled the request.
    #[error("node rejected request: {0}")]
    NodeRejected(String),
}
