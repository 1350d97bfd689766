use thiserror::Error;

use solbridge_gateway::GatewayError;
use solbridge_session::SessionError;
use solbridge_types::Lamports;

use crate::orchestrator::Stage;

#[derive(Debug, Error)]
pub enum TransferError {
    /// Another attempt is running against the same session.
    #[error("a transfer is already in flight")]
    TransferInFlight,

    /// The session refused (not connected, signing rejected, ...).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Nothing spendable above the rent floor; no intent was built.
    #[error("insufficient funds: balance {balance}, rent floor {min_rent}")]
    InsufficientFunds {
        balance: Lamports,
        min_rent: Lamports,
    },

    /// The node refused the broadcast, or it never reached the node.
    #[error("broadcast rejected: {0}")]
    BroadcastRejected(GatewayError),

    /// A ledger lookup failed at the named stage.
    #[error("{stage} failed: {source}")]
    Rpc {
        stage: Stage,
        source: GatewayError,
    },
}

impl TransferError {
    /// Single user-facing message for the stage that failed.
    pub fn user_message(&self) -> String {
        match self {
            TransferError::TransferInFlight => "A transfer is already in progress.".to_string(),
            TransferError::Session(SessionError::NotConnected) => {
                "Connect a wallet before transferring.".to_string()
            }
            TransferError::Session(SessionError::SigningRejected(_)) => {
                "Transaction signing was rejected.".to_string()
            }
            TransferError::Session(_) => "Wallet session error.".to_string(),
            TransferError::InsufficientFunds { .. } => {
                "Insufficient funds for transfer.".to_string()
            }
            TransferError::BroadcastRejected(_) => {
                "Transaction broadcast was rejected.".to_string()
            }
            TransferError::Rpc { stage, .. } => format!("Transfer failed while {stage}."),
        }
    }
}
