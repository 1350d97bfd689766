//! Ledger node gateway.
//!
//! A stateless request façade over the remote node's JSON-RPC endpoint:
//! balance lookup, rent-exemption minimum, recent-anchor fetch, raw
//! transaction broadcast, and confirmation polling. The [`LedgerRpc`]
//! trait is the seam the rest of the workspace programs against; the
//! [`LedgerGateway`] is its HTTP implementation.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::LedgerGateway;
pub use error::GatewayError;
pub use rpc::{Commitment, ConfirmStatus, LedgerRpc, RpcConfig};
