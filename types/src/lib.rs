//! Fundamental types for the solbridge client.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, lamport amounts, transaction signatures,
//! blockhash anchors, and timestamps.

pub mod address;
pub mod amount;
pub mod anchor;
pub mod error;
pub mod signature;
pub mod time;

pub use address::AccountAddress;
pub use amount::{BalanceSnapshot, Lamports};
pub use anchor::Blockhash;
pub use error::TypeError;
pub use signature::TxSignature;
pub use time::Timestamp;
