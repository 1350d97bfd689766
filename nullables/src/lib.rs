//! Nullable infrastructure for deterministic testing.
//!
//! The client's external dependencies — clock, ledger node, wallet
//! provider, host actions — are all behind traits. This crate provides
//! test-friendly implementations that return scripted values, can be
//! controlled programmatically, and never touch the network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod host;
pub mod ledger;
pub mod provider;

pub use clock::NullClock;
pub use host::NullHost;
pub use ledger::NullLedger;
pub use provider::NullProvider;
