//! Transfer orchestration for the solbridge client.
//!
//! Given a live wallet session, the [`TransferOrchestrator`] runs one
//! staged attempt: size the transfer from a fresh balance reading, build
//! the intent, hand it to the provider for signing, broadcast it, and
//! wait for confirmation — fanning the outcome out to the notification
//! and activity feeds. [`Bridge`] wires the whole client together from a
//! [`BridgeConfig`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod intent;
pub mod orchestrator;

pub use bridge::Bridge;
pub use config::{BridgeConfig, ConfigError, FeedConfig};
pub use error::TransferError;
pub use intent::TransferIntent;
pub use orchestrator::{Stage, TransferConfig, TransferOrchestrator, TransferOutcome};
