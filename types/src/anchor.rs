//! Recent-anchor token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recent blockhash a transaction binds to.
///
/// Binding an anchor bounds the transaction's validity window so it cannot
/// be replayed indefinitely. The token is opaque to the client; it is
/// fetched fresh per attempt and handed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blockhash(String);

impl Blockhash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
