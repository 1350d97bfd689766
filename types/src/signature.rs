//! Transaction signature (id) type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::truncate_middle;

/// The base-58 signature identifying a broadcast transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form: first 8 and last 4 characters.
    pub fn truncated(&self) -> String {
        truncate_middle(&self.0)
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_form() {
        let sig = TxSignature::new("5VERYLongSignatureStringWithManyChars9xYz");
        assert_eq!(sig.truncated(), "5VERYLon...9xYz");
    }

    #[test]
    fn short_signature_untruncated() {
        let sig = TxSignature::new("abcd");
        assert_eq!(sig.truncated(), "abcd");
    }

    #[test]
    fn non_ascii_signature_truncates_without_panic() {
        // Ids come straight from the node response; a malformed one must
        // still render.
        let sig = TxSignature::new("αβγδεζηθικλμνξοπρςστυφχψω");
        assert_eq!(sig.truncated(), "αβγδεζηθ...φχψω");
    }
}
