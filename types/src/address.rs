//! Base-58 account address type.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::TypeError;

/// An opaque ledger account identifier, carried as a base-58 string.
///
/// The address is treated as opaque everywhere except validation: the
/// client never derives keys or decodes the account bytes itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountAddress(String);

// Deserialization runs through `parse` so config files and RPC payloads
// cannot smuggle in a malformed address.
impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AccountAddress::parse(raw).map_err(D::Error::custom)
    }
}

impl AccountAddress {
    /// Parse and validate a base-58 account address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypeError::InvalidAddress("empty address".into()));
        }
        bs58::decode(&s)
            .into_vec()
            .map_err(|e| TypeError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form: first 8 and last 4 characters.
    pub fn truncated(&self) -> String {
        truncate_middle(&self.0)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `XXXXXXXX...XXXX` display form used for addresses and transaction ids.
///
/// Identifiers of 12 characters or fewer are returned unchanged. Counts
/// characters, not bytes: transaction ids arrive unvalidated from the
/// node, so a non-ASCII id must not land on a byte slice mid-character.
pub(crate) fn truncate_middle(s: &str) -> String {
    let count = s.chars().count();
    if count <= 12 {
        return s.to_string();
    }
    let head: String = s.chars().take(8).collect();
    let tail: String = s.chars().skip(count - 4).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_base58() {
        let addr = AccountAddress::parse("4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T").unwrap();
        assert_eq!(
            addr.as_str(),
            "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T"
        );
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(AccountAddress::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_base58() {
        // '0', 'O', 'I', 'l' are outside the base-58 alphabet.
        assert!(AccountAddress::parse("0OIl").is_err());
    }

    #[test]
    fn truncated_keeps_head_and_tail() {
        let addr = AccountAddress::parse("4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T").unwrap();
        assert_eq!(addr.truncated(), "4Nd1mBQt...DB4T");
    }

    #[test]
    fn truncated_leaves_short_ids_alone() {
        let addr = AccountAddress::parse("abc").unwrap();
        assert_eq!(addr.truncated(), "abc");
    }
}
