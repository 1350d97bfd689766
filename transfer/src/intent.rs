//! Transfer intent and sizing arithmetic.

use serde::Serialize;

use solbridge_types::{AccountAddress, Blockhash, Lamports};

/// Fraction of the spendable balance moved per transfer, in basis points.
pub const DEFAULT_SPEND_FRACTION_BPS: u32 = 9_900;

/// A value-transfer to be signed and broadcast.
///
/// Constructed fresh per attempt while an identity is live; never
/// persisted. The fee payer is always the source account.
#[derive(Clone, Debug, Serialize)]
pub struct TransferIntent {
    pub source: AccountAddress,
    pub destination: AccountAddress,
    pub amount: Lamports,
    pub fee_payer: AccountAddress,
    /// Recent anchor bounding the intent's validity window.
    pub anchor: Blockhash,
}

impl TransferIntent {
    /// Canonical byte payload handed to the provider adapter for signing.
    pub fn payload(&self) -> Vec<u8> {
        // Serialization of a struct of strings and an integer cannot fail.
        serde_json::to_vec(self).expect("intent serialization")
    }
}

/// Balance available above the rent-exemption floor.
pub fn spendable(balance: Lamports, min_rent: Lamports) -> Lamports {
    balance.saturating_sub(min_rent)
}

/// Size the transfer: `floor(spendable × bps / 10_000)`.
///
/// Widened to u128 for the intermediate product, so the full u64 range
/// is safe.
pub fn sized_amount(spendable: Lamports, bps: u32) -> Lamports {
    let amount = (spendable.raw() as u128) * (bps as u128) / 10_000;
    Lamports::new(amount as u64)
}
