//! Lamport amount type.
//!
//! Amounts are fixed-point integers (u64) in the ledger's smallest unit.
//! Display denominations are derived by a fixed divisor; arithmetic never
//! touches floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::time::Timestamp;

/// Lamports per whole SOL — the fixed display divisor.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// A non-negative amount in the ledger's smallest unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lamports(u64);

impl Lamports {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Display form in whole SOL with four decimal places, e.g. `1.0000 SOL`.
    ///
    /// The fourth decimal rounds to nearest, carrying into the whole part
    /// when it overflows.
    pub fn to_sol_string(&self) -> String {
        // Widened so the half-unit bias cannot overflow near u64::MAX.
        let half_unit = (LAMPORTS_PER_SOL / 20_000) as u128;
        let units = (self.0 as u128 + half_unit) / (LAMPORTS_PER_SOL / 10_000) as u128;
        let whole = units / 10_000;
        let frac = units % 10_000;
        format!("{whole}.{frac:04} SOL")
    }
}

impl Add for Lamports {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Lamports {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lamports", self.0)
    }
}

/// A point-in-time balance reading.
///
/// Snapshots are recomputed on demand before any transfer decision and
/// never reused across attempts — a stale reading would corrupt the
/// rent-exemption check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub lamports: Lamports,
    pub as_of: Timestamp,
}

impl BalanceSnapshot {
    pub fn new(lamports: Lamports, as_of: Timestamp) -> Self {
        Self { lamports, as_of }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sol_string_whole_unit() {
        assert_eq!(Lamports::new(LAMPORTS_PER_SOL).to_sol_string(), "1.0000 SOL");
    }

    #[test]
    fn sol_string_rounds_to_nearest() {
        // 0.9899901 SOL rounds up to 0.9900.
        assert_eq!(Lamports::new(989_990_100).to_sol_string(), "0.9900 SOL");
        // 0.98994 SOL rounds down.
        assert_eq!(Lamports::new(989_940_000).to_sol_string(), "0.9899 SOL");
    }

    #[test]
    fn sol_string_rounding_carries_into_whole() {
        assert_eq!(Lamports::new(999_999_950).to_sol_string(), "1.0000 SOL");
        assert_eq!(Lamports::new(999_949_999).to_sol_string(), "0.9999 SOL");
    }

    #[test]
    fn sol_string_max_balance_does_not_overflow() {
        assert_eq!(
            Lamports::new(u64::MAX).to_sol_string(),
            "18446744073.7096 SOL"
        );
    }

    #[test]
    fn sol_string_zero() {
        assert_eq!(Lamports::ZERO.to_sol_string(), "0.0000 SOL");
    }

    #[test]
    fn sol_string_sub_sol() {
        assert_eq!(Lamports::new(500_000_000).to_sol_string(), "0.5000 SOL");
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let a = Lamports::new(5);
        let b = Lamports::new(10);
        assert_eq!(a.saturating_sub(b), Lamports::ZERO);
    }

    #[test]
    fn checked_sub_underflow_is_none() {
        assert!(Lamports::new(5).checked_sub(Lamports::new(10)).is_none());
    }
}
