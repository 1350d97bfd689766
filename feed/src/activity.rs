//! Bounded, newest-first activity log.

use std::collections::VecDeque;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use solbridge_types::Timestamp;

use crate::FeedEvent;

/// Default number of entries the log retains.
pub const DEFAULT_CAPACITY: usize = 3;

/// What a logged event was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActivityKind {
    TokenTransfer,
    TokenSwap,
    NftPurchase,
    WalletConnected,
    VoteTransfer,
}

impl ActivityKind {
    /// Display label shown in the activity list.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::TokenTransfer => "Token Transfer",
            ActivityKind::TokenSwap => "Token Swap",
            ActivityKind::NftPurchase => "NFT Purchase",
            ActivityKind::WalletConnected => "Wallet Connected",
            ActivityKind::VoteTransfer => "Vote Transfer",
        }
    }

    /// Glyph tag rendered next to the entry.
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::TokenTransfer | ActivityKind::VoteTransfer => "\u{1F4B8}",
            ActivityKind::TokenSwap => "\u{1F504}",
            ActivityKind::NftPurchase => "\u{1F3A8}",
            ActivityKind::WalletConnected => "\u{1F517}",
        }
    }
}

/// Whether the amount column renders as credit, debit, or neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountSign {
    Positive,
    Negative,
    Neutral,
}

/// A single row of the activity list.
#[derive(Clone, Debug, Serialize)]
pub struct ActivityEntry {
    pub icon: String,
    /// Truncated transaction id or address for display.
    pub hash: String,
    pub kind: ActivityKind,
    /// Signed display string, e.g. "-0.5000 SOL"; empty for neutral rows.
    pub amount_label: String,
    pub timestamp: Timestamp,
    pub sign: AmountSign,
}

impl ActivityEntry {
    pub fn new(
        kind: ActivityKind,
        hash: impl Into<String>,
        amount_label: impl Into<String>,
        sign: AmountSign,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            icon: kind.icon().to_string(),
            hash: hash.into(),
            kind,
            amount_label: amount_label.into(),
            timestamp,
            sign,
        }
    }

    /// Entry recorded when a wallet attaches; carries no amount.
    pub fn wallet_connected(truncated_address: impl Into<String>, now: Timestamp) -> Self {
        Self::new(
            ActivityKind::WalletConnected,
            truncated_address,
            "",
            AmountSign::Neutral,
            now,
        )
    }

    /// Relative age of this entry at `now`.
    pub fn time_ago(&self, now: Timestamp) -> String {
        self.timestamp.time_ago(now)
    }
}

/// Bounded, insertion-ordered record of wallet events, newest first.
///
/// The trim to capacity happens under the same lock as the insert, so no
/// observer ever sees a transient over-length list.
pub struct ActivityLog {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
    events: broadcast::Sender<FeedEvent>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            events,
        }
    }

    /// A log pre-populated with the three sample rows the interface shows
    /// before any real wallet event arrives.
    pub fn seeded(capacity: usize, now: Timestamp) -> Self {
        let log = Self::new(capacity);
        let samples = [
            ActivityEntry::new(
                ActivityKind::NftPurchase,
                "2pQ5...7hT9",
                "-0.8 SOL",
                AmountSign::Negative,
                now.saturating_sub_millis(12 * 60_000),
            ),
            ActivityEntry::new(
                ActivityKind::TokenSwap,
                "4mL7...9kR8",
                "+1.2 USDC",
                AmountSign::Positive,
                now.saturating_sub_millis(5 * 60_000),
            ),
            ActivityEntry::new(
                ActivityKind::TokenTransfer,
                "8xK9...3nP2",
                "-0.5 SOL",
                AmountSign::Negative,
                now.saturating_sub_millis(2 * 60_000),
            ),
        ];
        {
            // Constructor context: nothing else can hold the lock yet.
            let mut entries = log.entries.try_lock().expect("fresh log lock");
            for entry in samples {
                entries.push_front(entry);
            }
            entries.truncate(log.capacity);
        }
        log
    }

    /// Get a receiver notified on every recorded entry.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Prepend an entry, dropping the oldest beyond capacity.
    pub async fn record(&self, entry: ActivityEntry) {
        let mut entries = self.entries.lock().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
        drop(entries);
        let _ = self.events.send(FeedEvent::ActivityRecorded);
    }

    /// Snapshot of the log, newest first.
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
