//! Transient user-facing notifications with automatic expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use solbridge_types::Timestamp;

use crate::FeedEvent;

/// Default time-to-live for a notification, in milliseconds.
pub const DEFAULT_TTL_MS: u64 = 5_000;

/// How a notification is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A single transient message shown to the user.
#[derive(Clone, Debug, Serialize)]
pub struct Notification {
    /// Unique monotonic token, used for dismissal.
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    /// Instant after which the notification is expired.
    pub expires_at: Timestamp,
}

/// Owned store of live notifications.
///
/// Inserts, dismissals and expiry sweeps all run under one lock, so
/// concurrent event sources (connect flow, transfer stages, feature
/// stubs) never lose entries to interleaving. Each entry expires
/// automatically after the configured TTL or on explicit dismissal,
/// whichever comes first.
pub struct NotificationCenter {
    ttl_millis: u64,
    next_id: AtomicU64,
    entries: Mutex<Vec<Notification>>,
    events: broadcast::Sender<FeedEvent>,
}

impl NotificationCenter {
    pub fn new(ttl_millis: u64) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            ttl_millis,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Get a receiver that is notified on every insert, dismissal and expiry.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Insert a new notification and return its id.
    pub async fn push(&self, message: impl Into<String>, severity: Severity, now: Timestamp) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            expires_at: now.saturating_add_millis(self.ttl_millis),
        };
        self.entries.lock().await.push(notification);
        let _ = self.events.send(FeedEvent::NotificationPushed(id));
        id
    }

    /// Dismiss a notification by id.
    ///
    /// Idempotent: dismissing an unknown or already-dismissed id is a no-op
    /// and returns `false`.
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|n| n.id != id);
        let removed = entries.len() < before;
        drop(entries);
        if removed {
            let _ = self.events.send(FeedEvent::NotificationDismissed(id));
        }
        removed
    }

    /// Remove every notification whose TTL has elapsed at `now`.
    ///
    /// Returns the ids that were expired.
    pub async fn sweep(&self, now: Timestamp) -> Vec<u64> {
        let mut entries = self.entries.lock().await;
        let mut expired = Vec::new();
        entries.retain(|n| {
            if now >= n.expires_at {
                expired.push(n.id);
                false
            } else {
                true
            }
        });
        drop(entries);
        for id in &expired {
            let _ = self.events.send(FeedEvent::NotificationExpired(*id));
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "expired notifications");
        }
        expired
    }

    /// Snapshot of the notifications still live at `now`, oldest first.
    pub async fn active(&self, now: Timestamp) -> Vec<Notification> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|n| now < n.expires_at)
            .cloned()
            .collect()
    }

    /// Spawn the periodic expiry task.
    ///
    /// Runs independently of any rendering; abort the returned handle to
    /// stop it.
    pub fn spawn_expiry(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let center = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                center.sweep(Timestamp::now()).await;
            }
        })
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_then_active() {
        let center = NotificationCenter::new(5_000);
        let now = Timestamp::new(1_000);
        center.push("connected", Severity::Success, now).await;
        let active = center.active(now).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "connected");
        assert_eq!(active[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn expires_after_ttl_even_without_dismissal() {
        let center = NotificationCenter::new(5_000);
        let now = Timestamp::new(1_000);
        let id = center.push("will expire", Severity::Info, now).await;

        // Still visible just before the deadline.
        assert_eq!(center.active(Timestamp::new(5_999)).await.len(), 1);

        let expired = center.sweep(Timestamp::new(6_000)).await;
        assert_eq!(expired, vec![id]);
        assert!(center.active(Timestamp::new(6_000)).await.is_empty());
    }

    #[tokio::test]
    async fn dismissal_is_immediate_and_idempotent() {
        let center = NotificationCenter::new(5_000);
        let now = Timestamp::new(0);
        let id = center.push("dismiss me", Severity::Error, now).await;

        assert!(center.dismiss(id).await);
        assert!(center.active(now).await.is_empty());

        // Second dismissal is a no-op.
        assert!(!center.dismiss(id).await);
    }

    #[tokio::test]
    async fn ids_are_unique_and_monotonic() {
        let center = NotificationCenter::new(5_000);
        let now = Timestamp::new(0);
        let a = center.push("a", Severity::Info, now).await;
        let b = center.push("b", Severity::Info, now).await;
        assert!(b > a);
    }

    #[tokio::test]
    async fn concurrent_pushes_lose_nothing() {
        let center = Arc::new(NotificationCenter::new(60_000));
        let now = Timestamp::new(0);
        let mut handles = Vec::new();
        for i in 0..32 {
            let center = Arc::clone(&center);
            handles.push(tokio::spawn(async move {
                center.push(format!("n{i}"), Severity::Info, now).await
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(center.active(now).await.len(), 32);
    }

    #[tokio::test]
    async fn subscribers_see_push_and_dismiss() {
        let center = NotificationCenter::new(5_000);
        let mut rx = center.subscribe();
        let id = center.push("hello", Severity::Info, Timestamp::new(0)).await;
        center.dismiss(id).await;
        assert_eq!(rx.recv().await.unwrap(), FeedEvent::NotificationPushed(id));
        assert_eq!(
            rx.recv().await.unwrap(),
            FeedEvent::NotificationDismissed(id)
        );
    }
}
