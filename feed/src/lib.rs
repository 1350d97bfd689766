//! User-facing feed state for the solbridge client.
//!
//! Two owned stores back the interface: [`NotificationCenter`] for
//! transient messages with a fixed time-to-live, and [`ActivityLog`] for
//! the bounded, newest-first record of wallet events. Both serialize their mutations behind a lock and fan
//! out change events over a `tokio::sync::broadcast` channel so observers
//! re-render on change instead of polling.

pub mod activity;
pub mod notification;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog, AmountSign};
pub use notification::{Notification, NotificationCenter, Severity};

/// Change event emitted by the feed stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    NotificationPushed(u64),
    NotificationDismissed(u64),
    NotificationExpired(u64),
    ActivityRecorded,
}
