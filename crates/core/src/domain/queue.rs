// Queue Domain Model

use crate::domain::service::ServiceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A person waiting in a service queue.
///
/// Entries have no stable identity of their own; their position in the
/// queue IS their identity. `joined_at` (epoch ms) only drives the
/// "time waited" display and never affects ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub name: String,
    pub email: String,
    pub joined_at: i64,
}

impl QueueEntry {
    pub fn new(name: impl Into<String>, email: impl Into<String>, joined_at: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            joined_at,
        }
    }
}

/// Mapping from service id to its ordered waitlist (front = next served).
///
/// Absence of a key is equivalent to an empty queue for a known service.
/// serde_json stores the integer keys as strings, matching the persisted
/// record shape.
pub type QueueMap = BTreeMap<ServiceId, Vec<QueueEntry>>;

/// Derived per-queue statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub count: usize,
    /// `count * service.duration`, or `None` when nobody is waiting.
    pub estimated_wait_minutes: Option<i64>,
}

/// Whole minutes an entry has waited so far: `max(0, round(elapsed / 60s))`.
///
/// Purely a display computation, recomputed on every render, never stored.
pub fn waited_minutes(entry: &QueueEntry, now_millis: i64) -> i64 {
    let minutes = ((now_millis - entry.joined_at) as f64 / 60_000.0).round() as i64;
    minutes.max(0)
}
