/*!
 * Operation Counters
 *
 * Workers tally into a local `OpCounters` and merge exactly once, when they
 * finish, into `SharedTotals`. The totals mutex is independent of the data
 * lock and is never held across set operations.
 */

use super::ops::Operation;
use crate::collections::Key;
use parking_lot::Mutex;
use serde::Serialize;

/// Per-class attempt and success counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpCounters {
    /// Membership tests attempted
    pub member: u64,
    /// Inserts attempted
    pub insert: u64,
    /// Deletes attempted
    pub delete: u64,
    /// Membership tests that found the key
    pub member_hits: u64,
    /// Inserts that added a new key
    pub inserted: u64,
    /// Deletes that removed a key
    pub deleted: u64,
}

impl OpCounters {
    /// Count one operation and whether it took effect
    #[inline]
    pub fn record(&mut self, op: Operation, applied: bool) {
        let applied = u64::from(applied);
        match op {
            Operation::Member => {
                self.member += 1;
                self.member_hits += applied;
            }
            Operation::Insert => {
                self.insert += 1;
                self.inserted += applied;
            }
            Operation::Delete => {
                self.delete += 1;
                self.deleted += applied;
            }
        }
    }

    /// Operations attempted across all classes
    #[inline]
    pub fn total(&self) -> u64 {
        self.member + self.insert + self.delete
    }

    pub fn merge(&mut self, other: &OpCounters) {
        self.member += other.member;
        self.insert += other.insert;
        self.delete += other.delete;
        self.member_hits += other.member_hits;
        self.inserted += other.inserted;
        self.deleted += other.deleted;
    }
}

/// Process-wide totals behind their own plain mutex
#[derive(Debug, Default)]
pub struct SharedTotals {
    inner: Mutex<OpCounters>,
}

impl SharedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a worker's local counters in
    pub fn merge(&self, local: &OpCounters) {
        self.inner.lock().merge(local);
    }

    pub fn snapshot(&self) -> OpCounters {
        *self.inner.lock()
    }
}

/// One executed operation, as seen by the worker that ran it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpRecord {
    pub op: Operation,
    pub key: Key,
    pub applied: bool,
}
