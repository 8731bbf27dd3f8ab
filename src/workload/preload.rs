/*!
 * Preload Phase
 * Single-threaded fill of the set before the timed region
 */

use super::rng::Lcg;
use crate::collections::{Key, OrderedSet};
use serde::Serialize;
use tracing::debug;

/// Outcome of the preload phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Distinct keys asked for
    pub requested: usize,
    /// Distinct keys actually inserted
    pub inserted: usize,
    /// Insert attempts, duplicates included
    pub attempts: usize,
}

impl PreloadReport {
    /// Whether duplicates exhausted the attempt budget before the target
    pub fn under_filled(&self) -> bool {
        self.inserted < self.requested
    }
}

impl std::fmt::Display for PreloadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Inserted {} keys in empty list", self.inserted)
    }
}

/// Insert random keys until `target` distinct keys are in or `2 * target`
/// attempts have been spent
pub fn preload(set: &mut OrderedSet, target: usize, max_key: Key, seed: u32) -> PreloadReport {
    let mut rng = Lcg::new(seed);
    let budget = target.saturating_mul(2);
    let mut report = PreloadReport {
        requested: target,
        ..Default::default()
    };

    while report.inserted < target && report.attempts < budget {
        let key = rng.next_key(max_key);
        report.attempts += 1;
        if set.insert(key) {
            report.inserted += 1;
        }
    }

    debug!(
        requested = report.requested,
        inserted = report.inserted,
        attempts = report.attempts,
        "preload finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_sparse_universe() {
        let mut set = OrderedSet::new();
        let report = preload(&mut set, 100, 1_000_000, 1);
        assert_eq!(report.inserted, 100);
        assert!(report.attempts >= 100 && report.attempts <= 200);
        assert_eq!(set.len(), 100);
        assert!(set.is_strictly_ascending());
    }

    #[test]
    fn test_dense_universe_under_fills() {
        // Only 10 distinct keys exist, so at most 10 can ever be inserted
        let mut set = OrderedSet::new();
        let report = preload(&mut set, 50, 10, 1);
        assert!(report.under_filled());
        assert_eq!(report.attempts, 100);
        assert!(report.inserted <= 10);
        assert_eq!(set.len(), report.inserted);
    }

    #[test]
    fn test_zero_target() {
        let mut set = OrderedSet::new();
        let report = preload(&mut set, 0, 100, 1);
        assert_eq!(report, PreloadReport::default());
        assert!(set.is_empty());
    }
}
