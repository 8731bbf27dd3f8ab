/*!
 * Operation Mix
 * Operation classes, their probabilities, and the deterministic op stream
 */

use super::rng::Lcg;
use crate::collections::{Key, OrderedSet};
use crate::core::errors::{BenchError, BenchResult};
use crate::core::sync::AccessMode;
use serde::Serialize;

/// Slack allowed when checking that fractions sum to at most one
const FRACTION_EPSILON: f64 = 1e-9;

/// Operation class applied to the shared set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Member,
    Insert,
    Delete,
}

impl Operation {
    /// Lock mode the operation must run under
    pub const fn required_mode(self) -> AccessMode {
        match self {
            Self::Member => AccessMode::Shared,
            Self::Insert | Self::Delete => AccessMode::Exclusive,
        }
    }

    /// Apply directly to a set the caller already has exclusive access to
    pub fn apply(self, set: &mut OrderedSet, key: Key) -> bool {
        match self {
            Self::Member => set.member(key),
            Self::Insert => set.insert(key),
            Self::Delete => set.delete(key),
        }
    }
}

/// Search/insert probabilities; delete takes the remainder
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpMix {
    search: f64,
    insert: f64,
}

impl OpMix {
    pub fn new(search: f64, insert: f64) -> BenchResult<Self> {
        for (name, value) in [("search", search), ("insert", insert)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(BenchError::InvalidConfig(format!(
                    "{} fraction must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if search + insert > 1.0 + FRACTION_EPSILON {
            return Err(BenchError::InvalidConfig(format!(
                "search ({}) and insert ({}) fractions exceed 1",
                search, insert
            )));
        }
        Ok(Self { search, insert })
    }

    #[inline]
    pub fn search(&self) -> f64 {
        self.search
    }

    #[inline]
    pub fn insert(&self) -> f64 {
        self.insert
    }

    #[inline]
    pub fn delete(&self) -> f64 {
        1.0 - (self.search + self.insert)
    }

    /// Map a uniform selector in `[0, 1)` to an operation
    #[inline]
    pub fn select(&self, selector: f64) -> Operation {
        if selector < self.search {
            Operation::Member
        } else if selector < self.search + self.insert {
            Operation::Insert
        } else {
            Operation::Delete
        }
    }
}

impl Default for OpMix {
    fn default() -> Self {
        Self {
            search: 0.8,
            insert: 0.1,
        }
    }
}

/// Endless stream of `(operation, key)` pairs drawn from one generator
///
/// Each draw takes the selector first and the key second, so two streams
/// with the same seed, mix and key bound are identical.
#[derive(Debug, Clone)]
pub struct OpStream {
    rng: Lcg,
    mix: OpMix,
    max_key: Key,
}

impl OpStream {
    pub fn new(seed: u32, mix: OpMix, max_key: Key) -> Self {
        Self {
            rng: Lcg::new(seed),
            mix,
            max_key,
        }
    }
}

impl Iterator for OpStream {
    type Item = (Operation, Key);

    fn next(&mut self) -> Option<Self::Item> {
        let selector = self.rng.next_unit();
        let key = self.rng.next_key(self.max_key);
        Some((self.mix.select(selector), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_is_remainder() {
        let mix = OpMix::new(0.5, 0.3).unwrap();
        assert!((mix.delete() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_select_boundaries() {
        let mix = OpMix::new(0.5, 0.3).unwrap();
        assert_eq!(mix.select(0.0), Operation::Member);
        assert_eq!(mix.select(0.49), Operation::Member);
        assert_eq!(mix.select(0.5), Operation::Insert);
        assert_eq!(mix.select(0.79), Operation::Insert);
        assert_eq!(mix.select(0.8), Operation::Delete);
        assert_eq!(mix.select(0.99), Operation::Delete);
    }

    #[test]
    fn test_rejects_bad_fractions() {
        assert!(OpMix::new(-0.1, 0.5).is_err());
        assert!(OpMix::new(0.5, 1.5).is_err());
        assert!(OpMix::new(0.7, 0.4).is_err());
        assert!(OpMix::new(f64::NAN, 0.0).is_err());
        assert!(OpMix::new(1.0, 0.0).is_ok());
    }

    #[test]
    fn test_required_modes() {
        assert_eq!(Operation::Member.required_mode(), AccessMode::Shared);
        assert_eq!(Operation::Insert.required_mode(), AccessMode::Exclusive);
        assert_eq!(Operation::Delete.required_mode(), AccessMode::Exclusive);
    }

    #[test]
    fn test_stream_is_deterministic() {
        let mix = OpMix::new(0.4, 0.4).unwrap();
        let a: Vec<_> = OpStream::new(99, mix, 1000).take(500).collect();
        let b: Vec<_> = OpStream::new(99, mix, 1000).take(500).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|&(_, key)| (0..1000).contains(&key)));
    }

    #[test]
    fn test_pure_search_mix_never_mutates() {
        let mix = OpMix::new(1.0, 0.0).unwrap();
        assert!(OpStream::new(3, mix, 50)
            .take(1000)
            .all(|(op, _)| op == Operation::Member));
    }
}
