/*!
 * Workload Configuration
 *
 * Environment variables:
 * - RWSET_MAX_KEY: upper bound (exclusive) for sampled keys
 * - RWSET_SEED: fixed worker seed base instead of wall-clock seeding
 */

use super::ops::OpMix;
use super::rng::clock_seed;
use crate::collections::Key;
use crate::core::errors::{BenchError, BenchResult};
use serde::Serialize;

/// Default upper bound for sampled keys
pub const DEFAULT_MAX_KEY: Key = 100_000_000;

/// Seed the single-threaded preload phase starts from
pub const DEFAULT_PRELOAD_SEED: u32 = 1;

/// How worker generators are seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Wall-clock seconds at startup; runs are not reproducible
    Clock,
    /// Fixed base; identical configs produce identical op streams
    Fixed(u32),
}

impl SeedMode {
    /// Resolve the base every worker rank is added to
    pub fn base(self) -> u32 {
        match self {
            Self::Clock => clock_seed(),
            Self::Fixed(seed) => seed,
        }
    }

    /// Seed for the worker with `rank`
    #[inline]
    pub fn worker_seed(base: u32, rank: usize) -> u32 {
        base.wrapping_add(rank as u32)
    }
}

/// Full description of one benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadConfig {
    /// Worker thread count
    pub threads: usize,
    /// Distinct keys to insert before the timed region
    pub preload_keys: usize,
    /// Operations to split across workers (remainder is dropped)
    pub total_ops: usize,
    pub mix: OpMix,
    /// Keys are sampled from `[0, max_key)`
    pub max_key: Key,
    pub seed: SeedMode,
    pub preload_seed: u32,
    /// Keep a per-worker log of every operation and its outcome
    pub record_journal: bool,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            preload_keys: 1_000,
            total_ops: 100_000,
            mix: OpMix::default(),
            max_key: DEFAULT_MAX_KEY,
            seed: SeedMode::Clock,
            preload_seed: DEFAULT_PRELOAD_SEED,
            record_journal: false,
        }
    }
}

impl WorkloadConfig {
    /// Operations each worker executes: `total_ops / threads`, truncated
    #[inline]
    pub fn ops_per_thread(&self) -> usize {
        self.total_ops / self.threads.max(1)
    }

    /// Operations that actually run once the remainder is dropped
    #[inline]
    pub fn executed_ops(&self) -> usize {
        self.ops_per_thread() * self.threads
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.threads == 0 {
            return Err(BenchError::InvalidConfig(
                "thread count must be at least 1".into(),
            ));
        }
        if self.max_key <= 0 {
            return Err(BenchError::InvalidConfig(format!(
                "max key must be positive, got {}",
                self.max_key
            )));
        }
        Ok(())
    }

    /// Apply `RWSET_MAX_KEY` and `RWSET_SEED` if set
    pub fn with_env_overrides(mut self) -> BenchResult<Self> {
        if let Ok(raw) = std::env::var("RWSET_MAX_KEY") {
            self.max_key = raw.trim().parse::<Key>().map_err(|e| BenchError::InvalidArgument {
                name: "RWSET_MAX_KEY",
                reason: format!("{}", e),
            })?;
        }
        if let Ok(raw) = std::env::var("RWSET_SEED") {
            let seed = raw.trim().parse::<u32>().map_err(|e| BenchError::InvalidArgument {
                name: "RWSET_SEED",
                reason: format!("{}", e),
            })?;
            self.seed = SeedMode::Fixed(seed);
        }
        Ok(self)
    }
}
