/*!
 * rwset-bench
 *
 * Writer-priority reader-writer lock and a concurrent ordered-set benchmark
 * built on top of it.
 */

pub mod cli;
pub mod collections;
pub mod core;
pub mod monitoring;
pub mod workload;

// Re-exports
pub use collections::{Key, OrderedSet};
pub use crate::core::errors::{BenchError, BenchResult, LockError, LockResult};
pub use crate::core::sync::{
    AccessMode, LockHandle, LockPhase, LockState, LockStats, PriorityRwLock, RawPriorityLock,
};
pub use monitoring::init_tracing;
pub use workload::{
    execute, run, BenchReport, OpMix, PreparedRun, ReportFormat, SeedMode, WorkloadConfig,
};
