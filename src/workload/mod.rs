/*!
 * Workload
 *
 * Benchmark driver for the writer-priority lock: a preloaded ordered set,
 * a fixed pool of worker threads issuing a configurable mix of membership
 * tests, inserts and deletes, and a report of what ran and how long it took.
 */

pub mod config;
pub mod counters;
pub mod driver;
pub mod ops;
pub mod preload;
pub mod report;
pub mod rng;

pub use config::{SeedMode, WorkloadConfig, DEFAULT_MAX_KEY, DEFAULT_PRELOAD_SEED};
pub use counters::{OpCounters, OpRecord, SharedTotals};
pub use driver::{
    execute, run, run_worker, BenchContext, PreparedRun, RunOutcome, WorkerOutcome,
};
pub use ops::{OpMix, OpStream, Operation};
pub use preload::{preload, PreloadReport};
pub use report::{BenchReport, ReportFormat};
pub use rng::{Lcg, LCG_RANGE};
