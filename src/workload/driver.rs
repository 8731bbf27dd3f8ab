/*!
 * Workload Driver
 *
 * Fixed pool of OS threads hammering one shared ordered set:
 * - each worker draws (operation, key) pairs from its own generator
 * - takes the lock in the mode the operation needs, applies it, releases
 * - merges its local counters into the shared totals once, at the end
 *
 * The lock is never held across two set operations.
 */

use super::config::{SeedMode, WorkloadConfig};
use super::counters::{OpCounters, OpRecord, SharedTotals};
use super::ops::{OpStream, Operation};
use super::preload::{preload, PreloadReport};
use super::report::BenchReport;
use crate::collections::{Key, OrderedSet};
use crate::core::errors::{BenchError, BenchResult};
use crate::core::sync::{AccessMode, LockStats, PriorityRwLock};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// State shared by every worker
#[derive(Debug, Default)]
pub struct BenchContext {
    set: PriorityRwLock<OrderedSet>,
    totals: SharedTotals,
}

impl BenchContext {
    pub fn new(set: OrderedSet) -> Self {
        Self {
            set: PriorityRwLock::new(set),
            totals: SharedTotals::new(),
        }
    }

    /// The lock-protected set
    pub fn set(&self) -> &PriorityRwLock<OrderedSet> {
        &self.set
    }

    pub fn totals(&self) -> OpCounters {
        self.totals.snapshot()
    }

    pub fn lock_stats(&self) -> LockStats {
        self.set.stats()
    }

    /// Run one operation under the matching lock mode
    #[inline]
    pub fn apply(&self, op: Operation, key: Key) -> bool {
        match op.required_mode() {
            AccessMode::Shared => self.set.read().member(key),
            AccessMode::Exclusive => op.apply(&mut self.set.write(), key),
        }
    }

    pub fn into_set(self) -> OrderedSet {
        self.set.into_inner()
    }
}

/// What a single worker did
#[derive(Debug, Clone, Default)]
pub struct WorkerOutcome {
    pub rank: usize,
    pub counters: OpCounters,
    /// Empty unless the run was configured to record a journal
    pub journal: Vec<OpRecord>,
}

/// Execute `ops` operations from `stream` against the shared set
pub fn run_worker(
    ctx: &BenchContext,
    rank: usize,
    ops: usize,
    stream: OpStream,
    record_journal: bool,
) -> WorkerOutcome {
    let mut outcome = WorkerOutcome {
        rank,
        journal: if record_journal {
            Vec::with_capacity(ops)
        } else {
            Vec::new()
        },
        ..Default::default()
    };

    debug!(rank, ops, "worker started");
    for (op, key) in stream.take(ops) {
        let applied = ctx.apply(op, key);
        outcome.counters.record(op, applied);
        if record_journal {
            outcome.journal.push(OpRecord { op, key, applied });
        }
    }

    ctx.totals.merge(&outcome.counters);
    debug!(rank, executed = outcome.counters.total(), "worker finished");
    outcome
}

/// Everything a finished run leaves behind
#[derive(Debug)]
pub struct RunOutcome {
    pub report: BenchReport,
    /// The set after all workers joined
    pub set: OrderedSet,
    /// Per-worker results ordered by rank
    pub workers: Vec<WorkerOutcome>,
}

/// A validated, preloaded run whose timed region has not started yet
#[derive(Debug)]
pub struct PreparedRun<'a> {
    config: &'a WorkloadConfig,
    set: OrderedSet,
    preloaded: PreloadReport,
}

impl<'a> PreparedRun<'a> {
    /// Validate `config` and preload the set single-threaded
    pub fn new(config: &'a WorkloadConfig) -> BenchResult<Self> {
        config.validate()?;

        let mut set = OrderedSet::new();
        let preloaded = preload(&mut set, config.preload_keys, config.max_key, config.preload_seed);
        if preloaded.under_filled() {
            warn!(
                requested = preloaded.requested,
                inserted = preloaded.inserted,
                "preload attempt budget exhausted before target"
            );
        }

        Ok(Self {
            config,
            set,
            preloaded,
        })
    }

    pub fn preloaded(&self) -> &PreloadReport {
        &self.preloaded
    }

    /// Keys in the set before any worker starts
    pub fn set(&self) -> &OrderedSet {
        &self.set
    }

    /// Run the worker pool and validate the final set
    #[instrument(skip_all, fields(threads = self.config.threads, total_ops = self.config.total_ops))]
    pub fn run(self) -> BenchResult<RunOutcome> {
        let Self {
            config,
            set,
            preloaded,
        } = self;

        let ctx = Arc::new(BenchContext::new(set));
        let ops_per_thread = config.ops_per_thread();
        let seed_base = config.seed.base();

        let start = Instant::now();
        let workers = spawn_and_join(&ctx, config, ops_per_thread, seed_base)?;
        let elapsed = start.elapsed();

        collect_outcome(config, ctx, preloaded, workers, elapsed)
    }
}

/// Preload, run the worker pool, and validate the final set
pub fn execute(config: &WorkloadConfig) -> BenchResult<RunOutcome> {
    PreparedRun::new(config)?.run()
}

/// Convenience wrapper returning only the report
pub fn run(config: &WorkloadConfig) -> BenchResult<BenchReport> {
    execute(config).map(|outcome| outcome.report)
}

/// Unwrap the context after join, check the set, and build the report
fn collect_outcome(
    config: &WorkloadConfig,
    ctx: Arc<BenchContext>,
    preloaded: PreloadReport,
    workers: Vec<WorkerOutcome>,
    elapsed: Duration,
) -> BenchResult<RunOutcome> {
    let ctx = Arc::try_unwrap(ctx).map_err(|_| {
        BenchError::InvariantViolated("context still shared after join".into())
    })?;
    let totals = ctx.totals();
    let lock_stats = ctx.lock_stats();
    let set = ctx.into_set();

    verify_final_set(&set, &preloaded, &totals)?;

    let report = BenchReport {
        threads: config.threads,
        requested_ops: config.total_ops,
        executed_ops: config.executed_ops(),
        ops_per_thread: config.ops_per_thread(),
        preload: preloaded,
        totals,
        elapsed,
        final_len: set.len(),
        lock: lock_stats,
    };
    info!(
        elapsed_secs = report.elapsed.as_secs_f64(),
        executed = totals.total(),
        final_len = report.final_len,
        "benchmark finished"
    );

    Ok(RunOutcome {
        report,
        set,
        workers,
    })
}

fn spawn_and_join(
    ctx: &Arc<BenchContext>,
    config: &WorkloadConfig,
    ops_per_thread: usize,
    seed_base: u32,
) -> BenchResult<Vec<WorkerOutcome>> {
    let mut handles = Vec::with_capacity(config.threads);
    let mut spawn_error = None;

    for rank in 0..config.threads {
        let ctx = Arc::clone(ctx);
        let stream = OpStream::new(
            SeedMode::worker_seed(seed_base, rank),
            config.mix,
            config.max_key,
        );
        let record_journal = config.record_journal;

        let spawned = thread::Builder::new()
            .name(format!("rwset-worker-{}", rank))
            .spawn(move || run_worker(&ctx, rank, ops_per_thread, stream, record_journal));

        match spawned {
            Ok(handle) => handles.push((rank, handle)),
            Err(source) => {
                spawn_error = Some(BenchError::Spawn { rank, source });
                break;
            }
        }
    }

    // Join whatever was started before reporting a spawn failure
    let mut workers = Vec::with_capacity(handles.len());
    let mut join_error = None;
    for (rank, handle) in handles {
        match handle.join() {
            Ok(outcome) => workers.push(outcome),
            Err(_) => {
                join_error.get_or_insert(BenchError::WorkerPanicked(rank));
            }
        }
    }

    match spawn_error.or(join_error) {
        Some(err) => Err(err),
        None => Ok(workers),
    }
}

fn verify_final_set(
    set: &OrderedSet,
    preloaded: &PreloadReport,
    totals: &OpCounters,
) -> BenchResult<()> {
    if !set.is_strictly_ascending() {
        return Err(BenchError::InvariantViolated(
            "keys are not strictly ascending".into(),
        ));
    }

    let expected = (preloaded.inserted as u64 + totals.inserted).checked_sub(totals.deleted);
    if expected != Some(set.len() as u64) {
        return Err(BenchError::InvariantViolated(format!(
            "set holds {} keys, expected {} preloaded + {} inserted - {} deleted",
            set.len(),
            preloaded.inserted,
            totals.inserted,
            totals.deleted
        )));
    }
    Ok(())
}
