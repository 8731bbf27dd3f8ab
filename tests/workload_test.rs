/*!
 * Workload Driver Integration Tests
 *
 * End-to-end runs of the benchmark against its observable guarantees
 */

use pretty_assertions::assert_eq;
use rwset_bench::workload::{
    execute, preload, OpCounters, OpMix, OpRecord, OpStream, SeedMode, WorkloadConfig,
    DEFAULT_MAX_KEY,
};
use rwset_bench::{BenchError, OrderedSet};

fn mix(search: f64, insert: f64) -> OpMix {
    OpMix::new(search, insert).unwrap()
}

#[test]
fn test_remainder_ops_are_dropped() {
    let config = WorkloadConfig {
        threads: 10,
        preload_keys: 10,
        total_ops: 101,
        mix: mix(0.5, 0.3),
        seed: SeedMode::Fixed(5),
        ..Default::default()
    };
    let outcome = execute(&config).unwrap();

    assert_eq!(outcome.report.ops_per_thread, 10);
    assert_eq!(outcome.report.requested_ops, 101);
    assert_eq!(outcome.report.executed_ops, 100);
    assert!(outcome.report.to_string().contains("Executed ops = 100 (1 dropped as remainder)"));
    assert_eq!(outcome.report.totals.total(), 100);
    assert_eq!(outcome.workers.len(), 10);
    for worker in &outcome.workers {
        assert_eq!(worker.counters.total(), 10, "worker {}", worker.rank);
    }
}

#[test]
fn test_fewer_ops_than_threads_runs_nothing() {
    let config = WorkloadConfig {
        threads: 8,
        preload_keys: 5,
        total_ops: 7,
        seed: SeedMode::Fixed(1),
        ..Default::default()
    };
    let outcome = execute(&config).unwrap();

    assert_eq!(outcome.report.totals, OpCounters::default());
    assert_eq!(outcome.set.len(), outcome.report.preload.inserted);
}

#[test]
fn test_scenario_eight_threads_mixed_workload() {
    let config = WorkloadConfig {
        threads: 8,
        preload_keys: 1_000,
        total_ops: 100_000,
        mix: mix(0.5, 0.3),
        max_key: DEFAULT_MAX_KEY,
        seed: SeedMode::Clock,
        ..Default::default()
    };
    let outcome = execute(&config).unwrap();
    let report = &outcome.report;
    let totals = report.totals;

    assert_eq!(report.preload.inserted, 1_000);
    assert_eq!(totals.total(), 100_000);
    assert_eq!(
        outcome.set.len() as u64,
        report.preload.inserted as u64 + totals.inserted - totals.deleted
    );
    assert!(outcome.set.is_strictly_ascending());

    // Every operation took the lock exactly once, in the matching mode
    assert_eq!(report.lock.shared_acquisitions, totals.member);
    assert_eq!(report.lock.exclusive_acquisitions, totals.insert + totals.delete);

    let merged = outcome
        .workers
        .iter()
        .fold(OpCounters::default(), |mut acc, w| {
            acc.merge(&w.counters);
            acc
        });
    assert_eq!(merged, totals);
}

#[test]
fn test_single_thread_matches_sequential_replay() {
    let config = WorkloadConfig {
        threads: 1,
        preload_keys: 200,
        total_ops: 5_000,
        mix: mix(0.4, 0.35),
        max_key: 2_000,
        seed: SeedMode::Fixed(2024),
        record_journal: true,
        ..Default::default()
    };
    let outcome = execute(&config).unwrap();

    // Replay the same stream with no lock involved
    let mut oracle = OrderedSet::new();
    let preloaded = preload(
        &mut oracle,
        config.preload_keys,
        config.max_key,
        config.preload_seed,
    );
    let stream = OpStream::new(SeedMode::worker_seed(2024, 0), config.mix, config.max_key);
    let expected: Vec<OpRecord> = stream
        .take(config.total_ops)
        .map(|(op, key)| OpRecord {
            op,
            key,
            applied: op.apply(&mut oracle, key),
        })
        .collect();

    assert_eq!(outcome.report.preload, preloaded);
    assert_eq!(outcome.workers.len(), 1);
    assert_eq!(outcome.workers[0].journal, expected);
    assert_eq!(outcome.set.to_vec(), oracle.to_vec());
}

#[test]
fn test_fixed_seed_runs_are_repeatable() {
    let config = WorkloadConfig {
        threads: 1,
        preload_keys: 50,
        total_ops: 2_000,
        mix: mix(0.2, 0.5),
        max_key: 500,
        seed: SeedMode::Fixed(77),
        ..Default::default()
    };

    let first = execute(&config).unwrap();
    let second = execute(&config).unwrap();
    assert_eq!(first.report.totals, second.report.totals);
    assert_eq!(first.set.to_vec(), second.set.to_vec());
}

#[test]
fn test_insert_only_workload_grows_set() {
    let config = WorkloadConfig {
        threads: 4,
        preload_keys: 0,
        total_ops: 4_000,
        mix: mix(0.0, 1.0),
        max_key: 1_000_000,
        seed: SeedMode::Fixed(9),
        ..Default::default()
    };
    let outcome = execute(&config).unwrap();
    let totals = outcome.report.totals;

    assert_eq!(totals.insert, 4_000);
    assert_eq!(totals.member + totals.delete, 0);
    assert_eq!(outcome.set.len() as u64, totals.inserted);
    assert_eq!(outcome.report.lock.shared_acquisitions, 0);
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let config = WorkloadConfig {
        threads: 0,
        ..Default::default()
    };
    assert!(matches!(execute(&config), Err(BenchError::InvalidConfig(_))));
}
