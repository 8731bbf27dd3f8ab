/*!
 * Writer-Priority Reader-Writer Monitor
 *
 * A classic blocking monitor: one internal mutex guarding the counters plus
 * two condition variables, one per waiting class.
 *
 * # Policy
 *
 * New readers are deferred while a writer is active OR queued. Writers are
 * admitted once there are no active readers and no active writer. Under
 * sustained write pressure readers can starve; writer wait time stays bounded.
 *
 * # State machine
 *
 * `Idle -> Shared(n) -> Idle`, `Idle -> Exclusive -> Idle`. Shared and
 * exclusive holders never coexist and there is at most one exclusive holder.
 *
 * # Reentrancy
 *
 * Not supported. Acquiring again while holding either mode deadlocks.
 */

use crate::core::errors::{LockError, LockResult};
use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::Serialize;
use tracing::trace;

/// Mode a holder acquired the lock in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Shared,
    Exclusive,
}

/// Observable phase of the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPhase {
    Idle,
    /// Number of active readers (always > 0)
    Shared(usize),
    Exclusive,
}

/// Snapshot of the monitor counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LockState {
    /// Readers currently holding shared access
    pub active_readers: usize,
    /// Readers blocked in `acquire_shared`
    pub waiting_readers: usize,
    /// Writers blocked in `acquire_exclusive`
    pub waiting_writers: usize,
    /// Whether an exclusive holder exists
    pub writer_active: bool,
}

impl LockState {
    const fn new() -> Self {
        Self {
            active_readers: 0,
            waiting_readers: 0,
            waiting_writers: 0,
            writer_active: false,
        }
    }

    /// Phase derived from the holder counters
    pub fn phase(&self) -> LockPhase {
        if self.writer_active {
            LockPhase::Exclusive
        } else if self.active_readers > 0 {
            LockPhase::Shared(self.active_readers)
        } else {
            LockPhase::Idle
        }
    }

    /// No holders and no waiters
    pub fn is_quiescent(&self) -> bool {
        self.phase() == LockPhase::Idle && self.waiting_readers == 0 && self.waiting_writers == 0
    }

    #[inline]
    fn reader_must_wait(&self) -> bool {
        self.writer_active || self.waiting_writers > 0
    }

    #[inline]
    fn writer_must_wait(&self) -> bool {
        self.active_readers > 0 || self.writer_active
    }
}

/// Acquisition counters accumulated over the lifetime of the lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LockStats {
    pub shared_acquisitions: u64,
    pub exclusive_acquisitions: u64,
    /// Shared acquisitions that had to block at least once
    pub shared_blocked: u64,
    /// Exclusive acquisitions that had to block at least once
    pub exclusive_blocked: u64,
}

impl LockStats {
    const fn new() -> Self {
        Self {
            shared_acquisitions: 0,
            exclusive_acquisitions: 0,
            shared_blocked: 0,
            exclusive_blocked: 0,
        }
    }
}

struct Monitor {
    state: LockState,
    stats: LockStats,
    /// Set once by `retire`; handle operations are refused afterwards
    retired: bool,
}

/// Writer-priority reader-writer monitor without associated data
///
/// Callers pair every `acquire_*` with exactly one `release`. See
/// [`PriorityRwLock`](super::PriorityRwLock) for the guard-based API.
///
/// Wake order among several waiting writers is whatever `Condvar::notify_one`
/// picks; no FIFO guarantee is made.
pub struct RawPriorityLock {
    monitor: Mutex<Monitor>,
    readers: Condvar,
    writers: Condvar,
}

impl RawPriorityLock {
    /// Create a lock in the `Idle` state
    pub const fn new() -> Self {
        Self {
            monitor: Mutex::new(Monitor {
                state: LockState::new(),
                stats: LockStats::new(),
                retired: false,
            }),
            readers: Condvar::new(),
            writers: Condvar::new(),
        }
    }

    /// Block until shared access is granted
    pub fn acquire_shared(&self) {
        self.enter_shared(self.monitor.lock());
    }

    /// Block until exclusive access is granted
    pub fn acquire_exclusive(&self) {
        self.enter_exclusive(self.monitor.lock());
    }

    /// Release whichever mode is currently held
    ///
    /// An exclusive release hands over to one waiting writer if there is
    /// one, otherwise wakes every waiting reader. The last shared release
    /// wakes one waiting writer.
    pub fn release(&self) -> LockResult<AccessMode> {
        self.leave(self.monitor.lock())
    }

    /// `acquire_shared`, refused once the lock has been retired
    pub(super) fn acquire_shared_live(&self) -> LockResult<()> {
        let monitor = self.live_monitor()?;
        self.enter_shared(monitor);
        Ok(())
    }

    /// `acquire_exclusive`, refused once the lock has been retired
    pub(super) fn acquire_exclusive_live(&self) -> LockResult<()> {
        let monitor = self.live_monitor()?;
        self.enter_exclusive(monitor);
        Ok(())
    }

    /// `release`, refused once the lock has been retired
    pub(super) fn release_live(&self) -> LockResult<AccessMode> {
        let monitor = self.live_monitor()?;
        self.leave(monitor)
    }

    /// Snapshot, refused once the lock has been retired
    pub(super) fn state_live(&self) -> LockResult<LockState> {
        Ok(self.live_monitor()?.state)
    }

    /// Mark the lock dead if it is quiescent
    ///
    /// The check and the transition happen under one monitor acquisition,
    /// so no holder or waiter can slip in between. Waiters cannot appear
    /// afterwards either: every `*_live` entry point sees the flag first.
    pub(super) fn retire(&self) -> LockResult<()> {
        let mut monitor = self.live_monitor()?;
        if !monitor.state.is_quiescent() {
            return Err(LockError::Busy(format!("{:?}", monitor.state)));
        }
        monitor.retired = true;
        Ok(())
    }

    pub(super) fn is_retired(&self) -> bool {
        self.monitor.lock().retired
    }

    fn live_monitor(&self) -> LockResult<MutexGuard<'_, Monitor>> {
        let monitor = self.monitor.lock();
        if monitor.retired {
            return Err(LockError::InvalidHandle);
        }
        Ok(monitor)
    }

    fn enter_shared(&self, mut monitor: MutexGuard<'_, Monitor>) {
        monitor.state.waiting_readers += 1;
        let mut blocked = false;
        while monitor.state.reader_must_wait() {
            if !blocked {
                trace!(
                    waiting_writers = monitor.state.waiting_writers,
                    writer_active = monitor.state.writer_active,
                    "reader deferred"
                );
                blocked = true;
            }
            self.readers.wait(&mut monitor);
        }
        monitor.state.waiting_readers -= 1;

        monitor.state.active_readers += 1;
        monitor.stats.shared_acquisitions += 1;
        if blocked {
            monitor.stats.shared_blocked += 1;
        }
    }

    fn enter_exclusive(&self, mut monitor: MutexGuard<'_, Monitor>) {
        monitor.state.waiting_writers += 1;
        let mut blocked = false;
        while monitor.state.writer_must_wait() {
            if !blocked {
                trace!(
                    active_readers = monitor.state.active_readers,
                    writer_active = monitor.state.writer_active,
                    "writer queued"
                );
                blocked = true;
            }
            self.writers.wait(&mut monitor);
        }
        monitor.state.waiting_writers -= 1;

        monitor.state.writer_active = true;
        monitor.stats.exclusive_acquisitions += 1;
        if blocked {
            monitor.stats.exclusive_blocked += 1;
        }
    }

    fn leave(&self, mut monitor: MutexGuard<'_, Monitor>) -> LockResult<AccessMode> {
        let state = &mut monitor.state;

        if state.writer_active {
            state.writer_active = false;
            if state.waiting_writers > 0 {
                self.writers.notify_one();
            } else {
                self.readers.notify_all();
            }
            Ok(AccessMode::Exclusive)
        } else if state.active_readers > 0 {
            state.active_readers -= 1;
            if state.active_readers == 0 && state.waiting_writers > 0 {
                self.writers.notify_one();
            }
            Ok(AccessMode::Shared)
        } else {
            Err(LockError::NotHeld)
        }
    }

    /// Current counters
    pub fn state(&self) -> LockState {
        self.monitor.lock().state
    }

    /// Acquisition statistics so far
    pub fn stats(&self) -> LockStats {
        self.monitor.lock().stats
    }
}

impl Default for RawPriorityLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RawPriorityLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawPriorityLock")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for(lock: &RawPriorityLock, pred: impl Fn(&LockState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred(&lock.state()) {
            assert!(Instant::now() < deadline, "state never reached: {:?}", lock.state());
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_starts_idle() {
        let lock = RawPriorityLock::new();
        assert_eq!(lock.state(), LockState::default());
        assert_eq!(lock.state().phase(), LockPhase::Idle);
        assert!(lock.state().is_quiescent());
    }

    #[test]
    fn test_shared_holders_stack() {
        let lock = RawPriorityLock::new();
        lock.acquire_shared();
        lock.acquire_shared();
        assert_eq!(lock.state().phase(), LockPhase::Shared(2));

        assert_eq!(lock.release(), Ok(AccessMode::Shared));
        assert_eq!(lock.release(), Ok(AccessMode::Shared));
        assert_eq!(lock.state().phase(), LockPhase::Idle);
    }

    #[test]
    fn test_exclusive_roundtrip() {
        let lock = RawPriorityLock::new();
        lock.acquire_exclusive();
        assert_eq!(lock.state().phase(), LockPhase::Exclusive);
        assert_eq!(lock.release(), Ok(AccessMode::Exclusive));
        assert!(lock.state().is_quiescent());
    }

    #[test]
    fn test_release_idle_is_rejected() {
        let lock = RawPriorityLock::new();
        assert_eq!(lock.release(), Err(LockError::NotHeld));
        assert_eq!(lock.state(), LockState::default());
    }

    #[test]
    fn test_retire_only_when_quiescent() {
        let lock = RawPriorityLock::new();
        lock.acquire_shared();
        assert!(matches!(lock.retire(), Err(LockError::Busy(_))));
        assert!(!lock.is_retired());
        lock.release().unwrap();

        lock.retire().unwrap();
        assert!(lock.is_retired());
        assert_eq!(lock.retire(), Err(LockError::InvalidHandle));
        assert_eq!(lock.acquire_shared_live(), Err(LockError::InvalidHandle));
        assert_eq!(lock.acquire_exclusive_live(), Err(LockError::InvalidHandle));
        assert_eq!(lock.release_live(), Err(LockError::InvalidHandle));
        assert_eq!(lock.state(), LockState::default());
    }

    #[test]
    fn test_reader_blocks_behind_writer() {
        let lock = Arc::new(RawPriorityLock::new());
        lock.acquire_exclusive();

        let reader = {
            let lock = lock.clone();
            thread::spawn(move || {
                lock.acquire_shared();
                lock.release().unwrap();
            })
        };

        wait_for(&lock, |s| s.waiting_readers == 1);
        assert_eq!(lock.state().phase(), LockPhase::Exclusive);

        lock.release().unwrap();
        reader.join().unwrap();

        let stats = lock.stats();
        assert_eq!(stats.shared_acquisitions, 1);
        assert_eq!(stats.shared_blocked, 1);
        assert_eq!(stats.exclusive_acquisitions, 1);
        assert_eq!(stats.exclusive_blocked, 0);
    }

    #[test]
    fn test_queued_writer_defers_new_readers() {
        let lock = Arc::new(RawPriorityLock::new());
        lock.acquire_shared();

        let writer = {
            let lock = lock.clone();
            thread::spawn(move || {
                lock.acquire_exclusive();
                lock.release().unwrap();
            })
        };
        wait_for(&lock, |s| s.waiting_writers == 1);

        let reader = {
            let lock = lock.clone();
            thread::spawn(move || {
                lock.acquire_shared();
                lock.release().unwrap();
            })
        };
        wait_for(&lock, |s| s.waiting_readers == 1);

        // The first reader is still the only holder
        assert_eq!(lock.state().phase(), LockPhase::Shared(1));

        lock.release().unwrap();
        writer.join().unwrap();
        reader.join().unwrap();
        assert!(lock.state().is_quiescent());
    }
}
