/*!
 * Synchronization Primitives
 *
 * Writer-priority reader-writer lock built as a monitor:
 * - `RawPriorityLock`: the monitor (mutex + reader/writer condvars)
 * - `LockHandle`: explicit init/destroy/acquire/release surface
 * - `PriorityRwLock<T>`: data-owning wrapper with RAII guards
 *
 * # Policy
 *
 * Readers wait while a writer is active or queued; writers wait while
 * anyone holds the lock. There are no timeouts and no cancellation.
 */

mod guarded;
mod handle;
mod rwlock;

pub use guarded::{PriorityRwLock, ReadGuard, WriteGuard};
pub use handle::{destroy, init, LockHandle};
pub use rwlock::{AccessMode, LockPhase, LockState, LockStats, RawPriorityLock};
