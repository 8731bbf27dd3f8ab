/*!
 * Data-Owning Priority Lock
 * RAII guards over the writer-priority monitor
 */

use super::rwlock::{LockState, LockStats, RawPriorityLock};
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

/// Writer-priority reader-writer lock that owns the protected value
///
/// The value performs no locking of its own; shared access is only reachable
/// through a [`ReadGuard`] and mutation only through a [`WriteGuard`].
pub struct PriorityRwLock<T> {
    raw: RawPriorityLock,
    value: UnsafeCell<T>,
}

// SAFETY: access to `value` is serialized by `raw`: many readers or one writer.
// Readers share `&T` across threads, hence the additional `T: Sync`.
unsafe impl<T: Send + Sync> Sync for PriorityRwLock<T> {}

impl<T> PriorityRwLock<T> {
    pub const fn new(value: T) -> Self {
        Self {
            raw: RawPriorityLock::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Block until shared access is granted
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.raw.acquire_shared();
        ReadGuard { lock: self }
    }

    /// Block until exclusive access is granted
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.raw.acquire_exclusive();
        WriteGuard { lock: self }
    }

    /// Direct access when the lock is provably unshared
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    pub fn state(&self) -> LockState {
        self.raw.state()
    }

    pub fn stats(&self) -> LockStats {
        self.raw.stats()
    }
}

impl<T: Default> Default for PriorityRwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for PriorityRwLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityRwLock")
            .field("state", &self.raw.state())
            .finish_non_exhaustive()
    }
}

/// Shared access; released on drop
pub struct ReadGuard<'a, T> {
    lock: &'a PriorityRwLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: shared mode excludes any writer for the guard's lifetime
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        let released = self.lock.raw.release();
        debug_assert!(released.is_ok(), "read guard released an idle lock");
    }
}

/// Exclusive access; released on drop
pub struct WriteGuard<'a, T> {
    lock: &'a PriorityRwLock<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: exclusive mode excludes every other holder
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: exclusive mode excludes every other holder
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        let released = self.lock.raw.release();
        debug_assert!(released.is_ok(), "write guard released an idle lock");
    }
}
