/*!
 * Lock Handles
 *
 * Explicit init/destroy/acquire/release surface over the raw monitor. An
 * uninitialized handle stands in for a missing one: every operation on it is
 * rejected with `LockError::InvalidHandle` and changes nothing.
 *
 * Destroying through one handle retires the lock for every clone of it.
 */

use super::rwlock::{AccessMode, LockState, RawPriorityLock};
use crate::core::errors::{LockError, LockResult};
use std::sync::Arc;
use tracing::debug;

/// Shareable handle to a writer-priority lock
///
/// Cloning shares the same underlying lock, so a handle can be passed to
/// each worker thread. Once any clone destroys the lock, all of them report
/// `LockError::InvalidHandle`.
#[derive(Debug, Clone, Default)]
pub struct LockHandle {
    inner: Option<Arc<RawPriorityLock>>,
}

impl LockHandle {
    /// Handle with no lock behind it
    pub const fn uninit() -> Self {
        Self { inner: None }
    }

    /// Create an already initialized handle
    pub fn new() -> Self {
        Self {
            inner: Some(Arc::new(RawPriorityLock::new())),
        }
    }

    /// Establish a fresh lock in the `Idle` state
    ///
    /// A clone whose lock was destroyed elsewhere may be initialized again; it
    /// then no longer shares anything with the other clones.
    pub fn init(&mut self) -> LockResult<()> {
        if self.is_initialized() {
            return Err(LockError::AlreadyInitialized);
        }
        self.inner = Some(Arc::new(RawPriorityLock::new()));
        debug!("lock handle initialized");
        Ok(())
    }

    /// Tear the lock down; only valid while nobody holds or waits for it
    pub fn destroy(&mut self) -> LockResult<()> {
        self.raw()?.retire()?;
        self.inner = None;
        debug!("lock handle destroyed");
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.inner.as_deref().is_some_and(|lock| !lock.is_retired())
    }

    pub fn acquire_shared(&self) -> LockResult<()> {
        self.raw()?.acquire_shared_live()
    }

    pub fn acquire_exclusive(&self) -> LockResult<()> {
        self.raw()?.acquire_exclusive_live()
    }

    /// Release the mode the caller holds, reporting which one it was
    pub fn release(&self) -> LockResult<AccessMode> {
        self.raw()?.release_live()
    }

    pub fn state(&self) -> LockResult<LockState> {
        self.raw()?.state_live()
    }

    fn raw(&self) -> LockResult<&RawPriorityLock> {
        self.inner.as_deref().ok_or(LockError::InvalidHandle)
    }
}

/// Initialize the handle behind `target`
pub fn init(target: Option<&mut LockHandle>) -> LockResult<()> {
    target.ok_or(LockError::InvalidHandle)?.init()
}

/// Destroy the lock behind `target`
pub fn destroy(target: Option<&mut LockHandle>) -> LockResult<()> {
    target.ok_or(LockError::InvalidHandle)?.destroy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_target() {
        assert_eq!(init(None), Err(LockError::InvalidHandle));
        assert_eq!(destroy(None), Err(LockError::InvalidHandle));
    }

    #[test]
    fn test_uninitialized_handle_rejects_everything() {
        let handle = LockHandle::uninit();
        assert_eq!(handle.acquire_shared(), Err(LockError::InvalidHandle));
        assert_eq!(handle.acquire_exclusive(), Err(LockError::InvalidHandle));
        assert_eq!(handle.release(), Err(LockError::InvalidHandle));
        assert_eq!(handle.state(), Err(LockError::InvalidHandle));
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_init_then_destroy() {
        let mut handle = LockHandle::default();
        init(Some(&mut handle)).unwrap();
        assert!(handle.is_initialized());
        assert_eq!(handle.init(), Err(LockError::AlreadyInitialized));

        handle.acquire_exclusive().unwrap();
        assert!(matches!(handle.destroy(), Err(LockError::Busy(_))));
        assert_eq!(handle.release(), Ok(AccessMode::Exclusive));

        destroy(Some(&mut handle)).unwrap();
        assert!(!handle.is_initialized());
        assert_eq!(handle.destroy(), Err(LockError::InvalidHandle));
    }

    #[test]
    fn test_clones_share_one_lock() {
        let handle = LockHandle::new();
        let other = handle.clone();

        handle.acquire_shared().unwrap();
        assert_eq!(other.state().unwrap().active_readers, 1);
        assert_eq!(other.release(), Ok(AccessMode::Shared));
        assert!(handle.state().unwrap().is_quiescent());
    }

    #[test]
    fn test_destroy_retires_every_clone() {
        let mut handle = LockHandle::new();
        let mut other = handle.clone();

        handle.destroy().unwrap();
        assert!(!other.is_initialized());
        assert_eq!(other.acquire_exclusive(), Err(LockError::InvalidHandle));
        assert_eq!(other.acquire_shared(), Err(LockError::InvalidHandle));
        assert_eq!(other.release(), Err(LockError::InvalidHandle));
        assert_eq!(other.state(), Err(LockError::InvalidHandle));
        assert_eq!(other.destroy(), Err(LockError::InvalidHandle));

        // The clone can start over with a lock of its own
        other.init().unwrap();
        other.acquire_exclusive().unwrap();
        assert_eq!(other.release(), Ok(AccessMode::Exclusive));
        assert_eq!(handle.state(), Err(LockError::InvalidHandle));
    }

    #[test]
    fn test_destroy_refused_while_clone_holds() {
        let mut handle = LockHandle::new();
        let other = handle.clone();

        other.acquire_exclusive().unwrap();
        assert!(matches!(handle.destroy(), Err(LockError::Busy(_))));
        assert!(handle.is_initialized());
        assert_eq!(other.release(), Ok(AccessMode::Exclusive));

        handle.destroy().unwrap();
        assert_eq!(other.acquire_shared(), Err(LockError::InvalidHandle));
    }
}
