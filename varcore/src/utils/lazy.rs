use std::{
    ops::Deref,
    sync::atomic::{AtomicUsize, Ordering},
    thread::{self, ThreadId},
};

use crossbeam::utils::Backoff;
use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

const STATE_EMPTY: usize = 0; // No value and nobody computing it
const STATE_COMPUTING: usize = 1; // Value is being computed (should not read nor compute)
const STATE_READY: usize = 2; // Value is present and never changes again

/// Guard for a memoized value
///
/// This is akin to a reference `&'a T`. Once a [`Memo`] is ready its value is never
/// replaced, so holding the guard never blocks other readers.
pub struct MemoGuard<'a, T: ?Sized> {
    guard: MappedRwLockReadGuard<'a, T>,
}

impl<'a, T: ?Sized> Deref for MemoGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &'_ Self::Target {
        &self.guard
    }
}

/// A slot computed at most once, on first access.
///
/// The slot moves from empty to ready exactly once and never goes back. Concurrent
/// first accesses are serialized: a single caller runs the computation while the
/// others wait for its outcome. If the computation fails (or panics) the slot is left
/// empty so that a later call runs it again.
///
/// Initializing a memo from within its own computation on the same thread is a bug
/// and panics.
pub struct Memo<T> {
    elem: RwLock<Option<T>>,
    state: AtomicUsize,
    owner: Mutex<Option<ThreadId>>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            elem: RwLock::new(None),
            state: AtomicUsize::new(STATE_EMPTY),
            owner: Mutex::new(None),
        }
    }

    /// Returns `true` once the value has been computed.
    pub fn is_computed(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_READY
    }

    /// Returns the value, running `compute` first if it was never computed successfully.
    pub fn get_or_try_init<E>(
        &self,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<MemoGuard<'_, T>, E> {
        // Here is the logic:
        // - If the state is READY, return the value
        // - If the state is EMPTY, claim the computation (COMPUTING) and run it
        // - If the state is COMPUTING, wait for the owner to finish
        let backoff = Backoff::new();

        loop {
            match self.state.load(Ordering::Acquire) {
                STATE_READY => return Ok(self.read()),
                STATE_EMPTY => {
                    if self
                        .state
                        .compare_exchange(
                            STATE_EMPTY,
                            STATE_COMPUTING,
                            Ordering::AcqRel,
                            Ordering::Acquire,
                        )
                        .is_ok()
                    {
                        break;
                    }
                }
                _ => {
                    if *self.owner.lock() == Some(thread::current().id()) {
                        panic!("re-entrant initialization of a memoized value");
                    }
                    backoff.snooze();
                }
            }
        }

        // We own the computation from here on.
        *self.owner.lock() = Some(thread::current().id());
        let mut release = ReleaseOnDrop {
            memo: self,
            armed: true,
        };

        let value = compute()?;

        let mut write_guard = self.elem.write();
        *write_guard = Some(value);
        *self.owner.lock() = None;
        release.armed = false;
        self.state.store(STATE_READY, Ordering::Release);

        let guard = RwLockReadGuard::map(RwLockWriteGuard::downgrade(write_guard), |x| {
            x.as_ref()
                .expect("Value should be present when state is READY")
        });
        Ok(MemoGuard { guard })
    }

    fn read(&self) -> MemoGuard<'_, T> {
        let guard = RwLockReadGuard::map(self.elem.read(), |x| {
            x.as_ref()
                .expect("Value should be present when state is READY")
        });
        MemoGuard { guard }
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Puts the memo back to EMPTY when a computation does not complete.
struct ReleaseOnDrop<'a, T> {
    memo: &'a Memo<T>,
    armed: bool,
}

impl<'a, T> Drop for ReleaseOnDrop<'a, T> {
    fn drop(&mut self) {
        if self.armed {
            *self.memo.owner.lock() = None;
            self.memo
                .state
                .compare_exchange(
                    STATE_COMPUTING,
                    STATE_EMPTY,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .expect("Memo state should be COMPUTING when releasing a failed computation");
        }
    }
}
