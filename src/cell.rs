//! A minimal `UnsafeCell` wrapper that opts into `Send + Sync`.
//!
//! Used throughout this crate for fields the scheduler mutates through a
//! shared reference: tasks, timers and the broadcast registry are normally
//! declared as `'static` values, so every scheduler operation only ever
//! gets `&Task` / `&Scheduler` / `&Timer`, never `&mut`. Soundness comes
//! from the cooperative run-to-completion model: exactly one piece of
//! code — the main loop, or the single task it is currently dispatching —
//! ever touches a given cell at a time.

use core::cell::UnsafeCell;

/// An `UnsafeCell` wrapper that implements `Send` and `Sync`.
///
/// # Safety
///
/// The caller must ensure all accesses are properly synchronised with
/// respect to the single-threaded cooperative contract described in the
/// crate root: no two call sites may hold a live `&mut` (or read while a
/// `&mut` is live) to the same cell at once.
#[repr(transparent)]
pub struct RacyCell<T>(UnsafeCell<T>);

// SAFETY: the caller is responsible for synchronising accesses (see the
// cooperative scheduling contract in `crate::scheduler`). `T: Send` is
// required because the value may be produced on one core/ISR context and
// consumed on another.
unsafe impl<T: Send> Send for RacyCell<T> {}
// SAFETY: same as above.
unsafe impl<T: Send> Sync for RacyCell<T> {}

impl<T> RacyCell<T> {
    /// Creates a new `RacyCell` wrapping `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// Returns a raw pointer to the underlying data.
    #[inline]
    pub const fn get(&self) -> *mut T {
        self.0.get()
    }

    /// Returns a mutable reference to the underlying data.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.0.get_mut()
    }
}
