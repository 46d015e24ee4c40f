//! Task: a schedulable unit of work.
//!
//! A [`Task`] pairs a type-erased callback with the mutable bookkeeping the
//! scheduler needs (its due-time and run state). The callback shape,
//! `fn(ctx, arg) -> Option<NonNull<()>>`, is deliberately data+vtable-free —
//! the same trick `core::task::RawWaker` uses to carry a trait-object-like
//! callback through a `*mut ()` without needing an allocator for a `dyn`
//! object. A task is normally a `'static` value the application owns and
//! hands the scheduler a `&'static` reference to, so every scheduler
//! operation only ever needs `&Task`, never `&mut Task`; the fields the
//! scheduler mutates live behind [`RacyCell`].

use core::ptr::NonNull;

use crate::cell::RacyCell;
use crate::clock::Tick;
#[cfg(feature = "profiling")]
use crate::clock::Duration;

/// A task's callback.
///
/// `ctx` is the opaque pointer supplied at construction (the task's own
/// state); `arg` is supplied per-invocation by whatever triggered the call
/// (the scheduler's idle-task convention, a timer's trampoline, or
/// an ISR handoff payload).
///
/// Returning `Some(ptr)` requests that the scheduler reschedule this task
/// immediately, with `ptr` becoming next call's `arg`. Returning `None`
/// means the task relies on an explicit `reschedule_*` call (made from
/// within its own body, or by another task) to run again.
pub type TaskFn = fn(ctx: *mut (), arg: *mut ()) -> Option<NonNull<()>>;

/// A task's run state, tracked so double-scheduling and stale removals
/// can be rejected cheaply without scanning the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not queued and not running.
    Idle,
    /// Queued in the ready queue, waiting for its due-time.
    Scheduled,
    /// Currently being dispatched by `Scheduler::step`.
    Running,
}

/// Per-task profiling counters, gated behind the `profiling` feature.
#[cfg(feature = "profiling")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStats {
    /// Number of times this task has been dispatched.
    pub call_count: u32,
    /// Sum of all recorded call durations, in ticks.
    pub cumulative_runtime: u32,
    /// Longest single call duration observed, in ticks.
    pub max_duration: u32,
}

/// A schedulable unit of work.
pub struct Task {
    name: &'static str,
    func: TaskFn,
    ctx: RacyCell<*mut ()>,
    state: RacyCell<TaskState>,
    time: RacyCell<Tick>,
    /// The `arg` this task will be called with next. Set by the
    /// scheduler when handing off an ISR-queued entry, or when a task's
    /// own return value requests an immediate reschedule; left null for
    /// plain `task_at`/`task_now`/`task_in` scheduling.
    next_arg: RacyCell<*mut ()>,
    #[cfg(feature = "profiling")]
    stats: RacyCell<TaskStats>,
}

// SAFETY: `ctx` is an opaque pointer the embedding application guarantees
// is safe to hand back into `func` under the cooperative run-to-completion
// contract; it is never dereferenced by this crate.
unsafe impl Send for Task {}
// SAFETY: same contract — only one of {main loop, currently-dispatched
// task} ever touches a given `Task`'s cells at a time.
unsafe impl Sync for Task {}

impl Task {
    /// Creates a new, idle task.
    ///
    /// `ctx` is passed back to `func` as its first argument on every call;
    /// it must point to whatever state `func` needs, typically a
    /// `'static` value owned by the application.
    pub const fn new(name: &'static str, func: TaskFn, ctx: *mut ()) -> Self {
        Self {
            name,
            func,
            ctx: RacyCell::new(ctx),
            state: RacyCell::new(TaskState::Idle),
            time: RacyCell::new(0),
            next_arg: RacyCell::new(core::ptr::null_mut()),
            #[cfg(feature = "profiling")]
            stats: RacyCell::new(TaskStats {
                call_count: 0,
                cumulative_runtime: 0,
                max_duration: 0,
            }),
        }
    }

    /// This task's debug name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Current run state.
    #[inline]
    pub fn state(&self) -> TaskState {
        // SAFETY: single-threaded cooperative contract: this read
        // never races a concurrent write to the same cell.
        unsafe { *self.state.get() }
    }

    /// Sets the run state. Scheduler-internal.
    #[inline]
    pub(crate) fn set_state(&self, state: TaskState) {
        // SAFETY: see `state`.
        unsafe { *self.state.get() = state };
    }

    /// This task's due-time, meaningful only while `state() ==
    /// Scheduled`.
    #[inline]
    pub fn get_time(&self) -> Tick {
        // SAFETY: see `state`.
        unsafe { *self.time.get() }
    }

    /// Sets this task's due-time. Scheduler-internal.
    #[inline]
    pub(crate) fn set_time(&self, time: Tick) {
        // SAFETY: see `state`.
        unsafe { *self.time.get() = time };
    }

    /// Invokes the task's callback with `arg`.
    ///
    /// Returns whatever `func` returns; the scheduler interprets a `Some`
    /// as an immediate-reschedule request.
    pub(crate) fn call(&self, arg: *mut ()) -> Option<NonNull<()>> {
        // SAFETY: see `state`.
        let ctx = unsafe { *self.ctx.get() };
        (self.func)(ctx, arg)
    }

    /// Rebinds this task's `ctx` pointer.
    ///
    /// Used by [`crate::timer::Timer`] to lazily bind its embedded task's
    /// `ctx` to its own `'static` address, which isn't known at `const`
    /// construction time.
    #[inline]
    pub(crate) fn set_ctx(&self, ctx: *mut ()) {
        // SAFETY: see `state`.
        unsafe { *self.ctx.get() = ctx };
    }

    /// Sets the `arg` for this task's next invocation.
    #[inline]
    pub(crate) fn set_next_arg(&self, arg: *mut ()) {
        // SAFETY: see `state`.
        unsafe { *self.next_arg.get() = arg };
    }

    /// Reads and clears this task's pending `arg`.
    #[inline]
    pub(crate) fn take_next_arg(&self) -> *mut () {
        // SAFETY: see `state`.
        let cell = unsafe { &mut *self.next_arg.get() };
        core::mem::replace(cell, core::ptr::null_mut())
    }

    /// Records one completed call of duration `elapsed` ticks.
    #[cfg(feature = "profiling")]
    pub(crate) fn record_call(&self, elapsed: Duration) {
        let elapsed = elapsed.max(0) as u32;
        // SAFETY: see `state`.
        let stats = unsafe { &mut *self.stats.get() };
        stats.call_count = stats.call_count.saturating_add(1);
        stats.cumulative_runtime = stats.cumulative_runtime.saturating_add(elapsed);
        stats.max_duration = stats.max_duration.max(elapsed);
    }

    /// Snapshot of this task's profiling counters.
    #[cfg(feature = "profiling")]
    pub fn stats(&self) -> TaskStats {
        // SAFETY: see `state`.
        unsafe { *self.stats.get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    fn noop(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
        None
    }

    #[test]
    fn new_task_is_idle() {
        let t = Task::new("t", noop, ptr::null_mut());
        assert_eq!(t.state(), TaskState::Idle);
        assert_eq!(t.name(), "t");
    }

    #[test]
    fn state_and_time_round_trip() {
        let t = Task::new("t", noop, ptr::null_mut());
        t.set_state(TaskState::Scheduled);
        t.set_time(42);
        assert_eq!(t.state(), TaskState::Scheduled);
        assert_eq!(t.get_time(), 42);
    }

    #[test]
    fn call_invokes_func_with_ctx_and_arg() {
        static mut SEEN: (usize, usize) = (0, 0);
        fn record(ctx: *mut (), arg: *mut ()) -> Option<NonNull<()>> {
            unsafe {
                #[allow(static_mut_refs)]
                {
                    SEEN = (ctx as usize, arg as usize);
                }
            }
            None
        }

        let ctx_val = 0x1000 as *mut ();
        let t = Task::new("t", record, ctx_val);
        let arg_val = 0x2000 as *mut ();
        let result = t.call(arg_val);
        assert!(result.is_none());
        unsafe {
            #[allow(static_mut_refs)]
            {
                assert_eq!(SEEN, (0x1000, 0x2000));
            }
        }
    }

    #[test]
    fn call_can_request_reschedule() {
        fn reschedule_self(_ctx: *mut (), arg: *mut ()) -> Option<NonNull<()>> {
            NonNull::new(arg)
        }

        let t = Task::new("t", reschedule_self, ptr::null_mut());
        let arg_val = 0x42 as *mut ();
        assert_eq!(t.call(arg_val), NonNull::new(arg_val));
    }

    #[cfg(feature = "profiling")]
    #[test]
    fn profiling_accumulates() {
        let t = Task::new("t", noop, ptr::null_mut());
        t.record_call(10);
        t.record_call(5);
        let stats = t.stats();
        assert_eq!(stats.call_count, 2);
        assert_eq!(stats.cumulative_runtime, 15);
        assert_eq!(stats.max_duration, 10);
    }
}
