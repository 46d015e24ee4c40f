//! Timer: a one-shot or periodic wrapper around [`Scheduler`] scheduling.
//!
//! A [`Timer`] owns a small trampoline [`Task`] that invokes the caller's
//! callback and, for periodic timers, reschedules itself before
//! returning. `Timer` is generic over the same `RC`/`IC` capacities as
//! the [`Scheduler`] it drives: the trampoline downcasts its `ctx`
//! pointer back to a concrete `&'static Timer<RC, IC>`, and a fat
//! `dyn`-based scheduler reference wouldn't fit through the `*mut ()`
//! [`TaskFn`] carries, so the capacities have to be known at the
//! trampoline's monomorphization site.

use core::ptr::NonNull;

use crate::cell::RacyCell;
use crate::clock::{offset, Duration, Tick};
use crate::error::Result;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::task::Task;

/// Whether a timer fires once or repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Fires once, then stops.
    OneShot,
    /// Fires every `period` ticks until [`Timer::stop`] is called.
    Periodic {
        /// The repeat interval, in ticks.
        period: Duration,
    },
}

/// The user callback a timer invokes on each firing.
pub type TimerFn = fn(ctx: *mut ());

/// A one-shot or periodic timer built on top of a [`Scheduler`].
pub struct Timer<const RC: usize, const IC: usize> {
    task: Task,
    scheduler: RacyCell<Option<&'static Scheduler<RC, IC>>>,
    callback: RacyCell<Option<TimerFn>>,
    user_ctx: RacyCell<*mut ()>,
    mode: RacyCell<TimerMode>,
    running: RacyCell<bool>,
    bound: RacyCell<bool>,
}

impl<const RC: usize, const IC: usize> Timer<RC, IC> {
    /// Creates an unbound, stopped timer. Call [`Self::start`] to begin
    /// firing it.
    #[inline]
    pub const fn new() -> Self {
        Self {
            task: Task::new("timer", Self::trampoline, core::ptr::null_mut()),
            scheduler: RacyCell::new(None),
            callback: RacyCell::new(None),
            user_ctx: RacyCell::new(core::ptr::null_mut()),
            mode: RacyCell::new(TimerMode::OneShot),
            running: RacyCell::new(false),
            bound: RacyCell::new(false),
        }
    }

    /// Starts this timer as a one-shot, firing `callback(ctx)` once after
    /// `delay` ticks.
    pub fn start_one_shot(&'static self, scheduler: &'static Scheduler<RC, IC>, delay: Duration, callback: TimerFn, ctx: *mut ()) -> Result<()> {
        self.arm(scheduler, TimerMode::OneShot, delay, callback, ctx)
    }

    /// Starts this timer as periodic, firing `callback(ctx)` every
    /// `period` ticks, first firing after `period` ticks.
    pub fn start_periodic(&'static self, scheduler: &'static Scheduler<RC, IC>, period: Duration, callback: TimerFn, ctx: *mut ()) -> Result<()> {
        self.arm(scheduler, TimerMode::Periodic { period }, period, callback, ctx)
    }

    fn arm(&'static self, scheduler: &'static Scheduler<RC, IC>, mode: TimerMode, delay: Duration, callback: TimerFn, ctx: *mut ()) -> Result<()> {
        self.bind();
        // SAFETY: single-threaded cooperative contract.
        unsafe {
            *self.scheduler.get() = Some(scheduler);
            *self.callback.get() = Some(callback);
            *self.user_ctx.get() = ctx;
            *self.mode.get() = mode;
            *self.running.get() = true;
        }
        scheduler.task_in(TaskHandle::new(&self.task), delay)
    }

    /// Stops this timer. Idempotent; safe to call even if not running.
    pub fn stop(&self) {
        // SAFETY: see `arm`.
        let was_running = core::mem::replace(unsafe { &mut *self.running.get() }, false);
        if was_running {
            if let Some(scheduler) = unsafe { *self.scheduler.get() } {
                let _ = scheduler.remove_task(TaskHandle::new(&self.task));
            }
        }
    }

    /// `true` if this timer is currently armed (not yet fired, for a
    /// one-shot, or not yet stopped, for a periodic timer).
    #[inline]
    pub fn is_running(&self) -> bool {
        // SAFETY: see `arm`.
        unsafe { *self.running.get() }
    }

    /// Binds the embedded trampoline task's `ctx` to this timer's own
    /// address, once. `Timer` values are always `'static`, so this
    /// address is stable for the lifetime of the program.
    fn bind(&'static self) {
        // SAFETY: see `arm`.
        let already_bound = core::mem::replace(unsafe { &mut *self.bound.get() }, true);
        if !already_bound {
            self.task.set_ctx(core::ptr::from_ref(self) as *mut ());
        }
    }

    fn trampoline(ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
        // SAFETY: `ctx` was bound in `bind` to `self as *mut ()`, and a
        // `Timer` is always `'static`.
        let this: &'static Self = unsafe { &*ctx.cast::<Self>() };

        // SAFETY: see `arm`.
        let mode = unsafe { *this.mode.get() };
        let callback = unsafe { *this.callback.get() };
        let user_ctx = unsafe { *this.user_ctx.get() };

        if let Some(callback) = callback {
            callback(user_ctx);
        }

        match mode {
            TimerMode::OneShot => {
                // SAFETY: see `arm`.
                unsafe { *this.running.get() = false };
                None
            }
            TimerMode::Periodic { period } => {
                let due = offset(this.task.get_time(), period);
                if let Some(scheduler) = unsafe { *this.scheduler.get() } {
                    let _ = scheduler.task_at(TaskHandle::new(&this.task), due);
                }
                None
            }
        }
    }
}

impl<const RC: usize, const IC: usize> Default for Timer<RC, IC> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    static TICK: AtomicU32 = AtomicU32::new(0);

    fn test_clock() -> Tick {
        TICK.load(Ordering::Relaxed)
    }

    fn advance(by: Tick) {
        TICK.fetch_add(by, Ordering::Relaxed);
    }

    static FIRE_COUNT: AtomicU32 = AtomicU32::new(0);

    fn on_fire(_ctx: *mut ()) {
        FIRE_COUNT.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn one_shot_fires_once() {
        TICK.store(0, Ordering::Relaxed);
        FIRE_COUNT.store(0, Ordering::Relaxed);

        static SCHED: Scheduler<4, 4> = Scheduler::new();
        static TIMER: Timer<4, 4> = Timer::new();

        SCHED.set_clock_source(test_clock);
        TIMER
            .start_one_shot(&SCHED, 10, on_fire, core::ptr::null_mut())
            .unwrap();

        advance(10);
        SCHED.step().unwrap();
        assert_eq!(FIRE_COUNT.load(Ordering::Relaxed), 1);
        assert!(!TIMER.is_running());

        // A further step with nothing due should not refire it.
        advance(10);
        SCHED.step().unwrap();
        assert_eq!(FIRE_COUNT.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn periodic_fires_repeatedly_without_drift() {
        TICK.store(0, Ordering::Relaxed);
        FIRE_COUNT.store(0, Ordering::Relaxed);

        static SCHED: Scheduler<4, 4> = Scheduler::new();
        static TIMER: Timer<4, 4> = Timer::new();

        SCHED.set_clock_source(test_clock);
        TIMER
            .start_periodic(&SCHED, 10, on_fire, core::ptr::null_mut())
            .unwrap();

        for _ in 0..5 {
            advance(10);
            SCHED.step().unwrap();
        }
        assert_eq!(FIRE_COUNT.load(Ordering::Relaxed), 5);
        assert!(TIMER.is_running());
    }

    #[test]
    fn stop_prevents_further_firing() {
        TICK.store(0, Ordering::Relaxed);
        FIRE_COUNT.store(0, Ordering::Relaxed);

        static SCHED: Scheduler<4, 4> = Scheduler::new();
        static TIMER: Timer<4, 4> = Timer::new();

        SCHED.set_clock_source(test_clock);
        TIMER
            .start_periodic(&SCHED, 10, on_fire, core::ptr::null_mut())
            .unwrap();

        advance(10);
        SCHED.step().unwrap();
        assert_eq!(FIRE_COUNT.load(Ordering::Relaxed), 1);

        TIMER.stop();
        assert!(!TIMER.is_running());

        advance(10);
        SCHED.step().unwrap();
        assert_eq!(FIRE_COUNT.load(Ordering::Relaxed), 1);
    }
}
