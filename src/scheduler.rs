//! The scheduler: ties the clock, ready queue and ISR queue
//! together into the cooperative run-to-completion dispatch loop.
//!
//! `READY_CAP` and `ISR_CAP` are const generics rather than constructor
//! arguments because every bounded collection in this crate is sized at
//! compile time — this also lets
//! [`Scheduler`] itself be a `'static` value with no heap allocation, the
//! same pattern `hadron-core::sched::ReadyQueues` uses for its per-priority
//! queues.

use core::ptr::NonNull;

use crate::cell::RacyCell;
use crate::clock::{no_clock, offset, precedes, ClockFn, Duration, Tick};
#[cfg(feature = "profiling")]
use crate::clock::difference;
use crate::error::{Error, Result};
use crate::ready_queue::ReadyQueue;
use crate::spsc::SpscQueue;
use crate::task::{Task, TaskState};

/// A stable reference to a [`Task`], suitable for use as a ready-queue or
/// ISR-queue payload.
///
/// Tasks are normally `'static` values owned by the application; a
/// `TaskHandle` is just a thin, `Copy` wrapper around `&'static Task` with
/// identity-based equality, so two handles compare equal iff they name
/// the same task, regardless of its current due-time or state.
#[derive(Clone, Copy)]
pub struct TaskHandle(&'static Task);

impl TaskHandle {
    /// Wraps a `'static` task reference as a handle.
    #[inline]
    pub const fn new(task: &'static Task) -> Self {
        Self(task)
    }

    /// Borrows the underlying task.
    #[inline]
    pub fn task(&self) -> &'static Task {
        self.0
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl Eq for TaskHandle {}

/// One ISR-queue entry: a task handle plus the `arg` it should be called
/// with when the main loop gets around to it.
#[derive(Clone, Copy)]
pub struct IsrEntry {
    /// The handle to schedule once this entry is drained.
    pub handle: TaskHandle,
    /// The `arg` value carried to the task's next invocation.
    pub arg: usize,
}

/// The cooperative scheduler.
///
/// `READY_CAP` bounds the number of tasks that may be simultaneously
/// scheduled; `ISR_CAP` bounds the number of ISR-to-main-loop handoffs
/// that may be in flight and must be a power of two (enforced at compile
/// time by [`SpscQueue`]).
pub struct Scheduler<const READY_CAP: usize, const ISR_CAP: usize> {
    ready: RacyCell<ReadyQueue<TaskHandle, READY_CAP>>,
    isr_queue: SpscQueue<IsrEntry, ISR_CAP>,
    clock: RacyCell<ClockFn>,
    idle: RacyCell<TaskFnPtr>,
    running: RacyCell<Option<TaskHandle>>,
}

/// Idle-task callback, invoked with `(scheduler_ptr, scheduler_ptr)` when
/// nothing is due.
type TaskFnPtr = fn(*mut (), *mut ()) -> Option<NonNull<()>>;

/// The scheduler's default idle task: a no-op, in place until the
/// application installs its own via `set_idle_task`.
fn default_idle_task(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
    None
}

/// A task's run state as observed by the scheduler, partitioning
/// {ACTIVE, RUNNABLE, SCHEDULED, IDLE} disjointly. Distinct from
/// [`TaskState`], which is the task's own internal bookkeeping: a task
/// reports `Scheduled` here only once its due-time has not yet arrived,
/// whereas `TaskState::Scheduled` covers both `Scheduled` and `Runnable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not queued and not running.
    Idle,
    /// Queued in the ready queue; due-time is still in the future.
    Scheduled,
    /// Queued in the ready queue; due-time has arrived.
    Runnable,
    /// Currently being dispatched by [`Scheduler::step`].
    Active,
}

impl<const READY_CAP: usize, const ISR_CAP: usize> Scheduler<READY_CAP, ISR_CAP> {
    /// Creates a scheduler bound to [`no_clock`] and the default (no-op)
    /// idle task. Call [`Self::set_clock_source`] before the first
    /// [`Self::step`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            ready: RacyCell::new(ReadyQueue::new()),
            isr_queue: SpscQueue::new(),
            clock: RacyCell::new(no_clock),
            idle: RacyCell::new(default_idle_task),
            running: RacyCell::new(None),
        }
    }

    /// Binds the monotonic clock source used by every time-relative API.
    pub fn set_clock_source(&self, clock: ClockFn) {
        // SAFETY: single-threaded cooperative contract.
        unsafe { *self.clock.get() = clock };
    }

    /// The currently bound clock source.
    #[inline]
    pub fn clock_source(&self) -> ClockFn {
        // SAFETY: see `set_clock_source`.
        unsafe { *self.clock.get() }
    }

    /// Installs the idle task, invoked by [`Self::step`] when nothing is
    /// due. Called with both `ctx` and `arg` set to a pointer to this
    /// scheduler, so it may call [`Self::next_time`] / [`Self::is_empty`]
    /// to decide how long it may safely sleep.
    pub fn set_idle_task(&self, idle: TaskFnPtr) {
        // SAFETY: see `set_clock_source`.
        unsafe { *self.idle.get() = idle };
    }

    /// The currently installed idle task.
    #[inline]
    pub fn get_idle_task(&self) -> TaskFnPtr {
        // SAFETY: see `set_clock_source`.
        unsafe { *self.idle.get() }
    }

    /// The scheduler's built-in idle task: a no-op. `set_idle_task` isn't
    /// mandatory — a fresh `Scheduler` already runs this one.
    #[inline]
    pub const fn get_default_idle_task() -> TaskFnPtr {
        default_idle_task
    }

    /// Current time per the bound clock source.
    #[inline]
    pub fn current_time(&self) -> Tick {
        // SAFETY: see `set_clock_source`.
        let clock = unsafe { *self.clock.get() };
        clock()
    }

    /// Number of tasks currently in the ready queue.
    #[inline]
    pub fn count(&self) -> usize {
        // SAFETY: see `set_clock_source`.
        unsafe { (*self.ready.get()).count() }
    }

    /// `true` if the ready queue holds no tasks. Does not account for
    /// undrained ISR-queue entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        // SAFETY: see `set_clock_source`.
        unsafe { (*self.ready.get()).is_empty() }
    }

    /// Due-time of the soonest ready task, if any.
    #[inline]
    pub fn next_time(&self) -> Option<Tick> {
        // SAFETY: see `set_clock_source`.
        unsafe { (*self.ready.get()).next_time() }
    }

    /// Schedules `handle` to run at the absolute tick `time`.
    pub fn task_at(&self, handle: TaskHandle, time: Tick) -> Result<()> {
        self.schedule(handle, time, core::ptr::null_mut())
    }

    /// Schedules `handle` to run as soon as possible.
    pub fn task_now(&self, handle: TaskHandle) -> Result<()> {
        let now = self.current_time();
        self.task_at(handle, now)
    }

    /// Schedules `handle` to run `delay` ticks from now.
    pub fn task_in(&self, handle: TaskHandle, delay: Duration) -> Result<()> {
        let due = offset(self.current_time(), delay);
        self.task_at(handle, due)
    }

    /// Reschedules the currently-dispatching task `delay` ticks from its
    /// previous due-time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if called outside the dynamic extent
    /// of a task's own invocation.
    pub fn reschedule_in(&self, delay: Duration) -> Result<()> {
        let handle = self.current_running()?;
        let due = offset(handle.task().get_time(), delay);
        self.schedule(handle, due, core::ptr::null_mut())
    }

    /// Reschedules the currently-dispatching task to run again as soon as
    /// possible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if called outside the dynamic extent
    /// of a task's own invocation.
    pub fn reschedule_now(&self) -> Result<()> {
        let handle = self.current_running()?;
        self.task_now(handle)
    }

    /// Hands a task off from interrupt context to the main loop.
    ///
    /// Safe to call from an ISR: only touches the lock-free ISR queue.
    /// `arg` becomes the `arg` this task is called with once
    /// [`Self::step`] drains the handoff.
    pub fn task_from_isr(&self, handle: TaskHandle, arg: *mut ()) -> Result<()> {
        let result = self.isr_queue.put(IsrEntry {
            handle,
            arg: arg as usize,
        });
        #[cfg(feature = "log")]
        if result.is_err() {
            log::warn!("ISR handoff for \"{}\" dropped: ISR queue is full", handle.task().name());
        }
        result
    }

    /// Removes `handle` from the ready queue if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `handle` is not currently scheduled.
    pub fn remove_task(&self, handle: TaskHandle) -> Result<()> {
        // SAFETY: see `set_clock_source`.
        let ready = unsafe { &mut *self.ready.get() };
        match ready.remove(handle) {
            Some(_) => {
                handle.task().set_state(TaskState::Idle);
                Ok(())
            }
            None => Err(Error::NotFound),
        }
    }

    /// This task's status, per the scheduler's {ACTIVE, RUNNABLE,
    /// SCHEDULED, IDLE} partition.
    pub fn get_task_status(&self, handle: TaskHandle) -> TaskStatus {
        if self.current_task() == Some(handle) {
            return TaskStatus::Active;
        }
        // SAFETY: see `set_clock_source`.
        let ready = unsafe { &*self.ready.get() };
        if !ready.contains(handle) {
            return TaskStatus::Idle;
        }
        let now = self.current_time();
        if !precedes(now, handle.task().get_time()) {
            TaskStatus::Runnable
        } else {
            TaskStatus::Scheduled
        }
    }

    /// The task currently being dispatched by `step`, if any.
    #[inline]
    pub fn current_task(&self) -> Option<TaskHandle> {
        // SAFETY: see `set_clock_source`.
        unsafe { *self.running.get() }
    }

    /// The soonest-due task in the ready queue, if any, regardless of
    /// whether its due-time has arrived yet.
    #[inline]
    pub fn next_task(&self) -> Option<TaskHandle> {
        // SAFETY: see `set_clock_source`.
        unsafe { (*self.ready.get()).peek_soonest() }.map(|(handle, _)| handle)
    }

    /// `true` if `handle` is currently enqueued in the ready queue (i.e.
    /// its status is `Scheduled` or `Runnable`).
    #[inline]
    pub fn task_is_scheduled(&self, handle: TaskHandle) -> bool {
        // SAFETY: see `set_clock_source`.
        unsafe { (*self.ready.get()).contains(handle) }
    }

    /// Read-only access to the ready queue, for introspection.
    #[inline]
    pub fn task_queue(&self) -> &ReadyQueue<TaskHandle, READY_CAP> {
        // SAFETY: see `set_clock_source`.
        unsafe { &*self.ready.get() }
    }

    /// Read-only access to the ISR handoff queue, for introspection.
    #[inline]
    pub fn isr_queue(&self) -> &SpscQueue<IsrEntry, ISR_CAP> {
        &self.isr_queue
    }

    /// Empties the ready queue and the ISR queue and clears the
    /// currently-dispatching task, if any.
    ///
    /// Intended for reinitialization before the scheduler starts
    /// dispatching; like [`SpscQueue::reset`], not safe to call
    /// concurrently with `step` or an ISR handoff.
    pub fn reset(&self) {
        // SAFETY: see `set_clock_source`.
        let ready = unsafe { &mut *self.ready.get() };
        while let Some((handle, _)) = ready.pop_soonest() {
            handle.task().set_state(TaskState::Idle);
        }
        while self.isr_queue.get().is_ok() {}
        // SAFETY: see `set_clock_source`.
        unsafe { *self.running.get() = None };
    }

    /// Runs one iteration of the dispatch loop.
    ///
    /// Drains any pending ISR handoffs into the ready queue, then either
    /// dispatches the soonest due task or, if nothing is due, invokes the
    /// idle task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Full`] if draining an ISR handoff would overflow
    /// the ready queue; the handoff is left in the ISR queue rather than
    /// dropped, so a later `step` can
    /// retry once the ready queue has room.
    pub fn step(&self) -> Result<()> {
        self.drain_isr_queue()?;

        let now = self.current_time();
        // SAFETY: see `set_clock_source`.
        let ready = unsafe { &mut *self.ready.get() };
        let Some((handle, due)) = ready.peek_soonest() else {
            self.run_idle();
            return Ok(());
        };

        if precedes(now, due) {
            // Soonest task isn't due yet.
            self.run_idle();
            return Ok(());
        }

        ready.pop_soonest();
        self.dispatch(handle, now);
        Ok(())
    }

    /// Peeks, and if there is room in the ready queue, pops and schedules
    /// every pending ISR handoff. Stops and reports `Error::Full` on the
    /// first handoff that would overflow the ready queue, leaving it
    /// queued for the next `step`.
    fn drain_isr_queue(&self) -> Result<()> {
        loop {
            let Some(entry) = self.isr_queue.peek() else {
                return Ok(());
            };
            // SAFETY: see `set_clock_source`.
            let ready = unsafe { &mut *self.ready.get() };
            if ready.is_full() {
                #[cfg(feature = "log")]
                log::warn!("ISR handoff for \"{}\" stalled: ready queue is full", entry.handle.task().name());
                return Err(Error::Full);
            }
            let now = self.current_time();
            ready
                .insert(entry.handle, now)
                .expect("checked not full above");
            entry.handle.task().set_next_arg(entry.arg as *mut ());
            entry.handle.task().set_state(TaskState::Scheduled);
            // Commit: actually remove the entry we just scheduled.
            let _ = self.isr_queue.get();
        }
    }

    fn dispatch(&self, handle: TaskHandle, now: Tick) {
        handle.task().set_state(TaskState::Running);
        // SAFETY: see `set_clock_source`.
        unsafe { *self.running.get() = Some(handle) };

        let arg = handle.task().take_next_arg();
        let result = handle.task().call(arg);

        #[cfg(feature = "profiling")]
        {
            let end = self.current_time();
            handle.task().record_call(difference(end, now));
        }
        #[cfg(not(feature = "profiling"))]
        let _ = now;

        // SAFETY: see `set_clock_source`.
        unsafe { *self.running.get() = None };

        // A task that didn't reschedule itself (directly, or implicitly
        // via a `Some` return below) settles back to `Idle`.
        if handle.task().state() == TaskState::Running {
            handle.task().set_state(TaskState::Idle);
        }

        if let Some(next_arg) = result {
            handle.task().set_next_arg(next_arg.as_ptr());
            // Best-effort: an immediate-reschedule request racing a full
            // ready queue is dropped rather than panicking, matching
            // `remove_task`'s non-fatal error contract. The task
            // can detect this via `get_task_status` if it cares.
            let _ = self.task_now(handle);
        }
    }

    fn run_idle(&self) {
        // SAFETY: see `set_clock_source`.
        let idle = unsafe { *self.idle.get() };
        let self_ptr = core::ptr::from_ref(self) as *mut ();
        idle(self_ptr, self_ptr);
    }

    fn current_running(&self) -> Result<TaskHandle> {
        self.current_task().ok_or(Error::NotFound)
    }

    fn schedule(&self, handle: TaskHandle, due: Tick, arg: *mut ()) -> Result<()> {
        // SAFETY: see `set_clock_source`.
        let ready = unsafe { &mut *self.ready.get() };
        if ready.contains(handle) {
            ready.remove(handle);
        }
        if let Err(err) = ready.insert(handle, due) {
            #[cfg(feature = "log")]
            log::warn!("failed to schedule \"{}\": ready queue is full", handle.task().name());
            return Err(err);
        }
        handle.task().set_next_arg(arg);
        handle.task().set_time(due);
        handle.task().set_state(TaskState::Scheduled);
        Ok(())
    }
}

impl<const READY_CAP: usize, const ISR_CAP: usize> Default for Scheduler<READY_CAP, ISR_CAP> {
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

    static RAN: AtomicU32 = AtomicU32::new(0);

    fn mark(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
        RAN.fetch_add(1, Ordering::Relaxed);
        None
    }

    #[test]
    fn two_tasks_dispatch_in_due_order() {
        TICK.store(0, Ordering::Relaxed);
        RAN.store(0, Ordering::Relaxed);

        static ORDER: RacyCell<[u8; 2]> = RacyCell::new([0, 0]);
        static IDX: AtomicU32 = AtomicU32::new(0);

        fn first(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
            let i = IDX.fetch_add(1, Ordering::Relaxed) as usize;
            unsafe { (*ORDER.get())[i] = 1 };
            None
        }
        fn second(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
            let i = IDX.fetch_add(1, Ordering::Relaxed) as usize;
            unsafe { (*ORDER.get())[i] = 2 };
            None
        }

        static TASK_A: Task = Task::new("a", first, core::ptr::null_mut());
        static TASK_B: Task = Task::new("b", second, core::ptr::null_mut());

        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);

        sched.task_at(TaskHandle::new(&TASK_B), 20).unwrap();
        sched.task_at(TaskHandle::new(&TASK_A), 10).unwrap();

        advance(10);
        sched.step().unwrap();
        advance(10);
        sched.step().unwrap();

        assert_eq!(unsafe { *ORDER.get() }, [1, 2]);
    }

    #[test]
    fn reschedule_in_moves_due_time() {
        TICK.store(0, Ordering::Relaxed);
        RAN.store(0, Ordering::Relaxed);

        static SCHED: Scheduler<4, 4> = Scheduler::new();

        fn reschedule_self(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
            RAN.fetch_add(1, Ordering::Relaxed);
            SCHED.reschedule_in(5).unwrap();
            None
        }
        static TASK: Task = Task::new("t", reschedule_self, core::ptr::null_mut());

        SCHED.set_clock_source(test_clock);
        SCHED.task_at(TaskHandle::new(&TASK), 10).unwrap();

        advance(10);
        SCHED.step().unwrap();
        assert_eq!(RAN.load(Ordering::Relaxed), 1);
        assert_eq!(TASK.get_time(), 15);
        assert_eq!(
            SCHED.get_task_status(TaskHandle::new(&TASK)),
            TaskStatus::Scheduled
        );
    }

    #[test]
    fn ready_queue_overflow_is_reported() {
        static TASKS: [Task; 5] = [
            Task::new("0", mark, core::ptr::null_mut()),
            Task::new("1", mark, core::ptr::null_mut()),
            Task::new("2", mark, core::ptr::null_mut()),
            Task::new("3", mark, core::ptr::null_mut()),
            Task::new("4", mark, core::ptr::null_mut()),
        ];

        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);
        for t in &TASKS[..4] {
            sched.task_at(TaskHandle::new(t), 100).unwrap();
        }
        assert_eq!(
            sched.task_at(TaskHandle::new(&TASKS[4]), 100),
            Err(Error::Full)
        );
    }

    #[test]
    fn isr_overflow_leaves_entry_queued() {
        TICK.store(0, Ordering::Relaxed);

        static TASKS: [Task; 5] = [
            Task::new("0", mark, core::ptr::null_mut()),
            Task::new("1", mark, core::ptr::null_mut()),
            Task::new("2", mark, core::ptr::null_mut()),
            Task::new("3", mark, core::ptr::null_mut()),
            Task::new("4", mark, core::ptr::null_mut()),
        ];

        let sched: Scheduler<4, 8> = Scheduler::new();
        sched.set_clock_source(test_clock);
        for t in &TASKS[..4] {
            sched
                .task_from_isr(TaskHandle::new(t), core::ptr::null_mut())
                .unwrap();
        }
        sched
            .task_from_isr(TaskHandle::new(&TASKS[4]), core::ptr::null_mut())
            .unwrap();

        // Four fit; the fifth overflows the ready queue and must stay
        // queued rather than being silently dropped.
        assert_eq!(sched.step(), Err(Error::Full));
        assert_eq!(sched.isr_queue.count(), 1);
    }

    #[test]
    fn idle_task_runs_when_nothing_due() {
        TICK.store(0, Ordering::Relaxed);
        static IDLE_RAN: AtomicU32 = AtomicU32::new(0);
        fn idle(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
            IDLE_RAN.fetch_add(1, Ordering::Relaxed);
            None
        }

        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);
        sched.set_idle_task(idle);
        sched.step().unwrap();
        assert_eq!(IDLE_RAN.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn remove_task_clears_schedule() {
        static TASK: Task = Task::new("t", mark, core::ptr::null_mut());
        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);
        let handle = TaskHandle::new(&TASK);
        sched.task_at(handle, 10).unwrap();
        sched.remove_task(handle).unwrap();
        assert_eq!(sched.get_task_status(handle), TaskStatus::Idle);
        assert_eq!(sched.remove_task(handle), Err(Error::NotFound));
    }

    #[test]
    fn task_status_is_runnable_once_due_time_arrives() {
        TICK.store(0, Ordering::Relaxed);
        static TASK: Task = Task::new("t", mark, core::ptr::null_mut());
        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);
        let handle = TaskHandle::new(&TASK);

        sched.task_at(handle, 10).unwrap();
        assert_eq!(sched.get_task_status(handle), TaskStatus::Scheduled);

        advance(15);
        assert_eq!(sched.get_task_status(handle), TaskStatus::Runnable);
    }

    #[test]
    fn task_status_is_active_while_dispatching() {
        TICK.store(0, Ordering::Relaxed);
        static SCHED: Scheduler<4, 4> = Scheduler::new();
        static STATUS_DURING_CALL: RacyCell<Option<TaskStatus>> = RacyCell::new(None);

        fn observe_self(_ctx: *mut (), _arg: *mut ()) -> Option<NonNull<()>> {
            let handle = TaskHandle::new(&TASK);
            unsafe { *STATUS_DURING_CALL.get() = Some(SCHED.get_task_status(handle)) };
            None
        }
        static TASK: Task = Task::new("t", observe_self, core::ptr::null_mut());

        SCHED.set_clock_source(test_clock);
        SCHED.task_at(TaskHandle::new(&TASK), 0).unwrap();
        SCHED.step().unwrap();

        assert_eq!(unsafe { *STATUS_DURING_CALL.get() }, Some(TaskStatus::Active));
    }

    #[test]
    fn reset_empties_queues_and_clears_current_task() {
        TICK.store(0, Ordering::Relaxed);
        static TASKS: [Task; 2] = [
            Task::new("0", mark, core::ptr::null_mut()),
            Task::new("1", mark, core::ptr::null_mut()),
        ];
        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);

        sched.task_at(TaskHandle::new(&TASKS[0]), 10).unwrap();
        sched
            .task_from_isr(TaskHandle::new(&TASKS[1]), core::ptr::null_mut())
            .unwrap();
        assert!(!sched.is_empty());

        sched.reset();

        assert!(sched.is_empty());
        assert_eq!(sched.isr_queue().count(), 0);
        assert_eq!(sched.current_task(), None);
        assert_eq!(
            sched.get_task_status(TaskHandle::new(&TASKS[0])),
            TaskStatus::Idle
        );
    }

    #[test]
    fn task_is_scheduled_and_queue_accessors_reflect_ready_queue() {
        static TASK: Task = Task::new("t", mark, core::ptr::null_mut());
        let sched: Scheduler<4, 4> = Scheduler::new();
        sched.set_clock_source(test_clock);
        let handle = TaskHandle::new(&TASK);

        assert!(!sched.task_is_scheduled(handle));
        assert_eq!(sched.next_task(), None);

        sched.task_at(handle, 5).unwrap();
        assert!(sched.task_is_scheduled(handle));
        assert_eq!(sched.next_task(), Some(handle));
        assert_eq!(sched.task_queue().count(), 1);
    }

    #[test]
    fn idle_task_defaults_to_default_idle_task() {
        let sched: Scheduler<4, 4> = Scheduler::new();
        assert_eq!(
            sched.get_idle_task() as usize,
            Scheduler::<4, 4>::get_default_idle_task() as usize
        );
    }
}
