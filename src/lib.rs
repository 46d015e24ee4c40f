//! A cooperative, single-threaded task scheduler for resource-constrained
//! microcontrollers.
//!
//! Tasks are plain function pointers paired with an opaque context
//! pointer; the [`scheduler::Scheduler`] dispatches the soonest
//! due one from a fixed-capacity ready queue each time its
//! `step` is called, normally in the application's main loop. An
//! interrupt handler hands work to the main loop through a lock-free
//! single-producer/single-consumer queue rather than touching the
//! ready queue directly, since the ready queue's own array-heap is not
//! ISR-safe. [`timer::Timer`] layers one-shot and periodic firing on top
//! of the scheduler, and [`broadcast::BroadcastRegistry`] gives tasks a
//! channel-scoped publish/subscribe mechanism for decoupled
//! notification.
//!
//! Every bounded collection here is sized by a const generic fixed at
//! compile time; nothing in this crate allocates.
//!
//! This crate does not manage `'static` storage for you — tasks,
//! timers, and the scheduler itself are ordinary values the application
//! places in `static`s (or otherwise gives a `'static` lifetime) and
//! wires together explicitly. There is no process-wide singleton
//! scheduler; nothing prevents an application from running more than one
//! (e.g. one per core, in a future multi-core target), as long as each
//! is only ever stepped from one context at a time.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod broadcast;
pub mod cell;
pub mod clock;
pub mod error;
pub mod ready_queue;
pub mod scheduler;
pub mod spsc;
pub mod task;
pub mod timer;

pub use broadcast::{BroadcastRegistry, Channel, HandlerFn, ALL_CHANNELS, CHANNEL_MIN};
pub use clock::{ClockFn, Duration, Tick};
pub use error::{Error, Result};
pub use ready_queue::ReadyQueue;
pub use scheduler::{IsrEntry, Scheduler, TaskHandle, TaskStatus};
pub use spsc::SpscQueue;
pub use task::{Task, TaskFn, TaskState};
pub use timer::{Timer, TimerFn, TimerMode};
