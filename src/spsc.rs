//! Single-producer/single-consumer ring queue, used to hand tasks
//! from interrupt context to the main loop.
//!
//! The producer is expected to be an ISR (or, for host tests, a second
//! thread); the consumer is always the scheduler's main loop. Capacity is
//! fixed at construction and must be a power of two, checked at compile
//! time so there is no runtime capacity-validation path to get wrong.
//!
//! Lock-free via two free-running `AtomicUsize` indices, masked by
//! `N - 1` on every access — the same shape `hadron-core`'s own
//! lock-free primitives use, which is why this module reuses its
//! `loom`/`shuttle`-swappable atomic shim for concurrency testing.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

#[cfg(loom)]
use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(loom))]
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// A fixed-capacity, lock-free single-producer/single-consumer queue.
///
/// `N` must be a nonzero power of two; this is enforced at compile time.
pub struct SpscQueue<T, const N: usize> {
    head: AtomicUsize,
    tail: AtomicUsize,
    storage: [UnsafeCell<MaybeUninit<T>>; N],
}

// SAFETY: exactly one producer and one consumer ever touch `storage`, and
// the atomic head/tail handoff (Acquire/Release below) establishes the
// happens-before edges needed to move a `T` from the producer's context
// to the consumer's.
unsafe impl<T: Send, const N: usize> Send for SpscQueue<T, N> {}
// SAFETY: same reasoning; shared `&SpscQueue` references are how both
// sides of the queue reach it.
unsafe impl<T: Send, const N: usize> Sync for SpscQueue<T, N> {}

impl<T, const N: usize> SpscQueue<T, N> {
    const MASK: usize = N - 1;

    /// Creates an empty queue.
    ///
    /// # Panics (compile-time)
    ///
    /// Fails to compile if `N` is zero or not a power of two.
    #[inline]
    pub const fn new() -> Self {
        const { assert!(N > 0 && N.is_power_of_two(), "SpscQueue capacity must be a nonzero power of two") };
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            storage: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
        }
    }

    /// Number of items currently queued.
    #[inline]
    pub fn count(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    /// `true` if the queue holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// `true` if the queue is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count() == N
    }

    /// Pushes an item onto the queue. Safe to call from an ISR.
    ///
    /// Returns [`Error::Full`] without modifying the queue if it is at
    /// capacity; the caller (the application's ISR) decides whether to
    /// drop the item or escalate.
    pub fn put(&self, item: T) -> Result<()> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail.wrapping_sub(head) == N {
            return Err(Error::Full);
        }
        let slot = &self.storage[tail & Self::MASK];
        // SAFETY: the consumer only reads slots strictly below the
        // current `tail` once it observes the Release store below, and
        // `tail` has not yet been published, so we have exclusive access
        // to this slot.
        unsafe { (*slot.get()).write(item) };
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Removes and returns the oldest item. Main-loop only.
    ///
    /// Returns [`Error::Empty`] if the queue has no items.
    pub fn get(&self) -> Result<T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head == tail {
            return Err(Error::Empty);
        }
        let slot = &self.storage[head & Self::MASK];
        // SAFETY: `head != tail` means the producer has published this
        // slot via its Release store to `tail`, and the consumer is the
        // sole reader/remover of slots at or before `head`.
        let item = unsafe { (*slot.get()).assume_init_read() };
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Ok(item)
    }

    /// Returns a copy of the oldest item without removing it. Main-loop
    /// only, and only meaningful for `T: Copy`.
    pub fn peek(&self) -> Option<T>
    where
        T: Copy,
    {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let slot = &self.storage[head & Self::MASK];
        // SAFETY: same as `get`; we only read, never advance `head`.
        Some(unsafe { (*slot.get()).assume_init_read() })
    }

    /// Drops all queued items and resets the queue to empty.
    ///
    /// Not safe to call concurrently with `put`/`get` from another
    /// context; intended for reinitialization before the scheduler
    /// starts dispatching.
    pub fn reset(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        let mut idx = head;
        while idx != tail {
            let slot = &mut self.storage[idx & Self::MASK];
            // SAFETY: every slot in `[head, tail)` was written by `put`
            // and not yet read.
            unsafe { slot.get_mut().assume_init_drop() };
            idx = idx.wrapping_add(1);
        }
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
    }
}

impl<T, const N: usize> Default for SpscQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for SpscQueue<T, N> {
    fn drop(&mut self) {
        self.reset();
    }
}



#[cfg(all(test, shuttle))]
mod shuttle_tests {
    use super::*;

    #[test]
    fn shuttle_concurrent_handoff_preserves_order() {
        shuttle::check_random(
            || {
                use shuttle::sync::Arc;
                use shuttle::thread;

                const ITEMS: u32 = 20;
                let q: Arc<SpscQueue<u32, 4>> = Arc::new(SpscQueue::new());

                let producer = {
                    let q = q.clone();
                    thread::spawn(move || {
                        let mut next = 0u32;
                        while next < ITEMS {
                            if q.put(next).is_ok() {
                                next += 1;
                            } else {
                                thread::yield_now();
                            }
                        }
                    })
                };

                let mut expected = 0u32;
                while expected < ITEMS {
                    if let Ok(v) = q.get() {
                        assert_eq!(v, expected);
                        expected += 1;
                    } else {
                        shuttle::thread::yield_now();
                    }
                }
                producer.join().unwrap();
            },
            100,
        );
    }
}
