//! Priority store for pending tasks: an array-backed binary min-heap
//! ordered by due-time, with FIFO tie-breaking for equal due-times.
//!
//! Built on [`ArrayVec`](planck_noalloc::vec::ArrayVec) rather than a plain
//! array, mirroring how the rest of this crate's bounded collections are
//! built on it (`hadron-core`'s `WaitQueue` does the same for its waiter
//! list). `H` is the opaque handle type the caller associates with each
//! entry — the scheduler uses [`crate::scheduler::TaskHandle`].

use planck_noalloc::vec::ArrayVec;

use crate::clock::{precedes, Tick};
use crate::error::{Error, Result};

/// One entry in the heap: a handle with its due-time and an insertion
/// sequence number used to break exact due-time ties in FIFO order.
#[derive(Clone, Copy)]
struct Entry<H> {
    due: Tick,
    seq: u64,
    handle: H,
}

impl<H> Entry<H> {
    /// `true` if `self` must be popped strictly before `other`.
    #[inline]
    fn sooner_than(&self, other: &Self) -> bool {
        if self.due == other.due {
            self.seq < other.seq
        } else {
            precedes(self.due, other.due)
        }
    }
}

/// A fixed-capacity min-heap of `(handle, due-time)` pairs.
pub struct ReadyQueue<H, const N: usize> {
    entries: ArrayVec<Entry<H>, N>,
    next_seq: u64,
}

impl<H: Copy + PartialEq, const N: usize> ReadyQueue<H, N> {
    /// Creates an empty queue.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
            next_seq: 0,
        }
    }

    /// Number of entries currently queued.
    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the queue holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if the queue is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Due-time of the soonest entry, if any.
    #[inline]
    pub fn next_time(&self) -> Option<Tick> {
        self.entries.as_slice().first().map(|e| e.due)
    }

    /// `true` if `handle` is already queued.
    pub fn contains(&self, handle: H) -> bool {
        self.entries.as_slice().iter().any(|e| e.handle == handle)
    }

    /// Inserts `handle` with the given due-time.
    ///
    /// Returns [`Error::Full`] without modifying the queue if it is at
    /// capacity.
    pub fn insert(&mut self, handle: H, due: Tick) -> Result<()> {
        if self.entries.is_full() {
            return Err(Error::Full);
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(Entry { due, seq, handle });
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }

    /// Removes `handle` if present, returning its due-time.
    pub fn remove(&mut self, handle: H) -> Option<Tick> {
        let idx = self.entries.as_slice().iter().position(|e| e.handle == handle)?;
        Some(self.remove_at(idx))
    }

    /// Returns the soonest entry without removing it.
    pub fn peek_soonest(&self) -> Option<(H, Tick)> {
        self.entries.as_slice().first().map(|e| (e.handle, e.due))
    }

    /// Removes and returns the soonest entry.
    pub fn pop_soonest(&mut self) -> Option<(H, Tick)> {
        if self.entries.is_empty() {
            return None;
        }
        let top = self.entries.as_slice()[0];
        self.remove_at(0);
        Some((top.handle, top.due))
    }

    fn remove_at(&mut self, idx: usize) -> Tick {
        let last = self.entries.len() - 1;
        self.entries.as_mut_slice().swap(idx, last);
        let removed = self.entries.pop().expect("checked non-empty by caller").due;
        if idx < self.entries.len() {
            // The entry swapped into `idx` may need to move either way.
            if !self.sift_up(idx) {
                self.sift_down(idx);
            }
        }
        removed
    }

    /// Moves the entry at `idx` up while it precedes its parent. Returns
    /// `true` if it moved.
    fn sift_up(&mut self, mut idx: usize) -> bool {
        let moved = idx > 0 && {
            let slice = self.entries.as_slice();
            slice[idx].sooner_than(&slice[(idx - 1) / 2])
        };
        while idx > 0 {
            let parent = (idx - 1) / 2;
            let slice = self.entries.as_slice();
            if slice[idx].sooner_than(&slice[parent]) {
                self.entries.as_mut_slice().swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
        moved
    }

    /// Moves the entry at `idx` down while it follows a child.
    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            let slice = self.entries.as_slice();
            if left < len && slice[left].sooner_than(&slice[smallest]) {
                smallest = left;
            }
            if right < len && slice[right].sooner_than(&slice[smallest]) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.entries.as_mut_slice().swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<H: Copy + PartialEq, const N: usize> Default for ReadyQueue<H, N> {
    fn default() -> Self {
        Self::new()
    }
}
