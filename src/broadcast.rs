//! Broadcast registry: channel-scoped publish/subscribe for
//! decoupled task-to-task notification.
//!
//! Built on [`ArrayVec`] like every other bounded collection in this
//! crate. `notify` takes a snapshot of the subscriber table before
//! calling any handler, so a handler that subscribes or unsubscribes
//! (its own channel or another) only affects subsequent `notify` calls,
//! never the one currently in flight.

use planck_noalloc::vec::ArrayVec;

use crate::cell::RacyCell;
use crate::error::{Error, Result};

/// A broadcast channel number.
pub type Channel = u32;

/// Sentinel channel meaning "every channel" when passed to
/// [`BroadcastRegistry::notify`]. Illegal as a `subscribe`/`unsubscribe`
/// channel.
pub const ALL_CHANNELS: Channel = Channel::MAX;

/// Smallest legal channel number; `subscribe`/`unsubscribe` reject any
/// channel below this.
pub const CHANNEL_MIN: Channel = 1;

/// A subscriber's callback: invoked with the channel it is subscribed
/// to (always a concrete channel, even when reached via a
/// `notify(ALL_CHANNELS, ..)` call), its registered `ctx`, and the
/// notification's `payload`.
pub type HandlerFn = fn(channel: Channel, ctx: *mut (), payload: *mut ());

/// One registered `(channel, handler, ctx)` triple.
#[derive(Clone, Copy)]
struct Subscriber {
    channel: Channel,
    handler: HandlerFn,
    ctx: *mut (),
}

/// A fixed-capacity table of channel subscribers.
pub struct BroadcastRegistry<const N: usize> {
    subs: RacyCell<ArrayVec<Subscriber, N>>,
}

impl<const N: usize> BroadcastRegistry<N> {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            subs: RacyCell::new(ArrayVec::new()),
        }
    }

    /// Number of registered subscriptions.
    #[inline]
    pub fn count(&self) -> usize {
        // SAFETY: single-threaded cooperative contract.
        unsafe { (*self.subs.get()).len() }
    }

    /// Registers `handler` on `channel` with context `ctx`.
    ///
    /// Subscribing an already-registered `(channel, handler)` pair is
    /// idempotent: it overwrites the existing slot's `ctx` in place and
    /// succeeds even if the table is otherwise full. Subscribing a
    /// genuinely new pair on a full table
    /// returns [`Error::Full`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalChannel`] if `channel` is [`ALL_CHANNELS`]
    /// or below [`CHANNEL_MIN`]; returns [`Error::Full`] if the table has
    /// no free slot for a new pair.
    pub fn subscribe(&self, channel: Channel, handler: HandlerFn, ctx: *mut ()) -> Result<()> {
        if channel == ALL_CHANNELS || channel < CHANNEL_MIN {
            #[cfg(feature = "log")]
            log::warn!("refusing to subscribe on illegal channel {channel}");
            return Err(Error::IllegalChannel);
        }
        // SAFETY: see `count`.
        let subs = unsafe { &mut *self.subs.get() };
        if let Some(existing) = subs
            .as_mut_slice()
            .iter_mut()
            .find(|s| s.channel == channel && fn_eq(s.handler, handler))
        {
            existing.ctx = ctx;
            return Ok(());
        }
        if subs.is_full() {
            #[cfg(feature = "log")]
            log::warn!("subscribe on channel {channel} dropped: subscriber table is full");
            return Err(Error::Full);
        }
        subs.push(Subscriber { channel, handler, ctx });
        Ok(())
    }

    /// Removes the exact `(channel, handler)` subscription, leaving any
    /// other channel's subscription to the same handler untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such subscription exists.
    pub fn unsubscribe(&self, channel: Channel, handler: HandlerFn) -> Result<()> {
        // SAFETY: see `count`.
        let subs = unsafe { &mut *self.subs.get() };
        let idx = subs
            .as_slice()
            .iter()
            .position(|s| s.channel == channel && fn_eq(s.handler, handler))
            .ok_or(Error::NotFound)?;
        subs.swap_remove(idx);
        Ok(())
    }

    /// Notifies subscribers of `channel` with `payload`.
    ///
    /// If `channel` is [`ALL_CHANNELS`], every subscriber on every
    /// channel is called. Iterates a snapshot of the subscriber table
    /// taken at entry, so handlers that subscribe or unsubscribe during
    /// the call do not affect this pass. A channel with no subscribers
    /// is not an error: this is always `Ok` and exists for symmetry with
    /// the rest of this crate's fallible API surface.
    pub fn notify(&self, channel: Channel, payload: *mut ()) -> Result<()> {
        // SAFETY: see `count`.
        let snapshot = unsafe { (*self.subs.get()).clone_into_snapshot() };
        for sub in snapshot.as_slice() {
            if channel == ALL_CHANNELS || sub.channel == channel {
                (sub.handler)(sub.channel, sub.ctx, payload);
            }
        }
        Ok(())
    }
}

impl<const N: usize> Default for BroadcastRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares two `fn` pointers for identity. Plain `==` on `fn` types
/// works today but is spelled out to document intent: two subscriptions
/// are "the same handler" iff they are the same function pointer.
#[inline]
fn fn_eq(a: HandlerFn, b: HandlerFn) -> bool {
    a as usize == b as usize
}

trait SnapshotExt<T, const N: usize> {
    fn clone_into_snapshot(&self) -> ArrayVec<T, N>;
}

impl<T: Copy, const N: usize> SnapshotExt<T, N> for ArrayVec<T, N> {
    fn clone_into_snapshot(&self) -> ArrayVec<T, N> {
        let mut out = ArrayVec::new();
        for item in self.as_slice() {
            out.push(*item);
        }
        out
    }
}
