//! Error codes shared by every component in this crate.

use core::fmt;

/// An operation's failure mode.
///
/// All of these are non-fatal: the scheduler, queues and registry remain
/// fully usable after returning one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Error {
    /// A bounded collection is at capacity; the item was not inserted.
    Full,
    /// A bounded collection has no items to remove.
    Empty,
    /// No matching entry exists (e.g. `unsubscribe` of an unknown pair, or
    /// a reschedule call made outside any task's invocation).
    NotFound,
    /// A channel number was `ALL_CHANNELS` where a concrete channel was
    /// required, or otherwise outside the valid range.
    IllegalChannel,
    /// A requested capacity was not a nonzero power of two.
    ///
    /// This crate's SPSC queue enforces the power-of-two invariant at
    /// compile time via its const generic capacity (see
    /// [`crate::spsc::SpscQueue`]), so this variant only round-trips
    /// through `Display`/`Error` today; it is kept for parity with the
    /// error code table embedding applications may already switch on.
    Size,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Full => "collection is full",
            Self::Empty => "collection is empty",
            Self::NotFound => "no matching entry",
            Self::IllegalChannel => "illegal broadcast channel",
            Self::Size => "capacity is not a power of two",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}

/// Convenience alias used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;
