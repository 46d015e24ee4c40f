//! Monotonic clock contract.
//!
//! A [`Tick`] is a monotonically non-decreasing counter produced by a
//! pluggable function. All comparisons are wrap-safe: two ticks are
//! ordered by the sign of their wrapping difference rather than by raw
//! unsigned comparison, so a scheduler that runs across a `Tick` rollover
//! keeps correct ordering for due-times that straddle the wrap.

/// One count of the monotonic clock. At least 32 bits wide per the spec;
/// this crate fixes it at 32 bits, which covers roughly 36 hours at the
/// canonical 32.768 kHz RTC tick rate before wrapping — ample given
/// [`precedes`] is wrap-safe.
pub type Tick = u32;

/// Signed difference of two ticks.
pub type Duration = i32;

/// A pluggable source of monotonic ticks.
///
/// Never invoked from an ISR — only the main loop calls
/// into a `ClockFn`, whether directly (`Scheduler::current_time`) or
/// indirectly via `step`.
pub type ClockFn = fn() -> Tick;

/// A `ClockFn` that always returns tick 0.
///
/// This is a scheduler's default clock source before an embedding
/// application binds a real RTC: it exists so a freshly constructed
/// `Scheduler` is inert rather than undefined.
pub fn no_clock() -> Tick {
    0
}

/// Offsets `t` by a signed `d`, wrapping on overflow.
#[inline]
pub const fn offset(t: Tick, d: Duration) -> Tick {
    t.wrapping_add_signed(d)
}

/// Signed, wrap-safe difference `t1 - t2`.
#[inline]
pub const fn difference(t1: Tick, t2: Tick) -> Duration {
    t1.wrapping_sub(t2) as Duration
}

/// `true` iff `t1` strictly precedes `t2` in wrap-safe order.
#[inline]
pub const fn precedes(t1: Tick, t2: Tick) -> bool {
    difference(t1, t2) < 0
}

/// `true` iff `t1` and `t2` are the same tick.
#[inline]
pub const fn equals(t1: Tick, t2: Tick) -> bool {
    t1 == t2
}

/// `true` iff `t1` strictly follows `t2` in wrap-safe order.
#[inline]
pub const fn follows(t1: Tick, t2: Tick) -> bool {
    precedes(t2, t1)
}

/// Converts a millisecond count to ticks at the given RTC rate.
#[inline]
pub const fn ms_to_ticks(ms: u32, hz: u32) -> Tick {
    (((ms as u64) * (hz as u64)) / 1000) as Tick
}

/// Converts a tick count to milliseconds at the given RTC rate.
#[inline]
pub const fn ticks_to_ms(ticks: Tick, hz: u32) -> u32 {
    (((ticks as u64) * 1000) / (hz as u64)) as u32
}

#[cfg(feature = "float-time")]
/// Converts a tick count to seconds at the given RTC rate.
#[inline]
pub fn ticks_to_secs(ticks: Tick, hz: u32) -> f32 {
    ticks as f32 / hz as f32
}

#[cfg(feature = "float-time")]
/// Converts a duration in seconds to ticks at the given RTC rate.
#[inline]
pub fn secs_to_ticks(secs: f32, hz: u32) -> Tick {
    (secs * hz as f32) as Tick
}
