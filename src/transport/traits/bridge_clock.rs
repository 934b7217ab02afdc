//! Timing primitives backed by a per-target hardware timer.

/// Monotonic millisecond clock plus a blocking delay.
///
/// Available only after platform bootstrap; the
/// [`Platform`](crate::platform::Platform) construction makes a
/// pre-bootstrap call impossible.
pub trait BridgeClock {
    /// Milliseconds since boot. Wraps at the integer width; callers compare
    /// instants with [`elapsed_ms`], never with `<`/`>` on absolute values.
    fn now_ms(&self) -> u32;

    /// Block the calling context for at least `millis` milliseconds.
    /// Must not be called from interrupt context or from inside the
    /// dispatch loop.
    fn delay_ms(&mut self, millis: u32);
}

/// Wraparound-safe age of `since` as seen at `now`.
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_across_wraparound() {
        assert_eq!(elapsed_ms(5, u32::MAX - 4), 10);
        assert_eq!(elapsed_ms(1000, 250), 750);
        assert_eq!(elapsed_ms(250, 250), 0);
    }
}
