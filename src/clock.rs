//! clock.rs — millisecond time source for button polling

/// Monotonic millisecond clock.
///
/// The counter is free-running and wraps at `u32::MAX`; consumers compare
/// timestamps with [`elapsed_ms`] only.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Milliseconds from `since` to `now`, modulo 2^32.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Clock backed by the embassy time driver.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation keeps the modular ordering used by `elapsed_ms`.
        embassy_time::Instant::now().as_millis() as u32
    }
}
