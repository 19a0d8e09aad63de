use embedded_hal::blocking::delay::DelayMs;

/// Aligns samples to multiples of the sample period on the millisecond
/// clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct SampleSchedule {
    period_ms: u32,
}

impl SampleSchedule {
    /// `period_ms` must not be zero
    pub const fn new(period_ms: u32) -> Self {
        SampleSchedule { period_ms }
    }

    /// Milliseconds to wait at `now_ms` so that the next sample is taken one
    /// tick before the period boundary
    pub fn delay_until_next(&self, now_ms: u32) -> u32 {
        (self.period_ms - 1) - (now_ms % self.period_ms)
    }

    /// Block until the next sample is due. Returns the time waited.
    ///
    /// A zero wait never reaches `delay`: the nRF timers only fire on the
    /// next compare match, so `delay_ms(0)` would sit out a full counter
    /// wrap.
    pub fn wait_until_next(&self, now_ms: u32, delay: &mut impl DelayMs<u32>) -> u32 {
        let wait_ms = self.delay_until_next(now_ms);
        if wait_ms > 0 {
            delay.delay_ms(wait_ms);
        }
        wait_ms
    }
}
