use nrf52840_hal::{
    timer::{Instance, Periodic},
    Timer,
};

/// Source of a monotonic millisecond count that wraps around after ~49.7
/// days
pub trait Millis {
    fn millis(&mut self) -> u32;
}

/// Extends a free-running 32-bit microsecond counter, which wraps every
/// ~71.6 minutes, into a running millisecond count.
///
/// The counter has to be polled at least once per wrap period, the logging
/// loop does that on every sample.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct MillisCounter {
    last_raw_us: u32,
    elapsed_us: u64,
}

impl MillisCounter {
    pub const fn new() -> Self {
        MillisCounter {
            last_raw_us: 0,
            elapsed_us: 0,
        }
    }

    /// Feed a new raw counter value, returns the total milliseconds
    pub fn update(&mut self, raw_us: u32) -> u32 {
        let delta = raw_us.wrapping_sub(self.last_raw_us);
        self.last_raw_us = raw_us;
        self.elapsed_us += delta as u64;
        (self.elapsed_us / 1000) as u32
    }
}

/// Millisecond clock backed by one of the nRF timers, which tick at 1 MHz
pub struct TimerClock<T> {
    timer: Timer<T, Periodic>,
    counter: MillisCounter,
}

impl<T> TimerClock<T>
where
    T: Instance,
{
    pub fn new(instance: T) -> Self {
        let mut timer = Timer::periodic(instance);
        // Compare-and-clear at the top of the range, so the counter simply
        // free-runs
        embedded_hal::timer::CountDown::start(&mut timer, u32::MAX);
        TimerClock {
            timer,
            counter: MillisCounter::new(),
        }
    }
}

impl<T> Millis for TimerClock<T>
where
    T: Instance,
{
    fn millis(&mut self) -> u32 {
        let raw = self.timer.read();
        self.counter.update(raw)
    }
}
