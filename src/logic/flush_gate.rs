/// Decides when buffered log data gets committed to the card.
///
/// Writing happens every iteration but a flush costs a few kilobytes of
/// card I/O, so it's only allowed once per `period_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct FlushGate {
    period_ms: u32,
    last_flush_ms: u32,
}

impl FlushGate {
    pub const fn new(period_ms: u32) -> Self {
        FlushGate {
            period_ms,
            last_flush_ms: 0,
        }
    }

    /// Returns `true` and restarts the interval if a flush is due at
    /// `now_ms`. Survives the millisecond counter wrapping around.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_flush_ms) < self.period_ms {
            return false;
        }
        self.last_flush_ms = now_ms;
        true
    }

    pub fn last_flush_ms(&self) -> u32 {
        self.last_flush_ms
    }
}
