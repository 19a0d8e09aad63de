//! Calendar time as read from the RTC

const SECONDS_PER_DAY: u32 = 86_400;

/// Days from 0000-03-01 to 1970-01-01
const DAYS_TO_UNIX_EPOCH: i32 = 719_468;

/// A UTC wall-clock time with one second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct DateTime {
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Epoch of the PCF8523 calendar. Used when the clock can't be read.
    pub const UNSET: DateTime = DateTime {
        year: 2000,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Seconds since 1970-01-01 00:00:00 UTC.
    ///
    /// Valid for 1970 up to 2106, when the 32-bit counter runs out. Later
    /// dates, or garbage read from a broken clock, wrap around.
    pub fn unix_time(&self) -> u32 {
        let days = days_from_civil(self.year, self.month, self.day);
        (days as u32)
            .wrapping_mul(SECONDS_PER_DAY)
            .wrapping_add(self.hour as u32 * 3600)
            .wrapping_add(self.minute as u32 * 60)
            .wrapping_add(self.second as u32)
    }
}

/// Howard Hinnant's days_from_civil, see
/// http://howardhinnant.github.io/date_algorithms.html
fn days_from_civil(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // March is month 0, so the leap day ends the year
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    // Signed, so that a day or month of 0 can't underflow
    let doy = (153 * m + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe - DAYS_TO_UNIX_EPOCH
}
