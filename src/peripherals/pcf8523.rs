use embedded_hal::blocking::i2c;

use crate::logic::datetime::DateTime;

/// PCF8523 real-time clock, as found on the Adafruit data logger boards
pub struct PCF8523<T>(T);

static DEFAULT_ADDRESS: u8 = 0x68;

const REG_CONTROL_3: u8 = 0x02;
const REG_SECONDS: u8 = 0x03;

/// Oscillator-stopped flag in the seconds register
const OS_FLAG: u8 = 0x80;
/// Battery switch-over bits in control 3. All set is the power-on default,
/// meaning nobody ever configured the clock.
const PM_MASK: u8 = 0xe0;

/// Century offset of the two-digit year register
const BASE_YEAR: u16 = 2000;

impl<T> PCF8523<T>
where
    T: i2c::Write,
    T: i2c::Read<Error = <T as i2c::Write>::Error>,
{
    pub fn new(i2c: T) -> Self {
        PCF8523(i2c)
    }

    /// Check that the chip answers on the bus
    pub fn probe(&mut self) -> Result<(), <T as i2c::Write>::Error> {
        self.read_register(REG_CONTROL_3).map(|_| ())
    }

    /// `false` until the clock has been set at least once since it was
    /// first powered
    pub fn is_initialized(&mut self) -> Result<bool, <T as i2c::Write>::Error> {
        let control_3 = self.read_register(REG_CONTROL_3)?;
        Ok(control_3 & PM_MASK != PM_MASK)
    }

    /// `true` if the oscillator stopped at some point, e.g. the backup
    /// battery ran flat. The time can't be trusted in that case.
    pub fn lost_power(&mut self) -> Result<bool, <T as i2c::Write>::Error> {
        let seconds = self.read_register(REG_SECONDS)?;
        Ok(seconds & OS_FLAG != 0)
    }

    pub fn now(&mut self) -> Result<DateTime, <T as i2c::Write>::Error> {
        // Seconds, minutes, hours, days, weekdays, months, years
        let command: [u8; 1] = [REG_SECONDS];
        self.0.write(DEFAULT_ADDRESS, &command)?;
        let mut buf = [0; 7];
        self.0.read(DEFAULT_ADDRESS, &mut buf)?;

        Ok(decode_datetime(&buf))
    }

    fn read_register(&mut self, register: u8) -> Result<u8, <T as i2c::Write>::Error> {
        let command: [u8; 1] = [register];
        self.0.write(DEFAULT_ADDRESS, &command)?;
        let mut buf = [0; 1];
        self.0.read(DEFAULT_ADDRESS, &mut buf)?;
        Ok(buf[0])
    }
}

fn decode_datetime(buf: &[u8; 7]) -> DateTime {
    DateTime {
        second: bcd_to_bin(buf[0] & 0x7f),
        minute: bcd_to_bin(buf[1] & 0x7f),
        hour: bcd_to_bin(buf[2] & 0x3f),
        day: bcd_to_bin(buf[3] & 0x3f),
        // buf[4] is the weekday, which we don't need
        month: bcd_to_bin(buf[5] & 0x1f),
        year: BASE_YEAR + bcd_to_bin(buf[6]) as u16,
    }
}

fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0f)
}
