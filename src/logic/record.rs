use ufmt::uWrite;

use super::{
    conversion::{celsius_to_fahrenheit, supply_voltage, temperature_celsius},
    datetime::DateTime,
    formatting::write_float,
};
use crate::config::Calibration;

pub const RECORD_CAPACITY: usize = 96;

/// One CSV line, including the trailing `\r\n`
pub type LogRecord = heapless::String<RECORD_CAPACITY>;

/// Decimals printed for temperature and supply voltage
const FLOAT_PRECISION: u8 = 2;

/// Raw readings taken in one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Sample {
    pub monotonic_ms: u32,
    pub wall_time: DateTime,
    pub raw_temp: i16,
    pub raw_ref: i16,
}

/// A sample in engineering units
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub struct Reading {
    pub celsius: f32,
    pub fahrenheit: f32,
    pub supply_v: f32,
}

impl Sample {
    pub fn convert(&self, cal: &Calibration) -> Reading {
        let celsius = temperature_celsius(self.raw_temp, cal);
        Reading {
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
            supply_v: supply_voltage(self.raw_ref, cal),
        }
    }
}

/// The formatted line did not fit into a [`LogRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RecordOverflow;

/// Format a sample as
/// `millis, unixtime, "Y/M/D h:m:s", raw_temp, temp_c, vcc\r\n`.
///
/// The Fahrenheit value is not part of the line.
pub fn format_record(sample: &Sample, cal: &Calibration) -> Result<LogRecord, RecordOverflow> {
    let reading = sample.convert(cal);
    let mut line = LogRecord::new();
    write_record(&mut line, sample, &reading).map_err(|_| RecordOverflow)?;
    Ok(line)
}

fn write_record<W: uWrite>(out: &mut W, sample: &Sample, reading: &Reading) -> Result<(), W::Error> {
    let t = &sample.wall_time;
    ufmt::uwrite!(
        out,
        "{}, {}, \"{}/{}/{} {}:{}:{}\", {}, ",
        sample.monotonic_ms,
        t.unix_time(),
        t.year,
        t.month,
        t.day,
        t.hour,
        t.minute,
        t.second,
        sample.raw_temp
    )?;
    write_float(out, reading.celsius, FLOAT_PRECISION)?;
    out.write_str(", ")?;
    write_float(out, reading.supply_v, FLOAT_PRECISION)?;
    out.write_str("\r\n")
}
