use crate::config::Calibration;

/// Sensor output in volts to degrees Celsius
pub fn temperature_celsius(raw: i16, cal: &Calibration) -> f32 {
    let volts = raw as f32 * cal.adc_volts_per_count;
    (volts - cal.sensor_offset_v) / cal.sensor_volts_per_degree
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9. / 5. + 32.
}

/// Estimate the supply voltage from a reading of the bandgap reference.
///
/// The reference is fixed and the ADC full scale follows the supply, so the
/// reading is inversely proportional to the supply voltage. A reading of 0
/// is not guarded and yields `+inf`.
pub fn supply_voltage(raw_ref: i16, cal: &Calibration) -> f32 {
    (cal.bandgap_voltage * cal.adc_full_scale) / raw_ref as f32
}
