/// Timing and output switches for the logging loop.
///
/// Everything here is fixed at compile time. Echo and wait-to-start are
/// selected through the `echo-serial` and `wait-to-start` cargo features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct LoggerConfig {
    /// Time in milliseconds between samples
    pub sample_period_ms: u32,
    /// Time in milliseconds between flushes to the card. Should be greater
    /// than `sample_period_ms`, larger values result in faster operation.
    pub flush_period_ms: u32,
    pub echo_to_serial: bool,
    pub wait_to_start: bool,
}

impl LoggerConfig {
    pub const DEFAULT: LoggerConfig = LoggerConfig {
        sample_period_ms: 1000,
        flush_period_ms: 10_000,
        echo_to_serial: cfg!(feature = "echo-serial"),
        wait_to_start: cfg!(feature = "wait-to-start"),
    };
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Constants for turning raw ADC counts into engineering units
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub struct Calibration {
    /// ADC input volts per count (~5 V / 1024)
    pub adc_volts_per_count: f32,
    /// Sensor output at 0 °C
    pub sensor_offset_v: f32,
    /// Sensor slope, volts per °C
    pub sensor_volts_per_degree: f32,
    /// Nominal bandgap voltage. This is not super guaranteed but it's not
    /// too far off.
    pub bandgap_voltage: f32,
    /// Number of ADC counts at full scale (10-bit)
    pub adc_full_scale: f32,
}

impl Calibration {
    pub const DEFAULT: Calibration = Calibration {
        adc_volts_per_count: 0.0049,
        sensor_offset_v: 1.25,
        sensor_volts_per_degree: 0.005,
        bandgap_voltage: 1.1,
        adc_full_scale: 1024.,
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Header line written at the top of every log file.
///
/// NOTE: the `light` column actually carries the raw temperature reading.
pub const LOG_HEADER: &str = "millis,stamp,datetime,light,temp,vcc";

/// Settle time after the discarded ADC conversion
pub const ADC_SETTLE_MS: u32 = 10;
