#![no_std]
#![no_main]

use templog as _; // memory layout + panic handler

/// In-memory stand-ins for the card and the serial port
mod fakes {
    use core::convert::Infallible;

    use embedded_hal::{blocking::delay::DelayMs, digital::v2::OutputPin};
    use templog::logger::LineSink;

    pub struct MemorySink {
        pub text: heapless::String<4096>,
        pub flushes: u32,
        /// Length of `text` at the last flush
        pub flushed_len: usize,
        pub fail_writes: bool,
    }

    #[derive(Debug, PartialEq, defmt::Format)]
    pub struct SinkError;

    impl MemorySink {
        pub fn new() -> Self {
            MemorySink {
                text: heapless::String::new(),
                flushes: 0,
                flushed_len: 0,
                fail_writes: false,
            }
        }
    }

    impl LineSink for MemorySink {
        type Error = SinkError;

        fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err(SinkError);
            }
            self.text.push_str(text).map_err(|_| SinkError)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            self.flushed_len = self.text.len();
            Ok(())
        }
    }

    /// Simulated millisecond clock that only moves when something waits on it
    #[derive(Default)]
    pub struct SimulatedTime {
        pub now_ms: u32,
        pub waits: u32,
    }

    impl DelayMs<u32> for SimulatedTime {
        fn delay_ms(&mut self, ms: u32) {
            self.now_ms += ms;
            self.waits += 1;
        }
    }

    #[derive(Default)]
    pub struct FakePin {
        pub high: bool,
    }

    impl OutputPin for FakePin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }
}

/// Shared fixtures; `#[defmt_test::tests]` only allows attributed functions
mod helpers {
    use templog::{
        config::LoggerConfig,
        logic::{datetime::DateTime, record::Sample},
    };

    pub fn config() -> LoggerConfig {
        LoggerConfig {
            sample_period_ms: 1_000,
            flush_period_ms: 10_000,
            echo_to_serial: true,
            wait_to_start: false,
        }
    }

    pub fn sample(monotonic_ms: u32) -> Sample {
        Sample {
            monotonic_ms,
            wall_time: DateTime::new(2026, 10, 19, 9, 5, 3),
            raw_temp: 300,
            raw_ref: 225,
        }
    }
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};
    use templog::{
        config::{Calibration, LoggerConfig},
        logger::{report_fatal, DataLogger, Fatal, RecordError},
        logic::{datetime::DateTime, record::Sample},
        peripherals::led::{Polarity, StatusLeds},
    };

    use super::fakes::{FakePin, MemorySink, SimulatedTime, SinkError};
    use super::helpers::{config, sample};

    #[test]
    fn header_and_notice_go_to_both_sinks() {
        let mut logger = DataLogger::new(
            MemorySink::new(),
            Some(MemorySink::new()),
            &config(),
            Calibration::DEFAULT,
        );
        logger.write_line("RTC failed").unwrap();
        logger.write_header().unwrap();

        let expected = "RTC failed\r\nmillis,stamp,datetime,light,temp,vcc\r\n";
        assert_eq!(logger.storage().text.as_str(), expected);
        assert_eq!(logger.echo().unwrap().text.as_str(), expected);
    }

    #[test]
    fn record_is_mirrored_to_echo() {
        let mut logger = DataLogger::new(
            MemorySink::new(),
            Some(MemorySink::new()),
            &config(),
            Calibration::DEFAULT,
        );
        let line = logger.record(&sample(10_999)).unwrap();

        assert_eq!(
            line.as_str(),
            "10999, 1792400703, \"2026/10/19 9:5:3\", 300, 44.00, 5.01\r\n"
        );
        assert_eq!(logger.storage().text.as_str(), line.as_str());
        assert_eq!(logger.echo().unwrap().text.as_str(), line.as_str());
    }

    #[test]
    fn no_echo_sink() {
        let mut logger: DataLogger<MemorySink, MemorySink> =
            DataLogger::new(MemorySink::new(), None, &config(), Calibration::DEFAULT);
        logger.record(&sample(999)).unwrap();
        assert!(logger.echo().is_none());
        assert!(logger.storage().text.len() > 0);
    }

    #[test]
    fn storage_write_failure_is_reported() {
        let mut storage = MemorySink::new();
        storage.fail_writes = true;
        let mut logger = DataLogger::new(
            storage,
            Some(MemorySink::new()),
            &config(),
            Calibration::DEFAULT,
        );
        match logger.record(&sample(10_999)) {
            Err(RecordError::Storage(SinkError)) => {}
            _ => defmt::panic!("expected a storage error"),
        }
        assert_eq!(
            logger.echo().unwrap().text.as_str(),
            "10999, 1792400703, \"2026/10/19 9:5:3\", 300, 44.00, 5.01\r\n"
        );
    }

    #[test]
    fn pulled_card_keeps_console_going() {
        let mut storage = MemorySink::new();
        storage.fail_writes = true;
        let mut logger = DataLogger::new(
            storage,
            Some(MemorySink::new()),
            &config(),
            Calibration::DEFAULT,
        );
        assert_eq!(logger.write_line("RTC failed"), Err(SinkError));
        assert_eq!(logger.write_header(), Err(SinkError));
        assert_eq!(
            logger.echo().unwrap().text.as_str(),
            "RTC failed\r\nmillis,stamp,datetime,light,temp,vcc\r\n"
        );
        assert_eq!(logger.storage().text.len(), 0);
    }

    #[test]
    fn one_second_loop_flushes_every_ten_seconds() {
        let mut logger: DataLogger<MemorySink, MemorySink> =
            DataLogger::new(MemorySink::new(), None, &config(), Calibration::DEFAULT);

        let mut time = SimulatedTime::default();
        for _ in 0..35 {
            logger.wait_for_next_sample(time.now_ms, &mut time);
            logger.record(&sample(time.now_ms)).unwrap();
            // writing takes a few milliseconds
            time.now_ms += 3;
            if logger.flush_due(time.now_ms) {
                logger.flush().unwrap();
            }
        }

        // samples at 999, 1999, ... 34999; flushes at 10002, 20002 and 30002
        assert_eq!(logger.storage().flushes, 3);
        assert!(logger.storage().flushed_len < logger.storage().text.len());
    }

    #[test]
    fn slow_iteration_ending_on_the_tick_samples_right_away() {
        let logger: DataLogger<MemorySink, MemorySink> =
            DataLogger::new(MemorySink::new(), None, &config(), Calibration::DEFAULT);
        let mut time = SimulatedTime::default();

        assert_eq!(logger.wait_for_next_sample(time.now_ms, &mut time), 999);
        assert_eq!(time.waits, 1);
        // the flush took exactly one period
        time.now_ms += 1_000;
        assert_eq!(logger.wait_for_next_sample(time.now_ms, &mut time), 0);
        assert_eq!(time.waits, 1);
        assert_eq!(time.now_ms, 1_999);
    }

    #[test]
    fn fast_sampling_still_flushes_once_per_period() {
        let config = LoggerConfig {
            sample_period_ms: 10,
            ..config()
        };
        let mut logger: DataLogger<MemorySink, MemorySink> =
            DataLogger::new(MemorySink::new(), None, &config, Calibration::DEFAULT);

        let mut flushes = 0;
        for now in (0..30_000_u32).step_by(10) {
            if logger.flush_due(now) {
                logger.flush().unwrap();
                flushes += 1;
            }
        }
        assert_eq!(flushes, 2);
        assert_eq!(logger.storage().flushes, 2);
    }

    #[test]
    fn fatal_report_lights_error_led() {
        let mut console = MemorySink::new();
        let mut leds =
            StatusLeds::new(FakePin::default(), FakePin::default(), Polarity::ActiveHigh).unwrap();

        report_fatal(Fatal::CardUnavailable, Some(&mut console), &mut leds);

        assert_eq!(
            console.text.as_str(),
            "error: Card failed, or not present\r\n"
        );
        let (red, green) = leds.free();
        assert!(red.high);
        assert!(!green.high);
    }

    #[test]
    fn fatal_report_without_console() {
        let mut leds =
            StatusLeds::new(FakePin::default(), FakePin::default(), Polarity::ActiveLow).unwrap();
        report_fatal::<MemorySink, _, _, _>(Fatal::CannotCreateFile, None, &mut leds);
        let (red, _) = leds.free();
        // active low
        assert!(!red.high);
        assert_eq!(Fatal::CannotCreateFile.message(), "couldnt create file");
    }
}
