use core::fmt::Debug;

use embedded_hal::{blocking::delay::DelayMs, digital::v2::OutputPin};

use crate::{
    config::{Calibration, LoggerConfig, LOG_HEADER},
    logic::{
        flush_gate::FlushGate,
        record::{format_record, LogRecord, RecordOverflow, Sample},
        schedule::SampleSchedule,
    },
    peripherals::led::StatusLeds,
};

/// Somewhere lines of text can be appended to
pub trait LineSink {
    type Error;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;

    fn write_line(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_str(text)?;
        self.write_str("\r\n")
    }

    /// Push everything written so far to durable storage
    fn flush(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub enum RecordError<E> {
    Overflow(RecordOverflow),
    Storage(E),
}

/// State carried through the logging loop.
///
/// Every line goes to the storage sink and, if there is one, to the echo
/// sink. Only the storage sink gets flushed.
pub struct DataLogger<S, C> {
    storage: S,
    echo: Option<C>,
    calibration: Calibration,
    schedule: SampleSchedule,
    flush_gate: FlushGate,
}

impl<S, C> DataLogger<S, C>
where
    S: LineSink,
    C: LineSink,
    C::Error: Debug,
{
    pub fn new(storage: S, echo: Option<C>, config: &LoggerConfig, calibration: Calibration) -> Self {
        DataLogger {
            storage,
            echo,
            calibration,
            schedule: SampleSchedule::new(config.sample_period_ms),
            flush_gate: FlushGate::new(config.flush_period_ms),
        }
    }

    /// Write a line of free text, e.g. a notice about a missing clock.
    /// The echo gets the line even if storing it fails.
    pub fn write_line(&mut self, text: &str) -> Result<(), S::Error> {
        let stored = self.storage.write_line(text);
        self.echo_str(text);
        self.echo_str("\r\n");
        stored
    }

    pub fn write_header(&mut self) -> Result<(), S::Error> {
        self.write_line(LOG_HEADER)
    }

    /// Block on `delay` until the next sample is due, returns the time
    /// waited
    pub fn wait_for_next_sample(&self, now_ms: u32, delay: &mut impl DelayMs<u32>) -> u32 {
        self.schedule.wait_until_next(now_ms, delay)
    }

    /// Format `sample` and append it to the log. Like [`write_line`], the
    /// echo doesn't depend on the storage write.
    ///
    /// [`write_line`]: DataLogger::write_line
    pub fn record(&mut self, sample: &Sample) -> Result<LogRecord, RecordError<S::Error>> {
        let line = format_record(sample, &self.calibration).map_err(RecordError::Overflow)?;
        let stored = self.storage.write_str(line.as_str());
        self.echo_str(line.as_str());
        stored.map_err(RecordError::Storage)?;
        Ok(line)
    }

    /// Whether the flush period has passed since the last flush. A `true`
    /// restarts the period, so the caller is expected to [`flush`] next.
    ///
    /// [`flush`]: DataLogger::flush
    pub fn flush_due(&mut self, now_ms: u32) -> bool {
        self.flush_gate.poll(now_ms)
    }

    pub fn flush(&mut self) -> Result<(), S::Error> {
        self.storage.flush()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn echo(&self) -> Option<&C> {
        self.echo.as_ref()
    }

    fn echo_str(&mut self, text: &str) {
        if let Some(echo) = self.echo.as_mut() {
            if let Err(e) = echo.write_str(text) {
                defmt::warn!("Console echo failed: {}", defmt::Debug2Format(&e));
            }
        }
    }
}

/// Startup failures the logger can't continue from
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Fatal {
    /// No card, or it couldn't be initialised or mounted
    CardUnavailable,
    /// No free log file name, or the file couldn't be opened
    CannotCreateFile,
}

impl Fatal {
    pub fn message(&self) -> &'static str {
        match self {
            Fatal::CardUnavailable => "Card failed, or not present",
            Fatal::CannotCreateFile => "couldnt create file",
        }
    }
}

/// Print the error on the console (if any) and light the red LED
pub fn report_fatal<C, R, G, E>(fatal: Fatal, console: Option<&mut C>, leds: &mut StatusLeds<R, G>)
where
    C: LineSink,
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
{
    defmt::error!("{}: {}", fatal, fatal.message());
    if let Some(console) = console {
        // Nothing left to do if this fails as well
        let _ = console.write_str("error: ");
        let _ = console.write_line(fatal.message());
    }
    let _ = leds.set_error(true);
}

/// Stop here for good. Only a reset gets out of this.
pub fn halt() -> ! {
    loop {
        cortex_m::asm::wfe();
    }
}

/// [`report_fatal`] and then [`halt`]
pub fn fatal<C, R, G, E>(fatal: Fatal, console: Option<&mut C>, leds: &mut StatusLeds<R, G>) -> !
where
    C: LineSink,
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
{
    report_fatal(fatal, console, leds);
    halt()
}
