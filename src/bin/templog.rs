#![no_main]
#![no_std]

use embedded_sdmmc::SdCard;
use nrf52840_hal::{
    self as hal,
    gpio::{p0::Parts as P0Parts, p1::Parts as P1Parts, Level},
    saadc::{Gain, Reference, Resolution, SaadcConfig},
    spim, twim, uarte, Delay, Saadc, Spim, Timer, Twim, Uarte,
};

use templog::{
    self as _, // global logger + panicking-behavior + memory layout
    config::{Calibration, LoggerConfig},
    logger::{fatal, DataLogger, Fatal, LineSink},
    logic::{datetime::DateTime, record::Sample},
    peripherals::{
        analog::AnalogSampler,
        clock::{Millis, TimerClock},
        console::Console,
        led::{Polarity, StatusLeds},
        pcf8523::PCF8523,
        storage::{BootTime, CardStorage},
    },
};

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::println!("templog starting");

    let config = LoggerConfig::DEFAULT;
    let board = hal::pac::Peripherals::take().unwrap();
    let core_peripherals = hal::pac::CorePeripherals::take().unwrap();
    let pins_0 = P0Parts::new(board.P0);
    let pins_1 = P1Parts::new(board.P1);

    let mut delay = Timer::new(board.TIMER0);
    let mut clock = TimerClock::new(board.TIMER1);

    // LED1 and LED2 of the nRF52840-DK, active low
    let mut leds = StatusLeds::new(
        pins_0.p0_13.into_push_pull_output(Level::High).degrade(),
        pins_0.p0_14.into_push_pull_output(Level::High).degrade(),
        Polarity::ActiveLow,
    )
    .unwrap();

    // VCOM of the on-board debugger
    let uart_pins = uarte::Pins {
        txd: pins_0.p0_06.into_push_pull_output(Level::High).degrade(),
        rxd: pins_0.p0_08.into_floating_input().degrade(),
        cts: None,
        rts: None,
    };
    let uart = Uarte::new(
        board.UARTE0,
        uart_pins,
        uarte::Parity::EXCLUDED,
        uarte::Baudrate::BAUD9600,
    );
    let mut console = Console::new(uart);
    console.write_line("").ok();

    if config.wait_to_start {
        console.write_line("Type any character to start").ok();
        let mut byte = [0u8; 1];
        if console.port_mut().read(&mut byte).is_err() {
            defmt::warn!("Console read failed, starting anyway");
        }
    }

    // The clock is only needed for timestamps, so it can come up before the
    // card. File entries get the boot time.
    let scl = pins_0.p0_27.into_floating_input().degrade();
    let sda = pins_0.p0_26.into_floating_input().degrade();
    let i2c = Twim::new(board.TWIM0, twim::Pins { scl, sda }, twim::Frequency::K100);
    let mut rtc = PCF8523::new(i2c);
    let mut rtc_ok = rtc.probe().is_ok();
    let boot_time = if rtc_ok {
        rtc.now().unwrap_or(DateTime::UNSET)
    } else {
        DateTime::UNSET
    };
    defmt::info!("Boot time: {}", boot_time);

    defmt::info!("Initializing SD card");
    console.write_str("Initializing SD card...").ok();
    // D10-D13 of the Arduino header. SPIM0 shares its instance with TWIM0,
    // so the card gets SPIM2.
    let spim_pins = spim::Pins {
        sck: Some(pins_1.p1_15.into_push_pull_output(Level::Low).degrade()),
        mosi: Some(pins_1.p1_13.into_push_pull_output(Level::Low).degrade()),
        miso: Some(pins_1.p1_14.into_floating_input().degrade()),
    };
    let spi = Spim::new(
        board.SPIM2,
        spim_pins,
        spim::Frequency::K250,
        spim::MODE_0,
        0xff,
    );
    let card_cs = pins_1.p1_12.into_push_pull_output(Level::High).degrade();
    let card = SdCard::new(spi, card_cs, Delay::new(core_peripherals.SYST));

    let mut storage = match CardStorage::mount(card, BootTime::new(boot_time)) {
        Ok(storage) => storage,
        Err(e) => {
            defmt::error!("Mounting the card failed: {}", defmt::Debug2Format(&e));
            fatal(Fatal::CardUnavailable, Some(&mut console), &mut leds)
        }
    };
    console.write_line("card initialized.").ok();

    let log_name = match storage.create_log() {
        Ok(Some(name)) => name,
        Ok(None) => {
            defmt::error!("All log file names are taken");
            fatal(Fatal::CannotCreateFile, Some(&mut console), &mut leds)
        }
        Err(e) => {
            defmt::error!("Creating the log file failed: {}", defmt::Debug2Format(&e));
            fatal(Fatal::CannotCreateFile, Some(&mut console), &mut leds)
        }
    };
    defmt::info!("Logging to {=str}", log_name.as_str());
    console.write_str("Logging to: ").ok();
    console.write_line(log_name.as_str()).ok();

    let echo = if config.echo_to_serial {
        Some(console)
    } else {
        None
    };
    let mut logger = DataLogger::new(storage, echo, &config, Calibration::DEFAULT);

    if !rtc_ok {
        defmt::warn!("RTC not found, timestamps will be wrong");
        if let Err(e) = logger.write_line("RTC failed") {
            defmt::error!("Writing to the log failed: {}", defmt::Debug2Format(&e));
        }
    } else {
        let initialized = rtc.is_initialized().unwrap_or(false);
        let lost_power = rtc.lost_power().unwrap_or(true);
        if !initialized || lost_power {
            defmt::warn!(
                "RTC time can't be trusted (initialized: {=bool}, lost power: {=bool})",
                initialized,
                lost_power
            );
        }
    }

    if let Err(e) = logger.write_header() {
        defmt::error!("Writing to the log failed: {}", defmt::Debug2Format(&e));
    }

    // 10-bit conversions with VDD as full scale
    let saadc_config = SaadcConfig {
        resolution: Resolution::_10BIT,
        reference: Reference::VDD1_4,
        gain: Gain::GAIN1_4,
        ..SaadcConfig::default()
    };
    let saadc = Saadc::new(board.SAADC, saadc_config);
    // A0 of the Arduino header (AIN1) has the temperature sensor, A1 (AIN2)
    // a 1.1 V shunt reference. The SAADC can't sample its own bandgap.
    let temperature_pin = pins_0.p0_03.into_floating_input();
    let reference_pin = pins_0.p0_04.into_floating_input();
    let mut sampler = AnalogSampler::new(saadc, temperature_pin, reference_pin);

    defmt::info!("Entering loop");
    loop {
        logger.wait_for_next_sample(clock.millis(), &mut delay);

        leds.set_active(true).unwrap();

        let monotonic_ms = clock.millis();
        let wall_time = match rtc.now() {
            Ok(time) => {
                rtc_ok = true;
                time
            }
            Err(e) => {
                if rtc_ok {
                    defmt::warn!("Reading the RTC failed: {}", defmt::Debug2Format(&e));
                }
                rtc_ok = false;
                DateTime::UNSET
            }
        };

        let raw = match sampler.sample(&mut delay) {
            Ok(raw) => raw,
            Err(()) => {
                defmt::error!("ADC conversion failed, skipping sample");
                leds.set_active(false).unwrap();
                continue;
            }
        };

        let sample = Sample {
            monotonic_ms,
            wall_time,
            raw_temp: raw.temperature,
            raw_ref: raw.reference,
        };
        let reading = sample.convert(logger.calibration());
        defmt::debug!(
            "{=f32} °C, {=f32} °F, supply {=f32} V",
            reading.celsius,
            reading.fahrenheit,
            reading.supply_v
        );

        if let Err(e) = logger.record(&sample) {
            defmt::error!("Writing the record failed: {}", defmt::Debug2Format(&e));
        }

        leds.set_active(false).unwrap();

        // Blink red while the data goes to the card
        if logger.flush_due(clock.millis()) {
            leds.set_error(true).unwrap();
            if let Err(e) = logger.flush() {
                defmt::error!("Syncing the card failed: {}", defmt::Debug2Format(&e));
            }
            leds.set_error(false).unwrap();
        }
    }
}
