use embedded_hal::digital::v2::OutputPin;

/// Which pin level lights the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Polarity {
    ActiveHigh,
    /// LEDs wired to VDD, like the ones on the nRF52840-DK
    ActiveLow,
}

/// Two discrete status outputs: red for errors (and card syncs), green
/// while a sample is being taken and written
pub struct StatusLeds<R, G> {
    red: R,
    green: G,
    polarity: Polarity,
}

impl<R, G, E> StatusLeds<R, G>
where
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
{
    /// Takes the pins already configured as outputs. Both LEDs are switched
    /// off.
    pub fn new(red: R, green: G, polarity: Polarity) -> Result<Self, E> {
        let mut leds = StatusLeds {
            red,
            green,
            polarity,
        };
        leds.set_error(false)?;
        leds.set_active(false)?;
        Ok(leds)
    }

    pub fn set_error(&mut self, on: bool) -> Result<(), E> {
        drive(&mut self.red, self.polarity, on)
    }

    pub fn set_active(&mut self, on: bool) -> Result<(), E> {
        drive(&mut self.green, self.polarity, on)
    }

    pub fn free(self) -> (R, G) {
        (self.red, self.green)
    }
}

fn drive<P: OutputPin>(pin: &mut P, polarity: Polarity, on: bool) -> Result<(), P::Error> {
    match (polarity, on) {
        (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => pin.set_high(),
        (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => pin.set_low(),
    }
}
