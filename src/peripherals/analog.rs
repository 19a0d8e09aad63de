use embedded_hal::{
    adc::{Channel, OneShot},
    blocking::delay::DelayMs,
};

use crate::config::ADC_SETTLE_MS;

/// Raw counts from both analog channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RawReadings {
    pub temperature: i16,
    pub reference: i16,
}

/// Temperature sensor and voltage reference behind one ADC
pub struct AnalogSampler<A, TP, RP> {
    adc: A,
    temperature_pin: TP,
    reference_pin: RP,
}

impl<A, TP, RP> AnalogSampler<A, TP, RP> {
    pub fn new(adc: A, temperature_pin: TP, reference_pin: RP) -> Self {
        AnalogSampler {
            adc,
            temperature_pin,
            reference_pin,
        }
    }

    /// Read both channels. Values are passed on as-is, there's no range
    /// checking.
    pub fn sample<ADC, E>(&mut self, delay: &mut impl DelayMs<u32>) -> Result<RawReadings, E>
    where
        A: OneShot<ADC, i16, TP, Error = E> + OneShot<ADC, i16, RP, Error = E>,
        TP: Channel<ADC>,
        RP: Channel<ADC>,
    {
        let temperature = read_settled(&mut self.adc, &mut self.temperature_pin, delay)?;
        let reference = read_settled(&mut self.adc, &mut self.reference_pin, delay)?;
        Ok(RawReadings {
            temperature,
            reference,
        })
    }
}

/// The first conversion after switching the input mux is thrown away, the
/// sample-and-hold cap needs some time to charge up to the new input.
pub fn read_settled<A, ADC, P>(
    adc: &mut A,
    pin: &mut P,
    delay: &mut impl DelayMs<u32>,
) -> Result<i16, A::Error>
where
    A: OneShot<ADC, i16, P>,
    P: Channel<ADC>,
{
    nb::block!(adc.read(pin))?;
    delay.delay_ms(ADC_SETTLE_MS);
    nb::block!(adc.read(pin))
}
