use crate::error::{Error, Result};
use crate::hal::{Channel, Thermometer};

/// DS18B20 measurable range in raw 1/16 °C units (-55 °C ..= 125 °C)
const RAW_MIN: i16 = -55 * 16;
const RAW_MAX: i16 = 125 * 16;

/// Bus access for one DS18B20 per channel. Implementations trigger a
/// conversion, wait for it and return the first two scratchpad bytes.
pub trait ScratchpadSource {
    fn read_scratchpad(&mut self, channel: Channel) -> Result<[u8; 2]>;
}

/// Converts the temperature register (`[lsb, msb]`, 1/16 °C) to whole °F.
///
/// Celsius is rounded to the nearest degree (halves round up), then
/// scaled with integer arithmetic. Results beyond `i8` saturate.
pub fn scratchpad_to_fahrenheit(scratchpad: [u8; 2]) -> Result<i8> {
    let raw = i16::from_le_bytes(scratchpad);
    if !(RAW_MIN..=RAW_MAX).contains(&raw) {
        return Err(Error::SensorReadingOutOfRange);
    }

    let celsius = (i32::from(raw) + 8).div_euclid(16);
    let fahrenheit = celsius * 9 / 5 + 32;

    Ok(fahrenheit.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8)
}

pub struct Ds18b20<S>
where
    S: ScratchpadSource,
{
    bus: S,
}

impl<S> Ds18b20<S>
where
    S: ScratchpadSource,
{
    pub fn new(bus: S) -> Self {
        Self { bus }
    }
}

impl<S> Thermometer for Ds18b20<S>
where
    S: ScratchpadSource,
{
    fn read_fahrenheit(&mut self, channel: Channel) -> Result<i8> {
        let scratchpad = self.bus.read_scratchpad(channel)?;
        scratchpad_to_fahrenheit(scratchpad)
    }
}
