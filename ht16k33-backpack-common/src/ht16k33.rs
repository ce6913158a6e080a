//! The HT16K33 is an LED driver IC that communicates over I2C. It supports 16x8
//! multiplexed LEDs and can perform input key scanning, although that feature
//! is not implemented here.
//!
//! It works by having 16 bytes of display memory that correspond to the LEDs,
//! each LED having 1 bit determining if it is on or off. It then handles the
//! output on the 16 row and 8 common pins that should be connected to the
//! multiplexed LEDs.
//!
//! The HT16K33 will hold LEDs according to how the display memory is set so
//! that it does not need to be continually refreshed by the controller.
//!
//! Which LEDs correspond to which row+common pairs depends on the multiplexed
//! LED circuit, which is external to this chip. The backpack drivers in this
//! crate ([`EightByEight`](crate::matrix::EightByEight),
//! [`BiColor`](crate::bicolor::BiColor) and
//! [`SevenSegmentDisplay`](crate::seven_segment_display::SevenSegmentDisplay))
//! each own one of these and translate their own coordinates into display
//! memory addresses and bit masks.
//!
//! [HT16K33 datasheet](https://cdn-shop.adafruit.com/datasheets/ht16K33v110.pdf)

use embedded_hal::i2c::{ErrorType, I2c};

use crate::common::DisplayResult;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// The number of addressable commons supported by the device.
pub const N_COMS: usize = 8;
/// The number of bytes in the display data used by the device.
pub const DISPLAY_DATA_LENGTH: usize = N_COMS * 2;
/// Address of a backpack with none of the address jumpers bridged.
pub const DEFAULT_ADDRESS: u8 = 0x70;
/// 8/16 duty, the brightness used when nothing else is configured.
pub const DEFAULT_BRIGHTNESS: u8 = 7;

const DISPLAY_DATA_START_REGISTER: u8 = 0;
// Display data address pointer commands are 0000AAAA
const DISPLAY_DATA_ADDRESS_MASK: u8 = 0b0000_1111;
const SYSTEM_SETUP_REGISTER: u8 = 0b0010_0000;
const SYSTEM_SETUP_ENABLE_OSCILLATOR: u8 = 0b0000_0001;
const DISPLAY_REGISTER: u8 = 0b1000_0000;
const DISPLAY_ON: u8 = 0b0000_0001;
const DISPLAY_OFF: u8 = 0b0000_0000;
const DIMMING_REGISTER: u8 = 0b1110_0000;
const DIMMING_MASK: u8 = 0b0000_1111;

/// How a bit mask is combined with the current contents of a register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BitOp {
    /// Turn on the bits in the mask, leave the rest alone.
    Or,
    /// Flip the bits in the mask.
    Xor,
    /// Turn off the bits in the mask, leave the rest alone.
    AndNot,
    /// Overwrite the register with the mask.
    #[default]
    Replace,
}

impl BitOp {
    /// Combines `current` register contents with `mask`.
    pub const fn apply(self, current: u8, mask: u8) -> u8 {
        match self {
            BitOp::Or => current | mask,
            BitOp::Xor => current ^ mask,
            BitOp::AndNot => current & !mask,
            BitOp::Replace => mask,
        }
    }
}

/// Blinking modes supported by the display setup register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlinkRate {
    #[default]
    Off = 0,
    TwoHz = 1,
    OneHz = 2,
    HalfHz = 3,
}

impl From<u8> for BlinkRate {
    /// Out of range rates wrap around rather than fail, so 4 is `Off`.
    fn from(value: u8) -> Self {
        match value % 4 {
            0 => BlinkRate::Off,
            1 => BlinkRate::TwoHz,
            2 => BlinkRate::OneHz,
            _ => BlinkRate::HalfHz,
        }
    }
}

impl From<BlinkRate> for u8 {
    fn from(value: BlinkRate) -> u8 {
        value as u8
    }
}

/// Settings applied by [`HT16K33::initialize`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub display_on: bool,
    pub blink_rate: BlinkRate,
    /// 0-15, where 0 is 1/16 duty and 15 is 16/16 duty. Wraps modulo 16.
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            display_on: true,
            blink_rate: BlinkRate::Off,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

/// Driver for the HT16K33.
pub struct HT16K33<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> HT16K33<I2C>
where
    I2C: I2c,
{
    /// Creates a new driver that will communicate using `i2c` as the I2C bus
    /// to the device at `address`. Addresses for the HT16K33 are normally
    /// 0x70 - 0x77 depending on the address jumpers, but no check is made.
    /// This function does not communicate with the device.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
        }
    }

    /// The 7-bit address this driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes `self` and returns the `i2c` that it owned so it can be reused.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Brings the device into a known state: clears the display data (which
    /// is otherwise whatever the device powered up with), starts the
    /// oscillator and then applies `config`.
    pub fn initialize(&mut self, config: DisplayConfig) -> DisplayResult<&mut Self, I2C::Error> {
        self.clear()?
            .turn_on_oscillator()?
            .set_display(config.display_on, config.blink_rate)?
            .set_brightness(config.brightness)?;

        debug!(
            "HT16K33 0x{:02x} initialized (on: {}, blink: {:?}, brightness: {})",
            self.address, config.display_on, config.blink_rate, config.brightness
        );
        Ok(self)
    }

    /// Turns off every LED by writing 0 to all 16 display data registers.
    pub fn clear(&mut self) -> DisplayResult<&mut Self, I2C::Error> {
        self.set_display_data(&[0u8; DISPLAY_DATA_LENGTH])?;
        Ok(self)
    }

    /// Clears the display and stops the oscillator, putting the device into
    /// its low power standby mode.
    pub fn shut_down(&mut self) -> DisplayResult<&mut Self, I2C::Error> {
        self.clear()?.turn_off_oscillator()?;
        debug!("HT16K33 0x{:02x} shut down", self.address);
        Ok(self)
    }

    /// Turns on the device's oscillator, which is required before anything
    /// will be displayed.
    pub fn turn_on_oscillator(&mut self) -> DisplayResult<&mut Self, I2C::Error> {
        self.write_command(SYSTEM_SETUP_REGISTER | SYSTEM_SETUP_ENABLE_OSCILLATOR)?;
        Ok(self)
    }

    /// Turns off the device's oscillator. Display data is retained.
    pub fn turn_off_oscillator(&mut self) -> DisplayResult<&mut Self, I2C::Error> {
        self.write_command(SYSTEM_SETUP_REGISTER)?;
        Ok(self)
    }

    /// Sets the brightness on the device. `brightness` is 0-15 and wraps
    /// around if larger. 0 is the lowest level, but is not off.
    pub fn set_brightness(&mut self, brightness: u8) -> DisplayResult<&mut Self, I2C::Error> {
        self.write_command(DIMMING_REGISTER | (brightness & DIMMING_MASK))?;
        Ok(self)
    }

    /// Causes the device to enable/disable displaying LEDs if they are set
    /// in its display data, and sets whether the whole display blinks.
    pub fn set_display(&mut self, on: bool, blink_rate: BlinkRate) -> DisplayResult<&mut Self, I2C::Error> {
        // Display setup register: 1000XBBD
        let on = if on { DISPLAY_ON } else { DISPLAY_OFF };
        self.write_command(DISPLAY_REGISTER | (u8::from(blink_rate) << 1) | on)?;
        Ok(self)
    }

    /// Sets the device's display data, which is how each LED is turned on or off.
    ///
    /// Each pair of bytes in the data correspond to a common output. e.g. bytes
    /// 0 and 1 are for COM0, bytes 2 and 3 are for COM1, etc.
    ///
    /// The bits in each pair of bytes correspond to the 16 row outputs, where
    /// ROW0 is the LSB of the first byte, ROW 7 is the MSB of the first byte,
    /// ROW8 is the LSB of the second byte, and ROW 15 is the MSB of the second.
    ///
    /// So by setting byte 0 to 0b0001_0001, the LEDs connected to (ROW0, COM0)
    /// and (ROW4, COM0) will be turned on.
    pub fn set_display_data(&mut self, data: &[u8; DISPLAY_DATA_LENGTH]) -> DisplayResult<(), I2C::Error> {
        let mut bytes = [0u8; DISPLAY_DATA_LENGTH + 1];
        bytes[0] = DISPLAY_DATA_START_REGISTER;
        bytes[1..].copy_from_slice(data);

        self.i2c.write(self.address, &bytes)?;
        Ok(())
    }

    /// Reads one byte of display data. Only the low 4 bits of `register` are used.
    pub fn read_register(&mut self, register: u8) -> DisplayResult<u8, I2C::Error> {
        let mut data = [0u8; 1];
        self.i2c.write_read(self.address, &[register & DISPLAY_DATA_ADDRESS_MASK], &mut data)?;
        Ok(data[0])
    }

    /// Writes one byte of display data. Only the low 4 bits of `register` are used.
    pub fn write_register(&mut self, register: u8, value: u8) -> DisplayResult<(), I2C::Error> {
        self.i2c.write(self.address, &[register & DISPLAY_DATA_ADDRESS_MASK, value])?;
        Ok(())
    }

    /// Writes a single command byte to the device.
    pub fn write_command(&mut self, command: u8) -> DisplayResult<(), I2C::Error> {
        self.i2c.write(self.address, &[command])?;
        Ok(())
    }

    /// Read-modify-write of one display data register, combining its current
    /// contents with `mask` according to `op`. Returns the value written.
    ///
    /// The read and the write are separate bus transactions, so nothing else
    /// may touch this device in between.
    pub fn alter_register(&mut self, register: u8, mask: u8, op: BitOp) -> DisplayResult<u8, I2C::Error> {
        let current = self.read_register(register)?;
        let value = op.apply(current, mask);
        self.write_register(register, value)?;

        trace!(
            "HT16K33 0x{:02x} register 0x{:02x}: {:08b} {:?} {:08b} = {:08b}",
            self.address, register, current, op, mask, value
        );
        Ok(value)
    }
}

/// Lifecycle operations shared by every backpack that is built on top of a
/// single [`HT16K33`]. Implementors only need to hand out their device.
pub trait LedBackpack: Sized {
    type Bus: I2c;

    /// The underlying device, for raw register access.
    fn device_mut(&mut self) -> &mut HT16K33<Self::Bus>;

    /// See [`HT16K33::initialize`].
    fn initialize(&mut self, config: DisplayConfig) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().initialize(config)?;
        Ok(self)
    }

    /// Turns off every LED on the display.
    fn clear(&mut self) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().clear()?;
        Ok(self)
    }

    /// See [`HT16K33::shut_down`].
    fn shut_down(&mut self) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().shut_down()?;
        Ok(self)
    }

    fn turn_on_oscillator(&mut self) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().turn_on_oscillator()?;
        Ok(self)
    }

    fn turn_off_oscillator(&mut self) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().turn_off_oscillator()?;
        Ok(self)
    }

    /// See [`HT16K33::set_brightness`].
    fn set_brightness(&mut self, brightness: u8) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().set_brightness(brightness)?;
        Ok(self)
    }

    /// See [`HT16K33::set_display`].
    fn set_display(&mut self, on: bool, blink_rate: BlinkRate) -> DisplayResult<&mut Self, <Self::Bus as ErrorType>::Error> {
        self.device_mut().set_display(on, blink_rate)?;
        Ok(self)
    }
}
