use embedded_hal::i2c::I2c;

use crate::{common::DisplayResult, ht16k33::{BitOp, LedBackpack, HT16K33}};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// Number of digits on the display.
pub const MAX_DIGITS: usize = 4;

// The digits are connected to even commons, except that common 2 (address
// 0x04) is connected to the colon in the middle of the display.
const DIGIT_ADDRESS: [u8; MAX_DIGITS] = [0x00, 0x02, 0x06, 0x08];
const COLON_ADDRESS: u8 = 0x04;
const COLON_ON: u8 = 0xFF;
const COLON_OFF: u8 = 0x00;
const BLANK: u8 = 0b0000_0000;

/// Bits for each segment of a digit. The bits are (with 0 as LSB):
/// ```text
///   —0—
///  |   |
///  5   1
///  |   |
///   —6—
///  |   |
///  4   2
///  |   |
///   —3—  7.
/// ```
pub mod segment {
    pub const TOP: u8 = 0b0000_0001;
    pub const RIGHT_TOP: u8 = 0b0000_0010;
    pub const RIGHT_BOTTOM: u8 = 0b0000_0100;
    pub const BOTTOM: u8 = 0b0000_1000;
    pub const LEFT_BOTTOM: u8 = 0b0001_0000;
    pub const LEFT_TOP: u8 = 0b0010_0000;
    pub const MIDDLE: u8 = 0b0100_0000;
    pub const PERIOD: u8 = 0b1000_0000;
}

/// Display driver for the [Adafruit 7-segment HT16K33 Backpack](https://learn.adafruit.com/adafruit-led-backpack/0-dot-56-seven-segment-backpack).
///
/// It uses the [KW4-56NCXX 4-digit 7-segment LED display](https://cdn-shop.adafruit.com/datasheets/812datasheet.pdf),
/// which is multiplexed with common cathode.
///
/// Each digit (and colon) on the display maps to a common on the HT16K33. The
/// same LED segment across all digits maps to the same row (i.e. the top LED of
/// every digit is ROW0). Positions are 0-based from the left and wrap around.
pub struct SevenSegmentDisplay<I2C> {
    device: HT16K33<I2C>,
}

/// Display data register holding the digit at `position`.
pub const fn digit_address(position: usize) -> u8 {
    DIGIT_ADDRESS[position % MAX_DIGITS]
}

/// Converts `char` to the segments that draw it. Only the decimal digits are
/// supported, anything else is blank.
pub fn char_to_segments(char: char) -> u8 {
    const LOOKUP: [u8; 10] = [
        0b0011_1111,
        0b0000_0110,
        0b0101_1011,
        0b0100_1111,
        0b0110_0110,
        0b0110_1101,
        0b0111_1101,
        0b0000_0111,
        0b0111_1111,
        0b0110_0111,
    ];

    match char.to_digit(10) {
        Some(d) => LOOKUP[d as usize],
        None => BLANK,
    }
}

impl<I2C> SevenSegmentDisplay<I2C>
where
    I2C: I2c,
{
    /// Creates a new driver that will communicate using `i2c` as the I2C bus
    /// to a HT16K33 device at `address`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            device: HT16K33::new(i2c, address),
        }
    }

    /// Consumes `self` and returns the `i2c` that it owned so it can be reused.
    pub fn destroy(self) -> I2C {
        self.device.destroy()
    }

    /// Replaces the digit at `position` with the raw `segments` (see [`segment`]).
    pub fn set_digit(&mut self, position: usize, segments: u8) -> DisplayResult<(), I2C::Error> {
        self.device.write_register(digit_address(position), segments)
    }

    /// Returns the segments currently lit at `position`.
    pub fn read_digit(&mut self, position: usize) -> DisplayResult<u8, I2C::Error> {
        self.device.read_register(digit_address(position))
    }

    /// Shows `char` at `position`. Unsupported characters show as a blank.
    pub fn write_character(&mut self, position: usize, char: char) -> DisplayResult<(), I2C::Error> {
        self.set_digit(position, char_to_segments(char))
    }

    /// Shows `str` from the leftmost digit. If more characters are supplied
    /// than the display can show, any extra characters will be ignored. Digits
    /// past the end of a shorter `str` are left as they were.
    pub fn write_str(&mut self, str: &str) -> DisplayResult<(), I2C::Error> {
        for (position, char) in str.chars().take(MAX_DIGITS).enumerate() {
            self.write_character(position, char)?;
        }

        Ok(())
    }

    /// Changes the segments in `mask` at `position` according to `op`,
    /// leaving the other segments of the digit alone.
    pub fn alter_segment(&mut self, position: usize, mask: u8, op: BitOp) -> DisplayResult<(), I2C::Error> {
        self.device.alter_register(digit_address(position), mask, op)?;
        Ok(())
    }

    pub fn turn_on_period(&mut self, position: usize) -> DisplayResult<(), I2C::Error> {
        self.alter_segment(position, segment::PERIOD, BitOp::Or)
    }

    pub fn turn_off_period(&mut self, position: usize) -> DisplayResult<(), I2C::Error> {
        self.alter_segment(position, segment::PERIOD, BitOp::AndNot)
    }

    /// Any set bit lights the colon, so the whole register is written.
    pub fn turn_on_colon(&mut self) -> DisplayResult<(), I2C::Error> {
        self.device.write_register(COLON_ADDRESS, COLON_ON)
    }

    pub fn turn_off_colon(&mut self) -> DisplayResult<(), I2C::Error> {
        self.device.write_register(COLON_ADDRESS, COLON_OFF)
    }
}

impl<I2C> LedBackpack for SevenSegmentDisplay<I2C>
where
    I2C: I2c,
{
    type Bus = I2C;

    fn device_mut(&mut self) -> &mut HT16K33<I2C> {
        &mut self.device
    }
}
