use embedded_hal::i2c::I2c;

use crate::{common::DisplayResult, ht16k33::{BitOp, LedBackpack, HT16K33}};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// Number of rows and columns on the matrix.
pub const MATRIX_SIZE: usize = 8;

const ROW_ADDRESS: [u8; MATRIX_SIZE] = [0x00, 0x02, 0x04, 0x06, 0x08, 0x0A, 0x0C, 0x0E];
// The leftmost column is wired to the MSB, the rest follow from the LSB.
const COLUMN_MASK: [u8; MATRIX_SIZE] = [0x80, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40];

/// Display driver for the Adafruit 8x8 LED matrix HT16K33 backpacks (the mini
/// and 1.2" single color matrices).
///
/// Each row of the matrix is one common on the HT16K33, so every row is a
/// single byte of display data with one bit per column. Rows and columns are
/// 0-based from the top left, and wrap around when out of range.
pub struct EightByEight<I2C> {
    device: HT16K33<I2C>,
}

/// Display data register holding `row`.
pub const fn row_address(row: usize) -> u8 {
    ROW_ADDRESS[row % MATRIX_SIZE]
}

/// Bit within a row's register that lights `column`.
pub const fn column_mask(column: usize) -> u8 {
    COLUMN_MASK[column % MATRIX_SIZE]
}

impl<I2C> EightByEight<I2C>
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

    /// Changes the LED at column `x`, row `y` according to `op`.
    pub fn alter_led(&mut self, x: usize, y: usize, op: BitOp) -> DisplayResult<(), I2C::Error> {
        self.device.alter_register(row_address(y), column_mask(x), op)?;
        Ok(())
    }

    pub fn turn_on_led(&mut self, x: usize, y: usize) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::Or)
    }

    pub fn turn_off_led(&mut self, x: usize, y: usize) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::AndNot)
    }

    pub fn toggle_led(&mut self, x: usize, y: usize) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::Xor)
    }

    /// Replaces a whole row with the raw register value `bits`. Note that the
    /// MSB is the leftmost column (see [`column_mask`]).
    pub fn set_row_from_bits(&mut self, row: usize, bits: u8) -> DisplayResult<(), I2C::Error> {
        self.device.write_register(row_address(row), bits)
    }

    /// Replaces a whole row, lighting column `i` when `columns[i]` is true.
    /// Flags past the last column are ignored.
    pub fn set_row_from_flags(&mut self, row: usize, columns: &[bool]) -> DisplayResult<(), I2C::Error> {
        let bits = columns
            .iter()
            .take(MATRIX_SIZE)
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0u8, |bits, (column, _)| bits | column_mask(column));

        self.set_row_from_bits(row, bits)
    }

    /// Returns the raw register value currently held for `row`.
    pub fn read_row(&mut self, row: usize) -> DisplayResult<u8, I2C::Error> {
        self.device.read_register(row_address(row))
    }
}

impl<I2C> LedBackpack for EightByEight<I2C>
where
    I2C: I2c,
{
    type Bus = I2C;

    fn device_mut(&mut self) -> &mut HT16K33<I2C> {
        &mut self.device
    }
}
