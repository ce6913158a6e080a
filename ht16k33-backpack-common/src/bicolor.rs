use embedded_hal::i2c::I2c;

use crate::{common::DisplayResult, ht16k33::{BitOp, LedBackpack, HT16K33}};

/// Number of rows and columns on the matrix.
pub const MATRIX_SIZE: usize = 8;

// Columns count down through the display data, green on the even registers
// and red on the odd ones.
const GREEN_COLUMN_ADDRESS: [u8; MATRIX_SIZE] = [0x0E, 0x0C, 0x0A, 0x08, 0x06, 0x04, 0x02, 0x00];
const RED_COLUMN_ADDRESS: [u8; MATRIX_SIZE] = [0x0F, 0x0D, 0x0B, 0x09, 0x07, 0x05, 0x03, 0x01];
const ROW_MASK: [u8; MATRIX_SIZE] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

/// One of the two LEDs behind every pixel of the matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
}

/// What a pixel shows. Yellow is both LEDs lit at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pixel {
    Off,
    Green,
    Red,
    Yellow,
}

/// Display data register holding `column` for `color`.
pub const fn column_address(column: usize, color: Color) -> u8 {
    let column = column % MATRIX_SIZE;

    match color {
        Color::Green => GREEN_COLUMN_ADDRESS[column],
        Color::Red => RED_COLUMN_ADDRESS[column],
    }
}

/// Bit within a column's register that lights `row`.
pub const fn row_mask(row: usize) -> u8 {
    ROW_MASK[row % MATRIX_SIZE]
}

/// Display driver for the [Adafruit bicolor 8x8 LED square](https://www.adafruit.com/products/902)
/// HT16K33 backpack.
///
/// Unlike the single color matrix, the bicolor matrix is wired by column: each
/// column has a green and a red register, and every bit in those is a row.
/// Both banks are completely independent.
pub struct BiColor<I2C> {
    device: HT16K33<I2C>,
}

impl<I2C> BiColor<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            device: HT16K33::new(i2c, address),
        }
    }

    /// Consumes `self` and returns the `i2c` that it owned so it can be reused.
    pub fn destroy(self) -> I2C {
        self.device.destroy()
    }

    /// Changes the `color` LED at column `x`, row `y` according to `op`.
    pub fn alter_led(&mut self, x: usize, y: usize, op: BitOp, color: Color) -> DisplayResult<(), I2C::Error> {
        self.device.alter_register(column_address(x, color), row_mask(y), op)?;
        Ok(())
    }

    pub fn turn_on_led(&mut self, x: usize, y: usize, color: Color) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::Or, color)
    }

    pub fn turn_off_led(&mut self, x: usize, y: usize, color: Color) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::AndNot, color)
    }

    pub fn toggle_led(&mut self, x: usize, y: usize, color: Color) -> DisplayResult<(), I2C::Error> {
        self.alter_led(x, y, BitOp::Xor, color)
    }

    /// Turns off both LEDs at column `x`, row `y`.
    pub fn clear_led(&mut self, x: usize, y: usize) -> DisplayResult<(), I2C::Error> {
        self.turn_off_led(x, y, Color::Green)?;
        self.turn_off_led(x, y, Color::Red)
    }

    /// Sets both LEDs at column `x`, row `y` so that the pixel shows `pixel`.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> DisplayResult<(), I2C::Error> {
        let (green, red) = match pixel {
            Pixel::Off => (BitOp::AndNot, BitOp::AndNot),
            Pixel::Green => (BitOp::Or, BitOp::AndNot),
            Pixel::Red => (BitOp::AndNot, BitOp::Or),
            Pixel::Yellow => (BitOp::Or, BitOp::Or),
        };

        self.alter_led(x, y, green, Color::Green)?;
        self.alter_led(x, y, red, Color::Red)
    }

    /// Replaces every `color` LED in `column` with `value`, row 0 being the LSB.
    pub fn set_column(&mut self, column: usize, value: u8, color: Color) -> DisplayResult<(), I2C::Error> {
        self.device.write_register(column_address(column, color), value)
    }

    /// Returns the `color` register currently held for `column`.
    pub fn read_column(&mut self, column: usize, color: Color) -> DisplayResult<u8, I2C::Error> {
        self.device.read_register(column_address(column, color))
    }
}

impl<I2C> LedBackpack for BiColor<I2C>
where
    I2C: I2c,
{
    type Bus = I2C;

    fn device_mut(&mut self) -> &mut HT16K33<I2C> {
        &mut self.device
    }
}
