//! A software stand-in for an HT16K33 on an I2C bus, for running the backpack
//! drivers without any hardware attached.
//!
//! It behaves like the real device as far as the drivers can tell: display
//! data lives in 16 bytes of RAM behind an auto-incrementing address pointer,
//! and the system setup, display setup and dimming commands are decoded into
//! state that can be inspected. Every access is logged at debug level so the
//! log output doubles as a picture of what the display would show.
use embedded_hal::i2c::{Error, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::ht16k33::{BlinkRate, DISPLAY_DATA_LENGTH};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

const ADDRESS_POINTER_MASK: u8 = 0b0000_1111;
const COMMAND_MASK: u8 = 0b1111_0000;
const SYSTEM_SETUP_COMMAND: u8 = 0b0010_0000;
const DISPLAY_SETUP_COMMAND: u8 = 0b1000_0000;
const DIMMING_COMMAND: u8 = 0b1110_0000;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EmulatedI2cError {
    /// Nothing acknowledged the given address.
    NoDevice(u8),
}

impl Error for EmulatedI2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            EmulatedI2cError::NoDevice(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
        }
    }
}

/// An in-memory HT16K33 that implements the I2C bus trait.
pub struct EmulatedI2c {
    chip_address: Option<u8>,
    memory: [u8; DISPLAY_DATA_LENGTH],
    pointer: u8,
    oscillator_on: bool,
    display_on: bool,
    blink_rate: BlinkRate,
    brightness: u8,
}

impl EmulatedI2c {
    /// Creates an emulated device that answers on any address, in the state
    /// the HT16K33 powers up in.
    pub fn new() -> Self {
        Self {
            chip_address: None,
            memory: [0u8; DISPLAY_DATA_LENGTH],
            pointer: 0,
            oscillator_on: false,
            display_on: false,
            blink_rate: BlinkRate::Off,
            // The device powers up at full duty
            brightness: 15,
        }
    }

    /// Restricts the emulated device to a single address, so that any other
    /// address fails the way a missing device would. `None` answers everything.
    pub fn set_chip_address(&mut self, chip_address: Option<u8>) {
        self.chip_address = chip_address;
    }

    /// The current contents of display data `register` (low 4 bits used).
    pub fn register(&self, register: u8) -> u8 {
        self.memory[(register & ADDRESS_POINTER_MASK) as usize]
    }

    pub fn display_data(&self) -> &[u8; DISPLAY_DATA_LENGTH] {
        &self.memory
    }

    pub fn oscillator_on(&self) -> bool {
        self.oscillator_on
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    pub fn blink_rate(&self) -> BlinkRate {
        self.blink_rate
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    fn check_address(&self, address: u8) -> Result<(), EmulatedI2cError> {
        match self.chip_address {
            Some(chip_address) if chip_address != address => {
                warn!("[0x{:02X}] No device at address", address);
                Err(EmulatedI2cError::NoDevice(address))
            },
            _ => Ok(()),
        }
    }

    fn command(&mut self, address: u8, command: u8) {
        debug!("[0x{:02X}] Writing byte 0x{:02X}", address, command);

        match command & COMMAND_MASK {
            // 0000AAAA sets the display data address pointer
            0 => self.pointer = command & ADDRESS_POINTER_MASK,
            SYSTEM_SETUP_COMMAND => self.oscillator_on = command & 0b1 != 0,
            DISPLAY_SETUP_COMMAND => {
                self.display_on = command & 0b1 != 0;
                self.blink_rate = BlinkRate::from((command >> 1) & 0b11);
            },
            DIMMING_COMMAND => self.brightness = command & 0b1111,
            _ => warn!("[0x{:02X}] Ignoring unsupported command 0x{:02X}", address, command),
        }
    }

    fn store(&mut self, address: u8, value: u8) {
        let register = self.pointer;
        self.memory[register as usize] = value;
        self.pointer = (register + 1) & ADDRESS_POINTER_MASK;

        debug!(
            "[0x{:02X}] Setting register 0x{:02X} value 0x{:02X} [0b{:08b}]",
            address, register, value, value
        );
    }

    fn load(&mut self, address: u8) -> u8 {
        let register = self.pointer;
        let value = self.memory[register as usize];
        self.pointer = (register + 1) & ADDRESS_POINTER_MASK;

        debug!(
            "[0x{:02X}] Reading register 0x{:02X} value 0x{:02X} [0b{:08b}]",
            address, register, value, value
        );
        value
    }

    fn write_bytes<B>(&mut self, address: u8, bytes: B) -> Result<(), EmulatedI2cError>
    where
        B: IntoIterator<Item = u8>,
    {
        self.check_address(address)?;

        let mut bytes = bytes.into_iter();

        if let Some(first) = bytes.next() {
            match bytes.next() {
                // A lone byte is a command, which may be a pointer update
                None => self.command(address, first),
                Some(second) => {
                    // Data writes always start with the address pointer
                    self.pointer = first & ADDRESS_POINTER_MASK;
                    self.store(address, second);

                    for value in bytes {
                        self.store(address, value);
                    }
                },
            }
        }

        Ok(())
    }

    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), EmulatedI2cError> {
        self.check_address(address)?;

        for byte in buffer.iter_mut() {
            *byte = self.load(address);
        }

        Ok(())
    }
}

impl Default for EmulatedI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for EmulatedI2c {
    type Error = EmulatedI2cError;
}

impl I2c for EmulatedI2c {
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.read_bytes(address, buffer)
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_bytes(address, bytes.iter().copied())
    }

    fn write_iter<B>(&mut self, address: u8, bytes: B) -> Result<(), Self::Error>
    where
        B: IntoIterator<Item = u8>,
    {
        self.write_bytes(address, bytes)
    }

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.write_bytes(address, bytes.iter().copied())?;
        self.read_bytes(address, buffer)
    }

    fn write_iter_read<B>(&mut self, address: u8, bytes: B, buffer: &mut [u8]) -> Result<(), Self::Error>
    where
        B: IntoIterator<Item = u8>,
    {
        self.write_bytes(address, bytes)?;
        self.read_bytes(address, buffer)
    }

    fn transaction<'a>(&mut self, address: u8, operations: &mut [Operation<'a>]) -> Result<(), Self::Error> {
        for operation in operations.iter_mut() {
            match operation {
                Operation::Read(buffer) => self.read_bytes(address, buffer)?,
                Operation::Write(bytes) => self.write_bytes(address, bytes.iter().copied())?,
            }
        }

        Ok(())
    }

    fn transaction_iter<'a, O>(&mut self, address: u8, operations: O) -> Result<(), Self::Error>
    where
        O: IntoIterator<Item = Operation<'a>>,
    {
        for operation in operations {
            match operation {
                Operation::Read(buffer) => self.read_bytes(address, buffer)?,
                Operation::Write(bytes) => self.write_bytes(address, bytes.iter().copied())?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let i2c = EmulatedI2c::new();

        assert_eq!(i2c.display_data(), &[0u8; DISPLAY_DATA_LENGTH]);
        assert!(!i2c.oscillator_on());
        assert!(!i2c.display_on());
        assert_eq!(i2c.blink_rate(), BlinkRate::Off);
        assert_eq!(i2c.brightness(), 15);
    }

    #[test]
    fn test_register_write_and_read() {
        let mut i2c = EmulatedI2c::new();
        let mut buffer = [0u8; 1];

        i2c.write(0x70, &[0x06, 0x5B]).unwrap();
        i2c.write_read(0x70, &[0x06], &mut buffer).unwrap();

        assert_eq!(buffer, [0x5B]);
        assert_eq!(i2c.register(0x06), 0x5B);
    }

    #[test]
    fn test_burst_write_auto_increments() {
        let mut i2c = EmulatedI2c::new();

        i2c.write(0x70, &[0x0E, 1, 2, 3]).unwrap();

        // The pointer wraps from 0x0F back to 0x00
        assert_eq!(i2c.register(0x0E), 1);
        assert_eq!(i2c.register(0x0F), 2);
        assert_eq!(i2c.register(0x00), 3);
    }

    #[test]
    fn test_burst_read_auto_increments() {
        let mut i2c = EmulatedI2c::new();
        let mut buffer = [0u8; 3];

        i2c.write(0x70, &[0x02, 0xAA, 0xBB, 0xCC]).unwrap();
        i2c.write_read(0x70, &[0x02], &mut buffer).unwrap();

        assert_eq!(buffer, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_commands() {
        let mut i2c = EmulatedI2c::new();

        i2c.write(0x70, &[0x21]).unwrap();
        i2c.write(0x70, &[0x85]).unwrap();
        i2c.write(0x70, &[0xE3]).unwrap();

        assert!(i2c.oscillator_on());
        assert!(i2c.display_on());
        assert_eq!(i2c.blink_rate(), BlinkRate::OneHz);
        assert_eq!(i2c.brightness(), 3);

        i2c.write(0x70, &[0x20]).unwrap();
        assert!(!i2c.oscillator_on());
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut i2c = EmulatedI2c::new();

        i2c.write(0x70, &[0x40]).unwrap();

        assert_eq!(i2c.display_data(), &[0u8; DISPLAY_DATA_LENGTH]);
        assert!(!i2c.oscillator_on());
    }

    #[test]
    fn test_transaction() {
        let mut i2c = EmulatedI2c::new();
        let mut buffer = [0u8; 2];

        i2c.write(0x70, &[0x08, 0x12, 0x34]).unwrap();
        i2c.transaction(0x70, &mut [
            Operation::Write(&[0x08]),
            Operation::Read(&mut buffer),
        ]).unwrap();

        assert_eq!(buffer, [0x12, 0x34]);
    }

    #[test]
    fn test_any_address_by_default() {
        let mut i2c = EmulatedI2c::new();

        assert!(i2c.write(0x70, &[0x21]).is_ok());
        assert!(i2c.write(0x77, &[0x21]).is_ok());
    }

    #[test]
    fn test_wrong_address_is_not_acknowledged() {
        let mut i2c = EmulatedI2c::new();
        i2c.set_chip_address(Some(0x70));

        assert_eq!(i2c.write(0x71, &[0x00, 0xFF]), Err(EmulatedI2cError::NoDevice(0x71)));
        assert_eq!(
            i2c.read(0x71, &mut [0u8; 1]).unwrap_err().kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );

        // The failed write must not have reached the display data
        assert_eq!(i2c.register(0x00), 0);
    }
}
