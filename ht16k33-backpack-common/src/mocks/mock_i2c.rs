use std::collections::VecDeque;
use embedded_hal::i2c::{Error, ErrorKind, ErrorType, I2c, Operation};

#[derive(Debug, Copy, Clone, PartialEq)]
enum Kind {
    Read,
    Write,
    WriteRead,
}

struct Transfer {
    kind: Kind,
    address: u8,
    bytes_in: Vec<u8>,
    bytes_out: Vec<u8>,
    ret: Result<(), MockError>,
}

/// A mock of the embedded_hal::i2c::I2c trait for testing purposes.
///
/// Expected transfers are checked in the order they were added, across all
/// kinds of transfer, so a read-modify-write has to read before it writes.
pub struct MockI2c {
    transfers: VecDeque<Transfer>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            transfers: VecDeque::new(),
        }
    }

    fn expect(&mut self, kind: Kind, address: u8, bytes_in: &[u8], bytes_out: &[u8], ret: Result<(), MockError>) {
        self.transfers.push_back(Transfer {
            kind,
            address,
            bytes_in: bytes_in.to_vec(),
            bytes_out: bytes_out.to_vec(),
            ret,
        });
    }

    pub fn expect_read(&mut self, address: u8, bytes_out: &[u8]) {
        self.expect(Kind::Read, address, &[], bytes_out, Ok(()));
    }

    pub fn expect_read_err(&mut self, address: u8, err: MockError) {
        self.expect(Kind::Read, address, &[], &[], Err(err));
    }

    pub fn expect_write(&mut self, address: u8, bytes: &[u8]) {
        self.expect(Kind::Write, address, bytes, &[], Ok(()));
    }

    pub fn expect_write_err(&mut self, address: u8, err: MockError) {
        self.expect(Kind::Write, address, &[], &[], Err(err));
    }

    pub fn expect_write_read(&mut self, address: u8, bytes: &[u8], buffer: &[u8]) {
        self.expect(Kind::WriteRead, address, bytes, buffer, Ok(()));
    }

    pub fn expect_write_read_err(&mut self, address: u8, err: MockError) {
        self.expect(Kind::WriteRead, address, &[], &[], Err(err));
    }

    pub fn verify(&self) {
        assert_eq!(self.transfers.len(), 0, "less transfers were performed than expected");
    }

    fn next(&mut self, kind: Kind, address: u8) -> Transfer {
        match self.transfers.pop_front() {
            Some(transfer) => {
                assert_eq!(kind, transfer.kind, "Unexpected {:?}({:x})", kind, address);
                assert_eq!(address, transfer.address, "Unexpected address");
                transfer
            },
            None => panic!("Unexpected {:?}({:x})", kind, address),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MockError {
    Bad,
}

impl Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

#[allow(unused)]
impl I2c for MockI2c {
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let read = self.next(Kind::Read, address);

        if read.ret.is_ok() {
            assert_eq!(buffer.len(), read.bytes_out.len());
            buffer.copy_from_slice(&read.bytes_out);
        }

        read.ret
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let write = self.next(Kind::Write, address);

        if write.ret.is_ok() {
            assert_eq!(bytes, write.bytes_in, "Unexpected write bytes: {:x?}", bytes);
        }

        write.ret
    }

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        let read = self.next(Kind::WriteRead, address);

        if read.ret.is_ok() {
            assert_eq!(bytes, read.bytes_in, "Unexpected write_read bytes: {:x?}", bytes);
            assert_eq!(buffer.len(), read.bytes_out.len());
            buffer.copy_from_slice(&read.bytes_out);
        }

        read.ret
    }

    fn write_iter<B>(&mut self, _address: u8, _bytes: B) -> Result<(), Self::Error>
    where
        B: IntoIterator<Item = u8>,
    {
        unimplemented!()
    }

    fn write_iter_read<B>(&mut self, address: u8, bytes: B, buffer: &mut [u8]) -> Result<(), Self::Error>
    where
        B: IntoIterator<Item = u8>,
    {
        unimplemented!()
    }

    fn transaction<'a>(&mut self, _address: u8, _operations: &mut [Operation<'a>]) -> Result<(), Self::Error> {
        unimplemented!()
    }

    fn transaction_iter<'a, O>(&mut self, _address: u8, _operations: O) -> Result<(), Self::Error>
    where
        O: IntoIterator<Item = Operation<'a>>,
    {
        unimplemented!()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let bytes = [1, 2, 3, 4];
        let mut buffer = [0u8; 4];

        i2c.expect_read(address, &bytes);
        i2c.read(address, &mut buffer).unwrap();

        assert_eq!(buffer, bytes);
        i2c.verify();
    }

    #[test]
    fn test_read_err() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_read_err(address, MockError::Bad);
        assert!(i2c.read(address, &mut [0]).is_err());

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_read_fail_address() {
        let mut i2c = MockI2c::new();
        let bytes = [1, 2, 3, 4];
        let mut buffer = [0u8; 4];

        i2c.expect_read(0x70, &bytes);
        i2c.read(0x71, &mut buffer).unwrap();
    }

    #[test]
    fn test_write() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let write_bytes = [1, 2, 3, 4];

        i2c.expect_write(address, &write_bytes);
        i2c.write(address, &write_bytes).unwrap();

        i2c.verify();
    }

    #[test]
    fn test_write_err() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write_err(address, MockError::Bad);
        assert!(i2c.write(address, &[1]).is_err());

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_write_fail() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write(address, &[1, 2, 3, 4]);
        i2c.write(address, &[1, 2, 4, 3]).unwrap();
    }

    #[test]
    fn test_write_read() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let bytes_in = [1, 2, 3, 4];
        let bytes_out = [5, 6, 7, 8];
        let mut buffer = [1, 2, 3, 4];

        i2c.expect_write_read(address, &bytes_in, &bytes_out);
        i2c.write_read(address, &bytes_in, &mut buffer).unwrap();

        assert_eq!(buffer, bytes_out);
        i2c.verify();
    }

    #[test]
    fn test_write_read_err() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write_read_err(address, MockError::Bad);
        assert!(i2c.write_read(address, &[0], &mut [0]).is_err());

        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_write_read_fail_bytes_in() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let bytes_in = [1, 2, 3, 4];
        let bytes_out = [5, 6, 7, 8];

        i2c.expect_write_read(address, &bytes_in, &bytes_out);
        i2c.write_read(address, &[2, 2, 3, 4], &mut [0u8; 4]).unwrap();
    }

    #[test]
    fn test_read_modify_write_order() {
        let mut i2c = MockI2c::new();
        let address = 0x70;
        let mut buffer = [0u8; 1];

        i2c.expect_write_read(address, &[0x02], &[0x0F]);
        i2c.expect_write(address, &[0x02, 0x1F]);
        i2c.write_read(address, &[0x02], &mut buffer).unwrap();
        i2c.write(address, &[0x02, 0x1F]).unwrap();

        assert_eq!(buffer, [0x0F]);
        i2c.verify();
    }

    #[test]
    #[should_panic]
    fn test_out_of_order_fails() {
        let mut i2c = MockI2c::new();
        let address = 0x70;

        i2c.expect_write_read(address, &[0x02], &[0x0F]);
        i2c.expect_write(address, &[0x02, 0x1F]);
        i2c.write(address, &[0x02, 0x1F]).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_verify_fails_on_missing_transfer() {
        let mut i2c = MockI2c::new();

        i2c.expect_write(0x70, &[0x21]);
        i2c.verify();
    }
}
