//! # Station Memory Access
//!
//! Reads 32-byte blocks out of the WH1080's internal memory over USB and
//! locates the "current" data block.
//!
//! The station exposes its memory through a simple request/response scheme:
//! an 8-byte command sent as a class-specific control transfer names a block
//! offset, and the device answers with 32 bytes on its interrupt-in
//! endpoint. Offset 0 holds the *fixed block*, whose first byte is a `0x55`
//! sentinel and whose last two bytes are a little-endian pointer to the
//! block containing the latest sensor readings.
//!
//! The actual USB plumbing lives behind [`UsbTransport`] so the protocol
//! logic here can be exercised against an in-memory fake. A failed or
//! short transfer is fatal for the current run: the station firmware is not
//! worth retry heroics, and the next scheduled cycle starts from scratch
//! anyway.

use std::time::Duration;
use thiserror::Error;

/// Every station memory block is exactly 32 bytes.
pub const BLOCK_LEN: usize = 32;

/// First byte of a valid fixed block.
pub const FIXED_BLOCK_SENTINEL: u8 = 0x55;

/// Interrupt-in endpoint the station answers block reads on.
pub const ENDPOINT_IN: u8 = 0x81;

/// Per-transfer timeout. A healthy station answers well within this.
pub const USB_TIMEOUT: Duration = Duration::from_millis(1000);

// Class-specific control transfer framing (HID SET_REPORT).
const REQUEST_TYPE: u8 = 0x21;
const REQUEST: u8 = 0x09;
const VALUE: u16 = 0x200;
const INDEX: u16 = 0;

/// Failure in the underlying USB transfer (error or timeout).
///
/// String-typed so the library stays independent of whichever USB backend
/// the binary links in.
#[derive(Error, Debug)]
#[error("usb transport: {0}")]
pub struct TransportError(pub String);

/// Errors raised while reading station memory.
#[derive(Error, Debug)]
pub enum StationError {
    /// Control or bulk transfer failed or timed out
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Fixed block did not start with the 0x55 sentinel, so the pointer to
    /// the live data block cannot be trusted
    #[error("bad fixed-block header: expected 0x55, got {0:#04x}")]
    BadHeader(u8),
}

/// Minimal USB capability the station reader needs: one control write and
/// one endpoint read. Implemented by the `rusb` adapter in the binary and by
/// an in-memory fake in tests.
pub trait UsbTransport {
    /// Issue a control transfer carrying `data` to the device.
    fn control_transfer(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;

    /// Read up to `buf.len()` bytes from `endpoint`, returning the number of
    /// bytes actually transferred.
    fn read(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

/// Protocol-level view of one weather station. Owns the transport for the
/// process lifetime.
pub struct Station<T> {
    transport: T,
}

impl<T: UsbTransport> Station<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Read the 32-byte block starting at `offset`.
    ///
    /// Sends the doubled `[0xA1, MSB, LSB, 32]` command the firmware
    /// expects, then reads the response off the interrupt endpoint. A short
    /// read is reported as a transport failure.
    pub fn read_block(&mut self, offset: u16) -> Result<[u8; BLOCK_LEN], StationError> {
        let cmd = block_command(offset);
        self.transport
            .control_transfer(REQUEST_TYPE, REQUEST, VALUE, INDEX, &cmd, USB_TIMEOUT)?;

        let mut block = [0u8; BLOCK_LEN];
        let n = self
            .transport
            .read(ENDPOINT_IN, &mut block, USB_TIMEOUT)?;
        if n != BLOCK_LEN {
            return Err(TransportError(format!(
                "short block read: expected {BLOCK_LEN} bytes, got {n}"
            ))
            .into());
        }
        Ok(block)
    }

    /// Read the fixed block and extract the offset of the current data
    /// block, rejecting a fixed block with a bad header sentinel.
    ///
    /// A corrupt pointer is indistinguishable from a valid one at this
    /// layer; only the header byte is checked.
    pub fn locate(&mut self) -> Result<u16, StationError> {
        let fixed = self.read_block(0)?;
        if fixed[0] != FIXED_BLOCK_SENTINEL {
            return Err(StationError::BadHeader(fixed[0]));
        }
        Ok(u16::from_le_bytes([fixed[30], fixed[31]]))
    }

    /// Locate and read the block holding the latest sensor readings.
    pub fn read_current(&mut self) -> Result<[u8; BLOCK_LEN], StationError> {
        let offset = self.locate()?;
        self.read_block(offset)
    }
}

/// Build the 8-byte read command for a block offset. The firmware wants the
/// `[0xA1, MSB, LSB, len]` quartet twice.
fn block_command(offset: u16) -> [u8; 8] {
    let [msb, lsb] = offset.to_be_bytes();
    let len = BLOCK_LEN as u8;
    [0xA1, msb, lsb, len, 0xA1, msb, lsb, len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory station: maps block offsets to canned 32-byte blocks and
    /// records the commands it was sent.
    pub struct FakeTransport {
        pub blocks: HashMap<u16, [u8; BLOCK_LEN]>,
        pub commands: Vec<Vec<u8>>,
        requested: Option<u16>,
    }

    impl FakeTransport {
        pub fn new(blocks: HashMap<u16, [u8; BLOCK_LEN]>) -> Self {
            Self {
                blocks,
                commands: Vec::new(),
                requested: None,
            }
        }
    }

    impl UsbTransport for FakeTransport {
        fn control_transfer(
            &mut self,
            _request_type: u8,
            _request: u8,
            _value: u16,
            _index: u16,
            data: &[u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            self.commands.push(data.to_vec());
            self.requested = Some(u16::from_be_bytes([data[1], data[2]]));
            Ok(data.len())
        }

        fn read(
            &mut self,
            _endpoint: u8,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            let offset = self
                .requested
                .ok_or_else(|| TransportError("read before command".into()))?;
            let block = self
                .blocks
                .get(&offset)
                .ok_or_else(|| TransportError(format!("no block at offset {offset:#06x}")))?;
            buf[..BLOCK_LEN].copy_from_slice(block);
            Ok(BLOCK_LEN)
        }
    }

    fn fixed_block_pointing_to(offset: u16) -> [u8; BLOCK_LEN] {
        let mut fixed = [0u8; BLOCK_LEN];
        fixed[0] = FIXED_BLOCK_SENTINEL;
        let [lsb, msb] = offset.to_le_bytes();
        fixed[30] = lsb;
        fixed[31] = msb;
        fixed
    }

    #[test]
    fn block_command_doubles_the_request_quartet() {
        let cmd = block_command(0x2010);
        assert_eq!(cmd, [0xA1, 0x20, 0x10, 32, 0xA1, 0x20, 0x10, 32]);
    }

    #[test]
    fn block_command_splits_offset_big_endian() {
        let cmd = block_command(0x0100);
        assert_eq!(cmd[1], 0x01, "MSB goes first");
        assert_eq!(cmd[2], 0x00);
    }

    #[test]
    fn locate_extracts_little_endian_pointer() {
        let mut blocks = HashMap::new();
        blocks.insert(0, fixed_block_pointing_to(0x2000));
        let mut station = Station::new(FakeTransport::new(blocks));

        assert_eq!(station.locate().unwrap(), 0x2000);
    }

    #[test]
    fn locate_rejects_bad_header() {
        let mut fixed = fixed_block_pointing_to(0x2000);
        fixed[0] = 0x54;
        let mut blocks = HashMap::new();
        blocks.insert(0, fixed);
        let mut station = Station::new(FakeTransport::new(blocks));

        match station.locate() {
            Err(StationError::BadHeader(b)) => assert_eq!(b, 0x54),
            other => panic!("expected BadHeader, got {other:?}"),
        }
    }

    #[test]
    fn read_current_follows_the_pointer() {
        let mut current = [0u8; BLOCK_LEN];
        current[1] = 42;
        let mut blocks = HashMap::new();
        blocks.insert(0, fixed_block_pointing_to(0x0820));
        blocks.insert(0x0820, current);
        let mut station = Station::new(FakeTransport::new(blocks));

        let block = station.read_current().unwrap();
        assert_eq!(block[1], 42);
    }

    #[test]
    fn transport_failure_propagates() {
        // No block at offset 0 -> the fake's read fails.
        let mut station = Station::new(FakeTransport::new(HashMap::new()));
        assert!(matches!(
            station.locate(),
            Err(StationError::Transport(_))
        ));
    }
}
