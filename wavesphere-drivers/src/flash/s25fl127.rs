//! S25FL127S serial NOR flash driver (SPI mode)
//!
//! The S25FL127S is a 128 Mbit (16 MiB) SPI NOR flash. This driver uses
//! the uniform 64 KiB sector layout and plain single-lane commands:
//!
//! - READ (0x03) with a 3-byte address
//! - Page Program (0x02), at most one 256-byte page per command
//! - Sector Erase (0xD8), 64 KiB
//! - WREN (0x06) before every program/erase
//! - RDSR1 (0x05) polled until WIP clears
//!
//! Chip select is owned by the [`SpiDevice`]; each command is one
//! transaction. The chip is exposed through the `embedded-storage`
//! [`NorFlash`] traits with byte-granular reads and writes and one
//! 64 KiB sector as the erase unit.

use core::fmt::Debug;

use embedded_hal::spi::{Operation, SpiDevice};
use embedded_storage::nor_flash::{
    self, ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

/// Command opcodes
pub mod cmd {
    /// Read data (3-byte address)
    pub const READ: u8 = 0x03;
    /// Page program (3-byte address)
    pub const PP: u8 = 0x02;
    /// 64 KiB sector erase (3-byte address)
    pub const SE: u8 = 0xD8;
    /// Write enable
    pub const WREN: u8 = 0x06;
    /// Read status register 1
    pub const RDSR1: u8 = 0x05;
    /// Read JEDEC identification
    pub const RDID: u8 = 0x9F;
}

/// Status register 1: write in progress
pub const SR1_WIP: u8 = 0x01;

/// Manufacturer, memory type and capacity bytes returned by RDID
pub const JEDEC_ID: [u8; 3] = [0x01, 0x20, 0x18];

/// Device capacity in bytes
pub const CAPACITY: u32 = 16 * 1024 * 1024;

/// Uniform sector size
pub const SECTOR_SIZE: u32 = 64 * 1024;

/// Number of uniform sectors
pub const SECTOR_COUNT: u32 = CAPACITY / SECTOR_SIZE;

/// Page program buffer size
pub const PAGE_SIZE: u32 = 256;

/// S25FL127S driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum S25flError<E> {
    /// SPI transfer failed
    Spi(E),
    /// Address range runs past the end of the device
    OutOfBounds,
    /// Erase range does not start and end on sector boundaries
    NotAligned,
    /// RDID did not return an S25FL127S
    UnexpectedId([u8; 3]),
}

impl<E> From<NorFlashErrorKind> for S25flError<E> {
    fn from(kind: NorFlashErrorKind) -> Self {
        match kind {
            NorFlashErrorKind::NotAligned => S25flError::NotAligned,
            _ => S25flError::OutOfBounds,
        }
    }
}

impl<E: Debug> NorFlashError for S25flError<E> {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            S25flError::OutOfBounds => NorFlashErrorKind::OutOfBounds,
            S25flError::NotAligned => NorFlashErrorKind::NotAligned,
            S25flError::Spi(_) | S25flError::UnexpectedId(_) => NorFlashErrorKind::Other,
        }
    }
}

/// S25FL127S on an SPI device
pub struct S25fl127<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> S25fl127<SPI> {
    /// Create a new driver
    ///
    /// Does not talk to the chip; call [`S25fl127::init`] to check it is
    /// there.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Check the JEDEC id and wait out any operation left running
    pub fn init(&mut self) -> Result<(), S25flError<SPI::Error>> {
        let id = self.read_id()?;
        if id != JEDEC_ID {
            #[cfg(feature = "defmt")]
            defmt::error!("Unexpected flash id {:02x}", id);
            return Err(S25flError::UnexpectedId(id));
        }

        self.wait_ready()
    }

    /// Read the 3-byte JEDEC id
    pub fn read_id(&mut self) -> Result<[u8; 3], S25flError<SPI::Error>> {
        let mut id = [0u8; 3];
        self.spi
            .transaction(&mut [Operation::Write(&[cmd::RDID]), Operation::Read(&mut id)])
            .map_err(S25flError::Spi)?;
        Ok(id)
    }

    /// Read status register 1
    pub fn read_status(&mut self) -> Result<u8, S25flError<SPI::Error>> {
        let mut status = [0u8; 1];
        self.spi
            .transaction(&mut [
                Operation::Write(&[cmd::RDSR1]),
                Operation::Read(&mut status),
            ])
            .map_err(S25flError::Spi)?;
        Ok(status[0])
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    fn write_enable(&mut self) -> Result<(), S25flError<SPI::Error>> {
        self.spi.write(&[cmd::WREN]).map_err(S25flError::Spi)
    }

    /// Poll until the current program/erase finishes
    fn wait_ready(&mut self) -> Result<(), S25flError<SPI::Error>> {
        while self.read_status()? & SR1_WIP != 0 {}
        Ok(())
    }

    fn header(opcode: u8, address: u32) -> [u8; 4] {
        let [_, a2, a1, a0] = address.to_be_bytes();
        [opcode, a2, a1, a0]
    }

    /// Issue one sector erase and wait for it to finish
    fn erase_sector(&mut self, address: u32) -> Result<(), S25flError<SPI::Error>> {
        self.write_enable()?;
        self.spi
            .write(&Self::header(cmd::SE, address))
            .map_err(S25flError::Spi)?;
        self.wait_ready()
    }
}

impl<SPI: SpiDevice> ErrorType for S25fl127<SPI> {
    type Error = S25flError<SPI::Error>;
}

impl<SPI: SpiDevice> ReadNorFlash for S25fl127<SPI> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        nor_flash::check_read(&*self, offset, bytes.len())?;

        self.spi
            .transaction(&mut [
                Operation::Write(&Self::header(cmd::READ, offset)),
                Operation::Read(bytes),
            ])
            .map_err(S25flError::Spi)
    }

    fn capacity(&self) -> usize {
        CAPACITY as usize
    }
}

impl<SPI: SpiDevice> NorFlash for S25fl127<SPI> {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = SECTOR_SIZE as usize;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        nor_flash::check_erase(&*self, from, to)?;

        for address in (from..to).step_by(SECTOR_SIZE as usize) {
            self.erase_sector(address)?;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Erased {:#x}..{:#x}", from, to);

        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        nor_flash::check_write(&*self, offset, bytes.len())?;

        let mut address = offset;
        let mut remaining = bytes;
        while !remaining.is_empty() {
            // A page program wraps within its page, so never cross a page boundary
            let room = (PAGE_SIZE - address % PAGE_SIZE) as usize;
            let (chunk, rest) = remaining.split_at(room.min(remaining.len()));

            self.write_enable()?;
            self.spi
                .transaction(&mut [
                    Operation::Write(&Self::header(cmd::PP, address)),
                    Operation::Write(chunk),
                ])
                .map_err(S25flError::Spi)?;
            self.wait_ready()?;

            address += chunk.len() as u32;
            remaining = rest;
        }

        Ok(())
    }
}
