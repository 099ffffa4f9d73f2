//! Shared test doubles: an in-memory NOR flash and a real-time interrupt
//! that both report into one bus log.

#![allow(dead_code)]

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash,
};
use wavesphere_core::layout::{CUBE_DIM, SAMPLES_PER_WAVEFORM};
use wavesphere_core::{SpherePayload, SphereStorage, StorageConfig};
use wavesphere_hal::RealtimeIrq;

pub const SECTOR_SIZE: u32 = 0x1_0000;
pub const DEVICE_SECTORS: u32 = 10;

pub const TEST_CONFIG: StorageConfig = StorageConfig {
    base_sector: 2,
    sphere_count: 8,
};

/// Everything that happened on the bus
#[derive(Debug, Default)]
pub struct BusLog {
    pub paused: bool,
    pub pauses: usize,
    pub resumes: usize,
    pub erases: usize,
    pub writes: usize,
    pub reads: usize,
    /// Reads issued while the real-time interrupt was running
    pub unpaused_reads: usize,
    /// Erases or writes issued while the real-time interrupt was running
    pub violations: usize,
    /// Writes still allowed to succeed before every later one fails;
    /// `None` never fails
    pub writes_before_failure: Option<usize>,
}

/// NOR flash in RAM: erase sets 0xFF, programming can only clear bits
pub struct MockFlash {
    memory: Rc<RefCell<Vec<u8>>>,
    log: Rc<RefCell<BusLog>>,
}

impl ErrorType for MockFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for MockFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), NorFlashErrorKind> {
        {
            let mut log = self.log.borrow_mut();
            log.reads += 1;
            if !log.paused {
                log.unpaused_reads += 1;
            }
        }

        check_read(&*self, offset, bytes.len())?;
        let start = offset as usize;
        bytes.copy_from_slice(&self.memory.borrow()[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.memory.borrow().len()
    }
}

impl NorFlash for MockFlash {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = SECTOR_SIZE as usize;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), NorFlashErrorKind> {
        {
            let mut log = self.log.borrow_mut();
            log.erases += 1;
            if !log.paused {
                log.violations += 1;
            }
        }

        check_erase(&*self, from, to)?;
        self.memory.borrow_mut()[from as usize..to as usize].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), NorFlashErrorKind> {
        {
            let mut log = self.log.borrow_mut();
            log.writes += 1;
            if !log.paused {
                log.violations += 1;
            }
            match log.writes_before_failure {
                Some(0) => return Err(NorFlashErrorKind::Other),
                Some(ref mut remaining) => *remaining -= 1,
                None => {}
            }
        }

        check_write(&*self, offset, bytes.len())?;
        let start = offset as usize;
        let mut memory = self.memory.borrow_mut();
        for (cell, byte) in memory[start..start + bytes.len()].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        Ok(())
    }
}

/// Interpolation timer stand-in
pub struct MockIrq {
    log: Rc<RefCell<BusLog>>,
}

impl RealtimeIrq for MockIrq {
    fn pause(&mut self) {
        let mut log = self.log.borrow_mut();
        assert!(!log.paused, "real-time interrupt paused twice");
        log.paused = true;
        log.pauses += 1;
    }

    fn resume(&mut self) {
        let mut log = self.log.borrow_mut();
        assert!(log.paused, "real-time interrupt resumed while running");
        log.paused = false;
        log.resumes += 1;
    }
}

/// Test-side view of the mock hardware
pub struct Bench {
    memory: Rc<RefCell<Vec<u8>>>,
    log: Rc<RefCell<BusLog>>,
}

impl Bench {
    pub fn log(&self) -> Ref<'_, BusLog> {
        self.log.borrow()
    }

    /// Make every write from now on fail
    pub fn fail_writes(&self, fail: bool) {
        self.log.borrow_mut().writes_before_failure = fail.then_some(0);
    }

    /// Let `count` more writes succeed, then fail every later one
    pub fn fail_writes_after(&self, count: usize) {
        self.log.borrow_mut().writes_before_failure = Some(count);
    }

    /// Program bytes behind the storage manager's back
    pub fn poke(&self, address: u32, data: &[u8]) {
        let start = address as usize;
        let mut memory = self.memory.borrow_mut();
        for (cell, byte) in memory[start..start + data.len()].iter_mut().zip(data) {
            *cell &= *byte;
        }
    }

    pub fn peek(&self, address: u32, len: usize) -> Vec<u8> {
        let start = address as usize;
        self.memory.borrow()[start..start + len].to_vec()
    }

    pub fn sphere_address(&self, index: u8) -> u32 {
        (TEST_CONFIG.base_sector + u32::from(index)) * SECTOR_SIZE
    }
}

pub type TestStorage = SphereStorage<MockFlash, MockIrq>;

/// Erased flash wired to a storage manager using [`TEST_CONFIG`]
pub fn rig() -> (TestStorage, Bench) {
    rig_with(TEST_CONFIG, DEVICE_SECTORS)
}

pub fn rig_with(config: StorageConfig, sectors: u32) -> (TestStorage, Bench) {
    let memory = Rc::new(RefCell::new(vec![0xFF; (sectors * SECTOR_SIZE) as usize]));
    let log = Rc::new(RefCell::new(BusLog::default()));

    let flash = MockFlash {
        memory: Rc::clone(&memory),
        log: Rc::clone(&log),
    };
    let irq = MockIrq {
        log: Rc::clone(&log),
    };

    let storage = SphereStorage::new(flash, irq, config).expect("valid test config");
    (storage, Bench { memory, log })
}

/// Payload whose every sample depends on `seed` and its position
pub fn payload(seed: u16) -> SpherePayload {
    let mut payload = SpherePayload::new();
    for z in 0..CUBE_DIM as i16 {
        for y in 0..CUBE_DIM as i16 {
            for x in 0..CUBE_DIM as i16 {
                let slot = (x + y * 3 + z * 9) as i32;
                let samples: Vec<i16> = (0..SAMPLES_PER_WAVEFORM as i32)
                    .map(|i| (i32::from(seed) * 7919 + slot * 613 + i) as i16)
                    .collect();
                payload.set_waveform(x, y, z, &format!("S{seed}W{slot}"), &samples);
            }
        }
    }
    payload
}
