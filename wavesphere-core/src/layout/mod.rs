//! On-flash sphere layout
//!
//! Each sphere occupies exactly one sector:
//!
//! ```text
//! offset 0   signature        4 bytes  "US1\0" / "FS1\0" / anything else
//! offset 4   waveform record  × 27     row-major by x + 3y + 9z
//!              name field     8 bytes  reserved, never read back
//!              samples        512 × i16 little-endian
//! ```
//!
//! Address arithmetic never fails. Out-of-range sphere indices alias the
//! last sphere and out-of-range cube coordinates alias the nearest face
//! of the cube.

use crate::config::StorageConfig;

/// Compiled-in capacity of the sphere region
pub const MAX_TOTAL_SPHERES: usize = 64;

/// Waveforms along each edge of the cube
pub const CUBE_DIM: usize = 3;

/// Waveforms per sphere
pub const WAVEFORMS_PER_SPHERE: usize = CUBE_DIM * CUBE_DIM * CUBE_DIM;

/// Signature length (3 ASCII characters and a NUL)
pub const SIGNATURE_LEN: usize = 4;

/// Samples per waveform
pub const SAMPLES_PER_WAVEFORM: usize = 512;

/// Bytes per sample (signed 16-bit)
pub const BYTES_PER_SAMPLE: usize = 2;

/// Size of one waveform's sample block
pub const WAVEFORM_SAMPLE_BYTES: usize = SAMPLES_PER_WAVEFORM * BYTES_PER_SAMPLE;

/// Reserved per-waveform name field ahead of the samples
pub const WAVEFORM_NAME_LEN: usize = 8;

/// Size of one waveform record (name field + samples)
pub const WAVEFORM_RECORD_BYTES: usize = WAVEFORM_NAME_LEN + WAVEFORM_SAMPLE_BYTES;

/// Size of a sphere payload (everything after the signature)
pub const PAYLOAD_BYTES: usize = WAVEFORMS_PER_SPHERE * WAVEFORM_RECORD_BYTES;

/// Bytes used in a sphere's sector
pub const SPHERE_BYTES: usize = SIGNATURE_LEN + PAYLOAD_BYTES;

/// Clamp one cube coordinate into `0..CUBE_DIM`
pub fn clamp_coord(coord: i16) -> usize {
    coord.clamp(0, CUBE_DIM as i16 - 1) as usize
}

/// Row-major slot of the waveform at (x, y, z), coordinates clamped
pub fn waveform_slot(x: i16, y: i16, z: i16) -> usize {
    clamp_coord(x) + clamp_coord(y) * CUBE_DIM + clamp_coord(z) * CUBE_DIM * CUBE_DIM
}

/// Offset of a waveform's samples from the start of its sphere's sector
pub fn waveform_offset(x: i16, y: i16, z: i16) -> u32 {
    (SIGNATURE_LEN + waveform_slot(x, y, z) * WAVEFORM_RECORD_BYTES + WAVEFORM_NAME_LEN) as u32
}

/// Maps sphere indices onto flash sectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SphereLayout {
    base_sector: u32,
    sphere_count: u8,
    sector_size: u32,
}

impl SphereLayout {
    /// Create a layout from a validated configuration and the flash erase size
    pub(crate) fn new(config: &StorageConfig, sector_size: u32) -> Self {
        Self {
            base_sector: config.base_sector,
            sphere_count: config.sphere_count,
            sector_size,
        }
    }

    /// Number of sphere slots
    pub fn sphere_count(&self) -> u8 {
        self.sphere_count
    }

    /// Sector holding sphere 0
    pub fn base_sector(&self) -> u32 {
        self.base_sector
    }

    /// Erase sector size in bytes
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Clamp an index to the last valid sphere
    pub fn clamp_index(&self, index: u8) -> u8 {
        index.min(self.sphere_count.saturating_sub(1))
    }

    /// Flash sector holding a sphere
    pub fn sector(&self, index: u8) -> u32 {
        self.base_sector
            .saturating_add(u32::from(self.clamp_index(index)))
    }

    /// Base address of a sphere's sector
    pub fn sphere_address(&self, index: u8) -> u32 {
        self.sector(index).saturating_mul(self.sector_size)
    }

    /// Address of a waveform's samples
    pub fn waveform_address(&self, index: u8, x: i16, y: i16, z: i16) -> u32 {
        self.sphere_address(index)
            .saturating_add(waveform_offset(x, y, z))
    }
}
