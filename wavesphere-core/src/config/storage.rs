//! Sphere region configuration

use crate::layout::MAX_TOTAL_SPHERES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First flash sector reserved for sphere storage by default
///
/// Sectors below this hold presets and system data.
pub const DEFAULT_BASE_SECTOR: u32 = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sphere count is zero
    NoSpheres,
    /// Sphere count exceeds the compiled-in capacity
    TooManySpheres,
    /// Sphere region runs past the end of the flash device
    ExceedsDevice,
    /// Flash erase sector cannot hold a whole sphere
    SectorTooSmall,
    /// Flash read or write granularity does not divide the 4-byte field alignment
    Unaligned,
}

/// Placement of the sphere region on flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StorageConfig {
    /// Sector holding sphere 0
    pub base_sector: u32,
    /// Number of sphere slots, one sector each
    pub sphere_count: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_sector: DEFAULT_BASE_SECTOR,
            sphere_count: MAX_TOTAL_SPHERES as u8,
        }
    }
}

impl StorageConfig {
    /// Check the configuration against a device with `device_sectors` sectors
    pub fn validate(&self, device_sectors: u32) -> Result<(), ConfigError> {
        if self.sphere_count == 0 {
            return Err(ConfigError::NoSpheres);
        }

        if usize::from(self.sphere_count) > MAX_TOTAL_SPHERES {
            return Err(ConfigError::TooManySpheres);
        }

        match self.base_sector.checked_add(u32::from(self.sphere_count)) {
            Some(end) if end <= device_sectors => Ok(()),
            _ => Err(ConfigError::ExceedsDevice),
        }
    }
}
