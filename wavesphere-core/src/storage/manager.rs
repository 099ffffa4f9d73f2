//! Sphere storage manager

use embedded_storage::nor_flash::NorFlash;
use wavesphere_hal::RealtimeIrq;

use super::{IrqPause, StorageError};
use crate::config::{ConfigError, StorageConfig};
use crate::layout::{SphereLayout, PAYLOAD_BYTES, SIGNATURE_LEN, SPHERE_BYTES};
use crate::sphere::{Signature, SphereType, SphereTypeCache, Waveform, CLEARED_SIGNATURE};

/// Wavetable sphere storage on external flash
///
/// Construct once at startup, then call [`SphereStorage::startup`] (or
/// [`SphereStorage::classify_all`]) before trusting any of the cached
/// predicates.
pub struct SphereStorage<F, I> {
    pub(super) flash: F,
    pub(super) irq: I,
    pub(super) layout: SphereLayout,
    pub(super) cache: SphereTypeCache,
}

impl<F: NorFlash, I: RealtimeIrq> SphereStorage<F, I> {
    /// Create a storage manager
    ///
    /// Fails if the configured sphere region does not fit the device, if
    /// a sphere does not fit one erase sector, or if the device cannot
    /// address the 4-byte aligned signature and payload fields. The type
    /// cache starts out all empty.
    pub fn new(flash: F, irq: I, config: StorageConfig) -> Result<Self, ConfigError> {
        if F::ERASE_SIZE < SPHERE_BYTES {
            return Err(ConfigError::SectorTooSmall);
        }

        if SIGNATURE_LEN % F::READ_SIZE != 0 || SIGNATURE_LEN % F::WRITE_SIZE != 0 {
            return Err(ConfigError::Unaligned);
        }

        let device_sectors = u32::try_from(flash.capacity() / F::ERASE_SIZE).unwrap_or(u32::MAX);
        config.validate(device_sectors)?;

        Ok(Self {
            flash,
            irq,
            layout: SphereLayout::new(&config, F::ERASE_SIZE as u32),
            cache: SphereTypeCache::new(config.sphere_count),
        })
    }

    /// Address layout in use
    pub fn layout(&self) -> &SphereLayout {
        &self.layout
    }

    /// Sphere type cache
    pub fn cache(&self) -> &SphereTypeCache {
        &self.cache
    }

    /// Get access to the underlying flash
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Give back the flash and interrupt control
    pub fn release(self) -> (F, I) {
        (self.flash, self.irq)
    }

    /// Base flash address of a sphere, index clamped
    pub fn sphere_address(&self, index: u8) -> u32 {
        self.layout.sphere_address(index)
    }

    /// Read a sphere's signature from flash and classify it
    ///
    /// Does not touch the cache.
    pub fn classify(&mut self, index: u8) -> Result<SphereType, StorageError<F::Error>> {
        let address = self.sphere_address(index);
        let mut signature: Signature = [0; SIGNATURE_LEN];

        {
            let _pause = IrqPause::new(&mut self.irq);
            self.flash
                .read(address, &mut signature)
                .map_err(StorageError::Flash)?;
        }

        Ok(SphereType::from_signature(&signature))
    }

    /// Classify every sphere and overwrite the cache with the results
    pub fn classify_all(&mut self) -> Result<(), StorageError<F::Error>> {
        for index in 0..self.layout.sphere_count() {
            let sphere_type = self.classify(index)?;
            self.cache.set(index, sphere_type);
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Sphere scan: {} factory, {} user, {} empty",
            self.cache.count(SphereType::Factory),
            self.cache.count(SphereType::User),
            self.cache.count(SphereType::Empty)
        );

        Ok(())
    }

    /// Cached type of a sphere
    pub fn sphere_type(&self, index: u8) -> SphereType {
        self.cache.get(index)
    }

    /// Check if a sphere holds data of any provenance (cached)
    pub fn is_sphere_filled(&self, index: u8) -> bool {
        self.cache.is_sphere_filled(index)
    }

    /// Check if a sphere is a factory sphere (cached)
    pub fn is_spheretype_factory(&self, index: u8) -> bool {
        self.cache.is_spheretype_factory(index)
    }

    /// Check if a sphere was recorded by the user (cached)
    pub fn is_spheretype_user(&self, index: u8) -> bool {
        self.cache.is_spheretype_user(index)
    }

    /// Number of user spheres (cached)
    pub fn user_sphere_count(&self) -> usize {
        self.cache.count(SphereType::User)
    }

    /// Lowest empty sphere slot (cached)
    pub fn first_empty_slot(&self) -> Option<u8> {
        self.cache.first_empty()
    }

    /// Load one waveform of a sphere into `waveform`
    ///
    /// Index and coordinates are clamped. Issues exactly one flash read.
    ///
    /// # Context
    ///
    /// Call this only from the real-time interpolation interrupt. It does
    /// not pause anything; it relies on every other flash user pausing
    /// that interrupt first. Calling it from anywhere else while a save or
    /// clear may be running puts two transactions on the bus at once.
    pub fn load(
        &mut self,
        index: u8,
        waveform: &mut Waveform,
        x: i16,
        y: i16,
        z: i16,
    ) -> Result<(), StorageError<F::Error>> {
        let address = self.layout.waveform_address(index, x, y, z);
        self.flash
            .read(address, waveform.as_mut_bytes())
            .map_err(StorageError::Flash)
    }

    /// Erase a sphere's sector and write a new signature and payload
    ///
    /// `sphere_type` must be [`SphereType::User`] or
    /// [`SphereType::Factory`]. Saving as [`SphereType::Empty`] is ignored:
    /// nothing is paused, written or cached. The payload must be exactly
    /// [`PAYLOAD_BYTES`] long.
    ///
    /// The cache follows each completed step, so after a failure it holds
    /// whatever the sphere's signature on flash now says.
    pub fn save(
        &mut self,
        index: u8,
        sphere_type: SphereType,
        payload: &[u8],
    ) -> Result<(), StorageError<F::Error>> {
        let Some(signature) = sphere_type.signature() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ignoring save of sphere {} as {}", index, sphere_type);
            return Ok(());
        };

        if payload.len() != PAYLOAD_BYTES {
            return Err(StorageError::PayloadSize {
                expected: PAYLOAD_BYTES,
                actual: payload.len(),
            });
        }

        let index = self.layout.clamp_index(index);
        let address = self.sphere_address(index);

        {
            let _pause = IrqPause::new(&mut self.irq);
            self.flash
                .erase(address, address + F::ERASE_SIZE as u32)
                .map_err(StorageError::Flash)?;
            // Erased flash reads 0xFF, which is no signature
            self.cache.set(index, SphereType::Empty);

            self.flash
                .write(address, signature)
                .map_err(StorageError::Flash)?;
            self.cache.set(index, sphere_type);

            self.flash
                .write(address + SIGNATURE_LEN as u32, payload)
                .map_err(StorageError::Flash)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Saved sphere {} as {}", index, sphere_type);

        Ok(())
    }

    /// Mark a single sphere empty by zeroing its signature
    ///
    /// The payload is left in place; only the tag is destroyed. Works on
    /// spheres of any provenance.
    pub fn clear_sphere(&mut self, index: u8) -> Result<(), StorageError<F::Error>> {
        let index = self.layout.clamp_index(index);
        let address = self.sphere_address(index);

        {
            let _pause = IrqPause::new(&mut self.irq);
            self.flash
                .write(address, &CLEARED_SIGNATURE)
                .map_err(StorageError::Flash)?;
        }

        self.cache.set(index, SphereType::Empty);

        #[cfg(feature = "defmt")]
        defmt::debug!("Cleared sphere {}", index);

        Ok(())
    }
}
