//! Whole-region operations: factory provisioning, user sphere reset and
//! startup classification

use embedded_storage::nor_flash::NorFlash;
use wavesphere_hal::RealtimeIrq;

use super::{IrqPause, SphereStorage, StorageError};
use crate::layout::SIGNATURE_LEN;
use crate::sphere::{Signature, SphereType, CLEARED_SIGNATURE, USER_SIGNATURE};

impl<F: NorFlash, I: RealtimeIrq> SphereStorage<F, I> {
    /// Write the factory sphere table, entry `n` to sphere `n`
    ///
    /// Each sphere is saved separately, pausing the interrupt per sector.
    /// Entries past the last sphere slot are ignored. Returns the number
    /// of spheres written; always 0 when built without the
    /// `factory-spheres` feature.
    pub fn write_factory_spheres(
        &mut self,
        spheres: &[&[u8]],
    ) -> Result<usize, StorageError<F::Error>> {
        if !cfg!(feature = "factory-spheres") {
            #[cfg(feature = "defmt")]
            defmt::info!("Factory spheres not built in, skipping provisioning");
            return Ok(0);
        }

        let count = spheres.len().min(usize::from(self.layout.sphere_count()));
        for (index, payload) in spheres.iter().take(count).enumerate() {
            self.save(index as u8, SphereType::Factory, payload)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Wrote {} factory spheres", count);

        Ok(count)
    }

    /// Clear every user sphere's signature
    ///
    /// A sphere is cleared if either the cache or its on-flash signature
    /// says it is a user sphere, so a stale cache cannot hide one. Factory
    /// spheres are left alone. The interrupt is paused once for the whole
    /// sweep. Returns the number of spheres cleared.
    pub fn clear_user_spheres(&mut self) -> Result<usize, StorageError<F::Error>> {
        let mut cleared = 0;

        {
            let _pause = IrqPause::new(&mut self.irq);

            for index in 0..self.layout.sphere_count() {
                let address = self.layout.sphere_address(index);
                let mut signature: Signature = [0; SIGNATURE_LEN];
                self.flash
                    .read(address, &mut signature)
                    .map_err(StorageError::Flash)?;

                if self.cache.is_spheretype_user(index) || signature == USER_SIGNATURE {
                    self.flash
                        .write(address, &CLEARED_SIGNATURE)
                        .map_err(StorageError::Flash)?;
                    self.cache.set(index, SphereType::Empty);
                    cleared += 1;
                }
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Cleared {} user spheres", cleared);

        Ok(cleared)
    }

    /// Check on flash (not the cache) whether sphere 0 is a factory sphere
    pub fn factory_sphere0_present(&mut self) -> Result<bool, StorageError<F::Error>> {
        Ok(self.classify(0)? == SphereType::Factory)
    }

    /// Populate the cache from flash and report whether factory content is
    /// present
    ///
    /// Returns `false` when sphere 0 is not a factory sphere, meaning the
    /// factory table should be (re)provisioned.
    pub fn startup(&mut self) -> Result<bool, StorageError<F::Error>> {
        self.classify_all()?;
        let present = self.factory_sphere0_present()?;

        if !present {
            #[cfg(feature = "defmt")]
            defmt::warn!("Factory sphere 0 missing");
        }

        Ok(present)
    }
}
