//! Sphere type cache
//!
//! Remembers the last known type of every sphere so UI and preset code
//! can ask about a slot without touching the flash bus. Populated by a
//! full scan, then updated write-through by saves and clears.

use heapless::Vec;

use super::SphereType;
use crate::layout::MAX_TOTAL_SPHERES;

/// Last known type of every sphere slot
///
/// Indices are clamped to the last slot, matching the address layout.
#[derive(Debug, Clone)]
pub struct SphereTypeCache {
    types: Vec<SphereType, MAX_TOTAL_SPHERES>,
}

impl SphereTypeCache {
    /// Create a cache with `sphere_count` empty slots
    pub fn new(sphere_count: u8) -> Self {
        let len = usize::from(sphere_count).min(MAX_TOTAL_SPHERES);
        Self {
            types: core::iter::repeat(SphereType::Empty).take(len).collect(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the cache has no slots
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn slot(&self, index: u8) -> usize {
        usize::from(index).min(self.types.len().saturating_sub(1))
    }

    /// Cached type of a sphere
    pub fn get(&self, index: u8) -> SphereType {
        self.types
            .get(self.slot(index))
            .copied()
            .unwrap_or_default()
    }

    /// Record the type of a sphere
    pub fn set(&mut self, index: u8, sphere_type: SphereType) {
        let slot = self.slot(index);
        if let Some(entry) = self.types.get_mut(slot) {
            *entry = sphere_type;
        }
    }

    /// Check if a sphere holds data of any provenance
    pub fn is_sphere_filled(&self, index: u8) -> bool {
        self.get(index).is_filled()
    }

    /// Check if a sphere is a factory sphere
    pub fn is_spheretype_factory(&self, index: u8) -> bool {
        self.get(index) == SphereType::Factory
    }

    /// Check if a sphere was recorded by the user
    pub fn is_spheretype_user(&self, index: u8) -> bool {
        self.get(index) == SphereType::User
    }

    /// Number of slots holding the given type
    pub fn count(&self, sphere_type: SphereType) -> usize {
        self.types.iter().filter(|&&t| t == sphere_type).count()
    }

    /// Lowest empty slot, if any
    pub fn first_empty(&self) -> Option<u8> {
        self.types
            .iter()
            .position(|&t| t == SphereType::Empty)
            .map(|slot| slot as u8)
    }

    /// Iterate over all slots in index order
    pub fn iter(&self) -> impl Iterator<Item = SphereType> + '_ {
        self.types.iter().copied()
    }
}
