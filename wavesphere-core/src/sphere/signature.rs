//! Sphere signatures
//!
//! The first four bytes of a sphere's sector say where it came from. Only
//! an exact match counts; a half-written or garbled tag reads as empty.

use crate::layout::SIGNATURE_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw signature bytes
pub type Signature = [u8; SIGNATURE_LEN];

/// Signature of a user-recorded sphere
pub const USER_SIGNATURE: Signature = *b"US1\0";

/// Signature of a factory sphere
pub const FACTORY_SIGNATURE: Signature = *b"FS1\0";

/// Signature written over a cleared user sphere
pub const CLEARED_SIGNATURE: Signature = [0; SIGNATURE_LEN];

/// Sphere provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SphereType {
    /// Never written, cleared, or unrecognized signature
    #[default]
    Empty,
    /// Recorded by the user
    User,
    /// Shipped with the firmware
    Factory,
}

impl SphereType {
    /// Classify a signature read from flash
    pub fn from_signature(signature: &Signature) -> Self {
        if *signature == USER_SIGNATURE {
            SphereType::User
        } else if *signature == FACTORY_SIGNATURE {
            SphereType::Factory
        } else {
            SphereType::Empty
        }
    }

    /// Signature to write for this type
    ///
    /// `None` for [`SphereType::Empty`], which cannot be saved.
    pub fn signature(self) -> Option<&'static Signature> {
        match self {
            SphereType::User => Some(&USER_SIGNATURE),
            SphereType::Factory => Some(&FACTORY_SIGNATURE),
            SphereType::Empty => None,
        }
    }

    /// Check if a sphere of this type holds data
    pub fn is_filled(self) -> bool {
        self != SphereType::Empty
    }
}
