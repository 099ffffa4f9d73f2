//! Storage errors

use embedded_storage::nor_flash::{NorFlashError, NorFlashErrorKind};

/// Errors from sphere storage operations
///
/// Clamping and classification never fail; only the flash driver and
/// malformed payloads produce errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError<E> {
    /// Flash driver failed
    Flash(E),
    /// Payload is not exactly one sphere long
    PayloadSize {
        /// Required length
        expected: usize,
        /// Length given
        actual: usize,
    },
}

impl<E: NorFlashError> StorageError<E> {
    /// Generic kind of a flash failure, if this is one
    pub fn flash_kind(&self) -> Option<NorFlashErrorKind> {
        match self {
            StorageError::Flash(e) => Some(e.kind()),
            StorageError::PayloadSize { .. } => None,
        }
    }
}
