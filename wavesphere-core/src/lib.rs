//! Board-agnostic wavetable sphere storage
//!
//! A sphere is a 3×3×3 cube of waveforms occupying one sector of an
//! external serial NOR flash. This crate owns everything between the
//! synthesizer and the flash driver:
//!
//! - On-flash layout and address arithmetic
//! - Sphere signatures (user, factory, empty) and the type cache
//! - Real-time waveform loads for the interpolation interrupt
//! - Saving, clearing and factory provisioning, serialized against that
//!   interrupt by pausing it
//! - Storage configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod layout;
pub mod sphere;
pub mod storage;

pub use config::{ConfigError, StorageConfig};
pub use sphere::{SpherePayload, SphereType, Waveform};
pub use storage::{SphereStorage, StorageError};
