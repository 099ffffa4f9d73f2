//! Spheres: provenance signatures, type cache and waveform buffers

pub mod cache;
pub mod signature;
pub mod waveform;

pub use cache::SphereTypeCache;
pub use signature::{Signature, SphereType, CLEARED_SIGNATURE, FACTORY_SIGNATURE, USER_SIGNATURE};
pub use waveform::{SpherePayload, Waveform};
