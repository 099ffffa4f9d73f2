//! Configuration types
//!
//! Board-specific placement of the sphere region on the flash device.

pub mod storage;

pub use storage::*;
