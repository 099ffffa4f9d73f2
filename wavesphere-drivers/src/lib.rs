//! Hardware driver implementations
//!
//! This crate provides concrete storage devices for sphere storage,
//! implemented against the `embedded-storage` NOR flash traits:
//!
//! - Serial NOR flash (Spansion/Infineon S25FL127S over SPI)

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
