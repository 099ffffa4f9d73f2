//! Wavesphere Hardware Abstraction Layer
//!
//! This crate defines the board capability the sphere storage core needs
//! beyond the flash itself. The flash is any blocking
//! `embedded_storage::nor_flash::NorFlash`; the S25FL127S driver lives in
//! `wavesphere-drivers`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  wavesphere-core (SphereStorage)        │
//! └─────────────────────────────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌───────────────────┐   ┌───────────────────┐
//! │ embedded-storage  │   │ wavesphere-hal    │
//! │ NorFlash          │   │ RealtimeIrq       │
//! └───────────────────┘   └───────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌───────────────────┐   ┌───────────────────┐
//! │  S25FL127S        │   │ interpolation     │
//! │  SPI flash        │   │  timer IRQ        │
//! └───────────────────┘   └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`irq::RealtimeIrq`] - Pause/resume of the real-time reader interrupt

#![no_std]
#![deny(unsafe_code)]

pub mod irq;

pub use irq::RealtimeIrq;
