//! Sphere storage manager
//!
//! [`SphereStorage`] owns the flash, the real-time interrupt control and
//! the sphere type cache. The flash bus only carries one transaction at a
//! time, and the interpolation interrupt reads from it without asking,
//! so every foreground access here runs with that interrupt paused.

mod bulk;
mod error;
mod guard;
mod manager;

pub use error::StorageError;
pub use guard::IrqPause;
pub use manager::SphereStorage;
