//! Serial flash drivers

pub mod s25fl127;

pub use s25fl127::{S25fl127, S25flError};
