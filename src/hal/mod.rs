//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `system`: Desktop wall clock backed by the OS (requires `std` feature)
//! - `esp32`: ESP32-C3 SuperMini with BTS7960 motor driver (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod system;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "std")]
pub use system::SystemWallClock;

#[cfg(feature = "esp32")]
pub use esp32::*;
