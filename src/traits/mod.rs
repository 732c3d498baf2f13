//! Core traits for hardware abstraction.
//!
//! This module contains the trait seams that keep the shuttle automaton
//! testable on desktop and portable across hardware:
//!
//! - [`hardware`] - Motor drive, sensor bank, clocks, and config storage
//! - [`display`] - Operator-facing status surface
//!
//! # Organization
//!
//! | Module | Contents |
//! |--------|----------|
//! | `hardware` | [`MotorController`], [`SensorInput`], [`Clock`], [`WallClock`], [`ConfigStore`], [`Direction`] |
//! | `display` | [`StatusDisplay`] |

mod display;
mod hardware;

pub use display::StatusDisplay;
pub use hardware::{Clock, ConfigStore, Direction, MotorController, SensorInput, WallClock};
