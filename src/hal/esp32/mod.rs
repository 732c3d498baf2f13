//! ESP32-C3 SuperMini hardware abstraction layer for the shuttle line.
//!
//! This module provides hardware implementations for the ESP32-C3 SuperMini
//! board driving a single-track shuttle via a BTS7960 motor driver and
//! reading seven reed sensors along the line.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Motor Driver**: BTS7960 (43A capacity)
//! - **Sensors**: 7 reed switches to ground, internal pull-ups (active low)
//!
//! # Pin Assignments
//!
//! The `esp32_main` binary wires the peripherals as follows:
//!
//! | GPIO | Function |
//! |------|----------|
//! | 2 | L_PWM on the BTS7960 (left-bound) |
//! | 3 | R_PWM on the BTS7960 (right-bound) |
//! | 4-6 | stop sensors, left terminus / middle / right terminus |
//! | 7-10 | slow sensors, left to right |

mod clock;
mod motor;
mod sensors;

pub use clock::Esp32Clock;
pub use motor::Esp32Motor;
pub use sensors::Esp32Sensors;
