//! # rs-shuttle
//!
//! An automated point-to-point shuttle controller for DC model train
//! layouts: one train, a single track, two termini, and an optional
//! middle station.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for motor drive, sensor input, clocks, and storage
//! - **Timetable operation**: Terminus departures on the quarter-hour, inside a daily window
//! - **Smooth motion**: Linear acceleration ramp, station approach deceleration, crawl-in stops
//! - **Fault recovery**: Missed-sensor timeouts force a stop and reverse the heading
//! - **Operator menu**: Non-blocking line-oriented menu for waits, schedule, and clock
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions
//! - `sensors` - Sensor snapshot type and station mapping
//! - `schedule` - Daily window and timetable gating
//! - `motion` - Speed ramp engine and motor output stage
//! - `automaton` - The motion state machine tying everything together
//! - `config` - Persisted configuration with sentinel guard
//! - `status` - Push-on-change operator status reporting
//! - `menu` - Explicitly stated operator menu session
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_shuttle::{
//!     ShuttleAutomaton, StepContext, Mode, Station,
//!     hal::MockMotor,
//!     schedule::ClockTime,
//!     sensors::SensorSnapshot,
//! };
//!
//! // Create the automaton with a mock motor
//! let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
//!
//! // The train sits on the left terminus stop sensor at power-on
//! shuttle.step(StepContext {
//!     snapshot: SensorSnapshot::with_stop(Station::LeftTerminus),
//!     wall: ClockTime::new(12, 0, 0),
//!     now_us: 0,
//!     depart_now: false,
//! }).unwrap();
//!
//! // Located and rolling
//! assert_eq!(shuttle.mode(), Mode::Accelerating);
//!
//! // Step once per control-loop iteration with fresh inputs
//! shuttle.step(StepContext {
//!     snapshot: SensorSnapshot::clear(),
//!     wall: ClockTime::new(12, 0, 0),
//!     now_us: 20_000,
//!     depart_now: false,
//! }).unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// The shuttle motion state machine.
pub mod automaton;
/// Persisted configuration (station waits and schedule) with sentinel guard.
pub mod config;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Line-oriented operator menu as an explicit state machine.
pub mod menu;
/// Speed ramp engine and motor output stage.
pub mod motion;
/// Daily operating schedule and timetable departure gating.
pub mod schedule;
/// Track position sensors: snapshot type and station mapping.
pub mod sensors;
/// Push-on-change operator status reporting.
pub mod status;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use automaton::{Mode, ShuttleAutomaton, StepContext, CREEP_MAX_US, RUN_MAX_US};
pub use config::PersistedConfig;
pub use menu::{MenuEffect, MenuOutcome, MenuSession, MenuView};
pub use motion::MotionController;
pub use schedule::{ClockTime, Schedule};
pub use sensors::{MiddleSide, SensorSnapshot, Station};
pub use status::{StatusLine, StatusReporter};
pub use traits::{
    Clock, ConfigStore, Direction, MotorController, SensorInput, StatusDisplay, WallClock,
};
