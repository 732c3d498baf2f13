//! Hardware abstraction traits for motor drive, sensor input, and clocks.
//!
//! This module defines the core hardware interfaces that allow rs-shuttle to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MotorController`] | Dual-channel PWM DC motor drive |
//! | [`SensorInput`] | Snapshot of the seven track position sensors |
//! | [`Clock`] | Monotonic time source for ramp and timeout timing |
//! | [`WallClock`] | Time-of-day source for the operating schedule |
//! | [`ConfigStore`] | Byte-addressed persistent storage (EEPROM/NVS) |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::traits::{MotorController, Direction};
//! use rs_shuttle::hal::MockMotor;
//!
//! let mut motor = MockMotor::new();
//! motor.set_drive(Direction::Right, 128).unwrap();
//!
//! assert_eq!(motor.right_duty, 128);
//! assert_eq!(motor.left_duty, 0);
//! ```

use crate::sensors::SensorSnapshot;

/// Direction of train travel along the line.
///
/// The line runs between a left and a right terminus, so travel direction
/// is expressed as left-bound or right-bound. For the dual-channel motor
/// output this selects which magnitude channel carries the duty; the other
/// channel is held at zero.
///
/// # Default
///
/// Defaults to [`Stopped`](Self::Stopped) for safety.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Moving toward the left terminus (station 0).
    Left,
    /// Moving toward the right terminus (station 2).
    Right,
    /// Not moving (both motor channels at zero).
    #[default]
    Stopped,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_shuttle::Direction;
    ///
    /// assert_eq!(Direction::Left.as_str(), "left");
    /// assert_eq!(Direction::Right.as_str(), "right");
    /// assert_eq!(Direction::Stopped.as_str(), "stopped");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Stopped => "stopped",
        }
    }

    /// Returns the opposite travel direction.
    ///
    /// [`Stopped`](Self::Stopped) has no opposite and is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_shuttle::Direction;
    ///
    /// assert_eq!(Direction::Left.reversed(), Direction::Right);
    /// assert_eq!(Direction::Right.reversed(), Direction::Left);
    /// assert_eq!(Direction::Stopped.reversed(), Direction::Stopped);
    /// ```
    #[inline]
    pub const fn reversed(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Stopped => Direction::Stopped,
        }
    }
}

/// Motor controller trait - abstracts the dual-channel PWM motor drive.
///
/// The physical driver has two magnitude channels, one per travel
/// direction. At any instant exactly one channel carries a non-zero duty
/// while the other is held at zero; [`Direction::Stopped`] zeroes both.
///
/// # Implementation Notes
///
/// - Duty is an 8-bit value (0-255); scale to the hardware PWM resolution
/// - Channel switching must never leave both channels driven at once
/// - Implementations should be idempotent: re-applying the same pair is
///   harmless (the caller already suppresses redundant writes)
pub trait MotorController {
    /// Error type for motor operations.
    type Error;

    /// Apply a direction/duty pair to the output channels.
    ///
    /// `Direction::Left` drives the left-bound channel at `duty`,
    /// `Direction::Right` the right-bound channel; the opposite channel is
    /// zeroed. `Direction::Stopped` zeroes both regardless of `duty`.
    fn set_drive(&mut self, dir: Direction, duty: u8) -> Result<(), Self::Error>;

    /// Convenience method to cut all motor output.
    fn stop(&mut self) -> Result<(), Self::Error> {
        self.set_drive(Direction::Stopped, 0)
    }
}

/// Position sensor bank trait.
///
/// Abstracts the seven reed sensors along the line: one stop sensor per
/// station and four slow sensors (one flanking each terminus, two flanking
/// the middle station).
///
/// # Implementation Notes
///
/// - The physical lines are active-low; implementations invert so that
///   `true` in the snapshot means "magnet currently over the sensor"
/// - All seven lines must be read together; the control loop takes exactly
///   one snapshot per iteration and never re-reads mid-decision
/// - No debouncing is applied; sensors are instantaneous booleans
pub trait SensorInput {
    /// Error type for sensor operations.
    type Error;

    /// Read all seven sensor lines as a single instantaneous snapshot.
    fn sample(&mut self) -> Result<SensorSnapshot, Self::Error>;
}

/// Monotonic time source trait for `no_std` compatibility.
///
/// Provides microsecond-resolution time for ramp cadence and the runaway
/// timeout guards. On desktop this can wrap `std::time::Instant`; on
/// embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::traits::Clock;
/// use rs_shuttle::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_us(), 0);
///
/// clock.advance_us(1_500);
/// assert_eq!(clock.now_us(), 1_500);
/// assert_eq!(clock.now_ms(), 1);
/// ```
pub trait Clock {
    /// Returns current time in microseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_us(&self) -> u64;

    /// Returns current time in milliseconds since the same epoch.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

/// Time-of-day source trait for schedule evaluation.
///
/// The operating schedule and the quarter-hour departure discipline need
/// wall-clock time, which the monotonic [`Clock`] cannot provide. Backed
/// by an RTC chip on hardware or the system clock on desktop.
pub trait WallClock {
    /// Error type for clock operations.
    type Error;

    /// Returns the current time of day.
    fn now(&self) -> crate::schedule::ClockTime;

    /// Sets the time of day (operator "set clock" command).
    fn set(&mut self, time: crate::schedule::ClockTime) -> Result<(), Self::Error>;
}

/// Byte-addressed persistent storage trait (EEPROM/NVS style).
///
/// The configuration records (per-station wait times and the operating
/// schedule) live at fixed offsets behind a magic sentinel; see
/// [`crate::config`] for the layout.
///
/// # Implementation Notes
///
/// - Reads and writes are small (the whole record set is under 16 bytes)
/// - Implementations need not be wear-leveled; writes happen only on
///   operator configuration changes
pub trait ConfigStore {
    /// Error type for storage operations.
    type Error;

    /// Read `buf.len()` bytes starting at `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Self::Error>;
}
