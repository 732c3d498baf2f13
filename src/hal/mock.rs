//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without a layout.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockMotor`] | [`MotorController`] | Tracks per-channel duty writes |
//! | [`MockSensors`] | [`SensorInput`] | Queued sensor snapshots |
//! | [`MockClock`] | [`Clock`] | Controllable monotonic time source |
//! | [`MockWallClock`] | [`WallClock`] | Settable time of day |
//! | [`MockStore`] | [`ConfigStore`] | In-memory byte storage |
//! | [`MockDisplay`] | [`StatusDisplay`] | Captures pushed status lines |
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::{ShuttleAutomaton, StepContext, Mode, Station};
//! use rs_shuttle::hal::MockMotor;
//! use rs_shuttle::schedule::ClockTime;
//! use rs_shuttle::sensors::SensorSnapshot;
//!
//! // Create an automaton with a mock motor
//! let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
//!
//! let ctx = StepContext {
//!     snapshot: SensorSnapshot::with_stop(Station::LeftTerminus),
//!     wall: ClockTime::new(12, 0, 0),
//!     now_us: 0,
//!     depart_now: false,
//! };
//! shuttle.step(ctx).unwrap();
//!
//! // Verify via the mock's public fields
//! assert_eq!(shuttle.mode(), Mode::Accelerating);
//! assert_eq!(shuttle.motor().left_duty, 0);
//! ```
//!
//! [`MotorController`]: crate::traits::MotorController
//! [`SensorInput`]: crate::traits::SensorInput
//! [`Clock`]: crate::traits::Clock
//! [`WallClock`]: crate::traits::WallClock
//! [`ConfigStore`]: crate::traits::ConfigStore
//! [`StatusDisplay`]: crate::traits::StatusDisplay

use alloc::string::String;
use alloc::vec::Vec;

use crate::schedule::ClockTime;
use crate::sensors::SensorSnapshot;
use crate::traits::{
    Clock, ConfigStore, Direction, MotorController, SensorInput, StatusDisplay, WallClock,
};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock motor controller for testing.
///
/// Records the duty on each output channel and counts writes, so tests can
/// verify both channel exclusivity and write suppression.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::hal::MockMotor;
/// use rs_shuttle::traits::{MotorController, Direction};
///
/// let mut motor = MockMotor::new();
/// motor.set_drive(Direction::Right, 128).unwrap();
///
/// assert_eq!(motor.right_duty, 128);
/// assert_eq!(motor.left_duty, 0);
/// assert_eq!(motor.write_count, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockMotor {
    /// Duty currently applied to the left-bound channel.
    pub left_duty: u8,
    /// Duty currently applied to the right-bound channel.
    pub right_duty: u8,
    /// Last direction written.
    pub last_dir: Direction,
    /// Number of times `set_drive` was called.
    pub write_count: usize,
}

impl MockMotor {
    /// Creates a new mock motor with both channels at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorController for MockMotor {
    type Error = ();

    fn set_drive(&mut self, dir: Direction, duty: u8) -> Result<(), ()> {
        match dir {
            Direction::Left => {
                self.left_duty = duty;
                self.right_duty = 0;
            }
            Direction::Right => {
                self.right_duty = duty;
                self.left_duty = 0;
            }
            Direction::Stopped => {
                self.left_duty = 0;
                self.right_duty = 0;
            }
        }
        self.last_dir = dir;
        self.write_count += 1;
        Ok(())
    }
}

/// Mock sensor bank for testing.
///
/// Queue snapshots to simulate the train moving over sensors; when the
/// queue is empty, `sample()` returns a clear snapshot (open track).
///
/// # Example
///
/// ```rust
/// use rs_shuttle::hal::MockSensors;
/// use rs_shuttle::sensors::{SensorSnapshot, Station};
/// use rs_shuttle::traits::SensorInput;
///
/// let mut sensors = MockSensors::new();
/// sensors.queue_snapshot(SensorSnapshot::with_stop(Station::LeftTerminus));
///
/// // Snapshots come out in FIFO order
/// assert!(!sensors.sample().unwrap().is_clear());
/// assert!(sensors.sample().unwrap().is_clear()); // Empty: open track
/// ```
#[derive(Debug, Default)]
pub struct MockSensors {
    queue: Vec<SensorSnapshot>,
}

impl MockSensors {
    /// Creates a new mock sensor bank with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot to be returned by the next `sample()` call.
    pub fn queue_snapshot(&mut self, snapshot: SensorSnapshot) {
        self.queue.push(snapshot);
    }

    /// Queue multiple snapshots in sample order.
    pub fn queue_snapshots(&mut self, snapshots: &[SensorSnapshot]) {
        self.queue.extend_from_slice(snapshots);
    }
}

impl SensorInput for MockSensors {
    type Error = ();

    fn sample(&mut self) -> Result<SensorSnapshot, ()> {
        if self.queue.is_empty() {
            Ok(SensorSnapshot::clear())
        } else {
            Ok(self.queue.remove(0))
        }
    }
}

/// Mock monotonic clock for testing.
///
/// Provides a controllable microsecond time source for testing ramp and
/// timeout behavior.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::hal::MockClock;
/// use rs_shuttle::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_us(), 0);
///
/// clock.advance_us(1_500);
/// assert_eq!(clock.now_us(), 1_500);
/// assert_eq!(clock.now_ms(), 1);
/// ```
#[derive(Debug)]
pub struct MockClock {
    current_us: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0.
    pub fn new() -> Self {
        Self { current_us: 0 }
    }

    /// Sets the current time in microseconds.
    pub fn set_us(&mut self, us: u64) {
        self.current_us = us;
    }

    /// Advances the clock by the given duration.
    pub fn advance_us(&mut self, us: u64) {
        self.current_us += us;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.current_us
    }
}

/// Mock wall clock for testing schedule behavior.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::hal::MockWallClock;
/// use rs_shuttle::schedule::ClockTime;
/// use rs_shuttle::traits::WallClock;
///
/// let mut clock = MockWallClock::at(ClockTime::new(12, 0, 0));
/// clock.set(ClockTime::new(23, 30, 0)).unwrap();
/// assert_eq!(clock.now(), ClockTime::new(23, 30, 0));
/// assert_eq!(clock.set_count, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockWallClock {
    /// The time of day returned by `now()`.
    pub time: ClockTime,
    /// Number of times `set` was called.
    pub set_count: usize,
}

impl MockWallClock {
    /// Creates a mock wall clock at midnight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock wall clock at the given time.
    pub fn at(time: ClockTime) -> Self {
        Self { time, set_count: 0 }
    }
}

impl WallClock for MockWallClock {
    type Error = ();

    fn now(&self) -> ClockTime {
        self.time
    }

    fn set(&mut self, time: ClockTime) -> Result<(), ()> {
        self.time = time;
        self.set_count += 1;
        Ok(())
    }
}

/// Mock byte store for testing configuration persistence.
///
/// A fixed 64-byte in-memory image, zeroed on creation (so a fresh store
/// looks like blank EEPROM). Out-of-range access is an error.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::hal::MockStore;
/// use rs_shuttle::traits::ConfigStore;
///
/// let mut store = MockStore::new();
/// store.write(4, &[0xAB, 0xCD]).unwrap();
///
/// let mut buf = [0u8; 2];
/// store.read(4, &mut buf).unwrap();
/// assert_eq!(buf, [0xAB, 0xCD]);
/// assert_eq!(store.write_count, 1);
/// ```
#[derive(Debug)]
pub struct MockStore {
    /// The backing bytes.
    pub bytes: [u8; 64],
    /// Number of times `write` was called.
    pub write_count: usize,
}

impl MockStore {
    /// Creates a zeroed mock store.
    pub fn new() -> Self {
        Self {
            bytes: [0; 64],
            write_count: 0,
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MockStore {
    type Error = ();

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), ()> {
        let end = offset.checked_add(buf.len()).ok_or(())?;
        if end > self.bytes.len() {
            return Err(());
        }
        buf.copy_from_slice(&self.bytes[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), ()> {
        let end = offset.checked_add(data.len()).ok_or(())?;
        if end > self.bytes.len() {
            return Err(());
        }
        self.bytes[offset..end].copy_from_slice(data);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Display Mocks
// ============================================================================

/// Mock display for testing the status surface.
///
/// Captures every pushed status line and message for verification.
///
/// # Example
///
/// ```
/// use rs_shuttle::hal::MockDisplay;
/// use rs_shuttle::traits::StatusDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// display.show_status("RUN S1 right 255").unwrap();
///
/// assert_eq!(display.status_lines.len(), 1);
/// assert_eq!(display.status_lines[0], "RUN S1 right 255");
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Every status line pushed, in order.
    pub status_lines: Vec<String>,
    /// Last message shown via `show_message()`.
    pub last_message: Option<(String, Option<String>)>,
    /// Whether `init()` was called.
    pub initialized: bool,
    /// Number of times `clear()` was called.
    pub clear_count: usize,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.clear_count += 1;
        Ok(())
    }

    fn show_status(&mut self, line: &str) -> Result<(), ()> {
        self.status_lines.push(line.into());
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
        self.last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
