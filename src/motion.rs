//! Speed ramp engine: acceleration/deceleration ticks and motor output.
//!
//! [`MotionController`] owns the commanded speed value and its ramp timing.
//! Acceleration is a linear ramp: a fixed fractional step added at a fixed
//! microsecond cadence, independent of the absolute speed. Deceleration
//! subtracts whole duty units at a mode-dependent cadence; approaches to
//! the middle station use a slower cadence for tighter platform stopping.
//!
//! The commanded speed is an `f32` duty accumulator so the fractional
//! acceleration step is exact; it is quantized to an 8-bit duty only at
//! the motor boundary. [`MotionController::apply`] writes a
//! (direction, duty) pair to the motor only when the pair actually
//! changed, so the motor driver sees no redundant writes.

use crate::traits::{Direction, MotorController};

/// Full speed: maximum commanded duty.
pub const MAX_SPEED: f32 = 255.0;

/// Crawl floor: the commanded speed never drops below this while the train
/// is moving.
pub const MIN_SPEED: f32 = 80.0;

/// Stationary hold duty: keeps coach lighting and accessories powered
/// without moving the train.
pub const IDLE_SPEED: f32 = 30.0;

/// Acceleration step in duty units per tick.
pub const ACCEL_STEP: f32 = 0.25;

/// Acceleration tick interval in microseconds.
pub const ACCEL_TICK_US: u64 = 20_000;

/// Deceleration step in duty units per tick.
pub const DECEL_STEP: f32 = 1.0;

/// Deceleration tick interval when approaching a terminus.
pub const DECEL_TICK_US: u64 = 50_000;

/// Deceleration tick interval when approaching the middle station.
///
/// Slower cadence than [`DECEL_TICK_US`]: the middle platform is stopped
/// on a flanking slow sensor rather than the stop sensor, so finer speed
/// control is wanted on the approach.
pub const DECEL_TICK_MIDDLE_US: u64 = 80_000;

/// Ramp engine and motor output stage.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::motion::{MotionController, ACCEL_TICK_US, IDLE_SPEED};
///
/// let mut motion = MotionController::new();
/// motion.hold_idle();
/// assert_eq!(motion.speed(), IDLE_SPEED);
///
/// motion.begin_ramp(0);
/// motion.accel_tick(ACCEL_TICK_US);
/// assert_eq!(motion.speed(), IDLE_SPEED + 0.25);
/// ```
#[derive(Clone, Debug)]
pub struct MotionController {
    /// Commanded speed in duty units, clamped to `[0, MAX_SPEED]`.
    speed: f32,
    /// Time of the last ramp step.
    last_tick_us: u64,
    /// Last (direction, duty) pair written to the motor.
    last_drive: Option<(Direction, u8)>,
}

impl MotionController {
    /// Creates a motion controller at zero speed.
    pub fn new() -> Self {
        Self {
            speed: 0.0,
            last_tick_us: 0,
            last_drive: None,
        }
    }

    /// Current commanded speed in duty units.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current commanded speed quantized to an 8-bit duty.
    #[inline]
    pub fn duty(&self) -> u8 {
        self.speed.clamp(0.0, MAX_SPEED) as u8
    }

    /// Resets the ramp tick reference. Call when entering an accelerating
    /// or decelerating state so the first step lands one full interval in.
    pub fn begin_ramp(&mut self, now_us: u64) {
        self.last_tick_us = now_us;
    }

    /// Advances the acceleration ramp.
    ///
    /// Adds [`ACCEL_STEP`] once per elapsed [`ACCEL_TICK_US`] interval,
    /// clamped at [`MAX_SPEED`]. Returns true once full speed is reached.
    pub fn accel_tick(&mut self, now_us: u64) -> bool {
        if now_us.saturating_sub(self.last_tick_us) >= ACCEL_TICK_US {
            self.last_tick_us = now_us;
            self.speed = (self.speed + ACCEL_STEP).min(MAX_SPEED);
        }
        self.speed >= MAX_SPEED
    }

    /// Advances the deceleration ramp.
    ///
    /// Subtracts [`DECEL_STEP`] once per elapsed interval, floored at
    /// [`MIN_SPEED`] (the train keeps crawling rather than stalling short
    /// of the platform). The floor works both ways: a ramp entered while
    /// still below [`MIN_SPEED`] (a slow sensor right after departure)
    /// comes up to the crawl floor on its first tick instead of leaving
    /// the train stranded at near-zero duty. The interval is
    /// [`DECEL_TICK_MIDDLE_US`] when `middle_target` is set,
    /// [`DECEL_TICK_US`] otherwise. Returns true once the ramp sits at
    /// the crawl floor.
    pub fn decel_tick(&mut self, now_us: u64, middle_target: bool) -> bool {
        let interval = if middle_target {
            DECEL_TICK_MIDDLE_US
        } else {
            DECEL_TICK_US
        };
        if now_us.saturating_sub(self.last_tick_us) >= interval {
            self.last_tick_us = now_us;
            self.speed = if self.speed < MIN_SPEED {
                MIN_SPEED
            } else {
                (self.speed - DECEL_STEP).max(MIN_SPEED)
            };
        }
        self.speed == MIN_SPEED
    }

    /// Drops the commanded speed to the stationary hold duty.
    pub fn hold_idle(&mut self) {
        self.speed = IDLE_SPEED;
    }

    /// Cuts the commanded speed to zero (sleeping, unpowered track).
    pub fn cut_power(&mut self) {
        self.speed = 0.0;
    }

    /// Writes the current (direction, duty) pair to the motor.
    ///
    /// The write is suppressed when the pair is unchanged since the last
    /// call, so per-iteration invocation is cheap. `Direction::Stopped`
    /// always writes duty 0.
    pub fn apply<M: MotorController>(
        &mut self,
        motor: &mut M,
        dir: Direction,
    ) -> Result<(), M::Error> {
        let duty = match dir {
            Direction::Stopped => 0,
            _ => self.duty(),
        };
        let pair = (dir, duty);
        if self.last_drive == Some(pair) {
            return Ok(());
        }
        motor.set_drive(dir, duty)?;
        self.last_drive = Some(pair);
        Ok(())
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new()
    }
}
