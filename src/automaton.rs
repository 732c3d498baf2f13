//! The shuttle motion state machine.
//!
//! This module provides [`ShuttleAutomaton`], the central component that
//! fuses sensor snapshots, elapsed-time guards, and the daily operating
//! schedule into acceleration, station stopping, and fault recovery.
//!
//! # Overview
//!
//! The automaton:
//! - Owns the motor, the ramp engine, and all mutable train state
//! - Advances exactly one state-machine step per control-loop iteration
//! - Locates the train at power-on and re-locates after every wake
//! - Applies the timetable discipline (quarter-hour terminus departures)
//! - Recovers from missed sensors with timeout-based emergency stops
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::{ShuttleAutomaton, StepContext, Mode, Station, Direction};
//! use rs_shuttle::hal::MockMotor;
//! use rs_shuttle::schedule::ClockTime;
//! use rs_shuttle::sensors::SensorSnapshot;
//!
//! let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
//! assert_eq!(shuttle.mode(), Mode::Locating);
//!
//! // The train is sitting on the left terminus stop sensor
//! let ctx = StepContext {
//!     snapshot: SensorSnapshot::with_stop(Station::LeftTerminus),
//!     wall: ClockTime::new(12, 0, 0),
//!     now_us: 0,
//!     depart_now: false,
//! };
//! shuttle.step(ctx).unwrap();
//!
//! assert_eq!(shuttle.mode(), Mode::Accelerating);
//! assert_eq!(shuttle.station(), Some(Station::LeftTerminus));
//! assert_eq!(shuttle.heading(), Direction::Right);
//! ```
//!
//! # Fault Recovery
//!
//! Two timeout guards cover missed sensors: a train at full speed that
//! sees no sensor within [`RUN_MAX_US`] and a crawling train that sees no
//! stop condition within [`CREEP_MAX_US`] are both forced to a stop with
//! the heading reversed, so the train never grinds against an end stop.
//! An un-locatable train at startup is not a fault the software can fix:
//! [`Mode::Locating`] re-samples every iteration until a stop sensor
//! appears and asks the operator to place the train by hand.

use crate::motion::MotionController;
use crate::schedule::{ClockTime, Schedule};
use crate::sensors::{MiddleSide, SensorSnapshot, Station};
use crate::status::StatusLine;
use crate::traits::{Direction, MotorController};

/// Runaway guard for [`Mode::Running`]: a full-speed train must see a
/// slow or stop sensor within this window.
pub const RUN_MAX_US: u64 = 30_000_000;

/// Runaway guard for [`Mode::Creeping`]: a crawling train must reach a
/// stop condition within this window.
pub const CREEP_MAX_US: u64 = 15_000_000;

/// Operating mode of the shuttle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Outside the schedule window; track unpowered.
    Sleeping,
    /// Searching for the train after power-on or wake. Re-samples the
    /// stop sensors every iteration; leaves only when one is found.
    Locating,
    /// Ramping up toward full speed.
    Accelerating,
    /// At full speed between stations.
    Running,
    /// Ramping down toward the crawl floor on a station approach.
    Decelerating,
    /// Creeping at the crawl floor toward the platform.
    Creeping,
    /// Momentarily halted at a station; idle hold duty applied.
    Stopped,
    /// Dwelling at a station until its departure condition.
    Waiting,
}

impl Mode {
    /// Short display label for the status surface.
    pub const fn label(&self) -> &'static str {
        match self {
            Mode::Sleeping => "SLEEP",
            Mode::Locating => "LOCATE",
            Mode::Accelerating => "ACCEL",
            Mode::Running => "RUN",
            Mode::Decelerating => "DECEL",
            Mode::Creeping => "CREEP",
            Mode::Stopped => "STOP",
            Mode::Waiting => "WAIT",
        }
    }
}

/// All mutable train state, owned exclusively by the automaton.
#[derive(Clone, Copy, Debug)]
struct TrainState {
    mode: Mode,
    /// Current (or most recently confirmed) station. `None` only after
    /// power-on/wake before the train is located, or after an emergency
    /// stop at an unknown position.
    station: Option<Station>,
    heading: Direction,
    /// Time the current mode was entered; doubles as the dwell timer.
    state_entered_us: u64,
    /// Time full speed was reached; feeds the runaway guard.
    run_started_us: u64,
    /// Set when the last stop was a timeout-forced emergency stop that
    /// reversed the heading.
    emergency_reversed: bool,
}

/// Inputs for one control-loop iteration.
///
/// All sensor state comes from one instantaneous snapshot taken before
/// any transition decision, so a step never mixes sensor readings from
/// different moments.
#[derive(Clone, Copy, Debug)]
pub struct StepContext {
    /// The sensor snapshot for this iteration.
    pub snapshot: SensorSnapshot,
    /// Wall-clock time for schedule and timetable evaluation.
    pub wall: ClockTime,
    /// Monotonic time in microseconds.
    pub now_us: u64,
    /// Externally injected "depart now" command (menu), consulted once
    /// per iteration. Forces a departure from a dwell regardless of the
    /// schedule.
    pub depart_now: bool,
}

/// The shuttle motion state machine.
///
/// # Type Parameter
///
/// - `M`: The motor controller implementation ([`MotorController`] trait)
///
/// # Thread Safety
///
/// The automaton is single-threaded by design: one cooperative loop calls
/// [`step`](Self::step) once per iteration and nothing else mutates the
/// train state.
pub struct ShuttleAutomaton<M: MotorController> {
    motor: M,
    motion: MotionController,
    state: TrainState,
    wait_secs: [u16; 3],
    schedule: Schedule,
}

impl<M: MotorController> ShuttleAutomaton<M> {
    /// Creates an automaton in [`Mode::Locating`] with default
    /// configuration (10 s waits, 06:00-22:00 schedule).
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            motion: MotionController::new(),
            state: TrainState {
                mode: Mode::Locating,
                station: None,
                heading: Direction::Stopped,
                state_entered_us: 0,
                run_started_us: 0,
                emergency_reversed: false,
            },
            wait_secs: [crate::config::DEFAULT_WAIT_SECS; 3],
            schedule: Schedule::default(),
        }
    }

    /// Replaces the per-station wait times and schedule, typically from
    /// the persisted configuration at startup.
    pub fn with_config(mut self, wait_secs: [u16; 3], schedule: Schedule) -> Self {
        self.wait_secs = wait_secs;
        self.schedule = schedule;
        self
    }

    /// Advances the state machine by one iteration.
    ///
    /// Performs exactly one sensor evaluation, one transition decision,
    /// and one motor-command evaluation, in that order.
    pub fn step(&mut self, ctx: StepContext) -> Result<(), M::Error> {
        // External cancellation first: a "depart now" from the menu wins
        // over dwell timers and the schedule, but never over an unknown
        // position.
        if ctx.depart_now
            && matches!(self.state.mode, Mode::Waiting | Mode::Sleeping)
            && self.state.station.is_some()
        {
            self.enter_accelerating(ctx.now_us);
        }

        match self.state.mode {
            Mode::Sleeping => self.step_sleeping(&ctx),
            Mode::Locating => self.step_locating(&ctx),
            Mode::Accelerating => self.step_accelerating(&ctx),
            Mode::Running => self.step_running(&ctx),
            Mode::Decelerating => self.step_decelerating(&ctx),
            Mode::Creeping => self.step_creeping(&ctx),
            Mode::Stopped => self.step_stopped(&ctx),
            Mode::Waiting => self.step_waiting(&ctx),
        }

        // Single motor evaluation per iteration. The dwell states keep the
        // idle duty flowing on the (already flipped) heading channel so
        // coach lighting stays lit; unlocated states keep the track dead.
        let drive_dir = match self.state.mode {
            Mode::Sleeping | Mode::Locating => Direction::Stopped,
            _ => self.state.heading,
        };
        self.motion.apply(&mut self.motor, drive_dir)
    }

    // -------------------------------------------------------------------------
    // Per-mode steps
    // -------------------------------------------------------------------------

    fn step_sleeping(&mut self, ctx: &StepContext) {
        self.motion.cut_power();
        if self.schedule.is_operating_now(ctx.wall) {
            self.enter(Mode::Locating, ctx.now_us);
        }
    }

    fn step_locating(&mut self, ctx: &StepContext) {
        self.motion.cut_power();
        match ctx.snapshot.locate_stop() {
            Some(Station::LeftTerminus) => {
                self.state.station = Some(Station::LeftTerminus);
                self.state.heading = Direction::Right;
                self.enter_accelerating(ctx.now_us);
            }
            Some(station) => {
                self.state.station = Some(station);
                self.state.heading = Direction::Left;
                self.enter_accelerating(ctx.now_us);
            }
            // Un-located trains cannot be driven safely; stay here and
            // keep sampling until the operator places the train.
            None => {}
        }
    }

    fn step_accelerating(&mut self, ctx: &StepContext) {
        if let Some(station) = ctx.snapshot.locate_slow() {
            if Some(station) != self.state.station {
                self.state.station = Some(station);
                self.enter_decelerating(ctx.now_us);
                return;
            }
        }
        if let Some(station) = ctx.snapshot.locate_stop() {
            // A stop sensor before any slow sensor means the slow sensor
            // was missed; stop immediately. The middle stop sensor is
            // never a stop trigger (see step_decelerating).
            if station != Station::Middle && Some(station) != self.state.station {
                self.enter_stopped(station, ctx.now_us);
                return;
            }
        }
        if self.motion.accel_tick(ctx.now_us) {
            self.state.run_started_us = ctx.now_us;
            self.enter(Mode::Running, ctx.now_us);
        }
    }

    fn step_running(&mut self, ctx: &StepContext) {
        if ctx.now_us.saturating_sub(self.state.run_started_us) >= RUN_MAX_US {
            self.emergency_stop(ctx.now_us);
            return;
        }
        if let Some(station) = ctx.snapshot.locate_slow() {
            if Some(station) != self.state.station {
                self.state.station = Some(station);
                self.enter_decelerating(ctx.now_us);
                return;
            }
        }
        if let Some(station) = ctx.snapshot.locate_stop() {
            if station != Station::Middle && Some(station) != self.state.station {
                self.enter_stopped(station, ctx.now_us);
            }
        }
    }

    fn step_decelerating(&mut self, ctx: &StepContext) {
        if let Some(station) = self.arrival_station(&ctx.snapshot) {
            self.enter_stopped(station, ctx.now_us);
            return;
        }
        let middle_target = self.state.station == Some(Station::Middle);
        if self.motion.decel_tick(ctx.now_us, middle_target) {
            self.enter(Mode::Creeping, ctx.now_us);
        }
    }

    fn step_creeping(&mut self, ctx: &StepContext) {
        if ctx.now_us.saturating_sub(self.state.state_entered_us) >= CREEP_MAX_US {
            self.emergency_stop(ctx.now_us);
            return;
        }
        if let Some(station) = self.arrival_station(&ctx.snapshot) {
            self.enter_stopped(station, ctx.now_us);
        }
    }

    fn step_stopped(&mut self, ctx: &StepContext) {
        // Momentary state: immediately decide between sleeping and dwelling.
        let operating = self.schedule.is_operating_now(ctx.wall);
        if self.state.station == Some(Station::LeftTerminus) && !operating {
            self.enter_sleeping(ctx.now_us);
        } else {
            self.enter(Mode::Waiting, ctx.now_us);
        }
    }

    fn step_waiting(&mut self, ctx: &StepContext) {
        match self.state.station {
            Some(station) if station.is_terminus() => {
                if !self.schedule.is_operating_now(ctx.wall) {
                    self.enter_sleeping(ctx.now_us);
                } else if ctx.wall.is_departure_instant() {
                    self.enter_accelerating(ctx.now_us);
                }
            }
            // Middle station, or unknown position after an emergency stop:
            // dwell by the configured wait and move on toward a terminus.
            station => {
                let index = station
                    .map(|s| s.index())
                    .unwrap_or(Station::Middle.index());
                let wait_us = u64::from(self.wait_secs[index]) * 1_000_000;
                if ctx.now_us.saturating_sub(self.state.state_entered_us) >= wait_us {
                    self.enter_accelerating(ctx.now_us);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn enter(&mut self, mode: Mode, now_us: u64) {
        self.state.mode = mode;
        self.state.state_entered_us = now_us;
    }

    fn enter_accelerating(&mut self, now_us: u64) {
        self.state.emergency_reversed = false;
        self.motion.begin_ramp(now_us);
        self.enter(Mode::Accelerating, now_us);
    }

    fn enter_decelerating(&mut self, now_us: u64) {
        self.motion.begin_ramp(now_us);
        self.enter(Mode::Decelerating, now_us);
    }

    /// Normal arrival: confirm the station, flip the heading at a
    /// terminus, and drop to the idle hold duty.
    fn enter_stopped(&mut self, station: Station, now_us: u64) {
        self.state.station = Some(station);
        self.state.heading = match station {
            Station::LeftTerminus => Direction::Right,
            Station::RightTerminus => Direction::Left,
            Station::Middle => self.state.heading,
        };
        self.state.emergency_reversed = false;
        self.motion.hold_idle();
        self.enter(Mode::Stopped, now_us);
    }

    /// Timeout-forced stop: the expected sensor never fired, so the
    /// position is unknown. Reverse the heading (logical flip) so the
    /// next leg backs away from whatever end stop we were running toward.
    fn emergency_stop(&mut self, now_us: u64) {
        self.state.heading = self.state.heading.reversed();
        self.state.station = None;
        self.state.emergency_reversed = true;
        self.motion.hold_idle();
        self.enter(Mode::Stopped, now_us);
    }

    fn enter_sleeping(&mut self, now_us: u64) {
        self.motion.cut_power();
        self.enter(Mode::Sleeping, now_us);
    }

    /// Resolves the stop condition during an approach.
    ///
    /// Any non-middle stop sensor halts the train. The middle station's
    /// own stop sensor is deliberately ignored; instead the train stops on
    /// the middle slow sensor beyond the platform in the direction of
    /// travel, which aligns short trains with the platform center.
    fn arrival_station(&self, snapshot: &SensorSnapshot) -> Option<Station> {
        if let Some(station) = snapshot.locate_stop() {
            if station != Station::Middle {
                return Some(station);
            }
        }
        if self.state.station == Some(Station::Middle) {
            match (self.state.heading, snapshot.locate_middle_slow_side()) {
                (Direction::Left, Some(MiddleSide::Left))
                | (Direction::Right, Some(MiddleSide::Right)) => {
                    return Some(Station::Middle);
                }
                _ => {}
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Current (or most recently confirmed) station.
    pub fn station(&self) -> Option<Station> {
        self.state.station
    }

    /// Current travel heading.
    pub fn heading(&self) -> Direction {
        self.state.heading
    }

    /// Current commanded speed in duty units.
    pub fn speed(&self) -> f32 {
        self.motion.speed()
    }

    /// Whether the last stop was a timeout-forced emergency stop.
    pub fn emergency_reversed(&self) -> bool {
        self.state.emergency_reversed
    }

    /// The active schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Replaces the active schedule (menu edit).
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    /// Wait time in seconds for a station.
    pub fn wait_secs(&self, station: Station) -> u16 {
        self.wait_secs[station.index()]
    }

    /// Sets the wait time in seconds for a station (menu edit).
    pub fn set_wait_secs(&mut self, station: Station, secs: u16) {
        self.wait_secs[station.index()] = secs;
    }

    /// A display-worthy snapshot of the current state.
    pub fn status(&self) -> StatusLine {
        StatusLine {
            mode: self.state.mode,
            station: self.state.station,
            heading: self.state.heading,
            duty: self.motion.duty(),
        }
    }

    /// Access the underlying motor (mock inspection in tests).
    pub fn motor(&self) -> &M {
        &self.motor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockMotor;
    use crate::motion::{ACCEL_TICK_US, DECEL_TICK_US, IDLE_SPEED, MAX_SPEED, MIN_SPEED};
    use crate::sensors::{SLOW_CENTER_LEFT, SLOW_CENTER_RIGHT, SLOW_RIGHT};

    const NOON: ClockTime = ClockTime::new(12, 1, 30);

    fn ctx(snapshot: SensorSnapshot, now_us: u64) -> StepContext {
        StepContext {
            snapshot,
            wall: NOON,
            now_us,
            depart_now: false,
        }
    }

    fn located_at_left() -> ShuttleAutomaton<MockMotor> {
        let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::LeftTerminus), 0))
            .unwrap();
        shuttle
    }

    /// Runs acceleration ticks until the automaton reports full speed.
    fn run_to_full_speed(shuttle: &mut ShuttleAutomaton<MockMotor>, start_us: u64) -> u64 {
        let mut now = start_us;
        while shuttle.mode() == Mode::Accelerating {
            now += ACCEL_TICK_US;
            shuttle.step(ctx(SensorSnapshot::clear(), now)).unwrap();
        }
        now
    }

    // =========================================================================
    // Locating Tests
    // =========================================================================

    #[test]
    fn locate_on_left_terminus_heads_right() {
        let shuttle = located_at_left();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
        assert_eq!(shuttle.station(), Some(Station::LeftTerminus));
        assert_eq!(shuttle.heading(), Direction::Right);
    }

    #[test]
    fn locate_on_other_station_heads_left() {
        for station in [Station::Middle, Station::RightTerminus] {
            let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
            shuttle
                .step(ctx(SensorSnapshot::with_stop(station), 0))
                .unwrap();
            assert_eq!(shuttle.mode(), Mode::Accelerating);
            assert_eq!(shuttle.station(), Some(station));
            assert_eq!(shuttle.heading(), Direction::Left);
        }
    }

    #[test]
    fn locating_persists_until_a_sensor_appears() {
        let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
        for i in 0..1000 {
            shuttle
                .step(ctx(SensorSnapshot::clear(), i * ACCEL_TICK_US))
                .unwrap();
            assert_eq!(shuttle.mode(), Mode::Locating);
        }
        // Track stays unpowered the whole time
        assert_eq!(shuttle.motor().left_duty, 0);
        assert_eq!(shuttle.motor().right_duty, 0);
    }

    // =========================================================================
    // Acceleration Tests
    // =========================================================================

    #[test]
    fn accel_ramps_by_quarter_unit_per_tick() {
        let mut shuttle = located_at_left();
        let start = shuttle.speed();

        shuttle
            .step(ctx(SensorSnapshot::clear(), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.speed(), start + 0.25);
    }

    #[test]
    fn accel_reaches_running_at_max() {
        let mut shuttle = located_at_left();
        run_to_full_speed(&mut shuttle, 0);
        assert_eq!(shuttle.mode(), Mode::Running);
        assert_eq!(shuttle.speed(), MAX_SPEED);
    }

    #[test]
    fn departure_side_slow_sensor_is_ignored() {
        // Heading right out of the left terminus, the left slow sensor
        // announces the station we are leaving
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(crate::sensors::SLOW_LEFT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
    }

    #[test]
    fn slow_hit_during_accel_starts_deceleration() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_LEFT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);
        assert_eq!(shuttle.station(), Some(Station::Middle));
    }

    #[test]
    fn early_slow_hit_keeps_decelerating_then_crawls_at_floor() {
        // A slow sensor one tick after departure catches the train well
        // below the crawl floor; it must keep moving, not stall at
        // near-zero duty until the creep timeout
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_RIGHT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);

        // Still decelerating until the first decel tick fires
        shuttle
            .step(ctx(SensorSnapshot::clear(), ACCEL_TICK_US + 1_000))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);

        // The first tick raises the duty to the crawl floor
        shuttle
            .step(ctx(SensorSnapshot::clear(), ACCEL_TICK_US + DECEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Creeping);
        assert_eq!(shuttle.speed(), MIN_SPEED);
    }

    #[test]
    fn missed_slow_sensor_stop_hit_during_accel() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(
                SensorSnapshot::with_stop(Station::RightTerminus),
                ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);
        assert_eq!(shuttle.station(), Some(Station::RightTerminus));
        // Terminus arrival flips the heading for the next leg
        assert_eq!(shuttle.heading(), Direction::Left);
    }

    // =========================================================================
    // Runaway Guard Tests
    // =========================================================================

    #[test]
    fn running_timeout_fires_at_exact_boundary() {
        let mut shuttle = located_at_left();
        let entered_running = run_to_full_speed(&mut shuttle, 0);

        // One microsecond short: still running
        shuttle
            .step(ctx(SensorSnapshot::clear(), entered_running + RUN_MAX_US - 1))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Running);
        assert!(!shuttle.emergency_reversed());

        // Exactly at the boundary: emergency stop with reversal
        shuttle
            .step(ctx(SensorSnapshot::clear(), entered_running + RUN_MAX_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);
        assert!(shuttle.emergency_reversed());
        assert_eq!(shuttle.heading(), Direction::Left);
        assert_eq!(shuttle.station(), None);

        // The unknown-position stop resolves into a dwell, not a sleep
        shuttle
            .step(ctx(SensorSnapshot::clear(), entered_running + RUN_MAX_US + 1))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);
    }

    #[test]
    fn creep_timeout_forces_emergency_stop() {
        let mut shuttle = located_at_left();
        // Slow sensor for the right terminus puts us in Decelerating
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_RIGHT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);

        // Ride the decel ramp down to the crawl floor
        let mut now = ACCEL_TICK_US;
        while shuttle.mode() == Mode::Decelerating {
            now += DECEL_TICK_US;
            shuttle.step(ctx(SensorSnapshot::clear(), now)).unwrap();
        }
        assert_eq!(shuttle.mode(), Mode::Creeping);
        assert_eq!(shuttle.speed(), MIN_SPEED);
        let creep_started = now;

        shuttle
            .step(ctx(SensorSnapshot::clear(), creep_started + CREEP_MAX_US))
            .unwrap();
        assert!(shuttle.emergency_reversed());
        assert_eq!(shuttle.heading(), Direction::Left);
    }

    // =========================================================================
    // Middle Station Arrival Tests
    // =========================================================================

    #[test]
    fn middle_stop_sensor_is_ignored_for_stopping() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_LEFT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);

        // Passing over the middle stop sensor must not stop the train
        shuttle
            .step(ctx(
                SensorSnapshot::with_stop(Station::Middle),
                2 * ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);
    }

    #[test]
    fn middle_arrival_on_far_side_slow_sensor() {
        // Right-bound approach: near side is center-left, far side is
        // center-right
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_LEFT), ACCEL_TICK_US))
            .unwrap();

        shuttle
            .step(ctx(
                SensorSnapshot::with_slow(SLOW_CENTER_RIGHT),
                2 * ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);
        assert_eq!(shuttle.station(), Some(Station::Middle));
        // Heading is unchanged at the middle
        assert_eq!(shuttle.heading(), Direction::Right);
        assert_eq!(shuttle.speed(), IDLE_SPEED);
    }

    #[test]
    fn middle_near_side_slow_sensor_does_not_stop() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_LEFT), ACCEL_TICK_US))
            .unwrap();

        // The near-side sensor fires again (long magnet); still approaching
        shuttle
            .step(ctx(
                SensorSnapshot::with_slow(SLOW_CENTER_LEFT),
                2 * ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);
    }

    #[test]
    fn middle_arrival_left_bound_on_far_side_slow_sensor() {
        // Left-bound approach: near side is center-right, far side is
        // center-left
        let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 0))
            .unwrap();
        assert_eq!(shuttle.heading(), Direction::Left);

        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_RIGHT), ACCEL_TICK_US))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);
        assert_eq!(shuttle.station(), Some(Station::Middle));

        // The near-side sensor must not stop a left-bound train
        shuttle
            .step(ctx(
                SensorSnapshot::with_slow(SLOW_CENTER_RIGHT),
                2 * ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Decelerating);

        shuttle
            .step(ctx(
                SensorSnapshot::with_slow(SLOW_CENTER_LEFT),
                3 * ACCEL_TICK_US,
            ))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);
        assert_eq!(shuttle.station(), Some(Station::Middle));
        // Heading is unchanged at the middle
        assert_eq!(shuttle.heading(), Direction::Left);
        assert_eq!(shuttle.speed(), IDLE_SPEED);
    }

    // =========================================================================
    // Dwell and Departure Tests
    // =========================================================================

    #[test]
    fn middle_dwell_departs_after_wait() {
        let mut shuttle = located_at_left();
        shuttle.set_wait_secs(Station::Middle, 5);
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_LEFT), 1_000))
            .unwrap();
        shuttle
            .step(ctx(SensorSnapshot::with_slow(SLOW_CENTER_RIGHT), 2_000))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);

        // Stopped resolves to Waiting on the next step
        shuttle.step(ctx(SensorSnapshot::clear(), 3_000)).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        shuttle
            .step(ctx(SensorSnapshot::clear(), 3_000 + 4_999_999))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        shuttle
            .step(ctx(SensorSnapshot::clear(), 3_000 + 5_000_000))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
        assert_eq!(shuttle.heading(), Direction::Right);
    }

    #[test]
    fn terminus_departs_only_at_quarter_hour() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        shuttle.step(ctx(SensorSnapshot::clear(), 2_000)).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        // 12:16:00 is not a departure instant
        let mut c = ctx(SensorSnapshot::clear(), 3_000);
        c.wall = ClockTime::new(12, 16, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        // 12:30:00 is
        let mut c = ctx(SensorSnapshot::clear(), 4_000);
        c.wall = ClockTime::new(12, 30, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
        assert_eq!(shuttle.heading(), Direction::Left);
    }

    #[test]
    fn depart_now_overrides_dwell() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        shuttle.step(ctx(SensorSnapshot::clear(), 2_000)).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        let mut c = ctx(SensorSnapshot::clear(), 3_000);
        c.depart_now = true;
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
    }

    // =========================================================================
    // Schedule Gating Tests
    // =========================================================================

    #[test]
    fn schedule_off_at_left_terminus_sleeps() {
        // Run a leg to the right terminus and back while the schedule
        // goes off mid-journey
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        shuttle.step(ctx(SensorSnapshot::clear(), 2_000)).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        let mut c = ctx(SensorSnapshot::clear(), 3_000);
        c.depart_now = true;
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
        assert_eq!(shuttle.heading(), Direction::Left);

        // Arrive back at the left terminus after hours
        let mut c = ctx(SensorSnapshot::with_stop(Station::LeftTerminus), 4_000);
        c.wall = ClockTime::new(23, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);

        let mut c = ctx(SensorSnapshot::clear(), 5_000);
        c.wall = ClockTime::new(23, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Sleeping);
        assert_eq!(shuttle.speed(), 0.0);
    }

    #[test]
    fn sleeping_wakes_into_locating() {
        let mut shuttle = located_at_left();
        // Arrive at the right terminus, then dwell into the closed window
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        let mut c = ctx(SensorSnapshot::clear(), 2_000);
        c.wall = ClockTime::new(23, 0, 0);
        shuttle.step(c).unwrap();
        let mut c = ctx(SensorSnapshot::clear(), 3_000);
        c.wall = ClockTime::new(23, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Sleeping);

        // The window opens again the next morning
        let mut c = ctx(SensorSnapshot::clear(), 4_000);
        c.wall = ClockTime::new(6, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Locating);

        // Still sitting on the stop sensor: relocate and run
        let mut c = ctx(SensorSnapshot::with_stop(Station::RightTerminus), 5_000);
        c.wall = ClockTime::new(6, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
        assert_eq!(shuttle.heading(), Direction::Left);
    }

    #[test]
    fn power_on_after_hours_still_locates_and_runs() {
        // Gating happens at the terminus, not at power-on
        let mut shuttle = ShuttleAutomaton::new(MockMotor::new());
        let mut c = ctx(SensorSnapshot::with_stop(Station::RightTerminus), 0);
        c.wall = ClockTime::new(23, 30, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Accelerating);
    }

    #[test]
    fn schedule_off_mid_wait_at_terminus_sleeps() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        shuttle.step(ctx(SensorSnapshot::clear(), 2_000)).unwrap();
        assert_eq!(shuttle.mode(), Mode::Waiting);

        let mut c = ctx(SensorSnapshot::clear(), 3_000);
        c.wall = ClockTime::new(22, 0, 0);
        shuttle.step(c).unwrap();
        assert_eq!(shuttle.mode(), Mode::Sleeping);
    }

    // =========================================================================
    // Motor Output Tests
    // =========================================================================

    #[test]
    fn idle_hold_keeps_lighting_powered_at_station() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::with_stop(Station::RightTerminus), 1_000))
            .unwrap();
        assert_eq!(shuttle.mode(), Mode::Stopped);
        // Heading already flipped to Left; idle duty flows on that channel
        assert_eq!(shuttle.motor().left_duty, IDLE_SPEED as u8);
        assert_eq!(shuttle.motor().right_duty, 0);
    }

    #[test]
    fn exactly_one_channel_driven_while_moving() {
        let mut shuttle = located_at_left();
        shuttle
            .step(ctx(SensorSnapshot::clear(), ACCEL_TICK_US))
            .unwrap();
        assert!(shuttle.motor().right_duty > 0 || shuttle.motor().left_duty == 0);
        assert_eq!(shuttle.motor().left_duty, 0);
    }
}
