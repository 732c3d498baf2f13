//! Daily operating schedule and timetable departure gating.
//!
//! The shuttle runs inside a single daily window (e.g. 06:00-22:00).
//! Outside the window the automaton sleeps with the track unpowered.
//! Terminus departures additionally follow a timetable discipline: the
//! train leaves a terminus only at a quarter-hour mark.
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::schedule::{ClockTime, Schedule};
//!
//! let schedule = Schedule::default(); // 06:00-22:00, enabled
//! assert!(schedule.is_operating_now(ClockTime::new(12, 0, 0)));
//! assert!(!schedule.is_operating_now(ClockTime::new(23, 0, 0)));
//! ```

/// A time of day (24-hour clock).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    /// Hour, 0..=23.
    pub hour: u8,
    /// Minute, 0..=59.
    pub minute: u8,
    /// Second, 0..=59.
    pub second: u8,
}

impl ClockTime {
    /// Creates a time of day. Values are not range-checked here; use
    /// [`is_valid`](Self::is_valid) for operator input.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Minutes elapsed since midnight.
    #[inline]
    pub const fn minutes_since_midnight(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Returns true when all fields are within range.
    pub const fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second < 60
    }

    /// Returns true at a timetable departure instant.
    ///
    /// Departure instants are the quarter-hour marks: minute in
    /// {0, 15, 30, 45} with second exactly 0. Used only to gate terminus
    /// departures; the middle station dwells by its configured wait time
    /// instead.
    pub const fn is_departure_instant(&self) -> bool {
        self.second == 0 && matches!(self.minute, 0 | 15 | 30 | 45)
    }
}

/// The daily on/off operating window.
///
/// `on` must precede `off` within the same day; windows spanning midnight
/// (e.g. on 22:00, off 06:00) are not supported and are rejected by
/// [`is_valid`](Self::is_valid). A disabled schedule means the shuttle
/// operates around the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Hour the window opens.
    pub on_hour: u8,
    /// Minute the window opens.
    pub on_minute: u8,
    /// Hour the window closes.
    pub off_hour: u8,
    /// Minute the window closes.
    pub off_minute: u8,
    /// Whether the window is enforced at all.
    pub enabled: bool,
}

impl Default for Schedule {
    /// 06:00-22:00, enabled.
    fn default() -> Self {
        Self {
            on_hour: 6,
            on_minute: 0,
            off_hour: 22,
            off_minute: 0,
            enabled: true,
        }
    }
}

impl Schedule {
    /// Set the window opening time.
    pub fn with_on(mut self, hour: u8, minute: u8) -> Self {
        self.on_hour = hour;
        self.on_minute = minute;
        self
    }

    /// Set the window closing time.
    pub fn with_off(mut self, hour: u8, minute: u8) -> Self {
        self.off_hour = hour;
        self.off_minute = minute;
        self
    }

    /// Enable or disable schedule enforcement.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Minutes since midnight at which the window opens.
    #[inline]
    pub const fn on_minutes(&self) -> u16 {
        self.on_hour as u16 * 60 + self.on_minute as u16
    }

    /// Minutes since midnight at which the window closes.
    #[inline]
    pub const fn off_minutes(&self) -> u16 {
        self.off_hour as u16 * 60 + self.off_minute as u16
    }

    /// Returns true when fields are in range and the window does not span
    /// midnight.
    pub const fn is_valid(&self) -> bool {
        self.on_hour < 24
            && self.on_minute < 60
            && self.off_hour < 24
            && self.off_minute < 60
            && self.on_minutes() < self.off_minutes()
    }

    /// Evaluates whether the shuttle should be operating at `now`.
    ///
    /// A disabled schedule always operates. Otherwise true iff
    /// `on <= now < off` in minutes since midnight.
    pub const fn is_operating_now(&self, now: ClockTime) -> bool {
        if !self.enabled {
            return true;
        }
        let now_minutes = now.minutes_since_midnight();
        self.on_minutes() <= now_minutes && now_minutes < self.off_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // ClockTime Tests
    // =========================================================================

    #[test]
    fn minutes_since_midnight() {
        assert_eq!(ClockTime::new(0, 0, 0).minutes_since_midnight(), 0);
        assert_eq!(ClockTime::new(6, 30, 0).minutes_since_midnight(), 390);
        assert_eq!(ClockTime::new(23, 59, 59).minutes_since_midnight(), 1439);
    }

    #[test]
    fn clock_time_validity() {
        assert!(ClockTime::new(23, 59, 59).is_valid());
        assert!(!ClockTime::new(24, 0, 0).is_valid());
        assert!(!ClockTime::new(12, 60, 0).is_valid());
        assert!(!ClockTime::new(12, 0, 60).is_valid());
    }

    #[test]
    fn departure_instants_are_quarter_hours() {
        for minute in [0, 15, 30, 45] {
            assert!(ClockTime::new(9, minute, 0).is_departure_instant());
        }
    }

    #[test]
    fn non_quarter_minute_is_not_departure() {
        assert!(!ClockTime::new(9, 16, 0).is_departure_instant());
        assert!(!ClockTime::new(9, 14, 0).is_departure_instant());
        assert!(!ClockTime::new(9, 44, 0).is_departure_instant());
    }

    #[test]
    fn nonzero_second_is_not_departure() {
        assert!(!ClockTime::new(9, 15, 1).is_departure_instant());
        assert!(!ClockTime::new(9, 0, 59).is_departure_instant());
    }

    // =========================================================================
    // Schedule Tests
    // =========================================================================

    #[test]
    fn default_schedule_window() {
        let schedule = Schedule::default();
        assert_eq!(schedule.on_minutes(), 360);
        assert_eq!(schedule.off_minutes(), 1320);
        assert!(schedule.enabled);
        assert!(schedule.is_valid());
    }

    #[test]
    fn operating_window_evaluation() {
        let schedule = Schedule::default();
        assert!(schedule.is_operating_now(ClockTime::new(12, 0, 0)));
        assert!(!schedule.is_operating_now(ClockTime::new(23, 0, 0)));
        assert!(!schedule.is_operating_now(ClockTime::new(5, 59, 0)));
    }

    #[test]
    fn window_boundaries() {
        let schedule = Schedule::default();
        // Inclusive at on, exclusive at off
        assert!(schedule.is_operating_now(ClockTime::new(6, 0, 0)));
        assert!(!schedule.is_operating_now(ClockTime::new(22, 0, 0)));
        assert!(schedule.is_operating_now(ClockTime::new(21, 59, 0)));
    }

    #[test]
    fn disabled_schedule_always_operates() {
        let schedule = Schedule::default().with_enabled(false);
        assert!(schedule.is_operating_now(ClockTime::new(3, 0, 0)));
        assert!(schedule.is_operating_now(ClockTime::new(23, 30, 0)));
    }

    #[test]
    fn builder_sets_window() {
        let schedule = Schedule::default().with_on(8, 30).with_off(18, 45);
        assert_eq!(schedule.on_minutes(), 510);
        assert_eq!(schedule.off_minutes(), 1125);
        assert!(schedule.is_valid());
    }

    #[test]
    fn midnight_spanning_window_is_invalid() {
        let schedule = Schedule::default().with_on(22, 0).with_off(6, 0);
        assert!(!schedule.is_valid());
    }

    #[test]
    fn out_of_range_fields_are_invalid() {
        assert!(!Schedule::default().with_on(24, 0).is_valid());
        assert!(!Schedule::default().with_off(22, 61).is_valid());
    }
}
