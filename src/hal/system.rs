//! Desktop wall clock backed by the OS clock.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::schedule::ClockTime;
use crate::traits::WallClock;

/// Wall clock derived from the system clock, with a settable offset.
///
/// The operator "set clock" command works here too: setting a time stores
/// an offset against the OS clock rather than touching the OS. Seconds
/// since the UNIX epoch are folded into a time of day; no time zone is
/// applied, so on desktop this reads as UTC unless an offset is set.
#[derive(Debug, Default)]
pub struct SystemWallClock {
    offset_secs: i64,
}

impl SystemWallClock {
    /// Creates a wall clock with no offset.
    pub fn new() -> Self {
        Self::default()
    }

    fn epoch_secs(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_secs() as i64 + self.offset_secs
    }
}

impl WallClock for SystemWallClock {
    type Error = core::convert::Infallible;

    fn now(&self) -> ClockTime {
        let day_secs = self.epoch_secs().rem_euclid(86_400);
        ClockTime::new(
            (day_secs / 3600) as u8,
            (day_secs / 60 % 60) as u8,
            (day_secs % 60) as u8,
        )
    }

    fn set(&mut self, time: ClockTime) -> Result<(), Self::Error> {
        let wanted =
            i64::from(time.hour) * 3600 + i64::from(time.minute) * 60 + i64::from(time.second);
        let current = (self.epoch_secs() - self.offset_secs).rem_euclid(86_400);
        self.offset_secs = wanted - current;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_a_valid_time_of_day() {
        let clock = SystemWallClock::new();
        assert!(clock.now().is_valid());
    }

    #[test]
    fn set_takes_effect() {
        let mut clock = SystemWallClock::new();
        clock.set(ClockTime::new(14, 30, 0)).unwrap();
        let now = clock.now();
        assert_eq!(now.hour, 14);
        assert_eq!(now.minute, 30);
        // Allow the second hand to tick between set and read
        assert!(now.second <= 2);
    }
}
