//! Track position sensors: snapshot type and station mapping queries.
//!
//! Seven reed sensors sit along the line. Each station has a stop sensor
//! marking the halt point, and four slow sensors mark where deceleration
//! should begin: one outside each terminus and two flanking the middle
//! station.
//!
//! ```text
//!   [0]========[1]========[2]
//!    ^  ^    ^  ^  ^    ^  ^
//!    |  ls  cls |  crs  rs |
//!  stop0      stop1      stop2
//! ```
//!
//! The queries here are pure functions over one instantaneous
//! [`SensorSnapshot`]; they keep no history and apply no debouncing. The
//! middle station's ambiguity (one shared stop sensor, two flanking slow
//! sensors) is resolved by the state machine using
//! [`SensorSnapshot::locate_middle_slow_side`] together with the travel
//! direction.

/// A station on the line.
///
/// The set is fixed: two termini and one optional middle station. Stations
/// are identified by index 0..=2 from left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Station {
    /// Left end of the line (index 0).
    LeftTerminus,
    /// Optional intermediate station (index 1).
    Middle,
    /// Right end of the line (index 2).
    RightTerminus,
}

impl Station {
    /// Returns the station index (0 = left terminus, 1 = middle, 2 = right terminus).
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            Station::LeftTerminus => 0,
            Station::Middle => 1,
            Station::RightTerminus => 2,
        }
    }

    /// Builds a station from its index.
    ///
    /// Returns `None` for indices outside 0..=2.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Station::LeftTerminus),
            1 => Some(Station::Middle),
            2 => Some(Station::RightTerminus),
            _ => None,
        }
    }

    /// Returns true for the two line-end stations.
    #[inline]
    pub const fn is_terminus(&self) -> bool {
        matches!(self, Station::LeftTerminus | Station::RightTerminus)
    }

    /// Short display label ("S0", "S1", "S2").
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Station::LeftTerminus => "S0",
            Station::Middle => "S1",
            Station::RightTerminus => "S2",
        }
    }
}

/// Which side of the middle station a slow sensor lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiddleSide {
    /// The slow sensor left of the middle stop sensor.
    Left,
    /// The slow sensor right of the middle stop sensor.
    Right,
}

/// One instantaneous reading of all seven position sensors.
///
/// `true` means a magnet is currently over that sensor. The physical lines
/// are active-low; HAL implementations invert before constructing the
/// snapshot. The control loop takes exactly one snapshot per iteration, so
/// a transition decision never mixes sensor states from different moments.
///
/// In well-formed operation at most one of the seven flags is set at any
/// sampled instant (two simultaneous stop sensors would be a hardware
/// fault and is not modeled).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSnapshot {
    /// Stop sensors, one per station, indexed by station.
    pub stop: [bool; 3],
    /// Slow sensors, left to right:
    /// `[left, center_left, center_right, right]`.
    pub slow: [bool; 4],
}

/// Index of the left-terminus slow sensor in [`SensorSnapshot::slow`].
pub const SLOW_LEFT: usize = 0;
/// Index of the slow sensor left of the middle station.
pub const SLOW_CENTER_LEFT: usize = 1;
/// Index of the slow sensor right of the middle station.
pub const SLOW_CENTER_RIGHT: usize = 2;
/// Index of the right-terminus slow sensor in [`SensorSnapshot::slow`].
pub const SLOW_RIGHT: usize = 3;

impl SensorSnapshot {
    /// A snapshot with no sensor asserted.
    pub const fn clear() -> Self {
        Self {
            stop: [false; 3],
            slow: [false; 4],
        }
    }

    /// Builds a snapshot with a single stop sensor asserted.
    pub fn with_stop(station: Station) -> Self {
        let mut snap = Self::clear();
        snap.stop[station.index()] = true;
        snap
    }

    /// Builds a snapshot with a single slow sensor asserted.
    ///
    /// `slow_index` is one of [`SLOW_LEFT`], [`SLOW_CENTER_LEFT`],
    /// [`SLOW_CENTER_RIGHT`], [`SLOW_RIGHT`].
    pub fn with_slow(slow_index: usize) -> Self {
        let mut snap = Self::clear();
        snap.slow[slow_index] = true;
        snap
    }

    /// Decodes a snapshot from a raw active-low bit pattern.
    ///
    /// Bit layout (LSB first): stop 0..=2, then slow left, center-left,
    /// center-right, right. A cleared bit means the line is pulled low,
    /// i.e. a magnet is over the sensor.
    pub fn from_active_low_bits(bits: u8) -> Self {
        let covered = |bit: u8| bits & (1 << bit) == 0;
        Self {
            stop: [covered(0), covered(1), covered(2)],
            slow: [covered(3), covered(4), covered(5), covered(6)],
        }
    }

    /// Returns true when no sensor at all is asserted.
    pub fn is_clear(&self) -> bool {
        !self.stop.iter().any(|&s| s) && !self.slow.iter().any(|&s| s)
    }

    /// Maps an asserted stop sensor to its station.
    ///
    /// Returns `None` when no stop sensor is covered. With the at-most-one
    /// invariant the leftmost asserted sensor is the asserted sensor.
    pub fn locate_stop(&self) -> Option<Station> {
        self.stop
            .iter()
            .position(|&hit| hit)
            .and_then(Station::from_index)
    }

    /// Maps an asserted slow sensor to the station it announces.
    ///
    /// The terminus slow sensors announce their terminus; both middle slow
    /// sensors announce the middle station. Returns `None` when no slow
    /// sensor is covered.
    pub fn locate_slow(&self) -> Option<Station> {
        match self.slow.iter().position(|&hit| hit)? {
            SLOW_LEFT => Some(Station::LeftTerminus),
            SLOW_CENTER_LEFT | SLOW_CENTER_RIGHT => Some(Station::Middle),
            SLOW_RIGHT => Some(Station::RightTerminus),
            _ => None,
        }
    }

    /// Reports which flanking slow sensor of the middle station is covered.
    ///
    /// Used by the state machine to stop middle-bound trains on the slow
    /// sensor beyond the middle stop sensor in the direction of travel,
    /// which gives tighter platform alignment for short trains.
    pub fn locate_middle_slow_side(&self) -> Option<MiddleSide> {
        if self.slow[SLOW_CENTER_LEFT] {
            Some(MiddleSide::Left)
        } else if self.slow[SLOW_CENTER_RIGHT] {
            Some(MiddleSide::Right)
        } else {
            None
        }
    }
}
