//! Persisted configuration: per-station waits and the daily schedule.
//!
//! The configuration lives in a small byte-addressed store behind the
//! [`ConfigStore`] trait (EEPROM-class storage on hardware, an in-memory
//! buffer elsewhere). A magic sentinel word guards the image: on load, a
//! missing or corrupt image is replaced with defaults and written back,
//! so first boot on blank storage self-initializes.
//!
//! # Layout
//!
//! All multi-byte fields are little-endian.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 2    | magic sentinel (`0x7A31`) |
//! | 2      | 6    | wait seconds, one `u16` per station |
//! | 8      | 4    | schedule on/off hour and minute |
//! | 12     | 1    | schedule enabled flag |
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::config::PersistedConfig;
//! use rs_shuttle::hal::MockStore;
//!
//! let mut store = MockStore::new();
//!
//! // Blank storage self-initializes to defaults
//! let config = PersistedConfig::load(&mut store).unwrap();
//! assert_eq!(config.wait_secs, [10, 10, 10]);
//!
//! // Edits round-trip bit-exactly
//! let mut edited = config;
//! edited.wait_secs[1] = 25;
//! edited.save(&mut store).unwrap();
//! assert_eq!(PersistedConfig::load(&mut store).unwrap(), edited);
//! ```

use crate::schedule::Schedule;
use crate::sensors::Station;
use crate::traits::ConfigStore;

/// Sentinel word marking a valid configuration image.
pub const CONFIG_MAGIC: u16 = 0x7A31;

/// Default per-station wait in seconds.
pub const DEFAULT_WAIT_SECS: u16 = 10;

/// Upper bound on a configurable wait, in seconds.
pub const MAX_WAIT_SECS: u16 = 600;

/// Total size of the serialized image in bytes.
pub const CONFIG_LEN: usize = 13;

const OFFSET_MAGIC: usize = 0;
const OFFSET_WAITS: usize = 2;
const OFFSET_SCHEDULE: usize = 8;

/// The operator-editable configuration, as persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistedConfig {
    /// Wait time in seconds per station, indexed by station.
    pub wait_secs: [u16; 3],
    /// The daily operating window.
    pub schedule: Schedule,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            wait_secs: [DEFAULT_WAIT_SECS; 3],
            schedule: Schedule::default(),
        }
    }
}

impl PersistedConfig {
    /// Returns true when every field is within its accepted range.
    pub fn is_valid(&self) -> bool {
        self.wait_secs.iter().all(|&w| w <= MAX_WAIT_SECS) && self.schedule.is_valid()
    }

    /// Wait time in seconds for a station.
    #[inline]
    pub fn wait_for(&self, station: Station) -> u16 {
        self.wait_secs[station.index()]
    }

    /// Loads the configuration from `store`.
    ///
    /// A missing sentinel or an out-of-range field means the image is
    /// blank or corrupt; defaults are written back and returned, so the
    /// store always holds a valid image after a successful load.
    pub fn load<S: ConfigStore>(store: &mut S) -> Result<Self, S::Error> {
        let mut image = [0u8; CONFIG_LEN];
        store.read(0, &mut image)?;

        let magic = u16::from_le_bytes([image[OFFSET_MAGIC], image[OFFSET_MAGIC + 1]]);
        if magic == CONFIG_MAGIC {
            let config = Self::decode(&image);
            if config.is_valid() {
                return Ok(config);
            }
        }

        let defaults = Self::default();
        defaults.save(store)?;
        Ok(defaults)
    }

    /// Writes the full image, sentinel included.
    pub fn save<S: ConfigStore>(&self, store: &mut S) -> Result<(), S::Error> {
        let mut image = [0u8; CONFIG_LEN];
        image[OFFSET_MAGIC..OFFSET_MAGIC + 2].copy_from_slice(&CONFIG_MAGIC.to_le_bytes());
        for (i, wait) in self.wait_secs.iter().enumerate() {
            let at = OFFSET_WAITS + i * 2;
            image[at..at + 2].copy_from_slice(&wait.to_le_bytes());
        }
        image[OFFSET_SCHEDULE] = self.schedule.on_hour;
        image[OFFSET_SCHEDULE + 1] = self.schedule.on_minute;
        image[OFFSET_SCHEDULE + 2] = self.schedule.off_hour;
        image[OFFSET_SCHEDULE + 3] = self.schedule.off_minute;
        image[OFFSET_SCHEDULE + 4] = self.schedule.enabled as u8;
        store.write(0, &image)
    }

    fn decode(image: &[u8; CONFIG_LEN]) -> Self {
        let wait_at = |i: usize| {
            let at = OFFSET_WAITS + i * 2;
            u16::from_le_bytes([image[at], image[at + 1]])
        };
        Self {
            wait_secs: [wait_at(0), wait_at(1), wait_at(2)],
            schedule: Schedule {
                on_hour: image[OFFSET_SCHEDULE],
                on_minute: image[OFFSET_SCHEDULE + 1],
                off_hour: image[OFFSET_SCHEDULE + 2],
                off_minute: image[OFFSET_SCHEDULE + 3],
                enabled: image[OFFSET_SCHEDULE + 4] != 0,
            },
        }
    }
}
