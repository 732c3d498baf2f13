//! Reed sensor bank implementation for ESP32.
//!
//! Seven reed switches along the line, each wired between a GPIO and
//! ground with the internal pull-up enabled, so a magnet over the sensor
//! pulls the line low.
//!
//! # Wiring
//!
//! - Stop sensors: GPIO4 (left), GPIO5 (middle), GPIO6 (right)
//! - Slow sensors: GPIO7 (left), GPIO8 (center-left),
//!   GPIO9 (center-right), GPIO10 (right)

use crate::sensors::SensorSnapshot;
use crate::traits::SensorInput;
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

/// Reed sensor bank for ESP32.
///
/// All seven lines are sampled together on each [`sample`] call so the
/// control loop always sees one instantaneous snapshot.
///
/// # Example
///
/// ```ignore
/// use rs_shuttle::hal::esp32::Esp32Sensors;
/// use rs_shuttle::traits::SensorInput;
///
/// let peripherals = Peripherals::take()?;
/// let mut sensors = Esp32Sensors::new(
///     [
///         peripherals.pins.gpio4.into(),
///         peripherals.pins.gpio5.into(),
///         peripherals.pins.gpio6.into(),
///     ],
///     [
///         peripherals.pins.gpio7.into(),
///         peripherals.pins.gpio8.into(),
///         peripherals.pins.gpio9.into(),
///         peripherals.pins.gpio10.into(),
///     ],
/// )?;
///
/// let snapshot = sensors.sample()?;
/// ```
///
/// [`sample`]: crate::traits::SensorInput::sample
pub struct Esp32Sensors<'d> {
    /// Stop sensor inputs, indexed by station.
    stop: [PinDriver<'d, AnyIOPin, Input>; 3],
    /// Slow sensor inputs, left to right.
    slow: [PinDriver<'d, AnyIOPin, Input>; 4],
}

impl<'d> Esp32Sensors<'d> {
    /// Creates the sensor bank.
    ///
    /// Configures every line as an input with the internal pull-up
    /// enabled.
    ///
    /// # Arguments
    ///
    /// * `stop_pins` - Stop sensor GPIOs, indexed by station
    /// * `slow_pins` - Slow sensor GPIOs, left to right
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        stop_pins: [AnyIOPin; 3],
        slow_pins: [AnyIOPin; 4],
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let [s0, s1, s2] = stop_pins;
        let [w0, w1, w2, w3] = slow_pins;

        Ok(Self {
            stop: [
                Self::input_pull_up(s0)?,
                Self::input_pull_up(s1)?,
                Self::input_pull_up(s2)?,
            ],
            slow: [
                Self::input_pull_up(w0)?,
                Self::input_pull_up(w1)?,
                Self::input_pull_up(w2)?,
                Self::input_pull_up(w3)?,
            ],
        })
    }

    fn input_pull_up(
        pin: AnyIOPin,
    ) -> Result<PinDriver<'d, AnyIOPin, Input>, esp_idf_hal::sys::EspError> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }
}

impl SensorInput for Esp32Sensors<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn sample(&mut self) -> Result<SensorSnapshot, Self::Error> {
        // Active low: a covered sensor pulls its line to ground
        let covered = |pin: &PinDriver<'_, AnyIOPin, Input>| pin.is_low();
        Ok(SensorSnapshot {
            stop: [
                covered(&self.stop[0]),
                covered(&self.stop[1]),
                covered(&self.stop[2]),
            ],
            slow: [
                covered(&self.slow[0]),
                covered(&self.slow[1]),
                covered(&self.slow[2]),
                covered(&self.slow[3]),
            ],
        })
    }
}
