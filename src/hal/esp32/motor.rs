//! BTS7960 motor driver implementation using ESP32 LEDC PWM.
//!
//! The BTS7960 is controlled via two PWM signals:
//! - L_PWM (GPIO2): Left-bound PWM
//! - R_PWM (GPIO3): Right-bound PWM
//!
//! Control logic:
//! - Left: L_PWM = duty%, R_PWM = 0%
//! - Right: L_PWM = 0%, R_PWM = duty%
//! - Stopped: Both = 0%

use crate::traits::{Direction, MotorController};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;

/// BTS7960 motor controller for ESP32.
///
/// Uses the LEDC peripheral for PWM generation at 20kHz with 10-bit
/// resolution; the 8-bit duty from the ramp engine is scaled up to the
/// 1024-step hardware range.
///
/// # Hardware Setup
///
/// Connect to BTS7960 module:
/// - GPIO2 → L_PWM (left-bound)
/// - GPIO3 → R_PWM (right-bound)
/// - R_EN + L_EN → jumpered to 3.3V (always enabled)
///
/// # Example
///
/// ```ignore
/// use rs_shuttle::hal::esp32::Esp32Motor;
/// use rs_shuttle::traits::{MotorController, Direction};
///
/// let peripherals = Peripherals::take()?;
/// let mut motor = Esp32Motor::new(
///     peripherals.pins.gpio2,
///     peripherals.pins.gpio3,
///     peripherals.ledc.timer0,
///     peripherals.ledc.channel0,
///     peripherals.ledc.channel1,
/// )?;
///
/// motor.set_drive(Direction::Right, 128)?; // half duty, right-bound
/// ```
pub struct Esp32Motor<'d> {
    /// Left-bound PWM channel (L_PWM on BTS7960)
    l_pwm: LedcDriver<'d>,
    /// Right-bound PWM channel (R_PWM on BTS7960)
    r_pwm: LedcDriver<'d>,
}

impl<'d> Esp32Motor<'d> {
    /// PWM frequency in Hz (20kHz is above audible range)
    const PWM_FREQ_HZ: u32 = 20_000;

    /// PWM resolution (10-bit = 1024 steps)
    const PWM_RESOLUTION: Resolution = Resolution::Bits10;

    /// Maximum duty value for 10-bit resolution
    const MAX_DUTY: u32 = 1023;

    /// Creates a new BTS7960 motor controller.
    ///
    /// # Arguments
    ///
    /// * `l_pwm_pin` - GPIO for left-bound PWM (typically GPIO2)
    /// * `r_pwm_pin` - GPIO for right-bound PWM (typically GPIO3)
    /// * `timer` - LEDC timer peripheral
    /// * `l_channel` - LEDC channel for left-bound PWM
    /// * `r_channel` - LEDC channel for right-bound PWM
    ///
    /// # Errors
    ///
    /// Returns an error if PWM initialization fails.
    pub fn new<T, TI, LC, LCI, RC, RCI, LP, LPI, RP, RPI>(
        l_pwm_pin: LP,
        r_pwm_pin: RP,
        timer: T,
        l_channel: LC,
        r_channel: RC,
    ) -> Result<Self, esp_idf_hal::sys::EspError>
    where
        TI: esp_idf_hal::ledc::LedcTimer + 'd,
        T: Peripheral<P = TI> + 'd,
        LCI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        LC: Peripheral<P = LCI> + 'd,
        RCI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        RC: Peripheral<P = RCI> + 'd,
        LPI: esp_idf_hal::gpio::OutputPin + 'd,
        LP: Peripheral<P = LPI> + 'd,
        RPI: esp_idf_hal::gpio::OutputPin + 'd,
        RP: Peripheral<P = RPI> + 'd,
    {
        // Configure LEDC timer: 20kHz, 10-bit resolution
        let timer_config = TimerConfig::default()
            .frequency(Self::PWM_FREQ_HZ.Hz())
            .resolution(Self::PWM_RESOLUTION);
        let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;

        // Configure PWM channels
        let l_pwm = LedcDriver::new(l_channel, &timer_driver, l_pwm_pin)?;
        let r_pwm = LedcDriver::new(r_channel, &timer_driver, r_pwm_pin)?;

        let mut motor = Self { l_pwm, r_pwm };

        // Ensure the track starts unpowered
        motor.set_drive(Direction::Stopped, 0)?;

        Ok(motor)
    }

    /// Scales an 8-bit duty to the 10-bit hardware range.
    #[inline]
    fn scale_duty(duty: u8) -> u32 {
        u32::from(duty) * Self::MAX_DUTY / 255
    }
}

impl MotorController for Esp32Motor<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn set_drive(&mut self, dir: Direction, duty: u8) -> Result<(), Self::Error> {
        let duty = Self::scale_duty(duty);

        match dir {
            Direction::Left => {
                self.l_pwm.set_duty(duty)?;
                self.r_pwm.set_duty(0)?;
            }
            Direction::Right => {
                self.l_pwm.set_duty(0)?;
                self.r_pwm.set_duty(duty)?;
            }
            Direction::Stopped => {
                self.l_pwm.set_duty(0)?;
                self.r_pwm.set_duty(0)?;
            }
        }

        Ok(())
    }
}
