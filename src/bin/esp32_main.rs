//! ESP32-C3 SuperMini shuttle controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a 50Hz control loop that:
//! - Samples the seven reed sensors as one snapshot
//! - Steps the shuttle automaton (ramps, stops, timetable gating)
//! - Updates the motor PWM output
//! - Pushes status lines to the serial console on change
//! - Feeds serial input lines to the operator menu without blocking
//!
//! # Build
//!
//! ```bash
//! cargo build --bin esp32_main --features esp32
//! ```

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use esp_idf_hal::peripherals::Peripherals;
use rs_shuttle::hal::esp32::{Esp32Clock, Esp32Motor, Esp32Sensors};
use rs_shuttle::hal::{MockStore, SystemWallClock};
use rs_shuttle::traits::{Clock, SensorInput, StatusDisplay, WallClock};
use rs_shuttle::{
    MenuEffect, MenuSession, MenuView, PersistedConfig, ShuttleAutomaton, StatusReporter,
    StepContext,
};

/// Main loop interval in milliseconds (50Hz = 20ms)
const LOOP_INTERVAL_MS: u64 = 20;

/// Serial console status surface.
struct SerialDisplay;

impl StatusDisplay for SerialDisplay {
    type Error = std::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn show_status(&mut self, line: &str) -> Result<(), Self::Error> {
        println!("[STATUS] {line}");
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        match line2 {
            Some(line2) => println!("{line1} / {line2}"),
            None => println!("{line1}"),
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("================================");
    println!("  rs-shuttle SuperMini Controller");
    println!("================================");
    println!();

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Motor (BTS7960 on GPIO2/3)
    // =========================================================================
    let motor = Esp32Motor::new(
        peripherals.pins.gpio2,
        peripherals.pins.gpio3,
        peripherals.ledc.timer0,
        peripherals.ledc.channel0,
        peripherals.ledc.channel1,
    )?;
    println!("[OK] Motor initialized (GPIO2/3 PWM)");

    // =========================================================================
    // Initialize Sensors (reed switches on GPIO4-10)
    // =========================================================================
    let mut sensors = Esp32Sensors::new(
        [
            peripherals.pins.gpio4.into(),
            peripherals.pins.gpio5.into(),
            peripherals.pins.gpio6.into(),
        ],
        [
            peripherals.pins.gpio7.into(),
            peripherals.pins.gpio8.into(),
            peripherals.pins.gpio9.into(),
            peripherals.pins.gpio10.into(),
        ],
    )?;
    println!("[OK] Sensors initialized (GPIO4-10, pull-up)");

    // =========================================================================
    // Initialize Clocks and Configuration
    // =========================================================================
    let clock = Esp32Clock::new();
    let mut wall_clock = SystemWallClock::new();

    // TODO: back the config store with an NVS partition so edits survive
    // a power cycle
    let mut store = MockStore::new();
    let config = PersistedConfig::load(&mut store)
        .map_err(|e| anyhow::anyhow!("config load failed: {e:?}"))?;
    println!(
        "[OK] Config loaded (waits {:?}s, schedule {:02}:{:02}-{:02}:{:02})",
        config.wait_secs,
        config.schedule.on_hour,
        config.schedule.on_minute,
        config.schedule.off_hour,
        config.schedule.off_minute,
    );

    let mut shuttle = ShuttleAutomaton::new(motor).with_config(config.wait_secs, config.schedule);
    let mut reporter = StatusReporter::new(SerialDisplay);
    reporter.display_mut().init().ok();

    // =========================================================================
    // Serial Input Thread
    // =========================================================================
    // stdin reads block, so a dedicated thread forwards lines over a
    // channel and the control loop polls it without waiting.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    println!();
    println!("Send 'm' over serial for the operator menu.");
    println!("Starting control loop (50Hz)...");
    println!();

    let mut menu: Option<MenuSession> = None;
    let mut config = config;

    // =========================================================================
    // Main Control Loop (50Hz)
    // =========================================================================
    loop {
        let now_us = clock.now_us();
        let wall = wall_clock.now();
        let snapshot = sensors
            .sample()
            .map_err(|e| anyhow::anyhow!("sensor read failed: {e:?}"))?;

        // ---------------------------------------------------------------------
        // Operator menu (non-blocking)
        // ---------------------------------------------------------------------
        let mut depart_now = false;
        while let Ok(line) = line_rx.try_recv() {
            let effect = if let Some(session) = menu.as_mut() {
                let view = MenuView {
                    wait_secs: config.wait_secs,
                    schedule: shuttle.schedule(),
                    clock: wall,
                };
                let outcome = session.handle_line(&line, &view);
                println!("{}", outcome.reply);
                outcome.effect
            } else {
                if line.trim() == "m" {
                    let session = MenuSession::new();
                    println!("{}", session.prompt());
                    menu = Some(session);
                }
                None
            };

            match effect {
                Some(MenuEffect::SetWait { station, secs }) => {
                    shuttle.set_wait_secs(station, secs);
                    config.wait_secs[station.index()] = secs;
                    config
                        .save(&mut store)
                        .map_err(|e| anyhow::anyhow!("config save failed: {e:?}"))?;
                }
                Some(MenuEffect::SetSchedule(schedule)) => {
                    shuttle.set_schedule(schedule);
                    config.schedule = schedule;
                    config
                        .save(&mut store)
                        .map_err(|e| anyhow::anyhow!("config save failed: {e:?}"))?;
                }
                Some(MenuEffect::SetClock(time)) => {
                    wall_clock
                        .set(time)
                        .map_err(|e| anyhow::anyhow!("clock set failed: {e:?}"))?;
                }
                Some(MenuEffect::DepartNow) => depart_now = true,
                Some(MenuEffect::Exit) => menu = None,
                None => {}
            }
        }

        // ---------------------------------------------------------------------
        // Step the automaton (sensor fusion, ramps, motor output)
        // ---------------------------------------------------------------------
        shuttle
            .step(StepContext {
                snapshot,
                wall,
                now_us,
                depart_now,
            })
            .map_err(|e| anyhow::anyhow!("motor write failed: {e:?}"))?;

        // ---------------------------------------------------------------------
        // Push status on change
        // ---------------------------------------------------------------------
        let _ = reporter.publish(shuttle.status());

        // Sleep until next tick
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
