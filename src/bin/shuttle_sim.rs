//! Desktop shuttle simulation on the mock HAL.
//!
//! Replays a full service cycle against simulated time: locate at the
//! left terminus, run to the middle station, dwell, continue to the right
//! terminus, and depart again on the quarter-hour. Useful for eyeballing
//! the state machine without a layout attached.
//!
//! # Run
//!
//! ```bash
//! cargo run --bin shuttle_sim
//! ```

use rs_shuttle::hal::{MockClock, MockMotor, MockStore};
use rs_shuttle::sensors::{SLOW_CENTER_LEFT, SLOW_CENTER_RIGHT, SLOW_RIGHT};
use rs_shuttle::traits::Clock;
use rs_shuttle::{
    ClockTime, Mode, PersistedConfig, SensorSnapshot, ShuttleAutomaton, Station, StepContext,
};

/// Simulation tick in microseconds (50Hz).
const TICK_US: u64 = 20_000;

/// Simulated wall-clock time at simulation start.
const WALL_START: ClockTime = ClockTime::new(12, 13, 40);

/// Sensor events along the simulated journey, as (from, to) windows in
/// microseconds of simulated time. The gaps between windows are open
/// track.
fn snapshot_at(now_us: u64) -> SensorSnapshot {
    match now_us {
        // Sitting on the left terminus stop sensor at power-on
        0..=200_000 => SensorSnapshot::with_stop(Station::LeftTerminus),
        // Near-side slow sensor announces the middle station
        21_000_000..=21_200_000 => SensorSnapshot::with_slow(SLOW_CENTER_LEFT),
        // Far-side slow sensor: middle arrival
        36_000_000..=36_200_000 => SensorSnapshot::with_slow(SLOW_CENTER_RIGHT),
        // Right terminus approach and stop
        60_000_000..=60_200_000 => SensorSnapshot::with_slow(SLOW_RIGHT),
        70_000_000..=70_200_000 => SensorSnapshot::with_stop(Station::RightTerminus),
        _ => SensorSnapshot::clear(),
    }
}

/// Simulated wall clock: start time plus elapsed simulated seconds.
fn wall_at(now_us: u64) -> ClockTime {
    let total = u64::from(WALL_START.hour) * 3600
        + u64::from(WALL_START.minute) * 60
        + u64::from(WALL_START.second)
        + now_us / 1_000_000;
    let day_secs = total % 86_400;
    ClockTime::new(
        (day_secs / 3600) as u8,
        (day_secs / 60 % 60) as u8,
        (day_secs % 60) as u8,
    )
}

fn main() -> anyhow::Result<()> {
    println!("rs-shuttle simulation (50Hz, simulated time)");
    println!();

    // Blank storage self-initializes; shorten the middle dwell for the sim
    let mut store = MockStore::new();
    let mut config =
        PersistedConfig::load(&mut store).map_err(|e| anyhow::anyhow!("config: {e:?}"))?;
    config.wait_secs[Station::Middle.index()] = 5;
    config
        .save(&mut store)
        .map_err(|e| anyhow::anyhow!("config: {e:?}"))?;

    let mut shuttle =
        ShuttleAutomaton::new(MockMotor::new()).with_config(config.wait_secs, config.schedule);
    let mut clock = MockClock::new();

    let mut last_mode = None;
    let mut journey: Vec<(u64, Mode)> = Vec::new();

    // 82 simulated seconds covers the full cycle including the 12:15:00
    // timetable departure from the right terminus
    while clock.now_us() <= 82_000_000 {
        let now_us = clock.now_us();
        shuttle
            .step(StepContext {
                snapshot: snapshot_at(now_us),
                wall: wall_at(now_us),
                now_us,
                depart_now: false,
            })
            .map_err(|e| anyhow::anyhow!("motor: {e:?}"))?;

        if last_mode != Some(shuttle.mode()) {
            last_mode = Some(shuttle.mode());
            journey.push((now_us, shuttle.mode()));
            let wall = wall_at(now_us);
            println!(
                "t={:6.2}s  {:02}:{:02}:{:02}  {}",
                now_us as f64 / 1e6,
                wall.hour,
                wall.minute,
                wall.second,
                shuttle.status().render(),
            );
        }

        clock.advance_us(TICK_US);
    }

    println!();
    let modes: Vec<Mode> = journey.iter().map(|&(_, m)| m).collect();
    anyhow::ensure!(
        modes.contains(&Mode::Running) && modes.contains(&Mode::Waiting),
        "simulation never reached a full service leg: {modes:?}"
    );
    anyhow::ensure!(
        shuttle.mode() == Mode::Accelerating,
        "expected the 12:15:00 departure, still in {:?}",
        shuttle.mode()
    );
    println!("simulation complete: {} mode changes", journey.len());

    Ok(())
}
