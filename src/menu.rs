//! Operator menu: a line-oriented, explicitly stated session.
//!
//! The menu never blocks the control loop. [`MenuSession`] holds the
//! conversation position as an explicit state value; the caller feeds it
//! one input line at a time whenever one happens to arrive and keeps
//! stepping the automaton in between. Each line produces a textual reply
//! and possibly a [`MenuEffect`] for the caller to apply (and persist).
//!
//! # Example
//!
//! ```rust
//! use rs_shuttle::menu::{MenuEffect, MenuSession, MenuView};
//! use rs_shuttle::schedule::{ClockTime, Schedule};
//! use rs_shuttle::sensors::Station;
//!
//! let view = MenuView {
//!     wait_secs: [10, 10, 10],
//!     schedule: Schedule::default(),
//!     clock: ClockTime::new(12, 0, 0),
//! };
//!
//! let mut session = MenuSession::new();
//! session.handle_line("1", &view); // set station wait
//! session.handle_line("2", &view); // station index
//! let outcome = session.handle_line("45", &view);
//!
//! assert_eq!(
//!     outcome.effect,
//!     Some(MenuEffect::SetWait { station: Station::RightTerminus, secs: 45 })
//! );
//! ```

use alloc::format;
use alloc::string::String;

use crate::config::MAX_WAIT_SECS;
use crate::schedule::{ClockTime, Schedule};
use crate::sensors::Station;

/// A state change requested by the operator, for the caller to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEffect {
    /// Set the wait time for one station (persist).
    SetWait {
        /// The station whose wait is edited.
        station: Station,
        /// The new wait in seconds.
        secs: u16,
    },
    /// Replace the operating schedule (persist).
    SetSchedule(Schedule),
    /// Set the wall clock.
    SetClock(ClockTime),
    /// Force an immediate departure from the current dwell.
    DepartNow,
    /// Close the menu session.
    Exit,
}

/// Reply text plus the optional effect for one handled line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOutcome {
    /// Text to show the operator.
    pub reply: String,
    /// State change to apply, if the line completed a command.
    pub effect: Option<MenuEffect>,
}

/// Read-only view of the current state, for the show/list commands.
#[derive(Clone, Copy, Debug)]
pub struct MenuView {
    /// Wait time in seconds per station.
    pub wait_secs: [u16; 3],
    /// The active schedule.
    pub schedule: Schedule,
    /// Current wall-clock time.
    pub clock: ClockTime,
}

/// Conversation position within a multi-step command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuState {
    Root,
    WaitStation,
    WaitSeconds(Station),
    ScheduleOn,
    ScheduleOff { on_hour: u8, on_minute: u8 },
    ScheduleEnabled(Schedule),
    Clock,
}

/// One operator menu session.
///
/// Out-of-range input never aborts a command; the session stays in the
/// same state and re-prompts.
pub struct MenuSession {
    state: MenuState,
}

impl MenuSession {
    /// Creates a session at the root menu.
    pub fn new() -> Self {
        Self {
            state: MenuState::Root,
        }
    }

    /// The prompt for the current conversation position.
    pub fn prompt(&self) -> String {
        match self.state {
            MenuState::Root => String::from(
                "shuttle menu:\n\
                 \x20 1) set station wait\n\
                 \x20 2) list station waits\n\
                 \x20 3) set schedule\n\
                 \x20 4) show schedule\n\
                 \x20 5) set clock\n\
                 \x20 6) show clock\n\
                 \x20 7) depart now\n\
                 \x20 0) exit\n> ",
            ),
            MenuState::WaitStation => String::from("station index (0-2)? "),
            MenuState::WaitSeconds(station) => {
                format!("wait for {} in seconds (0-{})? ", station.label(), MAX_WAIT_SECS)
            }
            MenuState::ScheduleOn => String::from("on time (HH MM)? "),
            MenuState::ScheduleOff { .. } => String::from("off time (HH MM)? "),
            MenuState::ScheduleEnabled(_) => String::from("schedule enabled (y/n)? "),
            MenuState::Clock => String::from("time (HH MM SS)? "),
        }
    }

    /// Handles one input line.
    pub fn handle_line(&mut self, line: &str, view: &MenuView) -> MenuOutcome {
        let line = line.trim();
        match self.state {
            MenuState::Root => self.handle_root(line, view),
            MenuState::WaitStation => self.handle_wait_station(line),
            MenuState::WaitSeconds(station) => self.handle_wait_seconds(line, station),
            MenuState::ScheduleOn => self.handle_schedule_on(line),
            MenuState::ScheduleOff { on_hour, on_minute } => {
                self.handle_schedule_off(line, on_hour, on_minute)
            }
            MenuState::ScheduleEnabled(draft) => self.handle_schedule_enabled(line, draft),
            MenuState::Clock => self.handle_clock(line),
        }
    }

    fn handle_root(&mut self, line: &str, view: &MenuView) -> MenuOutcome {
        match line {
            "1" => {
                self.state = MenuState::WaitStation;
                reply(self.prompt())
            }
            "2" => reply(format!(
                "waits: S0={}s S1={}s S2={}s",
                view.wait_secs[0], view.wait_secs[1], view.wait_secs[2]
            )),
            "3" => {
                self.state = MenuState::ScheduleOn;
                reply(self.prompt())
            }
            "4" => {
                let s = view.schedule;
                reply(format!(
                    "schedule: {:02}:{:02}-{:02}:{:02} ({})",
                    s.on_hour,
                    s.on_minute,
                    s.off_hour,
                    s.off_minute,
                    if s.enabled { "enabled" } else { "disabled" }
                ))
            }
            "5" => {
                self.state = MenuState::Clock;
                reply(self.prompt())
            }
            "6" => {
                let c = view.clock;
                reply(format!("clock: {:02}:{:02}:{:02}", c.hour, c.minute, c.second))
            }
            "7" => done(String::from("departing"), MenuEffect::DepartNow),
            "0" => done(String::from("bye"), MenuEffect::Exit),
            _ => reply(format!("unrecognized option '{}'\n{}", line, self.prompt())),
        }
    }

    fn handle_wait_station(&mut self, line: &str) -> MenuOutcome {
        match line.parse::<usize>().ok().and_then(Station::from_index) {
            Some(station) => {
                self.state = MenuState::WaitSeconds(station);
                reply(self.prompt())
            }
            None => reply(format!("station must be 0-2\n{}", self.prompt())),
        }
    }

    fn handle_wait_seconds(&mut self, line: &str, station: Station) -> MenuOutcome {
        match line.parse::<u16>() {
            Ok(secs) if secs <= MAX_WAIT_SECS => {
                self.state = MenuState::Root;
                done(
                    format!("wait for {} set to {}s", station.label(), secs),
                    MenuEffect::SetWait { station, secs },
                )
            }
            _ => reply(format!("seconds must be 0-{}\n{}", MAX_WAIT_SECS, self.prompt())),
        }
    }

    fn handle_schedule_on(&mut self, line: &str) -> MenuOutcome {
        match parse_hour_minute(line) {
            Some((on_hour, on_minute)) => {
                self.state = MenuState::ScheduleOff { on_hour, on_minute };
                reply(self.prompt())
            }
            None => reply(format!("expected HH MM\n{}", self.prompt())),
        }
    }

    fn handle_schedule_off(&mut self, line: &str, on_hour: u8, on_minute: u8) -> MenuOutcome {
        match parse_hour_minute(line) {
            Some((off_hour, off_minute)) => {
                let draft = Schedule {
                    on_hour,
                    on_minute,
                    off_hour,
                    off_minute,
                    enabled: true,
                };
                if !draft.is_valid() {
                    // Midnight-spanning windows are not supported; restart
                    // the command from the on time.
                    self.state = MenuState::ScheduleOn;
                    return reply(format!("off time must be after on time\n{}", self.prompt()));
                }
                self.state = MenuState::ScheduleEnabled(draft);
                reply(self.prompt())
            }
            None => reply(format!("expected HH MM\n{}", self.prompt())),
        }
    }

    fn handle_schedule_enabled(&mut self, line: &str, draft: Schedule) -> MenuOutcome {
        let enabled = match line {
            "y" | "Y" => true,
            "n" | "N" => false,
            _ => return reply(format!("expected y or n\n{}", self.prompt())),
        };
        self.state = MenuState::Root;
        let schedule = draft.with_enabled(enabled);
        done(
            format!(
                "schedule set to {:02}:{:02}-{:02}:{:02} ({})",
                schedule.on_hour,
                schedule.on_minute,
                schedule.off_hour,
                schedule.off_minute,
                if enabled { "enabled" } else { "disabled" }
            ),
            MenuEffect::SetSchedule(schedule),
        )
    }

    fn handle_clock(&mut self, line: &str) -> MenuOutcome {
        let mut parts = line.split_whitespace();
        let parsed = (|| {
            let hour = parts.next()?.parse::<u8>().ok()?;
            let minute = parts.next()?.parse::<u8>().ok()?;
            let second = parts.next()?.parse::<u8>().ok()?;
            if parts.next().is_some() {
                return None;
            }
            let time = ClockTime::new(hour, minute, second);
            time.is_valid().then_some(time)
        })();
        match parsed {
            Some(time) => {
                self.state = MenuState::Root;
                done(
                    format!("clock set to {:02}:{:02}:{:02}", time.hour, time.minute, time.second),
                    MenuEffect::SetClock(time),
                )
            }
            None => reply(format!("expected HH MM SS\n{}", self.prompt())),
        }
    }
}

impl Default for MenuSession {
    fn default() -> Self {
        Self::new()
    }
}

fn reply(text: String) -> MenuOutcome {
    MenuOutcome {
        reply: text,
        effect: None,
    }
}

fn done(text: String, effect: MenuEffect) -> MenuOutcome {
    MenuOutcome {
        reply: text,
        effect: Some(effect),
    }
}

fn parse_hour_minute(line: &str) -> Option<(u8, u8)> {
    let mut parts = line.split_whitespace();
    let hour = parts.next()?.parse::<u8>().ok()?;
    let minute = parts.next()?.parse::<u8>().ok()?;
    if parts.next().is_some() || hour >= 24 || minute >= 60 {
        return None;
    }
    Some((hour, minute))
}
