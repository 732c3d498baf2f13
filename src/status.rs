//! Operator status reporting: one-line state rendering, pushed on change.
//!
//! [`StatusLine`] is a value snapshot of everything the operator surface
//! shows (mode, station, heading, duty). [`StatusReporter`] compares each
//! iteration's line against the last one pushed and only touches the
//! display when something actually changed, so the 50 Hz control loop does
//! not hammer the display bus.

use core::fmt::Write as _;

use heapless::String;

use crate::automaton::Mode;
use crate::sensors::Station;
use crate::traits::{Direction, StatusDisplay};

/// Maximum rendered status line length in bytes.
pub const STATUS_LINE_LEN: usize = 64;

/// A display-worthy snapshot of the automaton state.
///
/// Equality is the "did anything change" test used by [`StatusReporter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLine {
    /// Current operating mode.
    pub mode: Mode,
    /// Current (or most recently confirmed) station.
    pub station: Option<Station>,
    /// Current travel heading.
    pub heading: Direction,
    /// Commanded motor duty.
    pub duty: u8,
}

impl StatusLine {
    /// Renders the line for the display, e.g. `RUN S1 right 255`.
    ///
    /// An unknown station renders as `S?`. The buffer is sized so the
    /// render cannot fail; a formatting error still degrades to whatever
    /// fit rather than panicking.
    pub fn render(&self) -> String<STATUS_LINE_LEN> {
        let mut line = String::new();
        let station = self.station.map(|s| s.label()).unwrap_or("S?");
        let _ = write!(
            line,
            "{} {} {} {}",
            self.mode.label(),
            station,
            self.heading.as_str(),
            self.duty
        );
        line
    }
}

/// Pushes status lines to a [`StatusDisplay`], suppressing no-ops.
///
/// # Example
///
/// ```rust
/// use rs_shuttle::status::{StatusLine, StatusReporter};
/// use rs_shuttle::hal::MockDisplay;
/// use rs_shuttle::{Direction, Mode, Station};
///
/// let mut reporter = StatusReporter::new(MockDisplay::new());
/// let line = StatusLine {
///     mode: Mode::Running,
///     station: Some(Station::LeftTerminus),
///     heading: Direction::Right,
///     duty: 255,
/// };
///
/// assert!(reporter.publish(line).unwrap());
/// assert!(!reporter.publish(line).unwrap()); // unchanged: suppressed
/// assert_eq!(reporter.display().status_lines.len(), 1);
/// ```
pub struct StatusReporter<D: StatusDisplay> {
    display: D,
    last: Option<StatusLine>,
}

impl<D: StatusDisplay> StatusReporter<D> {
    /// Creates a reporter with nothing yet pushed (the first publish
    /// always writes).
    pub fn new(display: D) -> Self {
        Self {
            display,
            last: None,
        }
    }

    /// Pushes `line` if it differs from the last pushed line.
    ///
    /// Returns whether the display was written.
    pub fn publish(&mut self, line: StatusLine) -> Result<bool, D::Error> {
        if self.last == Some(line) {
            return Ok(false);
        }
        self.display.show_status(line.render().as_str())?;
        self.last = Some(line);
        Ok(true)
    }

    /// Access the underlying display (mock inspection in tests).
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the underlying display, for out-of-band messages
    /// (menu prompts). Bypasses change suppression.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
