//! Status display abstraction for the operator-facing status surface.
//!
//! This module defines the [`StatusDisplay`] trait for pushing short status
//! text (mode, station, heading, speed) to a character display or serial
//! console.

/// Display trait for the shuttle status surface.
///
/// Implementors accept short text lines. The controller only pushes a new
/// line on a meaningful state change (see [`crate::status::StatusReporter`]);
/// the display is expected to blank itself after roughly 10 seconds without
/// a push to avoid burn-in. That lifecycle is the display's obligation, not
/// the controller's.
///
/// # Example
///
/// ```ignore
/// use rs_shuttle::traits::StatusDisplay;
///
/// struct SerialDisplay { /* ... */ }
///
/// impl StatusDisplay for SerialDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn show_status(&mut self, line: &str) -> Result<(), ()> {
///         // Write the line to the display...
///         Ok(())
///     }
///     fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait StatusDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware.
    ///
    /// Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Shows the current shuttle status line.
    ///
    /// Pushed only when the status actually changed, so implementations
    /// may treat every call as a fresh render.
    fn show_status(&mut self, line: &str) -> Result<(), Self::Error>;

    /// Shows a free-form message (e.g., for startup or the locate prompt).
    ///
    /// # Arguments
    ///
    /// * `line1` - First line of text
    /// * `line2` - Optional second line of text
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
