//! Interpreter interface boundary.
//!
//! The machine talks to the outside world exclusively through the
//! [Interface] trait: printing, line and key input, cursor and window
//! control, the status line, and snapshot storage.  Units (rows, columns,
//! string widths) are interface-defined but must be stable for a session.
//! Errors raised by the interface propagate as machine failures.
use crate::{error::RuntimeError, zmachine::snapshot::Snapshot};

/// A line of input from the interface.
#[derive(Debug, Eq, PartialEq)]
pub struct InputLine {
    /// Input characters: ZSCII bytes or Unicode scalar values
    input: Vec<u16>,
    /// Terminating character, or [None] when input has ended for good
    terminator: Option<u16>,
}

impl InputLine {
    /// Constructor
    ///
    /// # Arguments
    /// * `input` - Input characters
    /// * `terminator` - Terminating character; [None] signals end of input,
    ///   which the machine treats as a quit request
    pub fn new(input: &[u16], terminator: Option<u16>) -> InputLine {
        InputLine {
            input: input.to_vec(),
            terminator,
        }
    }

    pub fn input(&self) -> &[u16] {
        &self.input
    }

    pub fn terminator(&self) -> Option<u16> {
        self.terminator
    }
}

/// The capability set the machine requires of its embedder.
pub trait Interface {
    /// Screen height in rows
    fn rows(&self) -> u8;

    /// Screen width in columns
    fn columns(&self) -> u8;

    /// Print text to the current window
    fn print(&mut self, text: &str) -> Result<(), RuntimeError>;

    /// Print a single character to the current window
    fn print_char(&mut self, c: char) -> Result<(), RuntimeError>;

    /// Print a line break
    fn new_line(&mut self) -> Result<(), RuntimeError>;

    /// Read a line of input.
    ///
    /// # Arguments
    /// * `max_len` - Maximum number of characters to accept
    /// * `terminators` - ZSCII characters that terminate input, in addition
    ///   to newline
    fn read_line(&mut self, max_len: usize, terminators: &[u16])
        -> Result<InputLine, RuntimeError>;

    /// Read a single keypress.  [None] signals end of input.
    fn read_key(&mut self) -> Result<Option<u16>, RuntimeError>;

    /// Move the cursor.  Row and column are 1-based.
    fn set_cursor(&mut self, row: u16, column: u16) -> Result<(), RuntimeError>;

    /// Select the active window
    fn set_window(&mut self, window: u16) -> Result<(), RuntimeError>;

    /// Erase a window; -1 unsplits and clears the screen
    fn erase_window(&mut self, window: i16) -> Result<(), RuntimeError>;

    /// Scroll a rectangular region up by one line
    fn scroll_region(
        &mut self,
        row: u16,
        column: u16,
        width: u16,
        height: u16,
    ) -> Result<(), RuntimeError>;

    /// Width of a string in interface units
    fn string_width(&self, text: &str) -> Result<u16, RuntimeError>;

    /// Draw the status line
    fn show_status(&mut self, left: &str, right: &str) -> Result<(), RuntimeError>;

    /// Persist a snapshot
    ///
    /// # Returns
    /// `true` when the snapshot was stored
    fn save(&mut self, snapshot: &Snapshot) -> Result<bool, RuntimeError>;

    /// Recall a persisted snapshot, or [None] when there is nothing to restore
    fn restore(&mut self) -> Result<Option<Snapshot>, RuntimeError>;
}
