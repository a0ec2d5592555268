use crate::roster::Roster;
use anyhow::Result;
use prompt_io::LineSource;
use std::io::Write;

/// What the menu loop should do after an action finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again.
    Continue,
    /// Leave the menu loop.
    Exit,
}

/// Object-safe trait for anything the menu can run.
///
/// Implemented for the built-in menu entries via a blanket impl; custom entries
/// can implement it directly.
pub trait MenuAction {
    /// Runs the action against the session's roster.
    ///
    /// An `Err` here is unexpected and ends the session. Expected conditions
    /// should be reported to `output` and answered with [`Flow::Continue`].
    fn execute(
        self: Box<Self>,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow>;
}

/// Factory that creates an action for a typed menu choice.
///
/// Returns `None` from [`ActionFactory::try_create`] when `choice` is not its key.
pub trait ActionFactory {
    /// Token the user types to pick this entry, e.g. `"1"`.
    fn key(&self) -> &'static str;

    /// Text shown next to the key in the menu.
    fn label(&self) -> &'static str;

    fn try_create(&self, choice: &str) -> Option<Box<dyn MenuAction>>;
}
