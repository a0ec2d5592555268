//! Interactive student grade analyzer.
//!
//! An in-memory [`Roster`] of students and their grades, driven by a numbered
//! console menu. The roster validates and title-cases names, keeps them unique,
//! and computes per-student averages, a summary report and the top performer.
//!
//! The main entry point is [`Analyzer`], which owns the roster and runs the
//! menu loop over any [`prompt_io::LineSource`]. Expected problems (bad names,
//! bad grades, unknown choices) are reported as [`RosterError`] and the menu
//! keeps going; anything else stops the session.

mod analyzer;
pub mod command;
mod error;
mod menu;
mod name;
mod roster;

pub use analyzer::{Analyzer, SessionEnd};
pub use error::{RosterError, RosterResult};
pub use menu::EXIT_MESSAGE;
pub use name::{normalize_name, title_case};
pub use roster::{
    DONE_TOKEN, GradeEntry, GradeSubmission, MAX_GRADE, MIN_GRADE, NO_DATA_MESSAGE, Report,
    ReportLine, Roster, StudentRecord, Summary, TopStudent, calculate_average, parse_grade,
};
