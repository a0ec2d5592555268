use thiserror::Error;

/// Expected, user-correctable conditions.
///
/// These are reported to the user and never end the menu loop. Anything else
/// surfacing from a menu handler is treated as unexpected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Invalid input. Please enter a non-empty student name containing only letters.")]
    InvalidName,

    #[error("Student {0} already exists.")]
    DuplicateStudent(String),

    #[error("Student {0} doesn't exist.")]
    StudentNotFound(String),

    #[error("Invalid input. Please enter a number.")]
    NotANumber,

    #[error("Invalid input. Grade must be between 0 and 100.")]
    GradeOutOfRange,

    #[error("Invalid choice. Please select one of the suggested options (1-5).")]
    InvalidChoice,

    /// Averaging an empty grade list. Every caller handles this.
    #[error("cannot average an empty set of grades")]
    EmptyGradeSet,
}

pub type RosterResult<T> = Result<T, RosterError>;
