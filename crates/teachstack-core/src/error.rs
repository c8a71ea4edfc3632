use thiserror::Error;

#[derive(Debug, Error)]
pub enum TeachStackError {
    // -----------------------------------------------------------------------
    // Grammar: the command line itself is malformed
    // -----------------------------------------------------------------------
    #[error("invalid command format\nusage: {usage}")]
    InvalidCommandFormat { usage: &'static str },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("no command given: type 'help' for the command list")]
    EmptyCommand,

    #[error("marker {0} may only appear once per command")]
    DuplicateMarker(&'static str),

    // -----------------------------------------------------------------------
    // Constraint: a field value fails validation
    // -----------------------------------------------------------------------
    #[error("invalid name '{0}': names contain only letters, digits, and spaces, and must not be blank")]
    InvalidName(String),

    #[error("invalid student id '{0}': must be an uppercase letter, seven digits, then an uppercase letter, e.g. A0123456B")]
    InvalidStudentId(String),

    #[error("invalid email '{0}': must be local@domain with at least one dot in the domain")]
    InvalidEmail(String),

    #[error("invalid grade '{0}': must be one of A+ A A- B+ B B- C+ C C- D+ D D- F")]
    InvalidGrade(String),

    #[error("invalid group '{0}': groups are 1-50 letters, digits, and spaces")]
    InvalidGroup(String),

    // -----------------------------------------------------------------------
    // Domain: a well-formed command cannot be applied to the roster
    // -----------------------------------------------------------------------
    #[error("no student with id {0}")]
    StudentNotFound(String),

    #[error("no archived student with id {0}")]
    ArchivedStudentNotFound(String),

    #[error("a student with id {0} already exists")]
    DuplicateStudent(String),

    #[error("an archived student with id {0} already exists")]
    DuplicateArchivedStudent(String),

    #[error("group '{0}' has no members")]
    EmptyGroup(String),

    #[error("cannot draw {requested} students from a group of {available}")]
    BadDrawCount { requested: usize, available: usize },

    #[error("at least one field to edit must be provided")]
    NothingToEdit,

    // -----------------------------------------------------------------------
    // Storage
    // -----------------------------------------------------------------------
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse error taxonomy: which stage of command handling failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Grammar,
    Constraint,
    Domain,
    Storage,
}

impl TeachStackError {
    pub fn category(&self) -> ErrorCategory {
        use TeachStackError::*;
        match self {
            InvalidCommandFormat { .. } | UnknownCommand(_) | EmptyCommand | DuplicateMarker(_) => {
                ErrorCategory::Grammar
            }
            InvalidName(_) | InvalidStudentId(_) | InvalidEmail(_) | InvalidGrade(_)
            | InvalidGroup(_) => ErrorCategory::Constraint,
            StudentNotFound(_)
            | ArchivedStudentNotFound(_)
            | DuplicateStudent(_)
            | DuplicateArchivedStudent(_)
            | EmptyGroup(_)
            | BadDrawCount { .. }
            | NothingToEdit => ErrorCategory::Domain,
            MissingField(_) | Io(_) | Json(_) => ErrorCategory::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, TeachStackError>;
