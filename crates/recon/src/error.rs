use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error for a profile.
    ProfileParse(String),
    /// Profile validation error (bad column list, unknown risk column, etc.).
    ProfileValidation(String),
    /// Reference data lacks a column the profile schema requires.
    MissingColumn { column: String },
    /// Reference table loaded but contains zero data rows.
    EmptyReference,
    /// A reference row's width does not match the schema.
    RowWidth { row: usize, expected: usize, found: usize },
    /// IO error (reader failure, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileParse(msg) => write!(f, "profile parse error: {msg}"),
            Self::ProfileValidation(msg) => write!(f, "profile validation error: {msg}"),
            Self::MissingColumn { column } => {
                write!(f, "reference data: missing column '{column}'")
            }
            Self::EmptyReference => write!(f, "reference data contains no rows"),
            Self::RowWidth { row, expected, found } => {
                write!(f, "reference row {row}: expected {expected} columns, found {found}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
