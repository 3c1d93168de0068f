//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success (including zero reconciled rows)       |
//! | 1    | General error (unspecified)                    |
//! | 2    | CLI usage error (bad args, conflicting inputs) |
//! | 3    | IO error (file unreadable, cannot write)       |
//! | 4    | Extraction error (pdftotext, scanned PDF)      |
//! | 5    | Reference data unusable (schema, empty)        |
//! | 6    | Input file type rejected                       |

/// Success - command completed without errors. Zero matches is still
/// success; it is reported as an informational note.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// IO error - reference/input file unreadable, export not writable.
pub const EXIT_IO_ERROR: u8 = 3;

/// Extraction error - pdftotext missing/failing, image-only PDF.
pub const EXIT_EXTRACT_ERROR: u8 = 4;

/// Reference data unusable - missing required column or no data rows.
pub const EXIT_SCHEMA_ERROR: u8 = 5;

/// Input file rejected at selection time (extension not accepted).
pub const EXIT_INPUT_TYPE_ERROR: u8 = 6;
