//! Process exit statuses.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | success (including printed help) |
//! | 1    | usage error: unknown or missing command, bad arguments |
//! | 2    | validation failure: schema violations found |
//! | 3    | conversion or I/O failure |
//! | 4    | input is not well-formed |
//! | 70   | command tree construction defect |
//!
//! The mapping from [`ErrorCategory`] is fixed; scripts may rely on it.

use crate::ErrorCategory;

/// Exit status of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    pub const USAGE: ExitStatus = ExitStatus(1);
    pub const INVALID: ExitStatus = ExitStatus(2);
    pub const IO: ExitStatus = ExitStatus(3);
    pub const PARSE: ExitStatus = ExitStatus(4);
    /// Internal software error (BSD `EX_SOFTWARE`).
    pub const SOFTWARE: ExitStatus = ExitStatus(70);

    pub fn code(self) -> i32 {
        self.0
    }
}

impl From<ErrorCategory> for ExitStatus {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Usage => Self::USAGE,
            ErrorCategory::SchemaViolation => Self::INVALID,
            ErrorCategory::Format | ErrorCategory::Io => Self::IO,
            ErrorCategory::Parse => Self::PARSE,
            ErrorCategory::Construction => Self::SOFTWARE,
        }
    }
}
