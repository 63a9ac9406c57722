use std::process::ExitCode;

/// Non-zero process exit statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Configuration or discovery errors
    ConfigInvalid = 1,
    /// Parse, schema or constraint errors
    DataInvalid = 2,
    ExportFailure = 3,
    /// Tidy errors, or files that need tidying in check mode
    TidyFailure = 4,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// A failure that has already been reported to the user
#[derive(Debug, thiserror::Error)]
#[error("stopped with exit status {}", .status.code())]
pub struct Halt {
    pub status: ExitStatus,
}

/// Stop the command with `status`
pub fn halt<T>(status: ExitStatus) -> anyhow::Result<T> {
    Err(Halt { status }.into())
}
