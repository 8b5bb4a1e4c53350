//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::Application(ApplicationError::Tree(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Render { .. } => crate::exitcode::SOFTWARE,
                ApplicationError::Tree(tree) => match tree {
                    TreeError::NotFound(_) | TreeError::NotADirectory(_) => {
                        crate::exitcode::NOINPUT
                    }
                    TreeError::Load { .. }
                    | TreeError::IndexNotMapping(_)
                    | TreeError::NamespaceConflict { .. }
                    | TreeError::InvalidEntryName(_) => crate::exitcode::DATAERR,
                    TreeError::ConfigConflict(_) => crate::exitcode::CONFIG,
                    TreeError::Io { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}
