use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the compile driver. Each maps to a process exit code.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("error: cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error: cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error: cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Already rendered with location, source line and caret.
    #[error("{0}")]
    Syntax(String),
}

impl DriverError {
    pub fn code(&self) -> i32 {
        match self {
            DriverError::Read { .. } | DriverError::CreateDir { .. } | DriverError::Write { .. } => 1,
            DriverError::Syntax(_) => 2,
        }
    }
}
