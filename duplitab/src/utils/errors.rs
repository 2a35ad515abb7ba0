//! Error types for duplicity invocation and report parsing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuplitabError {
    /// duplicity exited non-zero. Displays as the captured output verbatim.
    #[error("{output}")]
    CommandFailed {
        /// Exit code, `None` when the process was killed by a signal
        status: Option<i32>,
        /// Merged stdout and stderr
        output: String,
    },

    #[error("Failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected collection-status output: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DuplitabError {
    /// Captured duplicity output of a failed command.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

/// A collection-status report did not have the expected shape.
///
/// Line numbers are 1-based and count from the start of the whole report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no 'Archive dir:' line")]
    MissingArchiveDir,

    #[error("no primary backup chain block delimited by separator lines")]
    MissingPrimaryChain,

    #[error("primary chain has no 'Num volumes:' header")]
    MissingSetListing,

    #[error("malformed backup set at line {line}: {text:?}")]
    MalformedSetLine { line: usize, text: String },

    #[error("invalid timestamp at line {line}: {text:?} ({reason})")]
    InvalidTimestamp {
        line: usize,
        text: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DuplitabError>;
