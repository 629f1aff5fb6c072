//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::score::ScoreError;

use crate::sessions::SessionState;
use crate::source::{ContentError, ReportError};

/// Errors emitted by the session subsystem.
///
/// None of these are fatal: every variant is a local, recoverable condition
/// reported to the caller without corrupting session state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("operation requires a session that is {expected}, but it is {actual}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("no answer selected for the current question")]
    NoSelection,

    #[error("no further question to advance to")]
    OutOfRange,

    #[error("selected option {index} is out of range (0..{limit})")]
    InvalidSelection { index: usize, limit: usize },

    #[error("session completed without a final report")]
    MissingReport,

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
