//! Rule table configuration errors.

use kore_common::Span;
use kore_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode};
use thiserror::Error;

/// A rule table that cannot be used.
///
/// Returned by [`StateTableBuilder::build`](crate::StateTableBuilder::build);
/// scanning itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("state `{0}` is defined more than once")]
    DuplicateState(String),

    #[error("root state `{0}` is not defined")]
    MissingRoot(String),

    #[error("state `{state}` refers to undefined state `{target}`")]
    UnknownState { state: String, target: String },

    #[error("cannot start scanning in undefined state `{0}`")]
    UnknownStartState(String),

    #[error("states include each other in a cycle: {}", path.join(" -> "))]
    IncludeCycle { path: Vec<String> },

    #[error(
        "rule {index} in state `{state}` assigns {kinds} token kind(s) but its pattern has {groups} capture group(s)"
    )]
    GroupCountMismatch {
        state: String,
        index: usize,
        kinds: usize,
        groups: usize,
    },

    #[error("rule {index} in state `{state}` has an invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        state: String,
        index: usize,
        pattern: String,
        message: String,
    },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::DuplicateState(_) => ErrorCode::DuplicateState,
            ConfigError::MissingRoot(_) => ErrorCode::MissingRoot,
            ConfigError::UnknownState { .. } | ConfigError::UnknownStartState(_) => {
                ErrorCode::UnknownState
            }
            ConfigError::IncludeCycle { .. } => ErrorCode::IncludeCycle,
            ConfigError::GroupCountMismatch { .. } => ErrorCode::GroupCountMismatch,
            ConfigError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
        }
    }

    /// Report the error as a `Config` diagnostic. A table has no source
    /// buffer, so the span is a dummy.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Config, Span::DUMMY, self.to_string())
            .with_code(self.code())
    }
}
