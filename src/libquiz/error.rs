use thiserror::Error;

use crate::libquiz::session::Phase;

/// Failures the quiz core can report. All of them are recoverable and
/// returned to the caller; the view logs them rather than crashing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("'{op}' is not valid in the {phase:?} phase")]
    InvalidTransition { op: &'static str, phase: Phase },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("answer slot {index} is out of range for a question with {options} options")]
    InvalidAnswerIndex { index: usize, options: usize },

    #[error("invalid question: {0}")]
    InvalidQuestion(String),
}
