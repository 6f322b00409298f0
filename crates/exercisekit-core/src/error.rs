//! Exercise error types.
//!
//! Nothing here is fatal to a learner: the dispatcher turns every variant
//! into a fallback view or a default widget state. The errors exist so the
//! caller (and the logs) can tell what went wrong.

use thiserror::Error;

use crate::model::QuestionType;

/// Errors raised while mounting a widget or loading its saved state.
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// No widget is registered for the tag.
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),

    /// A factory was handed a payload of the wrong kind.
    #[error("payload mismatch: widget expects {expected} data, got {found}")]
    PayloadMismatch {
        expected: QuestionType,
        found: QuestionType,
    },

    /// A saved `responseData` could not be read by the widget.
    #[error("malformed {question_type} response: {source}")]
    MalformedResponse {
        question_type: QuestionType,
        #[source]
        source: serde_json::Error,
    },

    /// The widget state could not be serialized.
    #[error("failed to package {question_type} response: {source}")]
    Packaging {
        question_type: QuestionType,
        #[source]
        source: serde_json::Error,
    },
}

impl ExerciseError {
    /// Returns `true` if the error comes from the question or response data
    /// rather than from how the dispatcher was wired.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ExerciseError::UnsupportedType(_) | ExerciseError::MalformedResponse { .. }
        )
    }
}
