//! Authoring form error types.

use thiserror::Error;

use exercisekit_core::model::QuestionType;

/// Edits a form refuses to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Removing the entry would leave fewer than the type allows.
    #[error("{question_type} needs at least {minimum} {noun}")]
    MinimumCardinality {
        question_type: QuestionType,
        minimum: usize,
        noun: &'static str,
    },

    /// No entry with the given id.
    #[error("no {noun} with id {id}")]
    UnknownEntry { noun: &'static str, id: String },

    /// An index outside the entry list.
    #[error("{noun} index {index} is out of range")]
    OutOfRange { noun: &'static str, index: usize },
}
