//! Core data model types for exercisekit.
//!
//! These are the types every other crate builds on: the closed set of
//! question type tags, the canonical (camelCase) question view produced by
//! the normalizer, and the submission record a learner's responses belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::response::Response;

/// The exercise type tag carried by every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Matching,
    Completion,
    Drawing,
    MultipleChoice,
    Ordering,
    Sorting,
    Categorization,
    Puzzle,
    Identification,
    Counting,
    Tracing,
    LetterTracing,
    Coloring,
    AudioReading,
}

impl QuestionType {
    /// Every tag, in declaration order.
    pub const ALL: [QuestionType; 14] = [
        QuestionType::Matching,
        QuestionType::Completion,
        QuestionType::Drawing,
        QuestionType::MultipleChoice,
        QuestionType::Ordering,
        QuestionType::Sorting,
        QuestionType::Categorization,
        QuestionType::Puzzle,
        QuestionType::Identification,
        QuestionType::Counting,
        QuestionType::Tracing,
        QuestionType::LetterTracing,
        QuestionType::Coloring,
        QuestionType::AudioReading,
    ];

    /// The wire tag, e.g. `MULTIPLE_CHOICE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Matching => "MATCHING",
            QuestionType::Completion => "COMPLETION",
            QuestionType::Drawing => "DRAWING",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Ordering => "ORDERING",
            QuestionType::Sorting => "SORTING",
            QuestionType::Categorization => "CATEGORIZATION",
            QuestionType::Puzzle => "PUZZLE",
            QuestionType::Identification => "IDENTIFICATION",
            QuestionType::Counting => "COUNTING",
            QuestionType::Tracing => "TRACING",
            QuestionType::LetterTracing => "LETTER_TRACING",
            QuestionType::Coloring => "COLORING",
            QuestionType::AudioReading => "AUDIO_READING",
        }
    }

    /// Tags that share a widget with another tag map onto that tag.
    ///
    /// `CATEGORIZATION` is rendered by the sorting widget and
    /// `LETTER_TRACING` by the tracing widget.
    pub fn widget_kind(&self) -> QuestionType {
        match self {
            QuestionType::Categorization => QuestionType::Sorting,
            QuestionType::LetterTracing => QuestionType::Tracing,
            other => *other,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_uppercase().replace(['-', ' '], "_");
        QuestionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| format!("unknown question type: {s}"))
    }
}

/// The canonical view of a raw question.
///
/// Produced by [`crate::normalize::normalize_question`]. Every field is in
/// camelCase on the wire; fields that were absent upstream stay `None`.
/// Unrecognised fields are carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuestion {
    /// Opaque question identifier. Empty when the raw question had none.
    #[serde(default)]
    pub id: String,
    /// The raw type tag, kept as a string so unknown tags survive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    /// Prompt shown to the learner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    /// Type-dependent payload, undecoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_data: Option<Value>,
    /// Position of the question inside its assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_incorrect: Option<String>,
    /// Fields the normalizer does not know about, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedQuestion {
    /// Parse the type tag, if present and known.
    pub fn kind(&self) -> Option<QuestionType> {
        self.question_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// The prompt, or an empty string.
    pub fn text(&self) -> &str {
        self.question_text.as_deref().unwrap_or_default()
    }
}

/// Lifecycle state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Submitted,
    Graded,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// A learner's attempt at an assignment: one response per answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub assignment_id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub status: SubmissionStatus,
    /// When the learner opened the assignment.
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Score recorded by the persistence layer, if graded.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Submission {
    /// The response for a question, if the learner saved one.
    pub fn response_for(&self, question_id: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }
}
