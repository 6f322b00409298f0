//! Advisory scoring and submission summaries.
//!
//! Scores computed here are local and presentational. They are never the
//! authoritative grade.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// `correct` out of `total` answer-key checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Count passing checks.
    pub fn from_checks(checks: impl IntoIterator<Item = bool>) -> Self {
        checks.into_iter().fold(Score::default(), |acc, ok| Score {
            correct: acc.correct + u32::from(ok),
            total: acc.total + 1,
        })
    }

    /// A single check worth the whole question.
    pub fn all_or_nothing(correct: bool) -> Self {
        Self::new(u32::from(correct), 1)
    }

    /// Rounded percentage. An empty answer key scores 100.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        percent(self.correct as usize, self.total as usize)
    }

    pub fn is_perfect(&self) -> bool {
        self.correct >= self.total
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score {
            correct: self.correct + rhs.correct,
            total: self.total + rhs.total,
        }
    }
}

/// `part / whole` as a percentage, rounded half away from zero, capped at 100.
/// Returns 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let value = (part as f64 / whole as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u32
}

/// How a question fared when a saved response was replayed through its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A response exists and passes the widget's save gate.
    Answered,
    /// A response exists but the widget would refuse to save it.
    Incomplete,
    /// No response was saved for the question.
    Unanswered,
    /// The question's type has no widget.
    Unsupported,
}

/// Per-question result of replaying a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub question_type: String,
    pub status: OutcomeStatus,
    /// Answer-key score, when the widget has an answer key.
    pub score: Option<Score>,
    /// The envelope's advisory correctness flag.
    pub is_correct: Option<bool>,
    /// The save-gate message for incomplete responses.
    pub notice: Option<String>,
}

/// Aggregate over every question in a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub questions: usize,
    pub answered: usize,
    pub incomplete: usize,
    pub unanswered: usize,
    pub unsupported: usize,
    /// Questions whose score is perfect.
    pub perfect: usize,
    /// Sum of all answer-key scores.
    pub points: Score,
    /// Rounded percentage of `points`; 0 when nothing was scored.
    pub percentage: u32,
}

impl SubmissionSummary {
    pub fn from_outcomes(outcomes: &[QuestionOutcome]) -> Self {
        let mut summary = SubmissionSummary {
            questions: outcomes.len(),
            ..Default::default()
        };
        let mut scored = 0usize;

        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Answered => summary.answered += 1,
                OutcomeStatus::Incomplete => summary.incomplete += 1,
                OutcomeStatus::Unanswered => summary.unanswered += 1,
                OutcomeStatus::Unsupported => summary.unsupported += 1,
            }
            if let Some(score) = outcome.score {
                scored += 1;
                summary.points = summary.points + score;
                if score.is_perfect() {
                    summary.perfect += 1;
                }
            }
        }

        summary.percentage = if scored == 0 {
            0
        } else {
            summary.points.percentage()
        };
        summary
    }
}
