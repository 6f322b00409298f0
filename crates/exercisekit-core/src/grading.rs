//! Replay a saved submission through the widgets.
//!
//! Each saved `responseData` is restored into a freshly mounted widget, the
//! save gate is re-run, and the answer key is consulted. The result is the
//! same advisory view a teacher would see with answers shown.

use serde_json::Value;

use crate::dispatch::{DispatchProps, Dispatcher, Rendered};
use crate::model::Submission;
use crate::normalize::normalize_question;
use crate::scoring::{OutcomeStatus, QuestionOutcome, Score};

/// Grade every question against the submission's saved responses.
pub fn grade_submission(
    dispatcher: &Dispatcher,
    questions: &[Value],
    submission: &Submission,
) -> Vec<QuestionOutcome> {
    questions
        .iter()
        .map(|raw| grade_question(dispatcher, raw, submission))
        .collect()
}

fn grade_question(dispatcher: &Dispatcher, raw: &Value, submission: &Submission) -> QuestionOutcome {
    let question = normalize_question(raw);
    let mut outcome = QuestionOutcome {
        question_id: question.id.clone(),
        question_type: question.question_type.clone().unwrap_or_default(),
        status: OutcomeStatus::Unsupported,
        score: None,
        is_correct: None,
        notice: None,
    };

    let props = DispatchProps::default().show_answers(true);
    let mut mounted = match dispatcher.dispatch(raw, props) {
        Rendered::Exercise(mounted) => mounted,
        Rendered::Unsupported(_) => return outcome,
    };

    let Some(response) = submission.response_for(&question.id) else {
        outcome.status = OutcomeStatus::Unanswered;
        outcome.score = mounted.score().map(|s| Score::new(0, s.total));
        return outcome;
    };

    if let Err(e) = mounted.widget_mut().load_response(&response.response_data) {
        tracing::warn!(question_id = %question.id, "{e}");
        outcome.status = OutcomeStatus::Incomplete;
        outcome.score = mounted.score().map(|s| Score::new(0, s.total));
        outcome.notice = Some(e.to_string());
        return outcome;
    }

    match mounted.widget().save() {
        Ok(saved) => {
            outcome.status = OutcomeStatus::Answered;
            outcome.is_correct = saved.is_correct;
        }
        Err(notice) => {
            outcome.status = OutcomeStatus::Incomplete;
            outcome.notice = Some(notice.message);
        }
    }
    outcome.score = mounted.score();
    outcome
}
