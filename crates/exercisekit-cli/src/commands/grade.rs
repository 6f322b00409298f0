//! The `exercisekit grade` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use exercisekit_core::config::load_config_from;
use exercisekit_core::grading::grade_submission;
use exercisekit_core::loader::{load_question_set, load_submission};
use exercisekit_core::scoring::{OutcomeStatus, QuestionOutcome, SubmissionSummary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GradeReport<'a> {
    submission_id: &'a str,
    student_id: &'a str,
    outcomes: &'a [QuestionOutcome],
    summary: &'a SubmissionSummary,
}

pub fn execute(
    questions_path: PathBuf,
    submission_path: PathBuf,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let set = load_question_set(&questions_path)?;
    let submission = load_submission(&submission_path)?;

    let known: Vec<String> = set
        .questions
        .iter()
        .map(|raw| exercisekit_core::normalize::normalize_question(raw).id)
        .collect();
    for response in &submission.responses {
        if !known.contains(&response.question_id) {
            tracing::warn!(
                question_id = %response.question_id,
                "response does not belong to any question in {}",
                set.name
            );
        }
    }

    let dispatcher = exercisekit_widgets::standard_dispatcher(&config);
    let outcomes = grade_submission(&dispatcher, &set.questions, &submission);
    let summary = SubmissionSummary::from_outcomes(&outcomes);

    if json {
        let report = GradeReport {
            submission_id: &submission.id,
            student_id: &submission.student_id,
            outcomes: &outcomes,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Submission {} ({}) against {}",
        submission.id, submission.status, set.name
    );
    print_table(&outcomes);
    println!(
        "\n{} answered, {} incomplete, {} unanswered, {} unsupported",
        summary.answered, summary.incomplete, summary.unanswered, summary.unsupported
    );
    println!(
        "Score: {}/{} ({}%), {} of {} questions perfect",
        summary.points.correct,
        summary.points.total,
        summary.percentage,
        summary.perfect,
        summary.questions
    );

    Ok(())
}

fn status_label(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Answered => "answered",
        OutcomeStatus::Incomplete => "incomplete",
        OutcomeStatus::Unanswered => "unanswered",
        OutcomeStatus::Unsupported => "unsupported",
    }
}

fn print_table(outcomes: &[QuestionOutcome]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Status", "Score", "Correct", "Notice"]);

    for outcome in outcomes {
        let score = outcome
            .score
            .map(|s| format!("{}/{} ({}%)", s.correct, s.total, s.percentage()))
            .unwrap_or_else(|| "-".to_string());
        let correct = match outcome.is_correct {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        table.add_row(vec![
            Cell::new(&outcome.question_id),
            Cell::new(&outcome.question_type),
            Cell::new(status_label(outcome.status)),
            Cell::new(score),
            Cell::new(correct),
            Cell::new(outcome.notice.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");
}
