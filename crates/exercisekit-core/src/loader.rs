//! JSON question-set loader and validation.
//!
//! A question-set file is either a bare JSON array of raw questions or an
//! object with a `questions` array (plus optional `id`/`name`). Raw
//! questions are kept as JSON so the normalizer sees exactly what the
//! upstream source produced.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::data::QuestionData;
use crate::model::Submission;
use crate::normalize::{casing_mismatches, prepare_question};

/// A named collection of raw questions.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub id: String,
    pub name: String,
    pub questions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionSetFile {
    Bare(Vec<Value>),
    Named {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        questions: Vec<Value>,
    },
}

/// Parse a single JSON file into a `QuestionSet`.
pub fn load_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a JSON string into a `QuestionSet`. The file stem names sets that
/// do not carry their own id or name.
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: QuestionSetFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions".to_string());

    Ok(match parsed {
        QuestionSetFile::Bare(questions) => QuestionSet {
            id: stem.clone(),
            name: stem,
            questions,
        },
        QuestionSetFile::Named {
            id,
            name,
            questions,
        } => {
            let id = id.unwrap_or_else(|| stem.clone());
            QuestionSet {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                questions,
            }
        }
    })
}

/// Recursively load all `.json` question sets from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a question set from a file, or every set below a directory.
pub fn load_questions(path: &Path) -> Result<Vec<QuestionSet>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![load_question_set(path)?])
    }
}

/// Load a submission JSON file.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submission: {}", path.display()))
}

/// A warning from question-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common authoring issues.
///
/// Nothing reported here prevents a question from rendering; these are the
/// problems a teacher would want to fix before publishing.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for raw in &set.questions {
        let prepared = prepare_question(raw);
        let question = &prepared.question;
        let id = (!question.id.is_empty()).then(|| question.id.clone());
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: id.clone(),
                message,
            })
        };

        if question.id.is_empty() {
            warn("question has no id".into());
        } else if !seen_ids.insert(question.id.clone()) {
            warn(format!("duplicate question ID: {}", question.id));
        }

        if question.text().trim().is_empty() {
            warn("questionText is empty".into());
        }

        for mismatch in casing_mismatches(raw) {
            warn(format!(
                "{} and {} differ; {} is used",
                mismatch.camel, mismatch.snake, mismatch.camel
            ));
        }

        for message in prepared.warnings {
            warn(message);
        }

        if let Some(data) = &prepared.data {
            for message in check_answer_key(data) {
                warn(message);
            }
        }
    }

    warnings
}

/// Answer-key problems that decode cleanly but leave a widget unplayable
/// or unscorable.
fn check_answer_key(data: &QuestionData) -> Vec<String> {
    let mut problems = Vec::new();
    match data {
        QuestionData::Matching(d) if d.pairs.len() < 2 => {
            problems.push(format!("matching needs at least 2 pairs, found {}", d.pairs.len()));
        }
        QuestionData::Completion(d) => {
            if d.blanks.is_empty() {
                problems.push("completion has no blanks".into());
            }
            for blank in d.blanks.iter().filter(|b| b.answer.trim().is_empty()) {
                problems.push(format!("blank {} has no answer", blank.id));
            }
        }
        QuestionData::MultipleChoice(d) => {
            if d.options.len() < 2 {
                problems.push(format!(
                    "multiple choice needs at least 2 options, found {}",
                    d.options.len()
                ));
            }
            let correct = d.options.iter().filter(|o| o.is_correct).count();
            if correct == 0 {
                problems.push("no option is marked correct".into());
            } else if correct > 1 && !d.allow_multiple {
                problems.push(format!(
                    "{correct} options are marked correct but allowMultiple is false"
                ));
            }
        }
        QuestionData::Ordering(d) => {
            if d.items.len() < 2 {
                problems.push(format!("ordering needs at least 2 items, found {}", d.items.len()));
            }
            let mut positions: Vec<u32> = d.items.iter().map(|i| i.correct_position).collect();
            positions.sort_unstable();
            if positions.iter().enumerate().any(|(i, p)| *p as usize != i) {
                problems.push("correctPosition values are not 0..n".into());
            }
        }
        QuestionData::Sorting(d) => {
            let categories: HashSet<&str> = d.categories.iter().map(|c| c.id.as_str()).collect();
            for item in &d.items {
                if !categories.contains(item.correct_category_id.as_str()) {
                    problems.push(format!(
                        "item {} points at unknown category {:?}",
                        item.id, item.correct_category_id
                    ));
                }
            }
        }
        QuestionData::Counting(d) => {
            if d.min_count > d.max_count {
                problems.push(format!(
                    "minCount {} is greater than maxCount {}",
                    d.min_count, d.max_count
                ));
            } else if d.correct_count < d.min_count || d.correct_count > d.max_count {
                problems.push(format!(
                    "correctCount {} is outside {}..={}",
                    d.correct_count, d.min_count, d.max_count
                ));
            }
        }
        QuestionData::Identification(d) => {
            for item in d.items_to_identify.iter().filter(|i| i.radius <= 0.0) {
                problems.push(format!("item {} has no hit radius", item.id));
            }
        }
        QuestionData::Puzzle(d) if d.pieces < 2 => {
            problems.push(format!("puzzle needs at least 2 pieces, found {}", d.pieces));
        }
        _ => {}
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_SET: &str = r#"{
        "id": "animals",
        "name": "Animal sounds",
        "questions": [
            {
                "id": "q1",
                "questionType": "MATCHING",
                "questionText": "Match the animal to its sound",
                "questionData": {
                    "pairs": [
                        { "id": "1", "left": "Dog", "right": "Woof" },
                        { "id": "2", "left": "Cat", "right": "Meow" }
                    ]
                }
            },
            {
                "id": "q2",
                "question_type": "COUNTING",
                "question_text": "How many apples?",
                "question_data": { "correct_count": 5, "min_count": 0, "max_count": 10 }
            }
        ]
    }"#;

    #[test]
    fn parse_named_set() {
        let set = parse_question_set_str(VALID_SET, &PathBuf::from("x.json")).unwrap();
        assert_eq!(set.id, "animals");
        assert_eq!(set.name, "Animal sounds");
        assert_eq!(set.questions.len(), 2);
        assert!(validate_question_set(&set).is_empty());
    }

    #[test]
    fn parse_bare_array_uses_file_stem() {
        let set = parse_question_set_str(r#"[{ "id": "q1" }]"#, &PathBuf::from("dir/week-1.json"))
            .unwrap();
        assert_eq!(set.id, "week-1");
        assert_eq!(set.name, "week-1");
    }

    #[test]
    fn parse_malformed_json() {
        let result = parse_question_set_str("{ not json", &PathBuf::from("bad.json"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_reports_authoring_problems() {
        let set = parse_question_set_str(
            r#"[
                { "id": "q1", "questionType": "MULTIPLE_CHOICE", "questionText": "Pick",
                  "questionData": { "options": [{ "id": "a" }, { "id": "b" }] } },
                { "id": "q1", "questionType": "NOT_A_REAL_TYPE", "questionText": "?" },
                { "questionType": "ORDERING", "questionText": "",
                  "questionData": { "items": [{ "id": "a", "correctPosition": 0 }, { "id": "b", "correctPosition": 0 }] } },
                { "id": "q4", "questionText": "a", "question_text": "b", "questionType": "COUNTING",
                  "questionData": { "correctCount": 30 } }
            ]"#,
            &PathBuf::from("set.json"),
        )
        .unwrap();
        let warnings = validate_question_set(&set);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(messages.contains(&"no option is marked correct"));
        assert!(messages.contains(&"duplicate question ID: q1"));
        assert!(messages.contains(&"unknown question type: NOT_A_REAL_TYPE"));
        assert!(messages.contains(&"question has no id"));
        assert!(messages.contains(&"questionText is empty"));
        assert!(messages.contains(&"correctPosition values are not 0..n"));
        assert!(messages.contains(&"questionText and question_text differ; questionText is used"));
        assert!(messages.contains(&"correctCount 30 is outside 0..=20"));
        assert!(warnings
            .iter()
            .any(|w| w.question_id.is_none() && w.message == "question has no id"));
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.json"), VALID_SET).unwrap();
        std::fs::write(dir.path().join("bad.json"), "nope").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "animals");

        let sets = load_questions(&dir.path().join("good.json")).unwrap();
        assert_eq!(sets.len(), 1);
    }

    #[test]
    fn load_submission_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.json");
        std::fs::write(
            &path,
            r#"{ "id": "s1", "startedAt": "2026-03-01T09:00:00Z", "status": "SUBMITTED", "responses": [] }"#,
        )
        .unwrap();
        let submission = load_submission(&path).unwrap();
        assert_eq!(submission.id, "s1");
    }
}
