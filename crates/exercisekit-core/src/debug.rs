//! Question data debug overlay.
//!
//! A developer-facing summary of one raw question: the resolved type, a
//! prompt preview, whether a payload exists, which casing pairs disagree,
//! and the raw JSON. Built only outside production.

use std::fmt;

use serde_json::Value;

use crate::config::Environment;
use crate::normalize::{casing_mismatches, normalize_question, CasingMismatch};

const PREVIEW_CHARS: usize = 20;

/// Debug summary of a raw question.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    pub id: String,
    /// The normalized type tag, if any.
    pub question_type: Option<String>,
    /// The snake_case type tag, when it differs from the normalized one.
    pub snake_question_type: Option<String>,
    /// First 20 characters of the prompt, with `...` when truncated.
    pub text_preview: Option<String>,
    pub has_question_data: bool,
    pub mismatches: Vec<CasingMismatch>,
    /// The raw question, pretty-printed.
    pub raw_json: String,
}

impl DebugOverlay {
    /// Build the overlay unconditionally.
    pub fn build(raw: &Value) -> Self {
        let question = normalize_question(raw);
        let mismatches = casing_mismatches(raw);
        let snake_question_type = mismatches
            .iter()
            .find(|m| m.camel == "questionType")
            .map(|m| display_value(&m.snake_value));

        Self {
            id: question.id.clone(),
            question_type: question.question_type.clone(),
            snake_question_type,
            text_preview: question.question_text.as_deref().map(preview),
            has_question_data: question.question_data.is_some(),
            mismatches,
            raw_json: serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string()),
        }
    }

    /// Build the overlay only when the environment shows debug detail.
    pub fn for_environment(environment: Environment, raw: &Value) -> Option<Self> {
        environment.shows_debug().then(|| Self::build(raw))
    }

    /// Whether the given camelCase field disagrees with its snake_case twin.
    pub fn differs(&self, camel: &str) -> bool {
        self.mismatches.iter().any(|m| m.camel == camel)
    }
}

impl fmt::Display for DebugOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Question Data Debugger")?;
        writeln!(f, "ID: {}", self.id)?;

        write!(f, "Type: {}", self.question_type.as_deref().unwrap_or("null"))?;
        if let Some(snake) = &self.snake_question_type {
            write!(f, " (snake_case: {snake})")?;
        }
        writeln!(f)?;

        match &self.text_preview {
            Some(text) => write!(f, "Text: \"{text}\"")?,
            None => write!(f, "Text: null")?,
        }
        if self.differs("questionText") {
            write!(f, " (snake_case differs)")?;
        }
        writeln!(f)?;

        write!(
            f,
            "Has Question Data: {}",
            if self.has_question_data { "Yes" } else { "No" }
        )?;
        if self.differs("questionData") {
            write!(f, " (snake_case differs)")?;
        }
        writeln!(f)?;

        for m in self
            .mismatches
            .iter()
            .filter(|m| !matches!(m.camel, "questionType" | "questionText" | "questionData"))
        {
            writeln!(f, "Mismatch: {} differs from {}", m.camel, m.snake)?;
        }

        writeln!(f, "Raw Question Data:")?;
        write!(f, "{}", self.raw_json)
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
