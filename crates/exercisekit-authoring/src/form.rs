//! The shared authoring-form contract.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use exercisekit_core::data::{QuestionData, QuestionPayload};
use exercisekit_core::model::QuestionType;
use exercisekit_core::normalize::decode_question_data;

use crate::debounce::Debouncer;
use crate::error::FormError;

/// Receives every `questionData` a form emits.
pub type ChangeSink = Arc<dyn Fn(QuestionData) + Send + Sync>;

/// A non-blocking validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormWarning {
    /// Dotted path of the offending field, e.g. `pairs[1].left`.
    pub field: String,
    pub message: String,
}

impl FormWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FormWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Delivers form output, either now or after the debounce delay.
///
/// An immediate emission cancels any pending debounced one.
pub struct Emitter {
    sink: ChangeSink,
    debouncer: Debouncer,
}

impl Emitter {
    pub fn new(sink: ChangeSink, delay: Duration) -> Self {
        Self {
            sink,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn immediate(&mut self, data: QuestionData) {
        self.debouncer.cancel();
        (self.sink)(data);
    }

    pub fn debounced(&mut self, data: QuestionData) {
        let sink = Arc::clone(&self.sink);
        self.debouncer.schedule(move || sink(data));
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

/// A configuration form for one question type.
pub trait AuthoringForm: Send {
    fn question_type(&self) -> QuestionType;

    /// The payload as it stands, in the shape the widget reads.
    fn question_data(&self) -> QuestionData;

    /// Required-but-empty fields. Never blocks emission.
    fn validate(&self) -> Vec<FormWarning>;

    fn emitter(&mut self) -> &mut Emitter;

    /// Emit the current payload now.
    fn flush(&mut self) {
        let data = self.question_data();
        self.emitter().immediate(data);
    }

    /// Emit the current payload after the debounce delay.
    fn flush_debounced(&mut self) {
        let data = self.question_data();
        self.emitter().debounced(data);
    }

    fn question_value(&self) -> Value {
        self.question_data().to_value()
    }
}

/// Decode previously-saved `questionData`, or start from the default payload.
pub(crate) fn initial_payload<T: QuestionPayload>(initial: Option<&Value>) -> T {
    let Some(value) = initial else {
        return T::default();
    };
    let decoded = decode_question_data(T::KIND, Some(value));
    for warning in &decoded.warnings {
        warn!(question_type = %T::KIND, "{warning}");
    }
    T::from_question_data(decoded.data).unwrap_or_default()
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Refuse a removal that would go below `minimum` entries.
pub(crate) fn check_floor(
    question_type: QuestionType,
    len: usize,
    minimum: usize,
    noun: &'static str,
) -> Result<(), FormError> {
    if len <= minimum {
        Err(FormError::MinimumCardinality {
            question_type,
            minimum,
            noun,
        })
    } else {
        Ok(())
    }
}

/// Index of the entry with `id`, or an `UnknownEntry` error.
pub(crate) fn position_of<T>(
    entries: &[T],
    id: &str,
    entry_id: impl Fn(&T) -> &str,
    noun: &'static str,
) -> Result<usize, FormError> {
    entries
        .iter()
        .position(|e| entry_id(e) == id)
        .ok_or_else(|| FormError::UnknownEntry {
            noun,
            id: id.to_string(),
        })
}

/// Warn when a trimmed field is empty.
pub(crate) fn require(warnings: &mut Vec<FormWarning>, field: String, value: &str, what: &str) {
    if value.trim().is_empty() {
        warnings.push(FormWarning::new(field, format!("{what} is required")));
    }
}
