//! Pick the authoring form for a question type.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use exercisekit_core::config::ExerciseConfig;
use exercisekit_core::data::QuestionData;
use exercisekit_core::model::QuestionType;

use crate::form::{AuthoringForm, ChangeSink, Emitter, FormWarning};
use crate::forms::{
    AudioReadingForm, CompletionForm, DrawingForm, MatchingForm, MultipleChoiceForm,
    OrderingForm, PuzzleForm,
};

/// Types with an authoring form.
pub const AUTHORABLE: [QuestionType; 7] = [
    QuestionType::Matching,
    QuestionType::Completion,
    QuestionType::MultipleChoice,
    QuestionType::Ordering,
    QuestionType::Drawing,
    QuestionType::Puzzle,
    QuestionType::AudioReading,
];

pub fn supports(kind: QuestionType) -> bool {
    AUTHORABLE.contains(&kind)
}

/// Any of the built-in forms.
pub enum AnyForm {
    Matching(MatchingForm),
    Completion(CompletionForm),
    MultipleChoice(MultipleChoiceForm),
    Ordering(OrderingForm),
    Drawing(DrawingForm),
    Puzzle(PuzzleForm),
    AudioReading(AudioReadingForm),
}

macro_rules! each_form {
    ($self:expr, $form:ident => $body:expr) => {
        match $self {
            AnyForm::Matching($form) => $body,
            AnyForm::Completion($form) => $body,
            AnyForm::MultipleChoice($form) => $body,
            AnyForm::Ordering($form) => $body,
            AnyForm::Drawing($form) => $body,
            AnyForm::Puzzle($form) => $body,
            AnyForm::AudioReading($form) => $body,
        }
    };
}

impl AuthoringForm for AnyForm {
    fn question_type(&self) -> QuestionType {
        each_form!(self, f => f.question_type())
    }

    fn question_data(&self) -> QuestionData {
        each_form!(self, f => f.question_data())
    }

    fn validate(&self) -> Vec<FormWarning> {
        each_form!(self, f => f.validate())
    }

    fn emitter(&mut self) -> &mut Emitter {
        each_form!(self, f => f.emitter())
    }
}

/// Build the form for `kind`, seeded from previously-saved `questionData`.
///
/// Returns `None` for types without a form.
pub fn form_for(
    kind: QuestionType,
    initial: Option<&Value>,
    on_change: ChangeSink,
    delay: Duration,
) -> Option<AnyForm> {
    let emitter = Emitter::new(on_change, delay);
    let form = match kind {
        QuestionType::Matching => AnyForm::Matching(MatchingForm::new(initial, emitter)),
        QuestionType::Completion => AnyForm::Completion(CompletionForm::new(initial, emitter)),
        QuestionType::MultipleChoice => {
            AnyForm::MultipleChoice(MultipleChoiceForm::new(initial, emitter))
        }
        QuestionType::Ordering => AnyForm::Ordering(OrderingForm::new(initial, emitter)),
        QuestionType::Drawing => AnyForm::Drawing(DrawingForm::new(initial, emitter)),
        QuestionType::Puzzle => AnyForm::Puzzle(PuzzleForm::new(initial, emitter)),
        QuestionType::AudioReading => {
            AnyForm::AudioReading(AudioReadingForm::new(initial, emitter))
        }
        other => {
            debug!(question_type = %other, "no authoring form");
            return None;
        }
    };
    Some(form)
}

/// [`form_for`] with the configured debounce delay.
pub fn form_for_config(
    kind: QuestionType,
    initial: Option<&Value>,
    on_change: ChangeSink,
    config: &ExerciseConfig,
) -> Option<AnyForm> {
    form_for(kind, initial, on_change, Duration::from_millis(config.debounce_ms))
}
