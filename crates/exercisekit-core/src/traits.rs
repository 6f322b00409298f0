//! Core trait definitions for exercise widgets.
//!
//! Widgets are written against the typed [`Exercise`] trait and
//! implemented in the `exercisekit-widgets` crate. The dispatcher only
//! sees the object-safe [`Widget`] view, which every `Exercise` gets for
//! free, and builds widgets through a [`WidgetFactory`].

use std::any::Any;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{CanvasBackend, ExerciseConfig, PuzzleBoard, TracingSettings};
use crate::data::{QuestionData, QuestionPayload};
use crate::error::ExerciseError;
use crate::model::QuestionType;
use crate::notice::Notice;
use crate::scoring::Score;

// ---------------------------------------------------------------------------
// Mount inputs
// ---------------------------------------------------------------------------

/// Props shared by every widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetProps {
    /// Every interaction is ignored.
    pub read_only: bool,
    /// Reveal correctness against the answer key.
    pub show_answers: bool,
}

/// Deployment-level capabilities, resolved once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub canvas_backend: CanvasBackend,
    pub puzzle: PuzzleBoard,
    pub tracing: TracingSettings,
    /// Seed for shuffles and scatter; fresh entropy when `None`.
    pub shuffle_seed: Option<u64>,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext::from(&ExerciseConfig::default())
    }
}

impl From<&ExerciseConfig> for RenderContext {
    fn from(config: &ExerciseConfig) -> Self {
        Self {
            canvas_backend: config.canvas_backend,
            puzzle: config.puzzle,
            tracing: config.tracing,
            shuffle_seed: config.shuffle_seed,
        }
    }
}

/// Everything a widget receives when it is mounted.
#[derive(Debug, Clone, Copy)]
pub struct Mount<'a> {
    /// The tag the question was authored with, e.g. `LETTER_TRACING`.
    pub question_type: QuestionType,
    pub props: WidgetProps,
    pub context: &'a RenderContext,
}

// ---------------------------------------------------------------------------
// Typed exercise trait
// ---------------------------------------------------------------------------

/// The answer-state machine of one exercise type.
///
/// Interaction methods live on the concrete types; this trait covers the
/// lifecycle the dispatcher drives: initialize, restore, save, score, reset.
pub trait Exercise: Send + 'static {
    /// The decoded `questionData` this widget reads.
    type Data: QuestionPayload;
    /// The `responseData` shape this widget writes and reads back.
    type Response: Serialize + DeserializeOwned;

    /// Derive the default answer state from the question payload.
    fn mount(data: Self::Data, mount: &Mount<'_>) -> Self
    where
        Self: Sized;

    /// Replace the answer state with a previously saved response.
    fn restore(&mut self, response: Self::Response);

    /// The current answer state in its saved shape.
    fn response(&self) -> Self::Response;

    /// The save gate. `Err` carries the notice shown instead of saving.
    fn check_complete(&self) -> Result<(), Notice> {
        Ok(())
    }

    /// Advisory answer-key score, or `None` when the type has no answer key.
    fn score(&self) -> Option<Score>;

    /// Correctness the widget reports in the response envelope itself.
    fn envelope_correctness(&self) -> Option<bool> {
        None
    }

    /// Return to the initialize-time default.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Object-safe widget view
// ---------------------------------------------------------------------------

/// A packaged save: the `responseData` payload plus envelope correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedData {
    pub response_data: Value,
    pub is_correct: Option<bool>,
}

/// Type-erased widget, as held by the dispatcher.
pub trait Widget: Send {
    /// The widget kind, e.g. `SORTING` for a categorization question.
    fn kind(&self) -> QuestionType;

    /// Restore from a saved `responseData` value.
    fn load_response(&mut self, response_data: &Value) -> Result<(), ExerciseError>;

    /// The current `responseData`, without applying the save gate.
    fn response_data(&self) -> Result<Value, ExerciseError>;

    /// Apply the save gate and package the response.
    fn save(&self) -> Result<SavedData, Notice>;

    fn score(&self) -> Option<Score>;

    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Exercise> Widget for E {
    fn kind(&self) -> QuestionType {
        E::Data::KIND
    }

    fn load_response(&mut self, response_data: &Value) -> Result<(), ExerciseError> {
        let response: E::Response =
            serde_json::from_value(response_data.clone()).map_err(|source| {
                ExerciseError::MalformedResponse {
                    question_type: E::Data::KIND,
                    source,
                }
            })?;
        self.restore(response);
        Ok(())
    }

    fn response_data(&self) -> Result<Value, ExerciseError> {
        serde_json::to_value(Exercise::response(self)).map_err(|source| ExerciseError::Packaging {
            question_type: E::Data::KIND,
            source,
        })
    }

    fn save(&self) -> Result<SavedData, Notice> {
        self.check_complete()?;
        let response_data = self
            .response_data()
            .map_err(|e| Notice::error(format!("Could not save: {e}")))?;
        Ok(SavedData {
            response_data,
            is_correct: self.envelope_correctness(),
        })
    }

    fn score(&self) -> Option<Score> {
        Exercise::score(self)
    }

    fn reset(&mut self) {
        Exercise::reset(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

/// Builds a widget from a decoded payload.
pub trait WidgetFactory: Send + Sync {
    fn create(&self, data: QuestionData, mount: &Mount<'_>)
        -> Result<Box<dyn Widget>, ExerciseError>;
}

/// The factory for an [`Exercise`] type.
pub struct ExerciseFactory<E>(PhantomData<fn() -> E>);

impl<E> ExerciseFactory<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for ExerciseFactory<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Exercise> WidgetFactory for ExerciseFactory<E> {
    fn create(
        &self,
        data: QuestionData,
        mount: &Mount<'_>,
    ) -> Result<Box<dyn Widget>, ExerciseError> {
        let found = data.kind();
        let data = E::Data::from_question_data(data).ok_or(ExerciseError::PayloadMismatch {
            expected: E::Data::KIND,
            found,
        })?;
        Ok(Box::new(E::mount(data, mount)))
    }
}
