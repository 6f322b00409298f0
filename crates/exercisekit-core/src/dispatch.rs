//! Exercise type dispatcher.
//!
//! Maps a question's type tag to a registered widget factory, mounts the
//! widget with the shared props, and wraps its saves in the [`Response`]
//! envelope. An unrecognised tag is a designed terminal state, not an
//! error: the caller gets [`Rendered::Unsupported`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{Environment, ExerciseConfig};
use crate::debug::DebugOverlay;
use crate::error::ExerciseError;
use crate::model::{NormalizedQuestion, QuestionType};
use crate::normalize::prepare_question;
use crate::notice::Notice;
use crate::response::Response;
use crate::scoring::Score;
use crate::traits::{Exercise, ExerciseFactory, Mount, RenderContext, Widget, WidgetFactory, WidgetProps};

/// Callback invoked with the packaged envelope on every successful save.
pub type SaveCallback = Box<dyn FnMut(Response) + Send>;

/// Widget factories keyed by type tag.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    factories: HashMap<QuestionType, Arc<dyn WidgetFactory>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exercise type for one or more tags.
    pub fn register<E: Exercise>(&mut self, tags: &[QuestionType]) -> &mut Self {
        let factory: Arc<dyn WidgetFactory> = Arc::new(ExerciseFactory::<E>::new());
        for tag in tags {
            self.factories.insert(*tag, Arc::clone(&factory));
        }
        self
    }

    /// Register a custom factory for a tag, replacing any existing one.
    pub fn register_factory(&mut self, tag: QuestionType, factory: Arc<dyn WidgetFactory>) {
        self.factories.insert(tag, factory);
    }

    pub fn get(&self, tag: QuestionType) -> Option<&Arc<dyn WidgetFactory>> {
        self.factories.get(&tag)
    }

    pub fn contains(&self, tag: QuestionType) -> bool {
        self.factories.contains_key(&tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<QuestionType> {
        let mut tags: Vec<_> = self.factories.keys().copied().collect();
        tags.sort();
        tags
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Shared props injected into every mounted widget.
#[derive(Default)]
pub struct DispatchProps {
    pub read_only: bool,
    pub show_answers: bool,
    /// A previously saved response to restore from.
    pub initial_response: Option<Response>,
    pub on_save: Option<SaveCallback>,
}

impl DispatchProps {
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn show_answers(mut self, show_answers: bool) -> Self {
        self.show_answers = show_answers;
        self
    }

    pub fn initial_response(mut self, response: Response) -> Self {
        self.initial_response = Some(response);
        self
    }

    pub fn on_save(mut self, on_save: impl FnMut(Response) + Send + 'static) -> Self {
        self.on_save = Some(Box::new(on_save));
        self
    }
}

impl fmt::Debug for DispatchProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchProps")
            .field("read_only", &self.read_only)
            .field("show_answers", &self.show_answers)
            .field("initial_response", &self.initial_response)
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

/// The result of dispatching one question.
#[derive(Debug)]
pub enum Rendered {
    Exercise(MountedExercise),
    Unsupported(UnsupportedExercise),
}

impl Rendered {
    pub fn is_supported(&self) -> bool {
        matches!(self, Rendered::Exercise(_))
    }

    pub fn into_exercise(self) -> Option<MountedExercise> {
        match self {
            Rendered::Exercise(mounted) => Some(mounted),
            Rendered::Unsupported(_) => None,
        }
    }
}

/// Fallback view for a tag no widget handles.
#[derive(Debug)]
pub struct UnsupportedExercise {
    pub question_id: String,
    /// The raw tag, if the question had one.
    pub question_type: Option<String>,
    pub question_text: Option<String>,
    /// Data-debugging detail; `None` in production.
    pub debug: Option<DebugOverlay>,
}

impl UnsupportedExercise {
    /// The message shown in place of the widget.
    pub fn message(&self) -> String {
        format!(
            "Unsupported question type: {}",
            self.question_type.as_deref().unwrap_or("(none)")
        )
    }
}

/// What happened when the learner pressed Save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The envelope was handed to `onSave`.
    Saved(Response),
    /// The save gate refused; nothing was emitted.
    Rejected(Notice),
    /// The widget is read-only; nothing was emitted.
    ReadOnly,
}

/// A widget mounted for one question.
pub struct MountedExercise {
    question: NormalizedQuestion,
    question_type: QuestionType,
    props: WidgetProps,
    widget: Box<dyn Widget>,
    response_id: String,
    submission_id: String,
    on_save: Option<SaveCallback>,
    warnings: Vec<String>,
}

impl MountedExercise {
    pub fn question(&self) -> &NormalizedQuestion {
        &self.question
    }

    /// The tag the question was authored with.
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn props(&self) -> WidgetProps {
        self.props
    }

    /// Normalizer repairs and restore problems for this question.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        self.widget.as_mut()
    }

    /// Borrow the concrete widget, e.g. to drive interactions.
    pub fn downcast_ref<E: Exercise>(&self) -> Option<&E> {
        self.widget.as_any().downcast_ref::<E>()
    }

    pub fn downcast_mut<E: Exercise>(&mut self) -> Option<&mut E> {
        self.widget.as_any_mut().downcast_mut::<E>()
    }

    /// Current `responseData`, ignoring the save gate.
    pub fn response_data(&self) -> Result<Value, ExerciseError> {
        self.widget.response_data()
    }

    /// Run the save gate and, on success, emit the envelope exactly once.
    pub fn save(&mut self) -> SaveOutcome {
        if self.props.read_only {
            return SaveOutcome::ReadOnly;
        }
        match self.widget.save() {
            Ok(saved) => {
                let response = Response {
                    id: self.response_id.clone(),
                    submission_id: self.submission_id.clone(),
                    question_id: self.question.id.clone(),
                    response_data: saved.response_data,
                    is_correct: saved.is_correct,
                };
                tracing::debug!(question_id = %self.question.id, "response saved");
                if let Some(on_save) = self.on_save.as_mut() {
                    on_save(response.clone());
                }
                SaveOutcome::Saved(response)
            }
            Err(notice) => {
                tracing::debug!(question_id = %self.question.id, %notice, "save rejected");
                SaveOutcome::Rejected(notice)
            }
        }
    }

    /// Advisory score, revealed only when answers are shown.
    pub fn score(&self) -> Option<Score> {
        if self.props.show_answers {
            self.widget.score()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        if !self.props.read_only {
            self.widget.reset();
        }
    }
}

impl fmt::Debug for MountedExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedExercise")
            .field("question_id", &self.question.id)
            .field("question_type", &self.question_type)
            .field("props", &self.props)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Selects and mounts the widget for a question.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: WidgetRegistry,
    environment: Environment,
    context: RenderContext,
}

impl Dispatcher {
    pub fn new(registry: WidgetRegistry, config: &ExerciseConfig) -> Self {
        Self {
            registry,
            environment: config.environment,
            context: RenderContext::from(config),
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Dispatch a raw (or already normalized) question. Never panics.
    pub fn dispatch(&self, raw: &Value, props: DispatchProps) -> Rendered {
        let prepared = prepare_question(raw);
        let question = prepared.question;
        let mut warnings = prepared.warnings;

        let (Some(kind), Some(data)) = (prepared.kind, prepared.data) else {
            return self.unsupported(raw, question);
        };
        let Some(factory) = self.registry.get(kind) else {
            return self.unsupported(raw, question);
        };

        for warning in &warnings {
            tracing::warn!(question_id = %question.id, "{warning}");
        }

        let widget_props = WidgetProps {
            read_only: props.read_only,
            show_answers: props.show_answers,
        };
        let mount = Mount {
            question_type: kind,
            props: widget_props,
            context: &self.context,
        };
        let mut widget = match factory.create(data, &mount) {
            Ok(widget) => widget,
            Err(e) => {
                tracing::warn!(question_id = %question.id, "{e}");
                return self.unsupported(raw, question);
            }
        };

        let (response_id, submission_id) = match props.initial_response {
            Some(initial) => {
                if let Err(e) = widget.load_response(&initial.response_data) {
                    tracing::warn!(
                        question_id = %question.id,
                        "ignoring saved response: {e}"
                    );
                    warnings.push(format!("ignored saved response: {e}"));
                }
                (initial.id, initial.submission_id)
            }
            None => (String::new(), String::new()),
        };

        tracing::debug!(
            question_id = %question.id,
            question_type = %kind,
            read_only = props.read_only,
            "mounted widget"
        );

        Rendered::Exercise(MountedExercise {
            question,
            question_type: kind,
            props: widget_props,
            widget,
            response_id,
            submission_id,
            on_save: props.on_save,
            warnings,
        })
    }

    fn unsupported(&self, raw: &Value, question: NormalizedQuestion) -> Rendered {
        tracing::warn!(
            question_id = %question.id,
            question_type = question.question_type.as_deref().unwrap_or("(none)"),
            "unsupported question type"
        );
        Rendered::Unsupported(UnsupportedExercise {
            question_id: question.id,
            question_type: question.question_type,
            question_text: question.question_text,
            debug: DebugOverlay::for_environment(self.environment, raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CountingData;
    use crate::response::CountingResponse;
    use serde_json::json;
    use std::sync::Mutex;

    /// A minimal counter used to exercise the dispatcher without the
    /// widgets crate.
    struct Tally {
        data: CountingData,
        count: u32,
        read_only: bool,
    }

    impl Tally {
        fn bump(&mut self) {
            if !self.read_only && self.count < self.data.max_count {
                self.count += 1;
            }
        }
    }

    impl Exercise for Tally {
        type Data = CountingData;
        type Response = CountingResponse;

        fn mount(data: CountingData, mount: &Mount<'_>) -> Self {
            Self {
                count: data.min_count,
                data,
                read_only: mount.props.read_only,
            }
        }

        fn restore(&mut self, response: CountingResponse) {
            self.count = response.count;
        }

        fn response(&self) -> CountingResponse {
            CountingResponse {
                count: self.count,
                markers: Vec::new(),
                is_correct: self.count == self.data.correct_count,
            }
        }

        fn check_complete(&self) -> Result<(), Notice> {
            if self.count == 0 {
                Err(Notice::error("Count something first"))
            } else {
                Ok(())
            }
        }

        fn score(&self) -> Option<Score> {
            Some(Score::all_or_nothing(self.count == self.data.correct_count))
        }

        fn envelope_correctness(&self) -> Option<bool> {
            Some(self.count == self.data.correct_count)
        }

        fn reset(&mut self) {
            self.count = self.data.min_count;
        }
    }

    fn dispatcher(environment: Environment) -> Dispatcher {
        let mut registry = WidgetRegistry::new();
        registry.register::<Tally>(&[QuestionType::Counting]);
        let config = ExerciseConfig {
            environment,
            ..Default::default()
        };
        Dispatcher::new(registry, &config)
    }

    fn counting_question() -> Value {
        json!({
            "id": "q1",
            "question_type": "COUNTING",
            "questionText": "How many?",
            "questionData": { "correctCount": 2, "maxCount": 5 }
        })
    }

    #[test]
    fn unknown_type_renders_fallback_with_debug_outside_production() {
        let raw = json!({ "id": "q9", "questionType": "NOT_A_REAL_TYPE", "questionText": "?" });
        match dispatcher(Environment::Development).dispatch(&raw, DispatchProps::default()) {
            Rendered::Unsupported(u) => {
                assert_eq!(u.message(), "Unsupported question type: NOT_A_REAL_TYPE");
                assert!(u.debug.is_some());
            }
            Rendered::Exercise(_) => panic!("expected fallback"),
        }
        match dispatcher(Environment::Production).dispatch(&raw, DispatchProps::default()) {
            Rendered::Unsupported(u) => assert!(u.debug.is_none()),
            Rendered::Exercise(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn known_but_unregistered_type_is_unsupported() {
        let raw = json!({ "id": "q", "questionType": "PUZZLE" });
        let rendered = dispatcher(Environment::Test).dispatch(&raw, DispatchProps::default());
        assert!(!rendered.is_supported());
    }

    #[test]
    fn garbage_input_never_panics() {
        let d = dispatcher(Environment::Test);
        for raw in [json!(null), json!(42), json!([]), json!({ "questionType": 7 })] {
            assert!(!d.dispatch(&raw, DispatchProps::default()).is_supported());
        }
    }

    #[test]
    fn save_wraps_payload_in_envelope() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&saved);
        let props = DispatchProps::default().on_save(move |r| sink.lock().unwrap().push(r));

        let mut mounted = dispatcher(Environment::Test)
            .dispatch(&counting_question(), props)
            .into_exercise()
            .unwrap();
        assert_eq!(mounted.question_type(), QuestionType::Counting);

        assert_eq!(
            mounted.save(),
            SaveOutcome::Rejected(Notice::error("Count something first"))
        );
        assert!(saved.lock().unwrap().is_empty());

        let tally = mounted.downcast_mut::<Tally>().unwrap();
        tally.bump();
        tally.bump();
        let SaveOutcome::Saved(response) = mounted.save() else {
            panic!("save should succeed");
        };
        assert_eq!(response.id, "");
        assert_eq!(response.submission_id, "");
        assert_eq!(response.question_id, "q1");
        assert_eq!(response.is_correct, Some(true));
        assert_eq!(response.response_data["count"], json!(2));

        let calls = saved.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], response);
    }

    #[test]
    fn initial_response_restores_state_and_carries_ids() {
        let initial = Response {
            id: "r1".into(),
            submission_id: "s1".into(),
            question_id: "q1".into(),
            response_data: json!({ "count": 4 }),
            is_correct: None,
        };
        let mut mounted = dispatcher(Environment::Test)
            .dispatch(
                &counting_question(),
                DispatchProps::default().initial_response(initial),
            )
            .into_exercise()
            .unwrap();
        assert_eq!(mounted.response_data().unwrap()["count"], json!(4));

        let SaveOutcome::Saved(response) = mounted.save() else {
            panic!("save should succeed");
        };
        assert_eq!(response.id, "r1");
        assert_eq!(response.submission_id, "s1");
        assert_eq!(response.is_correct, Some(false));
    }

    #[test]
    fn malformed_initial_response_is_ignored() {
        let initial = Response::for_question("q1", json!({ "count": "lots" }));
        let mounted = dispatcher(Environment::Test)
            .dispatch(
                &counting_question(),
                DispatchProps::default().initial_response(initial),
            )
            .into_exercise()
            .unwrap();
        assert_eq!(mounted.response_data().unwrap()["count"], json!(0));
        assert!(mounted.warnings()[0].starts_with("ignored saved response"));
    }

    #[test]
    fn read_only_refuses_save_and_score_needs_show_answers() {
        let mut mounted = dispatcher(Environment::Test)
            .dispatch(&counting_question(), DispatchProps::default().read_only(true))
            .into_exercise()
            .unwrap();
        assert_eq!(mounted.save(), SaveOutcome::ReadOnly);
        assert!(mounted.score().is_none());

        let mounted = dispatcher(Environment::Test)
            .dispatch(&counting_question(), DispatchProps::default().show_answers(true))
            .into_exercise()
            .unwrap();
        assert_eq!(mounted.score(), Some(Score::new(0, 1)));
    }
}
