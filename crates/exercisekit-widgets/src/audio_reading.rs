//! Audio reading: read a passage aloud, then answer questions about it.
//!
//! Recording goes through an injected [`AudioRecorder`] so the widget runs
//! without a microphone. A recorder failure produces a notice and leaves
//! the widget usable.

use async_trait::async_trait;

use exercisekit_core::data::{AudioReadingData, ComprehensionQuestion};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{AudioReadingResponse, ComprehensionAnswer};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

/// A microphone capture session.
#[async_trait]
pub trait AudioRecorder: Send {
    /// Open the microphone and start capturing.
    async fn start(&mut self) -> anyhow::Result<()>;

    /// Stop capturing and return a reference to the stored recording
    /// (a URL or a data URI).
    async fn stop(&mut self) -> anyhow::Result<String>;
}

pub struct AudioReadingExercise {
    data: AudioReadingData,
    props: WidgetProps,
    recording: bool,
    recorded_audio: Option<String>,
    answers: Vec<ComprehensionAnswer>,
}

impl AudioReadingExercise {
    pub fn passage(&self) -> &str {
        &self.data.text
    }

    pub fn audio_url(&self) -> &str {
        &self.data.audio_url
    }

    pub fn questions(&self) -> &[ComprehensionQuestion] {
        &self.data.comprehension_questions
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn recorded_audio(&self) -> Option<&str> {
        self.recorded_audio.as_deref()
    }

    pub async fn start_recording(&mut self, recorder: &mut dyn AudioRecorder) -> Option<Notice> {
        if self.props.read_only || self.recording {
            return None;
        }
        match recorder.start().await {
            Ok(()) => {
                self.recording = true;
                None
            }
            Err(e) => {
                tracing::warn!("microphone unavailable: {e:#}");
                Some(Notice::error("Could not access microphone"))
            }
        }
    }

    pub async fn stop_recording(&mut self, recorder: &mut dyn AudioRecorder) -> Option<Notice> {
        if !self.recording {
            return None;
        }
        self.recording = false;
        match recorder.stop().await {
            Ok(reference) => {
                self.recorded_audio = Some(reference);
                Some(Notice::success("Recording saved"))
            }
            Err(e) => {
                tracing::warn!("recording failed: {e:#}");
                Some(Notice::error("Could not save recording"))
            }
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.id == question_id)
            .map(|a| a.answer.as_str())
    }

    pub fn set_answer(&mut self, question_id: &str, answer: impl Into<String>) {
        if self.props.read_only {
            return;
        }
        if let Some(slot) = self.answers.iter_mut().find(|a| a.id == question_id) {
            slot.answer = answer.into();
        }
    }

    pub fn answer_status(&self, question_id: &str) -> Option<bool> {
        if !self.props.show_answers {
            return None;
        }
        let question = self.questions().iter().find(|q| q.id == question_id)?;
        Some(self.is_answer_correct(question))
    }

    /// Rounded share of correct answers; 100 with no questions.
    pub fn comprehension_score(&self) -> u32 {
        self.comprehension().percentage()
    }

    fn comprehension(&self) -> Score {
        Score::from_checks(self.questions().iter().map(|q| self.is_answer_correct(q)))
    }

    fn is_answer_correct(&self, question: &ComprehensionQuestion) -> bool {
        self.answer(&question.id).is_some_and(|a| {
            a.trim().to_lowercase() == question.correct_answer.trim().to_lowercase()
        })
    }

    fn empty_answers(data: &AudioReadingData) -> Vec<ComprehensionAnswer> {
        data.comprehension_questions
            .iter()
            .map(|q| ComprehensionAnswer {
                id: q.id.clone(),
                answer: String::new(),
            })
            .collect()
    }
}

impl Exercise for AudioReadingExercise {
    type Data = AudioReadingData;
    type Response = AudioReadingResponse;

    fn mount(data: AudioReadingData, mount: &Mount<'_>) -> Self {
        let answers = Self::empty_answers(&data);
        Self {
            data,
            props: mount.props,
            recording: false,
            recorded_audio: None,
            answers,
        }
    }

    fn restore(&mut self, response: AudioReadingResponse) {
        self.recorded_audio = response.recorded_audio.filter(|r| !r.is_empty());
        for slot in &mut self.answers {
            if let Some(saved) = response.answers.iter().find(|a| a.id == slot.id) {
                slot.answer = saved.answer.clone();
            }
        }
    }

    fn response(&self) -> AudioReadingResponse {
        AudioReadingResponse {
            recorded_audio: self.recorded_audio.clone(),
            answers: self.answers.clone(),
            completion_percentage: if self.recorded_audio.is_some() { 100 } else { 0 },
            comprehension_score: self.comprehension_score(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self.questions().is_empty() && self.recorded_audio.is_none() {
            return Err(Notice::error("Please record your reading before saving"));
        }
        if !self.props.show_answers && self.answers.iter().any(|a| a.answer.trim().is_empty()) {
            return Err(Notice::error("Please answer all comprehension questions"));
        }
        Ok(())
    }

    fn score(&self) -> Option<Score> {
        Some(self.comprehension())
    }

    fn reset(&mut self) {
        self.recording = false;
        self.recorded_audio = None;
        self.answers = Self::empty_answers(&self.data);
    }
}
