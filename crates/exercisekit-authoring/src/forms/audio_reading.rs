//! Read-aloud passage with optional comprehension questions.

use serde_json::Value;

use exercisekit_core::data::{AudioReadingData, ComprehensionQuestion, QuestionData};
use exercisekit_core::model::QuestionType;

use crate::error::FormError;
use crate::form::{
    initial_payload, new_id, position_of, require, AuthoringForm, Emitter, FormWarning,
};

/// Empty option slots a new comprehension question starts with.
pub const DEFAULT_OPTION_SLOTS: usize = 4;

pub struct AudioReadingForm {
    data: AudioReadingData,
    emitter: Emitter,
}

impl AudioReadingForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let data = match initial {
            Some(_) => initial_payload(initial),
            None => AudioReadingData {
                highlight_words: true,
                ..Default::default()
            },
        };
        Self { data, emitter }
    }

    pub fn data(&self) -> &AudioReadingData {
        &self.data
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.data.text = text.into();
        self.flush_debounced();
    }

    pub fn set_audio_url(&mut self, url: impl Into<String>) {
        self.data.audio_url = url.into();
        self.flush();
    }

    pub fn set_highlight_words(&mut self, highlight: bool) {
        self.data.highlight_words = highlight;
        self.flush();
    }

    pub fn add_question(&mut self) -> &str {
        self.data.comprehension_questions.push(ComprehensionQuestion {
            id: new_id(),
            question: String::new(),
            options: Some(vec![String::new(); DEFAULT_OPTION_SLOTS]),
            correct_answer: String::new(),
        });
        self.flush();
        self.data
            .comprehension_questions
            .last()
            .map(|q| q.id.as_str())
            .unwrap_or_default()
    }

    /// Questions are optional, so the last one can go too.
    pub fn remove_question(&mut self, question_id: &str) -> Result<(), FormError> {
        let index = self.index_of(question_id)?;
        self.data.comprehension_questions.remove(index);
        self.flush();
        Ok(())
    }

    pub fn set_question_text(
        &mut self,
        question_id: &str,
        text: impl Into<String>,
    ) -> Result<(), FormError> {
        let index = self.index_of(question_id)?;
        self.data.comprehension_questions[index].question = text.into();
        self.flush_debounced();
        Ok(())
    }

    pub fn set_option(
        &mut self,
        question_id: &str,
        slot: usize,
        text: impl Into<String>,
    ) -> Result<(), FormError> {
        let index = self.index_of(question_id)?;
        let options = self.data.comprehension_questions[index]
            .options
            .get_or_insert_with(|| vec![String::new(); DEFAULT_OPTION_SLOTS]);
        let option = options.get_mut(slot).ok_or(FormError::OutOfRange {
            noun: "option",
            index: slot,
        })?;
        *option = text.into();
        self.flush_debounced();
        Ok(())
    }

    /// Drop the options so the question takes a free-text answer.
    pub fn make_free_text(&mut self, question_id: &str) -> Result<(), FormError> {
        let index = self.index_of(question_id)?;
        self.data.comprehension_questions[index].options = None;
        self.flush();
        Ok(())
    }

    pub fn set_correct_answer(
        &mut self,
        question_id: &str,
        answer: impl Into<String>,
    ) -> Result<(), FormError> {
        let index = self.index_of(question_id)?;
        self.data.comprehension_questions[index].correct_answer = answer.into();
        self.flush_debounced();
        Ok(())
    }

    fn index_of(&self, question_id: &str) -> Result<usize, FormError> {
        position_of(
            &self.data.comprehension_questions,
            question_id,
            |q| q.id.as_str(),
            "comprehension question",
        )
    }
}

impl AuthoringForm for AudioReadingForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::AudioReading
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::AudioReading(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        require(&mut warnings, "text".into(), &self.data.text, "Reading text");
        for (i, q) in self.data.comprehension_questions.iter().enumerate() {
            let field = format!("comprehensionQuestions[{i}]");
            require(&mut warnings, format!("{field}.question"), &q.question, "Question");
            require(
                &mut warnings,
                format!("{field}.correctAnswer"),
                &q.correct_answer,
                "Correct answer",
            );
            if let Some(options) = &q.options {
                let answer = q.correct_answer.trim();
                if !answer.is_empty() && !options.iter().any(|o| o.trim() == answer) {
                    warnings.push(FormWarning::new(
                        format!("{field}.correctAnswer"),
                        "Correct answer is not one of the options",
                    ));
                }
            }
        }
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::testing::Recorder;
    use std::time::Duration;

    #[test]
    fn new_questions_have_four_empty_options_and_no_floor() {
        let mut form = AudioReadingForm::new(None, Recorder::default().emitter(0));
        assert!(form.data().highlight_words);

        let id = form.add_question().to_string();
        let question = &form.data().comprehension_questions[0];
        assert_eq!(question.options, Some(vec![String::new(); 4]));

        form.set_option(&id, 2, "a cat").unwrap();
        assert!(form.set_option(&id, 4, "nope").is_err());
        form.remove_question(&id).unwrap();
        assert!(form.data().comprehension_questions.is_empty());
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let mut form = AudioReadingForm::new(None, Recorder::default().emitter(0));
        form.set_text("The cat sat on the mat.");
        let id = form.add_question().to_string();
        form.set_question_text(&id, "Who sat?").unwrap();
        form.set_option(&id, 0, "The cat").unwrap();
        form.set_correct_answer(&id, "The dog").unwrap();
        assert_eq!(
            form.validate(),
            [FormWarning::new(
                "comprehensionQuestions[0].correctAnswer",
                "Correct answer is not one of the options"
            )]
        );

        form.make_free_text(&id).unwrap();
        assert!(form.validate().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_is_debounced_and_toggles_are_not() {
        let recorder = Recorder::default();
        let mut form = AudioReadingForm::new(None, recorder.emitter(500));
        form.set_text("O");
        form.set_text("On");
        form.set_text("Once");
        assert_eq!(recorder.count(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(recorder.count(), 1);

        form.set_text("Once upon");
        form.set_highlight_words(false);
        assert_eq!(recorder.count(), 2);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(recorder.count(), 2);

        let Some(QuestionData::AudioReading(last)) = recorder.last() else {
            panic!("expected an audio reading payload");
        };
        assert_eq!(last.text, "Once upon");
        assert!(!last.highlight_words);
    }
}
