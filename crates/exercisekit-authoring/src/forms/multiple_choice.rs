//! Multiple-choice options form.

use serde_json::Value;

use exercisekit_core::data::{ChoiceOption, MultipleChoiceData, QuestionData};
use exercisekit_core::model::QuestionType;

use crate::error::FormError;
use crate::form::{
    check_floor, initial_payload, new_id, position_of, require, AuthoringForm, Emitter,
    FormWarning,
};

pub const MIN_OPTIONS: usize = 2;

pub struct MultipleChoiceForm {
    data: MultipleChoiceData,
    emitter: Emitter,
}

impl MultipleChoiceForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let mut data: MultipleChoiceData = initial_payload(initial);
        while data.options.len() < MIN_OPTIONS {
            data.options.push(blank_option());
        }
        Self { data, emitter }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.data.options
    }

    pub fn allow_multiple(&self) -> bool {
        self.data.allow_multiple
    }

    pub fn add_option(&mut self) -> &str {
        self.data.options.push(blank_option());
        self.flush();
        self.data.options.last().map(|o| o.id.as_str()).unwrap_or_default()
    }

    pub fn remove_option(&mut self, option_id: &str) -> Result<(), FormError> {
        let index = self.index_of(option_id)?;
        check_floor(QuestionType::MultipleChoice, self.data.options.len(), MIN_OPTIONS, "options")?;
        self.data.options.remove(index);
        self.flush();
        Ok(())
    }

    pub fn set_text(&mut self, option_id: &str, text: impl Into<String>) -> Result<(), FormError> {
        let index = self.index_of(option_id)?;
        self.data.options[index].text = text.into();
        self.flush_debounced();
        Ok(())
    }

    /// Attach or clear an option image.
    pub fn set_image(&mut self, option_id: &str, image_url: Option<String>) -> Result<(), FormError> {
        let index = self.index_of(option_id)?;
        self.data.options[index].image_url = image_url.filter(|url| !url.is_empty());
        self.flush();
        Ok(())
    }

    /// Mark an option correct or not. In single-answer mode every other
    /// option is cleared.
    pub fn set_correct(&mut self, option_id: &str, is_correct: bool) -> Result<(), FormError> {
        let index = self.index_of(option_id)?;
        if self.data.allow_multiple {
            self.data.options[index].is_correct = is_correct;
        } else {
            for (i, option) in self.data.options.iter_mut().enumerate() {
                option.is_correct = i == index && is_correct;
            }
        }
        self.flush();
        Ok(())
    }

    pub fn set_allow_multiple(&mut self, allow_multiple: bool) {
        self.data.allow_multiple = allow_multiple;
        self.flush();
    }

    fn index_of(&self, option_id: &str) -> Result<usize, FormError> {
        position_of(&self.data.options, option_id, |o| o.id.as_str(), "option")
    }
}

fn blank_option() -> ChoiceOption {
    ChoiceOption {
        id: new_id(),
        ..Default::default()
    }
}

impl AuthoringForm for MultipleChoiceForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::MultipleChoice
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::MultipleChoice(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        for (i, option) in self.data.options.iter().enumerate() {
            if option.image_url.is_none() {
                require(&mut warnings, format!("options[{i}].text"), &option.text, "Option text");
            }
        }
        if !self.data.options.iter().any(|o| o.is_correct) {
            warnings.push(FormWarning::new("options", "Mark at least one option as correct"));
        }
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}
