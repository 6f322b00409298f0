//! Fill-in-the-blank form.
//!
//! Authors write the passage with `[blankN]` tokens, where `N` is the
//! blank's `position`. New blanks take the next free position.

use serde_json::Value;

use exercisekit_core::data::{Blank, CompletionData, QuestionData};
use exercisekit_core::model::QuestionType;
use exercisekit_widgets::completion::{BlankTemplate, TemplateIssue};

use crate::error::FormError;
use crate::form::{
    check_floor, initial_payload, new_id, position_of, require, AuthoringForm, Emitter,
    FormWarning,
};

pub const MIN_BLANKS: usize = 1;

pub struct CompletionForm {
    data: CompletionData,
    emitter: Emitter,
}

impl CompletionForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let mut data: CompletionData = initial_payload(initial);
        if data.blanks.is_empty() {
            data.blanks = vec![blank_at(1), blank_at(2)];
        }
        Self { data, emitter }
    }

    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn blanks(&self) -> &[Blank] {
        &self.data.blanks
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.data.text = text.into();
        self.flush_debounced();
    }

    /// Append a blank at `max(position) + 1` and return its token.
    pub fn add_blank(&mut self) -> String {
        let position = self.data.blanks.iter().map(|b| b.position).max().unwrap_or(0).saturating_add(1);
        self.data.blanks.push(blank_at(position));
        self.flush();
        token(position)
    }

    pub fn remove_blank(&mut self, blank_id: &str) -> Result<(), FormError> {
        let index = self.index_of(blank_id)?;
        check_floor(QuestionType::Completion, self.data.blanks.len(), MIN_BLANKS, "blank")?;
        self.data.blanks.remove(index);
        self.flush();
        Ok(())
    }

    pub fn set_answer(&mut self, blank_id: &str, answer: impl Into<String>) -> Result<(), FormError> {
        let index = self.index_of(blank_id)?;
        self.data.blanks[index].answer = answer.into();
        self.flush_debounced();
        Ok(())
    }

    pub fn set_position(&mut self, blank_id: &str, position: u32) -> Result<(), FormError> {
        let index = self.index_of(blank_id)?;
        self.data.blanks[index].position = position;
        self.flush();
        Ok(())
    }

    /// The passage with each token replaced by its answer, or left as the
    /// token while the answer is empty.
    pub fn preview(&self) -> String {
        let template = BlankTemplate::parse(&self.data);
        template.render(|blank_id| {
            self.data
                .blanks
                .iter()
                .find(|b| b.id == blank_id)
                .map(|b| {
                    if b.answer.is_empty() {
                        token(b.position)
                    } else {
                        format!("[{}]", b.answer)
                    }
                })
                .unwrap_or_default()
        })
    }

    fn index_of(&self, blank_id: &str) -> Result<usize, FormError> {
        position_of(&self.data.blanks, blank_id, |b| b.id.as_str(), "blank")
    }
}

fn token(position: u32) -> String {
    format!("[blank{position}]")
}

fn blank_at(position: u32) -> Blank {
    Blank {
        id: new_id(),
        answer: String::new(),
        position,
    }
}

impl AuthoringForm for CompletionForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::Completion
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::Completion(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        require(&mut warnings, "text".into(), &self.data.text, "Passage text");
        for (i, blank) in self.data.blanks.iter().enumerate() {
            require(&mut warnings, format!("blanks[{i}].answer"), &blank.answer, "Answer");
        }
        if self.data.text.trim().is_empty() {
            return warnings;
        }
        for issue in BlankTemplate::parse(&self.data).issues {
            let warning = match issue {
                TemplateIssue::MissingToken { blank_id } => {
                    let position = self
                        .data
                        .blanks
                        .iter()
                        .find(|b| b.id == blank_id)
                        .map(|b| b.position)
                        .unwrap_or_default();
                    FormWarning::new("text", format!("{} does not appear in the text", token(position)))
                }
                TemplateIssue::UnknownToken { position } => {
                    FormWarning::new("text", format!("{} has no matching blank", token(position)))
                }
                TemplateIssue::DuplicateToken { position } => {
                    FormWarning::new("text", format!("{} appears more than once", token(position)))
                }
            };
            warnings.push(warning);
        }
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}
