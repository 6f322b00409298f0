//! Free drawing form.

use serde_json::Value;

use exercisekit_core::data::{DrawingData, QuestionData};
use exercisekit_core::model::QuestionType;

use crate::form::{initial_payload, require, AuthoringForm, Emitter, FormWarning};

pub struct DrawingForm {
    data: DrawingData,
    emitter: Emitter,
}

impl DrawingForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        Self {
            data: initial_payload(initial),
            emitter,
        }
    }

    pub fn data(&self) -> &DrawingData {
        &self.data
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.data.instructions = instructions.into();
        self.flush_debounced();
    }

    pub fn set_background_image(&mut self, url: Option<String>) {
        self.data.background_image_url = url.filter(|u| !u.is_empty());
        self.flush();
    }

    /// Zero dimensions fall back to the 600x400 default.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        let defaults = DrawingData::default();
        self.data.canvas_width = if width == 0 { defaults.canvas_width } else { width };
        self.data.canvas_height = if height == 0 { defaults.canvas_height } else { height };
        self.flush();
    }
}

impl AuthoringForm for DrawingForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::Drawing
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::Drawing(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        require(&mut warnings, "instructions".into(), &self.data.instructions, "Instructions");
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}
