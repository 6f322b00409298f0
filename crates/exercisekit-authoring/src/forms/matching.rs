//! Matching pairs form.

use serde_json::Value;

use exercisekit_core::data::{MatchingData, MatchingPair, MediaKind, QuestionData};
use exercisekit_core::model::QuestionType;

use crate::error::FormError;
use crate::form::{
    check_floor, initial_payload, new_id, position_of, require, AuthoringForm, Emitter,
    FormWarning,
};

pub const MIN_PAIRS: usize = 2;

/// Which column of a pair an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

pub struct MatchingForm {
    data: MatchingData,
    emitter: Emitter,
}

impl MatchingForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let mut data: MatchingData = initial_payload(initial);
        while data.pairs.len() < MIN_PAIRS {
            data.pairs.push(blank_pair());
        }
        Self { data, emitter }
    }

    pub fn pairs(&self) -> &[MatchingPair] {
        &self.data.pairs
    }

    pub fn add_pair(&mut self) -> &str {
        self.data.pairs.push(blank_pair());
        self.flush();
        self.data.pairs.last().map(|p| p.id.as_str()).unwrap_or_default()
    }

    pub fn remove_pair(&mut self, pair_id: &str) -> Result<(), FormError> {
        let index = self.index_of(pair_id)?;
        check_floor(QuestionType::Matching, self.data.pairs.len(), MIN_PAIRS, "pairs")?;
        self.data.pairs.remove(index);
        self.flush();
        Ok(())
    }

    /// Typed text or an image URL for one side.
    pub fn set_content(
        &mut self,
        pair_id: &str,
        side: Side,
        content: impl Into<String>,
    ) -> Result<(), FormError> {
        let index = self.index_of(pair_id)?;
        let pair = &mut self.data.pairs[index];
        match side {
            Side::Left => pair.left = content.into(),
            Side::Right => pair.right = content.into(),
        }
        self.flush_debounced();
        Ok(())
    }

    pub fn set_kind(&mut self, pair_id: &str, side: Side, kind: MediaKind) -> Result<(), FormError> {
        let index = self.index_of(pair_id)?;
        let pair = &mut self.data.pairs[index];
        match side {
            Side::Left => pair.left_type = kind,
            Side::Right => pair.right_type = kind,
        }
        self.flush();
        Ok(())
    }

    fn index_of(&self, pair_id: &str) -> Result<usize, FormError> {
        position_of(&self.data.pairs, pair_id, |p| p.id.as_str(), "pair")
    }
}

fn blank_pair() -> MatchingPair {
    MatchingPair {
        id: new_id(),
        ..Default::default()
    }
}

impl AuthoringForm for MatchingForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::Matching
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::Matching(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        for (i, pair) in self.data.pairs.iter().enumerate() {
            require(&mut warnings, format!("pairs[{i}].left"), &pair.left, "Left item");
            require(&mut warnings, format!("pairs[{i}].right"), &pair.right, "Right item");
        }
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}
