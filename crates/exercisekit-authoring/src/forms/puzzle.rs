//! Jigsaw puzzle form.

use serde_json::Value;

use exercisekit_core::data::{Difficulty, PuzzleData, QuestionData};
use exercisekit_core::model::QuestionType;
use exercisekit_widgets::puzzle::grid_size;

use crate::error::FormError;
use crate::form::{initial_payload, require, AuthoringForm, Emitter, FormWarning};

pub const MIN_PIECES: u32 = 4;
pub const MAX_PIECES: u32 = 16;

pub struct PuzzleForm {
    data: PuzzleData,
    emitter: Emitter,
}

impl PuzzleForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let mut data: PuzzleData = initial_payload(initial);
        let pieces = data.pieces.clamp(MIN_PIECES, MAX_PIECES);
        if pieces != data.pieces {
            tracing::debug!(from = data.pieces, to = pieces, "piece count out of range");
            data.pieces = pieces;
            data.correct_pieces = None;
        }
        Self { data, emitter }
    }

    pub fn data(&self) -> &PuzzleData {
        &self.data
    }

    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.data.image_url = url.into();
        self.flush_debounced();
    }

    /// Change the piece count, clamped to the supported range. Any marked
    /// pieces are cleared.
    pub fn set_pieces(&mut self, pieces: u32) {
        self.data.pieces = pieces.clamp(MIN_PIECES, MAX_PIECES);
        self.data.correct_pieces = None;
        self.flush();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.data.difficulty = difficulty;
        self.flush();
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) {
        self.data.preview_enabled = enabled;
        self.flush();
    }

    /// Piece id for a row-major index, matching the widget's layout.
    pub fn piece_id(&self, index: u32) -> Result<String, FormError> {
        if index >= self.data.pieces {
            return Err(FormError::OutOfRange {
                noun: "piece",
                index: index as usize,
            });
        }
        let n = grid_size(self.data.pieces);
        Ok(format!("piece-{}-{}", index / n, index % n))
    }

    pub fn toggle_correct_piece(&mut self, index: u32) -> Result<(), FormError> {
        let id = self.piece_id(index)?;
        let marked = self.data.correct_pieces.get_or_insert_with(Vec::new);
        if let Some(at) = marked.iter().position(|p| *p == id) {
            marked.remove(at);
        } else {
            marked.push(id);
        }
        self.flush();
        Ok(())
    }

    pub fn mark_all_correct(&mut self) {
        let ids: Vec<String> = (0..self.data.pieces)
            .filter_map(|i| self.piece_id(i).ok())
            .collect();
        self.data.correct_pieces = Some(ids);
        self.flush();
    }

    pub fn clear_correct(&mut self) {
        self.data.correct_pieces = Some(Vec::new());
        self.flush();
    }
}

impl AuthoringForm for PuzzleForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::Puzzle
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::Puzzle(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        require(&mut warnings, "imageUrl".into(), &self.data.image_url, "Puzzle image");
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

    #[test]
    fn changing_piece_count_clears_marked_pieces() {
        let recorder = Recorder::default();
        let mut form = PuzzleForm::new(None, recorder.emitter(0));
        assert_eq!(form.data().pieces, 9);

        form.toggle_correct_piece(4).unwrap();
        assert_eq!(form.data().correct_pieces, Some(vec!["piece-1-1".to_string()]));
        form.toggle_correct_piece(4).unwrap();
        assert_eq!(form.data().correct_pieces, Some(Vec::new()));

        form.mark_all_correct();
        assert_eq!(form.data().correct_pieces.as_ref().map(Vec::len), Some(9));

        form.set_pieces(16);
        assert_eq!(form.data().correct_pieces, None);
        assert_eq!(form.piece_id(5).unwrap(), "piece-1-1");
        assert!(form.toggle_correct_piece(16).is_err());
        assert_eq!(recorder.count(), 4);
    }

    #[test]
    fn loaded_piece_count_is_clamped() {
        let initial = serde_json::json!({
            "pieces": 4_000_000_000u32,
            "correctPieces": ["piece-0-0"]
        });
        let mut form = PuzzleForm::new(Some(&initial), Recorder::default().emitter(0));
        assert_eq!(form.data().pieces, MAX_PIECES);
        assert_eq!(form.data().correct_pieces, None);

        form.mark_all_correct();
        assert_eq!(form.data().correct_pieces.as_ref().map(Vec::len), Some(16));
    }

    #[test]
    fn piece_count_is_clamped() {
        let mut form = PuzzleForm::new(None, Recorder::default().emitter(0));
        form.set_pieces(100);
        assert_eq!(form.data().pieces, MAX_PIECES);
        form.set_pieces(1);
        assert_eq!(form.data().pieces, MIN_PIECES);
        assert_eq!(form.validate()[0].field, "imageUrl");
    }
}
