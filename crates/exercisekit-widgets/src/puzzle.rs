//! Jigsaw puzzle: drag pieces to their home cells on the board.
//!
//! The requested piece count picks a square grid; pieces start scattered
//! below the board and snap home when dropped close enough.

use rand::rngs::StdRng;
use rand::Rng;

use exercisekit_core::config::PuzzleBoard;
use exercisekit_core::data::{Point, PuzzleData};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{PlacedPiece, PuzzleResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

use crate::rng::widget_rng;

/// Gap between the board and the scatter area.
const SCATTER_GAP: f64 = 20.0;

/// Grid edge for a requested piece count.
pub fn grid_size(pieces: u32) -> u32 {
    match pieces {
        0..=4 => 2,
        5..=9 => 3,
        10..=16 => 4,
        _ => 5,
    }
}

/// A cell of the solved picture.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSlot {
    pub id: String,
    pub row: u32,
    pub col: u32,
    /// Top-left corner of the home cell on the board.
    pub home: Point,
}

pub struct PuzzleExercise {
    data: PuzzleData,
    props: WidgetProps,
    board: PuzzleBoard,
    rng: StdRng,
    slots: Vec<PieceSlot>,
    pieces: Vec<PlacedPiece>,
}

impl PuzzleExercise {
    pub fn grid(&self) -> u32 {
        grid_size(self.data.pieces)
    }

    pub fn slots(&self) -> &[PieceSlot] {
        &self.slots
    }

    pub fn pieces(&self) -> &[PlacedPiece] {
        &self.pieces
    }

    pub fn piece(&self, piece_id: &str) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.id == piece_id)
    }

    /// Edge lengths of one cell.
    pub fn cell_size(&self) -> (f64, f64) {
        let n = f64::from(self.grid());
        (self.board.board_width / n, self.board.board_height / n)
    }

    /// Rounded share of pieces in their home cell.
    pub fn completion_percentage(&self) -> u32 {
        Score::from_checks(self.pieces.iter().map(|p| p.is_correct)).percentage()
    }

    /// Drop a piece at a board position. Returns `true` if it snapped home.
    pub fn drop_piece(&mut self, piece_id: &str, at: Point) -> bool {
        if self.props.read_only {
            return false;
        }
        let Some(home) = self.home_of(piece_id) else {
            return false;
        };
        let tolerance = self.board.snap_tolerance;
        let Some(piece) = self.pieces.iter_mut().find(|p| p.id == piece_id) else {
            return false;
        };
        let snaps = (at.x - home.x).abs() < tolerance && (at.y - home.y).abs() < tolerance;
        let target = if snaps { home } else { at };
        piece.x = target.x;
        piece.y = target.y;
        piece.is_correct = snaps;
        snaps
    }

    /// Place every piece in its home cell.
    pub fn show_solution(&mut self) {
        if self.props.read_only {
            return;
        }
        self.pieces = self
            .slots
            .iter()
            .map(|slot| PlacedPiece {
                id: slot.id.clone(),
                x: slot.home.x,
                y: slot.home.y,
                is_correct: true,
            })
            .collect();
    }

    fn home_of(&self, piece_id: &str) -> Option<Point> {
        self.slots.iter().find(|s| s.id == piece_id).map(|s| s.home)
    }

    fn layout(data: &PuzzleData, board: &PuzzleBoard) -> Vec<PieceSlot> {
        let n = grid_size(data.pieces);
        let (cw, ch) = (board.board_width / f64::from(n), board.board_height / f64::from(n));
        (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .take(data.pieces as usize)
            .map(|(row, col)| PieceSlot {
                id: format!("piece-{row}-{col}"),
                row,
                col,
                home: Point::new(f64::from(col) * cw, f64::from(row) * ch),
            })
            .collect()
    }

    fn scatter(&mut self) {
        let (cw, ch) = self.cell_size();
        let max_x = (self.board.board_width - cw).max(0.0);
        let top = self.board.board_height + SCATTER_GAP;
        let rng = &mut self.rng;
        self.pieces = self
            .slots
            .iter()
            .map(|slot| PlacedPiece {
                id: slot.id.clone(),
                x: rng.gen_range(0.0..=max_x),
                y: top + rng.gen_range(0.0..=ch.max(0.0)),
                is_correct: false,
            })
            .collect();
    }
}

impl Exercise for PuzzleExercise {
    type Data = PuzzleData;
    type Response = PuzzleResponse;

    fn mount(data: PuzzleData, mount: &Mount<'_>) -> Self {
        let board = mount.context.puzzle;
        let slots = Self::layout(&data, &board);
        let mut exercise = Self {
            data,
            props: mount.props,
            board,
            rng: widget_rng(mount.context),
            slots,
            pieces: Vec::new(),
        };
        exercise.scatter();
        exercise
    }

    fn restore(&mut self, response: PuzzleResponse) {
        let mut pieces: Vec<PlacedPiece> = response
            .pieces
            .into_iter()
            .filter(|p| self.slots.iter().any(|s| s.id == p.id))
            .collect();
        // Keep scattered positions for pieces the response does not mention.
        for piece in &self.pieces {
            if !pieces.iter().any(|p| p.id == piece.id) {
                pieces.push(piece.clone());
            }
        }
        self.pieces = pieces;
    }

    fn response(&self) -> PuzzleResponse {
        PuzzleResponse {
            pieces: self.pieces.clone(),
            completion_percentage: self.completion_percentage(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self.props.show_answers || self.completion_percentage() == 100 {
            Ok(())
        } else {
            Err(Notice::error("Complete the puzzle before saving"))
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(self.pieces.iter().map(|p| p.is_correct)))
    }

    fn reset(&mut self) {
        self.scatter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercisekit_core::model::QuestionType;
    use exercisekit_core::traits::RenderContext;

    fn mount(pieces: u32, show_answers: bool) -> PuzzleExercise {
        let context = RenderContext {
            shuffle_seed: Some(5),
            ..Default::default()
        };
        PuzzleExercise::mount(
            PuzzleData {
                pieces,
                ..Default::default()
            },
            &Mount {
                question_type: QuestionType::Puzzle,
                props: WidgetProps {
                    read_only: false,
                    show_answers,
                },
                context: &context,
            },
        )
    }

    #[test]
    fn grid_follows_piece_count() {
        assert_eq!(grid_size(4), 2);
        assert_eq!(grid_size(5), 3);
        assert_eq!(grid_size(9), 3);
        assert_eq!(grid_size(16), 4);
        assert_eq!(grid_size(17), 5);
    }

    #[test]
    fn pieces_are_truncated_and_scattered_below_board() {
        let ex = mount(7, false);
        assert_eq!(ex.grid(), 3);
        assert_eq!(ex.pieces().len(), 7);
        assert_eq!(ex.slots()[4].id, "piece-1-1");
        assert!(ex.pieces().iter().all(|p| p.y >= 420.0 && !p.is_correct));
        assert_eq!(ex.completion_percentage(), 0);
    }

    #[test]
    fn drop_near_home_snaps() {
        let mut ex = mount(4, false);
        assert!(ex.drop_piece("piece-1-1", Point::new(210.0, 190.0)));
        let piece = ex.piece("piece-1-1").unwrap();
        assert_eq!((piece.x, piece.y), (200.0, 200.0));
        assert!(piece.is_correct);
        assert_eq!(ex.completion_percentage(), 25);

        assert!(!ex.drop_piece("piece-0-0", Point::new(30.0, 0.0)));
        assert!(!ex.piece("piece-0-0").unwrap().is_correct);
    }

    #[test]
    fn save_gate_and_solution() {
        let mut ex = mount(9, false);
        assert_eq!(
            ex.check_complete(),
            Err(Notice::error("Complete the puzzle before saving"))
        );
        ex.show_solution();
        assert!(ex.check_complete().is_ok());
        assert_eq!(ex.response().completion_percentage, 100);

        ex.reset();
        assert_eq!(ex.completion_percentage(), 0);
        assert!(mount(9, true).check_complete().is_ok());
    }

    #[test]
    fn restore_keeps_response_order() {
        let mut ex = mount(4, false);
        let saved = PuzzleResponse {
            pieces: vec![
                PlacedPiece {
                    id: "piece-1-0".into(),
                    x: 0.0,
                    y: 200.0,
                    is_correct: true,
                },
                PlacedPiece {
                    id: "piece-0-1".into(),
                    x: 12.0,
                    y: 500.0,
                    is_correct: false,
                },
            ],
            completion_percentage: 25,
        };
        ex.restore(saved);
        let ids: Vec<&str> = ex.pieces().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids[..2], ["piece-1-0", "piece-0-1"]);
        assert_eq!(ids.len(), 4);
        assert_eq!(ex.completion_percentage(), 25);
    }
}
