//! Matching: pair each left item with a right item.
//!
//! The left column keeps its authored order and the right column is
//! shuffled. Both columns are identified by pair id, so a match is correct
//! exactly when `leftId == rightId`.

use rand::rngs::StdRng;

use exercisekit_core::data::{MatchingData, MatchingPair};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{MatchedPair, MatchingResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

use crate::rng::{move_within, shuffled, widget_rng};

pub struct MatchingExercise {
    data: MatchingData,
    props: WidgetProps,
    rng: StdRng,
    left_order: Vec<String>,
    right_order: Vec<String>,
    matches: Vec<MatchedPair>,
    active_left: Option<String>,
}

impl MatchingExercise {
    /// Left items in display order.
    pub fn left_items(&self) -> Vec<&MatchingPair> {
        self.ordered(&self.left_order)
    }

    /// Right items in display order.
    pub fn right_items(&self) -> Vec<&MatchingPair> {
        self.ordered(&self.right_order)
    }

    fn ordered(&self, order: &[String]) -> Vec<&MatchingPair> {
        order
            .iter()
            .filter_map(|id| self.data.pairs.iter().find(|p| &p.id == id))
            .collect()
    }

    pub fn active_left(&self) -> Option<&str> {
        self.active_left.as_deref()
    }

    pub fn matches(&self) -> &[MatchedPair] {
        &self.matches
    }

    /// The right id currently matched to a left item.
    pub fn match_for(&self, left_id: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.left_id == left_id)
            .map(|m| m.right_id.as_str())
    }

    /// Toggle a left item as the active selection.
    pub fn select_left(&mut self, left_id: &str) {
        if self.props.read_only || !self.left_order.iter().any(|id| id == left_id) {
            return;
        }
        if self.active_left.as_deref() == Some(left_id) {
            self.active_left = None;
        } else {
            self.active_left = Some(left_id.to_string());
        }
    }

    /// Match the active left item to a right item. Returns `true` if a
    /// match was created or replaced.
    pub fn select_right(&mut self, right_id: &str) -> bool {
        if self.props.read_only || !self.right_order.iter().any(|id| id == right_id) {
            return false;
        }
        let Some(left_id) = self.active_left.take() else {
            return false;
        };
        match self.matches.iter_mut().find(|m| m.left_id == left_id) {
            Some(existing) => existing.right_id = right_id.to_string(),
            None => self.matches.push(MatchedPair {
                left_id,
                right_id: right_id.to_string(),
            }),
        }
        true
    }

    /// Reorder the left column. Visual only.
    pub fn move_left(&mut self, from: usize, to: usize) {
        if !self.props.read_only {
            move_within(&mut self.left_order, from, to);
        }
    }

    /// Reorder the right column. Visual only.
    pub fn move_right(&mut self, from: usize, to: usize) {
        if !self.props.read_only {
            move_within(&mut self.right_order, from, to);
        }
    }

    /// Correctness of one left item's match, when answers are shown.
    pub fn pair_status(&self, left_id: &str) -> Option<bool> {
        if !self.props.show_answers {
            return None;
        }
        self.match_for(left_id).map(|right_id| right_id == left_id)
    }

    fn shuffle_right(&mut self) {
        let ids: Vec<String> = self.data.pairs.iter().map(|p| p.id.clone()).collect();
        self.right_order = shuffled(&ids, &mut self.rng);
    }
}

impl Exercise for MatchingExercise {
    type Data = MatchingData;
    type Response = MatchingResponse;

    fn mount(data: MatchingData, mount: &Mount<'_>) -> Self {
        let left_order = data.pairs.iter().map(|p| p.id.clone()).collect();
        let mut exercise = Self {
            data,
            props: mount.props,
            rng: widget_rng(mount.context),
            left_order,
            right_order: Vec::new(),
            matches: Vec::new(),
            active_left: None,
        };
        exercise.shuffle_right();
        exercise
    }

    fn restore(&mut self, response: MatchingResponse) {
        self.matches = response.pairs;
        self.active_left = None;
    }

    fn response(&self) -> MatchingResponse {
        MatchingResponse {
            pairs: self.matches.clone(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self
            .data
            .pairs
            .iter()
            .all(|p| self.match_for(&p.id).is_some())
        {
            Ok(())
        } else {
            Err(Notice::error("Please match all items before saving"))
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(
            self.data
                .pairs
                .iter()
                .map(|p| self.match_for(&p.id) == Some(p.id.as_str())),
        ))
    }

    fn reset(&mut self) {
        self.matches.clear();
        self.active_left = None;
        self.shuffle_right();
    }
}
