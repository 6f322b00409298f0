//! Multiple choice, single or multiple answer.

use std::collections::HashSet;

use exercisekit_core::data::{ChoiceOption, MultipleChoiceData};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::MultipleChoiceResponse;
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

/// Per-option feedback shown with answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    CorrectSelected,
    IncorrectSelected,
    /// A correct option the learner did not pick.
    Missed,
    Neutral,
}

pub struct MultipleChoiceExercise {
    data: MultipleChoiceData,
    props: WidgetProps,
    selected: Vec<String>,
}

impl MultipleChoiceExercise {
    pub fn options(&self) -> &[ChoiceOption] {
        &self.data.options
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, option_id: &str) -> bool {
        self.selected.iter().any(|id| id == option_id)
    }

    /// Replace the selection in single mode; toggle membership otherwise.
    pub fn select(&mut self, option_id: &str) {
        if self.props.read_only || !self.data.options.iter().any(|o| o.id == option_id) {
            return;
        }
        if !self.data.allow_multiple {
            self.selected = vec![option_id.to_string()];
        } else if self.is_selected(option_id) {
            self.selected.retain(|id| id != option_id);
        } else {
            self.selected.push(option_id.to_string());
        }
    }

    pub fn option_status(&self, option_id: &str) -> Option<OptionStatus> {
        if !self.props.show_answers {
            return None;
        }
        let option = self.data.options.iter().find(|o| o.id == option_id)?;
        Some(match (self.is_selected(option_id), option.is_correct) {
            (true, true) => OptionStatus::CorrectSelected,
            (true, false) => OptionStatus::IncorrectSelected,
            (false, true) => OptionStatus::Missed,
            (false, false) => OptionStatus::Neutral,
        })
    }

    fn is_correct(&self) -> bool {
        let chosen: HashSet<&str> = self.selected.iter().map(String::as_str).collect();
        let correct: HashSet<&str> = self
            .data
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
            .collect();
        chosen == correct
    }
}

impl Exercise for MultipleChoiceExercise {
    type Data = MultipleChoiceData;
    type Response = MultipleChoiceResponse;

    fn mount(data: MultipleChoiceData, mount: &Mount<'_>) -> Self {
        Self {
            data,
            props: mount.props,
            selected: Vec::new(),
        }
    }

    /// Unknown and repeated ids are dropped; single mode keeps the first.
    fn restore(&mut self, response: MultipleChoiceResponse) {
        self.selected.clear();
        for id in response.selected_options {
            if self.is_selected(&id) || !self.data.options.iter().any(|o| o.id == id) {
                continue;
            }
            self.selected.push(id);
            if !self.data.allow_multiple {
                break;
            }
        }
    }

    fn response(&self) -> MultipleChoiceResponse {
        MultipleChoiceResponse {
            selected_options: self.selected.clone(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self.selected.is_empty() {
            Err(Notice::error("Please select at least one option"))
        } else {
            Ok(())
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::all_or_nothing(self.is_correct()))
    }

    fn reset(&mut self) {
        self.selected.clear();
    }
}
