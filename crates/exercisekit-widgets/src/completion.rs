//! Completion: fill the blanks in a passage.
//!
//! Blank locations come in two conventions. When the text contains any
//! `[blankN]` token, tokens mark the blanks (`N` is the blank's `position`)
//! and their order in the text is authoritative. Otherwise `position` is a
//! character offset and blanks are inserted in ascending offset order.

use once_cell::sync::Lazy;
use regex::Regex;

use exercisekit_core::data::{Blank, CompletionData};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{BlankAnswer, CompletionResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

static BLANK_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[blank(\d+)\]").expect("valid blank token pattern"));

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// How blank locations were authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankConvention {
    /// `[blankN]` tokens in the text.
    Placeholder,
    /// `position` is a character offset.
    Offset,
}

/// A piece of the laid-out passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Blank { blank_id: String },
}

/// A layout problem. The passage still renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    /// A blank has no `[blankN]` token and is left out.
    MissingToken { blank_id: String },
    /// A token matches no blank and is kept as literal text.
    UnknownToken { position: u32 },
    /// A second token for the same blank, kept as literal text.
    DuplicateToken { position: u32 },
}

/// The passage split into text and blank slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankTemplate {
    pub convention: BlankConvention,
    pub segments: Vec<Segment>,
    pub issues: Vec<TemplateIssue>,
}

impl BlankTemplate {
    pub fn parse(data: &CompletionData) -> Self {
        if BLANK_TOKEN.is_match(&data.text) {
            Self::parse_placeholders(data)
        } else {
            Self::parse_offsets(data)
        }
    }

    fn parse_placeholders(data: &CompletionData) -> Self {
        let mut segments = Vec::new();
        let mut issues = Vec::new();
        let mut placed: Vec<&str> = Vec::new();
        let mut text = String::new();
        let mut last = 0;

        for caps in BLANK_TOKEN.captures_iter(&data.text) {
            let Some(token) = caps.get(0) else { continue };
            text.push_str(&data.text[last..token.start()]);
            last = token.end();

            let position = caps[1].parse::<u32>().ok();
            let blank = position.and_then(|n| data.blanks.iter().find(|b| b.position == n));
            match (position, blank) {
                (_, Some(blank)) if !placed.contains(&blank.id.as_str()) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Blank {
                        blank_id: blank.id.clone(),
                    });
                    placed.push(&blank.id);
                }
                (_, Some(blank)) => {
                    issues.push(TemplateIssue::DuplicateToken {
                        position: blank.position,
                    });
                    text.push_str(token.as_str());
                }
                (n, None) => {
                    issues.push(TemplateIssue::UnknownToken {
                        position: n.unwrap_or(u32::MAX),
                    });
                    text.push_str(token.as_str());
                }
            }
        }
        text.push_str(&data.text[last..]);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        for blank in &data.blanks {
            if !placed.contains(&blank.id.as_str()) {
                issues.push(TemplateIssue::MissingToken {
                    blank_id: blank.id.clone(),
                });
            }
        }

        Self {
            convention: BlankConvention::Placeholder,
            segments,
            issues,
        }
    }

    fn parse_offsets(data: &CompletionData) -> Self {
        let mut blanks: Vec<&Blank> = Vec::new();
        for blank in &data.blanks {
            if !blanks.iter().any(|b| b.id == blank.id) {
                blanks.push(blank);
            }
        }
        blanks.sort_by_key(|b| b.position);

        let char_count = data.text.chars().count();
        let byte_at = |offset: usize| {
            data.text
                .char_indices()
                .nth(offset)
                .map(|(i, _)| i)
                .unwrap_or(data.text.len())
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for blank in blanks {
            let offset = (blank.position as usize).min(char_count);
            let end = byte_at(offset);
            if end > last {
                segments.push(Segment::Text(data.text[last..end].to_string()));
                last = end;
            }
            segments.push(Segment::Blank {
                blank_id: blank.id.clone(),
            });
        }
        if last < data.text.len() {
            segments.push(Segment::Text(data.text[last..].to_string()));
        }

        Self {
            convention: BlankConvention::Offset,
            segments,
            issues: Vec::new(),
        }
    }

    /// Blank ids in layout order.
    pub fn blank_ids(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Blank { blank_id } => Some(blank_id.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Render the passage with each blank replaced by `fill(blank_id)`.
    pub fn render(&self, mut fill: impl FnMut(&str) -> String) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(text) => text.clone(),
                Segment::Blank { blank_id } => fill(blank_id),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Per-blank feedback shown with answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlankStatus {
    Unanswered,
    Correct,
    Incorrect { expected: String },
}

pub struct CompletionExercise {
    data: CompletionData,
    props: WidgetProps,
    template: BlankTemplate,
    answers: Vec<BlankAnswer>,
}

impl CompletionExercise {
    pub fn template(&self) -> &BlankTemplate {
        &self.template
    }

    pub fn answer(&self, blank_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.blank_id == blank_id)
            .map(|a| a.answer.as_str())
    }

    pub fn set_answer(&mut self, blank_id: &str, answer: impl Into<String>) {
        if self.props.read_only {
            return;
        }
        if let Some(slot) = self.answers.iter_mut().find(|a| a.blank_id == blank_id) {
            slot.answer = answer.into();
        }
    }

    pub fn blank_status(&self, blank_id: &str) -> Option<BlankStatus> {
        if !self.props.show_answers {
            return None;
        }
        let blank = self.data.blanks.iter().find(|b| b.id == blank_id)?;
        let answer = self.answer(blank_id)?;
        Some(if answer.trim().is_empty() {
            BlankStatus::Unanswered
        } else if answers_match(answer, &blank.answer) {
            BlankStatus::Correct
        } else {
            BlankStatus::Incorrect {
                expected: blank.answer.clone(),
            }
        })
    }

    fn empty_answers(template: &BlankTemplate) -> Vec<BlankAnswer> {
        template
            .blank_ids()
            .into_iter()
            .map(|id| BlankAnswer {
                blank_id: id.to_string(),
                answer: String::new(),
            })
            .collect()
    }
}

fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

impl Exercise for CompletionExercise {
    type Data = CompletionData;
    type Response = CompletionResponse;

    fn mount(data: CompletionData, mount: &Mount<'_>) -> Self {
        let template = BlankTemplate::parse(&data);
        for issue in &template.issues {
            tracing::warn!("completion layout: {issue:?}");
        }
        let answers = Self::empty_answers(&template);
        Self {
            data,
            props: mount.props,
            template,
            answers,
        }
    }

    fn restore(&mut self, response: CompletionResponse) {
        for slot in &mut self.answers {
            if let Some(saved) = response.answers.iter().find(|a| a.blank_id == slot.blank_id) {
                slot.answer = saved.answer.clone();
            }
        }
    }

    fn response(&self) -> CompletionResponse {
        CompletionResponse {
            answers: self.answers.clone(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self.answers.iter().any(|a| a.answer.trim().is_empty()) {
            Err(Notice::error("Please fill in all blanks before saving"))
        } else {
            Ok(())
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(self.answers.iter().map(|a| {
            self.data
                .blanks
                .iter()
                .find(|b| b.id == a.blank_id)
                .is_some_and(|b| answers_match(&a.answer, &b.answer))
        })))
    }

    fn reset(&mut self) {
        self.answers = Self::empty_answers(&self.template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercisekit_core::model::QuestionType;
    use exercisekit_core::traits::RenderContext;

    fn blank(id: &str, answer: &str, position: u32) -> Blank {
        Blank {
            id: id.into(),
            answer: answer.into(),
            position,
        }
    }

    fn mount(data: CompletionData, show_answers: bool) -> CompletionExercise {
        let context = RenderContext::default();
        CompletionExercise::mount(
            data,
            &Mount {
                question_type: QuestionType::Completion,
                props: WidgetProps {
                    read_only: false,
                    show_answers,
                },
                context: &context,
            },
        )
    }

    #[test]
    fn placeholder_order_follows_text_not_positions() {
        let data = CompletionData {
            text: "The [blank2] sat on the [blank1].".into(),
            blanks: vec![blank("a", "mat", 1), blank("b", "cat", 2)],
        };
        let template = BlankTemplate::parse(&data);
        assert_eq!(template.convention, BlankConvention::Placeholder);
        assert_eq!(template.blank_ids(), vec!["b", "a"]);
        assert_eq!(
            template.render(|id| format!("<{id}>")),
            "The <b> sat on the <a>."
        );
        assert!(template.issues.is_empty());
    }

    #[test]
    fn placeholder_issues_are_reported() {
        let data = CompletionData {
            text: "[blank1] and [blank1] and [blank9]".into(),
            blanks: vec![blank("a", "x", 1), blank("b", "y", 2)],
        };
        let template = BlankTemplate::parse(&data);
        assert_eq!(template.blank_ids(), vec!["a"]);
        assert!(template
            .issues
            .contains(&TemplateIssue::DuplicateToken { position: 1 }));
        assert!(template
            .issues
            .contains(&TemplateIssue::UnknownToken { position: 9 }));
        assert!(template.issues.contains(&TemplateIssue::MissingToken {
            blank_id: "b".into()
        }));
        assert_eq!(template.render(|_| "_".into()), "_ and [blank1] and [blank9]");
    }

    #[test]
    fn offsets_insert_in_ascending_order() {
        let data = CompletionData {
            text: "Paris is in .".into(),
            blanks: vec![blank("late", "France", 12), blank("early", "", 0)],
        };
        let template = BlankTemplate::parse(&data);
        assert_eq!(template.convention, BlankConvention::Offset);
        assert_eq!(template.blank_ids(), vec!["early", "late"]);
        assert_eq!(template.render(|id| format!("[{id}]")), "[early]Paris is in [late].");
    }

    #[test]
    fn repeated_offset_blank_gets_one_slot() {
        let data = CompletionData {
            text: "a b c".into(),
            blanks: vec![blank("b", "x", 1), blank("b", "y", 3)],
        };
        let mut ex = mount(data, false);
        assert_eq!(ex.template().blank_ids(), vec!["b"]);

        ex.set_answer("b", "x");
        assert!(ex.check_complete().is_ok());
        assert_eq!(ex.response().answers.len(), 1);
    }

    #[test]
    fn save_gate_and_case_insensitive_scoring() {
        let data = CompletionData {
            text: "[blank1] is the capital of [blank2].".into(),
            blanks: vec![blank("1", "Paris", 1), blank("2", "France", 2)],
        };
        let mut ex = mount(data, true);
        ex.set_answer("1", "paris");
        ex.set_answer("2", "   ");
        assert_eq!(
            ex.check_complete(),
            Err(Notice::error("Please fill in all blanks before saving"))
        );
        assert_eq!(ex.blank_status("2"), Some(BlankStatus::Unanswered));

        ex.set_answer("2", "Spain");
        assert!(ex.check_complete().is_ok());
        assert_eq!(ex.blank_status("1"), Some(BlankStatus::Correct));
        assert_eq!(
            ex.blank_status("2"),
            Some(BlankStatus::Incorrect {
                expected: "France".into()
            })
        );
        assert_eq!(ex.score(), Some(Score::new(1, 2)));

        let response = ex.response();
        assert_eq!(response.answers.len(), 2);
        assert_eq!(response.answers[0].blank_id, "1");
    }

    #[test]
    fn restore_and_reset() {
        let data = CompletionData {
            text: "[blank1]".into(),
            blanks: vec![blank("1", "yes", 1)],
        };
        let mut ex = mount(data, false);
        ex.restore(CompletionResponse {
            answers: vec![
                BlankAnswer {
                    blank_id: "1".into(),
                    answer: "Yes".into(),
                },
                BlankAnswer {
                    blank_id: "stale".into(),
                    answer: "ignored".into(),
                },
            ],
        });
        assert_eq!(ex.answer("1"), Some("Yes"));
        assert_eq!(ex.response().answers.len(), 1);
        assert_eq!(ex.blank_status("1"), None);

        ex.reset();
        assert_eq!(ex.answer("1"), Some(""));
    }
}
