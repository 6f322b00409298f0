//! Sorting and categorization: drop every item into a category.

use exercisekit_core::data::{SortCategory, SortItem, SortingData};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{SortedItem, SortingResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

pub struct SortingExercise {
    data: SortingData,
    props: WidgetProps,
    placements: Vec<SortedItem>,
}

impl SortingExercise {
    pub fn categories(&self) -> &[SortCategory] {
        &self.data.categories
    }

    pub fn criteria(&self) -> &str {
        &self.data.sorting_criteria
    }

    /// Items still on the unsorted tray, in authored order.
    pub fn unsorted(&self) -> Vec<&SortItem> {
        self.data
            .items
            .iter()
            .filter(|item| self.category_of(&item.id).is_none())
            .collect()
    }

    /// Items currently in a category.
    pub fn items_in(&self, category_id: &str) -> Vec<&SortItem> {
        self.data
            .items
            .iter()
            .filter(|item| self.category_of(&item.id) == Some(category_id))
            .collect()
    }

    pub fn category_of(&self, item_id: &str) -> Option<&str> {
        self.placements
            .iter()
            .find(|p| p.item_id == item_id)
            .map(|p| p.category_id.as_str())
    }

    /// Drop an item on a category, or back on the tray with `None`.
    pub fn place(&mut self, item_id: &str, category_id: Option<&str>) {
        if self.props.read_only || !self.data.items.iter().any(|i| i.id == item_id) {
            return;
        }
        self.placements.retain(|p| p.item_id != item_id);
        if let Some(category_id) = category_id {
            if self.data.categories.iter().any(|c| c.id == category_id) {
                self.placements.push(SortedItem {
                    item_id: item_id.to_string(),
                    category_id: category_id.to_string(),
                });
            }
        }
    }

    pub fn item_status(&self, item_id: &str) -> Option<bool> {
        if !self.props.show_answers {
            return None;
        }
        let item = self.data.items.iter().find(|i| i.id == item_id)?;
        self.category_of(item_id)
            .map(|c| c == item.correct_category_id)
    }
}

impl Exercise for SortingExercise {
    type Data = SortingData;
    type Response = SortingResponse;

    fn mount(data: SortingData, mount: &Mount<'_>) -> Self {
        Self {
            data,
            props: mount.props,
            placements: Vec::new(),
        }
    }

    fn restore(&mut self, response: SortingResponse) {
        self.placements = response.sorted_items;
    }

    fn response(&self) -> SortingResponse {
        SortingResponse {
            sorted_items: self.placements.clone(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        if self.unsorted().is_empty() {
            Ok(())
        } else {
            Err(Notice::error("Please sort all items into categories"))
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(self.data.items.iter().map(|item| {
            self.category_of(&item.id) == Some(item.correct_category_id.as_str())
        })))
    }

    fn reset(&mut self) {
        self.placements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercisekit_core::model::QuestionType;
    use exercisekit_core::traits::RenderContext;

    fn mount() -> SortingExercise {
        let context = RenderContext::default();
        let category = |id: &str| SortCategory {
            id: id.into(),
            name: id.into(),
            image_url: None,
            description: None,
        };
        let item = |id: &str, category: &str| SortItem {
            id: id.into(),
            name: id.into(),
            image_url: None,
            correct_category_id: category.into(),
        };
        SortingExercise::mount(
            SortingData {
                categories: vec![category("fruit"), category("veg")],
                items: vec![item("apple", "fruit"), item("carrot", "veg")],
                sorting_criteria: "Food group".into(),
            },
            &Mount {
                question_type: QuestionType::Categorization,
                props: WidgetProps {
                    read_only: false,
                    show_answers: true,
                },
                context: &context,
            },
        )
    }

    #[test]
    fn items_start_unsorted_and_gate_blocks_save() {
        let mut ex = mount();
        assert_eq!(ex.unsorted().len(), 2);
        ex.place("apple", Some("fruit"));
        assert_eq!(
            ex.check_complete(),
            Err(Notice::error("Please sort all items into categories"))
        );
        ex.place("carrot", Some("fruit"));
        assert!(ex.check_complete().is_ok());
        assert_eq!(ex.item_status("carrot"), Some(false));
        assert_eq!(ex.score(), Some(Score::new(1, 2)));
    }

    #[test]
    fn items_move_between_categories_and_back_to_tray() {
        let mut ex = mount();
        ex.place("apple", Some("veg"));
        ex.place("apple", Some("fruit"));
        assert_eq!(ex.response().sorted_items.len(), 1);
        assert_eq!(ex.items_in("fruit").len(), 1);

        ex.place("apple", None);
        assert_eq!(ex.unsorted().len(), 2);

        ex.place("apple", Some("no-such-category"));
        assert_eq!(ex.category_of("apple"), None);
    }
}
