//! Identification: find named items on a picture.
//!
//! The learner picks an item name, then clicks where it is. A click within
//! the item's radius of its coordinates counts.

use exercisekit_core::data::{IdentifiableItem, IdentificationData, Point};
use exercisekit_core::notice::Notice;
use exercisekit_core::response::{IdentificationResponse, IdentifiedItem};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

pub struct IdentificationExercise {
    data: IdentificationData,
    props: WidgetProps,
    identified: Vec<String>,
    active: Option<String>,
}

impl IdentificationExercise {
    pub fn items(&self) -> &[IdentifiableItem] {
        &self.data.items_to_identify
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_identified(&self, item_id: &str) -> bool {
        self.identified.iter().any(|id| id == item_id)
    }

    /// Pick the item the next click is for.
    pub fn select(&mut self, item_id: &str) -> Option<Notice> {
        if self.props.read_only {
            return None;
        }
        let item = self.item(item_id)?;
        if self.is_identified(item_id) {
            return Some(Notice::info(format!("{} is already identified", item.name)));
        }
        self.active = Some(item_id.to_string());
        None
    }

    /// A click on the image for the active item.
    pub fn click(&mut self, at: Point) -> Option<Notice> {
        if self.props.read_only {
            return None;
        }
        let item = self.item(self.active.as_deref()?)?;
        if at.distance(&item.coordinates) <= item.radius {
            let notice = Notice::success(format!("Correctly identified: {}", item.name));
            let id = item.id.clone();
            self.identified.push(id);
            self.active = None;
            Some(notice)
        } else {
            Some(Notice::error("Try again! Click closer to the item."))
        }
    }

    /// Mark every item identified.
    pub fn reveal(&mut self) {
        self.identified = self
            .data
            .items_to_identify
            .iter()
            .map(|i| i.id.clone())
            .collect();
        self.active = None;
    }

    fn item(&self, item_id: &str) -> Option<&IdentifiableItem> {
        self.data.items_to_identify.iter().find(|i| i.id == item_id)
    }
}

impl Exercise for IdentificationExercise {
    type Data = IdentificationData;
    type Response = IdentificationResponse;

    fn mount(data: IdentificationData, mount: &Mount<'_>) -> Self {
        Self {
            data,
            props: mount.props,
            identified: Vec::new(),
            active: None,
        }
    }

    fn restore(&mut self, response: IdentificationResponse) {
        self.identified = response
            .identified_items
            .into_iter()
            .map(|i| i.id)
            .collect();
    }

    fn response(&self) -> IdentificationResponse {
        IdentificationResponse {
            identified_items: self
                .identified
                .iter()
                .map(|id| IdentifiedItem { id: id.clone() })
                .collect(),
        }
    }

    fn check_complete(&self) -> Result<(), Notice> {
        let all_found = self
            .data
            .items_to_identify
            .iter()
            .all(|i| self.is_identified(&i.id));
        if all_found || self.props.show_answers {
            Ok(())
        } else {
            Err(Notice::error("Please identify all items before saving"))
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(
            self.data
                .items_to_identify
                .iter()
                .map(|i| self.is_identified(&i.id)),
        ))
    }

    fn reset(&mut self) {
        self.identified.clear();
        self.active = None;
    }
}
