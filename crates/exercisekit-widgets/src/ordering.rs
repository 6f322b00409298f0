//! Ordering: put the items into sequence.

use rand::rngs::StdRng;

use exercisekit_core::data::{OrderingData, OrderingItem};
use exercisekit_core::response::{OrderedItem, OrderingResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

use crate::rng::{move_within, shuffled, widget_rng};

pub struct OrderingExercise {
    data: OrderingData,
    props: WidgetProps,
    rng: StdRng,
    /// Item ids in their current order; an item's position is its index.
    order: Vec<String>,
}

impl OrderingExercise {
    /// Items in their current order.
    pub fn items(&self) -> Vec<&OrderingItem> {
        self.order
            .iter()
            .filter_map(|id| self.data.items.iter().find(|i| &i.id == id))
            .collect()
    }

    pub fn position_of(&self, item_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == item_id)
    }

    /// Move the item at `from` to `to` and renumber.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        !self.props.read_only && move_within(&mut self.order, from, to)
    }

    /// Correctness of one item, when answers are shown.
    pub fn item_status(&self, item_id: &str) -> Option<bool> {
        if !self.props.show_answers {
            return None;
        }
        let item = self.data.items.iter().find(|i| i.id == item_id)?;
        self.position_of(item_id)
            .map(|p| p == item.correct_position as usize)
    }

    fn shuffle(&mut self) {
        let ids: Vec<String> = self.data.items.iter().map(|i| i.id.clone()).collect();
        self.order = shuffled(&ids, &mut self.rng);
    }
}

impl Exercise for OrderingExercise {
    type Data = OrderingData;
    type Response = OrderingResponse;

    fn mount(data: OrderingData, mount: &Mount<'_>) -> Self {
        let mut exercise = Self {
            data,
            props: mount.props,
            rng: widget_rng(mount.context),
            order: Vec::new(),
        };
        exercise.shuffle();
        exercise
    }

    fn restore(&mut self, response: OrderingResponse) {
        let mut saved = response.ordered_items;
        saved.sort_by_key(|i| i.position);
        let mut order: Vec<String> = Vec::with_capacity(self.data.items.len());
        let saved_ids = saved.into_iter().map(|i| i.id);
        // Items added since the response was saved go last.
        let authored_ids = self.data.items.iter().map(|i| i.id.clone());
        for id in saved_ids.chain(authored_ids) {
            if self.data.items.iter().any(|i| i.id == id) && !order.contains(&id) {
                order.push(id);
            }
        }
        self.order = order;
    }

    fn response(&self) -> OrderingResponse {
        OrderingResponse {
            ordered_items: self
                .order
                .iter()
                .enumerate()
                .map(|(position, id)| OrderedItem {
                    id: id.clone(),
                    position: position as u32,
                })
                .collect(),
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(self.data.items.iter().map(|item| {
            self.position_of(&item.id) == Some(item.correct_position as usize)
        })))
    }

    fn reset(&mut self) {
        self.shuffle();
    }
}
