//! Ordering form. The list order is the correct order.

use serde_json::Value;

use exercisekit_core::data::{OrderingData, OrderingItem, QuestionData};
use exercisekit_core::model::QuestionType;

use crate::error::FormError;
use crate::form::{
    check_floor, initial_payload, new_id, position_of, require, AuthoringForm, Emitter,
    FormWarning,
};

pub const MIN_ITEMS: usize = 2;

pub struct OrderingForm {
    data: OrderingData,
    emitter: Emitter,
}

impl OrderingForm {
    pub fn new(initial: Option<&Value>, emitter: Emitter) -> Self {
        let mut data: OrderingData = initial_payload(initial);
        data.items.sort_by_key(|i| i.correct_position);
        while data.items.len() < MIN_ITEMS {
            let position = data.items.len() as u32;
            data.items.push(blank_item(position));
        }
        Self { data, emitter }
    }

    pub fn items(&self) -> &[OrderingItem] {
        &self.data.items
    }

    /// Append an item at the end of the sequence.
    pub fn add_item(&mut self) -> &str {
        let position = self.data.items.len() as u32;
        self.data.items.push(blank_item(position));
        self.flush();
        self.data.items.last().map(|i| i.id.as_str()).unwrap_or_default()
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<(), FormError> {
        let index = self.index_of(item_id)?;
        check_floor(QuestionType::Ordering, self.data.items.len(), MIN_ITEMS, "items")?;
        self.data.items.remove(index);
        self.resequence();
        self.flush();
        Ok(())
    }

    /// Move an item to `to` in the sequence.
    pub fn move_item(&mut self, item_id: &str, to: usize) -> Result<(), FormError> {
        let from = self.index_of(item_id)?;
        if to >= self.data.items.len() {
            return Err(FormError::OutOfRange { noun: "item", index: to });
        }
        if from != to {
            let item = self.data.items.remove(from);
            self.data.items.insert(to, item);
            self.resequence();
            self.flush();
        }
        Ok(())
    }

    pub fn set_text(&mut self, item_id: &str, text: impl Into<String>) -> Result<(), FormError> {
        let index = self.index_of(item_id)?;
        self.data.items[index].text = text.into();
        self.flush_debounced();
        Ok(())
    }

    pub fn set_image(&mut self, item_id: &str, image_url: Option<String>) -> Result<(), FormError> {
        let index = self.index_of(item_id)?;
        self.data.items[index].image_url = image_url.filter(|url| !url.is_empty());
        self.flush();
        Ok(())
    }

    fn resequence(&mut self) {
        for (position, item) in self.data.items.iter_mut().enumerate() {
            item.correct_position = position as u32;
        }
    }

    fn index_of(&self, item_id: &str) -> Result<usize, FormError> {
        position_of(&self.data.items, item_id, |i| i.id.as_str(), "item")
    }
}

fn blank_item(correct_position: u32) -> OrderingItem {
    OrderingItem {
        id: new_id(),
        correct_position,
        ..Default::default()
    }
}

impl AuthoringForm for OrderingForm {
    fn question_type(&self) -> QuestionType {
        QuestionType::Ordering
    }

    fn question_data(&self) -> QuestionData {
        QuestionData::Ordering(self.data.clone())
    }

    fn validate(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        for (i, item) in self.data.items.iter().enumerate() {
            require(&mut warnings, format!("items[{i}].text"), &item.text, "Item text");
        }
        warnings
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}
