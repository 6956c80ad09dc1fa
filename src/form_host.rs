// Form host: the elements the booking form reads from and writes to
// A browser binding implements FormHost over the DOM; InMemoryForm backs tests and previews

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::FieldIds;

// Errors raised while binding to a host or loading its configuration
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Missing form element: {0}")]
    MissingElement(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Every element the booking form touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    CheckIn,
    CheckOut,
    RoomsCount,
    NightsCount,
    RoomsPreview,
    TotalPrice,
    PricePerNight,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::CheckIn,
        Field::CheckOut,
        Field::RoomsCount,
        Field::NightsCount,
        Field::RoomsPreview,
        Field::TotalPrice,
        Field::PricePerNight,
    ];

    // The price element is optional: without it the nightly price is 0
    pub const REQUIRED: [Field; 6] = [
        Field::CheckIn,
        Field::CheckOut,
        Field::RoomsCount,
        Field::NightsCount,
        Field::RoomsPreview,
        Field::TotalPrice,
    ];
}

// Access to form elements by field.
// Reads return None when the element does not exist; writes to a missing element are ignored.
pub trait FormHost {
    fn has_element(&self, field: Field) -> bool;

    // Current value of an input element
    fn value(&self, field: Field) -> Option<String>;

    fn set_value(&mut self, field: Field, value: &str);

    // Minimum selectable value of a date input
    fn min(&self, field: Field) -> Option<String>;

    fn set_min(&mut self, field: Field, min: &str);

    // Text content of a display element
    fn text(&self, field: Field) -> Option<String>;

    fn set_text(&mut self, field: Field, text: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub value: String,
    pub min: Option<String>,
    pub text: String,
}

// Elements held in a map keyed by element id
#[derive(Debug, Clone)]
pub struct InMemoryForm {
    ids: FieldIds,
    elements: HashMap<String, Element>,
}

impl Default for InMemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryForm {
    pub fn new() -> Self {
        Self::with_ids(FieldIds::default())
    }

    // Create every element empty under the given ids
    pub fn with_ids(ids: FieldIds) -> Self {
        let elements = Field::ALL
            .iter()
            .map(|field| (ids.id(*field).to_string(), Element::default()))
            .collect();
        Self { ids, elements }
    }

    pub fn without(mut self, field: Field) -> Self {
        let id = self.ids.id(field).to_string();
        self.elements.remove(&id);
        self
    }

    pub fn with_price_text(mut self, text: &str) -> Self {
        self.set_text(Field::PricePerNight, text);
        self
    }

    pub fn with_value(mut self, field: Field, value: &str) -> Self {
        self.set_value(field, value);
        self
    }

    pub fn element(&self, field: Field) -> Option<&Element> {
        self.elements.get(self.ids.id(field))
    }

    fn element_mut(&mut self, field: Field) -> Option<&mut Element> {
        let element = self.elements.get_mut(self.ids.id(field));
        if element.is_none() {
            debug!(?field, "Write to missing form element ignored");
        }
        element
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let value = |field: Field| self.value(field).unwrap_or_default();
        let text = |field: Field| self.text(field).unwrap_or_default();

        FormSnapshot {
            check_in: value(Field::CheckIn),
            check_out: value(Field::CheckOut),
            check_out_min: self.min(Field::CheckOut),
            rooms_count: value(Field::RoomsCount),
            nights: text(Field::NightsCount),
            rooms_preview: text(Field::RoomsPreview),
            total_price: text(Field::TotalPrice),
        }
    }
}

impl FormHost for InMemoryForm {
    fn has_element(&self, field: Field) -> bool {
        self.element(field).is_some()
    }

    fn value(&self, field: Field) -> Option<String> {
        self.element(field).map(|e| e.value.clone())
    }

    fn set_value(&mut self, field: Field, value: &str) {
        if let Some(element) = self.element_mut(field) {
            element.value = value.to_string();
        }
    }

    fn min(&self, field: Field) -> Option<String> {
        self.element(field).and_then(|e| e.min.clone())
    }

    fn set_min(&mut self, field: Field, min: &str) {
        if let Some(element) = self.element_mut(field) {
            element.min = Some(min.to_string());
        }
    }

    fn text(&self, field: Field) -> Option<String> {
        self.element(field).map(|e| e.text.clone())
    }

    fn set_text(&mut self, field: Field, text: &str) {
        if let Some(element) = self.element_mut(field) {
            element.text = text.to_string();
        }
    }
}

// What the user sees on the form at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub check_in: String,
    pub check_out: String,
    pub check_out_min: Option<String>,
    pub rooms_count: String,
    pub nights: String,
    pub rooms_preview: String,
    pub total_price: String,
}

impl FormSnapshot {
    pub fn to_json(&self) -> Result<String, FormError> {
        serde_json::to_string(self).map_err(|e| FormError::JsonParseError(e.to_string()))
    }
}
