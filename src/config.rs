// Booking form configuration: element ids and price text format

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::form_host::{Field, FormError};

// Element ids the form is bound to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldIds {
    pub check_in: String,
    pub check_out: String,
    pub rooms_count: String,
    pub nights_count: String,
    pub rooms_preview: String,
    pub total_price: String,
    pub price_per_night: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            check_in: "check_in".to_string(),
            check_out: "check_out".to_string(),
            rooms_count: "rooms_count".to_string(),
            nights_count: "nightsCount".to_string(),
            rooms_preview: "roomsCountPreview".to_string(),
            total_price: "totalPrice".to_string(),
            price_per_night: "pricePerNight".to_string(),
        }
    }
}

impl FieldIds {
    pub fn id(&self, field: Field) -> &str {
        match field {
            Field::CheckIn => &self.check_in,
            Field::CheckOut => &self.check_out,
            Field::RoomsCount => &self.rooms_count,
            Field::NightsCount => &self.nights_count,
            Field::RoomsPreview => &self.rooms_preview,
            Field::TotalPrice => &self.total_price,
            Field::PricePerNight => &self.price_per_night,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    pub field_ids: FieldIds,
    // Stripped from the price text before it is parsed
    pub thousands_separator: char,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            field_ids: FieldIds::default(),
            thousands_separator: ',',
        }
    }
}

impl FormConfig {
    // Load from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let config: FormConfig =
            serde_json::from_str(json).map_err(|e| FormError::JsonParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let mut seen = HashSet::new();
        for field in Field::ALL {
            let id = self.field_ids.id(field);
            if id.trim().is_empty() {
                return Err(FormError::ConfigError(format!(
                    "empty element id for {:?}",
                    field
                )));
            }
            if !seen.insert(id) {
                return Err(FormError::ConfigError(format!(
                    "element id '{}' is used more than once",
                    id
                )));
            }
        }

        let separator = self.thousands_separator;
        if separator.is_ascii_digit() || matches!(separator, '.' | '+' | '-' | 'e' | 'E') {
            return Err(FormError::ConfigError(format!(
                "'{}' cannot be used as a thousands separator",
                separator
            )));
        }

        Ok(())
    }
}
