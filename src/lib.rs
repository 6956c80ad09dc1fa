// Main library file for the booking form helper

// Export modules for each part of the form
pub mod config;
pub mod form_host;
pub mod parsing;
pub mod synchronizer;
pub mod validation;

// Re-export key types for convenience
pub use config::{FieldIds, FormConfig};
pub use form_host::{Field, FormError, FormHost, FormSnapshot, InMemoryForm};
pub use parsing::{day_diff, format_total, parse_price_text, parse_rooms};
pub use synchronizer::{FormEvent, FormSynchronizer, Totals};
pub use validation::{
    validate_submission, BookingRequest, FieldError, FormValues, ValidationErrors,
};
