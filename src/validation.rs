// Submit-time checks for the booking form
// Unlike the live preview these are strict: every problem is reported against its field

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::form_host::{Field, FormHost};
use crate::parsing::parse_date;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Check-in date is required.")]
    CheckInRequired,

    #[error("Invalid check-in date format.")]
    InvalidCheckIn,

    #[error("Check-in cannot be in the past.")]
    CheckInInPast,

    #[error("Check-out date is required.")]
    CheckOutRequired,

    #[error("Invalid check-out date format.")]
    InvalidCheckOut,

    #[error("Check-out must be after check-in.")]
    CheckOutNotAfterCheckIn,

    #[error("Rooms must be a number.")]
    RoomsNotANumber,

    #[error("Rooms must be at least 1.")]
    TooFewRooms,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::CheckInRequired | FieldError::InvalidCheckIn | FieldError::CheckInInPast => {
                Field::CheckIn
            }
            FieldError::CheckOutRequired
            | FieldError::InvalidCheckOut
            | FieldError::CheckOutNotAfterCheckIn => Field::CheckOut,
            FieldError::RoomsNotANumber | FieldError::TooFewRooms => Field::RoomsCount,
        }
    }
}

// At most one error per field; a later error for the same field replaces the earlier one
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{} booking field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn insert(&mut self, error: FieldError) {
        self.errors.insert(error.field(), error);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(|e| e.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldError)> {
        self.errors.iter()
    }
}

// Raw text of the three booking inputs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormValues {
    pub check_in: String,
    pub check_out: String,
    pub rooms_count: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            check_in: String::new(),
            check_out: String::new(),
            rooms_count: "1".to_string(),
        }
    }
}

impl FormValues {
    // Values for a freshly opened form, e.g. dates carried over from a hotel search
    pub fn prefill(check_in: &str, check_out: &str) -> Self {
        Self {
            check_in: check_in.trim().to_string(),
            check_out: check_out.trim().to_string(),
            ..Self::default()
        }
    }

    // Read the submitted values from the host; an empty room count counts as "1"
    pub fn capture<H: FormHost>(host: &H) -> Self {
        let read = |field: Field| host.value(field).unwrap_or_default();

        let rooms_raw = read(Field::RoomsCount);
        let rooms_count = if rooms_raw.is_empty() {
            "1".to_string()
        } else {
            rooms_raw.trim().to_string()
        };

        Self {
            check_in: read(Field::CheckIn).trim().to_string(),
            check_out: read(Field::CheckOut).trim().to_string(),
            rooms_count,
        }
    }

    // Copy the values into the host's input fields
    pub fn apply<H: FormHost>(&self, host: &mut H) {
        host.set_value(Field::CheckIn, &self.check_in);
        host.set_value(Field::CheckOut, &self.check_out);
        host.set_value(Field::RoomsCount, &self.rooms_count);
    }
}

// A stay that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookingRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: i64,
    pub nights: i64,
}

pub fn validate_submission(
    values: &FormValues,
    today: NaiveDate,
) -> Result<BookingRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let check_in = parse_required_date(
        &values.check_in,
        FieldError::CheckInRequired,
        FieldError::InvalidCheckIn,
        &mut errors,
    );
    let check_out = parse_required_date(
        &values.check_out,
        FieldError::CheckOutRequired,
        FieldError::InvalidCheckOut,
        &mut errors,
    );

    let rooms = match values.rooms_count.trim().parse::<i64>() {
        Ok(rooms) => {
            if rooms < 1 {
                errors.insert(FieldError::TooFewRooms);
            }
            Some(rooms)
        }
        Err(_) => {
            errors.insert(FieldError::RoomsNotANumber);
            None
        }
    };

    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_in >= check_out {
            errors.insert(FieldError::CheckOutNotAfterCheckIn);
        }
        if check_in < today {
            errors.insert(FieldError::CheckInInPast);
        }
    }

    match (check_in, check_out, rooms) {
        (Some(check_in), Some(check_out), Some(rooms)) if errors.is_empty() => Ok(BookingRequest {
            check_in,
            check_out,
            rooms,
            nights: check_out.signed_duration_since(check_in).num_days(),
        }),
        _ => {
            debug!(count = errors.len(), "Booking submission rejected");
            Err(errors)
        }
    }
}

fn parse_required_date(
    raw: &str,
    missing: FieldError,
    invalid: FieldError,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    if raw.is_empty() {
        errors.insert(missing);
        return None;
    }
    let date = parse_date(raw);
    if date.is_none() {
        errors.insert(invalid);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_host::InMemoryForm;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    fn values(check_in: &str, check_out: &str, rooms_count: &str) -> FormValues {
        FormValues {
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            rooms_count: rooms_count.to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let request = validate_submission(&values("2024-03-01", "2024-03-04", "2"), today()).unwrap();

        assert_eq!(request.check_in, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(request.check_out, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(request.rooms, 2);
        assert_eq!(request.nights, 3);
    }

    #[test]
    fn test_check_in_today_is_allowed() {
        assert!(validate_submission(&values("2024-02-15", "2024-02-16", "1"), today()).is_ok());
    }

    #[test_case(values("", "2024-03-04", "1"), Field::CheckIn, "Check-in date is required."; "#1 missing check-in")]
    #[test_case(values("03/01/2024", "2024-03-04", "1"), Field::CheckIn, "Invalid check-in date format."; "#2 bad check-in")]
    #[test_case(values("2024-03-01", "", "1"), Field::CheckOut, "Check-out date is required."; "#3 missing check-out")]
    #[test_case(values("2024-03-01", "2024-02-30", "1"), Field::CheckOut, "Invalid check-out date format."; "#4 bad check-out")]
    #[test_case(values("2024-03-01", "2024-03-04", "two"), Field::RoomsCount, "Rooms must be a number."; "#5 rooms not a number")]
    #[test_case(values("2024-03-01", "2024-03-04", "2.5"), Field::RoomsCount, "Rooms must be a number."; "#6 fractional rooms")]
    #[test_case(values("2024-03-01", "2024-03-04", "0"), Field::RoomsCount, "Rooms must be at least 1."; "#7 zero rooms")]
    #[test_case(values("2024-03-04", "2024-03-04", "1"), Field::CheckOut, "Check-out must be after check-in."; "#8 same day stay")]
    #[test_case(values("2024-03-05", "2024-03-01", "1"), Field::CheckOut, "Check-out must be after check-in."; "#9 reversed stay")]
    #[test_case(values("2024-02-01", "2024-02-04", "1"), Field::CheckIn, "Check-in cannot be in the past."; "#10 past check-in")]
    #[test_case(values("2024-3-1", "2024-03-04", "1"), Field::CheckIn, "Invalid check-in date format."; "#11 unpadded check-in")]
    #[test_case(values("+2024-03-01", "2024-03-04", "1"), Field::CheckIn, "Invalid check-in date format."; "#12 signed check-in year")]
    #[test_case(values("2024-03-01", "2024-03-4", "1"), Field::CheckOut, "Invalid check-out date format."; "#13 unpadded check-out")]
    fn test_rejected_submission(submitted: FormValues, field: Field, message: &str) {
        let errors = validate_submission(&submitted, today()).unwrap_err();
        assert_eq!(errors.len(), 1, "unexpected errors: {:?}", errors);
        assert_eq!(errors.message(field).as_deref(), Some(message));
    }

    #[test]
    fn test_errors_collected_per_field() {
        let errors = validate_submission(&values("", "soon", "-1"), today()).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(Field::CheckIn), Some(&FieldError::CheckInRequired));
        assert_eq!(errors.get(Field::CheckOut), Some(&FieldError::InvalidCheckOut));
        assert_eq!(errors.get(Field::RoomsCount), Some(&FieldError::TooFewRooms));
        assert_eq!(errors.to_string(), "3 booking field(s) failed validation");

        let fields: Vec<Field> = errors.iter().map(|(field, _)| *field).collect();
        assert_eq!(fields, vec![Field::CheckIn, Field::CheckOut, Field::RoomsCount]);
    }

    #[test]
    fn test_unpadded_dates_rejected_on_both_fields() {
        let errors = validate_submission(&values("2024-3-1", "2024-3-4", "1"), today()).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::CheckIn), Some(&FieldError::InvalidCheckIn));
        assert_eq!(errors.get(Field::CheckOut), Some(&FieldError::InvalidCheckOut));
    }

    #[test]
    fn test_date_rules_report_on_their_own_fields() {
        let errors = validate_submission(&values("2024-02-10", "2024-02-01", "1"), today()).unwrap_err();

        assert_eq!(errors.get(Field::CheckOut), Some(&FieldError::CheckOutNotAfterCheckIn));
        assert_eq!(errors.get(Field::CheckIn), Some(&FieldError::CheckInInPast));
    }

    #[test]
    fn test_prefill_defaults_to_one_room() {
        let prefilled = FormValues::prefill(" 2024-03-01 ", "2024-03-04");
        assert_eq!(prefilled, values("2024-03-01", "2024-03-04", "1"));
        assert_eq!(FormValues::default().rooms_count, "1");
    }

    #[test]
    fn test_capture_from_host() {
        let form = InMemoryForm::new()
            .with_value(Field::CheckIn, "2024-03-01 ")
            .with_value(Field::CheckOut, "2024-03-04");
        assert_eq!(FormValues::capture(&form), values("2024-03-01", "2024-03-04", "1"));

        let form = form.with_value(Field::RoomsCount, "   ");
        assert_eq!(FormValues::capture(&form).rooms_count, "");
    }

    #[test]
    fn test_apply_to_host() {
        let mut form = InMemoryForm::new();
        FormValues::prefill("2024-03-01", "2024-03-04").apply(&mut form);

        assert_eq!(form.value(Field::CheckIn).as_deref(), Some("2024-03-01"));
        assert_eq!(form.value(Field::CheckOut).as_deref(), Some("2024-03-04"));
        assert_eq!(form.value(Field::RoomsCount).as_deref(), Some("1"));
    }

    #[test]
    fn test_booking_request_serializes_iso_dates() {
        let request = validate_submission(&values("2024-03-01", "2024-03-04", "1"), today()).unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"check_in":"2024-03-01","check_out":"2024-03-04","rooms":1,"nights":3}"#
        );
    }
}
