// Booking form synchronizer
// Keeps the check-out lower bound and the nights / rooms / total preview in step with user input.
// Handlers never fail: bad input degrades to safe defaults instead of blocking the form.

use chrono::NaiveDate;
use tracing::{debug, info, trace};

use crate::config::FormConfig;
use crate::form_host::{Field, FormError, FormHost};
use crate::parsing::{
    compute_total, day_diff, display_nights, format_total, is_strictly_after, parse_price_text,
    parse_rooms,
};
use crate::validation::{validate_submission, BookingRequest, FormValues, ValidationErrors};

// Events the page forwards to the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    // `change` on the check-in date
    CheckInChanged,
    // `change` on the check-out date
    CheckOutChanged,
    // `input` on the room count
    RoomsInput,
}

// Numbers behind the last preview, before display formatting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    // Raw day difference, may be negative
    pub nights: i64,
    pub rooms: i64,
    pub total: f64,
}

#[derive(Debug)]
pub struct FormSynchronizer<H: FormHost> {
    host: H,
    price_per_night: f64,
    totals: Totals,
}

impl<H: FormHost> FormSynchronizer<H> {
    // Bind to a host, read the nightly price once and bring the preview up to date
    pub fn attach(host: H, config: &FormConfig) -> Result<Self, FormError> {
        config.validate()?;

        if let Some(missing) = Field::REQUIRED
            .iter()
            .find(|field| !host.has_element(**field))
        {
            return Err(FormError::MissingElement(
                config.field_ids.id(*missing).to_string(),
            ));
        }

        let price_text = host.text(Field::PricePerNight).unwrap_or_default();
        let price_per_night = parse_price_text(&price_text, config.thousands_separator);
        info!(price_per_night, "Booking form attached");

        let mut synchronizer = Self {
            host,
            price_per_night,
            totals: Totals::default(),
        };
        synchronizer.sync_dates();
        synchronizer.update_totals();

        Ok(synchronizer)
    }

    pub fn handle(&mut self, event: FormEvent) {
        match event {
            FormEvent::CheckInChanged => self.on_check_in_change(),
            FormEvent::CheckOutChanged => self.on_check_out_change(),
            FormEvent::RoomsInput => self.on_rooms_input(),
        }
    }

    pub fn on_check_in_change(&mut self) {
        debug!("Check-in changed");
        self.sync_dates();
        self.update_totals();
    }

    pub fn on_check_out_change(&mut self) {
        debug!("Check-out changed");
        self.update_totals();
    }

    pub fn on_rooms_input(&mut self) {
        debug!("Room count edited");
        self.update_totals();
    }

    pub fn price_per_night(&self) -> f64 {
        self.price_per_night
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // Validate what is currently entered in the form
    pub fn submit(&self, today: NaiveDate) -> Result<BookingRequest, ValidationErrors> {
        validate_submission(&FormValues::capture(&self.host), today)
    }

    // Check-out may not start before check-in; a stale check-out is cleared, not rejected.
    // A blank check-in leaves the current minimum in place.
    fn sync_dates(&mut self) {
        let check_in = self.input(Field::CheckIn);
        if check_in.is_empty() {
            return;
        }

        self.host.set_min(Field::CheckOut, &check_in);

        let check_out = self.input(Field::CheckOut);
        if !check_out.is_empty() && !is_strictly_after(&check_out, &check_in) {
            debug!(%check_in, %check_out, "Clearing check-out that is no longer after check-in");
            self.host.set_value(Field::CheckOut, "");
        }
    }

    // Full recompute from the current field values, nothing carried over
    fn update_totals(&mut self) {
        let check_in = self.input(Field::CheckIn);
        let check_out = self.input(Field::CheckOut);

        let nights = if !check_in.is_empty() && !check_out.is_empty() {
            day_diff(&check_in, &check_out)
        } else {
            0
        };
        let rooms = parse_rooms(&self.input(Field::RoomsCount));
        let total = compute_total(nights, rooms, self.price_per_night);

        self.host.set_text(Field::NightsCount, &display_nights(nights));
        self.host.set_text(Field::RoomsPreview, &rooms.to_string());
        self.host.set_text(Field::TotalPrice, &format_total(total));

        trace!(nights, rooms, total, "Booking totals updated");
        self.totals = Totals {
            nights,
            rooms,
            total,
        };
    }

    fn input(&self, field: Field) -> String {
        self.host.value(field).unwrap_or_default()
    }
}
