// Lenient parsing for the live booking preview
// Nothing in here returns an error: every parse falls back to a safe default

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Room count used when the field is blank, non-numeric or zero
pub const DEFAULT_ROOMS: i64 = 1;

// Parse a `YYYY-MM-DD` calendar date.
// chrono alone also takes unpadded or signed fields, so the shape is checked first.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !has_date_shape(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

// Exactly four, two and two ASCII digits separated by '-'
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

// Whole days from `check_in` to `check_out`, negative when reversed.
// Returns 0 when either side is not a valid date.
pub fn day_diff(check_in: &str, check_out: &str) -> i64 {
    match (parse_date(check_in), parse_date(check_out)) {
        (Some(start), Some(end)) => end.signed_duration_since(start).num_days(),
        _ => {
            debug!(check_in, check_out, "Unparseable stay dates, counting 0 nights");
            0
        }
    }
}

// True when `check_out` falls strictly after `check_in`.
// Valid dates compare as dates; anything else compares as raw text.
pub fn is_strictly_after(check_out: &str, check_in: &str) -> bool {
    match (parse_date(check_out), parse_date(check_in)) {
        (Some(end), Some(start)) => end > start,
        _ => check_out > check_in,
    }
}

// Nightly price from display text such as "1,250.00".
// Separators are stripped before reading the leading decimal; malformed text is 0.
pub fn parse_price_text(text: &str, thousands_separator: char) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != thousands_separator).collect();
    match leading_decimal(&cleaned) {
        Some(price) => price,
        None => {
            debug!(text, "Malformed nightly price text, using 0");
            0.0
        }
    }
}

// Room count from the raw input text; blank, invalid or zero gives DEFAULT_ROOMS
pub fn parse_rooms(text: &str) -> i64 {
    match leading_integer(text) {
        Some(0) | None => {
            debug!(text, "No usable room count, defaulting to {}", DEFAULT_ROOMS);
            DEFAULT_ROOMS
        }
        Some(rooms) => rooms,
    }
}

// Negative nights or rooms never reduce the total below zero
pub fn compute_total(nights: i64, rooms: i64, price_per_night: f64) -> f64 {
    (nights.max(0) as f64) * (rooms.max(0) as f64) * price_per_night
}

pub fn display_nights(nights: i64) -> String {
    if nights > 0 {
        nights.to_string()
    } else {
        "0".to_string()
    }
}

// Two decimals, except an exact zero (either sign) which shows as "0".
// Exact halves round away from zero ("10.125" shows as "10.13").
pub fn format_total(total: f64) -> String {
    if total == 0.0 {
        return "0".to_string();
    }
    match Decimal::from_f64_retain(total) {
        Some(exact) => format!(
            "{:.2}",
            exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", total),
    }
}

// Longest `[+-]digits[.digits][e[+-]digits]` prefix after leading whitespace
fn leading_decimal(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

// Longest `[+-]digits` prefix after leading whitespace, saturating on overflow
fn leading_integer(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let digits = count_digits(&bytes[start..]);
    if digits == 0 {
        return None;
    }

    let magnitude = bytes[start..start + digits]
        .iter()
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    Some(if negative { -magnitude } else { magnitude })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
