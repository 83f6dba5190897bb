//! Token classification by ordered pattern rules

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::DataType;

static GUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{[A-Fa-f0-9]{8}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{12}\}$")
        .unwrap()
});

static DOUBLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\s*(\d\s?)+\.(\d\s?)+$").unwrap());

static DATETIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+$").unwrap());

static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\s*(\d\s?)+$").unwrap());

/// Classify a single token into a coarse [`DataType`]
///
/// Checks run in a fixed order and the first match wins, so `"42"` is an
/// `Int` and never a `Double`. Only one value is looked at; callers decide what
/// an empty token means.
pub fn classify(token: &str) -> DataType {
    if token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false") {
        return DataType::Boolean;
    }

    if GUID_REGEX.is_match(token) {
        return DataType::Guid;
    }

    if DOUBLE_REGEX.is_match(token) {
        return DataType::Double;
    }

    if DATETIME_REGEX.is_match(token) {
        return DataType::DateTime;
    }

    if INT_REGEX.is_match(token) {
        return DataType::Int;
    }

    DataType::String
}
