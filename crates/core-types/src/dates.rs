use crate::error::CoreError;
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date in strict `YYYY-MM-DD` form.
///
/// chrono alone accepts unpadded fields such as `2024-1-5`, so the shape is
/// checked before parsing.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(CoreError::MalformedDate(input.to_string()));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| CoreError::MalformedDate(input.to_string()))
}
