use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown instrument key '{0}'")]
    UnknownInstrument(String),

    #[error("Dates must be in YYYY-MM-DD form, got '{0}'")]
    MalformedDate(String),

    #[error("Series dates must be strictly increasing: {next} does not follow {previous}")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },
}
