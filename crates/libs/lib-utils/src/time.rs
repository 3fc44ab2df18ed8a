//! # Time Utilities
//!
//! ISO calendar date parsing and formatting using chrono.

use chrono::NaiveDate;

const ISO_DATE: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE)
        .map_err(|_| Error::FailToDateParse(value.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::FailToDateParse(value) => write!(fmt, "'{value}' is not a valid YYYY-MM-DD date"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
