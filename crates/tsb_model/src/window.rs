//! Topology query window.

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Date format used on the command line and in topology queries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive day range the topology is queried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl TimeWindow {
    /// Creates a window from two dates.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvertedWindow` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a window from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the window is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;
        Self::new(start, end)
    }

    /// Window start formatted as `YYYY-MM-DD`.
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// Window end formatted as `YYYY-MM-DD`.
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| Error::InvalidDate {
        field,
        input: input.to_string(),
        source,
    })
}
