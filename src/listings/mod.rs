// src/listings/mod.rs
//! In-memory listings tree. Built once per run from the feed, read-only afterwards.

pub mod parse;
pub mod source;

use chrono::NaiveDateTime;

use crate::error::RunError;

pub use parse::parse_listings;
pub use source::{FixtureListingsSource, HttpListingsSource, ListingsSource, StaticListingsSource};

/// Displayed date, e.g. `Mon  5 Mar`.
pub const DATE_FORMAT: &str = "%a %e %b";
/// Displayed time, 24-hour clock.
pub const TIME_FORMAT: &str = "%H:%M";

const RAW_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const RAW_TIME_FORMAT_NO_SECS: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listings {
    pub cinemas: Vec<Cinema>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cinema {
    pub id: i64,
    pub name: String,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    pub title: String,
    pub shows: Vec<Show>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// Unique per show instance; this is what the ledger remembers.
    pub url: String,
    /// Raw feed timestamp, parsed lazily by [`Show::starts_at`].
    pub time: String,
}

impl Show {
    pub fn new(url: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            time: time.into(),
        }
    }

    pub fn starts_at(&self) -> Result<NaiveDateTime, RunError> {
        let raw = self.time.trim();
        NaiveDateTime::parse_from_str(raw, RAW_TIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, RAW_TIME_FORMAT_NO_SECS))
            .map_err(|source| RunError::ShowTime {
                raw: self.time.clone(),
                source,
            })
    }

    /// `(date, time)` as shown to the operator and in SMS bodies.
    pub fn display_date_time(&self) -> Result<(String, String), RunError> {
        let dt = self.starts_at()?;
        Ok((
            dt.format(DATE_FORMAT).to_string(),
            dt.format(TIME_FORMAT).to_string(),
        ))
    }
}

impl Film {
    pub fn new(title: impl Into<String>, shows: Vec<Show>) -> Self {
        Self {
            title: title.into(),
            shows,
        }
    }
}
