// src/matcher.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::listings::Film;

/// Marker the feed puts in the title of every Unlimited Screening.
pub const UNLIMITED_MARKER: &str = "Unlimited Screening";

static RE_UNLIMITED: Lazy<Regex> =
    Lazy::new(|| Regex::new(&regex::escape(UNLIMITED_MARKER)).unwrap());

/// Case-sensitive, unanchored: the marker may appear anywhere in the title.
pub fn is_unlimited_screening(title: &str) -> bool {
    RE_UNLIMITED.is_match(title)
}

/// Films whose title marks them as Unlimited Screenings, in feed order.
/// A non-matching film is dropped together with all of its shows.
pub fn find_unlimited_screenings(films: &[Film]) -> Vec<Film> {
    films
        .iter()
        .filter(|f| is_unlimited_screening(&f.title))
        .cloned()
        .collect()
}
