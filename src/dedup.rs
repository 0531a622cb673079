// src/dedup.rs
use crate::ledger::SeenUrls;
use crate::listings::Film;

/// A film counts as new when at least one of its shows is not in `seen`.
/// New films are returned whole, already-seen shows included.
pub fn is_new_screening(film: &Film, seen: &SeenUrls) -> bool {
    film.shows.iter().any(|s| !seen.contains(&s.url))
}

/// New films in their original order.
pub fn filter_new_screenings(films: &[Film], seen: &SeenUrls) -> Vec<Film> {
    films
        .iter()
        .filter(|f| is_new_screening(f, seen))
        .cloned()
        .collect()
}
