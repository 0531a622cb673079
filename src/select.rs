// src/select.rs
use crate::error::RunError;
use crate::listings::{Cinema, Listings};

/// First cinema whose id equals `id`. Ids are not checked for uniqueness.
pub fn find_cinema(listings: &Listings, id: i64) -> Result<&Cinema, RunError> {
    listings
        .cinemas
        .iter()
        .find(|c| c.id == id)
        .ok_or(RunError::CinemaNotFound(id))
}
