// src/listings/parse.rs
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{Cinema, Film, Listings, Show};
use crate::error::RunError;

#[derive(Debug, Deserialize)]
struct CinemasXml {
    #[serde(rename = "cinema", default)]
    cinema: Vec<CinemaXml>,
}

#[derive(Debug, Deserialize)]
struct CinemaXml {
    #[serde(rename = "@id")]
    id: i64,
    #[serde(rename = "@name", default)]
    name: String,
    listing: Option<ListingXml>,
}

#[derive(Debug, Deserialize)]
struct ListingXml {
    #[serde(rename = "film", default)]
    film: Vec<FilmXml>,
}

#[derive(Debug, Deserialize)]
struct FilmXml {
    #[serde(rename = "@title")]
    title: String,
    shows: Option<ShowsXml>,
}

#[derive(Debug, Deserialize)]
struct ShowsXml {
    #[serde(rename = "show", default)]
    show: Vec<ShowXml>,
}

#[derive(Debug, Deserialize)]
struct ShowXml {
    #[serde(rename = "@time")]
    time: String,
    #[serde(rename = "@url")]
    url: String,
}

/// Parse the syndication `listings.xml` document into the listings tree.
/// Order of cinemas, films and shows is kept exactly as in the document.
pub fn parse_listings(xml: &str) -> Result<Listings, RunError> {
    let doc: CinemasXml = from_str(xml).map_err(|e| RunError::ListingsParse(e.to_string()))?;

    let cinemas = doc
        .cinema
        .into_iter()
        .map(|c| Cinema {
            id: c.id,
            name: c.name.trim().to_string(),
            films: c
                .listing
                .map(|l| l.film)
                .unwrap_or_default()
                .into_iter()
                .map(|f| Film {
                    title: f.title,
                    shows: f
                        .shows
                        .map(|s| s.show)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|s| Show {
                            url: s.url,
                            time: s.time,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(Listings { cinemas })
}
