// src/listings/source.rs
use async_trait::async_trait;

use super::{parse_listings, Listings};
use crate::error::RunError;

pub const DEFAULT_LISTINGS_URL: &str = "https://www.cineworld.co.uk/syndication/listings.xml";

/// Where a run gets its listings from. The pipeline only ever sees this trait.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Listings, RunError>;
    fn name(&self) -> &str;
}

/// Fetches the syndication feed over HTTP and parses it.
pub struct HttpListingsSource {
    url: String,
    client: reqwest::Client,
}

impl HttpListingsSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_body(&self) -> Result<String, RunError> {
        let network = |source| RunError::Network {
            url: self.url.clone(),
            source,
        };
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;
        resp.text().await.map_err(network)
    }
}

impl Default for HttpListingsSource {
    fn default() -> Self {
        Self::new(DEFAULT_LISTINGS_URL)
    }
}

#[async_trait]
impl ListingsSource for HttpListingsSource {
    async fn fetch_listings(&self) -> Result<Listings, RunError> {
        let t0 = std::time::Instant::now();
        let body = self.fetch_body().await?;
        tracing::debug!(url = %self.url, bytes = body.len(), "listings fetched");

        let listings = parse_listings(&body)?;
        tracing::debug!(
            cinemas = listings.cinemas.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "listings parsed"
        );
        Ok(listings)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

/// Parses an XML document held in memory (offline runs, tests).
pub struct FixtureListingsSource {
    xml: String,
}

impl FixtureListingsSource {
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            xml: xml.to_string(),
        }
    }
}

#[async_trait]
impl ListingsSource for FixtureListingsSource {
    async fn fetch_listings(&self) -> Result<Listings, RunError> {
        parse_listings(&self.xml)
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Hands out a prebuilt listings tree.
pub struct StaticListingsSource {
    listings: Listings,
}

impl StaticListingsSource {
    pub fn new(listings: Listings) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingsSource for StaticListingsSource {
    async fn fetch_listings(&self) -> Result<Listings, RunError> {
        Ok(self.listings.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
