//! Nominatim search client.

use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{Candidate, GeocodingProvider};
use crate::error::{Error, Result};

/// Nominatim `/search` client requesting `jsonv2` with polygon GeoJSON
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    search_url: Url,
}

impl NominatimClient {
    pub fn new(search_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let search_url = Url::parse(search_url)?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, search_url })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("polygon_geojson", "1")
            .append_pair("q", query);
        url
    }
}

impl GeocodingProvider for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        let response = self
            .client
            .get(self.request_url(query))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Nominatim returned {} for '{}'", status, query);
            return Err(Error::Upstream {
                reachable: false,
                status: Some(status.as_u16().to_string()),
                message: format!("Nominatim {}", status),
            });
        }

        let candidates: Option<Vec<Candidate>> = response
            .json()
            .await
            .map_err(|e| Error::unreachable(format!("malformed Nominatim response: {}", e)))?;
        let candidates = candidates.unwrap_or_default();

        debug!("Nominatim returned {} candidates for '{}'", candidates.len(), query);
        Ok(candidates)
    }
}
