//! Google Directions API client.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{DirectionsProvider, DirectionsResponse};
use crate::error::{Error, Result};
use crate::models::{Coordinate, TravelMode};

#[derive(Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    directions_url: Url,
    api_key: Option<String>,
}

impl GoogleDirectionsClient {
    pub fn new(
        directions_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let directions_url = Url::parse(directions_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        if api_key.is_none() {
            warn!("No directions API key configured; requests will likely be denied");
        }

        Ok(Self {
            client,
            directions_url,
            api_key,
        })
    }

    fn request_url(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Url {
        let mut url = self.directions_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("origin", &format!("{},{}", origin.lat, origin.lng))
                .append_pair(
                    "destination",
                    &format!("{},{}", destination.lat, destination.lng),
                )
                .append_pair("mode", mode.as_str())
                .append_pair("alternatives", "false");
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<DirectionsResponse> {
        let response = self
            .client
            .get(self.request_url(origin, destination, mode))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Directions API returned {}", status);
            return Err(Error::Upstream {
                reachable: false,
                status: Some(status.as_u16().to_string()),
                message: format!("Directions API {}", status),
            });
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| Error::unreachable(format!("malformed directions response: {}", e)))?;

        debug!(
            "Directions status {} with {} routes ({} mode)",
            body.status,
            body.routes.len(),
            mode
        );
        Ok(body)
    }
}
