//! Geocoding provider seam and the Nominatim implementation.

mod client;

pub use client::NominatimClient;

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

use crate::error::Result;
use crate::models::{BoundingBox, GeoJson};

/// Free-text place search returning candidates with embedded polygon geometry
pub trait GeocodingProvider: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Candidate>>> + Send;
}

/// One search result as returned by the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    /// `[south, north, west, east]`, usually as strings
    pub boundingbox: Option<Vec<Value>>,
    pub geojson: Option<GeoJson>,
}

impl Candidate {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.boundingbox
            .as_deref()
            .and_then(BoundingBox::from_provider)
    }

    pub fn has_polygon(&self) -> bool {
        self.geojson.as_ref().is_some_and(GeoJson::is_polygonal)
    }
}
