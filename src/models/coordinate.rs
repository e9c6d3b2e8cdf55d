//! Coordinates and bounding boxes.

use geo::{coord, Coord, Intersects, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::validation(format!(
                "latitude {} is outside [-90, 90]",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::validation(format!(
                "longitude {} is outside [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Build from a GeoJSON position, which is ordered `[lng, lat]`
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_coord(&self) -> Coord<f64> {
        coord! { x: self.lng, y: self.lat }
    }
}

/// Bounding box in the provider's `[south, north, west, east]` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", from = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Parse the provider's four-element box. Entries may be strings or
    /// numbers; anything else, or an inverted box, yields `None`.
    pub fn from_provider(values: &[serde_json::Value]) -> Option<Self> {
        if values.len() != 4 {
            return None;
        }

        let parsed: Vec<f64> = values
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                serde_json::Value::Number(n) => n.as_f64(),
                _ => None,
            })
            .filter(|v| v.is_finite())
            .collect();

        if parsed.len() != 4 {
            return None;
        }

        let bbox = Self::from([parsed[0], parsed[1], parsed[2], parsed[3]]);
        if bbox.south > bbox.north || bbox.west > bbox.east {
            return None;
        }
        Some(bbox)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }

    /// Inclusive containment: points on the edge count as inside
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.to_rect().intersects(&point.to_coord())
    }

    pub fn center(&self) -> Coordinate {
        let c = self.to_rect().center();
        Coordinate { lat: c.y, lng: c.x }
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self {
            south: v[0],
            north: v[1],
            west: v[2],
            east: v[3],
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.south, b.north, b.west, b.east]
    }
}
