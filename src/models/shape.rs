//! Polygon geometry as carried by geocoding candidates.

use serde::Deserialize;
use serde_json::Value;

use super::Coordinate;
use crate::error::{Error, Result};

/// Ordered boundary curve. Not auto-closed.
pub type Ring = Vec<Coordinate>;

/// Raw GeoJSON geometry object `{type, coordinates}`
#[derive(Debug, Clone, Deserialize)]
pub struct GeoJson {
    #[serde(rename = "type")]
    pub geo_type: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl GeoJson {
    pub fn is_polygonal(&self) -> bool {
        matches!(self.geo_type.as_str(), "Polygon" | "MultiPolygon")
    }
}

/// Polygon-bearing geometry. Ring 0 of each polygon is the outer ring.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoShape {
    Polygon { rings: Vec<Ring> },
    MultiPolygon { polygons: Vec<Vec<Ring>> },
}

impl GeoShape {
    /// Convert a GeoJSON Polygon/MultiPolygon, swapping `[lng, lat]` to `{lat, lng}`
    pub fn from_geojson(geojson: &GeoJson) -> Result<Self> {
        match geojson.geo_type.as_str() {
            "Polygon" => Ok(GeoShape::Polygon {
                rings: parse_polygon(&geojson.coordinates)?,
            }),
            "MultiPolygon" => {
                let polygons = as_array(&geojson.coordinates, "MultiPolygon")?
                    .iter()
                    .map(parse_polygon)
                    .collect::<Result<Vec<_>>>()?;
                Ok(GeoShape::MultiPolygon { polygons })
            }
            other => Err(Error::unreachable(format!(
                "geometry type {} carries no polygon",
                other
            ))),
        }
    }

    /// Every ring; a MultiPolygon is flattened one level
    pub fn all_rings(&self) -> Vec<Ring> {
        match self {
            GeoShape::Polygon { rings } => rings.clone(),
            GeoShape::MultiPolygon { polygons } => polygons.iter().flatten().cloned().collect(),
        }
    }

    /// First ring of each polygon
    pub fn outer_rings(&self) -> Vec<Ring> {
        match self {
            GeoShape::Polygon { rings } => rings.first().cloned().into_iter().collect(),
            GeoShape::MultiPolygon { polygons } => polygons
                .iter()
                .filter_map(|rings| rings.first().cloned())
                .collect(),
        }
    }
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::unreachable(format!("malformed {} coordinates", what)))
}

fn parse_polygon(value: &Value) -> Result<Vec<Ring>> {
    as_array(value, "Polygon")?.iter().map(parse_ring).collect()
}

fn parse_ring(value: &Value) -> Result<Ring> {
    as_array(value, "ring")?.iter().map(parse_position).collect()
}

fn parse_position(value: &Value) -> Result<Coordinate> {
    let position = as_array(value, "position")?;
    match (
        position.first().and_then(Value::as_f64),
        position.get(1).and_then(Value::as_f64),
    ) {
        (Some(lng), Some(lat)) => Ok(Coordinate::from_lng_lat(lng, lat)),
        _ => Err(Error::unreachable("malformed position in geometry")),
    }
}
