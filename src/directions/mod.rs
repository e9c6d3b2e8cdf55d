//! Directions provider seam and the Google Directions implementation.

mod client;

pub use client::GoogleDirectionsClient;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::future::Future;

use crate::error::Result;
use crate::models::{Coordinate, TravelMode};

/// Single-route directions lookup between two points
pub trait DirectionsProvider: Send + Sync {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> impl Future<Output = Result<DirectionsResponse>> + Send;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub arrival_time: Option<TextValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub polyline: EncodedPolyline,
    pub distance: Option<TextValue>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub html_instructions: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodedPolyline {
    /// Non-string values are read as an empty polyline
    #[serde(default, deserialize_with = "string_or_empty")]
    pub points: String,
}

/// Provider pair of a display string and a raw number (meters, seconds, epoch)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: Option<i64>,
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions_response() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "overview_polyline": {"points": "_p~iF~ps|U"},
                "legs": [{
                    "distance": {"text": "5.2 km", "value": 5210},
                    "duration": {"text": "14 mins", "value": 840},
                    "steps": [{
                        "polyline": {"points": "_p~iF~ps|U"},
                        "distance": {"text": "0.3 km", "value": 312},
                        "html_instructions": "Head <b>north</b>"
                    }]
                }]
            }]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, "OK");
        let leg = &response.routes[0].legs[0];
        assert_eq!(leg.distance.as_ref().unwrap().value, Some(5210));
        assert!(leg.arrival_time.is_none());
        assert_eq!(leg.steps[0].polyline.points, "_p~iF~ps|U");
    }

    #[test]
    fn test_non_string_polyline_is_empty() {
        let p: EncodedPolyline = serde_json::from_str(r#"{"points": 42}"#).unwrap();
        assert!(p.points.is_empty());
        let p: EncodedPolyline = serde_json::from_str(r#"{"points": null}"#).unwrap();
        assert!(p.points.is_empty());
    }

    #[test]
    fn test_null_instructions_are_empty() {
        let step: Step = serde_json::from_str(
            r#"{"polyline": {"points": ""}, "html_instructions": null}"#,
        )
        .unwrap();
        assert!(step.html_instructions.is_empty());

        let step: Step = serde_json::from_str(r#"{"polyline": {"points": ""}}"#).unwrap();
        assert!(step.html_instructions.is_empty());
    }

    #[test]
    fn test_error_response() {
        let json = r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "routes": []}"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "REQUEST_DENIED");
        assert!(response.routes.is_empty());
    }
}
