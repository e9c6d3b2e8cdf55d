//! Inbound route request and its validation.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Coordinate, TravelMode};

/// Route request as posted by the client. Fields stay untyped so that
/// missing or non-numeric values surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub destination: Option<Value>,
    #[serde(default)]
    pub mode: Option<Value>,
}

/// A request that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRoute {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn validate(&self) -> Result<ValidatedRoute> {
        Ok(ValidatedRoute {
            origin: endpoint(self.origin.as_ref(), "origin")?,
            destination: endpoint(self.destination.as_ref(), "destination")?,
            mode: travel_mode(self.mode.as_ref())?,
        })
    }
}

fn endpoint(value: Option<&Value>, label: &str) -> Result<Coordinate> {
    let fields: &Map<String, Value> = value.and_then(Value::as_object).ok_or_else(|| {
        Error::validation(format!("{} must be an object with numeric lat and lng", label))
    })?;

    let lat = numeric(fields.get("lat"))
        .ok_or_else(|| Error::validation(format!("{}.lat must be numeric", label)))?;
    let lng = numeric(fields.get("lng"))
        .ok_or_else(|| Error::validation(format!("{}.lng must be numeric", label)))?;

    Coordinate::new(lat, lng)
        .map_err(|e| Error::validation(format!("{}: {}", label, e)))
}

/// JSON numbers and numeric strings are accepted
fn numeric(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn travel_mode(value: Option<&Value>) -> Result<TravelMode> {
    match value {
        None | Some(Value::Null) => Ok(TravelMode::default()),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(Error::validation(format!(
            "mode must be a string, got {}",
            other
        ))),
    }
}
