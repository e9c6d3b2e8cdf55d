//! Route decoding service.

use tracing::{debug, warn};

use super::instructions::to_plain_text;
use super::request::RouteRequest;
use crate::directions::{DirectionsProvider, DirectionsResponse, Step, TextValue};
use crate::error::{Error, Result};
use crate::models::{Coordinate, RouteResult, RouteStep, TravelMode};
use crate::polyline;

const STATUS_OK: &str = "OK";

/// Fetches a single route and decodes its polylines and instructions
pub struct RouteDecoder<P> {
    provider: P,
}

impl<P: DirectionsProvider> RouteDecoder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Validate a raw request, then route it
    pub async fn route_request(&self, request: &RouteRequest) -> Result<RouteResult> {
        let validated = request.validate()?;
        self.route(validated.origin, validated.destination, validated.mode)
            .await
    }

    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult> {
        let origin = Coordinate::new(origin.lat, origin.lng)?;
        let destination = Coordinate::new(destination.lat, destination.lng)?;

        let response = self.provider.directions(origin, destination, mode).await?;
        decode_response(response)
    }
}

/// Turn a provider response into a route, failing on any non-OK status
pub fn decode_response(response: DirectionsResponse) -> Result<RouteResult> {
    let status = if response.status.is_empty() {
        "UNKNOWN_ERROR".to_string()
    } else {
        response.status
    };
    let message = response.error_message.unwrap_or_default();

    if status != STATUS_OK {
        warn!("Directions provider answered {}: {}", status, message);
        return Err(Error::rejected(status, message));
    }

    let Some(route) = response.routes.into_iter().next() else {
        warn!("Directions provider answered OK without routes");
        let message = if message.is_empty() {
            "no routes returned".to_string()
        } else {
            message
        };
        return Err(Error::rejected(status, message));
    };

    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| Error::unreachable("malformed directions response: route has no legs"))?;

    let overview_path = polyline::decode(&route.overview_polyline.points);
    let steps: Vec<RouteStep> = leg.steps.into_iter().map(decode_step).collect();

    debug!(
        "Decoded route with {} overview points and {} steps",
        overview_path.len(),
        steps.len()
    );

    Ok(RouteResult {
        overview_path,
        steps,
        total_distance_text: text_of(leg.distance),
        duration_text: text_of(leg.duration),
        arrival_time_text: text_of(leg.arrival_time),
    })
}

fn decode_step(step: Step) -> RouteStep {
    let (distance_meters, distance_text) = match step.distance {
        Some(d) => (d.value.unwrap_or(0), d.text),
        None => (0, String::new()),
    };

    RouteStep {
        polyline: polyline::decode(&step.polyline.points),
        distance_meters,
        distance_text,
        instruction_plain_text: to_plain_text(&step.html_instructions),
    }
}

fn text_of(value: Option<TextValue>) -> String {
    value.map(|v| v.text).unwrap_or_default()
}
