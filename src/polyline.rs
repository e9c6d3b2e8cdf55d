//! Google encoded polyline codec.
//!
//! Each coordinate is stored as a fixed-point delta (1e-5 degrees) from the
//! previous one, latitude first. Every delta is sign-folded and written as
//! 5-bit chunks, low chunk first, with bit 0x20 marking continuation and 63
//! added to land in printable ASCII. Arithmetic wraps at 32 bits.

use thiserror::Error;
use tracing::warn;

use crate::models::Coordinate;

const PRECISION: f64 = 1e5;

/// Highest shift a 32-bit accumulator can take (seven 5-bit chunks)
const MAX_SHIFT: u32 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },

    #[error("polyline truncated inside a value at position {position}")]
    Truncated { position: usize },

    #[error("latitude at position {position} has no longitude")]
    MissingLongitude { position: usize },

    #[error("value starting before position {position} exceeds 32 bits")]
    Overflow { position: usize },
}

/// Decode a polyline, treating malformed input as an empty path.
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    match try_decode(encoded) {
        Ok(points) => points,
        Err(e) => {
            warn!("Discarding malformed polyline ({} bytes): {}", encoded.len(), e);
            Vec::new()
        }
    }
}

/// Decode a polyline, reporting where it is malformed.
pub fn try_decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i32 = 0;
    let mut lng: i32 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = lat.wrapping_add(next_delta(bytes, &mut index)?);

        if index >= bytes.len() {
            return Err(PolylineError::MissingLongitude { position: index });
        }
        lng = lng.wrapping_add(next_delta(bytes, &mut index)?);

        points.push(Coordinate {
            lat: f64::from(lat) / PRECISION,
            lng: f64::from(lng) / PRECISION,
        });
    }

    Ok(points)
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i32, PolylineError> {
    let mut result: i32 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *index;
        let byte = *bytes
            .get(position)
            .ok_or(PolylineError::Truncated { position })?;

        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position,
                character: char::from(byte),
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { position });
        }

        *index += 1;
        let chunk = i32::from(byte - 63);
        result |= (chunk & 0x1f).wrapping_shl(shift);
        shift += 5;

        if chunk & 0x20 == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode coordinates, rounding each to 1e-5 degrees.
///
/// Coordinates must be finite and in range (see [`Coordinate::new`]);
/// anything else does not fit the fixed-point encoding.
pub fn encode(points: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        debug_assert!(
            point.lat.is_finite() && point.lng.is_finite(),
            "cannot encode non-finite coordinate {:?}",
            point
        );
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let folded = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = folded as u64;

    while value >= 0x20 {
        out.push(char::from(((value & 0x1f) as u8 | 0x20) + 63));
        value >>= 5;
    }
    out.push(char::from(value as u8 + 63));
}
