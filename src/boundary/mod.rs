//! Place boundary resolution.
//!
//! Looks a query up with the geocoding provider, keeps polygon-bearing
//! candidates, ranks them against an optional hint coordinate and returns the
//! winner's rings.

mod resolver;
mod score;

pub use resolver::{cache_key, select_boundary, BoundaryResolver, DEFAULT_CACHE_TTL, FALLBACK_HINT};
pub use score::{pick_best, score};
