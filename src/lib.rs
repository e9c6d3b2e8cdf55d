//! JuanMap - map gateway for boundary lookup and route decoding
//!
//! This library provides the boundary resolver, route decoder and provider
//! clients used by the server binary.

pub mod boundary;
pub mod cache;
pub mod config;
pub mod directions;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod polyline;
pub mod route;

pub use error::{Error, Result};
pub use models::{BoundaryResult, Coordinate, RouteResult};
