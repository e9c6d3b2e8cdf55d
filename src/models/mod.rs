//! Request-scoped value types for boundaries and routes.

pub mod boundary;
pub mod coordinate;
pub mod route;
pub mod shape;

pub use boundary::BoundaryResult;
pub use coordinate::{BoundingBox, Coordinate};
pub use route::{RouteResult, RouteStep, TravelMode};
pub use shape::{GeoJson, GeoShape, Ring};
