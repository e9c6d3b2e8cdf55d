//! Driving directions: request validation, polyline decoding and
//! instruction cleanup.

mod decoder;
mod instructions;
mod request;

pub use decoder::{decode_response, RouteDecoder};
pub use instructions::to_plain_text;
pub use request::{RouteRequest, ValidatedRoute};
