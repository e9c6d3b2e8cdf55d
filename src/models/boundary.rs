use serde::{Deserialize, Serialize};

use super::{BoundingBox, Ring};

/// Resolved boundary for a place query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryResult {
    pub name: String,
    pub display_name: String,
    /// `[south, north, west, east]`, or null when the provider's box is unusable
    pub bounding_box: Option<BoundingBox>,
    /// Outer rings and holes of every polygon
    pub all_rings: Vec<Ring>,
    /// Only the first ring of each polygon (outline, mask, geofence)
    pub outer_rings: Vec<Ring>,
}
