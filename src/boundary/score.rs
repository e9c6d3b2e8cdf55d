//! Candidate ranking against a hint coordinate.

use crate::geocoding::Candidate;
use crate::models::{BoundingBox, Coordinate};

/// Lower is better.
///
/// A box containing the hint scores 0; otherwise the Euclidean distance (in
/// degrees) from the hint to the box centre. Without a hint every usable box
/// scores 0. An unusable box always scores `+inf`.
pub fn score(bbox: Option<&BoundingBox>, hint: Option<&Coordinate>) -> f64 {
    let Some(bbox) = bbox else {
        return f64::INFINITY;
    };
    let Some(hint) = hint else {
        return 0.0;
    };

    if bbox.contains(hint) {
        return 0.0;
    }

    let center = bbox.center();
    (hint.lng - center.lng).hypot(hint.lat - center.lat)
}

/// Pick the lowest-scoring candidate. Ties keep provider order.
pub fn pick_best<'a>(candidates: &'a [Candidate], hint: Option<&Coordinate>) -> Option<&'a Candidate> {
    candidates
        .iter()
        .map(|c| (c, score(c.bounding_box().as_ref(), hint)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
