//! Boundary resolution service.

use std::time::Duration;
use tracing::{debug, info};

use super::score::pick_best;
use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::geocoding::{Candidate, GeocodingProvider};
use crate::models::{BoundaryResult, Coordinate, GeoShape};

/// Hint used in cache keys when the request carries no hint
pub const FALLBACK_HINT: Coordinate = Coordinate {
    lat: 14.603179674407787,
    lng: 121.03603853653271,
};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Resolves a place query to the polygon rings of its best candidate
pub struct BoundaryResolver<P, C> {
    provider: P,
    cache: C,
    ttl: Duration,
}

impl<P, C> BoundaryResolver<P, C>
where
    P: GeocodingProvider,
    C: Cache<BoundaryResult>,
{
    pub fn new(provider: P, cache: C, ttl: Duration) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    pub async fn resolve(&self, query: &str, hint: Option<Coordinate>) -> Result<BoundaryResult> {
        if query.trim().is_empty() {
            return Err(Error::validation("q is required"));
        }

        let key = cache_key(query, hint.as_ref());
        if let Some(hit) = self.cache.get(&key) {
            debug!("Boundary cache hit for {}", key);
            return Ok(hit);
        }

        let candidates = self.provider.search(query).await?;
        let result = select_boundary(query, &candidates, hint.as_ref())?;

        info!(
            "Resolved '{}' to '{}' ({} rings, {} outer)",
            query,
            result.display_name,
            result.all_rings.len(),
            result.outer_rings.len()
        );

        self.cache.set(&key, result.clone(), self.ttl);
        Ok(result)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

/// Cache key for a query; an absent hint is keyed as [`FALLBACK_HINT`]
pub fn cache_key(query: &str, hint: Option<&Coordinate>) -> String {
    let hint = hint.unwrap_or(&FALLBACK_HINT);
    format!("nominatim:{}:{}:{}", query, hint.lat, hint.lng)
}

/// Filter to polygon-bearing candidates, rank them and build the result
pub fn select_boundary(
    query: &str,
    candidates: &[Candidate],
    hint: Option<&Coordinate>,
) -> Result<BoundaryResult> {
    let polygonal: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.has_polygon())
        .cloned()
        .collect();

    debug!(
        "{} of {} candidates for '{}' carry polygons",
        polygonal.len(),
        candidates.len(),
        query
    );

    let best = pick_best(&polygonal, hint).ok_or_else(|| Error::not_found("No polygon found"))?;

    let geojson = best
        .geojson
        .as_ref()
        .ok_or_else(|| Error::not_found("No polygon found"))?;
    let shape = GeoShape::from_geojson(geojson)?;

    Ok(BoundaryResult {
        name: non_empty(best.name.as_deref()).unwrap_or(query).to_string(),
        display_name: non_empty(best.display_name.as_deref())
            .unwrap_or(query)
            .to_string(),
        bounding_box: best.bounding_box(),
        all_rings: shape.all_rings(),
        outer_rings: shape.outer_rings(),
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NoCache, TtlCache};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubGeocoder {
        candidates: Value,
        calls: Arc<AtomicUsize>,
    }

    impl StubGeocoder {
        fn new(candidates: Value) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    candidates,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl GeocodingProvider for StubGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<Candidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.candidates.clone()).unwrap())
        }
    }

    struct FailingGeocoder;

    impl GeocodingProvider for FailingGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<Candidate>> {
            Err(Error::unreachable("Nominatim 503 Service Unavailable"))
        }
    }

    fn san_juan() -> Value {
        json!([
            {
                "name": "San Juan",
                "display_name": "San Juan, La Union",
                "boundingbox": ["16.60", "16.72", "120.30", "120.45"],
                "geojson": {"type": "Polygon", "coordinates": [[[120.3, 16.6], [120.45, 16.6], [120.45, 16.72]]]}
            },
            {
                "name": "San Juan",
                "display_name": "San Juan, Metro Manila",
                "boundingbox": ["14.585", "14.616", "121.018", "121.060"],
                "geojson": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[121.02, 14.59], [121.05, 14.59], [121.05, 14.61]], [[121.03, 14.60], [121.04, 14.60], [121.04, 14.605]]],
                        [[[121.055, 14.60], [121.06, 14.60], [121.06, 14.61]], [[121.056, 14.601], [121.057, 14.601], [121.057, 14.602]]]
                    ]
                }
            },
            {
                "name": "San Juan",
                "display_name": "San Juan (point)",
                "boundingbox": ["14.6", "14.6", "121.03", "121.03"],
                "geojson": {"type": "Point", "coordinates": [121.03, 14.6]}
            }
        ])
    }

    #[tokio::test]
    async fn test_hint_selects_containing_candidate() {
        let (provider, _) = StubGeocoder::new(san_juan());
        let resolver = BoundaryResolver::new(provider, NoCache, DEFAULT_CACHE_TTL);

        let result = resolver
            .resolve("San Juan", Some(Coordinate { lat: 14.60, lng: 121.03 }))
            .await
            .unwrap();

        assert_eq!(result.display_name, "San Juan, Metro Manila");
        assert_eq!(result.all_rings.len(), 4);
        assert_eq!(result.outer_rings.len(), 2);
        assert_eq!(result.outer_rings[0], result.all_rings[0]);
        assert_eq!(result.outer_rings[1], result.all_rings[2]);
        assert_eq!(result.outer_rings[1][0], Coordinate { lat: 14.60, lng: 121.055 });
        assert_eq!(result.bounding_box.unwrap().south, 14.585);
    }

    #[tokio::test]
    async fn test_without_hint_provider_order_wins() {
        let (provider, _) = StubGeocoder::new(san_juan());
        let resolver = BoundaryResolver::new(provider, NoCache, DEFAULT_CACHE_TTL);

        let result = resolver.resolve("San Juan", None).await.unwrap();
        assert_eq!(result.display_name, "San Juan, La Union");
        assert_eq!(result.outer_rings.len(), 1);
        assert_eq!(result.outer_rings[0][0], Coordinate { lat: 16.6, lng: 120.3 });
    }

    #[tokio::test]
    async fn test_no_polygon_is_not_found() {
        let (provider, _) = StubGeocoder::new(json!([
            {"name": "Spot", "boundingbox": ["1", "2", "3", "4"], "geojson": {"type": "Point", "coordinates": [3.5, 1.5]}},
            {"name": "Nothing"}
        ]));
        let resolver = BoundaryResolver::new(provider, NoCache, DEFAULT_CACHE_TTL);

        let err = resolver.resolve("Spot", None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let resolver = BoundaryResolver::new(FailingGeocoder, NoCache, DEFAULT_CACHE_TTL);
        let err = resolver.resolve("San Juan", None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { reachable: false, .. }));
    }

    #[tokio::test]
    async fn test_blank_query_never_reaches_provider() {
        let (provider, calls) = StubGeocoder::new(san_juan());
        let resolver = BoundaryResolver::new(provider, NoCache, DEFAULT_CACHE_TTL);

        let err = resolver.resolve("   ", None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let (provider, calls) = StubGeocoder::new(san_juan());
        let resolver = BoundaryResolver::new(provider, TtlCache::new(), DEFAULT_CACHE_TTL);
        let hint = Some(Coordinate { lat: 14.60, lng: 121.03 });

        let first = resolver.resolve("San Juan", hint).await.unwrap();
        let second = resolver.resolve("San Juan", hint).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Different hint, different key
        resolver.resolve("San Juan", None).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (provider, calls) = StubGeocoder::new(json!([]));
        let resolver = BoundaryResolver::new(provider, TtlCache::new(), DEFAULT_CACHE_TTL);

        assert!(resolver.resolve("Nowhere", None).await.is_err());
        assert!(resolver.resolve("Nowhere", None).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_name_falls_back_to_query() {
        let candidates: Vec<Candidate> = serde_json::from_value(json!([{
            "name": "",
            "boundingbox": ["0", "1", "0", "1"],
            "geojson": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]}
        }]))
        .unwrap();

        let result = select_boundary("Somewhere", &candidates, None).unwrap();
        assert_eq!(result.name, "Somewhere");
        assert_eq!(result.display_name, "Somewhere");
    }

    #[test]
    fn test_winner_with_broken_geometry_fails_whole_call() {
        let candidates: Vec<Candidate> = serde_json::from_value(json!([{
            "name": "Broken",
            "boundingbox": ["0", "1", "0", "1"],
            "geojson": {"type": "Polygon", "coordinates": "oops"}
        }]))
        .unwrap();

        let err = select_boundary("Broken", &candidates, None).unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
    }

    #[test]
    fn test_cache_key_uses_fallback_hint() {
        assert_eq!(
            cache_key("San Juan City", None),
            "nominatim:San Juan City:14.603179674407787:121.03603853653271"
        );
        assert_eq!(
            cache_key("Q", Some(&Coordinate { lat: 1.5, lng: -2.25 })),
            "nominatim:Q:1.5:-2.25"
        );
    }
}
