use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{great_circle_km, GeocodeHit, Geocoder};
use crate::error::GeoError;
use crate::metrics::Metrics;
use crate::models::Place;

/// Importance above which an anchor counts as a megacity.
const MEGACITY_IMPORTANCE: f64 = 0.75;
/// Nominatim omits importance for some entries; treat those as mid-sized.
const DEFAULT_IMPORTANCE: f64 = 0.5;
const GLOBAL_CANDIDATES: usize = 5;

/// How far from its anchor city a fallback match may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorClass {
    Megacity,
    RegionalHub,
}

impl AnchorClass {
    pub fn from_importance(importance: f64) -> Self {
        if importance > MEGACITY_IMPORTANCE {
            AnchorClass::Megacity
        } else {
            AnchorClass::RegionalHub
        }
    }

    pub fn radius_km(&self) -> f64 {
        match self {
            AnchorClass::Megacity => 30.0,
            AnchorClass::RegionalHub => 200.0,
        }
    }
}

/// Outcome of one resolution attempt. Each case is logged exactly once.
#[derive(Debug, PartialEq)]
enum Lookup {
    Found(Place),
    Miss,
    UnresolvedAnchor,
}

/// Resolves a place name near an anchor city into a verified [`Place`].
pub struct GeolocationResolver {
    geocoder: Arc<dyn Geocoder>,
    pacing: Duration,
    metrics: Metrics,
}

impl GeolocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, pacing: Duration, metrics: Metrics) -> Self {
        Self {
            geocoder,
            pacing,
            metrics,
        }
    }

    /// Zero or one place. Lookup misses and provider failures both yield an empty list.
    pub async fn resolve(&self, query: &str, location_name: &str) -> Vec<Place> {
        match self.try_resolve(query, location_name).await {
            Ok(Lookup::Found(place)) => vec![place],
            Ok(Lookup::Miss) => {
                info!(%query, "No results found");
                vec![]
            }
            Ok(Lookup::UnresolvedAnchor) => vec![],
            Err(e) => {
                warn!(%query, %location_name, error = %e, "Geocoder failed, treating as miss");
                self.metrics.geocode_outcome("error");
                vec![]
            }
        }
    }

    async fn try_resolve(&self, query: &str, location_name: &str) -> Result<Lookup, GeoError> {
        self.pace().await;
        let Some(anchor) = self.geocoder.geocode(location_name).await? else {
            warn!(%location_name, "Target city not found");
            self.metrics.geocode_outcome("unresolved_anchor");
            return Ok(Lookup::UnresolvedAnchor);
        };

        let importance = anchor.importance.unwrap_or(DEFAULT_IMPORTANCE);
        let class = AnchorClass::from_importance(importance);
        info!(%location_name, importance, ?class, radius_km = class.radius_km(), "Anchor classified");

        // A strict "place, city" match is accepted without a distance check.
        self.pace().await;
        let strict_query = format!("{query}, {location_name}");
        if let Some(hit) = self.geocoder.geocode(&strict_query).await? {
            self.metrics.geocode_outcome("strict");
            return Ok(Lookup::Found(to_place(query, hit)));
        }

        info!(%query, "Strict search failed, trying global search");
        self.pace().await;
        let candidates = self.geocoder.geocode_many(query, GLOBAL_CANDIDATES).await?;
        let anchor_point = (anchor.latitude, anchor.longitude);

        for candidate in candidates {
            let distance = great_circle_km(anchor_point, (candidate.latitude, candidate.longitude));
            if distance <= class.radius_km() {
                info!(address = %candidate.address, distance_km = distance as i64, "Found match via global search");
                self.metrics.geocode_outcome("global");
                return Ok(Lookup::Found(to_place(query, candidate)));
            }
            debug!(distance_km = distance as i64, limit_km = class.radius_km(), "Skipping candidate");
        }

        self.metrics.geocode_outcome("miss");
        Ok(Lookup::Miss)
    }

    async fn pace(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

/// The searched name, not the provider's display name, identifies the place.
fn to_place(query: &str, hit: GeocodeHit) -> Place {
    Place {
        name: query.to_string(),
        address: hit.address,
        coordinates: [hit.longitude, hit.latitude],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::mock::{hit, MockGeocoder};

    const CITY: &str = "Springfield";
    // 45 km due north of (40.0, -90.0), roughly.
    const FAR_LAT: f64 = 40.0 + 45.0 / 111.19;

    fn resolver(geocoder: MockGeocoder) -> (GeolocationResolver, Arc<MockGeocoder>, Metrics) {
        let geocoder = Arc::new(geocoder);
        let metrics = Metrics::new().unwrap();
        let resolver = GeolocationResolver::new(geocoder.clone(), Duration::ZERO, metrics.clone());
        (resolver, geocoder, metrics)
    }

    fn city(importance: f64) -> MockGeocoder {
        MockGeocoder::new().with_hit(CITY, hit(40.0, -90.0, "Springfield, USA", Some(importance)))
    }

    #[test]
    fn classification_threshold_is_exclusive() {
        assert_eq!(AnchorClass::from_importance(0.9), AnchorClass::Megacity);
        assert_eq!(AnchorClass::from_importance(0.75), AnchorClass::RegionalHub);
        assert_eq!(AnchorClass::from_importance(0.4), AnchorClass::RegionalHub);
        assert_eq!(AnchorClass::Megacity.radius_km(), 30.0);
        assert_eq!(AnchorClass::RegionalHub.radius_km(), 200.0);
    }

    #[tokio::test]
    async fn megacity_rejects_candidate_beyond_30_km() {
        let geocoder = city(0.9).with_candidates("Old Mill", vec![hit(FAR_LAT, -90.0, "Old Mill", None)]);
        let (resolver, _, metrics) = resolver(geocoder);

        assert!(resolver.resolve("Old Mill", CITY).await.is_empty());
        assert_eq!(metrics.geocode_count("miss"), 1);
    }

    #[tokio::test]
    async fn regional_hub_accepts_candidate_within_200_km() {
        let geocoder = city(0.4).with_candidates("Old Mill", vec![hit(FAR_LAT, -90.0, "Old Mill Rd", None)]);
        let (resolver, _, metrics) = resolver(geocoder);

        let places = resolver.resolve("Old Mill", CITY).await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Old Mill");
        assert_eq!(places[0].address, "Old Mill Rd");
        assert_eq!(places[0].coordinates, [-90.0, FAR_LAT]);
        assert_eq!(metrics.geocode_count("global"), 1);
    }

    #[tokio::test]
    async fn strict_match_skips_global_search() {
        // The strict hit is far away; it is still accepted.
        let geocoder = city(0.9)
            .with_hit("Old Mill, Springfield", hit(10.0, 10.0, "Old Mill, Springfield", None))
            .with_candidates("Old Mill", vec![hit(40.0, -90.0, "decoy", None)]);
        let (resolver, geocoder, metrics) = resolver(geocoder);

        let places = resolver.resolve("Old Mill", CITY).await;
        assert_eq!(places[0].address, "Old Mill, Springfield");
        assert!(!geocoder.calls().iter().any(|c| c.starts_with("many:")));
        assert_eq!(metrics.geocode_count("strict"), 1);
    }

    #[tokio::test]
    async fn first_candidate_in_radius_wins() {
        let geocoder = city(0.4).with_candidates(
            "Lake",
            vec![
                hit(60.0, -90.0, "too far", None),
                hit(40.5, -90.0, "first in range", None),
                hit(40.01, -90.0, "closer but later", None),
            ],
        );
        let (resolver, _, _) = resolver(geocoder);

        let places = resolver.resolve("Lake", CITY).await;
        assert_eq!(places[0].address, "first in range");
    }

    #[tokio::test]
    async fn missing_importance_defaults_to_regional_hub() {
        let geocoder = MockGeocoder::new()
            .with_hit(CITY, hit(40.0, -90.0, "Springfield", None))
            .with_candidates("Old Mill", vec![hit(FAR_LAT, -90.0, "Old Mill", None)]);
        let (resolver, _, _) = resolver(geocoder);

        assert_eq!(resolver.resolve("Old Mill", CITY).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_anchor_yields_nothing() {
        let (resolver, geocoder, metrics) = resolver(MockGeocoder::new());

        assert!(resolver.resolve("Old Mill", "Atlantis").await.is_empty());
        assert_eq!(geocoder.calls(), vec!["one:Atlantis"]);
        assert_eq!(metrics.geocode_count("unresolved_anchor"), 1);
    }

    #[tokio::test]
    async fn unknown_anchor_is_not_reported_as_a_miss() {
        let (resolver, _, metrics) = resolver(MockGeocoder::new());

        let outcome = resolver.try_resolve("Old Mill", "Atlantis").await.unwrap();
        assert_eq!(outcome, Lookup::UnresolvedAnchor);
        assert_eq!(metrics.geocode_count("miss"), 0);
    }

    #[tokio::test]
    async fn unmatched_candidates_are_a_miss() {
        let geocoder = city(0.9).with_candidates("Old Mill", vec![hit(FAR_LAT, -90.0, "Old Mill", None)]);
        let (resolver, _, _) = resolver(geocoder);

        assert_eq!(resolver.try_resolve("Old Mill", CITY).await.unwrap(), Lookup::Miss);
    }

    const PACING: Duration = Duration::from_millis(1100);

    fn paced(geocoder: MockGeocoder) -> GeolocationResolver {
        GeolocationResolver::new(Arc::new(geocoder), PACING, Metrics::new().unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn global_fallback_waits_before_each_of_three_calls() {
        let geocoder = city(0.4).with_candidates("Old Mill", vec![hit(FAR_LAT, -90.0, "Old Mill Rd", None)]);
        let resolver = paced(geocoder);

        let started = tokio::time::Instant::now();
        assert_eq!(resolver.resolve("Old Mill", CITY).await.len(), 1);
        assert!(started.elapsed() >= PACING * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn strict_hit_waits_before_each_of_two_calls() {
        let geocoder = city(0.9).with_hit("Old Mill, Springfield", hit(40.0, -90.0, "Old Mill, Springfield", None));
        let resolver = paced(geocoder);

        let started = tokio::time::Instant::now();
        assert_eq!(resolver.resolve("Old Mill", CITY).await.len(), 1);
        let elapsed = started.elapsed();
        assert!(elapsed >= PACING * 2);
        assert!(elapsed < PACING * 3);
    }

    #[tokio::test]
    async fn provider_failure_is_absorbed() {
        let (resolver, _, metrics) = resolver(MockGeocoder::failing());

        assert!(resolver.resolve("Old Mill", CITY).await.is_empty());
        assert_eq!(metrics.geocode_count("error"), 1);
    }
}
