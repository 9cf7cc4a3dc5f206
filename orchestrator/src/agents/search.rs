// Search Agent: Resolves keywords into verified places near the destination

use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::geo::GeolocationResolver;
use crate::models::{Place, TripState};

/// Toponyms that geocode to the wrong country unless a region is attached.
const AMBIGUOUS_TOPONYMS: &[(&str, &str, &str)] = &[("London", "UK", "London, UK")];

pub struct SearchAgent {
    resolver: Arc<GeolocationResolver>,
}

impl SearchAgent {
    pub fn new(resolver: Arc<GeolocationResolver>) -> Self {
        Self { resolver }
    }

    /// Every keyword is resolved in order, one at a time. Misses are dropped.
    pub async fn search(&self, state: &TripState) -> Vec<Place> {
        let anchor = normalize_destination(&state.destination);
        info!("Search: Resolving {} keywords around {}", state.keywords.len(), anchor);

        let mut found = Vec::new();
        for keyword in &state.keywords {
            found.extend(self.resolver.resolve(keyword, &anchor).await);
        }

        let places = dedup_and_filter(found, &state.places_to_avoid);
        info!("Search: {} verified places", places.len());
        places
    }
}

pub fn normalize_destination(destination: &str) -> String {
    for (toponym, region, expanded) in AMBIGUOUS_TOPONYMS {
        if destination.contains(toponym) && !destination.contains(region) {
            return expanded.to_string();
        }
    }
    destination.to_string()
}

/// First occurrence of a name wins; avoided names are dropped.
pub fn dedup_and_filter(places: Vec<Place>, avoid: &[String]) -> Vec<Place> {
    let avoid: HashSet<&str> = avoid.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|p| !avoid.contains(p.name.as_str()) && seen.insert(p.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::mock::{hit, MockGeocoder};
    use crate::metrics::Metrics;
    use proptest::prelude::*;
    use std::time::Duration;

    fn place(name: &str, address: &str) -> Place {
        Place {
            name: name.into(),
            address: address.into(),
            coordinates: [0.0, 0.0],
        }
    }

    #[test]
    fn london_gets_a_region() {
        assert_eq!(normalize_destination("London"), "London, UK");
        assert_eq!(normalize_destination("Central London"), "London, UK");
        assert_eq!(normalize_destination("London, UK"), "London, UK");
        assert_eq!(normalize_destination("Kyoto, Japan"), "Kyoto, Japan");
    }

    #[test]
    fn duplicates_keep_first_seen_entry() {
        let places = vec![place("A", "first"), place("B", "b"), place("A", "second"), place("a", "lower")];
        let result = dedup_and_filter(places, &[]);
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "a"]);
        assert_eq!(result[0].address, "first");
    }

    #[test]
    fn avoided_names_are_removed() {
        let places = vec![place("Fushimi Inari", "x"), place("Ryoan-ji", "y")];
        let result = dedup_and_filter(places, &["Fushimi Inari".to_string()]);
        assert_eq!(result, vec![place("Ryoan-ji", "y")]);
    }

    proptest! {
        #[test]
        fn output_has_unique_names_and_no_avoided(
            names in prop::collection::vec("[a-d]{1,2}", 0..30),
            avoid in prop::collection::vec("[a-d]{1,2}", 0..5),
        ) {
            let places: Vec<Place> = names.iter().map(|n| place(n, "addr")).collect();
            let result = dedup_and_filter(places, &avoid);

            let mut seen = HashSet::new();
            for p in &result {
                prop_assert!(seen.insert(p.name.clone()));
                prop_assert!(!avoid.contains(&p.name));
            }
            for n in &names {
                if !avoid.contains(n) {
                    prop_assert!(seen.contains(n));
                }
            }
        }
    }

    #[tokio::test]
    async fn search_resolves_every_keyword_against_normalized_anchor() {
        let geocoder = Arc::new(
            MockGeocoder::new()
                .with_hit("London, UK", hit(51.5, -0.12, "London", Some(0.9)))
                .with_hit("Tate Modern, London, UK", hit(51.507, -0.099, "Tate Modern", None))
                .with_hit("British Museum, London, UK", hit(51.519, -0.127, "British Museum", None)),
        );
        let resolver = GeolocationResolver::new(geocoder.clone(), Duration::ZERO, Metrics::new().unwrap());
        let agent = SearchAgent::new(Arc::new(resolver));

        let mut state = TripState::new("London".into(), 1, "art".into(), vec!["British Museum".into()]);
        state.keywords = vec!["Tate Modern".into(), "British Museum".into(), "Tate Modern".into(), "Nowhere".into()];

        let places = agent.search(&state).await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Tate Modern");
        assert_eq!(places[0].coordinates, [-0.099, 51.507]);
        assert!(geocoder.calls().contains(&"one:Nowhere, London, UK".to_string()));
    }

    #[tokio::test]
    async fn no_keywords_yield_no_places() {
        let resolver = GeolocationResolver::new(Arc::new(MockGeocoder::new()), Duration::ZERO, Metrics::new().unwrap());
        let state = TripState::new("Goa".into(), 2, "beaches".into(), vec![]);
        assert!(SearchAgent::new(Arc::new(resolver)).search(&state).await.is_empty());
    }
}
