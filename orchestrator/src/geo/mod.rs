//! Geodata collaborators: geocoding, place resolution and directions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod nominatim;
mod resolver;
mod routing;

pub use nominatim::NominatimClient;
pub use resolver::GeolocationResolver;
pub use routing::{OrsClient, Router, RoutingHelper};

use crate::error::GeoError;

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// One geocoder match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    /// Provider-reported prominence in [0, 1], when available.
    pub importance: Option<f64>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best single match for `query`.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, GeoError>;

    /// Up to `limit` matches, in provider order.
    async fn geocode_many(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>, GeoError>;
}

/// Directions profile, named the way OpenRouteService names them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelProfile {
    #[default]
    FootWalking,
    FootHiking,
    DrivingCar,
    CyclingRegular,
    Wheelchair,
}

impl TravelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::FootWalking => "foot-walking",
            TravelProfile::FootHiking => "foot-hiking",
            TravelProfile::DrivingCar => "driving-car",
            TravelProfile::CyclingRegular => "cycling-regular",
            TravelProfile::Wheelchair => "wheelchair",
        }
    }
}

/// Great-circle (haversine) distance in kilometres between two `(lat, lon)` points.
pub fn great_circle_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().clamp(-1.0, 1.0).asin()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_same_point_is_zero() {
        assert!(great_circle_km((35.0, 135.7), (35.0, 135.7)).abs() < 1e-9);
    }

    #[test]
    fn distance_kyoto_to_osaka_is_about_43_km() {
        let kyoto = (35.0116, 135.7681);
        let osaka = (34.6937, 135.5023);
        let d = great_circle_km(kyoto, osaka);
        assert!((40.0..46.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = great_circle_km((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn profile_serializes_kebab_case() {
        let json = serde_json::to_string(&TravelProfile::DrivingCar).unwrap();
        assert_eq!(json, "\"driving-car\"");
        let parsed: TravelProfile = serde_json::from_str("\"foot-walking\"").unwrap();
        assert_eq!(parsed, TravelProfile::default());
        assert_eq!(TravelProfile::CyclingRegular.as_str(), "cycling-regular");
    }
}
