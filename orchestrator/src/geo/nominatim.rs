use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{GeocodeHit, Geocoder};
use crate::error::GeoError;

/// Nominatim search client.
///
/// The limiter is shared by every caller of this client, so concurrent plan
/// requests stay under the provider's one-request-per-period policy together.
pub struct NominatimClient {
    http: Client,
    base_url: String,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl NominatimClient {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        min_interval: Duration,
    ) -> Result<Self, GeoError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        let limiter = Quota::with_period(min_interval).map(RateLimiter::direct);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>, GeoError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();
        debug!(%query, %limit, "search: querying nominatim");

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        places.into_iter().map(NominatimPlace::into_hit).collect()
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, GeoError> {
        Ok(self.search(query, 1).await?.into_iter().next())
    }

    async fn geocode_many(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>, GeoError> {
        self.search(query, limit).await
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    importance: Option<f64>,
}

impl NominatimPlace {
    fn into_hit(self) -> Result<GeocodeHit, GeoError> {
        let latitude = self
            .lat
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad latitude '{}'", self.lat)))?;
        let longitude = self
            .lon
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad longitude '{}'", self.lon)))?;

        Ok(GeocodeHit {
            latitude,
            longitude,
            address: self.display_name,
            importance: self.importance,
        })
    }
}
