use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::TravelProfile;
use crate::error::GeoError;

/// Raw provider summary: seconds and metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RouteSummary {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub distance: f64,
}

#[async_trait]
pub trait Router: Send + Sync {
    /// `None` when the provider knows no route between the points.
    async fn route(
        &self,
        start: [f64; 2],
        end: [f64; 2],
        profile: TravelProfile,
    ) -> Result<Option<RouteSummary>, GeoError>;
}

/// What the routing helper hands back. Never an error: routing only enriches a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteEstimate {
    Estimate {
        duration_minutes: f64,
        distance_km: f64,
    },
    Unavailable {
        duration_minutes: f64,
        distance_km: f64,
        note: String,
    },
    /// A bare error string, as the provider failure text.
    Diagnostic(String),
}

pub struct RoutingHelper {
    router: Option<Arc<dyn Router>>,
}

impl RoutingHelper {
    pub fn new(router: Option<Arc<dyn Router>>) -> Self {
        Self { router }
    }

    pub async fn directions(&self, start: [f64; 2], end: [f64; 2], profile: TravelProfile) -> RouteEstimate {
        let Some(router) = &self.router else {
            return RouteEstimate::Unavailable {
                duration_minutes: 0.0,
                distance_km: 0.0,
                note: "Directions unavailable (No API Key)".to_string(),
            };
        };

        match router.route(start, end, profile).await {
            Ok(Some(summary)) => RouteEstimate::Estimate {
                duration_minutes: round1(summary.duration / 60.0),
                distance_km: round1(summary.distance / 1000.0),
            },
            Ok(None) => RouteEstimate::Diagnostic("No directions found.".to_string()),
            Err(e) => {
                warn!(error = %e, profile = profile.as_str(), "Directions request failed");
                RouteEstimate::Diagnostic(format!("Error using OpenRouteService API: {e}"))
            }
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// OpenRouteService directions client.
pub struct OrsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OrsClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, GeoError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Router for OrsClient {
    async fn route(
        &self,
        start: [f64; 2],
        end: [f64; 2],
        profile: TravelProfile,
    ) -> Result<Option<RouteSummary>, GeoError> {
        let url = format!("{}/v2/directions/{}", self.base_url, profile.as_str());
        debug!(%url, ?start, ?end, "route: requesting directions");

        let response = self
            .http
            .post(url)
            .header("Authorization", self.api_key.as_str())
            .json(&serde_json::json!({ "coordinates": [start, end] }))
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

        let body: OrsResponse = response.json().await?;
        Ok(body.routes.into_iter().next().map(|r| r.summary))
    }
}

#[derive(Debug, Deserialize)]
struct OrsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    #[serde(default)]
    summary: RouteSummary,
}
