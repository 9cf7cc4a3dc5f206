use std::sync::Arc;
use tracing::{info, warn};
use warp::Filter;

mod agents;
mod api;
mod config;
mod error;
mod geo;
mod llm;
mod metrics;
mod middleware;
mod models;
mod workflow;

use agents::{ItineraryAgent, KeywordAgent, SearchAgent};
use geo::{GeolocationResolver, NominatimClient, OrsClient, Router, RoutingHelper};
use llm::ChatCompletionsClient;
use workflow::Workflow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting Travel Planning Orchestrator");
    info!("Configuration loaded");

    let metrics = metrics::Metrics::new()?;

    // Language models
    if config.llm_api_key.is_none() {
        warn!("No LLM API key configured; model calls will be unauthenticated");
    }
    let keyword_model = Arc::new(ChatCompletionsClient::new(
        &config.llm_base_url,
        config.llm_api_key.clone(),
        &config.keyword_model,
        config.llm_timeout(),
    )?);
    let itinerary_model = Arc::new(ChatCompletionsClient::new(
        &config.llm_base_url,
        config.llm_api_key.clone(),
        &config.itinerary_model,
        config.llm_timeout(),
    )?);
    info!(keyword_model = %config.keyword_model, itinerary_model = %config.itinerary_model, "Model clients created");

    // Geodata
    let geocoder = Arc::new(NominatimClient::new(
        &config.nominatim_url,
        &config.nominatim_user_agent,
        config.geocoder_timeout(),
        config.geocoder_pacing(),
    )?);
    let resolver = Arc::new(GeolocationResolver::new(
        geocoder,
        config.geocoder_pacing(),
        metrics.clone(),
    ));

    let router: Option<Arc<dyn Router>> = match &config.ors_api_key {
        Some(key) => Some(Arc::new(OrsClient::new(
            &config.ors_base_url,
            key.clone(),
            config.routing_timeout(),
        )?)),
        None => {
            warn!("ORS_API_KEY not set; directions unavailable");
            None
        }
    };
    let routing = Arc::new(RoutingHelper::new(router));

    let workflow = Arc::new(Workflow::new(
        KeywordAgent::new(keyword_model),
        SearchAgent::new(resolver),
        ItineraryAgent::new(itinerary_model),
    ));
    info!("Workflow compiled");

    // Build API routes
    let api_routes = api::routes(workflow, routing, metrics.clone())
        .with(warp::log("api"))
        .with(middleware::cors());

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics_route = warp::path("metrics")
        .and(warp::get())
        .and_then(move || {
            let metrics = metrics.clone();
            async move {
                let (buffer, content_type) = metrics.render().map_err(|e| {
                    warp::reject::custom(error::ApiError::InternalError(e.to_string()))
                })?;
                Ok::<_, warp::Rejection>(warp::reply::with_header(buffer, "Content-Type", content_type))
            }
        });

    let routes = health
        .or(metrics_route)
        .or(api_routes)
        .recover(error::handle_rejection);

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes)
        .run(addr)
        .await;

    Ok(())
}
