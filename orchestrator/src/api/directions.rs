use std::sync::Arc;
use tracing::info;
use warp::{Rejection, Reply};

use crate::error::ApiError;
use crate::geo::RoutingHelper;
use crate::models::DirectionsRequest;

pub async fn handle_directions(
    request: DirectionsRequest,
    routing: Arc<RoutingHelper>,
) -> Result<impl Reply, Rejection> {
    for [lon, lat] in [request.start, request.end] {
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(warp::reject::custom(ApiError::BadRequest(format!(
                "coordinates out of range: [{lon}, {lat}]"
            ))));
        }
    }

    info!("Directions requested ({})", request.profile.as_str());
    let estimate = routing
        .directions(request.start, request.end, request.profile)
        .await;
    Ok(warp::reply::json(&estimate))
}
