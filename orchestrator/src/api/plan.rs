use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use warp::{Rejection, Reply};

use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{PlanResponse, ResumePlanRequest, StartPlanRequest, TripState};
use crate::workflow::{RunMode, Workflow};

pub async fn handle_start(
    request: StartPlanRequest,
    workflow: Arc<Workflow>,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    validate(&request.destination, request.duration_days)?;
    info!(
        "Starting plan for {} ({} days, vibe: {})",
        request.destination, request.duration_days, request.vibe
    );

    let state = TripState::new(
        request.destination,
        request.duration_days,
        request.vibe,
        request.places_to_avoid,
    );
    let final_state = run_plan(&workflow, &metrics, state, RunMode::Start).await?;
    Ok(warp::reply::json(&PlanResponse::from(final_state)))
}

pub async fn handle_resume(
    request: ResumePlanRequest,
    workflow: Arc<Workflow>,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    let mut state = request.current_state;
    validate(&state.destination, state.duration_days)?;
    info!(
        "Resuming plan for {} (avoid: {:?})",
        state.destination, request.place_to_avoid
    );

    if let Some(place) = request.place_to_avoid {
        state.avoid(place);
    }
    state.user_feedback = Some(request.user_feedback);

    let final_state = run_plan(&workflow, &metrics, state, RunMode::Resume).await?;
    Ok(warp::reply::json(&PlanResponse::from(final_state)))
}

async fn run_plan(
    workflow: &Workflow,
    metrics: &Metrics,
    state: TripState,
    mode: RunMode,
) -> Result<TripState, Rejection> {
    metrics.plan_started(mode.as_str());
    let started = Instant::now();

    let result = workflow.run(state, mode).await;
    metrics.observe_plan_duration(started.elapsed().as_secs_f64());

    result.map_err(|e| {
        error!(mode = mode.as_str(), error = %e, "Plan run failed");
        metrics.plan_failed(mode.as_str());
        warp::reject::custom(ApiError::from(e))
    })
}

fn validate(destination: &str, duration_days: u32) -> Result<(), Rejection> {
    if destination.trim().is_empty() {
        return Err(warp::reject::custom(ApiError::BadRequest(
            "destination must not be empty".to_string(),
        )));
    }
    if duration_days == 0 {
        return Err(warp::reject::custom(ApiError::BadRequest(
            "duration_days must be at least 1".to_string(),
        )));
    }
    Ok(())
}
