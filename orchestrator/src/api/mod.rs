use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::geo::RoutingHelper;
use crate::metrics::Metrics;
use crate::workflow::Workflow;

mod directions;
mod plan;

pub fn routes(
    workflow: Arc<Workflow>,
    routing: Arc<RoutingHelper>,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let plan = warp::path("plan");

    let start_route = plan
        .and(warp::path("start"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_workflow(workflow.clone()))
        .and(with_metrics(metrics.clone()))
        .and_then(plan::handle_start);

    let resume_route = plan
        .and(warp::path("resume"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_workflow(workflow))
        .and(with_metrics(metrics))
        .and_then(plan::handle_resume);

    let directions_route = plan
        .and(warp::path("directions"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_routing(routing))
        .and_then(directions::handle_directions);

    start_route.or(resume_route).or(directions_route)
}

fn with_workflow(
    workflow: Arc<Workflow>,
) -> impl Filter<Extract = (Arc<Workflow>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || workflow.clone())
}

fn with_routing(
    routing: Arc<RoutingHelper>,
) -> impl Filter<Extract = (Arc<RoutingHelper>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || routing.clone())
}

fn with_metrics(
    metrics: Metrics,
) -> impl Filter<Extract = (Metrics,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || metrics.clone())
}
