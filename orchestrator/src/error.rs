use thiserror::Error;
use warp::{reject::Reject, Rejection, Reply};

/// Failures talking to a language model.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to the geocoder or the directions provider.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A workflow node failed; the run is abandoned.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Keyword synthesis failed: {0}")]
    Keywords(#[source] LlmError),

    #[error("Keyword model returned no search terms")]
    NoKeywords,

    #[error("Itinerary composition failed: {0}")]
    Itinerary(#[source] LlmError),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Planning failed: {0}")]
    PlanningError(#[from] PlanError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl Reject for ApiError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (code, message, details) = if let Some(api_err) = err.find::<ApiError>() {
        let (code, message) = match api_err {
            ApiError::BadRequest(_) => (400, "Bad request"),
            ApiError::PlanningError(_) => (500, "Planning failed"),
            _ => (500, "Internal server error"),
        };
        (code, message, api_err.to_string())
    } else if let Some(body_err) = err.find::<warp::body::BodyDeserializeError>() {
        (400, "Bad request", body_err.to_string())
    } else {
        return Err(err);
    };

    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "details": details,
    }));
    let status = warp::http::StatusCode::from_u16(code)
        .unwrap_or(warp::http::StatusCode::INTERNAL_SERVER_ERROR);

    Ok(warp::reply::with_status(json, status))
}
