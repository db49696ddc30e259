//! REST API endpoints for the ProjectionGateway
//!
//! `POST /project/receptions` runs the projection engine on a JSON body with
//! the eight model inputs. `GET /health` reports liveness. Every failure is
//! recovered into the same JSON error body.

use metrics::{histogram, increment_counter};
use projection_engine::{ProjectionCalculator, ProjectionRequest};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::error::{ErrorResponse, InvalidInputRejection};

/// Project receptions for one request body
pub async fn project_receptions(
    request: ProjectionRequest,
    calculator: Arc<ProjectionCalculator>,
) -> Result<impl warp::Reply, warp::Rejection> {
    increment_counter!("projection_requests_total");

    match calculator.breakdown(&request) {
        Ok(breakdown) => {
            histogram!("projection_lambda", breakdown.lambda);
            let result = calculator.finalize(&breakdown);
            tracing::debug!(
                "Projection served: {} receptions, P(over {}) = {}",
                result.projection,
                request.line,
                result.over_probability
            );
            Ok(warp::reply::json(&result))
        }
        Err(e) => Err(warp::reject::custom(InvalidInputRejection(e))),
    }
}

/// Map any rejection into a JSON error response
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found".to_string())
    } else if let Some(InvalidInputRejection(e)) = err.find::<InvalidInputRejection>() {
        (StatusCode::BAD_REQUEST, "INVALID_INPUT", e.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "INVALID_BODY", e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", "Request body too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "LENGTH_REQUIRED", "Content-Length header required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            "Expected application/json".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", "Method not allowed".to_string())
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, "CORS_FORBIDDEN", e.to_string())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
    };

    if status.is_client_error() {
        increment_counter!("projection_rejections_total", "code" => code);
        tracing::warn!("Request rejected with {}: {}", code, message);
    }

    let body = ErrorResponse::new(code, message, None);
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Create all API routes
pub fn create_routes(
    calculator: Arc<ProjectionCalculator>,
    max_body_bytes: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let calculator_filter = warp::any().map(move || calculator.clone());

    // Reception projection endpoint
    let projection = warp::path!("project" / "receptions")
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json::<ProjectionRequest>())
        .and(calculator_filter)
        .and_then(project_receptions);

    // Health check endpoint
    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    projection
        .or(health)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
        .recover(handle_rejection)
        .with(warp::trace::request())
}
