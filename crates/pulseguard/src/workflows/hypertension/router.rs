use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::questionnaire::RawInput;
use crate::error::AppError;
use super::service::{AssessmentError, AssessmentService};

/// Router builder exposing the assessment and stage catalog endpoints.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assess_handler))
        .route("/api/v1/stages", get(stages_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<AssessmentService>>,
    body: Bytes,
) -> Response {
    let raw: RawInput = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(err) => return malformed_body(&body, err),
    };

    match service.assess(&raw) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(AssessmentError::Validation(err)) => {
            let payload = json!({
                "error": err.user_message(),
                "field": err.field(),
                "form": raw,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "assessment failed");
            let payload = json!({
                "error": other.user_message(),
                "form": raw,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

// Answers must be a flat object of strings; anything else is a 400, echoing the body when it is JSON.
fn malformed_body(body: &[u8], err: serde_json::Error) -> Response {
    warn!(error = %err, "rejected malformed questionnaire payload");
    match serde_json::from_slice::<Value>(body) {
        Ok(form) => {
            let payload = json!({
                "error": AppError::Input(err).to_string(),
                "form": form,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(_) => AppError::Input(err).into_response(),
    }
}

pub(crate) async fn stages_handler(
    State(service): State<Arc<AssessmentService>>,
) -> Response {
    let payload = json!({
        "stages": service.catalog().entries(),
        "simulated": service.is_simulated(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
