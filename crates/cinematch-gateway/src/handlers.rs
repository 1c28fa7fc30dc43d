use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::IntoResponse;

use super::error::ApiError;
use super::server::AppState;

#[derive(serde::Serialize)]
pub(crate) struct RecommendationResponse {
    pub recommendation: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

/// Extract a non-empty string `input` field from a JSON body.
fn parse_input(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("input")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Answers every non-POST method on the match path without reading the body.
pub(crate) async fn method_not_allowed_handler(method: Method) -> ApiError {
    tracing::debug!(%method, "rejected non-POST request");
    ApiError::MethodNotAllowed
}

pub(crate) async fn match_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Some(input) = parse_input(&body) else {
        tracing::debug!("rejected request without string input");
        return Err(ApiError::InvalidInput);
    };

    match state.service.answer(&input).await {
        Ok(recommendation) if recommendation.is_empty() => {
            tracing::error!("pipeline returned an empty recommendation");
            Err(ApiError::ProcessingFailed)
        }
        Ok(recommendation) => Ok(Json(RecommendationResponse { recommendation })),
        Err(e) => {
            tracing::error!(stage = %e.stage(), "error in POST handler: {e}");
            Err(ApiError::InternalError)
        }
    }
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
