use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::models::{RewriteRequest, RewriteResult};
use crate::services::metrics;
use crate::startup::AppState;

/// `POST /rewrite_reply`
#[tracing::instrument(skip(state, request))]
pub async fn rewrite_reply(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResult>, AppError> {
    match state.agent.rewrite_reply(&request).await {
        Ok(result) => {
            metrics::record_pipeline("rewrite_reply", "success");
            Ok(Json(result))
        }
        Err(e) => {
            metrics::record_pipeline("rewrite_reply", "error");
            Err(AppError::upstream("Error rewriting reply", e))
        }
    }
}
