use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::models::{AnalysisRequest, AnalysisResult};
use crate::services::metrics;
use crate::startup::AppState;

/// `POST /analyze_message`
#[tracing::instrument(skip(state, request))]
pub async fn analyze_message(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    match state.agent.analyze_message(&request).await {
        Ok(result) => {
            metrics::record_pipeline("analyze_message", "success");
            Ok(Json(result))
        }
        Err(e) => {
            metrics::record_pipeline("analyze_message", "error");
            Err(AppError::upstream("Error analyzing message", e))
        }
    }
}
