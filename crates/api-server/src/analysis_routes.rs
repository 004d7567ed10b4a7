//! Strategy Analysis API Routes

use analysis_orchestrator::StrategyReport;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    pub ticker: String,
    pub indicator: String,
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/api/analyze", get(analyze_strategy))
}

async fn analyze_strategy(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ApiResponse<StrategyReport>>, AppError> {
    let ticker = query.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::bad_request("ticker is required"));
    }

    let report = state
        .orchestrator
        .analyze_strategy(&ticker, &query.indicator)
        .await?;

    Ok(Json(ApiResponse::success(report)))
}
