//! Stock News API Routes

use analysis_core::Headline;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{ApiResponse, AppError, AppState};

pub fn news_routes() -> Router<AppState> {
    Router::new().route("/api/news/:ticker", get(get_news))
}

async fn get_news(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<Vec<Headline>>>, AppError> {
    let headlines = state
        .orchestrator
        .news(&ticker.trim().to_uppercase())
        .await?;

    Ok(Json(ApiResponse::success(headlines)))
}
