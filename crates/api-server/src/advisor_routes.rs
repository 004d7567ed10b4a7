//! Stock Advisor and Chat API Routes

use analysis_orchestrator::AdvisorReport;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct AdvisorQuery {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub fn advisor_routes() -> Router<AppState> {
    Router::new()
        .route("/api/advisor", get(advise))
        .route("/api/chat", post(chat))
}

async fn advise(
    State(state): State<AppState>,
    Query(query): Query<AdvisorQuery>,
) -> Result<Json<ApiResponse<AdvisorReport>>, AppError> {
    let report = state.orchestrator.advise(&query.name).await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let reply = state.orchestrator.chat(&request.prompt).await?;
    Ok(Json(ApiResponse::success(ChatReply { reply })))
}
