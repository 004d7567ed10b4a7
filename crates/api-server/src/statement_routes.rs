//! Financial Statement API Routes

use analysis_core::{FinancialStatement, StatementKind};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct StatementQuery {
    #[serde(default)]
    pub kind: Option<String>,
}

pub fn statement_routes() -> Router<AppState> {
    Router::new().route("/api/statements/:ticker", get(get_statement))
}

/// Defaults to the balance sheet when no kind is given.
async fn get_statement(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<ApiResponse<FinancialStatement>>, AppError> {
    let kind = match query.kind.as_deref() {
        Some(raw) => raw.parse::<StatementKind>()?,
        None => StatementKind::BalanceSheet,
    };

    let statement = state
        .orchestrator
        .financial_statement(&ticker.trim().to_uppercase(), kind)
        .await?;

    Ok(Json(ApiResponse::success(statement)))
}
