//! Catalog API Routes
//!
//! Selectable tickers, indicators and statement kinds.

use analysis_core::StatementKind;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use technical_analysis::Indicator;

use crate::{ApiResponse, AppError, AppState};

#[derive(Serialize)]
pub struct IndicatorInfo {
    pub name: &'static str,
    pub ratio: f64,
    pub risk_reward: &'static str,
    pub min_bars: usize,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct StatementInfo {
    pub kind: StatementKind,
    pub label: &'static str,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tickers", get(list_tickers))
        .route("/api/indicators", get(list_indicators))
        .route("/api/statements", get(list_statement_kinds))
}

async fn list_tickers(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(
        state.orchestrator.catalog().tickers.clone(),
    ))
}

async fn list_indicators(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IndicatorInfo>>>, AppError> {
    let table = state.orchestrator.risk_table();
    let indicators = Indicator::ALL
        .into_iter()
        .map(|indicator| {
            Ok(IndicatorInfo {
                name: indicator.name(),
                ratio: table.ratio_for(indicator)?,
                risk_reward: indicator.risk_reward_label(),
                min_bars: indicator.min_bars(),
                description: indicator.description(),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(ApiResponse::success(indicators)))
}

async fn list_statement_kinds() -> Json<ApiResponse<Vec<StatementInfo>>> {
    let kinds = StatementKind::ALL
        .into_iter()
        .map(|kind| StatementInfo {
            kind,
            label: kind.to_label(),
        })
        .collect();

    Json(ApiResponse::success(kinds))
}
