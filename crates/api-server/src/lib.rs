use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use analysis_core::{AnalysisError, FetchFailure, ModelFailure, SeriesWindow, StockCatalog};
use analysis_orchestrator::AnalysisOrchestrator;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use llm_client::{LlmClient, LlmConfig};
use news_scraper::NewsScraper;
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use yahoo_client::YahooFinanceClient;

pub mod config;
mod request_id;

mod advisor_routes;
mod analysis_routes;
mod catalog_routes;
mod news_routes;
mod statement_routes;


pub use config::AppConfig;
pub use request_id::{propagate_request_id, request_span, set_request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

/// JSON envelope returned by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(e: &AnalysisError) -> StatusCode {
    match e {
        AnalysisError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::InvalidData(_) => StatusCode::BAD_REQUEST,
        AnalysisError::UnknownIndicator(_) | AnalysisError::UnknownTicker(_) => {
            StatusCode::NOT_FOUND
        }
        AnalysisError::DataUnavailable { kind, .. } => match kind {
            FetchFailure::Timeout => StatusCode::GATEWAY_TIMEOUT,
            FetchFailure::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        },
        AnalysisError::LanguageModel { kind, .. } => match kind {
            ModelFailure::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        Self::with_status(status_for(&e), e.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::debug!("Request rejected ({}): {:#}", self.status, self.error);
        }

        let body = ApiResponse::<()>::error(self.error.to_string());
        (self.status, Json(body)).into_response()
    }
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(catalog_routes::catalog_routes())
        .merge(analysis_routes::analysis_routes())
        .merge(statement_routes::statement_routes())
        .merge(news_routes::news_routes())
        .merge(advisor_routes::advisor_routes())
        .layer(propagate_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(set_request_id())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Production collaborators wired from configuration.
pub fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let catalog = StockCatalog::load(config.stock_catalog_path.as_deref())?;
    let http_timeout = Duration::from_secs(config.http_timeout_secs);

    let market_data = YahooFinanceClient::with_timeout(http_timeout);
    let news = NewsScraper::new(config.news_search_url.clone(), http_timeout);
    let language_model = LlmClient::new(LlmConfig {
        api_key: config.openai_api_key.clone(),
        model: config.openai_model.clone(),
        base_url: config.openai_base_url.clone(),
        timeout: Duration::from_secs(config.llm_timeout_secs),
        ..LlmConfig::default()
    });

    if !language_model.has_api_key() {
        tracing::warn!("OPENAI_API_KEY not set; advisor descriptions and chat will fail");
    }

    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(market_data),
        Arc::new(news),
        Arc::new(language_model),
    )
    .with_catalog(catalog)
    .with_analysis_window(SeriesWindow::new(
        config.analysis_period.clone(),
        config.analysis_interval.clone(),
    ));

    Ok(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting Money Mate API server");
    tracing::info!(
        "  Analysis window: {}/{}",
        config.analysis_period,
        config.analysis_interval
    );
    tracing::info!("  Language model: {}", config.openai_model);

    let state = build_state(&config)?;
    let app = build_router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
