use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    engine::LinkAnalyzer,
    error::{validation_error, AppError},
    types::{AnalyzeRequest, AnalyzeResponse, BatchAnalyzeRequest, BatchAnalyzeResponse, LinkContext},
};

pub struct AppContext {
    pub analyzer: LinkAnalyzer,
    pub max_batch_size: usize,
}

pub type AppState = Arc<AppContext>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let link = LinkContext::from(payload);
    Ok(Json(analyze_one(&state.analyzer, &link).await))
}

pub async fn analyze_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    if payload.links.len() > state.max_batch_size {
        return Err(validation_error(&format!(
            "batch of {} links exceeds the limit of {}",
            payload.links.len(),
            state.max_batch_size
        )));
    }

    let links: Vec<LinkContext> = payload.links.into_iter().map(LinkContext::from).collect();
    let results =
        futures::future::join_all(links.iter().map(|link| analyze_one(&state.analyzer, link))).await;

    info!("Analyzed batch of {} links", results.len());
    Ok(Json(BatchAnalyzeResponse { results }))
}

pub async fn health_check() -> Result<Json<Value>, AppError> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "linkguard-engine"
    })))
}

async fn analyze_one(analyzer: &LinkAnalyzer, link: &LinkContext) -> AnalyzeResponse {
    let start = Instant::now();
    let verdict = analyzer.analyze(link).await;
    let latency = start.elapsed().as_secs_f64() * 1000.0;

    metrics::counter!("links_analyzed_total", "reason" => verdict.reason().as_str()).increment(1);
    if verdict.is_suspicious() {
        metrics::counter!("links_suspicious_total").increment(1);
    }
    metrics::histogram!("analyze_duration_ms").record(latency);

    AnalyzeResponse::new(verdict, latency)
}
