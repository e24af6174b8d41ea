// [libs/shared/argus/src/exporter.rs]
/*!
 * =================================================================
 * APARATO: MINIMAL METRICS EXPORTER (V2.0 - SOBERANO)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4 - OBSERVABILITY BOUNDARY)
 * RESPONSABILIDAD: SERVIR EL TEXTFILE DE MÉTRICAS POR HTTP
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. READ-ONLY SURFACE: Dos rutas exactas (/metrics y /healthz); el
 *    exportador jamás muta estado del pipeline.
 * 2. LIVE FILE: El textfile se relee en cada scrape; un archivo ausente
 *    responde un comentario neutro, nunca un 500.
 * =================================================================
 */

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::errors::ArgusError;

#[derive(Debug, Clone)]
struct ExporterState {
    metrics_file_path: Arc<PathBuf>,
}

/// Sirve el textfile en `0.0.0.0:<port>` hasta la cancelación del proceso.
pub async fn serve_metrics_endpoint(
    metrics_file_path: PathBuf,
    port: u16,
) -> Result<(), ArgusError> {
    let shared_state = ExporterState { metrics_file_path: Arc::new(metrics_file_path) };
    let surface = Router::new()
        .route("/metrics", get(scrape_metrics))
        .route("/healthz", get(health_probe))
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("📡 [ARGUS_EXPORTER]: /metrics surface online at 0.0.0.0:{port}.");
    axum::serve(listener, surface).await?;
    Ok(())
}

async fn scrape_metrics(State(state): State<ExporterState>) -> impl IntoResponse {
    let exposition_text = tokio::fs::read_to_string(state.metrics_file_path.as_ref())
        .await
        .unwrap_or_else(|_| "# no metrics\n".to_string());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        exposition_text,
    )
}

async fn health_probe() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
