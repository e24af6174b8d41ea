// [apps/alerts-engine/src/commands.rs]
/*!
 * =================================================================
 * APARATO: STAGE COMMAND RUNNERS (V5.2 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: EJECUCIÓN ARCHIVO-A-ARCHIVO DE CADA ETAPA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EXPLICIT PATHS: Cada etapa toma rutas explícitas de entrada y
 *    salida; el código de salida del binario refleja el veredicto.
 * 2. OUTPUTS BEFORE STATE: La etapa de supresión cristaliza sus
 *    salidas antes de persistir el estado; si el estado no puede
 *    escribirse la corrida falla DESPUÉS, con salidas inspeccionables.
 * =================================================================
 */

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};

use verdantis_domain_dedupe::{load_dedupe_config, DedupeSuppressor};
use verdantis_domain_envelope::event::{load_events, load_matched};
use verdantis_domain_filters::{apply_filters, load_subscriptions};
use verdantis_domain_projections::build_alerts_feed;
use verdantis_domain_routing::{load_channels_config, route_batch, AlertSink};
use verdantis_infra_state::{write_json_atomic, DedupeStateVault};
use verdantis_shared_argus::{
    collect_pipeline_metrics, ingest_attempt_results, ingest_audit_requests,
    write_metrics_textfile, MetricsSources,
};

/// Etapa de filtros: eventos + catálogo -> registros emparejados.
#[instrument(skip_all)]
pub fn run_filter_stage(
    events_path: &Path,
    subscriptions_path: &Path,
    out_path: &Path,
    metrics_path: &Path,
) -> Result<(u64, u64)> {
    let catalog = load_subscriptions(subscriptions_path)?;
    let batch = load_events(events_path)?;
    if batch.malformed_events > 0 {
        warn!("⚠️ [FILTER_STAGE]: {} malformed entries quarantined.", batch.malformed_events);
    }

    let outcome = apply_filters(&batch.events, &catalog, batch.malformed_events);
    write_json_atomic(out_path, &outcome.matched)?;
    write_json_atomic(metrics_path, &outcome.metrics)?;

    info!(
        "🔎 [FILTER_STAGE]: matched={}, unmatched={} -> {}",
        outcome.matched.len(),
        outcome.metrics.unmatched,
        out_path.display()
    );
    Ok((outcome.matched.len() as u64, outcome.metrics.unmatched))
}

/// Etapa de supresión: registros emparejados + estado durable -> flujo dedupado.
#[instrument(skip_all)]
pub fn run_dedupe_stage(
    matched_path: &Path,
    config_path: &Path,
    out_path: &Path,
    metrics_path: &Path,
    state_path: &Path,
) -> Result<(u64, u64)> {
    let config = load_dedupe_config(config_path)?;
    let matched_records = load_matched(matched_path)?;

    let vault = DedupeStateVault::new(state_path);
    let mut suppressor = DedupeSuppressor::new(config, vault.load());
    let outcome = suppressor.process_batch(&matched_records);

    // Salidas primero, estado después (compromiso documentado).
    write_json_atomic(out_path, &outcome.kept)?;
    write_json_atomic(metrics_path, &outcome.metrics)?;
    vault.persist(&suppressor.into_state())?;

    info!(
        "🧹 [DEDUPE_STAGE]: kept={}, suppressed={} (state: {})",
        outcome.metrics.kept,
        outcome.metrics.suppressed,
        state_path.display()
    );
    Ok((outcome.metrics.kept, outcome.metrics.suppressed))
}

/// Etapa de enrutamiento: flujo dedupado + rutas -> outbox + rastro.
#[instrument(skip_all)]
pub async fn run_route_stage(
    matched_path: &Path,
    config_path: &Path,
    results_path: &Path,
    metrics_path: &Path,
    sink_deadline: Duration,
) -> Result<(u64, u64)> {
    let (routes, global_limits) = load_channels_config(config_path)?;
    let matched_records = load_matched(matched_path)?;

    let outcome = route_batch(
        &matched_records,
        &routes,
        &global_limits,
        &AlertSink::transport(),
        sink_deadline,
    )
    .await;

    write_json_atomic(results_path, &outcome.attempts)?;
    write_json_atomic(metrics_path, &outcome.metrics)?;

    info!(
        "🛰️ [ROUTE_STAGE]: sent={}, skipped={} -> {}",
        outcome.metrics.sent,
        outcome.metrics.skipped,
        results_path.display()
    );
    Ok((outcome.metrics.sent, outcome.metrics.skipped))
}

/// Etapa de feed: flujo dedupado -> tarjetas para el gemelo digital.
#[instrument(skip_all)]
pub fn run_feed_stage(
    deduped_path: &Path,
    out_path: &Path,
    metrics_path: &Path,
    item_limit: usize,
) -> Result<u64> {
    let deduped_records = load_matched(deduped_path)?;
    let (items, metrics) = build_alerts_feed(&deduped_records, item_limit);

    write_json_atomic(out_path, &items)?;
    write_json_atomic(metrics_path, &metrics)?;

    info!("🗞️ [FEED_STAGE]: {} items -> {}", metrics.count, out_path.display());
    Ok(metrics.count)
}

/// Recolección final: métricas de etapa -> textfile Prometheus
/// (+ ingesta opcional hacia la bitácora diaria).
#[instrument(skip_all)]
pub fn run_export_metrics(
    sources: &MetricsSources,
    textfile_path: &Path,
    journal_directory: Option<&Path>,
    attempt_results_path: Option<&Path>,
    audit_ledger_path: Option<&Path>,
) -> Result<()> {
    let series = collect_pipeline_metrics(sources);
    write_metrics_textfile(textfile_path, &series)?;
    info!("📊 [EXPORT_METRICS]: {} series -> {}", series.len(), textfile_path.display());

    if let Some(journal_directory) = journal_directory {
        if let Some(results_path) = attempt_results_path {
            let ingested = ingest_attempt_results(results_path, journal_directory)?;
            info!("📜 [JOURNAL]: {} channel attempts ingested.", ingested);
        }
        if let Some(ledger_path) = audit_ledger_path {
            let ingested = ingest_audit_requests(ledger_path, journal_directory)?;
            info!("📜 [JOURNAL]: {} audit requests ingested.", ingested);
        }
    }
    Ok(())
}
