// [apps/alerts-engine/src/pipeline.rs]
/*!
 * =================================================================
 * APARATO: STREAMING RUN ORCHESTRATOR (V6.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: CORRIDA ENCADENADA CON CANALES ACOTADOS Y CANCELACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ONE TASK PER STAGE: Alimentador -> supresor -> enrutador, unidos
 *    por canales mpsc acotados; la contrapresión es implícita porque
 *    los lectores tiran.
 * 2. SINGLE WRITER: La tarea de supresión es la única dueña del mapa
 *    de claves; veredicto y mutación quedan linealizados por registro.
 * 3. COOPERATIVE CANCELLATION: La señal detiene nuevos despachos,
 *    cristaliza el estado de supresión y escribe métricas best-effort;
 *    los nombres idempotentes del outbox hacen segura la re-corrida.
 * =================================================================
 */

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use verdantis_domain_dedupe::{load_dedupe_config, DedupeSuppressor};
use verdantis_domain_envelope::event::load_events;
use verdantis_domain_envelope::MatchedRecord;
use verdantis_domain_filters::{apply_filters, load_subscriptions};
use verdantis_domain_projections::build_alerts_feed;
use verdantis_domain_routing::{load_channels_config, AlertSink, AttemptRecord, RouteDispatcher};
use verdantis_infra_state::{write_json_atomic, DedupeStateVault};
use verdantis_shared_argus::{collect_pipeline_metrics, write_metrics_textfile, MetricsSources};

/// Profundidad de los canales entre etapas.
const STAGE_CHANNEL_DEPTH: usize = 256;

/// Configuración de la corrida streaming.
#[derive(Debug, Clone)]
pub struct StreamingRunConfig {
    pub events_path: PathBuf,
    pub subscriptions_path: PathBuf,
    pub dedupe_config_path: PathBuf,
    pub channels_config_path: PathBuf,
    pub state_path: PathBuf,
    pub output_directory: PathBuf,
    pub sink_deadline: Duration,
    pub feed_limit: usize,
}

/// Resumen operacional de la corrida.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StreamingRunSummary {
    pub matched: u64,
    pub kept: u64,
    pub suppressed: u64,
    pub sent: u64,
    pub skipped: u64,
    pub cancelled: bool,
}

/// Ejecuta la corrida completa: filtros -> supresión -> enrutamiento,
/// más feed, estado durable y textfile de métricas.
#[instrument(skip_all, fields(events = %run_config.events_path.display()))]
pub async fn execute_streaming_run(
    run_config: StreamingRunConfig,
    cancellation: CancellationToken,
) -> Result<StreamingRunSummary> {
    // 1. FASE DE CARGA: toda la configuración valida antes de mutar nada.
    let catalog = load_subscriptions(&run_config.subscriptions_path)?;
    let dedupe_config = load_dedupe_config(&run_config.dedupe_config_path)?;
    let (routes, global_limits) = load_channels_config(&run_config.channels_config_path)?;

    let batch = load_events(&run_config.events_path)?;
    if batch.malformed_events > 0 {
        warn!("⚠️ [RUN]: {} malformed entries quarantined.", batch.malformed_events);
    }

    let out_dir = run_config.output_directory.clone();
    let state_path = run_config.state_path.clone();
    let sink_deadline = run_config.sink_deadline;

    // 2. ETAPA DE FILTROS (vergonzosamente paralela, lote en memoria).
    let filter_outcome = apply_filters(&batch.events, &catalog, batch.malformed_events);
    write_json_atomic(&out_dir.join("filtered_events.json"), &filter_outcome.matched)?;
    write_json_atomic(&out_dir.join("filters_metrics.json"), &filter_outcome.metrics)?;
    let matched_total = filter_outcome.matched.len() as u64;

    // 3. CADENA DE TAREAS: alimentador -> supresor -> enrutador.
    let (matched_sender, mut matched_receiver) =
        mpsc::channel::<MatchedRecord>(STAGE_CHANNEL_DEPTH);
    let (kept_sender, mut kept_receiver) = mpsc::channel::<MatchedRecord>(STAGE_CHANNEL_DEPTH);

    let feeder_cancellation = cancellation.clone();
    let feeder_task = tokio::spawn(async move {
        for record in filter_outcome.matched {
            tokio::select! {
                _ = feeder_cancellation.cancelled() => break,
                permit = matched_sender.send(record) => {
                    if permit.is_err() {
                        break;
                    }
                }
            }
        }
        // El cierre del canal señala el fin del lote aguas abajo.
    });

    let vault = DedupeStateVault::new(&state_path);
    let prior_state = vault.load();
    let dedupe_cancellation = cancellation.clone();
    let dedupe_task = tokio::spawn(async move {
        let mut suppressor = DedupeSuppressor::new(dedupe_config, prior_state);
        let mut kept_records: Vec<MatchedRecord> = Vec::new();
        let mut suppressed = 0u64;

        loop {
            let next_record = tokio::select! {
                _ = dedupe_cancellation.cancelled() => None,
                received = matched_receiver.recv() => received,
            };
            let Some(record) = next_record else {
                break;
            };

            if suppressor.assess(&record).is_none() {
                kept_records.push(record.clone());
                if kept_sender.send(record).await.is_err() {
                    break;
                }
            } else {
                suppressed += 1;
            }
        }

        (kept_records, suppressed, suppressor.into_state())
    });

    let router_cancellation = cancellation.clone();
    let router_task = tokio::spawn(async move {
        let mut dispatcher =
            RouteDispatcher::new(routes, global_limits, AlertSink::transport(), sink_deadline);
        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut position_in_stream = 0usize;

        loop {
            let next_record = tokio::select! {
                _ = router_cancellation.cancelled() => None,
                received = kept_receiver.recv() => received,
            };
            let Some(record) = next_record else {
                break;
            };
            attempts.extend(dispatcher.dispatch_record(&record, position_in_stream).await);
            position_in_stream += 1;
        }

        (attempts, dispatcher.finish())
    });

    feeder_task.await.context("feeder task collapsed")?;
    let (kept_records, suppressed, final_state) =
        dedupe_task.await.context("dedupe task collapsed")?;
    let (attempts, routing_metrics) = router_task.await.context("router task collapsed")?;
    let was_cancelled = cancellation.is_cancelled();

    // 4. CRISTALIZACIÓN: salidas primero, estado después.
    write_json_atomic(&out_dir.join("filtered_events_deduped.json"), &kept_records)?;
    write_json_atomic(
        &out_dir.join("dedupe_metrics.json"),
        &serde_json::json!({
            "input": matched_total,
            "kept": kept_records.len() as u64,
            "suppressed": suppressed,
            "state_path": state_path.display().to_string(),
        }),
    )?;
    write_json_atomic(&out_dir.join("channels_results.json"), &attempts)?;
    write_json_atomic(&out_dir.join("channels_metrics.json"), &routing_metrics)?;

    let (feed_items, feed_metrics) = build_alerts_feed(&kept_records, run_config.feed_limit);
    write_json_atomic(&out_dir.join("alerts_feed.json"), &feed_items)?;
    write_json_atomic(&out_dir.join("feed_metrics.json"), &feed_metrics)?;

    vault.persist(&final_state)?;

    // 5. MÉTRICAS BEST-EFFORT: un fallo aquí no anula la corrida.
    let sources = MetricsSources {
        filters_metrics: Some(out_dir.join("filters_metrics.json")),
        dedupe_metrics: Some(out_dir.join("dedupe_metrics.json")),
        channels_metrics: Some(out_dir.join("channels_metrics.json")),
        feed_metrics: Some(out_dir.join("feed_metrics.json")),
        ..MetricsSources::default()
    };
    if let Err(metrics_fault) =
        write_metrics_textfile(&out_dir.join("metrics.prom"), &collect_pipeline_metrics(&sources))
    {
        warn!("⚠️ [RUN]: metrics textfile skipped ({metrics_fault}).");
    }

    let summary = StreamingRunSummary {
        matched: matched_total,
        kept: kept_records.len() as u64,
        suppressed,
        sent: routing_metrics.sent,
        skipped: routing_metrics.skipped,
        cancelled: was_cancelled,
    };
    if was_cancelled {
        warn!("🛑 [RUN]: cancelled cooperatively; state flushed, outbox is rerun-safe.");
    }
    info!(
        "🏁 [RUN]: matched={}, kept={}, sent={}, skipped={}.",
        summary.matched, summary.kept, summary.sent, summary.skipped
    );
    Ok(summary)
}
