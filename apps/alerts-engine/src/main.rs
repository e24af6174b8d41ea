// [apps/alerts-engine/src/main.rs]
/**
 * =================================================================
 * APARATO: ALERTS ENGINE SHELL (V6.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ARGUMENTOS Y DISPARO DE ETAPAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LIBRARY SYNERGY: El binario es un orquestador puro y ligero;
 *    consume la lógica desde 'verdantis_alerts_engine'.
 * 2. EXPLICIT CONTRACTS: Cada subcomando declara rutas explícitas de
 *    entrada/salida; 0 en éxito, distinto de 0 en fallo de validación.
 * 3. TRACING INITIALIZATION: Argus nivela el sumidero de telemetría y
 *    el escudo de pánicos antes de tocar cualquier archivo.
 * =================================================================
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use verdantis_alerts_engine::pipeline::{execute_streaming_run, StreamingRunConfig};
use verdantis_alerts_engine::{
    run_dedupe_stage, run_export_metrics, run_feed_stage, run_filter_stage, run_route_stage,
};
use verdantis_shared_argus::{init_tracing, serve_metrics_endpoint, MetricsSources};

/// Configuración de mando del motor de alertas.
#[derive(Parser, Debug)]
#[command(
    name = "alerts-engine",
    version = "6.0",
    about = "Motor de alertas Verdantis: filtros, supresión, enrutamiento y feed."
)]
struct CommandArguments {
    #[command(subcommand)]
    directive: EngineDirective,
}

#[derive(Subcommand, Debug)]
enum EngineDirective {
    /// Aplica el catálogo de suscripciones sobre los eventos del productor.
    Filter {
        #[arg(long, value_name = "FILE_PATH")]
        events: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        subscriptions: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/filtered_events.json")]
        out: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/filters_metrics.json")]
        metrics: PathBuf,
    },

    /// Suprime duplicados y oscilaciones con estado durable entre corridas.
    Dedupe {
        #[arg(long, default_value = "data/processed/alerts/filtered_events.json")]
        matched: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        config: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        out: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/dedupe_metrics.json")]
        metrics: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/state/dedupe_state.json")]
        state: PathBuf,
    },

    /// Enruta el flujo dedupado hacia los canales configurados.
    Route {
        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        matched: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        config: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/channels_results.json")]
        results: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/channels_metrics.json")]
        metrics: PathBuf,

        /// Plazo máximo por llamada al sumidero, en segundos.
        #[arg(long, default_value_t = 10)]
        sink_deadline_seconds: u64,
    },

    /// Aplana el flujo dedupado al feed del gemelo digital.
    Feed {
        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        deduped: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/ui/alerts_feed.json")]
        out: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/ui/feed_metrics.json")]
        metrics: PathBuf,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Corrida streaming completa con cancelación cooperativa (Ctrl-C).
    Run {
        #[arg(long, value_name = "FILE_PATH")]
        events: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        subscriptions: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        dedupe_config: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        channels_config: PathBuf,

        #[arg(long, default_value = "data/processed/alerts/state/dedupe_state.json")]
        state: PathBuf,

        #[arg(long, alias = "out", default_value = "data/processed/alerts")]
        out_dir: PathBuf,

        #[arg(long, default_value_t = 10)]
        sink_deadline_seconds: u64,

        #[arg(long, default_value_t = 100)]
        feed_limit: usize,
    },

    /// Recolecta métricas de etapa al textfile Prometheus (+ ingesta opcional).
    ExportMetrics {
        #[arg(long)]
        filters_metrics: Option<PathBuf>,

        #[arg(long)]
        dedupe_metrics: Option<PathBuf>,

        #[arg(long)]
        channels_metrics: Option<PathBuf>,

        #[arg(long)]
        feed_metrics: Option<PathBuf>,

        #[arg(long)]
        regulator_metrics: Option<PathBuf>,

        #[arg(long)]
        investor_metrics: Option<PathBuf>,

        #[arg(long)]
        public_metrics: Option<PathBuf>,

        #[arg(long, default_value = "data/processed/obs/metrics.prom")]
        out: PathBuf,

        /// Directorio de la bitácora JSON diaria (activa la ingesta).
        #[arg(long)]
        journal_dir: Option<PathBuf>,

        #[arg(long, requires = "journal_dir")]
        ingest_results: Option<PathBuf>,

        #[arg(long, requires = "journal_dir")]
        ingest_audit_log: Option<PathBuf>,
    },

    /// Sirve el textfile de métricas por HTTP (/metrics, /healthz).
    ServeMetrics {
        #[arg(long, default_value = "data/processed/obs/metrics.prom")]
        metrics_file: PathBuf,

        #[arg(long, default_value_t = 9109)]
        port: u16,
    },
}

/**
 * Punto de ignición del binario ejecutable.
 */
#[tokio::main]
async fn main() -> Result<()> {
    // 1. NIVELACIÓN DEL ENTORNO Y DEL SISTEMA NERVIOSO
    dotenvy::dotenv().ok();
    init_tracing("alerts-engine");

    // 2. PARSEO DE DIRECTIVAS DE MANDO
    let cli_configuration = CommandArguments::parse();

    // 3. DESPACHO DE LA ETAPA SOLICITADA
    match cli_configuration.directive {
        EngineDirective::Filter { events, subscriptions, out, metrics } => {
            let (matched, unmatched) = run_filter_stage(&events, &subscriptions, &out, &metrics)?;
            info!("✅ [SHELL]: filter complete (matched={matched}, unmatched={unmatched}).");
        }
        EngineDirective::Dedupe { matched, config, out, metrics, state } => {
            let (kept, suppressed) = run_dedupe_stage(&matched, &config, &out, &metrics, &state)?;
            info!("✅ [SHELL]: dedupe complete (kept={kept}, suppressed={suppressed}).");
        }
        EngineDirective::Route { matched, config, results, metrics, sink_deadline_seconds } => {
            let (sent, skipped) = run_route_stage(
                &matched,
                &config,
                &results,
                &metrics,
                Duration::from_secs(sink_deadline_seconds),
            )
            .await?;
            info!("✅ [SHELL]: route complete (sent={sent}, skipped={skipped}).");
        }
        EngineDirective::Feed { deduped, out, metrics, limit } => {
            let item_count = run_feed_stage(&deduped, &out, &metrics, limit)?;
            info!("✅ [SHELL]: feed complete ({item_count} items).");
        }
        EngineDirective::Run {
            events,
            subscriptions,
            dedupe_config,
            channels_config,
            state,
            out_dir,
            sink_deadline_seconds,
            feed_limit,
        } => {
            // Cancelación cooperativa: Ctrl-C detiene nuevos despachos y
            // cristaliza el estado antes de salir.
            let cancellation = CancellationToken::new();
            let signal_cancellation = cancellation.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal_cancellation.cancel();
                }
            });

            let summary = execute_streaming_run(
                StreamingRunConfig {
                    events_path: events,
                    subscriptions_path: subscriptions,
                    dedupe_config_path: dedupe_config,
                    channels_config_path: channels_config,
                    state_path: state,
                    output_directory: out_dir,
                    sink_deadline: Duration::from_secs(sink_deadline_seconds),
                    feed_limit,
                },
                cancellation,
            )
            .await?;
            info!(
                "✅ [SHELL]: run complete (matched={}, kept={}, sent={}, cancelled={}).",
                summary.matched, summary.kept, summary.sent, summary.cancelled
            );
        }
        EngineDirective::ExportMetrics {
            filters_metrics,
            dedupe_metrics,
            channels_metrics,
            feed_metrics,
            regulator_metrics,
            investor_metrics,
            public_metrics,
            out,
            journal_dir,
            ingest_results,
            ingest_audit_log,
        } => {
            let sources = MetricsSources {
                filters_metrics,
                dedupe_metrics,
                channels_metrics,
                feed_metrics,
                regulator_metrics,
                investor_metrics,
                public_metrics,
            };
            run_export_metrics(
                &sources,
                &out,
                journal_dir.as_deref(),
                ingest_results.as_deref(),
                ingest_audit_log.as_deref(),
            )?;
            info!("✅ [SHELL]: metrics exported to {}.", out.display());
        }
        EngineDirective::ServeMetrics { metrics_file, port } => {
            serve_metrics_endpoint(metrics_file, port).await?;
        }
    }

    Ok(())
}
