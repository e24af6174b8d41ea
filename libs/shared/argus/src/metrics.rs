// [libs/shared/argus/src/metrics.rs]
/*!
 * =================================================================
 * APARATO: PROMETHEUS TEXTFILE RENDERER (V2.2 - SOBERANO)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: AGREGACIÓN DE MÉTRICAS DE ETAPA Y EXPOSICIÓN PLANA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FLAT SERIES: Una serie numérica por línea con su par HELP/TYPE;
 *    el marcador 'verdantis_build_info 1' encabeza para los scrapers.
 * 2. FORGIVING SOURCES: Toda fuente es opcional; ausente o ilegible
 *    contribuye cero, jamás aborta la recolección.
 * =================================================================
 */

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ArgusError;

/// Fuentes de métricas por etapa (todas opcionales).
#[derive(Debug, Clone, Default)]
pub struct MetricsSources {
    pub filters_metrics: Option<PathBuf>,
    pub dedupe_metrics: Option<PathBuf>,
    pub channels_metrics: Option<PathBuf>,
    pub feed_metrics: Option<PathBuf>,
    pub regulator_metrics: Option<PathBuf>,
    pub investor_metrics: Option<PathBuf>,
    pub public_metrics: Option<PathBuf>,
}

/// Recolecta el mapa plano `nombre -> valor` de la corrida.
pub fn collect_pipeline_metrics(sources: &MetricsSources) -> BTreeMap<String, f64> {
    let mut series: BTreeMap<String, f64> = BTreeMap::new();

    let filters = read_if_present(sources.filters_metrics.as_deref());
    series.insert("verdantis_events_total".into(), numeric(&filters, "total_events"));
    series.insert("verdantis_events_unmatched".into(), numeric(&filters, "unmatched"));
    series.insert("verdantis_events_malformed".into(), numeric(&filters, "malformed_events"));

    let dedupe = read_if_present(sources.dedupe_metrics.as_deref());
    series.insert("verdantis_dedupe_kept".into(), numeric(&dedupe, "kept"));
    series.insert("verdantis_dedupe_suppressed".into(), numeric(&dedupe, "suppressed"));

    let channels = read_if_present(sources.channels_metrics.as_deref());
    series.insert("verdantis_channels_sent".into(), numeric(&channels, "sent"));
    series.insert("verdantis_channels_skipped".into(), numeric(&channels, "skipped"));

    let feed = read_if_present(sources.feed_metrics.as_deref());
    series.insert("verdantis_feed_items".into(), numeric(&feed, "count"));

    let regulator = read_if_present(sources.regulator_metrics.as_deref());
    series.insert("verdantis_reg_violations".into(), numeric(&regulator, "violations"));
    series.insert("verdantis_reg_heatmap_assets".into(), numeric(&regulator, "heatmap_assets"));

    let investor = read_if_present(sources.investor_metrics.as_deref());
    series.insert(
        "verdantis_inv_assets_with_trajectory".into(),
        numeric(&investor, "assets_with_trajectory"),
    );
    series.insert(
        "verdantis_inv_assets_with_causal".into(),
        numeric(&investor, "assets_with_causal"),
    );
    series.insert("verdantis_inv_news_items".into(), numeric(&investor, "news_items"));

    let public = read_if_present(sources.public_metrics.as_deref());
    series.insert("verdantis_public_items".into(), numeric(&public, "feed_items"));
    series.insert("verdantis_public_regions".into(), numeric(&public, "regions"));

    series.insert("verdantis_build_info".into(), 1.0);
    series
}

/// Renderiza el formato de exposición de texto Prometheus.
pub fn render_prometheus_text(series: &BTreeMap<String, f64>) -> String {
    let mut lines: Vec<String> = vec![
        "# HELP verdantis_build_info Build info marker.".into(),
        "# TYPE verdantis_build_info gauge".into(),
        "verdantis_build_info 1".into(),
    ];

    for (name, value) in series {
        if name == "verdantis_build_info" {
            // ya emitido como marcador de cabecera
            continue;
        }
        if let Some(help_text) = help_for(name) {
            lines.push(format!("# HELP {name} {help_text}"));
            lines.push(format!("# TYPE {name} gauge"));
        }
        lines.push(format!("{name} {value:.6}"));
    }

    lines.push(format!(
        "# scraped_at {}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
    ));
    lines.join("\n") + "\n"
}

/// Cristaliza el textfile de métricas.
pub fn write_metrics_textfile(
    destination_path: &Path,
    series: &BTreeMap<String, f64>,
) -> Result<(), ArgusError> {
    if let Some(parent_directory) = destination_path.parent() {
        fs::create_dir_all(parent_directory)?;
    }
    fs::write(destination_path, render_prometheus_text(series))?;
    Ok(())
}

fn help_for(series_name: &str) -> Option<&'static str> {
    match series_name {
        "verdantis_events_total" => Some("Total input events (filter stage)."),
        "verdantis_events_unmatched" => Some("Events not matched by any subscription."),
        "verdantis_events_malformed" => Some("Malformed producer entries dropped at ingestion."),
        "verdantis_dedupe_kept" => Some("Events kept after dedupe/flap suppression."),
        "verdantis_dedupe_suppressed" => Some("Events suppressed by dedupe/flap."),
        "verdantis_channels_sent" => Some("Channel deliveries this run."),
        "verdantis_channels_skipped" => Some("Channel attempts skipped this run."),
        "verdantis_feed_items" => Some("Alerts feed items."),
        "verdantis_reg_violations" => Some("Open violations (regulator view)."),
        "verdantis_reg_heatmap_assets" => Some("Assets on the regulator heatmap."),
        "verdantis_inv_assets_with_trajectory" => Some("Investor assets with a risk series."),
        "verdantis_inv_assets_with_causal" => Some("Investor assets with causal series."),
        "verdantis_inv_news_items" => Some("Investor news item count."),
        "verdantis_public_items" => Some("Public feed items."),
        "verdantis_public_regions" => Some("Regions covered in the public feed."),
        _ => None,
    }
}

fn read_if_present(metrics_path: Option<&Path>) -> Option<Value> {
    let metrics_path = metrics_path?;
    let raw_document = fs::read_to_string(metrics_path).ok()?;
    serde_json::from_str(&raw_document).ok()
}

fn numeric(document: &Option<Value>, field_name: &str) -> f64 {
    document
        .as_ref()
        .and_then(|value| value.get(field_name))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
