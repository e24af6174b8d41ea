// [apps/portal-projector/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PORTAL PROJECTOR LIBRARY (V5.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: CRISTALIZACIÓN DE ARTEFACTOS POR ROL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. GATE THEN BUILD: El portón de roles se exige antes de leer
 *    cualquier entrada; un rol ajeno jamás observa datos.
 * 2. SEALED METRICS: Cada vista cristaliza su metrics.json con el
 *    sello 'built_at' y las fuentes que la alimentaron.
 * =================================================================
 */

use anyhow::Result;
use serde_json::json;
use std::path::Path;
use tracing::{info, instrument};

use verdantis_domain_envelope::event::load_matched;
use verdantis_domain_envelope::timeline::now_stamp;
use verdantis_domain_projections::{
    audit_request_record, build_investor_view, build_public_view, build_regulator_view,
    load_asset_locations, load_bundles_index, load_causal_series, load_public_config, Principal,
};
use verdantis_infra_state::{append_audit_record, write_json_atomic};

/// Vista reguladora: violaciones abiertas + heatmap + métricas.
#[instrument(skip_all, fields(user = %principal.sub))]
pub fn run_regulator_build(
    principal: &Principal,
    deduped_path: &Path,
    assets_geojson_path: Option<&Path>,
    bundles_index_path: Option<&Path>,
    output_directory: &Path,
) -> Result<(u64, u64)> {
    let deduped_records = load_matched(deduped_path)?;
    let certified_bundles = load_bundles_index(bundles_index_path);
    let asset_locations = load_asset_locations(assets_geojson_path);

    let artifacts = build_regulator_view(
        principal,
        &deduped_records,
        certified_bundles.as_ref(),
        &asset_locations,
    )?;

    write_json_atomic(&output_directory.join("open_violations.json"), &artifacts.open_violations)?;
    write_json_atomic(&output_directory.join("heatmap.json"), &artifacts.heatmap)?;
    write_json_atomic(
        &output_directory.join("metrics.json"),
        &json!({
            "built_at": now_stamp(),
            "violations": artifacts.open_violations.len(),
            "heatmap_assets": artifacts.heatmap.len(),
            "sources": {
                "deduped_events": deduped_path.display().to_string(),
                "assets_geojson": assets_geojson_path.map(|path| path.display().to_string()),
                "bundles_index": bundles_index_path.map(|path| path.display().to_string()),
            },
        }),
    )?;

    info!(
        "🏛️ [REGULATOR_VIEW]: violations={}, heatmap_assets={} -> {}",
        artifacts.open_violations.len(),
        artifacts.heatmap.len(),
        output_directory.display()
    );
    Ok((artifacts.open_violations.len() as u64, artifacts.heatmap.len() as u64))
}

/// Encola una solicitud de paquete de auditoría en la bitácora.
#[instrument(skip_all, fields(user = %principal.sub))]
pub fn run_request_audit(
    principal: &Principal,
    asset_id: Option<&str>,
    bundle_id: Option<&str>,
    reason: Option<&str>,
    ledger_path: &Path,
) -> Result<String> {
    principal.require(verdantis_domain_projections::Role::Regulator)?;

    let record = audit_request_record(principal, asset_id, bundle_id, reason);
    let request_identifier = record["request_id"].as_str().unwrap_or_default().to_string();
    let ledger_size = append_audit_record(ledger_path, record)?;

    info!(
        "📨 [AUDIT_REQUEST]: {} queued ({} total) -> {}",
        request_identifier,
        ledger_size,
        ledger_path.display()
    );
    Ok(request_identifier)
}

/// Vista inversora: trayectoria + eslabón ROI + sentimiento de noticias.
#[instrument(skip_all, fields(user = %principal.sub))]
pub fn run_investor_build(
    principal: &Principal,
    deduped_path: &Path,
    causal_series_directory: Option<&Path>,
    news_path: Option<&Path>,
    output_directory: &Path,
) -> Result<(u64, u64, u64)> {
    let deduped_records = load_matched(deduped_path)?;
    let causal_catalog = load_causal_series(causal_series_directory);

    let artifacts = build_investor_view(principal, &deduped_records, &causal_catalog, news_path)?;

    write_json_atomic(&output_directory.join("risk_trajectory.json"), &artifacts.trajectory)?;
    write_json_atomic(&output_directory.join("esg_roi_linkage.json"), &artifacts.roi_linkage)?;
    write_json_atomic(&output_directory.join("news_sentiment.json"), &artifacts.news)?;
    write_json_atomic(
        &output_directory.join("metrics.json"),
        &json!({
            "built_at": now_stamp(),
            "assets_with_trajectory": artifacts.trajectory.len(),
            "assets_with_causal": causal_catalog.len(),
            "news_items": artifacts.news.total,
            "sources": {
                "deduped_events": deduped_path.display().to_string(),
                "causal_series_dir":
                    causal_series_directory.map(|path| path.display().to_string()),
                "news_json": news_path.map(|path| path.display().to_string()),
            },
        }),
    )?;

    info!(
        "📈 [INVESTOR_VIEW]: trajectories={}, causal_assets={}, news={} -> {}",
        artifacts.trajectory.len(),
        causal_catalog.len(),
        artifacts.news.total,
        output_directory.display()
    );
    Ok((artifacts.trajectory.len() as u64, causal_catalog.len() as u64, artifacts.news.total))
}

/// Vista pública: feed enmascarado + agregados regionales.
#[instrument(skip_all, fields(user = %principal.sub))]
pub fn run_public_build(
    principal: &Principal,
    deduped_path: &Path,
    config_path: &Path,
    output_directory: &Path,
) -> Result<(u64, u64)> {
    let config = load_public_config(config_path)?;
    let deduped_records = load_matched(deduped_path)?;

    let artifacts = build_public_view(principal, &deduped_records, &config)?;

    write_json_atomic(&output_directory.join("public_feed.json"), &artifacts.feed)?;
    write_json_atomic(&output_directory.join("public_scores.json"), &artifacts.scores)?;
    write_json_atomic(
        &output_directory.join("metrics.json"),
        &json!({
            "built_at": now_stamp(),
            "feed_items": artifacts.feed.len(),
            "regions": artifacts.scores.len(),
            "config": {
                "min_severity": config.policy.min_severity,
                "max_items": config.policy.max_items,
                "visible_fields": config.policy.visible_fields,
                "anonymize_asset_id": config.policy.anonymize_asset_id,
                "include_asset_id_field": config.policy.include_asset_id_field,
            },
            "source": deduped_path.display().to_string(),
            "policy_path": config_path.display().to_string(),
        }),
    )?;

    info!(
        "🌐 [PUBLIC_VIEW]: items={}, regions={} -> {}",
        artifacts.feed.len(),
        artifacts.scores.len(),
        output_directory.display()
    );
    Ok((artifacts.feed.len() as u64, artifacts.scores.len() as u64))
}
