// [libs/domain/projections/src/regulator.rs]
/*!
 * =================================================================
 * APARATO: REGULATOR VIEW BUILDERS (V4.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: VIOLACIONES ABIERTAS, HEATMAP Y SOLICITUDES DE AUDITORÍA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. OPEN VIOLATION DOCTRINE: topic 'policy.enforcement' + severidad
 *    >= medium + no reconocida. Nada más califica.
 * 2. BUNDLE VALIDATION: 'bundle_id' sólo sobrevive si el índice de
 *    bundles opcional lo certifica; con índice ausente viaja tal cual.
 * 3. DETERMINISTIC RANKING: El heatmap ordena por (risk_score,
 *    open_count) descendente; el desempate es parte del contrato.
 * =================================================================
 */

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

use verdantis_domain_envelope::severity::SeverityFloor;
use verdantis_domain_envelope::timeline::{instant_or_now, now_stamp};
use verdantis_domain_envelope::{severity_at_least, severity_weight, AlertEvent, MatchedRecord};

use crate::enrichment::GeoPoint;
use crate::feed::render_alert_title;
use crate::principal::Principal;

/// Violación abierta lista para el portal regulador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenViolation {
    pub id: String,
    pub ts: String,
    pub title: String,
    pub severity: Option<String>,
    pub asset_id: Option<String>,
    pub aoi_id: Option<String>,
    pub rule_type: Option<String>,
    pub topic: Option<String>,
    pub payload: Map<String, Value>,
    pub bundle_id: Option<String>,
}

/// Celda agregada del heatmap por activo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub asset_id: String,
    pub risk_score: u64,
    pub open_count: u64,
    pub last_ts: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Doctrina de violación abierta (ver banner).
fn is_open_violation(event: &AlertEvent) -> bool {
    if event.topic.as_deref() != Some("policy.enforcement") {
        return false;
    }
    if !severity_at_least(event.severity_label(), SeverityFloor::Medium) {
        return false;
    }
    !event.acknowledged.unwrap_or(false)
}

/// Construye las violaciones abiertas, más nuevas primero.
pub fn build_open_violations(
    deduped_records: &[MatchedRecord],
    certified_bundles: Option<&BTreeSet<String>>,
) -> Vec<OpenViolation> {
    let mut violations: Vec<OpenViolation> = Vec::new();

    for (position, record) in deduped_records.iter().enumerate() {
        let event = &record.event;
        if !is_open_violation(event) {
            continue;
        }

        let declared_bundle = event
            .payload
            .as_ref()
            .and_then(|payload| payload.get("bundle_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        // El índice, cuando existe, es la única autoridad de certificación.
        let bundle_id = match (&declared_bundle, certified_bundles) {
            (Some(candidate), Some(index)) if !index.contains(candidate) => None,
            _ => declared_bundle,
        };

        violations.push(OpenViolation {
            id: event
                .id
                .clone()
                .filter(|identifier| !identifier.is_empty())
                .unwrap_or_else(|| format!("v_{position}")),
            ts: normalized_stamp(event),
            title: render_alert_title(&record.subscription_id, event),
            severity: event.severity.clone(),
            asset_id: event.asset_id.clone(),
            aoi_id: event.aoi_id.clone(),
            rule_type: event.rule_type.clone(),
            topic: event.topic.clone(),
            payload: event.payload.clone().unwrap_or_default(),
            bundle_id,
        });
    }

    violations.sort_by(|left, right| right.ts.cmp(&left.ts));
    violations
}

/// Agrega el riesgo ponderado por activo sobre TODO el flujo dedupado.
pub fn build_heatmap(
    deduped_records: &[MatchedRecord],
    asset_locations: &BTreeMap<String, GeoPoint>,
) -> Vec<HeatmapCell> {
    #[derive(Default)]
    struct CellAccumulator {
        risk_score: u64,
        open_count: u64,
        last_ts: String,
    }

    let mut accumulators: BTreeMap<String, CellAccumulator> = BTreeMap::new();
    for record in deduped_records {
        let event = &record.event;
        let Some(asset_id) = event.asset_id.as_deref().filter(|value| !value.is_empty()) else {
            continue;
        };

        let cell = accumulators.entry(asset_id.to_string()).or_default();
        cell.risk_score += u64::from(severity_weight(event.severity_label()));
        cell.open_count += 1;
        let stamp = normalized_stamp(event);
        if cell.last_ts.is_empty() || stamp > cell.last_ts {
            cell.last_ts = stamp;
        }
    }

    let mut cells: Vec<HeatmapCell> = accumulators
        .into_iter()
        .map(|(asset_id, accumulator)| {
            let location = asset_locations.get(&asset_id);
            HeatmapCell {
                asset_id,
                risk_score: accumulator.risk_score,
                open_count: accumulator.open_count,
                last_ts: accumulator.last_ts,
                lat: location.map(|point| point.lat),
                lon: location.map(|point| point.lon),
            }
        })
        .collect();

    cells.sort_by(|left, right| {
        (right.risk_score, right.open_count).cmp(&(left.risk_score, left.open_count))
    });
    cells
}

/// Artefactos de la vista reguladora.
#[derive(Debug, Clone)]
pub struct RegulatorArtifacts {
    pub open_violations: Vec<OpenViolation>,
    pub heatmap: Vec<HeatmapCell>,
}

/// Vista completa bajo portón de rol.
pub fn build_regulator_view(
    principal: &Principal,
    deduped_records: &[MatchedRecord],
    certified_bundles: Option<&BTreeSet<String>>,
    asset_locations: &BTreeMap<String, GeoPoint>,
) -> Result<RegulatorArtifacts, crate::errors::ProjectionError> {
    principal.require(crate::principal::Role::Regulator)?;
    Ok(RegulatorArtifacts {
        open_violations: build_open_violations(deduped_records, certified_bundles),
        heatmap: build_heatmap(deduped_records, asset_locations),
    })
}

/// Registro de solicitud de paquete de auditoría (estado 'queued').
///
/// El identificador deriva del reloj a resolución de segundos, fuente
/// monótona suficiente para la bitácora append-only.
pub fn audit_request_record(
    principal: &Principal,
    asset_id: Option<&str>,
    bundle_id: Option<&str>,
    reason: Option<&str>,
) -> Value {
    json!({
        "request_id": format!("req_{}", Utc::now().timestamp()),
        "ts": now_stamp(),
        "user": principal.sub.clone(),
        "role": principal.role.as_label(),
        "asset_id": asset_id,
        "bundle_id": bundle_id,
        "reason": reason,
        "status": "queued",
    })
}

fn normalized_stamp(event: &AlertEvent) -> String {
    instant_or_now(event.ts.as_deref()).to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
