// [libs/domain/projections/src/feed.rs]
/*!
 * =================================================================
 * APARATO: ALERTS FEED BUILDER (V2.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: APLANADO DEL FLUJO DEDUPADO PARA EL GEMELO DIGITAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RENDER-READY CARDS: Cada registro se aplana a una tarjeta con
 *    título legible, rango de severidad y el evento crudo por si la UI
 *    necesita el original.
 * 2. NEWEST FIRST: Orden descendente por instante normalizado y
 *    truncado al límite configurado.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use verdantis_domain_envelope::timeline::instant_or_now;
use verdantis_domain_envelope::{AlertEvent, MatchedRecord};

/// Tarjeta plana del feed de alertas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub ts: String,
    pub subscription_id: String,
    pub topic: Option<String>,
    pub severity: String,
    pub severity_rank: u8,
    pub asset_id: Option<String>,
    pub aoi_id: Option<String>,
    pub rule_type: Option<String>,
    pub title: String,
    pub payload: Map<String, Value>,
    /// Evento original por si la UI quiere el crudo.
    pub event: AlertEvent,
}

/// Métricas del feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMetrics {
    pub count: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub limit: usize,
}

/// Título legible: `[SEV] topic / rule_type @ asset (subscription)`.
pub fn render_alert_title(subscription_id: &str, event: &AlertEvent) -> String {
    let topic = event.topic.as_deref().unwrap_or("event");
    let severity = event.severity_label().to_uppercase();
    let anchor = event
        .asset_id
        .as_deref()
        .or(event.aoi_id.as_deref())
        .unwrap_or("unknown");
    let rule_suffix = event
        .rule_type
        .as_deref()
        .map(|rule_type| format!(" / {rule_type}"))
        .unwrap_or_default();
    format!("[{severity}] {topic}{rule_suffix} @ {anchor} ({subscription_id})")
}

/// Construye el feed aplanado, más nuevo primero, truncado al límite.
pub fn build_alerts_feed(
    deduped_records: &[MatchedRecord],
    item_limit: usize,
) -> (Vec<FeedItem>, FeedMetrics) {
    let mut items: Vec<FeedItem> = deduped_records
        .iter()
        .enumerate()
        .map(|(position, record)| flatten(record, position))
        .collect();

    items.sort_by(|left, right| right.ts.cmp(&left.ts));
    if item_limit > 0 {
        items.truncate(item_limit);
    }

    let mut by_severity: BTreeMap<String, u64> = BTreeMap::new();
    for item in &items {
        *by_severity.entry(item.severity.clone()).or_insert(0) += 1;
    }

    let metrics = FeedMetrics { count: items.len() as u64, by_severity, limit: item_limit };
    (items, metrics)
}

fn flatten(record: &MatchedRecord, position_in_batch: usize) -> FeedItem {
    let event = &record.event;
    let normalized_instant = instant_or_now(event.ts.as_deref());
    FeedItem {
        id: event.safe_id(position_in_batch),
        ts: normalized_instant.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        subscription_id: record.subscription_id.clone(),
        topic: event.topic.clone(),
        severity: event.severity_label().to_string(),
        severity_rank: event.severity_rank(),
        asset_id: event.asset_id.clone(),
        aoi_id: event.aoi_id.clone(),
        rule_type: event.rule_type.clone(),
        title: render_alert_title(&record.subscription_id, event),
        payload: event.payload.clone().unwrap_or_default(),
        event: event.clone(),
    }
}
