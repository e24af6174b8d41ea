// [libs/domain/filters/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SUBSCRIPTION FILTER ENGINE (V4.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: SELECCIÓN DE EVENTOS MATERIALES POR SUSCRIPCIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONJUNCTIVE MATCHING: Una suscripción coincide cuando TODOS sus
 *    predicados presentes se cumplen; un predicado ausente o vacío no
 *    restringe nada.
 * 2. INVERTED SUPPRESSION: 'suppress_if' excluye la suscripción cuando
 *    TODOS sus pares de igualdad coinciden con el evento. La inversión
 *    es intencional y está certificada en el Proving Grounds.
 * 3. ORDER DISCIPLINE: La salida preserva el orden de los eventos y,
 *    dentro de un evento, el orden de declaración de las suscripciones.
 *
 * # Mathematical Proof (Predicate Soundness):
 * Todo registro emitido satisface la conjunción de los predicados de su
 * suscripción por construcción: 'matches' es la única puerta de emisión
 * y evalúa cada predicado presente sin memoria entre eventos.
 * =================================================================
 */

pub mod errors;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use verdantis_domain_envelope::{severity_at_least, AlertEvent, MatchedRecord, SeverityFloor};

pub use errors::FilterError;

/// Suscripción declarada en configuración (inmutable durante la corrida).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,

    /// Conjunto de tópicos admitidos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,

    /// Piso de severidad sobre la escalera (estricto al cargar).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_at_least: Option<SeverityFloor>,

    /// Conjunto de activos o el comodín `["*"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aoi_ids: Option<Vec<String>>,

    /// Pisos por métrica sobre 'event.delta'. Un valor ausente o no
    /// numérico falla el predicado.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delta: Option<BTreeMap<String, f64>>,

    /// Pares de igualdad que, si TODOS coinciden, excluyen el evento.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppress_if: Option<Map<String, Value>>,
}

impl Subscription {
    /// Evalúa la conjunción de predicados presentes contra un evento.
    pub fn matches(&self, event: &AlertEvent) -> bool {
        if let Some(admitted_topics) = non_empty(&self.topics) {
            let event_topic = event.topic.as_deref();
            if !admitted_topics.iter().any(|topic| Some(topic.as_str()) == event_topic) {
                return false;
            }
        }

        if let Some(floor) = self.severity_at_least {
            if !severity_at_least(event.severity_label(), floor) {
                return false;
            }
        }

        if let Some(admitted_assets) = non_empty(&self.assets) {
            let wildcard = admitted_assets.iter().any(|asset| asset == "*");
            let event_asset = event.asset_id.as_deref();
            if !wildcard && !admitted_assets.iter().any(|asset| Some(asset.as_str()) == event_asset)
            {
                return false;
            }
        }

        if let Some(admitted_rules) = non_empty(&self.rule_types) {
            let event_rule = event.rule_type.as_deref();
            if !admitted_rules.iter().any(|rule| Some(rule.as_str()) == event_rule) {
                return false;
            }
        }

        if let Some(admitted_aois) = non_empty(&self.aoi_ids) {
            let event_aoi = event.aoi_id.as_deref();
            if !admitted_aois.iter().any(|aoi| Some(aoi.as_str()) == event_aoi) {
                return false;
            }
        }

        if let Some(metric_floors) = &self.min_delta {
            let deltas = event.delta.as_ref();
            for (metric_name, floor_value) in metric_floors {
                let observed = deltas
                    .and_then(|map| map.get(metric_name))
                    .and_then(Value::as_f64);
                match observed {
                    Some(observed_value) if observed_value >= *floor_value => {}
                    _ => return false,
                }
            }
        }

        // Inversión deliberada: la coincidencia TOTAL de los pares excluye.
        if let Some(exclusion_pairs) = &self.suppress_if {
            if !exclusion_pairs.is_empty()
                && exclusion_pairs
                    .iter()
                    .all(|(field, expected)| &event.field_value(field) == expected)
            {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionsDocument {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

/// Métricas de la etapa de filtros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetrics {
    pub total_events: u64,
    pub unmatched: u64,
    pub malformed_events: u64,
    pub per_subscription: BTreeMap<String, u64>,
}

/// Resultado de la etapa: registros emparejados + métricas.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub matched: Vec<MatchedRecord>,
    pub metrics: FilterMetrics,
}

/// Carga y valida el catálogo de suscripciones.
///
/// # Errors:
/// Un id duplicado o un piso de severidad fuera de la escalera abortan
/// la carga antes de cualquier mutación de estado.
#[instrument(skip_all, fields(path = %config_path.display()))]
pub fn load_subscriptions(config_path: &Path) -> Result<Vec<Subscription>, FilterError> {
    let raw_document = fs::read_to_string(config_path)?;
    let document: SubscriptionsDocument = serde_json::from_str(&raw_document)?;

    let mut seen_identifiers = std::collections::BTreeSet::new();
    for subscription in &document.subscriptions {
        if !seen_identifiers.insert(subscription.id.clone()) {
            return Err(FilterError::DuplicateSubscription(subscription.id.clone()));
        }
    }

    debug!("📥 [FILTER_ENGINE]: {} subscriptions loaded.", document.subscriptions.len());
    Ok(document.subscriptions)
}

/// Aplica el catálogo completo sobre el lote de eventos.
///
/// # Performance:
/// El barrido por evento se ejecuta en el pool de Rayon; el recogido
/// posterior restituye el orden de entrada, de modo que el paralelismo
/// es invisible en la salida.
pub fn apply_filters(
    events: &[AlertEvent],
    subscriptions: &[Subscription],
    malformed_events: u64,
) -> FilterOutcome {
    let per_event_claims: Vec<Vec<&Subscription>> = events
        .par_iter()
        .map(|event| {
            subscriptions
                .iter()
                .filter(|subscription| subscription.matches(event))
                .collect()
        })
        .collect();

    let mut per_subscription: BTreeMap<String, u64> =
        subscriptions.iter().map(|subscription| (subscription.id.clone(), 0)).collect();
    let mut matched = Vec::new();
    let mut unmatched = 0u64;

    for (event, claimants) in events.iter().zip(per_event_claims) {
        if claimants.is_empty() {
            unmatched += 1;
            continue;
        }
        for subscription in claimants {
            *per_subscription.entry(subscription.id.clone()).or_insert(0) += 1;
            matched.push(MatchedRecord {
                subscription_id: subscription.id.clone(),
                event: event.clone(),
            });
        }
    }

    FilterOutcome {
        matched,
        metrics: FilterMetrics {
            total_events: events.len() as u64,
            unmatched,
            malformed_events,
            per_subscription,
        },
    }
}

fn non_empty(slot: &Option<Vec<String>>) -> Option<&Vec<String>> {
    slot.as_ref().filter(|values| !values.is_empty())
}
