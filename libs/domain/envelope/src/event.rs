// [libs/domain/envelope/src/event.rs]
/*!
 * =================================================================
 * APARATO: CANONICAL EVENT ENVELOPE (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: SOBRE INMUTABLE DEL EVENTO Y REGISTRO EMPAREJADO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LENIENT INGESTION: Un evento malformado jamás es fatal; las
 *    entradas que no son objetos se descartan y se contabilizan en
 *    'malformed_events'. Los campos ausentes fallan predicados, no
 *    ejecuciones.
 * 2. LOSSLESS TRANSIT: El aplanado serde preserva los campos del
 *    productor que el contrato no tipifica, de modo que re-ejecutar
 *    el pipeline sobre la misma entrada cristaliza bytes idénticos.
 *
 * # Mathematical Proof (Exactly-Once Emission):
 * El par (subscription_id, event) es la unidad de emisión aguas abajo.
 * Un evento puede producir N registros emparejados (uno por suscripción
 * coincidente) pero cada par viaja exactamente una vez.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::errors::EnvelopeError;
use crate::severity::severity_rank;
use crate::timeline::parse_instant;

/// Sobre canónico de un evento de dominio (resultado de política,
/// detección satelital, atestación zk, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Identificador opaco único por productor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Instante ISO-8601 con offset o sufijo `Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,

    /// Tópico del conjunto cerrado (`policy.enforcement`, `sat.change`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Etiqueta de severidad; ausente o desconocida colapsa a `info`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aoi_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,

    /// Deltas métricos del productor (ej. `{"ndvi": 0.27}`). Los valores
    /// no numéricos se toleran aquí y fallan el predicado que los consuma.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Map<String, Value>>,

    /// Carga opaca específica del dominio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,

    /// Campos del productor fuera del contrato: viajan intactos.
    #[serde(flatten)]
    pub producer_extra: Map<String, Value>,
}

impl AlertEvent {
    /// Etiqueta de severidad efectiva (`info` cuando el productor calla).
    pub fn severity_label(&self) -> &str {
        self.severity.as_deref().unwrap_or("info")
    }

    /// Rango 0..4 de la severidad efectiva.
    pub fn severity_rank(&self) -> u8 {
        severity_rank(self.severity_label())
    }

    /// Identificador estable para nombres de archivo y registros de
    /// intento: el id del productor, o `ev_<idx>` como respaldo.
    pub fn safe_id(&self, position_in_batch: usize) -> String {
        match self.id.as_deref() {
            Some(producer_id) if !producer_id.is_empty() => producer_id.to_string(),
            _ => format!("ev_{position_in_batch}"),
        }
    }

    /// Instante del evento si su marca es interpretable.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.ts.as_deref().and_then(parse_instant)
    }

    /// Valor de un campo de primer nivel como JSON; ausente es `null`.
    /// Los pares de 'suppress_if' comparan contra este valor.
    pub fn field_value(&self, field_name: &str) -> Value {
        fn text(slot: &Option<String>) -> Value {
            slot.as_deref().map_or(Value::Null, |text| Value::String(text.to_string()))
        }
        match field_name {
            "id" => text(&self.id),
            "ts" => text(&self.ts),
            "topic" => text(&self.topic),
            "severity" => text(&self.severity),
            "asset_id" => text(&self.asset_id),
            "aoi_id" => text(&self.aoi_id),
            "rule_type" => text(&self.rule_type),
            "acknowledged" => self.acknowledged.map_or(Value::Null, Value::Bool),
            "delta" => self.delta.clone().map_or(Value::Null, Value::Object),
            "payload" => self.payload.clone().map_or(Value::Null, Value::Object),
            other => self.producer_extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }

    /// Desciende una ruta punteada dentro del evento. Un segmento ausente
    /// o un intermedio no-objeto resuelve a `null`.
    pub fn path_value(&self, segments: &[String]) -> Value {
        let Some((head, tail)) = segments.split_first() else {
            return Value::Null;
        };
        let mut current = self.field_value(head);
        for segment in tail {
            current = match current {
                Value::Object(ref inner_map) => {
                    inner_map.get(segment).cloned().unwrap_or(Value::Null)
                }
                _ => return Value::Null,
            };
        }
        current
    }
}

/// Unidad de tránsito entre etapas: una suscripción que reclamó un evento.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub subscription_id: String,
    pub event: AlertEvent,
}

/// Lote de ingesta con su contador de descartes.
#[derive(Debug, Clone)]
pub struct EventBatch {
    pub events: Vec<AlertEvent>,
    pub malformed_events: u64,
}

/// Carga el arreglo de eventos del productor.
///
/// # Errors:
/// Falla sólo cuando el documento no es un arreglo JSON legible; las
/// entradas individuales ilegibles se descartan y se contabilizan.
pub fn load_events(events_path: &Path) -> Result<EventBatch, EnvelopeError> {
    let raw_document = fs::read_to_string(events_path)?;
    let parsed: Value = serde_json::from_str(&raw_document)?;
    let Value::Array(entries) = parsed else {
        return Err(EnvelopeError::Shape("events JSON must be a list".into()));
    };

    let mut events = Vec::with_capacity(entries.len());
    let mut malformed_events = 0u64;
    for entry in entries {
        match entry {
            Value::Object(_) => match serde_json::from_value::<AlertEvent>(entry) {
                Ok(event) => events.push(event),
                Err(_) => malformed_events += 1,
            },
            _ => malformed_events += 1,
        }
    }
    Ok(EventBatch { events, malformed_events })
}

/// Carga registros emparejados (salida de la etapa de filtros).
/// Las entradas sin 'subscription_id' o sin 'event' se descartan.
pub fn load_matched(matched_path: &Path) -> Result<Vec<MatchedRecord>, EnvelopeError> {
    let raw_document = fs::read_to_string(matched_path)?;
    let parsed: Value = serde_json::from_str(&raw_document)?;
    let Value::Array(entries) = parsed else {
        return Err(EnvelopeError::Shape("matched events JSON must be a list".into()));
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Ok(record) = serde_json::from_value::<MatchedRecord>(entry) {
            records.push(record);
        }
    }
    Ok(records)
}
