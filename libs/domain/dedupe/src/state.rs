// [libs/domain/dedupe/src/state.rs]
/*!
 * =================================================================
 * APARATO: DURABLE SUPPRESSION STATE (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FORMA VERSIONADA DEL ESTADO ENTRE CORRIDAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. BACKWARD READABLE: Un documento sin 'keys' deserializa a mapa
 *    vacío; los campos ausentes jamás rompen una corrida.
 * 2. IMPLICIT GC: Las entradas cuya última emisión excede el TTL dejan
 *    de vetar eventos nuevos; permanecen inertes hasta la siguiente
 *    escritura.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use verdantis_domain_envelope::parse_instant;
use verdantis_domain_envelope::timeline::now_stamp;

/// Una muestra de flapping: `[instante, valor]`, como la persiste el wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlapSample(pub String, pub String);

impl FlapSample {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.0)
    }

    pub fn value(&self) -> &str {
        &self.1
    }
}

/// Entrada por clave derivada.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Instante de la última emisión sobre esta clave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_ts: Option<String>,

    /// Historial acotado de muestras para el conteo de transiciones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flap_history: Option<Vec<FlapSample>>,
}

/// Documento de estado durable (`dedupe_state.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeState {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub keys: BTreeMap<String, KeyEntry>,
}

impl Default for DedupeState {
    fn default() -> Self {
        Self { version: 1, updated_at: now_stamp(), keys: BTreeMap::new() }
    }
}

impl DedupeState {
    /// Refresca el sello temporal antes de cristalizar a disco.
    pub fn touch(&mut self) {
        self.updated_at = now_stamp();
    }
}

fn default_version() -> u32 {
    1
}
