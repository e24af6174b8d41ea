// [libs/domain/dedupe/src/config.rs]
/*!
 * =================================================================
 * APARATO: SUPPRESSOR CONFIG CONTRACT (V2.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO DECLARATIVO DEL SUPRESOR Y SU VALIDACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FAIL FAST: 'min_interval_seconds > ttl_seconds' o una ventana
 *    negativa abortan la carga antes de tocar el estado durable.
 * 2. DEFAULT PARITY: Los valores por omisión reproducen los del
 *    servicio de alertas original (TTL 1h, enfriamiento 5m, ventana de
 *    flapping 30m con 3 cambios tolerados).
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use crate::errors::DedupeError;

/// Configuración de la detección de oscilaciones (flapping).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlapConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Rutas punteadas que componen la clave de flapping; puede diferir
    /// de la clave de dedupe.
    #[serde(default)]
    pub key_fields: Vec<String>,

    /// Ruta del valor vigilado (ej. `event.severity`).
    #[serde(default = "default_value_field")]
    pub value_field: String,

    #[serde(default = "default_window_seconds")]
    pub window_seconds: i64,

    /// Transiciones toleradas dentro de la ventana; una más suprime.
    #[serde(default = "default_max_changes")]
    pub max_changes: u32,
}

impl Default for FlapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_fields: Vec::new(),
            value_field: default_value_field(),
            window_seconds: default_window_seconds(),
            max_changes: default_max_changes(),
        }
    }
}

/// Configuración completa del supresor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Ventana dentro de la cual una clave repetida es duplicado.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Enfriamiento mínimo entre dos emisiones sobre la misma clave.
    #[serde(default = "default_min_interval_seconds")]
    pub min_interval_seconds: i64,

    /// Rutas punteadas que componen la clave de dedupe (unidas por `|`).
    #[serde(default)]
    pub key_fields: Vec<String>,

    #[serde(default)]
    pub flap: FlapConfig,
}

impl DedupeConfig {
    /// Valida los invariantes temporales del contrato.
    pub fn validate(&self) -> Result<(), DedupeError> {
        if self.ttl_seconds < 0 {
            return Err(DedupeError::NegativeWindow("ttl_seconds"));
        }
        if self.min_interval_seconds < 0 {
            return Err(DedupeError::NegativeWindow("min_interval_seconds"));
        }
        if self.flap.window_seconds < 0 {
            return Err(DedupeError::NegativeWindow("flap.window_seconds"));
        }
        if self.min_interval_seconds > self.ttl_seconds {
            return Err(DedupeError::CooldownExceedsTtl {
                min_interval_seconds: self.min_interval_seconds,
                ttl_seconds: self.ttl_seconds,
            });
        }
        Ok(())
    }
}

/// Carga y valida la configuración del supresor.
#[instrument(skip_all, fields(path = %config_path.display()))]
pub fn load_dedupe_config(config_path: &Path) -> Result<DedupeConfig, DedupeError> {
    let raw_document = fs::read_to_string(config_path)?;
    let config: DedupeConfig = serde_json::from_str(&raw_document)?;
    config.validate()?;
    debug!(
        "📥 [SUPPRESSOR]: Config loaded (ttl={}s, cooldown={}s, flap={}).",
        config.ttl_seconds, config.min_interval_seconds, config.flap.enabled
    );
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_value_field() -> String {
    "event.severity".to_string()
}

fn default_window_seconds() -> i64 {
    1800
}

fn default_max_changes() -> u32 {
    3
}

fn default_ttl_seconds() -> i64 {
    3600
}

fn default_min_interval_seconds() -> i64 {
    300
}
