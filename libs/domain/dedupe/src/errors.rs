// [libs/domain/dedupe/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DEDUPE ERROR CATALOG (V1.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FALLOS FATALES DE CONFIGURACIÓN DEL SUPRESOR
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DedupeError {
    /// Fallo físico de lectura del archivo de configuración.
    #[error("[L2_DEDUPE_IO_FAULT]: CONFIG_UNREADABLE -> {0}")]
    Io(#[from] std::io::Error),

    /// Configuración ilegible para el contrato del supresor.
    #[error("[L2_DEDUPE_CONFIG_FAULT]: CONFIG_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// El enfriamiento no puede exceder la ventana TTL.
    #[error("[L2_DEDUPE_CONFIG_FAULT]: COOLDOWN_EXCEEDS_TTL -> min_interval_seconds={min_interval_seconds} > ttl_seconds={ttl_seconds}")]
    CooldownExceedsTtl { min_interval_seconds: i64, ttl_seconds: i64 },

    /// Las ventanas temporales deben ser no negativas.
    #[error("[L2_DEDUPE_CONFIG_FAULT]: NEGATIVE_WINDOW -> {0}")]
    NegativeWindow(&'static str),
}
