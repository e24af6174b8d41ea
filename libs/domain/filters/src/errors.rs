// [libs/domain/filters/src/errors.rs]
/*!
 * =================================================================
 * APARATO: FILTER ERROR CATALOG (V1.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FALLOS FATALES DE CARGA DEL CATÁLOGO DE SUSCRIPCIONES
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    /// Fallo físico de lectura del archivo de configuración.
    #[error("[L2_FILTER_IO_FAULT]: CONFIG_UNREADABLE -> {0}")]
    Io(#[from] std::io::Error),

    /// Configuración ilegible o con un piso de severidad fuera de la escalera.
    #[error("[L2_FILTER_CONFIG_FAULT]: CONFIG_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// Dos suscripciones declaran el mismo identificador.
    #[error("[L2_FILTER_CONFIG_FAULT]: DUPLICATE_SUBSCRIPTION_ID -> {0}")]
    DuplicateSubscription(String),
}
