// [libs/infra/state/src/errors.rs]
/*!
 * =================================================================
 * APARATO: PERSISTENCE ERROR CATALOG (V1.3 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    /// Fallo físico de lectura o escritura en el sistema de archivos.
    #[error("[L3_STATE_IO_FAULT]: FILESYSTEM_REJECTED -> {0}")]
    Io(#[from] std::io::Error),

    /// El documento no deserializa al contrato esperado.
    #[error("[L3_STATE_PARSE_FAULT]: DOCUMENT_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// El renombre atómico del archivo temporal colapsó.
    #[error("[L3_STATE_PERSIST_FAULT]: ATOMIC_RENAME_COLLAPSED -> {0}")]
    Persist(String),
}
