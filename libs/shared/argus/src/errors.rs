// [libs/shared/argus/src/errors.rs]
/*!
 * =================================================================
 * APARATO: ARGUS ERROR CATALOG (V1.1 - SOBERANO)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: FALLOS DEL ESTRATO DE OBSERVABILIDAD
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgusError {
    /// Fallo físico sobre el archivo de métricas o la bitácora.
    #[error("[L4_ARGUS_IO_FAULT]: FILESYSTEM_REJECTED -> {0}")]
    Io(#[from] std::io::Error),

    /// Documento de métricas de etapa ilegible.
    #[error("[L4_ARGUS_PARSE_FAULT]: DOCUMENT_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),
}
