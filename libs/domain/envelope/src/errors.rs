// [libs/domain/envelope/src/errors.rs]
/*!
 * =================================================================
 * APARATO: ENVELOPE ERROR CATALOG (V1.4 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE INGESTA
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Fallo físico de lectura sobre el archivo de eventos.
    #[error("[L2_ENVELOPE_IO_FAULT]: SOURCE_UNREADABLE -> {0}")]
    Io(#[from] std::io::Error),

    /// El documento no es JSON válido.
    #[error("[L2_ENVELOPE_PARSE_FAULT]: JSON_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// El documento es JSON válido pero no tiene la forma contractual.
    #[error("[L2_ENVELOPE_SHAPE_FAULT]: CONTRACT_VIOLATION -> {0}")]
    Shape(String),
}
