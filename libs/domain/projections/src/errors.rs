// [libs/domain/projections/src/errors.rs]
/*!
 * =================================================================
 * APARATO: PROJECTION ERROR CATALOG (V1.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FALLOS DE CARGA Y VIOLACIONES DEL PORTÓN DE ROLES
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    /// Fallo físico de lectura de una entrada obligatoria.
    #[error("[L2_PROJECTION_IO_FAULT]: SOURCE_UNREADABLE -> {0}")]
    Io(#[from] std::io::Error),

    /// Documento ilegible para el contrato de la vista.
    #[error("[L2_PROJECTION_PARSE_FAULT]: DOCUMENT_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// Forma contractual violada (ej. el flujo dedupado no es una lista).
    #[error("[L2_PROJECTION_SHAPE_FAULT]: CONTRACT_VIOLATION -> {0}")]
    Shape(String),

    /// El principal verificado no porta el rol que la vista exige.
    #[error("[L2_PROJECTION_AUTH_FAULT]: FORBIDDEN_ROLE -> required={required}, actual={actual}")]
    ForbiddenRole { required: &'static str, actual: String },
}
