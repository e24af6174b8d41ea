// [libs/infra/state/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DURABLE PERSISTENCE LAYER (V3.0 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CRISTALIZACIÓN ATÓMICA DE ESTADO Y ARTEFACTOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ATOMIC OR NOTHING: Toda escritura va a un archivo temporal en el
 *    mismo directorio y renombra al destino; un colapso a mitad de
 *    escritura jamás deja un documento truncado visible.
 * 2. FORGIVING READS, STRICT WRITES: Un estado ilegible degrada a
 *    estado vacío con advertencia; un estado inescribible es el error
 *    de la corrida, después de producir las salidas.
 * =================================================================
 */

pub mod audit_log;
pub mod errors;
pub mod jsonio;
pub mod vault;

pub use audit_log::append_audit_record;
pub use errors::StateError;
pub use jsonio::{read_json_document, write_json_atomic};
pub use vault::DedupeStateVault;
