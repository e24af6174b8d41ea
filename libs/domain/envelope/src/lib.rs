// [libs/domain/envelope/src/lib.rs]
/*!
 * =================================================================
 * APARATO: EVENT ENVELOPE CONTRACT (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: GRAMÁTICA INMUTABLE DEL EVENTO Y SUS DERIVADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONTRACT SOVEREIGNTY: Define el sobre canónico que viaja por las
 *    cuatro etapas del pipeline (Filter -> Dedupe -> Router -> Views).
 * 2. LOSSLESS TRANSIT: Los campos desconocidos del productor se
 *    preservan bit-perfectos mediante aplanado serde.
 * 3. NOMINAL PURITY: Nomenclatura descriptiva absoluta, sin abreviaciones.
 * =================================================================
 */

pub mod errors;
pub mod event;
pub mod keypath;
pub mod severity;
pub mod timeline;

pub use errors::EnvelopeError;
pub use event::{AlertEvent, MatchedRecord};
pub use keypath::CompiledKeyPath;
pub use severity::{severity_at_least, severity_rank, severity_weight, SeverityFloor};
pub use timeline::{parse_instant, utc_day};
