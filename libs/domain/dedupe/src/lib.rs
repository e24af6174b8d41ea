// [libs/domain/dedupe/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DEDUPE & FLAP SUPPRESSOR (V5.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2 - STATEFUL CORE)
 * RESPONSABILIDAD: SUPRESIÓN DETERMINISTA DE DUPLICADOS Y OSCILACIONES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE WRITER: Un único dueño muta el mapa de claves; la decisión
 *    duplicado/flapping y su mutación de estado están linealizadas por
 *    registro.
 * 2. EVENT-TIME ANCHORING: Toda aritmética temporal usa el instante del
 *    evento; el reloj de pared sólo respalda marcas ilegibles.
 * 3. BOUNDED MEMORY: El historial de flapping persiste podado a la
 *    ventana configurada; el estado no crece sin cota.
 * =================================================================
 */

pub mod config;
pub mod errors;
pub mod state;
pub mod suppressor;

pub use config::{load_dedupe_config, DedupeConfig, FlapConfig};
pub use errors::DedupeError;
pub use state::{DedupeState, FlapSample, KeyEntry};
pub use suppressor::{DedupeMetrics, DedupeOutcome, DedupeSuppressor, SuppressReason};
