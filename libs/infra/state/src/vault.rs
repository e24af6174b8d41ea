// [libs/infra/state/src/vault.rs]
/*!
 * =================================================================
 * APARATO: DEDUPE STATE VAULT (V3.0 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CICLO DE VIDA DURABLE DEL ESTADO DE SUPRESIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. READ-ONCE / WRITE-ONCE: El estado se lee una vez al iniciar la
 *    corrida y se cristaliza una vez al finalizar; no hay escrituras
 *    intermedias que otro proceso pueda observar a medias.
 * 2. GRACEFUL DEGRADATION: Archivo ausente o corrupto degrada a estado
 *    vacío con advertencia; la corrida re-emitirá dentro de la ventana
 *    TTL, que es el compromiso documentado del contrato.
 * =================================================================
 */

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use verdantis_domain_dedupe::DedupeState;

use crate::errors::StateError;
use crate::jsonio::{read_json_document, write_json_atomic};

/// Bóveda del documento `dedupe_state.json`.
#[derive(Debug, Clone)]
pub struct DedupeStateVault {
    state_path: PathBuf,
}

impl DedupeStateVault {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self { state_path: state_path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Recupera el estado previo; la degradación a vacío nunca es fatal.
    pub fn load(&self) -> DedupeState {
        if !self.state_path.exists() {
            debug!("🗄️ [VAULT]: No prior state at {}. Starting empty.", self.state_path.display());
            return DedupeState::default();
        }
        match read_json_document::<DedupeState>(&self.state_path) {
            Ok(recovered) => {
                debug!("🗄️ [VAULT]: {} keys recovered.", recovered.keys.len());
                recovered
            }
            Err(vault_fault) => {
                warn!(
                    "⚠️ [VAULT_DEGRADED]: Unreadable state at {} ({}). Replacing with empty state.",
                    self.state_path.display(),
                    vault_fault
                );
                DedupeState::default()
            }
        }
    }

    /// Cristaliza el estado mutado. Un fallo aquí es el error de la
    /// corrida: las salidas ya existen y el operador puede inspeccionar.
    pub fn persist(&self, final_state: &DedupeState) -> Result<(), StateError> {
        write_json_atomic(&self.state_path, final_state)
    }
}
