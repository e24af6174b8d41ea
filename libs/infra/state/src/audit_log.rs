// [libs/infra/state/src/audit_log.rs]
/*!
 * =================================================================
 * APARATO: AUDIT REQUEST LEDGER (V2.1 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: BITÁCORA APPEND-ONLY BAJO CANDADO EXCLUSIVO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. HISTORY IS SACRED: El anexado preserva todo registro previo; una
 *    bitácora ilegible degrada a lista vacía con advertencia, nunca a
 *    pérdida silenciosa de la corrida actual.
 * 2. EXCLUSIVE APPEND: Un archivo centinela con candado exclusivo
 *    serializa a los escritores concurrentes; la escritura final sigue
 *    siendo atómica (temp-then-rename).
 * =================================================================
 */

use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::StateError;
use crate::jsonio::{read_json_document, write_json_atomic};

/// Anexa un registro a la bitácora y retorna el tamaño resultante.
pub fn append_audit_record(ledger_path: &Path, record: Value) -> Result<usize, StateError> {
    let parent_directory = ledger_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_directory)?;

    // Candado centinela: serializa escritores sin bloquear lectores.
    let sentinel_path = ledger_path.with_extension("lock");
    let sentinel_file = File::create(&sentinel_path)?;
    sentinel_file.lock()?;

    let mut history: Vec<Value> = if ledger_path.exists() {
        match read_json_document::<Vec<Value>>(ledger_path) {
            Ok(prior_history) => prior_history,
            Err(ledger_fault) => {
                warn!(
                    "⚠️ [LEDGER_DEGRADED]: Unreadable ledger at {} ({}). Restarting history.",
                    ledger_path.display(),
                    ledger_fault
                );
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    history.push(record);
    write_json_atomic(ledger_path, &history)?;

    drop(sentinel_file);
    debug!("📜 [LEDGER]: Record appended ({} total).", history.len());
    Ok(history.len())
}
