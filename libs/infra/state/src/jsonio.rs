// [libs/infra/state/src/jsonio.rs]
/*!
 * =================================================================
 * APARATO: ATOMIC JSON I/O (V2.2 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: LECTURA TIPADA Y ESCRITURA TEMP-THEN-RENAME
 * =================================================================
 */

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::trace;

use crate::errors::StateError;

/// Lee y deserializa un documento JSON al contrato `T`.
pub fn read_json_document<T: DeserializeOwned>(document_path: &Path) -> Result<T, StateError> {
    let raw_document = fs::read_to_string(document_path)?;
    Ok(serde_json::from_str(&raw_document)?)
}

/// Cristaliza un artefacto con renombre atómico.
///
/// # Logic:
/// El temporal nace en el directorio destino para garantizar que el
/// renombre ocurra dentro del mismo sistema de archivos.
pub fn write_json_atomic<T: Serialize>(
    destination_path: &Path,
    artifact: &T,
) -> Result<(), StateError> {
    let parent_directory = destination_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_directory)?;

    let mut staging_file = tempfile::NamedTempFile::new_in(parent_directory)?;
    let document = serde_json::to_string_pretty(artifact)?;
    staging_file.write_all(document.as_bytes())?;
    staging_file.flush()?;

    staging_file
        .persist(destination_path)
        .map_err(|persist_fault| StateError::Persist(persist_fault.to_string()))?;

    trace!("💾 [STATE]: Artifact crystallized at {}.", destination_path.display());
    Ok(())
}
