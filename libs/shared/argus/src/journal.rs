// [libs/shared/argus/src/journal.rs]
/*!
 * =================================================================
 * APARATO: DAILY JSON JOURNAL (V2.1 - SOBERANO)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: BITÁCORA ESTRUCTURADA DIARIA E INGESTORES DE ETAPA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ONE LINE, ONE FACT: Cada línea es un objeto JSON autónomo
 *    {ts, level, service, module, msg, ctx} apto para Loki.
 * 2. DAILY ROTATION: El archivo destino es app-YYYYMMDD.log; la
 *    rotación es implícita por fecha UTC.
 * =================================================================
 */

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::ArgusError;

/// Anexa una línea estructurada a la bitácora diaria y retorna su ruta.
pub fn append_journal_line(
    journal_directory: &Path,
    level: &str,
    service: &str,
    module: &str,
    message: &str,
    context: Map<String, Value>,
) -> Result<PathBuf, ArgusError> {
    std::fs::create_dir_all(journal_directory)?;
    let journal_path =
        journal_directory.join(format!("app-{}.log", Utc::now().format("%Y%m%d")));

    let line = json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        "level": level.to_lowercase(),
        "service": service,
        "module": module,
        "msg": message,
        "ctx": context,
    });

    let mut journal_file =
        OpenOptions::new().create(true).append(true).open(&journal_path)?;
    journal_file.write_all(line.to_string().as_bytes())?;
    journal_file.write_all(b"\n")?;
    Ok(journal_path)
}

/// Vuelca los resultados de intentos del enrutador a la bitácora.
pub fn ingest_attempt_results(
    results_path: &Path,
    journal_directory: &Path,
) -> Result<usize, ArgusError> {
    let raw_document = std::fs::read_to_string(results_path)?;
    let Value::Array(attempts) = serde_json::from_str(&raw_document)? else {
        return Ok(0);
    };

    let mut ingested = 0usize;
    for attempt in attempts {
        let Value::Object(fields) = attempt else {
            continue;
        };
        let mut context = Map::new();
        for field_name in
            ["subscription_id", "route_id", "channel_id", "event_id", "status", "reason", "info", "out_path"]
        {
            context.insert(
                field_name.to_string(),
                fields.get(field_name).cloned().unwrap_or(Value::Null),
            );
        }
        append_journal_line(journal_directory, "info", "alerts", "routing", "channel_attempt", context)?;
        ingested += 1;
    }
    Ok(ingested)
}

/// Vuelca la bitácora de solicitudes de auditoría al journal.
pub fn ingest_audit_requests(
    ledger_path: &Path,
    journal_directory: &Path,
) -> Result<usize, ArgusError> {
    let raw_document = std::fs::read_to_string(ledger_path)?;
    let Value::Array(requests) = serde_json::from_str(&raw_document)? else {
        return Ok(0);
    };

    let mut ingested = 0usize;
    for request in requests {
        let Value::Object(fields) = request else {
            continue;
        };
        let mut context = Map::new();
        for field_name in ["request_id", "user", "role", "asset_id", "bundle_id", "status"] {
            context.insert(
                field_name.to_string(),
                fields.get(field_name).cloned().unwrap_or(Value::Null),
            );
        }
        append_journal_line(journal_directory, "info", "portals", "regulator", "audit_request", context)?;
        ingested += 1;
    }
    Ok(ingested)
}
