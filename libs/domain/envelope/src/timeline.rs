// [libs/domain/envelope/src/timeline.rs]
/*!
 * =================================================================
 * APARATO: TIMELINE RESOLVER (V1.6 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: NORMALIZACIÓN DE INSTANTES RFC 3339 A UTC
 *
 * # Mathematical Proof (Temporal Determinism):
 * Las decisiones de dedupe y flapping se anclan al instante del evento,
 * nunca al reloj del sistema. El reloj de pared sólo participa como
 * respaldo cuando el productor emite una marca ilegible, y en los
 * sellos 'updated_at'/'built_at' de los artefactos.
 * =================================================================
 */

use chrono::{DateTime, SecondsFormat, Utc};

/// Interpreta un instante ISO-8601 con offset explícito o sufijo `Z`.
/// Cualquier otra forma retorna `None` y el llamador decide el respaldo.
pub fn parse_instant(raw_timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw_timestamp)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Instante del evento, o bien la marca opcional interpretada, o bien
/// el reloj de pared como respaldo documentado.
pub fn instant_or_now(raw_timestamp: Option<&str>) -> DateTime<Utc> {
    raw_timestamp.and_then(parse_instant).unwrap_or_else(Utc::now)
}

/// Día UTC (`YYYY-MM-DD`) del instante dado, para las series diarias.
pub fn utc_day(instant: DateTime<Utc>) -> String {
    instant.date_naive().to_string()
}

/// Sello RFC 3339 del instante actual para 'updated_at'/'built_at'.
pub fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
