// [libs/domain/dedupe/src/suppressor.rs]
/*!
 * =================================================================
 * APARATO: SUPPRESSION STATE MACHINE (V5.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2 - STATEFUL CORE)
 * RESPONSABILIDAD: VEREDICTO DUPLICADO/FLAPPING Y MUTACIÓN LINEALIZADA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LADDER OF VERDICTS: edad < enfriamiento -> 'cooldown';
 *    edad < TTL -> 'duplicate_ttl'; transiciones > tolerancia ->
 *    'flapping'; en otro caso la emisión sella 'last_sent_ts'.
 * 2. NEGATIVE AGE SHIELD: Un evento anterior a la última emisión jamás
 *    es duplicado; la resta temporal es con signo y no puede desbordar.
 * 3. DUAL KEYS: El historial de flapping vive bajo la clave de flapping;
 *    un duplicado anexa a la entrada de dedupe como efecto secundario.
 *
 * # Mathematical Proof (Emission Spacing):
 * Para toda clave k y emisiones consecutivas t1 < t2: el veredicto de
 * t2 exige edad >= min_interval_seconds (comparación estricta sobre
 * milisegundos), luego t2 - t1 >= min_interval_seconds.
 * =================================================================
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use verdantis_domain_envelope::keypath::{compile_paths, compose_key};
use verdantis_domain_envelope::timeline::instant_or_now;
use verdantis_domain_envelope::{parse_instant, CompiledKeyPath, MatchedRecord};

use crate::config::DedupeConfig;
use crate::state::{DedupeState, FlapSample};

/// Razón de supresión, en el vocabulario del wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    Cooldown,
    DuplicateTtl,
    Flapping,
}

impl SuppressReason {
    pub fn as_label(self) -> &'static str {
        match self {
            SuppressReason::Cooldown => "cooldown",
            SuppressReason::DuplicateTtl => "duplicate_ttl",
            SuppressReason::Flapping => "flapping",
        }
    }
}

/// Métricas de la etapa de supresión.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeMetrics {
    pub input: u64,
    pub kept: u64,
    pub suppressed: u64,
    pub suppressed_by_reason: ReasonBreakdown,
    pub cfg: ConfigEcho,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasonBreakdown {
    pub cooldown: u64,
    pub duplicate_ttl: u64,
    pub flapping: u64,
}

/// Eco de la configuración vigente, para el operador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEcho {
    pub ttl_seconds: i64,
    pub min_interval_seconds: i64,
    pub flap_enabled: bool,
}

/// Resultado del lote: registros conservados + métricas.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    pub kept: Vec<MatchedRecord>,
    pub metrics: DedupeMetrics,
}

/// Dueño único del estado de supresión durante una corrida.
///
/// La decisión sobre cada registro y su mutación de estado ocurren en la
/// misma llamada; no existe ventana en la que otro escritor observe un
/// estado intermedio.
#[derive(Debug)]
pub struct DedupeSuppressor {
    config: DedupeConfig,
    dedupe_paths: Vec<CompiledKeyPath>,
    flap_paths: Vec<CompiledKeyPath>,
    flap_value_path: CompiledKeyPath,
    state: DedupeState,
}

impl DedupeSuppressor {
    /// Forja el supresor compilando las rutas de clave una sola vez.
    pub fn new(config: DedupeConfig, prior_state: DedupeState) -> Self {
        let dedupe_paths = compile_paths(&config.key_fields);
        let flap_paths = compile_paths(&config.flap.key_fields);
        let flap_value_path = CompiledKeyPath::compile(&config.flap.value_field);
        Self { config, dedupe_paths, flap_paths, flap_value_path, state: prior_state }
    }

    /// Procesa el lote completo en orden de llegada.
    pub fn process_batch(&mut self, records: &[MatchedRecord]) -> DedupeOutcome {
        let mut kept = Vec::new();
        let mut breakdown = ReasonBreakdown::default();

        for record in records {
            match self.assess(record) {
                None => kept.push(record.clone()),
                Some(SuppressReason::Cooldown) => breakdown.cooldown += 1,
                Some(SuppressReason::DuplicateTtl) => breakdown.duplicate_ttl += 1,
                Some(SuppressReason::Flapping) => breakdown.flapping += 1,
            }
        }

        let suppressed = breakdown.cooldown + breakdown.duplicate_ttl + breakdown.flapping;
        debug!(
            "🧹 [SUPPRESSOR]: batch leveled (input={}, kept={}, suppressed={}).",
            records.len(),
            kept.len(),
            suppressed
        );
        DedupeOutcome {
            metrics: DedupeMetrics {
                input: records.len() as u64,
                kept: kept.len() as u64,
                suppressed,
                suppressed_by_reason: breakdown,
                cfg: ConfigEcho {
                    ttl_seconds: self.config.ttl_seconds,
                    min_interval_seconds: self.config.min_interval_seconds,
                    flap_enabled: self.config.flap.enabled,
                },
            },
            kept,
        }
    }

    /// Veredicto linealizado sobre un registro: `None` emite; `Some`
    /// suprime con la razón dada. El estado ya quedó mutado al retornar.
    pub fn assess(&mut self, record: &MatchedRecord) -> Option<SuppressReason> {
        let event_instant = instant_or_now(record.event.ts.as_deref());
        let dedupe_key = compose_key(&self.dedupe_paths, record);

        if let Some(duplicate_reason) = self.duplicate_verdict(&dedupe_key, event_instant) {
            // Efecto secundario documentado: el duplicado alimenta el
            // historial de la entrada de dedupe, no el de la clave de flap.
            if self.config.flap.enabled {
                let observed_value = self.flap_value_path.resolve(record);
                self.append_history(&dedupe_key, event_instant, observed_value);
            }
            trace!("🧊 [SUPPRESSOR]: key '{}' suppressed ({}).", dedupe_key, duplicate_reason.as_label());
            return Some(duplicate_reason);
        }

        if self.config.flap.enabled {
            let observed_value = self.flap_value_path.resolve(record);
            let flap_key = compose_key(&self.flap_paths, record);
            if self.flap_verdict(&flap_key, event_instant, observed_value) {
                trace!("🌊 [SUPPRESSOR]: key '{}' suppressed (flapping).", flap_key);
                return Some(SuppressReason::Flapping);
            }
        }

        let entry = self.state.keys.entry(dedupe_key).or_default();
        entry.last_sent_ts = Some(stamp(event_instant));
        None
    }

    /// Cede el estado mutado para su cristalización.
    pub fn into_state(mut self) -> DedupeState {
        self.state.touch();
        self.state
    }

    fn duplicate_verdict(
        &self,
        dedupe_key: &str,
        event_instant: DateTime<Utc>,
    ) -> Option<SuppressReason> {
        let last_sent = self
            .state
            .keys
            .get(dedupe_key)
            .and_then(|entry| entry.last_sent_ts.as_deref())
            .and_then(parse_instant)?;

        let age_milliseconds = (event_instant - last_sent).num_milliseconds();
        if age_milliseconds < 0 {
            // El evento precede a la última emisión: nunca es duplicado.
            return None;
        }
        if age_milliseconds < self.config.min_interval_seconds.saturating_mul(1000) {
            return Some(SuppressReason::Cooldown);
        }
        if age_milliseconds < self.config.ttl_seconds.saturating_mul(1000) {
            return Some(SuppressReason::DuplicateTtl);
        }
        None
    }

    /// Conteo de transiciones sobre la ventana y persistencia del
    /// historial podado, suprimido o no.
    fn flap_verdict(
        &mut self,
        flap_key: &str,
        event_instant: DateTime<Utc>,
        observed_value: String,
    ) -> bool {
        let window_cutoff = event_instant - Duration::seconds(self.config.flap.window_seconds);

        let entry = self.state.keys.entry(flap_key.to_string()).or_default();
        let mut windowed: Vec<FlapSample> = entry
            .flap_history
            .take()
            .unwrap_or_default()
            .into_iter()
            .filter(|sample| sample.instant().is_some_and(|instant| instant >= window_cutoff))
            .collect();
        windowed.push(FlapSample(stamp(event_instant), observed_value));

        let transition_count = windowed
            .windows(2)
            .filter(|adjacent| adjacent[0].value() != adjacent[1].value())
            .count() as u32;

        entry.flap_history = Some(windowed);
        transition_count > self.config.flap.max_changes
    }

    fn append_history(&mut self, key: &str, event_instant: DateTime<Utc>, observed_value: String) {
        let entry = self.state.keys.entry(key.to_string()).or_default();
        entry
            .flap_history
            .get_or_insert_with(Vec::new)
            .push(FlapSample(stamp(event_instant), observed_value));
    }
}

fn stamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
