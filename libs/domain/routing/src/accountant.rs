// [libs/domain/routing/src/accountant.rs]
/*!
 * =================================================================
 * APARATO: RUN-LEVEL RATE ACCOUNTANT (V2.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CONTABILIDAD ÚNICA DE CUPOS GLOBAL Y POR CANAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE LEDGER: Todo el estado mutable compartido del enrutamiento
 *    vive en esta libreta; el dueño es la tarea de enrutamiento y nunca
 *    se expone como estado global del proceso.
 * 2. STRICT ORDER: El cupo global se consulta antes que el del canal,
 *    de modo que un canal saturado no enmascara la saturación global.
 *
 * # Mathematical Proof (Cap Enforcement):
 * 'admit' sólo concede cuando sent_global < cap_global y
 * sent[canal] < cap[canal]; como 'record_sent' incrementa ambos
 * contadores en la misma llamada, sent_global <= cap_global y
 * sent[c] <= cap[c] son invariantes de corrida.
 * =================================================================
 */

use std::collections::BTreeMap;

use crate::config::{ChannelConfig, GlobalLimits};

/// Causa de rechazo de un intento por contabilidad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapVerdict {
    GlobalRateLimited,
    ChannelRateLimited,
}

impl CapVerdict {
    pub fn as_label(self) -> &'static str {
        match self {
            CapVerdict::GlobalRateLimited => "global_rate_limited",
            CapVerdict::ChannelRateLimited => "channel_rate_limited",
        }
    }
}

/// Libreta de cupos de una corrida.
#[derive(Debug)]
pub struct RateLimitAccountant {
    global_cap: Option<u64>,
    global_sent: u64,
    per_channel_sent: BTreeMap<String, u64>,
    per_channel_skipped: BTreeMap<String, u64>,
}

impl RateLimitAccountant {
    pub fn new(limits: &GlobalLimits) -> Self {
        Self {
            global_cap: limits.max_per_run,
            global_sent: 0,
            per_channel_sent: BTreeMap::new(),
            per_channel_skipped: BTreeMap::new(),
        }
    }

    /// Consulta ambos cupos sin mutar la libreta.
    pub fn admit(&self, channel: &ChannelConfig) -> Result<(), CapVerdict> {
        if let Some(global_cap) = self.global_cap {
            if self.global_sent >= global_cap {
                return Err(CapVerdict::GlobalRateLimited);
            }
        }
        if let Some(channel_cap) = channel.max_per_run {
            let already_sent = self.per_channel_sent.get(&channel.id).copied().unwrap_or(0);
            if already_sent >= channel_cap {
                return Err(CapVerdict::ChannelRateLimited);
            }
        }
        Ok(())
    }

    /// Sella una entrega: incrementa el contador global y el del canal.
    pub fn record_sent(&mut self, channel_id: &str) {
        self.global_sent += 1;
        *self.per_channel_sent.entry(channel_id.to_string()).or_insert(0) += 1;
    }

    /// Contabiliza un descarte atribuible a un canal concreto.
    pub fn record_skipped(&mut self, channel_id: &str) {
        *self.per_channel_skipped.entry(channel_id.to_string()).or_insert(0) += 1;
    }

    pub fn global_sent(&self) -> u64 {
        self.global_sent
    }

    pub fn per_channel_sent(&self) -> &BTreeMap<String, u64> {
        &self.per_channel_sent
    }

    pub fn per_channel_skipped(&self) -> &BTreeMap<String, u64> {
        &self.per_channel_skipped
    }
}
