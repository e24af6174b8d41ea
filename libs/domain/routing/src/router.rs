// [libs/domain/routing/src/router.rs]
/*!
 * =================================================================
 * APARATO: ROUTE DISPATCH ENGINE (V6.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ABANICO RUTA x CANAL CON RASTRO EXHAUSTIVO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EXHAUSTIVE TRACE: Todo intento produce un registro; un registro
 *    sin ruta coincidente deja exactamente un rastro 'no_route'.
 * 2. BOUNDED DISPATCH: Cada llamada al sumidero corre bajo un plazo
 *    configurable; el vencimiento degrada a 'sink_timeout'.
 * 3. INCREMENTAL OR BATCH: El despachador procesa registro a registro
 *    (modo streaming) y el lote completo es un pliegue sobre él; la
 *    contabilidad de cupos queda linealizada en ambos modos.
 * 4. ORDER DISCIPLINE: Los registros de una suscripción atraviesan el
 *    enrutador en su orden de llegada; los canales se recorren en orden
 *    de declaración.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

use verdantis_domain_envelope::MatchedRecord;

use crate::accountant::RateLimitAccountant;
use crate::config::{GlobalLimits, RouteConfig};
use crate::sinks::{AlertSink, SinkDispatch};

/// Registro de un intento de entrega (entregado o descartado).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub subscription_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    pub event_id: String,

    /// `sent` | `skipped`.
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<String>,
}

/// Métricas agregadas de la etapa de enrutamiento.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingMetrics {
    pub sent: u64,
    pub skipped: u64,
    pub per_channel_sent: BTreeMap<String, u64>,
    pub per_channel_skipped: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_limit_max_per_run: Option<u64>,
}

/// Resultado completo de la etapa.
#[derive(Debug, Clone)]
pub struct RoutingOutcome {
    pub attempts: Vec<AttemptRecord>,
    pub metrics: RoutingMetrics,
}

/// Despachador incremental: dueño único de la libreta de cupos.
#[derive(Debug)]
pub struct RouteDispatcher {
    routes: Vec<RouteConfig>,
    global_limits: GlobalLimits,
    sink: AlertSink,
    sink_deadline: Duration,
    ledger: RateLimitAccountant,
    sent: u64,
    skipped: u64,
}

impl RouteDispatcher {
    pub fn new(
        routes: Vec<RouteConfig>,
        global_limits: GlobalLimits,
        sink: AlertSink,
        sink_deadline: Duration,
    ) -> Self {
        let ledger = RateLimitAccountant::new(&global_limits);
        Self { routes, global_limits, sink, sink_deadline, ledger, sent: 0, skipped: 0 }
    }

    /// Procesa un registro y retorna sus rastros de intento.
    ///
    /// # Logic:
    /// Rutas coincidentes -> por ruta, canales en orden de declaración
    /// -> libreta de cupos -> despacho con plazo -> rastro.
    pub async fn dispatch_record(
        &mut self,
        record: &MatchedRecord,
        position_in_stream: usize,
    ) -> Vec<AttemptRecord> {
        let event_file_id = record.event.safe_id(position_in_stream);
        let mut attempts: Vec<AttemptRecord> = Vec::new();

        let matching_route_indices: Vec<usize> = self
            .routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.matcher.admits(&record.subscription_id, &record.event))
            .map(|(route_index, _)| route_index)
            .collect();

        if matching_route_indices.is_empty() {
            self.skipped += 1;
            attempts.push(AttemptRecord {
                subscription_id: record.subscription_id.clone(),
                route_id: None,
                channel_id: None,
                event_id: event_file_id,
                status: "skipped".to_string(),
                reason: Some("no_route".to_string()),
                info: None,
                out_path: None,
            });
            return attempts;
        }

        for route_index in matching_route_indices {
            let route = self.routes[route_index].clone();
            for channel in &route.channels {
                if let Err(cap_verdict) = self.ledger.admit(channel) {
                    self.ledger.record_skipped(&channel.id);
                    self.skipped += 1;
                    attempts.push(skipped_attempt(
                        record,
                        &route.id,
                        &channel.id,
                        &event_file_id,
                        cap_verdict.as_label().to_string(),
                    ));
                    continue;
                }

                let dispatch = SinkDispatch {
                    channel,
                    subscription_id: &record.subscription_id,
                    event: &record.event,
                    event_file_id: event_file_id.clone(),
                };

                let verdict =
                    tokio::time::timeout(self.sink_deadline, self.sink.deliver(&dispatch)).await;
                match verdict {
                    Ok(Ok(receipt)) => {
                        self.ledger.record_sent(&channel.id);
                        self.sent += 1;
                        trace!("📨 [ROUTER]: {} -> {} delivered.", event_file_id, channel.id);
                        attempts.push(AttemptRecord {
                            subscription_id: record.subscription_id.clone(),
                            route_id: Some(route.id.clone()),
                            channel_id: Some(channel.id.clone()),
                            event_id: event_file_id.clone(),
                            status: "sent".to_string(),
                            reason: None,
                            info: Some(receipt.info),
                            out_path: receipt.location.map(|path| path.display().to_string()),
                        });
                    }
                    Ok(Err(sink_fault)) => {
                        self.ledger.record_skipped(&channel.id);
                        self.skipped += 1;
                        attempts.push(skipped_attempt(
                            record,
                            &route.id,
                            &channel.id,
                            &event_file_id,
                            sink_fault.reason_label(),
                        ));
                    }
                    Err(_deadline_elapsed) => {
                        self.ledger.record_skipped(&channel.id);
                        self.skipped += 1;
                        attempts.push(skipped_attempt(
                            record,
                            &route.id,
                            &channel.id,
                            &event_file_id,
                            "sink_timeout".to_string(),
                        ));
                    }
                }
            }
        }
        attempts
    }

    /// Sella la corrida y entrega las métricas agregadas.
    pub fn finish(self) -> RoutingMetrics {
        debug!("🛰️ [ROUTER]: run leveled (sent={}, skipped={}).", self.sent, self.skipped);
        RoutingMetrics {
            sent: self.sent,
            skipped: self.skipped,
            per_channel_sent: self.ledger.per_channel_sent().clone(),
            per_channel_skipped: self.ledger.per_channel_skipped().clone(),
            global_limit_max_per_run: self.global_limits.max_per_run,
        }
    }
}

/// Modo lote: pliegue del despachador incremental sobre la secuencia.
pub async fn route_batch(
    matched_records: &[MatchedRecord],
    routes: &[RouteConfig],
    global_limits: &GlobalLimits,
    sink: &AlertSink,
    sink_deadline: Duration,
) -> RoutingOutcome {
    let mut dispatcher = RouteDispatcher::new(
        routes.to_vec(),
        global_limits.clone(),
        sink.clone(),
        sink_deadline,
    );

    let mut attempts: Vec<AttemptRecord> = Vec::new();
    for (position, record) in matched_records.iter().enumerate() {
        attempts.extend(dispatcher.dispatch_record(record, position).await);
    }

    RoutingOutcome { metrics: dispatcher.finish(), attempts }
}

fn skipped_attempt(
    record: &MatchedRecord,
    route_id: &str,
    channel_id: &str,
    event_file_id: &str,
    reason: String,
) -> AttemptRecord {
    AttemptRecord {
        subscription_id: record.subscription_id.clone(),
        route_id: Some(route_id.to_string()),
        channel_id: Some(channel_id.to_string()),
        event_id: event_file_id.to_string(),
        status: "skipped".to_string(),
        reason: Some(reason),
        info: None,
        out_path: None,
    }
}
