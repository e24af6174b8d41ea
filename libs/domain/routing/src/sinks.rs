// [libs/domain/routing/src/sinks.rs]
/*!
 * =================================================================
 * APARATO: DELIVERY SINK CAPABILITIES (V4.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2 - EXTENSIBILITY SEAM)
 * RESPONSABILIDAD: TRANSPORTE POLIMÓRFICO DE ENTREGAS POR CANAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. IDEMPOTENT CRYSTALLIZATION: El nombre de archivo deriva del par
 *    (event_id, subscription_id); re-ejecutar sobre la misma entrada
 *    sobrescribe el mismo artefacto, jamás duplica.
 * 2. CONTRACT PRESERVATION: Toda variante (outbox, HTTP, memoria)
 *    respeta el contrato (éxito, info, ubicación); los reemplazos SMTP
 *    futuros se acoplan en esta costura.
 * 3. STATUS TRIAGE: La variante HTTP clasifica la respuesta remota:
 *    2xx cristaliza, el resto degrada a razón específica.
 * =================================================================
 */

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

use verdantis_domain_envelope::AlertEvent;

use crate::config::ChannelConfig;
use crate::errors::SinkFault;

/// Orden de despacho hacia un sumidero.
#[derive(Debug)]
pub struct SinkDispatch<'a> {
    pub channel: &'a ChannelConfig,
    pub subscription_id: &'a str,
    pub event: &'a AlertEvent,
    /// Identidad estable para el nombre de archivo (`id` o `ev_<idx>`).
    pub event_file_id: String,
}

/// Resultado exitoso de una entrega.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub info: String,
    pub location: Option<PathBuf>,
}

/// Sumidero polimórfico del enrutador.
#[derive(Debug, Clone)]
pub enum AlertSink {
    /// Producción: outbox en disco; HTTP POST cuando el canal declara
    /// 'endpoint_url'.
    Transport(DeliveryEngine),
    /// Captura en memoria para el Proving Grounds.
    Memory(MemorySink),
}

impl AlertSink {
    pub fn transport() -> Self {
        AlertSink::Transport(DeliveryEngine::new())
    }

    /// Despacha una orden preservando el contrato (éxito, info, ubicación).
    pub async fn deliver(&self, dispatch: &SinkDispatch<'_>) -> Result<DeliveryReceipt, SinkFault> {
        match self {
            AlertSink::Transport(engine) => engine.dispatch(dispatch).await,
            AlertSink::Memory(memory) => memory.capture(dispatch),
        }
    }
}

/// Motor de transporte de producción.
#[derive(Debug, Clone)]
pub struct DeliveryEngine {
    /// Cliente endurecido para la variante HTTP del webhook.
    http_uplink_client: reqwest::Client,
}

impl DeliveryEngine {
    pub fn new() -> Self {
        let http_uplink_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Verdantis-Alerts-Relay/6.0")
            .build()
            .expect("FATAL: Failed to initialize webhook uplink client.");
        Self { http_uplink_client }
    }

    async fn dispatch(&self, dispatch: &SinkDispatch<'_>) -> Result<DeliveryReceipt, SinkFault> {
        match dispatch.channel.channel_type.as_str() {
            "webhook" => match &dispatch.channel.endpoint_url {
                Some(remote_endpoint) => self.post_webhook(dispatch, remote_endpoint).await,
                None => self.crystallize_outbox(dispatch, webhook_payload(dispatch)),
            },
            "email" => self.crystallize_outbox(dispatch, email_payload(dispatch)),
            other => Err(SinkFault::UnknownChannelType(other.to_string())),
        }
    }

    /// Escritura determinista al outbox del canal.
    fn crystallize_outbox(
        &self,
        dispatch: &SinkDispatch<'_>,
        payload: Value,
    ) -> Result<DeliveryReceipt, SinkFault> {
        let file_name = format!("{}__{}.json", dispatch.event_file_id, dispatch.subscription_id);
        let destination = dispatch.channel.outbox_dir.join(file_name);
        if let Some(parent_dir) = destination.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        let document =
            serde_json::to_string_pretty(&payload).expect("FATAL: outbox payload not serializable");
        fs::write(&destination, document)?;
        debug!("📤 [SINK]: Delivery crystallized at {}.", destination.display());
        Ok(DeliveryReceipt { info: "written".to_string(), location: Some(destination) })
    }

    /// Variante remota: POST JSON con triage de estado.
    async fn post_webhook(
        &self,
        dispatch: &SinkDispatch<'_>,
        remote_endpoint: &str,
    ) -> Result<DeliveryReceipt, SinkFault> {
        let response = self
            .http_uplink_client
            .post(remote_endpoint)
            .json(&webhook_payload(dispatch))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(DeliveryReceipt { info: format!("posted_{}", status.as_u16()), location: None })
        } else {
            warn!("⚠️ [SINK_REJECTION]: Remote webhook answered {}.", status);
            Err(SinkFault::WebhookRejected(status.as_u16()))
        }
    }
}

impl Default for DeliveryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Registro capturado por el sumidero de memoria.
#[derive(Debug, Clone)]
pub struct MemoryDelivery {
    pub channel_id: String,
    pub subscription_id: String,
    pub event_file_id: String,
}

/// Sumidero de memoria para auditorías sin disco ni red.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    captured: Arc<Mutex<Vec<MemoryDelivery>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn capture(&self, dispatch: &SinkDispatch<'_>) -> Result<DeliveryReceipt, SinkFault> {
        if dispatch.channel.channel_type != "webhook" && dispatch.channel.channel_type != "email" {
            return Err(SinkFault::UnknownChannelType(dispatch.channel.channel_type.clone()));
        }
        self.captured
            .lock()
            .expect("FATAL: memory sink poisoned")
            .push(MemoryDelivery {
                channel_id: dispatch.channel.id.clone(),
                subscription_id: dispatch.subscription_id.to_string(),
                event_file_id: dispatch.event_file_id.clone(),
            });
        Ok(DeliveryReceipt { info: "captured".to_string(), location: None })
    }

    pub fn deliveries(&self) -> Vec<MemoryDelivery> {
        self.captured.lock().expect("FATAL: memory sink poisoned").clone()
    }
}

fn now_wire_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Carga POST-símil del webhook, idéntica para outbox y HTTP.
fn webhook_payload(dispatch: &SinkDispatch<'_>) -> Value {
    json!({
        "channel_id": dispatch.channel.id.clone(),
        "type": "webhook",
        "ts": now_wire_stamp(),
        "subscription_id": dispatch.subscription_id,
        "event": dispatch.event,
        "meta": {"note": "outbox transport - no network dispatch"}
    })
}

/// Carta de correo con asunto renderizado y resumen plano.
fn email_payload(dispatch: &SinkDispatch<'_>) -> Value {
    let event = dispatch.event;
    json!({
        "channel_id": dispatch.channel.id.clone(),
        "type": "email",
        "ts": now_wire_stamp(),
        "to": dispatch.channel.to.clone().unwrap_or_default(),
        "subject": render_subject(dispatch),
        "body": {
            "headline": format!("Alert from {}", dispatch.subscription_id),
            "summary": {
                "topic": event.topic.clone(),
                "asset_id": event.asset_id.clone(),
                "aoi_id": event.aoi_id.clone(),
                "severity": event.severity.clone(),
                "rule_type": event.rule_type.clone(),
            },
            "event": event,
        }
    })
}

fn render_subject(dispatch: &SinkDispatch<'_>) -> String {
    let event = dispatch.event;
    let topic = event.topic.as_deref().unwrap_or("event");
    let severity = event.severity_label().to_uppercase();
    let base_subject = format!("[{severity}] {topic} via {}", dispatch.subscription_id);
    match dispatch.channel.subject_prefix.as_deref() {
        Some(prefix) => format!("{prefix} {base_subject}"),
        None => base_subject,
    }
}
