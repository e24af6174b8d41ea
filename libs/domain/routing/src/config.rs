// [libs/domain/routing/src/config.rs]
/*!
 * =================================================================
 * APARATO: ROUTING CONFIG CONTRACT (V2.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO DECLARATIVO DE RUTAS, CANALES Y CUPOS
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use verdantis_domain_envelope::{severity_at_least, AlertEvent, SeverityFloor};

use crate::errors::RoutingError;

/// Predicados de selección de una ruta (conjunción de los presentes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_at_least: Option<SeverityFloor>,
}

impl RouteMatch {
    /// Evalúa la conjunción contra un registro emparejado.
    pub fn admits(&self, subscription_id: &str, event: &AlertEvent) -> bool {
        if let Some(admitted_subscriptions) = non_empty(&self.subscription_ids) {
            if !admitted_subscriptions.iter().any(|candidate| candidate == subscription_id) {
                return false;
            }
        }
        if let Some(admitted_topics) = non_empty(&self.topics) {
            let event_topic = event.topic.as_deref();
            if !admitted_topics.iter().any(|topic| Some(topic.as_str()) == event_topic) {
                return false;
            }
        }
        if let Some(floor) = self.severity_at_least {
            if !severity_at_least(event.severity_label(), floor) {
                return false;
            }
        }
        true
    }
}

/// Canal de entrega declarado dentro de una ruta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Tipo de transporte (`webhook` | `email`); un tipo fuera del
    /// catálogo degrada a un intento descartado, nunca a un fallo fatal.
    #[serde(rename = "type")]
    pub channel_type: String,

    pub id: String,

    /// Directorio del outbox donde cristalizan las entregas por archivo.
    pub outbox_dir: PathBuf,

    /// Destinatarios (sólo canales de correo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_prefix: Option<String>,

    /// Cupo de entregas de este canal dentro de una corrida.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_run: Option<u64>,

    /// URL remota opcional: presente, el webhook despacha por HTTP en
    /// lugar del outbox local.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

/// Ruta: predicados + canales en orden de declaración.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub id: String,

    #[serde(default, rename = "match")]
    pub matcher: RouteMatch,

    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// Cupo global de la corrida, compartido por todos los canales.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_run: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChannelsDocument {
    #[serde(default)]
    routes: Vec<RouteConfig>,

    #[serde(default)]
    rate_limit: GlobalLimits,
}

/// Carga y valida la configuración de enrutamiento.
#[instrument(skip_all, fields(path = %config_path.display()))]
pub fn load_channels_config(
    config_path: &Path,
) -> Result<(Vec<RouteConfig>, GlobalLimits), RoutingError> {
    let raw_document = fs::read_to_string(config_path)?;
    let document: ChannelsDocument = serde_json::from_str(&raw_document)?;

    let mut seen_identifiers = std::collections::BTreeSet::new();
    for route in &document.routes {
        if !seen_identifiers.insert(route.id.clone()) {
            return Err(RoutingError::DuplicateRoute(route.id.clone()));
        }
    }

    debug!("📥 [ROUTER]: {} routes loaded.", document.routes.len());
    Ok((document.routes, document.rate_limit))
}

fn non_empty(slot: &Option<Vec<String>>) -> Option<&Vec<String>> {
    slot.as_ref().filter(|values| !values.is_empty())
}
