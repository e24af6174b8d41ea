// [libs/domain/projections/src/public.rs]
/*!
 * =================================================================
 * APARATO: PUBLIC VIEW BUILDER (V4.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2 - REDACTION BOUNDARY)
 * RESPONSABILIDAD: FEED ENMASCARADO Y AGREGADOS REGIONALES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. REDACTION CLOSURE: El conjunto de claves de cada tarjeta es
 *    subconjunto de visible_fields U {asset_id sii el seudónimo está
 *    habilitado}; la poda ocurre DESPUÉS de sanear, de modo que una
 *    fuga desde cargas del productor es estructuralmente imposible.
 * 2. STABLE PSEUDONYMS: HMAC-SHA-256 con secreto de proceso; mismo
 *    activo -> mismo seudónimo, sin camino de regreso al identificador.
 * 3. REGIONAL ROLLUP: region = aoi_to_region[aoi_id] con respaldo
 *    configurable; los agregados cuentan (región x severidad) sobre el
 *    feed ya saneado.
 * =================================================================
 */

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use verdantis_domain_envelope::severity::SeverityFloor;
use verdantis_domain_envelope::timeline::instant_or_now;
use verdantis_domain_envelope::{severity_at_least, MatchedRecord};

use crate::errors::ProjectionError;
use crate::principal::{Principal, Role};

/// Secreto de seudonimización a nivel de proceso. La rotación queda
/// fuera de alcance del contrato.
static PSEUDONYM_SECRET: Lazy<String> =
    Lazy::new(|| std::env::var("PUBLIC_MASK_SECRET").unwrap_or_else(|_| "public-dev-secret".into()));

/// Política de exposición pública.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPolicy {
    #[serde(default = "default_min_severity")]
    pub min_severity: SeverityFloor,

    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Lista blanca de campos expuestos.
    #[serde(default = "default_visible_fields")]
    pub visible_fields: Vec<String>,

    #[serde(default = "default_true")]
    pub anonymize_asset_id: bool,

    #[serde(default)]
    pub include_asset_id_field: bool,

    #[serde(default = "default_pseudonym_prefix")]
    pub asset_pseudonym_prefix: String,

    /// Reservado para el redondeo de coordenadas en vistas futuras.
    #[serde(default)]
    pub coords_round_decimals: u32,
}

/// Mapeo AOI -> región con respaldo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regionalization {
    #[serde(default)]
    pub aoi_to_region: BTreeMap<String, String>,

    #[serde(default = "default_fallback_region")]
    pub fallback_region: String,
}

/// Configuración completa del portal público.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicConfig {
    pub policy: PublicPolicy,
    pub regionalization: Regionalization,
}

/// Artefactos de la vista pública.
#[derive(Debug, Clone)]
pub struct PublicArtifacts {
    pub feed: Vec<Map<String, Value>>,
    pub scores: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Carga la configuración del portal público (estricta en severidad).
#[instrument(skip_all, fields(path = %config_path.display()))]
pub fn load_public_config(config_path: &Path) -> Result<PublicConfig, ProjectionError> {
    let raw_document = fs::read_to_string(config_path)?;
    Ok(serde_json::from_str(&raw_document)?)
}

/// Construye el feed enmascarado y los agregados regionales.
pub fn build_public_view(
    principal: &Principal,
    deduped_records: &[MatchedRecord],
    config: &PublicConfig,
) -> Result<PublicArtifacts, ProjectionError> {
    principal.require(Role::Public)?;

    let mut feed: Vec<Map<String, Value>> = deduped_records
        .iter()
        .filter(|record| {
            severity_at_least(record.event.severity_label(), config.policy.min_severity)
        })
        .map(|record| sanitize_item(record, config))
        .collect();

    feed.sort_by(|left, right| {
        let left_stamp = left.get("ts").and_then(Value::as_str).unwrap_or_default();
        let right_stamp = right.get("ts").and_then(Value::as_str).unwrap_or_default();
        right_stamp.cmp(left_stamp)
    });
    if config.policy.max_items > 0 {
        feed.truncate(config.policy.max_items);
    }

    let mut scores: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for item in &feed {
        let region = item
            .get("region")
            .and_then(Value::as_str)
            .unwrap_or(config.regionalization.fallback_region.as_str())
            .to_string();
        let severity =
            item.get("severity").and_then(Value::as_str).unwrap_or("info").to_string();
        *scores.entry(region).or_default().entry(severity).or_insert(0) += 1;
    }

    debug!("🌐 [PUBLIC_VIEW]: {} items, {} regions.", feed.len(), scores.len());
    Ok(PublicArtifacts { feed, scores })
}

/// Sanea una tarjeta y aplica la clausura de redacción.
fn sanitize_item(record: &MatchedRecord, config: &PublicConfig) -> Map<String, Value> {
    let event = &record.event;
    let aoi_id = event.aoi_id.clone();
    let region = resolve_region(aoi_id.as_deref(), &config.regionalization);

    let mut item = Map::new();
    item.insert(
        "ts".into(),
        Value::String(
            instant_or_now(event.ts.as_deref())
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        ),
    );
    item.insert("topic".into(), option_text(&event.topic));
    item.insert("severity".into(), option_text(&event.severity));
    item.insert("aoi_id".into(), option_text(&aoi_id));
    item.insert("region".into(), Value::String(region));

    if config.policy.include_asset_id_field {
        let exposed_asset = if config.policy.anonymize_asset_id {
            mask_asset(event.asset_id.as_deref()).map(|pseudonym| {
                Value::String(format!("{}{}", config.policy.asset_pseudonym_prefix, pseudonym))
            })
        } else {
            event.asset_id.clone().map(Value::String)
        };
        item.insert("asset_id".into(), exposed_asset.unwrap_or(Value::Null));
    }

    // Clausura de redacción: nada fuera de la lista blanca sobrevive.
    let mut retained_fields: BTreeSet<&str> =
        config.policy.visible_fields.iter().map(String::as_str).collect();
    if config.policy.include_asset_id_field {
        retained_fields.insert("asset_id");
    }
    item.retain(|field_name, _| retained_fields.contains(field_name.as_str()));
    item
}

/// Seudónimo estable: base64url(HMAC-SHA256(secreto, asset_id)[..8]).
fn mask_asset(asset_id: Option<&str>) -> Option<String> {
    let asset_id = asset_id.filter(|identifier| !identifier.is_empty())?;
    let mut keyed_digest = Hmac::<Sha256>::new_from_slice(PSEUDONYM_SECRET.as_bytes())
        .expect("FATAL: HMAC accepts keys of any length");
    keyed_digest.update(asset_id.as_bytes());
    let digest = keyed_digest.finalize().into_bytes();
    Some(URL_SAFE_NO_PAD.encode(&digest[..8]))
}

fn resolve_region(aoi_id: Option<&str>, regionalization: &Regionalization) -> String {
    aoi_id
        .and_then(|aoi| regionalization.aoi_to_region.get(aoi))
        .cloned()
        .unwrap_or_else(|| regionalization.fallback_region.clone())
}

fn option_text(slot: &Option<String>) -> Value {
    slot.clone().map_or(Value::Null, Value::String)
}

fn default_min_severity() -> SeverityFloor {
    SeverityFloor::Medium
}

fn default_max_items() -> usize {
    200
}

fn default_visible_fields() -> Vec<String> {
    ["ts", "topic", "severity", "aoi_id", "region"].map(String::from).to_vec()
}

fn default_true() -> bool {
    true
}

fn default_pseudonym_prefix() -> String {
    "asset_".to_string()
}

fn default_fallback_region() -> String {
    "Unknown".to_string()
}
