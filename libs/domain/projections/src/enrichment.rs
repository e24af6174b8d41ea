// [libs/domain/projections/src/enrichment.rs]
/*!
 * =================================================================
 * APARATO: OPTIONAL ENRICHMENT LOADERS (V2.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FUENTES OPCIONALES (GEO, BUNDLES, SERIES CAUSALES)
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SILENT FALLBACK: Todo enriquecimiento es opcional; una fuente
 *    ausente o ilegible degrada a vacío sin abortar la vista.
 * 2. NO GEOMETRY ENGINE: No se calculan centroides de polígonos; sólo
 *    se leen 'properties.lat/lon' o la coordenada de una geometría
 *    'Point'.
 * =================================================================
 */

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Ubicación puntual de un activo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Lee lat/lon por activo desde un FeatureCollection GeoJSON opcional.
pub fn load_asset_locations(geojson_path: Option<&Path>) -> BTreeMap<String, GeoPoint> {
    let mut locations = BTreeMap::new();
    let Some(geojson_path) = geojson_path else {
        return locations;
    };
    let Ok(raw_document) = fs::read_to_string(geojson_path) else {
        return locations;
    };
    let Ok(document) = serde_json::from_str::<Value>(&raw_document) else {
        return locations;
    };

    let features = document
        .get("features")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for feature in features {
        let properties = feature.get("properties").cloned().unwrap_or(Value::Null);
        let asset_id = properties
            .get("asset_id")
            .or_else(|| properties.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if asset_id.is_empty() {
            continue;
        }

        // Preferencia: propiedades explícitas lat/lon.
        if let (Some(lat), Some(lon)) = (
            properties.get("lat").and_then(Value::as_f64),
            properties.get("lon").and_then(Value::as_f64),
        ) {
            locations.insert(asset_id, GeoPoint { lat, lon });
            continue;
        }

        // Respaldo: geometría Point con [lon, lat].
        let geometry = feature.get("geometry").cloned().unwrap_or(Value::Null);
        if geometry.get("type").and_then(Value::as_str) == Some("Point") {
            if let Some(coordinates) = geometry.get("coordinates").and_then(Value::as_array) {
                if let (Some(lon), Some(lat)) = (
                    coordinates.first().and_then(Value::as_f64),
                    coordinates.get(1).and_then(Value::as_f64),
                ) {
                    locations.insert(asset_id, GeoPoint { lat, lon });
                }
            }
        }
    }

    debug!("🗺️ [ENRICHMENT]: {} asset locations resolved.", locations.len());
    locations
}

/// Índice de bundles verificables: `None` cuando la fuente no está.
pub fn load_bundles_index(index_path: Option<&Path>) -> Option<std::collections::BTreeSet<String>> {
    let index_path = index_path?;
    let raw_document = fs::read_to_string(index_path).ok()?;
    let document = serde_json::from_str::<Value>(&raw_document).ok()?;
    let items = document.get("items")?.as_array()?;

    let bundle_identifiers = items
        .iter()
        .filter_map(|item| item.get("bundle_id"))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    Some(bundle_identifiers)
}

/// Serie causal por activo y métrica.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalSeries {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

/// Recorre un directorio opcional de series causales `{asset_id, metric,
/// series:{date:[], y:[]}}`. Archivos ilegibles o con lentes desparejas
/// se descartan en silencio.
pub fn load_causal_series(
    series_directory: Option<&Path>,
) -> BTreeMap<String, BTreeMap<String, CausalSeries>> {
    let mut catalog: BTreeMap<String, BTreeMap<String, CausalSeries>> = BTreeMap::new();
    let Some(series_directory) = series_directory else {
        return catalog;
    };

    let mut pending_directories = vec![series_directory.to_path_buf()];
    while let Some(current_directory) = pending_directories.pop() {
        let Ok(entries) = fs::read_dir(&current_directory) else {
            continue;
        };
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                pending_directories.push(entry_path);
                continue;
            }
            if entry_path.extension().and_then(|extension| extension.to_str()) != Some("json") {
                continue;
            }
            let Some((asset_id, metric, series)) = read_series_file(&entry_path) else {
                continue;
            };
            catalog.entry(asset_id).or_default().insert(metric, series);
        }
    }
    catalog
}

fn read_series_file(series_path: &Path) -> Option<(String, String, CausalSeries)> {
    let raw_document = fs::read_to_string(series_path).ok()?;
    let document = serde_json::from_str::<Value>(&raw_document).ok()?;

    let asset_id = document.get("asset_id")?.as_str()?.to_string();
    let metric = document.get("metric")?.as_str()?.to_string();
    if asset_id.is_empty() || metric.is_empty() {
        return None;
    }

    let series = document.get("series")?;
    let dates: Vec<String> = series
        .get("date")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    let values: Vec<f64> = series
        .get("y")?
        .as_array()?
        .iter()
        .filter_map(Value::as_f64)
        .collect();
    if dates.len() != values.len() {
        return None;
    }
    Some((asset_id, metric, CausalSeries { dates, values }))
}
