// [libs/domain/projections/src/investor.rs]
/*!
 * =================================================================
 * APARATO: INVESTOR VIEW BUILDERS (V4.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: TRAYECTORIA DIARIA DE RIESGO Y PROXY ESG -> ROI
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DAILY AGGREGATION: Los eventos se agrupan por (activo, día UTC)
 *    sumando pesos de severidad; la serie emerge ordenada por fecha.
 * 2. GROWING WINDOW: La media móvil de 7 días crece desde 1 hasta 7
 *    muestras; no hay huecos ni NaN al arranque de la serie.
 * 3. ROI DOCTRINE: roi_proxy = -(última media - primera media); una
 *    tendencia de riesgo decreciente implica mayor ROI.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use verdantis_domain_envelope::timeline::utc_day;
use verdantis_domain_envelope::{severity_weight, MatchedRecord};

use crate::enrichment::CausalSeries;
use crate::principal::{Principal, Role};

/// Punto diario de la serie de riesgo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRiskPoint {
    pub date: String,
    pub risk_score: u64,
    /// Media móvil de 7 días (ventana creciente), redondeada a 3 decimales.
    pub risk_roll7: f64,
}

/// Serie completa de un activo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTrajectory {
    pub asset_id: String,
    pub series: Vec<DailyRiskPoint>,
}

impl AssetTrajectory {
    fn last_rolling_mean(&self) -> f64 {
        self.series.last().map(|point| point.risk_roll7).unwrap_or(0.0)
    }
}

/// Eslabón ESG -> ROI por activo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiLink {
    pub asset_id: String,
    pub risk_trend: f64,
    pub roi_proxy: f64,

    /// Último valor observado por métrica causal, cuando existe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causal_snapshot: Option<BTreeMap<String, f64>>,
}

/// Resumen de sentimiento de noticias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSummary {
    pub total: u64,
    pub by_label: BTreeMap<String, u64>,
}

/// Trayectoria diaria por activo, activos más riesgosos primero.
pub fn build_risk_trajectory(deduped_records: &[MatchedRecord]) -> Vec<AssetTrajectory> {
    let mut daily_scores: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

    for record in deduped_records {
        let event = &record.event;
        let Some(asset_id) = event.asset_id.as_deref().filter(|value| !value.is_empty()) else {
            continue;
        };
        let calendar_day = event
            .instant()
            .map(utc_day)
            .unwrap_or_else(|| utc_day(chrono::Utc::now()));
        let weight = u64::from(severity_weight(event.severity_label()));
        *daily_scores
            .entry(asset_id.to_string())
            .or_default()
            .entry(calendar_day)
            .or_insert(0) += weight;
    }

    let mut trajectories: Vec<AssetTrajectory> = daily_scores
        .into_iter()
        .map(|(asset_id, by_day)| {
            let scores: Vec<u64> = by_day.values().copied().collect();
            let rolling = rolling_mean(&scores, 7);
            let series = by_day
                .into_keys()
                .zip(scores)
                .zip(rolling)
                .map(|((date, risk_score), risk_roll7)| DailyRiskPoint {
                    date,
                    risk_score,
                    risk_roll7,
                })
                .collect();
            AssetTrajectory { asset_id, series }
        })
        .collect();

    trajectories.sort_by(|left, right| {
        right
            .last_rolling_mean()
            .partial_cmp(&left.last_rolling_mean())
            .unwrap_or(Ordering::Equal)
    });
    trajectories
}

/// Eslabona la tendencia de riesgo con el proxy de ROI, ROI más alto primero.
pub fn build_roi_linkage(
    trajectories: &[AssetTrajectory],
    causal_catalog: &BTreeMap<String, BTreeMap<String, CausalSeries>>,
) -> Vec<RoiLink> {
    let mut links: Vec<RoiLink> = trajectories
        .iter()
        .map(|trajectory| {
            let rolling: Vec<f64> =
                trajectory.series.iter().map(|point| point.risk_roll7).collect();
            let risk_trend = match (rolling.first(), rolling.last()) {
                (Some(first), Some(last)) => round3(last - first),
                _ => 0.0,
            };

            let causal_snapshot = causal_catalog.get(&trajectory.asset_id).and_then(|metrics| {
                let snapshot: BTreeMap<String, f64> = metrics
                    .iter()
                    .filter_map(|(metric, series)| {
                        series.values.last().map(|latest| (metric.clone(), *latest))
                    })
                    .collect();
                (!snapshot.is_empty()).then_some(snapshot)
            });

            RoiLink {
                asset_id: trajectory.asset_id.clone(),
                risk_trend,
                roi_proxy: round3(-risk_trend),
                causal_snapshot,
            }
        })
        .collect();

    links.sort_by(|left, right| {
        right.roi_proxy.partial_cmp(&left.roi_proxy).unwrap_or(Ordering::Equal)
    });
    links
}

/// Resume el sentimiento de un listado opcional de noticias.
pub fn summarize_news(news_path: Option<&Path>) -> NewsSummary {
    let empty = NewsSummary { total: 0, by_label: BTreeMap::new() };
    let Some(news_path) = news_path else {
        return empty;
    };
    let Ok(raw_document) = std::fs::read_to_string(news_path) else {
        return empty;
    };
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str(&raw_document) else {
        return empty;
    };

    let mut by_label: BTreeMap<String, u64> = BTreeMap::new();
    for item in &items {
        let label = item
            .get("sentiment")
            .or_else(|| item.get("label"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("neutral");
        *by_label.entry(label.to_string()).or_insert(0) += 1;
    }
    NewsSummary { total: items.len() as u64, by_label }
}

/// Artefactos de la vista inversora.
#[derive(Debug, Clone)]
pub struct InvestorArtifacts {
    pub trajectory: Vec<AssetTrajectory>,
    pub roi_linkage: Vec<RoiLink>,
    pub news: NewsSummary,
}

/// Vista completa bajo portón de rol.
pub fn build_investor_view(
    principal: &Principal,
    deduped_records: &[MatchedRecord],
    causal_catalog: &BTreeMap<String, BTreeMap<String, CausalSeries>>,
    news_path: Option<&Path>,
) -> Result<InvestorArtifacts, crate::errors::ProjectionError> {
    principal.require(Role::Investor)?;
    let trajectory = build_risk_trajectory(deduped_records);
    let roi_linkage = build_roi_linkage(&trajectory, causal_catalog);
    Ok(InvestorArtifacts { trajectory, roi_linkage, news: summarize_news(news_path) })
}

/// Media móvil de ventana creciente, redondeada a 3 decimales.
fn rolling_mean(values: &[u64], window: usize) -> Vec<f64> {
    let mut means = Vec::with_capacity(values.len());
    let mut running_sum: u64 = 0;
    let mut queue: std::collections::VecDeque<u64> = std::collections::VecDeque::new();
    for value in values {
        queue.push_back(*value);
        running_sum += value;
        if queue.len() > window {
            running_sum -= queue.pop_front().unwrap_or(0);
        }
        means.push(round3(running_sum as f64 / queue.len() as f64));
    }
    means
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
