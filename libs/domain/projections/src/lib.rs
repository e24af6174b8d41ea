// [libs/domain/projections/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ROLE-SCOPED PROJECTION BUILDERS (V5.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: VISTAS PURAS POR ROL SOBRE EL FLUJO DEDUPADO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PURITY CONTRACT: Cada constructor es función pura de sus entradas
 *    (flujo dedupado + enriquecimiento opcional); re-ejecutar produce
 *    bytes idénticos módulo el sello 'built_at' de las métricas.
 * 2. ROLE GATE FIRST: El principal verificado {sub, role} se exige
 *    antes de tocar cualquier entrada; un rol ajeno es fatal inmediato.
 * 3. REDACTION AT THE BOUNDARY: La vista pública poda todo campo fuera
 *    de la lista visible después de sanear, de modo que una fuga desde
 *    cargas del productor es estructuralmente imposible.
 * =================================================================
 */

pub mod enrichment;
pub mod errors;
pub mod feed;
pub mod investor;
pub mod principal;
pub mod public;
pub mod regulator;

pub use enrichment::{load_asset_locations, load_bundles_index, load_causal_series, GeoPoint};
pub use errors::ProjectionError;
pub use feed::{build_alerts_feed, render_alert_title, FeedItem, FeedMetrics};
pub use investor::{
    build_investor_view, build_risk_trajectory, build_roi_linkage, summarize_news,
    AssetTrajectory, DailyRiskPoint, InvestorArtifacts, NewsSummary, RoiLink,
};
pub use principal::{Principal, Role};
pub use public::{build_public_view, load_public_config, PublicArtifacts, PublicConfig};
pub use regulator::{
    audit_request_record, build_heatmap, build_open_violations, build_regulator_view,
    HeatmapCell, OpenViolation, RegulatorArtifacts,
};
