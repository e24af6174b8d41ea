// [apps/portal-projector/src/main.rs]
/**
 * =================================================================
 * APARATO: PORTAL PROJECTOR SHELL (V5.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ARGUMENTOS Y PORTÓN DE PRINCIPAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. VERIFIED PRINCIPAL: El shell recibe el par {sub, role} ya
 *    verificado por el colaborador de autenticación; la emisión de
 *    tokens queda fuera de este binario.
 * 2. LIBRARY SYNERGY: Binario orquestador puro sobre
 *    'verdantis_portal_projector'.
 * =================================================================
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use verdantis_domain_projections::{Principal, Role};
use verdantis_portal_projector::{
    run_investor_build, run_public_build, run_regulator_build, run_request_audit,
};
use verdantis_shared_argus::init_tracing;

/// Configuración de mando del proyector de portales.
#[derive(Parser, Debug)]
#[command(
    name = "portal-projector",
    version = "5.0",
    about = "Proyector de portales Verdantis: vistas regulador/inversor/público."
)]
struct CommandArguments {
    /// Sujeto del principal verificado.
    #[arg(long, global = true, default_value = "operator")]
    subject: String,

    /// Rol del principal verificado (regulator | investor | public).
    #[arg(long, global = true, default_value = "public")]
    role: Role,

    #[command(subcommand)]
    directive: ProjectorDirective,
}

#[derive(Subcommand, Debug)]
enum ProjectorDirective {
    /// Construye violaciones abiertas + heatmap (exige rol 'regulator').
    RegulatorBuild {
        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        deduped: PathBuf,

        #[arg(long)]
        assets_geojson: Option<PathBuf>,

        #[arg(long)]
        bundles_index: Option<PathBuf>,

        #[arg(long, default_value = "data/processed/portals/regulator")]
        out_dir: PathBuf,
    },

    /// Encola una solicitud de paquete de auditoría (exige rol 'regulator').
    RequestAudit {
        #[arg(long)]
        asset_id: Option<String>,

        #[arg(long)]
        bundle_id: Option<String>,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long, default_value = "data/processed/portals/regulator/audit_requests.json")]
        out_log: PathBuf,
    },

    /// Construye trayectoria de riesgo + eslabón ROI (exige rol 'investor').
    InvestorBuild {
        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        deduped: PathBuf,

        #[arg(long)]
        causal_dir: Option<PathBuf>,

        #[arg(long)]
        news: Option<PathBuf>,

        #[arg(long, default_value = "data/processed/portals/investor")]
        out_dir: PathBuf,
    },

    /// Construye el feed público enmascarado (exige rol 'public').
    PublicBuild {
        #[arg(long, default_value = "data/processed/alerts/filtered_events_deduped.json")]
        deduped: PathBuf,

        #[arg(long, value_name = "FILE_PATH")]
        config: PathBuf,

        #[arg(long, default_value = "data/processed/portals/public")]
        out_dir: PathBuf,
    },
}

/**
 * Punto de ignición del binario ejecutable.
 */
fn main() -> Result<()> {
    // 1. NIVELACIÓN DEL ENTORNO Y DEL SISTEMA NERVIOSO
    dotenvy::dotenv().ok();
    init_tracing("portal-projector");

    // 2. PARSEO DE DIRECTIVAS Y FORJA DEL PRINCIPAL
    let cli_configuration = CommandArguments::parse();
    let principal = Principal::new(cli_configuration.subject.clone(), cli_configuration.role);

    // 3. DESPACHO DE LA VISTA SOLICITADA (el portón vive en el dominio)
    match cli_configuration.directive {
        ProjectorDirective::RegulatorBuild { deduped, assets_geojson, bundles_index, out_dir } => {
            let (violations, heatmap_assets) = run_regulator_build(
                &principal,
                &deduped,
                assets_geojson.as_deref(),
                bundles_index.as_deref(),
                &out_dir,
            )?;
            info!(
                "✅ [SHELL]: regulator-build complete (violations={violations}, heatmap_assets={heatmap_assets})."
            );
        }
        ProjectorDirective::RequestAudit { asset_id, bundle_id, reason, out_log } => {
            let request_identifier = run_request_audit(
                &principal,
                asset_id.as_deref(),
                bundle_id.as_deref(),
                reason.as_deref(),
                &out_log,
            )?;
            info!("✅ [SHELL]: request-audit queued ({request_identifier}).");
        }
        ProjectorDirective::InvestorBuild { deduped, causal_dir, news, out_dir } => {
            let (trajectories, causal_assets, news_items) = run_investor_build(
                &principal,
                &deduped,
                causal_dir.as_deref(),
                news.as_deref(),
                &out_dir,
            )?;
            info!(
                "✅ [SHELL]: investor-build complete (trajectories={trajectories}, causal={causal_assets}, news={news_items})."
            );
        }
        ProjectorDirective::PublicBuild { deduped, config, out_dir } => {
            let (feed_items, regions) = run_public_build(&principal, &deduped, &config, &out_dir)?;
            info!("✅ [SHELL]: public-build complete (items={feed_items}, regions={regions}).");
        }
    }

    Ok(())
}
