// [libs/shared/argus/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ARGUS PANOPTIC OBSERVER (V4.0 - SOBERANO)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4/L6)
 * RESPONSABILIDAD: ARRANQUE DEL TRAZADO, MÉTRICAS, BITÁCORA Y COLAPSOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ONE CONTRACT EVERYWHERE: Las líneas de consola en producción y la
 *    bitácora diaria comparten vocabulario ({service, module, msg});
 *    el Panóptico ingiere ambas sin traducción.
 * 2. STAGE COLLAPSE CAPTURE: Un pánico en cualquier etapa del pipeline
 *    (filtros, supresión, enrutamiento, vistas) deja una última línea
 *    con sus coordenadas antes de ceder al hook previo.
 * 3. QUIET EDGES: El ruido del exportador HTTP queda en 'warn'; las
 *    crates del dominio suben a 'debug' sólo en desarrollo.
 * =================================================================
 */

pub mod errors;
pub mod exporter;
pub mod journal;
pub mod metrics;

pub use errors::ArgusError;
pub use exporter::serve_metrics_endpoint;
pub use journal::{append_journal_line, ingest_attempt_results, ingest_audit_requests};
pub use metrics::{collect_pipeline_metrics, render_prometheus_text, write_metrics_textfile, MetricsSources};

use std::panic;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates del dominio que suben a 'debug' durante el desarrollo.
const PIPELINE_CRATES: [&str; 9] = [
    "verdantis_domain_envelope",
    "verdantis_domain_filters",
    "verdantis_domain_dedupe",
    "verdantis_domain_routing",
    "verdantis_domain_projections",
    "verdantis_infra_state",
    "verdantis_shared_argus",
    "verdantis_alerts_engine",
    "verdantis_portal_projector",
];

/// Inicializa el trazado del servicio y la captura de colapsos.
///
/// `RUST_LOG` manda cuando está presente; en su ausencia el dominio del
/// pipeline queda en 'debug' (desarrollo) o 'info' (producción) y el
/// ruido HTTP del exportador en 'warn'.
///
/// # Errors:
/// Entra en pánico si otro suscriptor global ya fue inicializado.
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    let base_registry = tracing_subscriber::registry().with(filter);
    if cfg!(debug_assertions) {
        // Desarrollo: líneas compactas para el operador en terminal.
        base_registry.with(fmt::layer().compact().with_target(false)).init();
    } else {
        // Producción: el mismo contrato JSON plano que la bitácora diaria.
        base_registry.with(fmt::layer().json().flatten_event(true)).init();
    }

    install_collapse_hook(service_name);
    info!("👁️ [ARGUS]: tracing online for '{service_name}', collapse capture armed.");
}

/// Directivas por omisión: dominio arriba, bordes en silencio.
fn default_directives(service_name: &str) -> String {
    let domain_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    let mut directives = vec!["info".to_string()];
    directives.push(format!("{}={domain_level}", service_name.replace('-', "_")));
    for pipeline_crate in PIPELINE_CRATES {
        directives.push(format!("{pipeline_crate}={domain_level}"));
    }
    directives.push("hyper=warn".to_string());
    directives.push("tower_http=warn".to_string());
    directives.join(",")
}

/// Encadena un hook de pánico que registra las coordenadas del colapso
/// con el vocabulario de la bitácora y luego cede al hook previo.
fn install_collapse_hook(service_name: &str) {
    let service_label = service_name.to_string();
    let prior_hook = panic::take_hook();

    panic::set_hook(Box::new(move |collapse| {
        let stage_coordinates = collapse
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_else(|| "unlocated".to_string());

        let collapse_detail = collapse
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| collapse.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("opaque panic payload");

        error!(
            target: "stage_collapse",
            service = %service_label,
            module = %stage_coordinates,
            "💥 [STAGE_COLLAPSE]: {collapse_detail}"
        );

        prior_hook(collapse);
    }));
}
