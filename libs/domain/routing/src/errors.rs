// [libs/domain/routing/src/errors.rs]
/*!
 * =================================================================
 * APARATO: ROUTING ERROR CATALOG (V2.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: FALLOS DE CARGA Y FALLOS DE SUMIDERO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TWO REGIMES: Los fallos de configuración son fatales al cargar;
 *    los fallos de sumidero degradan a intentos descartados con razón
 *    específica y jamás abortan la corrida.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    /// Fallo físico de lectura del archivo de configuración de canales.
    #[error("[L2_ROUTER_IO_FAULT]: CONFIG_UNREADABLE -> {0}")]
    Io(#[from] std::io::Error),

    /// Configuración de rutas ilegible o con pisos fuera de la escalera.
    #[error("[L2_ROUTER_CONFIG_FAULT]: CONFIG_REJECTED -> {0}")]
    Parse(#[from] serde_json::Error),

    /// Dos rutas declaran el mismo identificador.
    #[error("[L2_ROUTER_CONFIG_FAULT]: DUPLICATE_ROUTE_ID -> {0}")]
    DuplicateRoute(String),
}

/// Fallo de un intento de entrega. Se registra, no se propaga.
#[derive(Error, Debug)]
pub enum SinkFault {
    #[error("unknown_channel_type:{0}")]
    UnknownChannelType(String),

    #[error("sink_write_failed")]
    Write(#[from] std::io::Error),

    #[error("webhook_rejected:{0}")]
    WebhookRejected(u16),

    #[error("webhook_unreachable")]
    WebhookUnreachable(#[from] reqwest::Error),
}

impl SinkFault {
    /// Razón compacta para el registro de intento.
    pub fn reason_label(&self) -> String {
        self.to_string()
    }
}
