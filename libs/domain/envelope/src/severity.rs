// [libs/domain/envelope/src/severity.rs]
/*!
 * =================================================================
 * APARATO: SEVERITY LADDER (V2.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ORDEN TOTAL DE SEVERIDAD Y PESOS DE RIESGO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DUAL REGIME: Las etiquetas de los eventos son laxas (desconocido
 *    colapsa al rango 0), mientras que los pisos de configuración son
 *    estrictos y rechazan etiquetas fuera de la escalera al cargar.
 * 2. RISK ARITHMETIC: Pesos de riesgo {low:1, medium:2, high:4,
 *    critical:8} compartidos por el heatmap regulador y la trayectoria
 *    de riesgo del inversor.
 *
 * # Mathematical Proof (Ladder Monotonicity):
 * Dado que 'severity_at_least' compara rangos enteros 0..4 con '>=',
 * la relación es reflexiva y transitiva; el piso 'info' (rango 0)
 * admite cualquier evento.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Escalera total: `info < low < medium < high < critical`.
pub const SEVERITY_LADDER: [&str; 5] = ["info", "low", "medium", "high", "critical"];

/// Piso de severidad declarado en configuración (régimen estricto).
///
/// Los eventos transportan su severidad como texto libre; este tipo sólo
/// existe en los contratos de configuración, donde una etiqueta fuera de
/// la escalera debe abortar la carga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFloor {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityFloor {
    /// Rango entero del piso dentro de la escalera (0..4).
    pub fn rank(self) -> u8 {
        match self {
            SeverityFloor::Info => 0,
            SeverityFloor::Low => 1,
            SeverityFloor::Medium => 2,
            SeverityFloor::High => 3,
            SeverityFloor::Critical => 4,
        }
    }

    pub fn as_label(self) -> &'static str {
        SEVERITY_LADDER[self.rank() as usize]
    }
}

impl fmt::Display for SeverityFloor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_label())
    }
}

impl FromStr for SeverityFloor {
    type Err = String;

    fn from_str(raw_label: &str) -> Result<Self, Self::Err> {
        match raw_label {
            "info" => Ok(SeverityFloor::Info),
            "low" => Ok(SeverityFloor::Low),
            "medium" => Ok(SeverityFloor::Medium),
            "high" => Ok(SeverityFloor::High),
            "critical" => Ok(SeverityFloor::Critical),
            other => Err(format!("unknown severity label '{other}'")),
        }
    }
}

/// Rango laxo de una etiqueta de evento: desconocido colapsa a 0 (`info`).
pub fn severity_rank(event_label: &str) -> u8 {
    match event_label {
        "low" => 1,
        "medium" => 2,
        "high" => 3,
        "critical" => 4,
        _ => 0,
    }
}

/// `true` cuando el rango del evento alcanza o supera el piso configurado.
pub fn severity_at_least(event_label: &str, floor: SeverityFloor) -> bool {
    severity_rank(event_label) >= floor.rank()
}

/// Peso de riesgo de la etiqueta. `info` y las etiquetas desconocidas
/// contribuyen 0 a cualquier agregado.
pub fn severity_weight(event_label: &str) -> u32 {
    match event_label {
        "low" => 1,
        "medium" => 2,
        "high" => 4,
        "critical" => 8,
        _ => 0,
    }
}
