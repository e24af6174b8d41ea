// [libs/domain/envelope/src/keypath.rs]
/*!
 * =================================================================
 * APARATO: DOTTED KEY-PATH COMPILER (V2.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: COMPILACIÓN DE RUTAS DECLARATIVAS A ACCESORES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. COMPILE ONCE: Las rutas ('subscription_id', 'event.asset_id', ...)
 *    se compilan al cargar la configuración; la resolución por registro
 *    es una caminata sin asignaciones de parseo.
 * 2. TOTAL RESOLUTION: Toda ruta resuelve a texto. Un campo ausente o
 *    una ruta fuera del contrato produce el literal "None", que es un
 *    valor válido y participa del conteo de transiciones de flapping.
 * =================================================================
 */

use crate::event::MatchedRecord;
use serde_json::Value;

/// Ruta punteada compilada sobre `{subscription_id, event:{...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledKeyPath {
    /// La ruta literal `subscription_id`.
    SubscriptionId,
    /// Una ruta `event.<a>.<b>...` descendiendo el sobre.
    EventField(Vec<String>),
    /// Ruta fuera del contrato: resuelve siempre a "None".
    Opaque,
}

impl CompiledKeyPath {
    pub fn compile(raw_path: &str) -> Self {
        if raw_path == "subscription_id" {
            return CompiledKeyPath::SubscriptionId;
        }
        match raw_path.strip_prefix("event.") {
            Some(remainder) if !remainder.is_empty() => CompiledKeyPath::EventField(
                remainder.split('.').map(str::to_string).collect(),
            ),
            _ => CompiledKeyPath::Opaque,
        }
    }

    /// Resuelve la ruta contra un registro emparejado, siempre a texto.
    pub fn resolve(&self, record: &MatchedRecord) -> String {
        match self {
            CompiledKeyPath::SubscriptionId => record.subscription_id.clone(),
            CompiledKeyPath::EventField(segments) => {
                value_as_key_text(record.event.path_value(segments))
            }
            CompiledKeyPath::Opaque => "None".to_string(),
        }
    }
}

/// Compila una lista de rutas declaradas en configuración.
pub fn compile_paths(raw_paths: &[String]) -> Vec<CompiledKeyPath> {
    raw_paths.iter().map(|raw| CompiledKeyPath::compile(raw)).collect()
}

/// Clave compuesta: valores resueltos unidos por `|` en orden declarado.
pub fn compose_key(compiled_paths: &[CompiledKeyPath], record: &MatchedRecord) -> String {
    compiled_paths
        .iter()
        .map(|path| path.resolve(record))
        .collect::<Vec<_>>()
        .join("|")
}

fn value_as_key_text(resolved: Value) -> String {
    match resolved {
        Value::Null => "None".to_string(),
        Value::String(text) => text,
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        composite => composite.to_string(),
    }
}
