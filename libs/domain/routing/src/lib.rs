// [libs/domain/routing/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CHANNEL ROUTER & RATE LIMITER (V6.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ABANICO DE ENTREGA CON CUPOS ESTRICTOS POR CORRIDA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EVERY ATTEMPT LEAVES A TRACE: Cada intento (entregado o
 *    descartado) produce un registro de resultado con su razón exacta.
 * 2. STRICT CAPS: El cupo global se consulta antes que el cupo del
 *    canal; ambos se contabilizan en un único contador por corrida.
 * 3. PLUGGABLE SINKS: La entrega es una capacidad intercambiable
 *    (outbox en disco, webhook HTTP, memoria para el Proving Grounds)
 *    que preserva el contrato (éxito, info, ubicación).
 * =================================================================
 */

pub mod accountant;
pub mod config;
pub mod errors;
pub mod router;
pub mod sinks;

pub use accountant::RateLimitAccountant;
pub use config::{load_channels_config, ChannelConfig, GlobalLimits, RouteConfig, RouteMatch};
pub use errors::{RoutingError, SinkFault};
pub use router::{route_batch, AttemptRecord, RouteDispatcher, RoutingMetrics, RoutingOutcome};
pub use sinks::{AlertSink, DeliveryEngine, DeliveryReceipt, MemorySink, SinkDispatch};
