// [apps/alerts-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ALERTS ENGINE LIBRARY (V6.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ETAPAS Y CORRIDA STREAMING
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LIBRARY SYNERGY: El binario es un orquestador puro; la lógica de
 *    etapas vive aquí para su auditoría en el Proving Grounds.
 * 2. DUAL EXECUTION: Cada etapa corre aislada (modo archivo-a-archivo)
 *    o encadenada en la corrida streaming con canales acotados.
 * =================================================================
 */

pub mod commands;
pub mod pipeline;

pub use commands::{
    run_dedupe_stage, run_export_metrics, run_feed_stage, run_filter_stage, run_route_stage,
};
pub use pipeline::{execute_streaming_run, StreamingRunConfig, StreamingRunSummary};
