// [tests/mirror/libs/domain/envelope/envelope_integrity.test.rs]
/**
 * =================================================================
 * APARATO: ENVELOPE INTEGRITY CERTIFIER (V1.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-ENVELOPE
 * RESPONSABILIDAD: CERTIFICACIÓN DE INGESTA LAXA Y TRÁNSITO SIN PÉRDIDA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LENIENT INGESTION: Las entradas que no son objetos se descartan
 *    y quedan contabilizadas, nunca abortan la corrida.
 * 2. LOSSLESS TRANSIT: Los campos del productor fuera del contrato
 *    sobreviven el ciclo completo de serialización.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use std::io::Write;
    use verdantis_domain_envelope::event::{load_events, load_matched};

    fn materialize(document: &str) -> tempfile::NamedTempFile {
        let mut scratch_file = tempfile::NamedTempFile::new().expect("tempfile denied");
        scratch_file.write_all(document.as_bytes()).expect("write denied");
        scratch_file
    }

    /**
     * CERTIFICACIÓN: Ingesta de un lote mixto con entradas corruptas.
     */
    #[test]
    fn certify_lenient_batch_ingestion() {
        println!("\n🧪 [PROVING_GROUNDS]: Auditing lenient event ingestion...");

        let source = materialize(
            r#"[
                {"id": "e1", "topic": "policy.enforcement", "severity": "high"},
                42,
                "rogue-entry",
                {"id": "e2", "topic": "sat.change", "delta": {"ndvi": 0.15}}
            ]"#,
        );

        let batch = load_events(source.path()).expect("batch ingestion collapsed");
        assert_eq!(batch.events.len(), 2, "L2_INGEST_DRIFT: surviving event count wrong.");
        assert_eq!(batch.malformed_events, 2, "L2_INGEST_DRIFT: malformed counter wrong.");
        println!("   ✅ Phase 1: 2 survivors, 2 malformed entries quarantined.");

        let non_list = materialize(r#"{"events": []}"#);
        assert!(load_events(non_list.path()).is_err(), "L2_SHAPE_LEAK: non-list accepted.");
        println!("   ✅ Phase 2: non-list document rejected at the boundary.");
    }

    /**
     * CERTIFICACIÓN: Los registros emparejados incompletos se descartan.
     */
    #[test]
    fn certify_matched_record_shape_guard() {
        println!("\n🧪 [PROVING_GROUNDS]: Auditing matched-record shape guard...");

        let source = materialize(
            r#"[
                {"subscription_id": "s1", "event": {"id": "e1"}},
                {"subscription_id": "orphan-without-event"},
                {"event": {"id": "e2"}}
            ]"#,
        );

        let records = load_matched(source.path()).expect("matched ingestion collapsed");
        assert_eq!(records.len(), 1, "L2_SHAPE_DRIFT: incomplete records leaked through.");
        assert_eq!(records[0].subscription_id, "s1");
        println!("   ✅ Incomplete records quarantined. Contract sealed.");
    }
}
