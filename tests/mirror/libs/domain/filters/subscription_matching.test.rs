// [tests/mirror/libs/domain/filters/subscription_matching.test.rs]
/**
 * =================================================================
 * APARATO: SUBSCRIPTION MATCHING CERTIFIER (V1.3)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-FILTERS
 * RESPONSABILIDAD: CERTIFICACIÓN DEL ESCENARIO CANÓNICO DE FILTRADO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SCENARIO PARITY: Reproduce el corpus canónico de tres eventos y
 *    tres suscripciones y exige el veredicto exacto [e1, e3].
 * 2. LOAD-TIME SHIELD: Un catálogo con ids duplicados o pisos fuera de
 *    la escalera jamás llega a evaluar un predicado.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use std::io::Write;
    use verdantis_domain_envelope::event::load_events;
    use verdantis_domain_filters::{apply_filters, load_subscriptions};

    const CANONICAL_EVENTS: &str = r#"[
        {"id": "e1", "ts": "2026-03-01T10:00:00Z", "topic": "policy.enforcement",
         "severity": "high", "asset_id": "a1", "rule_type": "emissions_exceedance"},
        {"id": "e2", "ts": "2026-03-01T10:05:00Z", "topic": "sat.change",
         "severity": "low", "aoi_id": "aoi_2", "delta": {"ndvi": 0.15}},
        {"id": "e3", "ts": "2026-03-01T10:10:00Z", "topic": "zk.verify",
         "severity": "low", "asset_id": "a2"}
    ]"#;

    const CANONICAL_CATALOG: &str = r#"{"subscriptions": [
        {"id": "policy_high_plus", "topics": ["policy.enforcement"],
         "severity_at_least": "high", "rule_types": ["emissions_exceedance"]},
        {"id": "sat_ndvi_drop", "topics": ["sat.change"], "severity_at_least": "medium",
         "aoi_ids": ["aoi_2"], "min_delta": {"ndvi": 0.2}},
        {"id": "zk_attest", "topics": ["zk.issue", "zk.verify"], "severity_at_least": "low"}
    ]}"#;

    fn materialize(document: &str) -> tempfile::NamedTempFile {
        let mut scratch_file = tempfile::NamedTempFile::new().expect("tempfile denied");
        scratch_file.write_all(document.as_bytes()).expect("write denied");
        scratch_file
    }

    /**
     * CERTIFICACIÓN: Corpus canónico -> emparejados [e1, e3], 1 sin destino.
     */
    #[test]
    fn certify_canonical_three_event_scenario() {
        println!("\n🧪 [PROVING_GROUNDS]: Running canonical filter scenario...");

        let events_file = materialize(CANONICAL_EVENTS);
        let catalog_file = materialize(CANONICAL_CATALOG);

        let batch = load_events(events_file.path()).expect("event ingestion collapsed");
        let catalog = load_subscriptions(catalog_file.path()).expect("catalog rejected");

        let outcome = apply_filters(&batch.events, &catalog, batch.malformed_events);

        let matched_ids: Vec<&str> = outcome
            .matched
            .iter()
            .map(|record| record.event.id.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(matched_ids, vec!["e1", "e3"], "L2_FILTER_DRIFT: verdict mismatch.");
        assert_eq!(outcome.metrics.unmatched, 1);
        assert_eq!(outcome.metrics.per_subscription["policy_high_plus"], 1);
        assert_eq!(outcome.metrics.per_subscription["sat_ndvi_drop"], 0);
        assert_eq!(outcome.metrics.per_subscription["zk_attest"], 1);
        println!("   ✅ Verdict [e1, e3] certified with unmatched=1.");
    }

    /**
     * CERTIFICACIÓN: Escudo de carga ante catálogos corruptos.
     */
    #[test]
    fn certify_load_time_validation_shield() {
        println!("\n🧪 [PROVING_GROUNDS]: Auditing load-time validation shield...");

        let duplicated = materialize(
            r#"{"subscriptions": [{"id": "twin"}, {"id": "twin"}]}"#,
        );
        assert!(load_subscriptions(duplicated.path()).is_err(), "duplicate id accepted");
        println!("   ✅ Phase 1: duplicate subscription id rejected.");

        let alien_floor = materialize(
            r#"{"subscriptions": [{"id": "s", "severity_at_least": "apocalyptic"}]}"#,
        );
        assert!(load_subscriptions(alien_floor.path()).is_err(), "alien floor accepted");
        println!("   ✅ Phase 2: severity outside the ladder rejected.");
    }
}
