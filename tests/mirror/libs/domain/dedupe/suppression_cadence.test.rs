// [tests/mirror/libs/domain/dedupe/suppression_cadence.test.rs]
/**
 * =================================================================
 * APARATO: SUPPRESSION CADENCE CERTIFIER (V1.4)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-DEDUPE
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA CADENCIA TEMPORAL ENTRE CORRIDAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CADENCE PARITY: T emite; T+60s 'cooldown'; T+400s 'duplicate_ttl';
 *    T+3700s re-emite. La evidencia reproduce el corpus canónico.
 * 2. CROSS-RUN MEMORY: El estado cristalizado de una corrida gobierna
 *    los veredictos de la siguiente tras un ciclo serde completo.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::json;
    use verdantis_domain_dedupe::{
        DedupeConfig, DedupeState, DedupeSuppressor, SuppressReason,
    };
    use verdantis_domain_envelope::MatchedRecord;

    fn record(event_id: &str, timestamp: &str) -> MatchedRecord {
        serde_json::from_value(json!({
            "subscription_id": "policy_high_plus",
            "event": {
                "id": event_id,
                "ts": timestamp,
                "topic": "policy.enforcement",
                "severity": "high",
                "asset_id": "a1"
            }
        }))
        .unwrap()
    }

    fn config() -> DedupeConfig {
        serde_json::from_value(json!({
            "ttl_seconds": 3600,
            "min_interval_seconds": 300,
            "key_fields": ["subscription_id", "event.asset_id"],
            "flap": {"enabled": false}
        }))
        .unwrap()
    }

    /**
     * CERTIFICACIÓN: Cadencia canónica T / T+60 / T+400 / T+3700.
     */
    #[test]
    fn certify_canonical_cadence() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying suppression cadence...");

        let mut suppressor = DedupeSuppressor::new(config(), DedupeState::default());

        assert_eq!(suppressor.assess(&record("e1", "2026-03-01T10:00:00Z")), None);
        println!("   ✅ Phase 1 (T): emitted.");

        assert_eq!(
            suppressor.assess(&record("e2", "2026-03-01T10:01:00Z")),
            Some(SuppressReason::Cooldown)
        );
        println!("   ✅ Phase 2 (T+60s): suppressed with 'cooldown'.");

        assert_eq!(
            suppressor.assess(&record("e3", "2026-03-01T10:06:40Z")),
            Some(SuppressReason::DuplicateTtl)
        );
        println!("   ✅ Phase 3 (T+400s): suppressed with 'duplicate_ttl'.");

        assert_eq!(suppressor.assess(&record("e4", "2026-03-01T11:01:40Z")), None);
        println!("   ✅ Phase 4 (T+3700s): TTL elapsed, emitted again.");
    }

    /**
     * CERTIFICACIÓN: La memoria sobrevive el ciclo serde entre corridas.
     */
    #[test]
    fn certify_cross_run_memory() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying cross-run suppression memory...");

        let mut first_run = DedupeSuppressor::new(config(), DedupeState::default());
        assert_eq!(first_run.assess(&record("e1", "2026-03-01T10:00:00Z")), None);

        // Cristalización y recuperación (simula el ciclo a disco)
        let crystallized = serde_json::to_string(&first_run.into_state()).unwrap();
        let recovered: DedupeState = serde_json::from_str(&crystallized).unwrap();
        assert_eq!(recovered.version, 1);

        let mut second_run = DedupeSuppressor::new(config(), recovered);
        assert_eq!(
            second_run.assess(&record("e5", "2026-03-01T10:02:00Z")),
            Some(SuppressReason::Cooldown),
            "L2_MEMORY_LOSS: prior emission forgotten across runs."
        );
        println!("   ✅ Prior emission remembered after serde roundtrip.");
    }
}
