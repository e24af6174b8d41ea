// [tests/mirror/libs/domain/routing/outbox_idempotence.test.rs]
/**
 * =================================================================
 * APARATO: OUTBOX IDEMPOTENCE CERTIFIER (V1.1)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-ROUTING
 * RESPONSABILIDAD: RE-EJECUCIÓN SEGURA SOBRE EL MISMO OUTBOX
 *
 * # Mathematical Proof (Filename Determinism):
 * El nombre de archivo es f(event_id, subscription_id); dos corridas
 * sobre la misma entrada escriben el mismo conjunto de rutas físicas,
 * luego la re-ejecución sobrescribe en vez de duplicar.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::collections::BTreeSet;
    use std::time::Duration;
    use verdantis_domain_envelope::MatchedRecord;
    use verdantis_domain_routing::{route_batch, AlertSink, GlobalLimits, RouteConfig};

    /**
     * CERTIFICACIÓN: Dos corridas cristalizan el mismo conjunto de
     * artefactos, idénticos módulo el sello volátil 'ts'.
     */
    #[tokio::test]
    async fn certify_rerun_overwrites_instead_of_duplicating() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying outbox idempotence across reruns...");

        let outbox_root = tempfile::tempdir().unwrap();
        let routes: Vec<RouteConfig> = vec![serde_json::from_value(json!({
            "id": "default_route",
            "match": {},
            "channels": [{
                "type": "webhook",
                "id": "hook_1",
                "outbox_dir": outbox_root.path().join("hooks")
            }]
        }))
        .unwrap()];

        let records: Vec<MatchedRecord> = (0..3)
            .map(|index| {
                serde_json::from_value(json!({
                    "subscription_id": "policy_high_plus",
                    "event": {"id": format!("e{index}"), "topic": "policy.enforcement"}
                }))
                .unwrap()
            })
            .collect();

        let mut crystallized_sets: Vec<BTreeSet<String>> = Vec::new();
        let mut stable_payloads: Vec<Vec<Value>> = Vec::new();

        for run_index in 0..2 {
            let outcome = route_batch(
                &records,
                &routes,
                &GlobalLimits::default(),
                &AlertSink::transport(),
                Duration::from_secs(5),
            )
            .await;
            assert_eq!(outcome.metrics.sent, 3, "run {run_index} delivery drift");

            let mut file_names = BTreeSet::new();
            let mut payloads = Vec::new();
            for entry in std::fs::read_dir(outbox_root.path().join("hooks")).unwrap() {
                let entry = entry.unwrap();
                file_names.insert(entry.file_name().to_string_lossy().to_string());
                let mut payload: Value =
                    serde_json::from_str(&std::fs::read_to_string(entry.path()).unwrap()).unwrap();
                payload.as_object_mut().unwrap().remove("ts");
                payloads.push(payload);
            }
            payloads.sort_by_key(|payload| payload["event"]["id"].to_string());
            crystallized_sets.push(file_names);
            stable_payloads.push(payloads);
        }

        assert_eq!(crystallized_sets[0], crystallized_sets[1], "filename set drift");
        assert_eq!(crystallized_sets[0].len(), 3, "rerun duplicated artifacts");
        assert_eq!(stable_payloads[0], stable_payloads[1], "payload drift modulo 'ts'");
        println!("   ✅ Same 3 artifacts, stable payloads. Rerun is safe.");
    }
}
