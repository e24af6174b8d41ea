// [tests/mirror/libs/domain/projections/public_redaction.test.rs]
/**
 * =================================================================
 * APARATO: PUBLIC REDACTION CERTIFIER (V1.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-PROJECTIONS
 * RESPONSABILIDAD: CLAUSURA DE CAMPOS VISIBLES Y SEUDÓNIMO ESTABLE
 *
 * # Mathematical Proof (Leakage Closure):
 * Para toda tarjeta del feed: keys(item) ⊆ visible_fields ∪ {asset_id
 * sii include_asset_id_field}. La poda ocurre tras el saneado, luego
 * ningún campo del productor puede atravesar la frontera.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::collections::BTreeSet;
    use verdantis_domain_envelope::MatchedRecord;
    use verdantis_domain_projections::{build_public_view, Principal, PublicConfig, Role};

    fn hostile_record() -> MatchedRecord {
        serde_json::from_value(json!({
            "subscription_id": "policy_high_plus",
            "event": {
                "id": "e1",
                "ts": "2026-03-01T10:00:00Z",
                "topic": "policy.enforcement",
                "severity": "high",
                "asset_id": "plant_42",
                "aoi_id": "aoi_2",
                "rule_type": "emissions_exceedance",
                "payload": {"secret": "x", "internal_note": "do not leak"},
                "producer_backdoor": "smuggled"
            }
        }))
        .unwrap()
    }

    /**
     * CERTIFICACIÓN: Escenario canónico de redacción (plant_42 + secreto).
     */
    #[test]
    fn certify_whitelist_closure_against_hostile_payloads() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying public redaction closure...");

        let config: PublicConfig = serde_json::from_value(json!({
            "policy": {
                "min_severity": "medium",
                "max_items": 200,
                "visible_fields": ["ts", "topic", "severity", "region"],
                "anonymize_asset_id": true,
                "include_asset_id_field": false
            },
            "regionalization": {"aoi_to_region": {"aoi_2": "Iberia"}, "fallback_region": "Unknown"}
        }))
        .unwrap();

        let portal = Principal::new("portal", Role::Public);
        let artifacts = build_public_view(&portal, &[hostile_record()], &config).unwrap();

        let exposed: BTreeSet<&str> =
            artifacts.feed[0].keys().map(String::as_str).collect();
        let admitted: BTreeSet<&str> = ["ts", "topic", "severity", "region"].into();
        assert_eq!(exposed, admitted, "L2_REDACTION_LEAK: exposed set drifted.");
        println!("   ✅ Exposed keys == whitelist exactly; payload and asset_id absent.");
    }

    /**
     * CERTIFICACIÓN: El seudónimo viaja junto a la lista blanca (unión).
     */
    #[test]
    fn certify_pseudonym_union_semantics() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying pseudonym union semantics...");

        let config: PublicConfig = serde_json::from_value(json!({
            "policy": {
                "min_severity": "info",
                "visible_fields": ["ts", "severity"],
                "anonymize_asset_id": true,
                "include_asset_id_field": true,
                "asset_pseudonym_prefix": "asset_"
            },
            "regionalization": {}
        }))
        .unwrap();

        let portal = Principal::new("portal", Role::Public);
        let artifacts = build_public_view(&portal, &[hostile_record()], &config).unwrap();
        let item = &artifacts.feed[0];

        let pseudonym = item["asset_id"].as_str().expect("pseudonym missing");
        assert!(pseudonym.starts_with("asset_"));
        assert!(!pseudonym.contains("plant_42"), "L2_REDACTION_LEAK: raw identity leaked.");
        assert_eq!(item.keys().count(), 3, "only ts, severity and asset_id may survive");
        println!("   ✅ Pseudonym rides alongside the whitelist, opaque and prefixed.");
    }
}
