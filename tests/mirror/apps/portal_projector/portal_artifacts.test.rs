// [tests/mirror/apps/portal_projector/portal_artifacts.test.rs]
/**
 * =================================================================
 * APARATO: PORTAL ARTIFACTS CERTIFIER (V1.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L4-PROJECTOR
 * RESPONSABILIDAD: PORTÓN DE ROLES Y TRIPLETA DE ARTEFACTOS POR VISTA
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};
    use verdantis_domain_projections::{Principal, Role};
    use verdantis_portal_projector::{
        run_investor_build, run_public_build, run_regulator_build, run_request_audit,
    };

    fn materialize_deduped(root: &Path) -> PathBuf {
        let deduped_path = root.join("filtered_events_deduped.json");
        std::fs::write(
            &deduped_path,
            json!([
                {"subscription_id": "policy_high_plus", "event": {
                    "id": "e1", "ts": "2026-03-01T10:00:00Z", "topic": "policy.enforcement",
                    "severity": "high", "asset_id": "a1", "aoi_id": "aoi_2",
                    "acknowledged": false, "payload": {"secret": "x"}}},
                {"subscription_id": "sat_watch", "event": {
                    "id": "e2", "ts": "2026-03-02T10:00:00Z", "topic": "sat.change",
                    "severity": "medium", "asset_id": "a1", "aoi_id": "aoi_2"}}
            ])
            .to_string(),
        )
        .unwrap();
        deduped_path
    }

    /**
     * CERTIFICACIÓN: El portón rechaza roles ajenos antes de leer nada.
     */
    #[test]
    fn certify_role_gates_reject_foreign_principals() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying role gates...");

        let scratch_dir = tempfile::tempdir().unwrap();
        let deduped_path = materialize_deduped(scratch_dir.path());
        let out_dir = scratch_dir.path().join("out");

        let tourist = Principal::new("curioso", Role::Public);
        assert!(
            run_regulator_build(&tourist, &deduped_path, None, None, &out_dir).is_err(),
            "public principal breached the regulator view"
        );
        assert!(
            run_investor_build(&tourist, &deduped_path, None, None, &out_dir).is_err(),
            "public principal breached the investor view"
        );
        assert!(
            run_request_audit(&tourist, Some("a1"), None, None, &out_dir.join("ledger.json"))
                .is_err(),
            "public principal queued an audit request"
        );
        println!("   ✅ All foreign principals rejected before any I/O.");
    }

    /**
     * CERTIFICACIÓN: Cada vista cristaliza su tripleta con metrics sellado.
     */
    #[test]
    fn certify_artifact_triplets_per_view() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying artifact triplets...");

        let scratch_dir = tempfile::tempdir().unwrap();
        let root = scratch_dir.path();
        let deduped_path = materialize_deduped(root);

        // Vista reguladora
        let regulator = Principal::new("ana.reguladora", Role::Regulator);
        let regulator_dir = root.join("regulator");
        let (violations, heatmap_assets) =
            run_regulator_build(&regulator, &deduped_path, None, None, &regulator_dir).unwrap();
        assert_eq!((violations, heatmap_assets), (1, 1));
        for artifact in ["open_violations.json", "heatmap.json", "metrics.json"] {
            assert!(regulator_dir.join(artifact).exists(), "missing {artifact}");
        }
        let regulator_metrics: Value = serde_json::from_str(
            &std::fs::read_to_string(regulator_dir.join("metrics.json")).unwrap(),
        )
        .unwrap();
        assert!(regulator_metrics["built_at"].is_string());
        println!("   ✅ Regulator triplet sealed (violations=1, heatmap=1).");

        // Bitácora de auditoría append-only
        let ledger_path = regulator_dir.join("audit_requests.json");
        let first_request =
            run_request_audit(&regulator, Some("a1"), None, Some("review"), &ledger_path).unwrap();
        run_request_audit(&regulator, None, Some("b-9"), None, &ledger_path).unwrap();
        let ledger: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&ledger_path).unwrap()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0]["request_id"], first_request);
        assert_eq!(ledger[1]["status"], "queued");
        println!("   ✅ Audit ledger preserved prior history on append.");

        // Vista inversora
        let investor = Principal::new("ivan.inversor", Role::Investor);
        let investor_dir = root.join("investor");
        let (trajectories, _, news_items) =
            run_investor_build(&investor, &deduped_path, None, None, &investor_dir).unwrap();
        assert_eq!(trajectories, 1);
        assert_eq!(news_items, 0);
        for artifact in
            ["risk_trajectory.json", "esg_roi_linkage.json", "news_sentiment.json", "metrics.json"]
        {
            assert!(investor_dir.join(artifact).exists(), "missing {artifact}");
        }
        println!("   ✅ Investor artifacts sealed (trajectories=1).");

        // Vista pública
        let config_path = root.join("public_config.json");
        std::fs::write(
            &config_path,
            json!({
                "policy": {"min_severity": "medium",
                            "visible_fields": ["ts", "topic", "severity", "region"],
                            "include_asset_id_field": false},
                "regionalization": {"aoi_to_region": {"aoi_2": "Iberia"},
                                     "fallback_region": "Unknown"}
            })
            .to_string(),
        )
        .unwrap();
        let portal = Principal::new("portal", Role::Public);
        let public_dir = root.join("public");
        let (feed_items, regions) =
            run_public_build(&portal, &deduped_path, &config_path, &public_dir).unwrap();
        assert_eq!((feed_items, regions), (2, 1));

        let feed: Vec<Value> = serde_json::from_str(
            &std::fs::read_to_string(public_dir.join("public_feed.json")).unwrap(),
        )
        .unwrap();
        for item in &feed {
            assert!(item.get("payload").is_none(), "payload leaked into public feed");
            assert!(item.get("asset_id").is_none(), "asset_id leaked into public feed");
        }
        println!("   ✅ Public triplet sealed, redaction closure held (items=2).");
    }
}
