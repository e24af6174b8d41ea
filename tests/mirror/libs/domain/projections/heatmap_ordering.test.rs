// [tests/mirror/libs/domain/projections/heatmap_ordering.test.rs]
/**
 * =================================================================
 * APARATO: HEATMAP ORDERING CERTIFIER (V1.1)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-PROJECTIONS
 * RESPONSABILIDAD: SUMA EXACTA DE PESOS Y DESEMPATE POR CONTEO
 *
 * # Mathematical Proof (Score Determinism):
 * risk_score(a) = Σ weight(severity(e)) sobre los eventos del activo a;
 * con pesos {low:1, medium:2, high:4, critical:8} el corpus canónico
 * produce a1=8 (2x high), a2=8 (1x critical), a3=5 (5x low) y el
 * desempate por open_count ordena a1 > a2 > a3.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::collections::BTreeMap;
    use verdantis_domain_envelope::MatchedRecord;
    use verdantis_domain_projections::{build_heatmap, load_asset_locations};

    fn record(asset_id: &str, severity: &str, timestamp: &str) -> MatchedRecord {
        serde_json::from_value(json!({
            "subscription_id": "s",
            "event": {
                "id": format!("{asset_id}-{severity}-{timestamp}"),
                "ts": timestamp,
                "topic": "policy.enforcement",
                "severity": severity,
                "asset_id": asset_id
            }
        }))
        .unwrap()
    }

    /**
     * CERTIFICACIÓN: Corpus canónico a1/a2/a3 con desempate por conteo.
     */
    #[test]
    fn certify_canonical_ranking_with_tiebreak() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying heatmap canonical ranking...");

        let mut corpus = vec![
            record("a1", "high", "2026-03-01T10:00:00Z"),
            record("a1", "high", "2026-03-01T11:00:00Z"),
            record("a2", "critical", "2026-03-01T12:00:00Z"),
        ];
        for minute in 0..5 {
            corpus.push(record("a3", "low", &format!("2026-03-01T10:0{minute}:00Z")));
        }

        let cells = build_heatmap(&corpus, &BTreeMap::new());
        let ranking: Vec<(&str, u64, u64)> = cells
            .iter()
            .map(|cell| (cell.asset_id.as_str(), cell.risk_score, cell.open_count))
            .collect();
        assert_eq!(
            ranking,
            vec![("a1", 8, 2), ("a2", 8, 1), ("a3", 5, 5)],
            "L2_HEATMAP_DRIFT: canonical ranking corrupted."
        );
        assert_eq!(cells[0].last_ts, "2026-03-01T11:00:00.000000Z");
        println!("   ✅ Ranking a1(8,2) > a2(8,1) > a3(5,5) certified.");
    }

    /**
     * CERTIFICACIÓN: Enriquecimiento geográfico opcional y nulos francos.
     */
    #[test]
    fn certify_optional_location_enrichment() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying optional geo enrichment...");

        let scratch_dir = tempfile::tempdir().unwrap();
        let geojson_path = scratch_dir.path().join("assets.geojson");
        std::fs::write(
            &geojson_path,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "properties": {"asset_id": "a1", "lat": 40.0, "lon": -3.7}
                }]
            })
            .to_string(),
        )
        .unwrap();

        let corpus =
            vec![record("a1", "high", "2026-03-01T10:00:00Z"), record("a2", "low", "2026-03-01T10:00:00Z")];
        let locations = load_asset_locations(Some(&geojson_path));
        let cells = build_heatmap(&corpus, &locations);

        let located = cells.iter().find(|cell| cell.asset_id == "a1").unwrap();
        assert_eq!(located.lat, Some(40.0));
        assert_eq!(located.lon, Some(-3.7));

        let unlocated = cells.iter().find(|cell| cell.asset_id == "a2").unwrap();
        assert_eq!(unlocated.lat, None, "missing location must stay null");
        println!("   ✅ Located a1, frank nulls for a2.");
    }
}
