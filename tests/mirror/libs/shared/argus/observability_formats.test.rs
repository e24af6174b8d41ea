// [tests/mirror/libs/shared/argus/observability_formats.test.rs]
/**
 * =================================================================
 * APARATO: OBSERVABILITY FORMATS CERTIFIER (V1.1)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L4-ARGUS
 * RESPONSABILIDAD: FORMATO DE EXPOSICIÓN Y BITÁCORA ESTRUCTURADA
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};
    use verdantis_shared_argus::{
        append_journal_line, collect_pipeline_metrics, write_metrics_textfile, MetricsSources,
    };

    /**
     * CERTIFICACIÓN: Flujo completo métricas de etapa -> textfile.
     */
    #[test]
    fn certify_stage_metrics_to_textfile_flow() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying metrics textfile flow...");

        let scratch_dir = tempfile::tempdir().unwrap();
        let dedupe_path = scratch_dir.path().join("dedupe_metrics.json");
        std::fs::write(&dedupe_path, json!({"kept": 7, "suppressed": 2}).to_string()).unwrap();

        let sources =
            MetricsSources { dedupe_metrics: Some(dedupe_path), ..MetricsSources::default() };
        let series = collect_pipeline_metrics(&sources);

        let textfile_path = scratch_dir.path().join("metrics.prom");
        write_metrics_textfile(&textfile_path, &series).unwrap();

        let exposition = std::fs::read_to_string(&textfile_path).unwrap();
        assert!(exposition.contains("verdantis_dedupe_kept 7.000000"));
        assert!(exposition.contains("verdantis_dedupe_suppressed 2.000000"));
        assert!(exposition.contains("# TYPE verdantis_dedupe_kept gauge"));
        assert!(exposition.ends_with('\n'), "exposition must end with newline");
        println!("   ✅ Exposition format certified (HELP/TYPE + flat series).");
    }

    /**
     * CERTIFICACIÓN: Dos líneas del mismo día comparten archivo.
     */
    #[test]
    fn certify_daily_journal_accumulation() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying daily journal accumulation...");

        let scratch_dir = tempfile::tempdir().unwrap();
        let first_path = append_journal_line(
            scratch_dir.path(),
            "info",
            "alerts",
            "filters",
            "stage_complete",
            Map::new(),
        )
        .unwrap();
        let second_path = append_journal_line(
            scratch_dir.path(),
            "warn",
            "alerts",
            "dedupe",
            "state_degraded",
            Map::new(),
        )
        .unwrap();

        assert_eq!(first_path, second_path, "same-day lines must share the file");
        let lines: Vec<Value> = std::fs::read_to_string(&first_path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["level"], "warn");
        println!("   ✅ Two structured lines accumulated in one daily file.");
    }
}
