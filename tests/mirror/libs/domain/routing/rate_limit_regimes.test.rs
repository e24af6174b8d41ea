// [tests/mirror/libs/domain/routing/rate_limit_regimes.test.rs]
/**
 * =================================================================
 * APARATO: RATE LIMIT REGIMES CERTIFIER (V1.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-ROUTING
 * RESPONSABILIDAD: CERTIFICACIÓN DE LOS DOS REGÍMENES DE CUPO CANÓNICOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CHANNEL REGIME: 10 registros, canal con cupo 3, global 5 ->
 *    exactamente 3 entregados y 7 descartados por canal.
 * 2. GLOBAL REGIME: canal con cupo 10, global 5 -> exactamente 5
 *    entregados y 5 descartados por cupo global.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::time::Duration;
    use verdantis_domain_envelope::MatchedRecord;
    use verdantis_domain_routing::{
        route_batch, AlertSink, GlobalLimits, MemorySink, RouteConfig,
    };

    fn ten_records() -> Vec<MatchedRecord> {
        (0..10)
            .map(|index| {
                serde_json::from_value(json!({
                    "subscription_id": "policy_high_plus",
                    "event": {
                        "id": format!("e{index}"),
                        "topic": "policy.enforcement",
                        "severity": "high"
                    }
                }))
                .unwrap()
            })
            .collect()
    }

    fn route_with_channel_cap(channel_cap: u64) -> Vec<RouteConfig> {
        vec![serde_json::from_value(json!({
            "id": "default_route",
            "match": {},
            "channels": [{
                "type": "webhook",
                "id": "hook_1",
                "outbox_dir": "unused",
                "max_per_run": channel_cap
            }]
        }))
        .unwrap()]
    }

    /**
     * CERTIFICACIÓN: El cupo del canal gobierna cuando es el más estricto.
     */
    #[tokio::test]
    async fn certify_channel_cap_regime() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying channel-cap regime (3 of 10)...");

        let outcome = route_batch(
            &ten_records(),
            &route_with_channel_cap(3),
            &GlobalLimits { max_per_run: Some(5) },
            &AlertSink::Memory(MemorySink::new()),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.metrics.sent, 3, "L2_CAP_DRIFT: sent count wrong.");
        assert_eq!(outcome.metrics.skipped, 7, "L2_CAP_DRIFT: skipped count wrong.");
        assert_eq!(outcome.metrics.per_channel_sent["hook_1"], 3);
        assert_eq!(outcome.metrics.per_channel_skipped["hook_1"], 7);

        let first_skip = outcome
            .attempts
            .iter()
            .find(|attempt| attempt.status == "skipped")
            .expect("no skip trace");
        assert_eq!(first_skip.reason.as_deref(), Some("channel_rate_limited"));
        assert_eq!(first_skip.event_id, "e3", "skips must begin after the third delivery");
        println!("   ✅ Exactly 3 sent, 7 'channel_rate_limited'.");
    }

    /**
     * CERTIFICACIÓN: El cupo global gobierna cuando el canal es holgado.
     */
    #[tokio::test]
    async fn certify_global_cap_regime() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying global-cap regime (5 of 10)...");

        let outcome = route_batch(
            &ten_records(),
            &route_with_channel_cap(10),
            &GlobalLimits { max_per_run: Some(5) },
            &AlertSink::Memory(MemorySink::new()),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.metrics.sent, 5);
        assert_eq!(outcome.metrics.skipped, 5);
        let global_skips = outcome
            .attempts
            .iter()
            .filter(|attempt| attempt.reason.as_deref() == Some("global_rate_limited"))
            .count();
        assert_eq!(global_skips, 5, "L2_CAP_DRIFT: global reason miscounted.");
        println!("   ✅ Exactly 5 sent, 5 'global_rate_limited'.");
    }
}
