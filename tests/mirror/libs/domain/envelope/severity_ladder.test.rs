// [tests/mirror/libs/domain/envelope/severity_ladder.test.rs]
/**
 * =================================================================
 * APARATO: SEVERITY LADDER CERTIFIER (V1.1)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-ENVELOPE
 * RESPONSABILIDAD: MONOTONICIDAD Y REFLEXIVIDAD DE LA ESCALERA
 *
 * # Mathematical Proof (Total Order):
 * 'severity_at_least' compara rangos enteros con '>='; por aritmética
 * de enteros la relación es reflexiva y transitiva, y el piso 'info'
 * (rango 0) admite cualquier etiqueta, incluso las desconocidas.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use verdantis_domain_envelope::severity::{
        severity_at_least, severity_rank, severity_weight, SeverityFloor, SEVERITY_LADDER,
    };

    const FLOORS: [SeverityFloor; 5] = [
        SeverityFloor::Info,
        SeverityFloor::Low,
        SeverityFloor::Medium,
        SeverityFloor::High,
        SeverityFloor::Critical,
    ];

    /**
     * CERTIFICACIÓN: Reflexividad, transitividad y piso universal.
     */
    #[test]
    fn certify_ladder_total_order() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying severity ladder total order...");

        for (position, label) in SEVERITY_LADDER.iter().enumerate() {
            let floor = FLOORS[position];
            assert!(severity_at_least(label, floor), "L2_LADDER_FAULT: reflexivity broken.");
            assert!(severity_at_least(label, SeverityFloor::Info));
        }

        for lower in 0..FLOORS.len() {
            for upper in lower..FLOORS.len() {
                assert!(
                    severity_at_least(SEVERITY_LADDER[upper], FLOORS[lower]),
                    "L2_LADDER_FAULT: transitivity broken between ranks {lower} and {upper}."
                );
            }
        }
        println!("   ✅ Reflexive and transitive across all 25 rank pairs.");
    }

    /**
     * CERTIFICACIÓN: Pesos de riesgo exactos para los agregados.
     */
    #[test]
    fn certify_risk_weights() {
        println!("\n🧪 [PROVING_GROUNDS]: Certifying risk weight table...");

        assert_eq!(severity_weight("info"), 0);
        assert_eq!(severity_weight("low"), 1);
        assert_eq!(severity_weight("medium"), 2);
        assert_eq!(severity_weight("high"), 4);
        assert_eq!(severity_weight("critical"), 8);
        assert_eq!(severity_weight("unheard-of"), 0, "L2_WEIGHT_LEAK: unknown label weighed.");
        assert_eq!(severity_rank("unheard-of"), 0);
        println!("   ✅ Weight table bit-perfect: {{low:1, medium:2, high:4, critical:8}}.");
    }
}
