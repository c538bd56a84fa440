use approx::{assert_abs_diff_eq, assert_relative_eq};
use pipe_network_sizer::segment_table::RowError;
use pipe_network_sizer::water::{
    AnalyzerConfig, HydraulicsError, Segment, SegmentAnalyzer, SegmentError, VelocityBand,
    VelocityClass,
};

fn segment(id: &str, length: f64, flow: f64, diameter: f64, c: f64) -> Segment {
    Segment {
        id: id.to_string(),
        length_m: length,
        flow_m3_per_s: flow,
        diameter_m: diameter,
        roughness_c: c,
        from_node: format!("{id}-in"),
        to_node: format!("{id}-out"),
    }
}

#[test]
fn reference_segment_end_to_end() {
    let analyzer = SegmentAnalyzer::default();
    let res = analyzer
        .analyze_segment(&segment("S1", 500.0, 0.05, 0.2, 120.0))
        .expect("analyze");

    assert_abs_diff_eq!(res.velocity_m_per_s, 1.592, epsilon = 5e-4);
    assert_eq!(res.velocity_class, VelocityClass::AboveBand);
    assert!(res.is_out_of_band());

    let expected_hf =
        10.67 * 500.0 * 0.05_f64.powf(1.85) / (120.0_f64.powf(1.85) * 0.2_f64.powf(4.87));
    assert_abs_diff_eq!(res.head_loss_m, expected_hf, epsilon = 5e-4);
    assert_abs_diff_eq!(res.economic_diameter_m, 0.252, epsilon = 5e-4);
    assert_eq!(res.segment_id, "S1");
    assert_eq!(res.from_node, "S1-in");
    assert_eq!(res.to_node, "S1-out");
}

#[test]
fn results_are_not_rounded() {
    let res = SegmentAnalyzer::default()
        .analyze_segment(&segment("S1", 500.0, 0.05, 0.2, 120.0))
        .unwrap();
    assert_relative_eq!(
        res.velocity_m_per_s,
        0.05 / (std::f64::consts::PI * 0.01),
        max_relative = 1e-12
    );
}

#[test]
fn within_band_segment() {
    // D=0.15 m에서 1.0 m/s 근처가 되는 유량
    let res = SegmentAnalyzer::default()
        .analyze_segment(&segment("S2", 300.0, 0.0177, 0.15, 130.0))
        .unwrap();
    assert!(res.velocity_class.is_within_band());
}

#[test]
fn unsized_segment_fails_head_loss() {
    // 내경 0: 유속은 0이지만 손실수두는 계산할 수 없다
    let err = SegmentAnalyzer::default()
        .analyze_segment(&segment("S3", 100.0, 0.01, 0.0, 120.0))
        .unwrap_err();
    assert!(matches!(
        err,
        HydraulicsError::InvalidSegment { field: "diameter", .. }
    ));
}

#[test]
fn one_bad_segment_does_not_abort_batch() {
    let segments = vec![
        segment("S1", 500.0, 0.05, 0.2, 120.0),
        segment("S2", 300.0, 0.02, 0.15, 0.0),
        segment("S3", 250.0, 0.01, 0.1, 140.0),
        segment("S4", 100.0, 0.0177, 0.15, 130.0),
    ];
    let report = SegmentAnalyzer::default().analyze_all(&segments);

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.ok_count(), 3);
    assert_eq!(report.failed_count(), 1);
    assert!(!report.is_complete_success());

    let (outcome, err) = report.failures().next().unwrap();
    assert_eq!(outcome.row, 1);
    assert_eq!(outcome.segment_id.as_deref(), Some("S2"));
    assert!(matches!(
        err,
        SegmentError::Hydraulics(HydraulicsError::InvalidSegment { field: "roughness", .. })
    ));

    let ids: Vec<_> = report.successes().map(|r| r.segment_id.as_str()).collect();
    assert_eq!(ids, ["S1", "S3", "S4"]);
}

#[test]
fn duplicate_ids_are_reported() {
    let segments = vec![
        segment("S1", 500.0, 0.05, 0.2, 120.0),
        segment("S1", 200.0, 0.01, 0.1, 120.0),
    ];
    let report = SegmentAnalyzer::default().analyze_all(&segments);
    assert_eq!(report.ok_count(), 1);
    let (outcome, err) = report.failures().next().unwrap();
    assert_eq!(outcome.row, 1);
    assert_eq!(
        err,
        &SegmentError::DuplicateSegment {
            id: "S1".to_string()
        }
    );
}

#[test]
fn row_errors_are_carried_into_report() {
    let rows = vec![
        Ok(segment("S1", 500.0, 0.05, 0.2, 120.0)),
        Err(RowError::MissingField { field: "flow" }),
    ];
    let report = SegmentAnalyzer::default().analyze_rows(rows);
    assert_eq!(report.ok_count(), 1);
    let (outcome, err) = report.failures().next().unwrap();
    assert_eq!(outcome.segment_id, None);
    assert_eq!(err, &SegmentError::Row(RowError::MissingField { field: "flow" }));
}

#[test]
fn custom_config_changes_classification_and_sizing() {
    let config = AnalyzerConfig {
        target_velocity_m_per_s: 2.0,
        band: VelocityBand::new(1.0, 2.0).unwrap(),
    };
    let analyzer = SegmentAnalyzer::new(config).unwrap();
    let res = analyzer
        .analyze_segment(&segment("S1", 500.0, 0.05, 0.2, 120.0))
        .unwrap();
    assert_eq!(res.velocity_class, VelocityClass::WithinBand);
    assert_abs_diff_eq!(
        res.economic_diameter_m,
        (4.0 * 0.025 / std::f64::consts::PI).sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn invalid_config_is_rejected() {
    let config = AnalyzerConfig {
        target_velocity_m_per_s: 0.0,
        ..AnalyzerConfig::default()
    };
    assert!(SegmentAnalyzer::new(config).is_err());
}

#[test]
fn tiny_diameter_segment_fails_instead_of_nan() {
    let err = SegmentAnalyzer::default()
        .analyze_segment(&segment("S5", 500.0, 0.0, 1e-70, 120.0))
        .unwrap_err();
    assert!(matches!(
        err,
        HydraulicsError::InvalidSegment { field: "diameter", .. }
    ));
}
