use pipe_network_sizer::segment_table::{parse_segment_rows, RowError, SegmentTableError};
use pipe_network_sizer::water::SegmentAnalyzer;

const TABLE: &str = r#"
[[segments]]
id = "S1"
length = 500
flow = 0.05
diameter = 0.2
C = 120
from = "A"
to = "B"

[[segments]]
"Segment" = "S2"
"Length (m)" = "300"
"Flow (m3/s)" = 0.02
"Diameter (m)" = 0.15
"Hazen-Williams C" = 130
"From" = "B"
"To" = "C"

[[segments]]
id = "S3"
length = 100
diameter = 0.1
C = 140
from = "C"
to = "D"

[[segments]]
id = "S4"
length = "long"
flow = 0.01
diameter = 0.1
C = 140
from = "C"
to = "E"
"#;

#[test]
fn parses_rows_with_header_aliases() {
    let rows = parse_segment_rows(TABLE).expect("table");
    assert_eq!(rows.len(), 4);

    let s1 = rows[0].as_ref().expect("S1");
    assert_eq!(s1.id, "S1");
    assert_eq!(s1.length_m, 500.0);
    assert_eq!(s1.roughness_c, 120.0);

    let s2 = rows[1].as_ref().expect("S2");
    assert_eq!(s2.id, "S2");
    assert_eq!(s2.length_m, 300.0);
    assert_eq!(s2.flow_m3_per_s, 0.02);
    assert_eq!(s2.from_node, "B");
    assert_eq!(s2.to_node, "C");
}

#[test]
fn missing_and_invalid_fields_stay_per_row() {
    let rows = parse_segment_rows(TABLE).unwrap();
    assert_eq!(rows[2], Err(RowError::MissingField { field: "flow" }));
    assert!(matches!(
        &rows[3],
        Err(RowError::InvalidField { field: "length", .. })
    ));
}

#[test]
fn rows_flow_into_partial_report() {
    let rows = parse_segment_rows(TABLE).unwrap();
    let report = SegmentAnalyzer::default().analyze_rows(rows);
    assert_eq!(report.ok_count(), 2);
    assert_eq!(report.failed_count(), 2);
    let failed_rows: Vec<_> = report.failures().map(|(o, _)| o.row).collect();
    assert_eq!(failed_rows, [2, 3]);
}

#[test]
fn blank_label_counts_as_missing() {
    let src = r#"
[[segments]]
id = "  "
length = 1.0
flow = 0.01
diameter = 0.1
C = 120
from = "A"
to = "B"
"#;
    let rows = parse_segment_rows(src).unwrap();
    assert_eq!(rows[0], Err(RowError::MissingField { field: "id" }));
}

#[test]
fn non_table_row_is_reported() {
    let rows = parse_segment_rows("segments = [1, 2]").unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| matches!(r, Err(RowError::NotATable))));
}

#[test]
fn file_level_errors_abort() {
    assert!(matches!(
        parse_segment_rows("title = \"no segments\""),
        Err(SegmentTableError::MissingSegments)
    ));
    assert!(matches!(
        parse_segment_rows("[[segments]\nbroken"),
        Err(SegmentTableError::Parse(_))
    ));
}

#[test]
fn duplicate_column_aliases_make_row_invalid() {
    let src = r#"
[[segments]]
id = "S1"
length = 100.0
flow = 0.01
Q = 0.02
diameter = 0.1
C = 120
from = "A"
to = "B"
"#;
    let rows = parse_segment_rows(src).unwrap();
    match &rows[0] {
        Err(RowError::InvalidField { field, value }) => {
            assert_eq!(*field, "flow");
            assert!(value.contains("flow") && value.contains("Q"), "{value}");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}
