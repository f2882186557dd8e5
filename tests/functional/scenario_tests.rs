//! End-to-end comparison scenarios and the properties every run must hold

use crate::common::{sample_data, CliTestRunner, TestFixture};
use serde_json::json;
use tabcompare::report::{
    MISMATCHES_FILE, SOURCE_DUPLICATES_FILE, SOURCE_ONLY_FILE, SUMMARY_FILE,
    TARGET_DUPLICATES_FILE, TARGET_ONLY_FILE,
};
use tabcompare::{compare, CellValue, ReportWriter};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_duplicates_and_one_sided_rows() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_json(
            "source.json",
            &json!([
                {"id": 1, "name": "A"},
                {"id": 2, "name": "B"},
                {"id": 2, "name": "B2"}
            ]),
        )
        .unwrap();
    let target = fixture
        .create_json(
            "target.json",
            &json!([
                {"id": 1, "name": "A"},
                {"id": 3, "name": "C"}
            ]),
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert!(result.mismatches.is_empty());
    assert_eq!(result.source_only.columns, vec!["id", "name"]);
    assert_eq!(
        result.source_only.rows,
        vec![
            vec![CellValue::Int(2), CellValue::from("B")],
            vec![CellValue::Int(2), CellValue::from("B2")],
        ]
    );
    assert_eq!(
        result.target_only.rows,
        vec![vec![CellValue::Int(3), CellValue::from("C")]]
    );
    assert_eq!(result.source_duplicates.len(), 2);
    assert!(result
        .source_duplicates
        .rows
        .iter()
        .all(|row| row[0] == CellValue::Int(2)));
    assert!(result.target_duplicates.is_empty());

    let summary = &result.summary;
    assert_eq!(summary.source_total, 3);
    assert_eq!(summary.target_total, 2);
    assert_eq!(summary.total_data_breaks, 0);
    assert_eq!(summary.only_in_source, 2);
    assert_eq!(summary.only_in_target, 1);
    // Distinct key combinations, reported under the duplicate headers
    assert_eq!(summary.source_key_duplicate, 2);
    assert_eq!(summary.target_key_duplicate, 2);
    assert_eq!(summary.key_matched, 1);
}

#[test]
fn test_single_field_mismatch() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_json("source.json", &json!([{"id": 1, "v": "X"}]))
        .unwrap();
    let target = fixture
        .create_json("target.json", &json!([{"id": 1, "v": "Y"}]))
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();
    let table = result.mismatch_table();

    assert_eq!(table.columns, vec!["id", "v_Expected", "v_Actual"]);
    assert_eq!(
        table.rows,
        vec![vec![
            CellValue::Int(1),
            CellValue::from("X"),
            CellValue::from("Y")
        ]]
    );
    assert_eq!(result.summary.total_data_breaks, 1);
    assert!(result.source_only.is_empty());
    assert!(result.target_only.is_empty());
}

#[test]
fn test_no_diff_rows_never_reported() {
    let fixture = TestFixture::new().unwrap();
    let data = sample_data::source_csv_data();
    let source = fixture.create_csv("source.csv", &data).unwrap();
    let target = fixture.create_csv("target.csv", &data).unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert!(result.mismatches.is_empty());
    assert!(!result.has_differences());
    assert_eq!(result.summary.key_matched, 3);
}

#[test]
fn test_partition_of_source_rows() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv("source.csv", &sample_data::source_csv_data())
        .unwrap();
    let target = fixture
        .create_csv("target.csv", &sample_data::target_csv_data())
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    // id 1 differs, id 2 matches exactly, id 3 has no counterpart
    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].key, vec![CellValue::Int(1)]);
    assert_eq!(result.mismatches[0].fields.len(), 1);
    assert_eq!(result.mismatches[0].fields[0].column, "price");
    assert_eq!(result.source_only.len(), 1);
    assert_eq!(result.source_only.rows[0][0], CellValue::Int(3));
    assert_eq!(result.target_only.len(), 1);
    assert_eq!(result.target_only.rows[0][0], CellValue::Int(4));

    let matched_clean = result.summary.key_matched - result.summary.total_data_breaks;
    assert_eq!(
        matched_clean + result.summary.total_data_breaks + result.summary.only_in_source,
        result.summary.source_total
    );
}

#[test]
fn test_summary_consistency() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv(
            "source.csv",
            &[
                vec!["id", "name"],
                vec!["1", "a"],
                vec!["2", "b"],
                vec!["3", "c"],
                vec!["4", "d"],
                vec!["4", "e"],
            ],
        )
        .unwrap();
    let target = fixture
        .create_csv(
            "target.csv",
            &[
                vec!["id", "name"],
                vec!["1", "a"],
                vec!["2", "x"],
                vec!["5", "y"],
            ],
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.source_total, 5);
    assert_eq!(summary.target_total, 3);
    assert_eq!(summary.only_in_source as usize, result.source_only.len());
    assert_eq!(summary.only_in_target as usize, result.target_only.len());
    assert_eq!(summary.total_data_breaks as usize, result.mismatches.len());
    assert_eq!(summary.only_in_source, 3);
    assert_eq!(summary.only_in_target, 1);
    assert_eq!(summary.total_data_breaks, 1);
    assert_eq!(summary.source_key_duplicate, 4);
    assert_eq!(summary.target_key_duplicate, 3);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let source = fixture
        .create_csv("source.csv", &sample_data::source_csv_data())
        .unwrap();
    let target = fixture
        .create_csv("target.csv", &sample_data::target_csv_data())
        .unwrap();

    let files = [
        MISMATCHES_FILE,
        SOURCE_ONLY_FILE,
        TARGET_ONLY_FILE,
        SOURCE_DUPLICATES_FILE,
        TARGET_DUPLICATES_FILE,
        SUMMARY_FILE,
    ];

    runner.compare(&source, &target, "id").unwrap();
    let first: Vec<String> = files.iter().map(|f| fixture.read_report(f)).collect();

    runner.compare(&source, &target, "id").unwrap();
    let second: Vec<String> = files.iter().map(|f| fixture.read_report(f)).collect();

    assert_eq!(first, second);
}

#[test]
fn test_cli_compare_writes_expected_reports() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let source = fixture
        .create_csv("source.csv", &sample_data::source_csv_data())
        .unwrap();
    let target = fixture
        .create_csv("target.csv", &sample_data::target_csv_data())
        .unwrap();

    runner.compare(&source, &target, "id").unwrap();

    assert_eq!(
        fixture.report_header(MISMATCHES_FILE),
        "id,price_Expected,price_Actual"
    );
    assert_eq!(fixture.report_rows(MISMATCHES_FILE), vec!["1,1.5,1.6"]);
    assert_eq!(fixture.report_rows(SOURCE_ONLY_FILE), vec!["3,Cherry,2.0"]);
    assert_eq!(fixture.report_rows(TARGET_ONLY_FILE), vec!["4,Date,3.0"]);
    assert!(fixture.report_rows(SOURCE_DUPLICATES_FILE).is_empty());
    assert_eq!(fixture.report_rows(SUMMARY_FILE), vec!["3,3,1,1,1,3,3"]);
}

#[test]
fn test_library_result_written_with_report_writer() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_json("source.json", &json!([{"id": 1, "v": "X"}]))
        .unwrap();
    let target = fixture
        .create_json("target.json", &json!([{"id": 1, "v": "Y"}]))
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();
    let writer = ReportWriter::new(fixture.output_dir()).unwrap();
    let paths = writer.write_all(&result).unwrap();

    assert_eq!(paths.iter().count(), 6);
    assert_eq!(
        fixture.read_report(MISMATCHES_FILE),
        "id,v_Expected,v_Actual\n1,X,Y\n"
    );
}
