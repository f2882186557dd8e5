//! Comparisons driven through each input format

use crate::common::{CliTestRunner, TestFixture};
use serde_json::json;
use tabcompare::report::{MISMATCHES_FILE, SOURCE_ONLY_FILE, SUMMARY_FILE};
use tabcompare::{compare, CellValue};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_fixed_width_with_mapping() {
    let fixture = TestFixture::new().unwrap();
    let fields = [("ACCOUNT", 6), ("NAME", 10), ("BALANCE", 8)];
    let (source, mapping) = fixture
        .create_fixed_width(
            "source.dat",
            &fields,
            &[
                vec!["A001", "Alice", "100.00"],
                vec!["A002", "Bob", "55.10"],
            ],
        )
        .unwrap();
    let (target, _) = fixture
        .create_fixed_width(
            "target.dat",
            &fields,
            &[
                vec!["A001", "Alice", "100.00"],
                vec!["A002", "Robert", "55.10"],
            ],
        )
        .unwrap();

    let result = compare(
        &source,
        &target,
        &keys(&["ACCOUNT"]),
        Some(&mapping),
        &fixture.config(),
    )
    .unwrap();

    assert_eq!(result.mismatches.len(), 1);
    let record = &result.mismatches[0];
    assert_eq!(record.key, vec![CellValue::from("A002")]);
    assert_eq!(record.fields[0].column, "NAME");
    assert_eq!(record.fields[0].expected, CellValue::from("Bob"));
    assert_eq!(record.fields[0].actual, CellValue::from("Robert"));
}

#[test]
fn test_fixed_width_values_stay_text() {
    let fixture = TestFixture::new().unwrap();
    let fields = [("ID", 4), ("AMOUNT", 6)];
    let (source, mapping) = fixture
        .create_fixed_width("source.dat", &fields, &[vec!["1", "007"]])
        .unwrap();
    let (target, _) = fixture
        .create_fixed_width("target.dat", &fields, &[vec!["1", "7"]])
        .unwrap();

    let result = compare(
        &source,
        &target,
        &keys(&["ID"]),
        Some(&mapping),
        &fixture.config(),
    )
    .unwrap();

    // No numeric coercion: "007" and "7" differ
    assert_eq!(result.summary.total_data_breaks, 1);
    assert_eq!(result.mismatches[0].fields[0].expected, CellValue::from("007"));
}

#[test]
fn test_fixed_width_short_lines_yield_empty_fields() {
    let fixture = TestFixture::new().unwrap();
    let mapping = fixture
        .create_raw(
            "layout.csv",
            "IGP Base Field,'Start Position',End Position\nID,0,3\nNAME,3,10\n",
        )
        .unwrap();
    let source = fixture.create_raw("source.dat", "001Alice\n002\n").unwrap();
    let target = fixture.create_raw("target.dat", "001Alice\n002\n").unwrap();

    let result = compare(
        &source,
        &target,
        &keys(&["ID"]),
        Some(&mapping),
        &fixture.config(),
    )
    .unwrap();

    assert_eq!(result.summary.source_total, 2);
    assert!(result.mismatches.is_empty());
}

#[test]
fn test_xml_inputs() {
    let fixture = TestFixture::new().unwrap();
    let columns = ["id", "city"];
    let source = fixture
        .create_xml(
            "source.xml",
            &columns,
            &[vec!["1", "Oslo"], vec!["2", "Lima"], vec!["3", "Rome"]],
        )
        .unwrap();
    let target = fixture
        .create_xml(
            "target.xml",
            &columns,
            &[vec!["1", "Oslo"], vec!["2", "Kyiv"]],
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert_eq!(result.summary.total_data_breaks, 1);
    assert_eq!(result.mismatches[0].key, vec![CellValue::Int(2)]);
    assert_eq!(result.summary.only_in_source, 1);
    assert_eq!(result.source_only.rows[0][1], CellValue::from("Rome"));
}

#[test]
fn test_json_nested_values_kept_as_text() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_json(
            "source.json",
            &json!([{"id": 1, "tags": ["a", "b"]}]),
        )
        .unwrap();
    let target = fixture
        .create_json(
            "target.json",
            &json!([{"id": 1, "tags": ["a", "c"]}]),
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(
        result.mismatches[0].fields[0].expected,
        CellValue::from(r#"["a","b"]"#)
    );
}

#[test]
fn test_json_against_xml() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_json(
            "source.json",
            &json!([
                {"id": 1, "name": "Ann"},
                {"id": 2, "name": "Ben"}
            ]),
        )
        .unwrap();
    let target = fixture
        .create_xml(
            "target.xml",
            &["id", "name"],
            &[vec!["1", "Ann"], vec!["2", "Bea"]],
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert_eq!(result.summary.key_matched, 2);
    assert_eq!(result.summary.total_data_breaks, 1);
    assert_eq!(result.mismatches[0].fields[0].actual, CellValue::from("Bea"));
}

#[test]
fn test_csv_target_missing_column_reports_null_actual() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv(
            "source.csv",
            &[vec!["id", "name", "note"], vec!["1", "a", "keep"]],
        )
        .unwrap();
    let target = fixture
        .create_csv("target.csv", &[vec!["id", "name"], vec!["1", "a"]])
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert_eq!(result.mismatches.len(), 1);
    let field = &result.mismatches[0].fields[0];
    assert_eq!(field.column, "note");
    assert_eq!(field.actual, CellValue::Null);
}

#[test]
fn test_csv_target_columns_reordered() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv(
            "source.csv",
            &[vec!["id", "name", "city"], vec!["1", "a", "x"]],
        )
        .unwrap();
    let target = fixture
        .create_csv(
            "target.csv",
            &[vec!["city", "id", "name"], vec!["x", "1", "a"]],
        )
        .unwrap();

    let result = compare(&source, &target, &keys(&["id"]), None, &fixture.config()).unwrap();

    assert!(result.mismatches.is_empty());
    assert_eq!(result.summary.key_matched, 1);
}

#[test]
fn test_cli_fixed_width_compare() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let fields = [("ID", 3), ("NAME", 8)];
    let (source, mapping) = fixture
        .create_fixed_width("source.dat", &fields, &[vec!["001", "Alpha"], vec!["002", "Beta"]])
        .unwrap();
    let (target, _) = fixture
        .create_fixed_width("target.dat", &fields, &[vec!["001", "Alpha"]])
        .unwrap();
    let output = fixture.output_dir();

    runner.expect_success(&[
        "compare",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--key",
        "ID",
        "--mapping",
        mapping.to_str().unwrap(),
        "--output-dir",
        output.to_str().unwrap(),
        "--quiet",
    ]);

    assert_eq!(fixture.report_header(MISMATCHES_FILE), "ID");
    assert!(fixture.report_rows(MISMATCHES_FILE).is_empty());
    assert_eq!(fixture.report_rows(SOURCE_ONLY_FILE), vec!["002,Beta"]);
    assert_eq!(fixture.report_rows(SUMMARY_FILE), vec!["2,1,0,1,0,2,1"]);
}

#[test]
fn test_cli_schema_command() {
    let runner = CliTestRunner::new().unwrap();
    let input = runner
        .fixture()
        .create_json("input.json", &json!([{"id": 1, "name": "a"}]))
        .unwrap();

    runner.expect_success(&["schema", input.to_str().unwrap()]);
    runner.expect_success(&["schema", input.to_str().unwrap(), "--format", "json"]);
}
