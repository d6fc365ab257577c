//! Loader integration tests: format dispatch and failure reporting

mod common;

use bioassay_io::{load_bioassay_data, open_file, read_table, ColumnType, IoError};
use common::{capture_logs, fixture, write_diagnostic_xlsx};
use rstest::rstest;

#[rstest]
#[case("diagnostic_dose.csv", "CSV")]
#[case("diagnostic_dose.tsv", "TSV")]
fn test_delimited_fixtures_load(#[case] name: &str, #[case] format: &str) {
    let path = fixture(name);
    assert_eq!(open_file(&path).unwrap().format_name(), format);

    let table = load_bioassay_data(&path).expect("fixture should load");
    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.column_names(), vec!["location", "strain", "total", "dead"]);
    assert_eq!(table.column_type("dead"), Some(ColumnType::Int64));
    assert_eq!(
        table.numeric_column("dead").unwrap(),
        vec![99.0, 61.0, 101.0, 23.0]
    );
}

#[test]
fn test_csv_and_tsv_agree() {
    let csv = load_bioassay_data(&fixture("diagnostic_dose.csv")).unwrap();
    let tsv = load_bioassay_data(&fixture("diagnostic_dose.tsv")).unwrap();
    assert_eq!(csv, tsv);
}

#[test]
fn test_xlsx_matches_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagnostic_dose.xlsx");
    write_diagnostic_xlsx(&path);

    let xlsx = load_bioassay_data(path.to_str().unwrap()).expect("xlsx should load");
    let csv = load_bioassay_data(&fixture("diagnostic_dose.csv")).unwrap();

    assert_eq!(xlsx.schema(), csv.schema());
    assert_eq!(xlsx.column("strain").unwrap(), csv.column("strain").unwrap());
    assert_eq!(
        xlsx.numeric_column("total").unwrap(),
        csv.numeric_column("total").unwrap()
    );
    assert_eq!(
        xlsx.numeric_column("dead").unwrap(),
        csv.numeric_column("dead").unwrap()
    );
}

#[test]
fn test_dose_response_schema() {
    let table = read_table(&fixture("dose_response.csv")).unwrap();
    let schema = table.schema();

    assert_eq!(schema.num_records, 10);
    assert_eq!(
        schema.column("concentration").map(|c| c.dtype),
        Some(ColumnType::Float64)
    );
    assert_eq!(schema.numeric_columns(), vec!["concentration", "total", "dead"]);
}

#[test]
fn test_uppercase_extension_dispatches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("PLATE.CSV");
    std::fs::copy(common::fixture_path("diagnostic_dose.csv"), &path).unwrap();

    assert!(load_bioassay_data(path.to_str().unwrap()).is_some());
}

#[rstest]
#[case("results.json")]
#[case("no/such/file.csv")]
#[case("no/such/file.xlsx")]
fn test_failures_return_none(#[case] path: &str) {
    let (table, logs) = capture_logs(|| load_bioassay_data(path));
    assert!(table.is_none());
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(logs.contains("Error loading file"), "logs: {logs}");
}

#[test]
fn test_failure_message_names_the_cause() {
    let (_, logs) = capture_logs(|| load_bioassay_data("results.json"));
    assert!(logs.contains("Unsupported file format"), "logs: {logs}");

    let (_, logs) = capture_logs(|| load_bioassay_data("no/such/file.csv"));
    assert!(logs.contains("File not found"), "logs: {logs}");
}

#[test]
fn test_successful_load_logs_no_error() {
    let (table, logs) = capture_logs(|| load_bioassay_data(&fixture("diagnostic_dose.csv")));
    assert!(table.is_some());
    assert!(!logs.contains("Error loading file"), "logs: {logs}");
}

#[test]
fn test_empty_csv_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();
    let path = path.to_str().unwrap();

    assert!(matches!(read_table(path), Err(IoError::InvalidFormat(_))));
    let (table, logs) = capture_logs(|| load_bioassay_data(path));
    assert!(table.is_none());
    assert!(logs.contains("Error loading file"), "logs: {logs}");
}

#[test]
fn test_blank_headers_match_across_formats() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("blank_header.csv");
    std::fs::write(&csv_path, "strain,,dead\nKisumu,100,97\n").unwrap();

    let xlsx_path = dir.path().join("blank_header.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "strain").unwrap();
    sheet.write_string(0, 2, "dead").unwrap();
    sheet.write_string(1, 0, "Kisumu").unwrap();
    sheet.write_number(1, 1, 100.0).unwrap();
    sheet.write_number(1, 2, 97.0).unwrap();
    workbook.save(&xlsx_path).unwrap();

    let csv = load_bioassay_data(csv_path.to_str().unwrap()).unwrap();
    let xlsx = load_bioassay_data(xlsx_path.to_str().unwrap()).unwrap();
    assert_eq!(csv.column_names(), vec!["strain", "Unnamed: 1", "dead"]);
    assert_eq!(xlsx.column_names(), csv.column_names());
}

#[test]
fn test_unsupported_format_error_is_typed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    std::fs::write(&path, "{}").unwrap();

    let err = read_table(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
    assert!(load_bioassay_data(path.to_str().unwrap()).is_none());
}

#[test]
fn test_malformed_csv_returns_none() {
    let path = fixture("ragged.csv");
    assert!(matches!(
        read_table(&path),
        Err(IoError::InvalidFormat(_))
    ));
    let (table, logs) = capture_logs(|| load_bioassay_data(&path));
    assert!(table.is_none());
    assert!(logs.contains("Error loading file"), "logs: {logs}");
}

#[test]
fn test_garbage_spreadsheet_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, "not a zip archive").unwrap();

    assert!(load_bioassay_data(path.to_str().unwrap()).is_none());
}
