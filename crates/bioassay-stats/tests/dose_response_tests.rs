//! Dose-response (probit) analysis integration tests
//!
//! Reference values come from an independent IRLS fit of the same data.

mod common;

use bioassay_io::load_bioassay_data;
use bioassay_stats::{
    calculate_lc_probit, fit_table, AnalysisError, LcResults, ProbitOptions, POOLED_LABEL,
};
use common::{assert_close, dose_response, fixture};
use rstest::rstest;

#[test]
fn test_steep_strain_converges_to_finite_lc50() {
    let table = dose_response("Kisumu", &[1.0, 2.0, 3.0, 4.0], 20, &[2, 20, 18, 20]);
    let results = calculate_lc_probit(&table, &ProbitOptions::default()).unwrap();

    let estimate = results.get("Kisumu").unwrap();
    assert!(estimate.lc.is_finite() && estimate.lc > 0.0);
    // The fitted 50% point on the concentration scale lies inside the data
    let midpoint = estimate.lc.ln();
    assert!((1.0..=4.0).contains(&midpoint));
    assert_close(estimate.lc, 4.614346, 1e-4);
    assert_close(estimate.ci_lower, 0.521718, 1e-2);
    assert_close(estimate.ci_upper, 0.005050, 1e-2);
}

#[test]
fn test_fixture_by_strain() {
    let table = load_bioassay_data(&fixture("dose_response.csv")).unwrap();
    let results = calculate_lc_probit(&table, &ProbitOptions::default()).unwrap();

    let LcResults::ByStrain(entries) = &results else {
        panic!("expected per-strain results");
    };
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Lab", "Field"]);

    let lab = results.get("Lab").unwrap();
    assert_close(lab.lc, 15.752276, 1e-4);
    assert_close(lab.ci_lower, 0.456970, 1e-2);
    assert_close(lab.ci_upper, 4.157670e-5, 1e-2);

    let field = results.get("Field").unwrap();
    assert_close(field.lc, 291.761221, 1e-4);
    assert!(field.lc > lab.lc);
}

#[rstest]
#[case(50.0, 15.752276)]
#[case(90.0, 303.775348)]
fn test_lab_percentiles(#[case] lc_value: f64, #[case] expected: f64) {
    let table = load_bioassay_data(&fixture("dose_response.csv")).unwrap();
    let options = ProbitOptions::default().with_lc_value(lc_value);
    let results = calculate_lc_probit(&table, &options).unwrap();

    let lab = results.get("Lab").unwrap();
    assert_eq!(lab.lc_value, lc_value);
    assert_eq!(lab.label(), format!("LC{}", lc_value));
    assert_close(lab.lc, expected, 1e-4);
}

#[test]
fn test_pooled_analysis() {
    let table = load_bioassay_data(&fixture("dose_response.csv")).unwrap();
    let results = calculate_lc_probit(&table, &ProbitOptions::default().pooled()).unwrap();

    let LcResults::Pooled(estimate) = &results else {
        panic!("expected a pooled result");
    };
    assert_close(estimate.lc, 62.255853, 1e-4);
    assert_eq!(results.get(POOLED_LABEL), Some(estimate));
}

#[test]
fn test_pooled_fit_ignores_strain_column() {
    let table = load_bioassay_data(&fixture("dose_response.csv")).unwrap();
    let options = ProbitOptions::default().pooled().with_strain_column("no_such_column");
    assert!(calculate_lc_probit(&table, &options).is_ok());
}

#[test]
fn test_failing_strain_aborts_and_is_named() {
    let mut concentration = vec![0.5, 1.0, 2.0, 4.0, 8.0];
    let mut dead = vec![2, 5, 12, 19, 24];
    // Second strain tested at one concentration only
    concentration.extend([2.0, 2.0]);
    dead.extend([10, 12]);

    let mut table = dose_response("Lab", &concentration, 25, &dead);
    let strains = (0..7)
        .map(|i| if i < 5 { "Lab" } else { "Field" }.to_string())
        .collect();
    table = table
        .with_column("strain", bioassay_io::DataColumn::String(strains))
        .unwrap();

    let err = calculate_lc_probit(&table, &ProbitOptions::default()).unwrap_err();
    match err {
        AnalysisError::Group { group, source } => {
            assert_eq!(group, "Field");
            assert!(matches!(*source, AnalysisError::SingularFit));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_rows_without_strain_are_skipped() {
    let concentration = [0.5, 1.0, 2.0, 4.0, 8.0];
    let dead = [2, 5, 12, 19, 24];
    let lab_only = dose_response("Lab", &concentration, 25, &dead);

    let mut with_blanks = dose_response(
        "Lab",
        &[0.5, 1.0, 2.0, 4.0, 8.0, 2.0, 4.0],
        25,
        &[2, 5, 12, 19, 24, 10, 12],
    );
    let strains = ["Lab", "Lab", "Lab", "Lab", "Lab", "", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();
    with_blanks = with_blanks
        .with_column("strain", bioassay_io::DataColumn::String(strains))
        .unwrap();

    let expected = calculate_lc_probit(&lab_only, &ProbitOptions::default()).unwrap();
    let results = calculate_lc_probit(&with_blanks, &ProbitOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.get("Lab"), expected.get("Lab"));
}

#[test]
fn test_zero_total_row_is_rejected() {
    let table = dose_response("Lab", &[1.0, 2.0, 3.0], 0, &[0, 0, 0]);
    let err = calculate_lc_probit(&table, &ProbitOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Lab"));
}

#[test]
fn test_missing_concentration_column() {
    let table = dose_response("Lab", &[1.0, 2.0], 20, &[5, 10]);
    let options = ProbitOptions::default().with_concentration_column("dose");
    let err = calculate_lc_probit(&table, &options).unwrap_err();
    assert!(err.to_string().contains("dose"));
}

#[test]
fn test_invalid_percentile() {
    let table = dose_response("Lab", &[1.0, 2.0], 20, &[5, 10]);
    let options = ProbitOptions::default().with_lc_value(100.0);
    assert!(matches!(
        calculate_lc_probit(&table, &options),
        Err(AnalysisError::InvalidPercentile(_))
    ));
}

#[test]
fn test_fit_table_exposes_coefficients() {
    let table = load_bioassay_data(&fixture("dose_response.csv")).unwrap();
    let lab_rows = table.rows_matching("strain", "Lab").unwrap();
    let fit = fit_table(&table.take_rows(&lab_rows), &ProbitOptions::default()).unwrap();

    assert_close(fit.intercept, -1.193936, 1e-4);
    assert_close(fit.slope, 0.433059, 1e-4);
}
