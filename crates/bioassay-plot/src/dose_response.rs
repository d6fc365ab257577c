//! Probit dose-response chart
//!
//! Observed proportions per strain as markers, a dashed probit curve
//! re-fitted over each strain's concentration range, and one callout per
//! LC estimate.

use crate::axis::Axis;
use crate::chart::{Annotation, AnnotationStyle, Chart, LineDash, ScatterTrace, Trace};
use crate::colormap::palette_color;
use crate::error::PlotResult;
use bioassay_io::Table;
use bioassay_stats::{
    fit_table, partition, with_proportion, LcEstimate, LcResults, ProbitOptions, PROPORTION,
};

/// Points on each fitted curve
pub const CURVE_POINTS: usize = 100;

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Callout text: name, LC value and interval, one per line
pub fn annotation_text(name: &str, estimate: &LcEstimate) -> String {
    format!(
        "{}\n{} = {:.2}\n95% CI: ({:.2}, {:.2})",
        name,
        estimate.label(),
        estimate.lc,
        estimate.ci_lower,
        estimate.ci_upper
    )
}

/// Plot observed mortality, fitted probit curves and LC callouts.
///
/// `table` is the raw bioassay table and `results` the output of
/// `calculate_lc_probit` for the same `options`. The caller's table is
/// not modified.
pub fn plot_lc_probit(
    table: &Table,
    results: &LcResults,
    options: &ProbitOptions,
) -> PlotResult<Chart> {
    let data = with_proportion(table, &options.total_column, &options.dead_column)?;
    let concentration = data.numeric_column(&options.concentration_column)?;
    let proportion = data.numeric_column(PROPORTION)?;

    let mut chart = Chart::new(
        format!("Probit Analysis - LC{}", options.lc_value),
        Axis::linear("Concentration"),
        Axis::linear("Proportion Dead"),
    )
    .with_legend_title(options.strain_column.clone());

    let strains = partition(&data, &[options.strain_column.as_str()])?;
    let mut curves = Vec::with_capacity(strains.len());

    for (index, group) in strains.iter().enumerate() {
        let strain = group.name();
        let rows = &group.rows;
        let color = palette_color(index);

        let x: Vec<f64> = rows.iter().map(|&r| concentration[r]).collect();
        let y = rows.iter().map(|&r| proportion[r]).collect();
        chart.push_trace(Trace::Scatter(ScatterTrace::markers(
            strain.clone(),
            x.clone(),
            y,
            color,
        )));

        let fit = fit_table(&data.take_rows(rows), options)
            .map_err(|e| e.in_group(strain.clone()))?;
        let (min, max) = finite_range(&x).unwrap_or((0.0, 0.0));
        let xs = linspace(min, max, CURVE_POINTS);
        let ys = fit.predict_many(&xs);
        curves.push(
            ScatterTrace::line(format!("{} (fitted)", strain), xs, ys, color)
                .with_dash(LineDash::Dash),
        );
    }

    for curve in curves {
        chart.push_trace(Trace::Scatter(curve));
    }

    for (name, estimate) in results.iter() {
        chart.push_annotation(
            Annotation::new(
                estimate.lc,
                estimate.lc_value / 100.0,
                annotation_text(name, estimate),
            )
            .with_style(AnnotationStyle::lc_callout()),
        );
    }

    Ok(chart)
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            None => Some((v, v)),
        })
}
