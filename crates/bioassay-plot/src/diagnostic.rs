//! Grouped bar chart of diagnostic-dose mortality

use crate::axis::Axis;
use crate::chart::{BarMode, BarTrace, Chart, ErrorBars, Trace};
use crate::colormap::palette_color;
use crate::error::PlotResult;
use bioassay_io::Table;
use bioassay_stats::{CI_LOWER, CI_UPPER, MEAN_MORTALITY};
use serde::{Deserialize, Serialize};

/// Options for [`plot_diagnostic_dose`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticPlotOptions {
    /// Categorical column on the x axis
    pub x_column: String,

    /// Column splitting bars into series; defaults to `x_column`
    pub color_column: Option<String>,

    pub title: String,

    /// Defaults to the x column name
    pub x_label: Option<String>,

    pub y_label: String,

    /// Defaults to the color column name
    pub legend_title: Option<String>,
}

impl DiagnosticPlotOptions {
    /// Options with default labels for the given x column
    pub fn new(x_column: impl Into<String>) -> Self {
        Self {
            x_column: x_column.into(),
            color_column: None,
            title: "Diagnostic Dose Mortality".to_string(),
            x_label: None,
            y_label: "Mortality (%)".to_string(),
            legend_title: None,
        }
    }

    pub fn with_color_column(mut self, column: impl Into<String>) -> Self {
        self.color_column = Some(column.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn with_legend_title(mut self, title: impl Into<String>) -> Self {
        self.legend_title = Some(title.into());
        self
    }

    fn color_column(&self) -> &str {
        self.color_column.as_deref().unwrap_or(&self.x_column)
    }
}

/// Plot the result table of `analyze_diagnostic_dose` as grouped bars.
///
/// One bar series per distinct value of the color column, in first-seen
/// order. Error bars run from `ci_lower` to `ci_upper`.
pub fn plot_diagnostic_dose(results: &Table, options: &DiagnosticPlotOptions) -> PlotResult<Chart> {
    let color_column = options.color_column();
    let x_values = results.column(&options.x_column)?;
    let mean = results.numeric_column(MEAN_MORTALITY)?;
    let lower = results.numeric_column(CI_LOWER)?;
    let upper = results.numeric_column(CI_UPPER)?;

    let x_label = options
        .x_label
        .clone()
        .unwrap_or_else(|| options.x_column.clone());
    let legend_title = options
        .legend_title
        .clone()
        .unwrap_or_else(|| color_column.to_string());

    let mut chart = Chart::new(
        options.title.clone(),
        Axis::categorical(x_label),
        Axis::linear(options.y_label.clone()),
    )
    .with_legend_title(legend_title)
    .with_bar_mode(BarMode::Group);

    for (index, series) in results.unique_labels(color_column)?.into_iter().enumerate() {
        let rows = results.rows_matching(color_column, &series)?;
        let x = rows.iter().filter_map(|&r| x_values.label(r)).collect();
        let y: Vec<f64> = rows.iter().map(|&r| mean[r]).collect();
        let plus = rows.iter().map(|&r| upper[r] - mean[r]).collect();
        let minus = rows.iter().map(|&r| mean[r] - lower[r]).collect();

        chart.push_trace(Trace::Bar(BarTrace {
            name: series,
            x,
            y,
            error_y: Some(ErrorBars { plus, minus }),
            color: palette_color(index),
        }));
    }

    tracing::debug!(
        "Diagnostic dose chart: {} series over '{}'",
        chart.traces.len(),
        options.x_column
    );
    Ok(chart)
}
