//! Chart export
//!
//! Supports exporting charts to:
//! - Plotly JSON: a `{"data": [...], "layout": {...}}` figure any Plotly
//!   front end can render
//! - SVG: static vector image (requires the `svg` feature)

use crate::axis::{Axis, AxisKind};
use crate::chart::{Annotation, BarMode, Chart, LineDash, ScatterMode, Trace};
use crate::error::{validation, PlotResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Export format for charts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Plotly figure JSON
    #[default]
    PlotlyJson,
    /// SVG scalable vector graphics
    Svg,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PlotlyJson => "json",
            ExportFormat::Svg => "svg",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::PlotlyJson => "application/json",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

/// Export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,

    /// Output path (None = only return the content)
    pub output_path: Option<PathBuf>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Indent JSON output
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::PlotlyJson,
            output_path: None,
            width: 900,
            height: 600,
            pretty: false,
        }
    }
}

impl ExportConfig {
    /// Create config for Plotly JSON export
    pub fn plotly_json() -> Self {
        Self::default()
    }

    /// Create config for SVG export
    pub fn svg(width: u32, height: u32) -> Self {
        Self {
            format: ExportFormat::Svg,
            width,
            height,
            ..Default::default()
        }
    }

    /// Set output path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Indent JSON output
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Get suggested filename based on format
    pub fn suggested_filename(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }
}

/// Convert a chart into a Plotly figure
pub fn to_plotly_json(chart: &Chart) -> Value {
    let data: Vec<Value> = chart.traces.iter().map(trace_json).collect();
    let annotations: Vec<Value> = chart.annotations.iter().map(annotation_json).collect();

    let mut layout = json!({
        "title": { "text": chart.title },
        "xaxis": axis_json(&chart.x_axis),
        "yaxis": axis_json(&chart.y_axis),
        "barmode": match chart.bar_mode {
            BarMode::Group => "group",
            BarMode::Stack => "stack",
        },
        "annotations": annotations,
    });
    if let Some(title) = &chart.legend_title {
        layout["legend"] = json!({ "title": { "text": title } });
    }

    json!({ "data": data, "layout": layout })
}

fn axis_json(axis: &Axis) -> Value {
    let mut value = json!({
        "title": { "text": axis.label },
        "type": match axis.kind {
            AxisKind::Categorical => "category",
            AxisKind::Linear => "linear",
        },
    });
    if let Some((min, max)) = axis.range {
        value["range"] = json!([min, max]);
    }
    value
}

fn trace_json(trace: &Trace) -> Value {
    match trace {
        Trace::Bar(bar) => {
            let mut value = json!({
                "type": "bar",
                "name": bar.name,
                "x": bar.x,
                "y": bar.y,
                "marker": { "color": bar.color.to_hex() },
            });
            if let Some(errors) = &bar.error_y {
                value["error_y"] = json!({
                    "type": "data",
                    "symmetric": false,
                    "array": errors.plus,
                    "arrayminus": errors.minus,
                });
            }
            value
        }
        Trace::Scatter(scatter) => {
            let mut value = json!({
                "type": "scatter",
                "name": scatter.name,
                "x": scatter.x,
                "y": scatter.y,
            });
            match scatter.mode {
                ScatterMode::Markers => {
                    value["mode"] = json!("markers");
                    value["marker"] = json!({ "color": scatter.color.to_hex() });
                }
                ScatterMode::Lines => {
                    value["mode"] = json!("lines");
                    value["line"] = json!({
                        "color": scatter.color.to_hex(),
                        "dash": match scatter.dash {
                            LineDash::Solid => "solid",
                            LineDash::Dash => "dash",
                        },
                    });
                }
            }
            value
        }
    }
}

fn annotation_json(annotation: &Annotation) -> Value {
    let style = &annotation.style;
    json!({
        "x": annotation.x,
        "y": annotation.y,
        "text": annotation.text.replace('\n', "<br>"),
        "showarrow": style.show_arrow,
        "arrowhead": style.arrowhead,
        "arrowsize": style.arrow_size,
        "arrowwidth": style.arrow_width,
        "arrowcolor": style.arrow_color.to_hex(),
        "ax": style.offset.0,
        "ay": style.offset.1,
        "bordercolor": style.border_color.to_hex(),
        "borderwidth": style.border_width,
        "borderpad": style.border_pad,
        "bgcolor": style.background.to_hex(),
        "opacity": style.opacity,
    })
}

/// Export a chart and return the rendered content.
///
/// The content is also written to `config.output_path` when one is set.
pub fn export_chart(chart: &Chart, config: &ExportConfig) -> PlotResult<String> {
    validation::validate_dimensions(config.width, config.height)?;

    let content = match config.format {
        ExportFormat::PlotlyJson => {
            let mut figure = to_plotly_json(chart);
            figure["layout"]["width"] = json!(config.width);
            figure["layout"]["height"] = json!(config.height);
            if config.pretty {
                serde_json::to_string_pretty(&figure)?
            } else {
                serde_json::to_string(&figure)?
            }
        }
        ExportFormat::Svg => render_svg_content(chart, config)?,
    };

    if let Some(path) = &config.output_path {
        std::fs::write(path, &content)?;
        tracing::info!(
            "Exported '{}' as {} to {}",
            chart.title,
            config.format.mime_type(),
            path.display()
        );
    }

    Ok(content)
}

#[cfg(feature = "svg")]
fn render_svg_content(chart: &Chart, config: &ExportConfig) -> PlotResult<String> {
    crate::svg::render_svg(chart, config.width, config.height)
}

#[cfg(not(feature = "svg"))]
fn render_svg_content(_chart: &Chart, _config: &ExportConfig) -> PlotResult<String> {
    Err(crate::error::PlotError::UnsupportedFormat(
        "SVG export requires the `svg` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AnnotationStyle, BarTrace, ErrorBars, ScatterTrace};
    use crate::colormap::palette_color;
    use crate::error::PlotError;

    fn bar_chart() -> Chart {
        let mut chart = Chart::new("Mortality", Axis::categorical("strain"), Axis::linear("%"))
            .with_legend_title("location");
        chart.push_trace(Trace::Bar(BarTrace {
            name: "Kisumu".to_string(),
            x: vec!["Susceptible".to_string(), "Field".to_string()],
            y: vec![99.0, 62.2],
            error_y: Some(ErrorBars {
                plus: vec![1.0, 9.6],
                minus: vec![2.0, 9.6],
            }),
            color: palette_color(0),
        }));
        chart
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(ExportFormat::PlotlyJson.extension(), "json");
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(
            ExportConfig::svg(400, 300).suggested_filename("lc50"),
            "lc50.svg"
        );
    }

    #[test]
    fn test_bar_trace_json() {
        let figure = to_plotly_json(&bar_chart());
        let trace = &figure["data"][0];

        assert_eq!(trace["type"], "bar");
        assert_eq!(trace["error_y"]["symmetric"], false);
        assert_eq!(trace["error_y"]["array"], json!([1.0, 9.6]));
        assert_eq!(trace["error_y"]["arrayminus"], json!([2.0, 9.6]));
        assert_eq!(figure["layout"]["barmode"], "group");
        assert_eq!(figure["layout"]["xaxis"]["type"], "category");
        assert_eq!(figure["layout"]["legend"]["title"]["text"], "location");
    }

    #[test]
    fn test_dashed_line_and_annotation_json() {
        let mut chart = Chart::new("Probit", Axis::linear("x"), Axis::linear("y"));
        chart.push_trace(Trace::Scatter(
            ScatterTrace::line("Lab (fitted)", vec![1.0, 2.0], vec![0.1, 0.9], palette_color(1))
                .with_dash(LineDash::Dash),
        ));
        chart.push_annotation(
            Annotation::new(1.5, 0.5, "Lab\nLC50 = 1.50").with_style(AnnotationStyle::lc_callout()),
        );

        let figure = to_plotly_json(&chart);
        assert_eq!(figure["data"][0]["mode"], "lines");
        assert_eq!(figure["data"][0]["line"]["dash"], "dash");

        let annotation = &figure["layout"]["annotations"][0];
        assert_eq!(annotation["text"], "Lab<br>LC50 = 1.50");
        assert_eq!(annotation["ax"], 20.0);
        assert_eq!(annotation["ay"], -30.0);
        assert_eq!(annotation["bgcolor"], "#FF7F0E");
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let mut chart = bar_chart();
        if let Trace::Bar(bar) = &mut chart.traces[0] {
            bar.y[1] = f64::NAN;
        }
        let figure = to_plotly_json(&chart);
        assert!(figure["data"][0]["y"][1].is_null());
    }

    #[test]
    fn test_export_rejects_bad_dimensions() {
        let config = ExportConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            export_chart(&bar_chart(), &config),
            Err(PlotError::InvalidDimensions { .. })
        ));
    }

    #[cfg(not(feature = "svg"))]
    #[test]
    fn test_svg_without_feature() {
        let err = export_chart(&bar_chart(), &ExportConfig::svg(400, 300)).unwrap_err();
        assert!(matches!(err, PlotError::UnsupportedFormat(_)));
    }
}
