//! Neutral chart descriptor
//!
//! A [`Chart`] records what to draw: traces, axes, annotations and layout
//! hints. Rendering and export live in [`crate::export`] and, with the
//! `svg` feature, [`crate::svg`].

use crate::axis::Axis;
use crate::colormap::Color;
use serde::{Deserialize, Serialize};

/// How bar traces sharing an x category are arranged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarMode {
    /// Side by side
    #[default]
    Group,
    /// On top of each other
    Stack,
}

/// Asymmetric error bar extents, one entry per point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBars {
    /// Extent above the value
    pub plus: Vec<f64>,
    /// Extent below the value
    pub minus: Vec<f64>,
}

/// A bar series over categorical x values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub error_y: Option<ErrorBars>,
    pub color: Color,
}

/// Scatter drawing mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterMode {
    Markers,
    Lines,
}

/// Line dash pattern
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
}

/// A series over numeric x values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mode: ScatterMode,
    pub color: Color,
    pub dash: LineDash,
}

impl ScatterTrace {
    /// Marker-only series
    pub fn markers(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>, color: Color) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode: ScatterMode::Markers,
            color,
            dash: LineDash::Solid,
        }
    }

    /// Line series
    pub fn line(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>, color: Color) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode: ScatterMode::Lines,
            color,
            dash: LineDash::Solid,
        }
    }

    /// Set the dash pattern
    pub fn with_dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }
}

/// One drawable series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Trace {
    Bar(BarTrace),
    Scatter(ScatterTrace),
}

impl Trace {
    /// Legend name
    pub fn name(&self) -> &str {
        match self {
            Trace::Bar(t) => &t.name,
            Trace::Scatter(t) => &t.name,
        }
    }

    /// Series color
    pub fn color(&self) -> Color {
        match self {
            Trace::Bar(t) => t.color,
            Trace::Scatter(t) => t.color,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        match self {
            Trace::Bar(t) => t.y.len(),
            Trace::Scatter(t) => t.y.len(),
        }
    }

    /// Check if the trace has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visual style of an annotation callout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    pub show_arrow: bool,
    pub arrowhead: u8,
    pub arrow_size: f64,
    pub arrow_width: f64,
    pub arrow_color: Color,
    /// Text offset from the anchor, in pixels (y grows downwards)
    pub offset: (f64, f64),
    pub border_color: Color,
    pub border_width: f64,
    pub border_pad: f64,
    pub background: Color,
    pub opacity: f64,
}

impl AnnotationStyle {
    /// Orange callout used for LC estimates
    pub fn lc_callout() -> Self {
        Self {
            show_arrow: true,
            arrowhead: 2,
            arrow_size: 1.0,
            arrow_width: 2.0,
            arrow_color: Color::from_hex("#636363").unwrap_or_default(),
            offset: (20.0, -30.0),
            border_color: Color::from_hex("#c7c7c7").unwrap_or_default(),
            border_width: 2.0,
            border_pad: 4.0,
            background: Color::from_hex("#ff7f0e").unwrap_or_default(),
            opacity: 0.8,
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            show_arrow: false,
            arrowhead: 0,
            arrow_size: 1.0,
            arrow_width: 1.0,
            arrow_color: Color::rgb(0.0, 0.0, 0.0),
            offset: (0.0, 0.0),
            border_color: Color::rgb(0.0, 0.0, 0.0),
            border_width: 0.0,
            border_pad: 0.0,
            background: Color::new(1.0, 1.0, 1.0, 0.0),
            opacity: 1.0,
        }
    }
}

/// Text anchored at a data coordinate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    /// Text, lines separated by `\n`
    pub text: String,
    pub style: AnnotationStyle,
}

impl Annotation {
    /// Create an annotation with the default style
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            style: AnnotationStyle::default(),
        }
    }

    /// Set the style
    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    /// Text split into lines
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

/// A complete chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend_title: Option<String>,
    pub bar_mode: BarMode,
    pub traces: Vec<Trace>,
    pub annotations: Vec<Annotation>,
}

impl Chart {
    /// Create an empty chart
    pub fn new(title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            legend_title: None,
            bar_mode: BarMode::default(),
            traces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Set the legend title
    pub fn with_legend_title(mut self, title: impl Into<String>) -> Self {
        self.legend_title = Some(title.into());
        self
    }

    /// Set the bar mode
    pub fn with_bar_mode(mut self, mode: BarMode) -> Self {
        self.bar_mode = mode;
        self
    }

    /// Append a trace
    pub fn push_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Append an annotation
    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Find a trace by legend name
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == name)
    }

    /// Bar traces, in order
    pub fn bar_traces(&self) -> impl Iterator<Item = &BarTrace> {
        self.traces.iter().filter_map(|t| match t {
            Trace::Bar(b) => Some(b),
            Trace::Scatter(_) => None,
        })
    }

    /// Scatter traces, in order
    pub fn scatter_traces(&self) -> impl Iterator<Item = &ScatterTrace> {
        self.traces.iter().filter_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            Trace::Bar(_) => None,
        })
    }
}
