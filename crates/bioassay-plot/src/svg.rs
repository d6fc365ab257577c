//! Static SVG rendering of charts with plotters
//!
//! Categorical charts are drawn as grouped bars with error whiskers,
//! linear charts as markers, lines and callout annotations.

use crate::axis::{padded_range, AxisKind};
use crate::chart::{
    Annotation, BarTrace, Chart, ErrorBars, LineDash, ScatterMode, ScatterTrace,
};
use crate::colormap::Color as ChartColor;
use crate::error::{validation, PlotError, PlotResult};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Share of a category slot covered by its bars
const GROUP_WIDTH: f64 = 0.8;
const LINE_HEIGHT: i32 = 14;
const CHAR_WIDTH: i32 = 7;

fn render_error(e: impl std::fmt::Display) -> PlotError {
    PlotError::Render(e.to_string())
}

fn rgb(color: ChartColor) -> RGBColor {
    let [r, g, b] = color.to_rgb8();
    RGBColor(r, g, b)
}

/// Render a chart to an SVG document
pub fn render_svg(chart: &Chart, width: u32, height: u32) -> PlotResult<String> {
    validation::validate_dimensions(width, height)?;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        match chart.x_axis.kind {
            AxisKind::Categorical => draw_bars(&root, chart)?,
            AxisKind::Linear => draw_xy(&root, chart)?,
        }

        root.present().map_err(render_error)?;
    }

    tracing::debug!("Rendered '{}' to {} bytes of SVG", chart.title, buffer.len());
    Ok(buffer)
}

fn draw_bars(root: &Area<'_>, chart: &Chart) -> PlotResult<()> {
    let bars: Vec<&BarTrace> = chart.bar_traces().collect();

    let mut categories: Vec<&str> = Vec::new();
    for bar in &bars {
        for x in &bar.x {
            if !categories.contains(&x.as_str()) {
                categories.push(x);
            }
        }
    }

    let extents = bars.iter().flat_map(|bar| {
        bar.y.iter().enumerate().flat_map(move |(i, &y)| {
            let (plus, minus) = bar
                .error_y
                .as_ref()
                .map(|e| error_extent(e, i))
                .unwrap_or((0.0, 0.0));
            [y + plus, y - minus]
        })
    });
    let (y_min, y_max) = chart
        .y_axis
        .range
        .or_else(|| padded_range(extents.chain([0.0]), 0.05))
        .unwrap_or((0.0, 1.0));

    let n = categories.len().max(1);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_min..y_max)
        .map_err(render_error)?;

    let category_label = |x: &f64| {
        let slot = x.round();
        if (x - slot).abs() < 1e-6 && slot >= 0.0 {
            categories
                .get(slot as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        } else {
            String::new()
        }
    };
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&category_label)
        .x_desc(chart.x_axis.label.as_str())
        .y_desc(chart.y_axis.label.as_str())
        .draw()
        .map_err(render_error)?;

    let width = GROUP_WIDTH / bars.len().max(1) as f64;
    for (s, bar) in bars.iter().enumerate() {
        let color = rgb(bar.color);
        let mut rects = Vec::new();
        let mut whiskers = Vec::new();

        for (i, x) in bar.x.iter().enumerate() {
            let Some(slot) = categories.iter().position(|c| c == x) else {
                continue;
            };
            let y = bar.y[i];
            if !y.is_finite() {
                continue;
            }
            let left = slot as f64 - GROUP_WIDTH / 2.0 + width * s as f64;
            let center = left + width / 2.0;
            rects.push(Rectangle::new([(left, 0.0), (left + width, y)], color.filled()));

            if let Some(errors) = &bar.error_y {
                let (plus, minus) = error_extent(errors, i);
                let (top, bottom) = (y + plus, y - minus);
                if top.is_finite() && bottom.is_finite() {
                    let cap = width / 4.0;
                    whiskers.push(PathElement::new(vec![(center, bottom), (center, top)], BLACK));
                    whiskers.push(PathElement::new(
                        vec![(center - cap, top), (center + cap, top)],
                        BLACK,
                    ));
                    whiskers.push(PathElement::new(
                        vec![(center - cap, bottom), (center + cap, bottom)],
                        BLACK,
                    ));
                }
            }
        }

        ctx.draw_series(rects)
            .map_err(render_error)?
            .label(bar.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        ctx.draw_series(whiskers).map_err(render_error)?;
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;

    Ok(())
}

fn error_extent(errors: &ErrorBars, i: usize) -> (f64, f64) {
    (
        errors.plus.get(i).copied().unwrap_or(0.0),
        errors.minus.get(i).copied().unwrap_or(0.0),
    )
}

fn draw_xy(root: &Area<'_>, chart: &Chart) -> PlotResult<()> {
    let series: Vec<&ScatterTrace> = chart.scatter_traces().collect();

    let (x_min, x_max) = chart
        .x_axis
        .range
        .or_else(|| padded_range(series.iter().flat_map(|s| s.x.iter().copied()), 0.05))
        .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = chart
        .y_axis
        .range
        .or_else(|| padded_range(series.iter().flat_map(|s| s.y.iter().copied()), 0.05))
        .unwrap_or((0.0, 1.0));

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_error)?;

    ctx.configure_mesh()
        .x_desc(chart.x_axis.label.as_str())
        .y_desc(chart.y_axis.label.as_str())
        .draw()
        .map_err(render_error)?;

    for trace in &series {
        let color = rgb(trace.color);
        let points: Vec<(f64, f64)> = trace
            .x
            .iter()
            .zip(&trace.y)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        match trace.mode {
            ScatterMode::Markers => {
                ctx.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
                    .map_err(render_error)?
                    .label(trace.name.as_str())
                    .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
            }
            ScatterMode::Lines => {
                let style = color.stroke_width(2);
                let segments: Vec<PathElement<(f64, f64)>> = match trace.dash {
                    LineDash::Solid => vec![PathElement::new(points, style)],
                    // Alternate drawn and skipped point-to-point steps
                    LineDash::Dash => points
                        .windows(2)
                        .step_by(2)
                        .map(|pair| PathElement::new(pair.to_vec(), style))
                        .collect(),
                };
                ctx.draw_series(segments)
                    .map_err(render_error)?
                    .label(trace.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }

    for annotation in &chart.annotations {
        let inside = (x_min..=x_max).contains(&annotation.x)
            && (y_min..=y_max).contains(&annotation.y);
        if inside {
            draw_callout(&ctx, annotation)?;
        } else {
            tracing::debug!(
                "Annotation at ({}, {}) falls outside the plot area",
                annotation.x,
                annotation.y
            );
        }
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;

    Ok(())
}

fn draw_callout(
    ctx: &ChartContext<'_, SVGBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    annotation: &Annotation,
) -> PlotResult<()> {
    let style = &annotation.style;
    let anchor = (annotation.x, annotation.y);
    let lines = annotation.lines();

    let pad = style.border_pad.round() as i32;
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let (dx, dy) = (style.offset.0.round() as i32, style.offset.1.round() as i32);
    let (box_w, box_h) = (
        longest * CHAR_WIDTH + 2 * pad,
        lines.len() as i32 * LINE_HEIGHT + 2 * pad,
    );
    let top_left = (dx, dy - box_h);

    let fill = rgb(style.background).mix(style.opacity).filled();
    let border = ShapeStyle {
        color: rgb(style.border_color).to_rgba(),
        filled: false,
        stroke_width: style.border_width.round() as u32,
    };

    if style.show_arrow {
        let arrow = rgb(style.arrow_color).stroke_width(style.arrow_width.round() as u32);
        ctx.plotting_area()
            .draw(&(EmptyElement::at(anchor) + PathElement::new(vec![(0, 0), (dx, dy)], arrow)))
            .map_err(render_error)?;
    }

    let corners = [top_left, (top_left.0 + box_w, top_left.1 + box_h)];
    ctx.plotting_area()
        .draw(&(EmptyElement::at(anchor) + Rectangle::new(corners, fill)))
        .map_err(render_error)?;
    ctx.plotting_area()
        .draw(&(EmptyElement::at(anchor) + Rectangle::new(corners, border)))
        .map_err(render_error)?;

    for (i, line) in lines.iter().enumerate() {
        let position = (top_left.0 + pad, top_left.1 + pad + i as i32 * LINE_HEIGHT);
        ctx.plotting_area()
            .draw(
                &(EmptyElement::at(anchor)
                    + Text::new(line.to_string(), position, ("sans-serif", 12).into_font())),
            )
            .map_err(render_error)?;
    }

    Ok(())
}
