//! Drawing backends for chart plans.

use std::error::Error;
use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::RenderError;
use crate::format::format_value;
use crate::plan::{ChartMode, ChartPlan};

const TITLE_FONT_SIZE: u32 = 28;
const AXIS_LABEL_FONT_SIZE: u32 = 18;
const TICK_LABEL_FONT_SIZE: u32 = 14;
const LEGEND_FONT_SIZE: u32 = 14;
const DATA_LABEL_FONT_SIZE: u32 = 11;

const X_LABEL_AREA_SIZE: u32 = 110;
const Y_LABEL_AREA_SIZE: u32 = 90;
const MARKER_SIZE: u32 = 4;

/// Destination for rendered chart plans.
pub trait ChartSink {
    /// Draw `plan` into the artifact at `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if the image cannot be drawn or written.
    fn draw(&mut self, plan: &ChartPlan, path: &Path) -> Result<(), RenderError>;
}

/// Rasterizes plans to PNG files with `plotters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngSink {
    width: u32,
    height: u32,
}

impl PngSink {
    pub fn new(width: u32, height: u32) -> Self {
        PngSink { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl ChartSink for PngSink {
    fn draw(&mut self, plan: &ChartPlan, path: &Path) -> Result<(), RenderError> {
        draw_png(plan, path, self.size()).map_err(|err| RenderError::Backend {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

type PlanChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_png(plan: &ChartPlan, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    // Log axes are drawn on log10-projected coordinates; tick labels map back.
    let mut chart = ChartBuilder::on(&root)
        .caption(&plan.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(plan.x_range(), plan.projected_y_range())?;

    let x_formatter = |x: &f64| plan.tick_label(*x);
    let y_formatter = |y: &f64| format_value(plan.y_scale.unproject(*y));
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(plan.keys.len() * 2 + 1)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style(
            ("sans-serif", TICK_LABEL_FONT_SIZE)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .x_desc(plan.x_desc.as_str())
        .y_desc(plan.y_desc.as_str())
        .draw()?;

    match plan.mode {
        ChartMode::Bar => draw_bars(&mut chart, plan)?,
        ChartMode::Line => draw_lines(&mut chart, plan)?,
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_bars(chart: &mut PlanChart<'_, '_>, plan: &ChartPlan) -> Result<(), Box<dyn Error>> {
    let scale = plan.y_scale;
    let base = scale.project(plan.bar_base());
    let bars = plan.bars();
    let annotation_style = ("sans-serif", DATA_LABEL_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (idx, series) in plan.series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        let rects = bars.iter().filter(|bar| bar.series == idx).map(|bar| {
            Rectangle::new(
                [(bar.left, base), (bar.right, scale.project(bar.value))],
                color.filled(),
            )
        });
        chart
            .draw_series(rects)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart.draw_series(bars.iter().map(|bar| {
        Text::new(
            bar.label.clone(),
            (bar.center(), scale.project(bar.value)),
            annotation_style.clone(),
        )
    }))?;
    Ok(())
}

fn draw_lines(chart: &mut PlanChart<'_, '_>, plan: &ChartPlan) -> Result<(), Box<dyn Error>> {
    let scale = plan.y_scale;
    for (idx, series) in plan.series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(1.0);
        let points: Vec<(f64, f64)> = plan
            .points(idx)
            .into_iter()
            .map(|(x, y)| (x, scale.project(y)))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }
    Ok(())
}
