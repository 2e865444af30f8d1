//! Static Chart Renderer
//! Renders dashboard panels to PNG images with plotters, for file export
//! and report slides.
//!
//! Layout follows the interactive dashboard: panel title on top, then the
//! chart (or table) filling the rest of the image.

use crate::charts::{Rgb, ScatterData, SeriesKind, TimeSeries, BAR_ALPHA, BAR_WIDTH, SCATTER_COLOR};
use crate::dashboard::{Panel, PanelView, SummaryTable};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("image buffer has the wrong size")]
    Buffer,
    #[error("invalid image size {width}x{height}")]
    Size { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Largest accepted image side in pixels.
const MAX_SIDE: u32 = 16_384;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Most date labels drawn on the x axis.
const MAX_DATE_LABELS: usize = 40;

/// Whole-day x positions that get a date label, evenly thinned to at most
/// `MAX_DATE_LABELS`.
fn date_ticks(days: usize) -> Vec<f64> {
    let step = days.div_ceil(MAX_DATE_LABELS).max(1);
    (0..days).step_by(step).map(|day| day as f64).collect()
}

/// Day axis with explicit key points. Wraps `WithKeyPoints` so the axis
/// satisfies the mesh's `ValueFormatter` bound; labels come from the
/// explicit `x_label_formatter` anyway.
struct DayAxis(plotters::coord::combinators::WithKeyPoints<plotters::coord::types::RangedCoordf64>);

impl Ranged for DayAxis {
    type ValueType = f64;
    type FormatOption = plotters::coord::ranged1d::DefaultFormatting;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: plotters::coord::ranged1d::KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one panel into PNG bytes.
    pub fn render_panel(panel: &Panel, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(RenderError::Size { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(RenderError::Size { width, height })?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let body = root.titled(panel.title, ("sans-serif", 26)).map_err(draw_err)?;

            match &panel.view {
                PanelView::Table(table) => Self::draw_table(&body, table)?,
                PanelView::TimeSeries(ts) => Self::draw_time_series(&body, ts)?,
                PanelView::Scatter(data) => Self::draw_scatter(&body, data)?,
            }

            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn draw_time_series(area: &Area<'_>, ts: &TimeSeries) -> Result<(), RenderError> {
        let n = ts.len().max(1) as f64;
        let y_top = (ts.y_max() * 1.1).max(1.0);
        let dates = ts.dates.clone();

        let mut chart = ChartBuilder::on(area)
            .caption(ts.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(70)
            .build_cartesian_2d(
                DayAxis((-0.5f64..(n - 0.5)).with_key_points(date_ticks(ts.len()))),
                0f64..y_top,
            )
            .map_err(draw_err)?;

        let label_font = ("sans-serif", 11)
            .into_font()
            .transform(FontTransform::Rotate90);
        chart
            .configure_mesh()
            .x_desc(ts.x_label)
            .y_desc(ts.y_label)
            .x_label_style(label_font)
            .x_label_formatter(&|x: &f64| {
                if x.fract() != 0.0 || *x < 0.0 {
                    return String::new();
                }
                dates.get(*x as usize).cloned().unwrap_or_default()
            })
            .draw()
            .map_err(draw_err)?;

        let half = BAR_WIDTH / 2.0;
        for series in &ts.series {
            let color = rgb(series.color);
            match series.kind {
                SeriesKind::Line => {
                    let points = series
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| (i as f64, v)));
                    chart
                        .draw_series(LineSeries::new(points, color.stroke_width(2)))
                        .map_err(draw_err)?
                        .label(series.label)
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
                }
                SeriesKind::Bar => {
                    let fill = color.mix(BAR_ALPHA as f64).filled();
                    let bars = series.values.iter().enumerate().filter_map(|(i, v)| {
                        v.map(|v| Rectangle::new([(i as f64 - half, 0.0), (i as f64 + half, v)], fill))
                    });
                    chart
                        .draw_series(bars)
                        .map_err(draw_err)?
                        .label(series.label)
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 16, y + 5)], color.mix(BAR_ALPHA as f64).filled())
                        });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_scatter(area: &Area<'_>, data: &ScatterData) -> Result<(), RenderError> {
        let (x0, x1, y0, y1) = data.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
        let pad = |lo: f64, hi: f64| {
            let span = if hi > lo { hi - lo } else { 1.0 };
            (lo - span * 0.05, hi + span * 0.05)
        };
        let (x_lo, x_hi) = pad(x0, x1);
        let (y_lo, y_hi) = pad(y0, y1);

        let mut chart = ChartBuilder::on(area)
            .caption(data.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(data.x_label)
            .y_desc(data.y_label)
            .draw()
            .map_err(draw_err)?;

        let color = rgb(SCATTER_COLOR);
        chart
            .draw_series(data.points.iter().map(|p| {
                EmptyElement::at((p.x, p.y)) + Rectangle::new([(-4, -4), (4, 4)], color.filled())
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_table(area: &Area<'_>, table: &SummaryTable) -> Result<(), RenderError> {
        let (width, _) = area.dim_in_pixel();
        let margin = 30i32;
        let row_h = 32i32;
        let col_w = ((width as i32 - 2 * margin) / table.columns.len().max(1) as i32).max(1);

        let header = TextStyle::from(("sans-serif", 18).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Left, VPos::Center));
        let cell = TextStyle::from(("sans-serif", 18).into_font())
            .pos(Pos::new(HPos::Left, VPos::Center));

        let mut y = margin;
        for (c, column) in table.columns.iter().enumerate() {
            let x = margin + c as i32 * col_w;
            area.draw(&Text::new(column.title, (x + 6, y + row_h / 2), header.clone()))
                .map_err(draw_err)?;
        }
        y += row_h;
        area.draw(&PathElement::new(
            vec![(margin, y), (width as i32 - margin, y)],
            BLACK.stroke_width(2),
        ))
        .map_err(draw_err)?;

        for (r, row) in table.rows.iter().enumerate() {
            if r % 2 == 1 {
                area.draw(&Rectangle::new(
                    [(margin, y), (width as i32 - margin, y + row_h)],
                    RGBColor(240, 240, 240).filled(),
                ))
                .map_err(draw_err)?;
            }
            for (c, column) in table.columns.iter().enumerate() {
                let x = margin + c as i32 * col_w;
                area.draw(&Text::new(column.cell(row), (x + 6, y + row_h / 2), cell.clone()))
                    .map_err(draw_err)?;
            }
            y += row_h;
        }

        Ok(())
    }
}
