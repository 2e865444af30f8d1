//! Chart Plotter Module
//! Draws the dashboard views interactively using egui_plot.

use crate::charts::{
    Rgb, ScatterData, SeriesKind, TimeSeries, BAR_ALPHA, BAR_WIDTH, NONSELECTION_COLOR,
    SCATTER_COLOR, SELECTION_COLOR,
};
use crate::dashboard::SummaryTable;
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, Corner, Legend, Line, MarkerShape, Plot, PlotBounds, PlotPoints, Points,
};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

const CHART_HEIGHT: f32 = 600.0;
/// Hover/tap radius in units of the visible axis span.
const PICK_RADIUS: f64 = 0.05;

/// Nearest point to (x, y), measured in units of the visible axis spans.
fn pick_point(data: &ScatterData, x: f64, y: f64, bounds: &PlotBounds) -> Option<usize> {
    data.nearest(x, y, bounds.width(), bounds.height(), PICK_RADIUS)
}

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Selected province indices of the scatter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScatterSelection {
    pub selected: BTreeSet<usize>,
}

impl ScatterSelection {
    /// Tap behaviour: plain tap replaces the selection, shift-tap toggles
    /// membership, tapping empty space clears.
    pub fn tap(&mut self, hit: Option<usize>, extend: bool) {
        match (hit, extend) {
            (Some(idx), true) => {
                if !self.selected.remove(&idx) {
                    self.selected.insert(idx);
                }
            }
            (Some(idx), false) => {
                self.selected.clear();
                self.selected.insert(idx);
            }
            (None, true) => {}
            (None, false) => self.selected.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Accumulated line plus translucent daily bars on a categorical date axis.
    /// Legend entries toggle their series when clicked.
    pub fn draw_time_series(ui: &mut egui::Ui, ts: &TimeSeries) {
        ui.label(RichText::new(ts.title).size(16.0).strong());
        ui.add_space(6.0);

        let x_labels = ts.dates.clone();
        let hover = ts.clone();

        Plot::new("time_series")
            .height(CHART_HEIGHT)
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_label(ts.x_label)
            .y_axis_label(ts.y_label)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v.fract() != 0.0 || v < 0.0 {
                    return String::new();
                }
                x_labels.get(v as usize).cloned().unwrap_or_default()
            })
            .label_formatter(move |_name, value| {
                hover
                    .index_at(value.x)
                    .and_then(|idx| hover.tooltip(idx))
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for series in &ts.series {
                    let color = to_color32(series.color);
                    match series.kind {
                        SeriesKind::Line => {
                            let points: PlotPoints = series
                                .values
                                .iter()
                                .enumerate()
                                .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
                                .collect();
                            plot_ui.line(
                                Line::new(points)
                                    .color(color)
                                    .width(1.5)
                                    .name(series.label),
                            );
                        }
                        SeriesKind::Bar => {
                            let bars: Vec<Bar> = series
                                .values
                                .iter()
                                .enumerate()
                                .filter_map(|(i, v)| v.map(|v| Bar::new(i as f64, v)))
                                .map(|bar| {
                                    bar.width(BAR_WIDTH)
                                        .fill(color.gamma_multiply(BAR_ALPHA))
                                        .stroke(egui::Stroke::new(1.0, color))
                                })
                                .collect();
                            plot_ui.bar_chart(BarChart::new(bars).color(color).name(series.label));
                        }
                    }
                }
            });
    }

    /// Density/confirmed scatter with hover details and tap selection.
    pub fn draw_scatter(ui: &mut egui::Ui, data: &ScatterData, selection: &mut ScatterSelection) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(data.title).size(16.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset").clicked() {
                    selection.clear();
                }
                if !selection.is_empty() {
                    ui.label(format!("{} selected", selection.selected.len()));
                }
            });
        });
        ui.add_space(6.0);

        // Hover runs inside the plot, so it reads the bounds shown this frame.
        let view = Rc::new(Cell::new(None::<PlotBounds>));
        let hover_view = Rc::clone(&view);
        let hover = data.clone();

        let response = Plot::new("scatter")
            .height(CHART_HEIGHT)
            .x_axis_label(data.x_label)
            .y_axis_label(data.y_label)
            .allow_double_click_reset(true)
            .label_formatter(move |_name, value| {
                hover_view
                    .get()
                    .and_then(|bounds| pick_point(&hover, value.x, value.y, &bounds))
                    .map(|idx| hover.points[idx].tooltip())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                view.set(Some(plot_ui.plot_bounds()));

                let (selected, others): (Vec<_>, Vec<_>) = data
                    .points
                    .iter()
                    .enumerate()
                    .partition(|(i, _)| selection.selected.contains(i));

                let other_color = if selection.is_empty() {
                    to_color32(SCATTER_COLOR)
                } else {
                    to_color32(NONSELECTION_COLOR).gamma_multiply(BAR_ALPHA)
                };

                let other_points: PlotPoints = others.iter().map(|(_, p)| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(other_points)
                        .shape(MarkerShape::Square)
                        .radius(5.0)
                        .color(other_color)
                        .name("Provinsi"),
                );

                if !selected.is_empty() {
                    let selected_points: PlotPoints =
                        selected.iter().map(|(_, p)| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(selected_points)
                            .shape(MarkerShape::Square)
                            .radius(6.0)
                            .color(to_color32(SELECTION_COLOR))
                            .name("Terpilih"),
                    );
                }
            });

        if response.response.clicked() {
            if let Some(pos) = response.response.interact_pointer_pos() {
                let coord = response.transform.value_from_position(pos);
                let hit = pick_point(data, coord.x, coord.y, response.transform.bounds());
                let extend = ui.input(|i| i.modifiers.shift);
                selection.tap(hit, extend);
            }
        }
    }

    /// Draw a summary table
    pub fn draw_summary_table(ui: &mut egui::Ui, table: &SummaryTable, title: &str) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(6.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("summary_{}", table.field.column())))
                    .striped(true)
                    .min_col_width(160.0)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        for column in &table.columns {
                            ui.label(RichText::new(column.title).strong().size(13.0));
                        }
                        ui.end_row();

                        for row in &table.rows {
                            for column in &table.columns {
                                let text = column.cell(row);
                                let color = if text == "NaN" {
                                    Color32::GRAY
                                } else {
                                    ui.visuals().text_color()
                                };
                                ui.label(RichText::new(text).size(13.0).color(color));
                            }
                            ui.end_row();
                        }
                    });
            });

        if table.rows.is_empty() {
            ui.label(RichText::new("No Data").color(Color32::GRAY));
        }
    }
}
