//! Charts module - chart data, interactive plotting and static rendering

mod plotter;
mod renderer;
mod series;

pub use plotter::{to_color32, ChartPlotter, ScatterSelection};
pub use renderer::{RenderError, StaticChartRenderer};
pub use series::{
    Rgb, ScatterData, ScatterPoint, Series, SeriesKind, TimeSeries, ACC_LINE_COLOR, BAR_ALPHA,
    BAR_WIDTH, NONSELECTION_COLOR, SCATTER_COLOR, SELECTION_COLOR,
};
