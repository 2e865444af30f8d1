//! Chart Viewer Widget
//! Tab strip over the dashboard panels and the active panel below it.

use crate::charts::{ChartPlotter, ScatterSelection};
use crate::dashboard::{Dashboard, PanelView};
use egui::{RichText, ScrollArea};

#[derive(Default)]
pub struct ChartViewer {
    dashboard: Option<Dashboard>,
    active: usize,
    selection: ScatterSelection,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_dashboard(&self) -> bool {
        self.dashboard.is_some()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Swap in a freshly assembled dashboard. The active tab survives a
    /// reload, the scatter selection does not.
    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        if self.active >= dashboard.panels.len() {
            self.active = 0;
        }
        self.selection.clear();
        self.dashboard = Some(dashboard);
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn select_tab(&mut self, idx: usize) {
        let len = self.dashboard.as_ref().map_or(0, |d| d.panels.len());
        if idx < len {
            self.active = idx;
        }
    }

    /// Tab strip, one selectable label per panel in dashboard order.
    pub fn show_tabs(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = &self.dashboard else {
            ui.label(RichText::new("No dashboard loaded").color(egui::Color32::GRAY));
            return;
        };
        let mut active = self.active;
        ui.horizontal(|ui| {
            for (idx, title) in dashboard.titles().into_iter().enumerate() {
                ui.selectable_value(&mut active, idx, RichText::new(title).size(14.0));
            }
        });
        self.select_tab(active);
    }

    /// Draw the active panel.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(panel) = self.dashboard.as_ref().and_then(|d| d.panels.get(self.active)) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        match &panel.view {
            PanelView::Table(table) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| ChartPlotter::draw_summary_table(ui, table, panel.title));
            }
            PanelView::TimeSeries(ts) => ChartPlotter::draw_time_series(ui, ts),
            PanelView::Scatter(data) => ChartPlotter::draw_scatter(ui, data, &mut self.selection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_selection_is_bounded_by_panels() {
        let mut viewer = ChartViewer::new();
        viewer.select_tab(2);
        assert_eq!(viewer.active(), 0);

        viewer.set_dashboard(Dashboard::assemble(&[], &[]));
        viewer.select_tab(3);
        assert_eq!(viewer.active(), 3);
        viewer.select_tab(4);
        assert_eq!(viewer.active(), 3);

        viewer.set_dashboard(Dashboard::assemble(&[], &[]));
        assert_eq!(viewer.active(), 3);
        assert!(viewer.has_dashboard());
    }
}
