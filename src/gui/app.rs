//! COVIDinfo Main Application
//! Main window with control panel, tab strip and panel viewer.

use crate::config::{DashboardConfig, ExportConfig};
use crate::export;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{Pipeline, PipelineOutput};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info};

/// Pipeline result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete(Box<PipelineOutput>),
    Error(String),
}

/// Tracks the running pipeline pass and at most one queued follow-up.
#[derive(Debug, Default)]
struct ReloadGate {
    loading: bool,
    pending: bool,
}

impl ReloadGate {
    /// True when a pass should start now. Otherwise one is queued.
    fn request(&mut self) -> bool {
        if self.loading {
            self.pending = true;
            false
        } else {
            self.loading = true;
            true
        }
    }

    /// End the running pass. True when a queued pass should start.
    fn finish(&mut self) -> bool {
        self.loading = false;
        std::mem::take(&mut self.pending)
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Main application window.
pub struct DashboardApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    export: ExportConfig,

    load_rx: Option<Receiver<LoadResult>>,
    reload: ReloadGate,
}

impl DashboardApp {
    /// Build the window and start the first pipeline pass.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.sources),
            chart_viewer: ChartViewer::new(),
            export: config.export,
            load_rx: None,
            reload: ReloadGate::default(),
        };
        app.start_reload();
        app
    }

    fn handle_browse(&mut self, province: bool) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            if province {
                self.control_panel.set_province_path(path);
            } else {
                self.control_panel.set_cases_path(path);
            }
            self.start_reload();
        }
    }

    /// Run the pipeline in a background thread
    fn start_reload(&mut self) {
        if !self.reload.request() {
            return;
        }

        let pipeline = Pipeline::new(self.control_panel.sources.clone());
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.control_panel.set_progress(5.0, "Loading data...");

        thread::spawn(move || {
            let mut report = |progress: f32, status: &str| {
                let _ = tx.send(LoadResult::Progress(progress, status.to_string()));
            };
            let result = match pipeline.run_with_progress(&mut report) {
                Ok(output) => LoadResult::Complete(Box::new(output)),
                Err(e) => {
                    error!(error = %e, "pipeline failed");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(output) => {
                        let status = format!(
                            "Complete! {} provinces, {} days",
                            output.provinces.len(),
                            output.cases.len()
                        );
                        self.chart_viewer.set_dashboard(output.dashboard);
                        self.control_panel.set_progress(100.0, &status);
                        self.control_panel.export_enabled = true;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            } else if self.reload.finish() {
                self.start_reload();
            }
        }
    }

    /// Render every panel to the PPTX report and open it
    fn handle_export_report(&mut self) {
        let Some(dashboard) = self.chart_viewer.dashboard() else {
            self.control_panel.set_progress(0.0, "No dashboard to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name("covidinfo_report.pptx")
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        match export::write_report(dashboard, &self.export, &output_path) {
            Ok(()) => {
                info!(path = %output_path.display(), "report exported");
                self.control_panel.set_progress(
                    100.0,
                    &format!("Report exported: {} slides", dashboard.panels.len()),
                );
                if let Err(e) = open::that(&output_path) {
                    error!(error = %e, "could not open report");
                }
            }
            Err(e) => {
                error!(error = %e, "report export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.reload.is_loading() {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.reload.is_loading()) {
                        ControlPanelAction::BrowseProvince => self.handle_browse(true),
                        ControlPanelAction::BrowseCases => self.handle_browse(false),
                        ControlPanelAction::Reload => self.start_reload(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(4.0);
            self.chart_viewer.show_tabs(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_gate_starts_immediately() {
        let mut gate = ReloadGate::default();
        assert!(gate.request());
        assert!(gate.is_loading());
        assert!(!gate.finish());
        assert!(!gate.is_loading());
    }

    #[test]
    fn request_during_load_runs_after_it() {
        let mut gate = ReloadGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());

        // Queued requests collapse into one follow-up pass.
        assert!(gate.finish());
        assert!(gate.request());
        assert!(!gate.finish());
    }
}
