//! Control Panel Widget
//! Left side panel with the data sources, reload/export actions and progress.

use crate::config::SourceConfig;
use crate::data::TextEncoding;
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// Left side control panel.
pub struct ControlPanel {
    pub sources: SourceConfig,
    pub progress: f32,
    pub status: String,
    /// A dashboard is on screen and can be exported
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(sources: SourceConfig) -> Self {
        Self {
            sources,
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦠 COVIDinfo")
                    .size(22.0)
                    .color(Color32::from_rgb(0x17, 0xCF, 0x7F)),
            );
            ui.label(RichText::new("Indonesia").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        if Self::path_row(ui, "Provinces", &self.sources.province_path, !busy) {
            action = ControlPanelAction::BrowseProvince;
        }
        ui.add_space(5.0);
        if Self::path_row(ui, "Cases", &self.sources.cases_path, !busy) {
            action = ControlPanelAction::BrowseCases;
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Encoding:"));
            ComboBox::from_id_salt("encoding")
                .width(150.0)
                .selected_text(self.sources.encoding.name())
                .show_ui(ui, |ui| {
                    for encoding in TextEncoding::ALL {
                        ui.selectable_value(&mut self.sources.encoding, encoding, encoding.name());
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!busy, |ui| {
                let button = egui::Button::new(RichText::new("⟳ Reload").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(!busy && self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export Report").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One framed row with a file name and a Browse button. True when clicked.
    fn path_row(ui: &mut egui::Ui, label: &str, path: &Path, enabled: bool) -> bool {
        let mut clicked = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).size(12.0).strong());
                    ui.label(RichText::new(file_label(path)).size(12.0))
                        .on_hover_text(path.display().to_string());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(enabled, egui::Button::new("📂 Browse")).clicked() {
                            clicked = true;
                        }
                    });
                });
            });
        clicked
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    pub fn set_province_path(&mut self, path: PathBuf) {
        self.sources.province_path = path;
    }

    pub fn set_cases_path(&mut self, path: PathBuf) {
        self.sources.cases_path = path;
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "No file selected".to_string())
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseProvince,
    BrowseCases,
    Reload,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_label_uses_file_name() {
        assert_eq!(file_label(Path::new("./data/province.csv")), "province.csv");
        assert_eq!(file_label(Path::new("")), "No file selected");
    }

    #[test]
    fn new_panel_is_ready_and_not_exportable() {
        let panel = ControlPanel::new(SourceConfig::default());
        assert_eq!(panel.status, "Ready");
        assert!(!panel.export_enabled);
    }
}
