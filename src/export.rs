//! File outputs of a pipeline pass: summary JSON, panel PNGs and the PPTX
//! report.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::ExportConfig;
use crate::dashboard::Dashboard;
use crate::report::{ReportError, ReportWriter, Slide};
use crate::stats::GroupSummary;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const REPORT_TITLE: &str = "COVIDinfo Indonesia";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which outputs to produce. `None` skips the output.
#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    pub summary_json: Option<PathBuf>,
    pub png_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ExportTargets {
    pub fn is_empty(&self) -> bool {
        self.summary_json.is_none() && self.png_dir.is_none() && self.report.is_none()
    }
}

/// Render every panel, in tab order, as a report slide.
pub fn render_slides(dashboard: &Dashboard, config: &ExportConfig) -> Result<Vec<Slide>, RenderError> {
    dashboard
        .panels
        .par_iter()
        .map(|panel| {
            let image =
                StaticChartRenderer::render_panel(panel, config.image_width, config.image_height)?;
            Ok(Slide {
                title: panel.title.to_string(),
                image,
            })
        })
        .collect()
}

/// Summary tables keyed by the summarized column, NaN as null.
pub fn summaries_json(dashboard: &Dashboard) -> Result<String, serde_json::Error> {
    let tables: BTreeMap<&str, &Vec<GroupSummary>> = dashboard
        .summary_tables()
        .map(|table| (table.field.column(), &table.rows))
        .collect();
    serde_json::to_string_pretty(&tables)
}

/// File name for panel `idx`: position plus a lowercase slug of the title.
pub fn panel_file_name(idx: usize, title: &str) -> String {
    let slug: Vec<String> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("{}_{}.png", idx + 1, slug.join("_"))
}

pub fn write_report(dashboard: &Dashboard, config: &ExportConfig, path: &Path) -> Result<(), ExportError> {
    let slides = render_slides(dashboard, config)?;
    ReportWriter::write_file(&slides, path, REPORT_TITLE)?;
    Ok(())
}

/// Produce every requested output.
pub fn export_all(
    dashboard: &Dashboard,
    config: &ExportConfig,
    targets: &ExportTargets,
) -> Result<(), ExportError> {
    if let Some(path) = &targets.summary_json {
        fs::write(path, summaries_json(dashboard)?)?;
        info!(path = %path.display(), "summary JSON written");
    }

    if targets.png_dir.is_none() && targets.report.is_none() {
        return Ok(());
    }

    let slides = render_slides(dashboard, config)?;

    if let Some(dir) = &targets.png_dir {
        fs::create_dir_all(dir)?;
        for (idx, slide) in slides.iter().enumerate() {
            let path = dir.join(panel_file_name(idx, &slide.title));
            fs::write(&path, &slide.image)?;
        }
        info!(dir = %dir.display(), images = slides.len(), "panel images written");
    }

    if let Some(path) = &targets.report {
        ReportWriter::write_file(&slides, path, REPORT_TITLE)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ProvinceRecord;

    fn province(island: &str, population: i64) -> ProvinceRecord {
        ProvinceRecord {
            province_name: Some("p".to_string()),
            island: Some(island.to_string()),
            population: Some(population),
            population_kmsquare: Some(1.0),
            confirmed: Some(3),
            deceased: None,
            released: None,
            capital_city: None,
        }
    }

    #[test]
    fn file_names_follow_tab_order() {
        assert_eq!(panel_file_name(0, "Population Summary"), "1_population_summary.png");
        assert_eq!(
            panel_file_name(3, "Populasi Per KM Persegi & Kasus Terkonfirmasi"),
            "4_populasi_per_km_persegi_kasus_terkonfirmasi.png"
        );
    }

    #[test]
    fn summary_json_has_null_for_undefined_std() {
        let dashboard = Dashboard::assemble(&[province("Papua", 10)], &[]);
        let json: serde_json::Value = serde_json::from_str(&summaries_json(&dashboard).unwrap()).unwrap();
        let papua = &json["population"][0];
        assert_eq!(papua["key"], "Papua");
        assert_eq!(papua["count"], 1);
        assert!(papua["std"].is_null());
        assert_eq!(json["confirmed"][0]["max"], 3.0);
    }

    #[test]
    fn no_targets_writes_nothing() {
        let dashboard = Dashboard::assemble(&[], &[]);
        assert!(ExportTargets::default().is_empty());
        export_all(&dashboard, &ExportConfig::default(), &ExportTargets::default()).unwrap();
    }
}
