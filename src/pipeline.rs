//! The load → clean → aggregate → assemble pass shared by the window and
//! the headless exporter.

use crate::config::SourceConfig;
use crate::dashboard::Dashboard;
use crate::data::{CaseRecord, CleanError, Cleaner, DataLoader, LoaderError, ProvinceRecord};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanError),
}

/// Everything one pass produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub provinces: Vec<ProvinceRecord>,
    pub cases: Vec<CaseRecord>,
    pub dashboard: Dashboard,
}

/// Stage callback, receives a progress percentage and a status line.
pub type Progress<'a> = &'a mut dyn FnMut(f32, &str);

pub struct Pipeline {
    sources: SourceConfig,
}

impl Pipeline {
    pub fn new(sources: SourceConfig) -> Self {
        Self { sources }
    }

    pub fn run(&self) -> Result<PipelineOutput, PipelineError> {
        self.run_with_progress(&mut |_, _| {})
    }

    /// Run one full pass, reporting each stage to `progress`.
    pub fn run_with_progress(&self, progress: Progress<'_>) -> Result<PipelineOutput, PipelineError> {
        let loader = DataLoader::new(self.sources.encoding);

        progress(10.0, "Reading province data...");
        let raw_provinces = loader.load_provinces(&self.sources.province_path)?;

        progress(30.0, "Reading case data...");
        let raw_cases = loader.load_cases(&self.sources.cases_path)?;

        progress(50.0, "Cleaning province data...");
        let province_frame = Cleaner::clean_provinces(&raw_provinces)?;
        let provinces = ProvinceRecord::from_frame(&province_frame)?;
        let cases = CaseRecord::from_frame(&raw_cases)?;

        progress(70.0, "Calculating statistics...");
        let dashboard = Dashboard::assemble(&provinces, &cases);

        info!(
            provinces = provinces.len(),
            days = cases.len(),
            panels = dashboard.panels.len(),
            "dashboard assembled"
        );
        progress(100.0, "Complete!");

        Ok(PipelineOutput {
            provinces,
            cases,
            dashboard,
        })
    }
}
