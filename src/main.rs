//! COVIDinfo - Indonesian COVID-19 statistics dashboard.
//!
//! Opens the dashboard window by default; `export` runs the same pipeline
//! headless and writes the requested files.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use covidinfo::config::DashboardConfig;
use covidinfo::data::TextEncoding;
use covidinfo::export::{self, ExportTargets};
use covidinfo::gui::DashboardApp;
use covidinfo::pipeline::Pipeline;
use covidinfo::telemetry;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "covidinfo",
    about = "Indonesian COVID-19 statistics dashboard",
    version
)]
struct Cli {
    /// JSON config file, missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the province data file
    #[arg(long, global = true)]
    province: Option<PathBuf>,
    /// Override the daily case data file
    #[arg(long, global = true)]
    cases: Option<PathBuf>,
    /// Override the text encoding of both files
    #[arg(long, global = true, value_enum)]
    encoding: Option<TextEncoding>,
    /// Override the log filter (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the dashboard window (default command)
    Gui,
    /// Run the pipeline without a window and write files
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Write both summary tables as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// Write one PNG per panel into this directory
    #[arg(long)]
    png_dir: Option<PathBuf>,
    /// Write the PPTX report
    #[arg(long)]
    report: Option<PathBuf>,
    /// Override the exported image width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Override the exported image height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn resolve_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(path) = &self.province {
            config.sources.province_path = path.clone();
        }
        if let Some(path) = &self.cases {
            config.sources.cases_path = path.clone();
        }
        if let Some(encoding) = self.encoding {
            config.sources.encoding = encoding;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(Command::Export(args)) = &self.command {
            if let Some(width) = args.width {
                config.export.image_width = width;
            }
            if let Some(height) = args.height {
                config.export.image_height = height;
            }
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    telemetry::init(&config.log_level)?;

    match cli.command {
        Some(Command::Export(args)) => run_export(config, args),
        Some(Command::Gui) | None => run_gui(config),
    }
}

fn run_export(config: DashboardConfig, args: ExportArgs) -> anyhow::Result<()> {
    let targets = ExportTargets {
        summary_json: args.summary_json,
        png_dir: args.png_dir,
        report: args.report,
    };
    if targets.is_empty() {
        bail!("nothing to export: pass --summary-json, --png-dir or --report");
    }

    let output = Pipeline::new(config.sources.clone())
        .run()
        .context("pipeline failed")?;
    export::export_all(&output.dashboard, &config.export, &targets).context("export failed")?;

    info!(panels = output.dashboard.panels.len(), "export complete");
    Ok(())
}

fn run_gui(config: DashboardConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 600.0])
            .with_title("COVIDinfo"),
        ..Default::default()
    };

    eframe::run_native(
        "COVIDinfo",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
