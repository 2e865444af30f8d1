//! COVIDinfo - Indonesian COVID-19 statistics dashboard
//!
//! Loads the province and daily case feeds, summarizes them per island and
//! presents the result as a tabbed dashboard or as exported files.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod gui;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod telemetry;
