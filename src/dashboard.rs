//! Presentation assembly: the four dashboard panels in tab order.

use crate::charts::{ScatterData, TimeSeries};
use crate::data::{CaseRecord, ProvinceRecord};
use crate::stats::{Aggregator, GroupSummary, ProvinceField, SummaryStat};
use serde::Serialize;

/// One displayed column of a summary table. `stat: None` is the key column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub stat: Option<SummaryStat>,
    pub title: &'static str,
}

impl TableColumn {
    fn key(title: &'static str) -> Self {
        Self { stat: None, title }
    }

    fn stat(stat: SummaryStat, title: &'static str) -> Self {
        Self {
            stat: Some(stat),
            title,
        }
    }

    /// Cell text for `row`.
    pub fn cell(&self, row: &GroupSummary) -> String {
        match self.stat {
            None => row.key.clone(),
            Some(stat) => format_stat(row.get(stat)),
        }
    }
}

/// A per-island summary table and the columns it displays.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub field: ProvinceField,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<GroupSummary>,
}

#[derive(Debug, Clone)]
pub enum PanelView {
    Table(SummaryTable),
    TimeSeries(TimeSeries),
    Scatter(ScatterData),
}

/// One named tab.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: &'static str,
    pub view: PanelView,
}

/// The assembled dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub panels: Vec<Panel>,
}

pub const POPULATION_TAB: &str = "Population Summary";
pub const CONFIRMED_TAB: &str = "Summary Kasus Positif Tiap Pulau";
pub const CASES_TAB: &str = "Plot Jumlah Kasus";
pub const SCATTER_TAB: &str = "Populasi Per KM Persegi & Kasus Terkonfirmasi";

impl Dashboard {
    /// Summarize the provinces and bind both tables into the fixed panel order.
    pub fn assemble(provinces: &[ProvinceRecord], cases: &[CaseRecord]) -> Self {
        let population = SummaryTable {
            field: ProvinceField::Population,
            columns: vec![
                TableColumn::key("Island"),
                TableColumn::stat(SummaryStat::Min, "Minimum Population"),
                TableColumn::stat(SummaryStat::Median, "Median Population"),
                TableColumn::stat(SummaryStat::Max, "Maximum Population"),
            ],
            rows: Aggregator::summarize_by_island(provinces, ProvinceField::Population),
        };

        let confirmed = SummaryTable {
            field: ProvinceField::Confirmed,
            columns: vec![
                TableColumn::key("Pulau"),
                TableColumn::stat(SummaryStat::Min, "Terkonfirmasi Minimum"),
                TableColumn::stat(SummaryStat::Mean, "Terkonfirmasi Rata-Rata"),
                TableColumn::stat(SummaryStat::Max, "Terkonfirmasi Maksimum"),
            ],
            rows: Aggregator::summarize_by_island(provinces, ProvinceField::Confirmed),
        };

        Self {
            panels: vec![
                Panel {
                    title: POPULATION_TAB,
                    view: PanelView::Table(population),
                },
                Panel {
                    title: CONFIRMED_TAB,
                    view: PanelView::Table(confirmed),
                },
                Panel {
                    title: CASES_TAB,
                    view: PanelView::TimeSeries(TimeSeries::from_cases(cases)),
                },
                Panel {
                    title: SCATTER_TAB,
                    view: PanelView::Scatter(ScatterData::from_provinces(provinces)),
                },
            ],
        }
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.panels.iter().map(|p| p.title).collect()
    }

    /// Summary tables in panel order.
    pub fn summary_tables(&self) -> impl Iterator<Item = &SummaryTable> {
        self.panels.iter().filter_map(|p| match &p.view {
            PanelView::Table(table) => Some(table),
            _ => None,
        })
    }
}

/// NaN prints as "NaN"; whole numbers print without decimals.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
