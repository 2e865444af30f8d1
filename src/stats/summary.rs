//! Summary row types produced by the aggregator.

use crate::data::ProvinceRecord;
use serde::Serialize;

/// Descriptive statistics of one field for one island.
///
/// Undefined statistics are `NaN` (std of a single member, everything of
/// an empty group) and serialize to JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for GroupSummary {
    fn default() -> Self {
        Self {
            key: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl GroupSummary {
    pub fn get(&self, stat: SummaryStat) -> f64 {
        match stat {
            SummaryStat::Count => self.count as f64,
            SummaryStat::Mean => self.mean,
            SummaryStat::Std => self.std,
            SummaryStat::Min => self.min,
            SummaryStat::P25 => self.p25,
            SummaryStat::Median => self.p50,
            SummaryStat::P75 => self.p75,
            SummaryStat::Max => self.max,
        }
    }
}

/// Statistic selector used by table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStat {
    Count,
    Mean,
    Std,
    Min,
    #[serde(rename = "25%")]
    P25,
    #[serde(rename = "50%")]
    Median,
    #[serde(rename = "75%")]
    P75,
    Max,
}

/// Numeric province fields that can be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvinceField {
    Population,
    PopulationKmsquare,
    Confirmed,
    Deceased,
    Released,
}

impl ProvinceField {
    pub fn column(self) -> &'static str {
        match self {
            ProvinceField::Population => "population",
            ProvinceField::PopulationKmsquare => "population_kmsquare",
            ProvinceField::Confirmed => "confirmed",
            ProvinceField::Deceased => "deceased",
            ProvinceField::Released => "released",
        }
    }

    /// Value of this field, `None` when missing or NaN.
    pub fn value(self, record: &ProvinceRecord) -> Option<f64> {
        let value = match self {
            ProvinceField::Population => record.population.map(|v| v as f64),
            ProvinceField::PopulationKmsquare => record.population_kmsquare,
            ProvinceField::Confirmed => record.confirmed.map(|v| v as f64),
            ProvinceField::Deceased => record.deceased.map(|v| v as f64),
            ProvinceField::Released => record.released.map(|v| v as f64),
        };
        value.filter(|v| !v.is_nan())
    }
}
