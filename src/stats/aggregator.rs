//! Grouped descriptive statistics over province records.

use crate::data::ProvinceRecord;
use crate::stats::{GroupSummary, ProvinceField};
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

/// Computes per-island summaries with multi-threading support.
pub struct Aggregator;

impl Aggregator {
    /// Summarize `field` for every island, ordered by island name.
    ///
    /// Rows without an island are skipped. Rows with a missing value still
    /// create their island's group but do not count as members.
    pub fn summarize_by_island(
        records: &[ProvinceRecord],
        field: ProvinceField,
    ) -> Vec<GroupSummary> {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            let Some(island) = record.island.as_deref() else {
                continue;
            };
            let values = groups.entry(island).or_default();
            if let Some(value) = field.value(record) {
                values.push(value);
            }
        }

        let groups: Vec<(&str, Vec<f64>)> = groups.into_iter().collect();

        let summaries: Vec<GroupSummary> = groups
            .par_iter()
            .map(|(key, values)| {
                let mut summary = Self::describe(values);
                summary.key = key.to_string();
                summary
            })
            .collect();

        debug!(
            field = field.column(),
            groups = summaries.len(),
            "computed group summaries"
        );
        summaries
    }

    /// Compute descriptive statistics for an array of values.
    pub fn describe(values: &[f64]) -> GroupSummary {
        let n = values.len();
        if n == 0 {
            return GroupSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().mean();
        let std = if n > 1 {
            values.iter().std_dev()
        } else {
            f64::NAN
        };

        GroupSummary {
            key: String::new(),
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            p50: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn province(island: Option<&str>, population: Option<i64>, confirmed: Option<i64>) -> ProvinceRecord {
        ProvinceRecord {
            province_name: Some("p".to_string()),
            island: island.map(str::to_string),
            population,
            population_kmsquare: None,
            confirmed,
            deceased: None,
            released: None,
            capital_city: None,
        }
    }

    #[test]
    fn two_member_group() {
        let records = vec![
            province(Some("Jawa"), Some(100), None),
            province(Some("Jawa"), Some(300), None),
        ];
        let summary = Aggregator::summarize_by_island(&records, ProvinceField::Population);
        assert_eq!(summary.len(), 1);
        let jawa = &summary[0];
        assert_eq!(jawa.key, "Jawa");
        assert_eq!(jawa.count, 2);
        assert_eq!(jawa.min, 100.0);
        assert_eq!(jawa.max, 300.0);
        assert_eq!(jawa.mean, 200.0);
        assert_eq!(jawa.p50, 200.0);
        assert_eq!(jawa.p25, 150.0);
        assert_eq!(jawa.p75, 250.0);
        assert!((jawa.std - 141.421_356_237).abs() < 1e-6);
    }

    #[test]
    fn single_member_std_is_undefined() {
        let records = vec![province(Some("Papua"), Some(42), None)];
        let summary = Aggregator::summarize_by_island(&records, ProvinceField::Population);
        assert_eq!(summary[0].count, 1);
        assert!(summary[0].std.is_nan());
        assert_eq!(summary[0].mean, 42.0);
        assert_eq!(summary[0].p25, 42.0);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(Aggregator::summarize_by_island(&[], ProvinceField::Confirmed).is_empty());
    }

    #[test]
    fn groups_sorted_by_key() {
        let records = vec![
            province(Some("Sumatera"), Some(1), Some(1)),
            province(Some("Bali"), Some(2), Some(2)),
            province(Some("Jawa"), Some(3), Some(3)),
            province(Some("Bali"), Some(4), Some(4)),
        ];
        let keys: Vec<String> = Aggregator::summarize_by_island(&records, ProvinceField::Confirmed)
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["Bali", "Jawa", "Sumatera"]);
    }

    #[test]
    fn group_count_matches_distinct_islands() {
        let islands = ["Jawa", "Kalimantan", "Jawa", "Sulawesi", "Kalimantan", "Maluku"];
        let records: Vec<ProvinceRecord> = islands
            .iter()
            .enumerate()
            .map(|(i, &island)| province(Some(island), Some(i as i64 * 10), Some(i as i64)))
            .collect();
        for field in [ProvinceField::Population, ProvinceField::Confirmed] {
            let summary = Aggregator::summarize_by_island(&records, field);
            assert_eq!(summary.len(), 4);
            for group in &summary {
                assert!(group.min <= group.p50 && group.p50 <= group.max);
            }
        }
    }

    #[test]
    fn missing_values_and_islands_are_skipped() {
        let records = vec![
            province(Some("Jawa"), Some(10), None),
            province(Some("Jawa"), None, None),
            province(None, Some(999), None),
            province(Some("Maluku"), None, None),
        ];
        let summary = Aggregator::summarize_by_island(&records, ProvinceField::Population);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].key, "Jawa");
        assert_eq!(summary[0].count, 1);
        assert_eq!(summary[0].max, 10.0);
        assert_eq!(summary[1].key, "Maluku");
        assert_eq!(summary[1].count, 0);
        assert!(summary[1].mean.is_nan());
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(Aggregator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(Aggregator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(Aggregator::percentile(&sorted, 75.0), 3.25);
        assert_eq!(Aggregator::percentile(&sorted, 100.0), 4.0);
        assert!(Aggregator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn summaries_are_deterministic() {
        let records: Vec<ProvinceRecord> = (0..50)
            .map(|i| province(Some(["A", "B", "C"][i % 3]), Some((i * 37 % 11) as i64), None))
            .collect();
        let first = Aggregator::summarize_by_island(&records, ProvinceField::Population);
        let second = Aggregator::summarize_by_island(&records, ProvinceField::Population);
        assert_eq!(first, second);
    }
}
