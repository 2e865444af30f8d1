//! Chart data sources bound directly from the record tables.

use crate::data::{CaseRecord, ProvinceRecord};

/// 8-bit RGB color shared by the interactive and static renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const ACC_LINE_COLOR: Rgb = Rgb(0, 0, 0);
pub const SCATTER_COLOR: Rgb = Rgb(0x34, 0xEB, 0x6E);
pub const SELECTION_COLOR: Rgb = Rgb(0x17, 0xCF, 0x7F);
pub const NONSELECTION_COLOR: Rgb = Rgb(211, 211, 211);

/// Bar alpha, also applied to non-selected scatter points.
pub const BAR_ALPHA: f32 = 0.3;
pub const BAR_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Bar,
}

/// One plotted column of the case table.
#[derive(Debug, Clone)]
pub struct Series {
    pub column: &'static str,
    pub label: &'static str,
    pub kind: SeriesKind,
    pub color: Rgb,
    pub values: Vec<Option<f64>>,
}

/// Daily case counts on a categorical date axis. Point `i` sits at x = i.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub dates: Vec<String>,
    pub series: Vec<Series>,
    /// Tooltip rows as (label, column)
    pub tooltips: Vec<(&'static str, &'static str)>,
}

impl TimeSeries {
    pub fn from_cases(cases: &[CaseRecord]) -> Self {
        let column = |f: fn(&CaseRecord) -> Option<i64>| -> Vec<Option<f64>> {
            cases.iter().map(|c| f(c).map(|v| v as f64)).collect()
        };

        let series = vec![
            Series {
                column: "acc_confirmed",
                label: "Kasus akumulasi",
                kind: SeriesKind::Line,
                color: ACC_LINE_COLOR,
                values: column(|c| c.acc_confirmed),
            },
            Series {
                column: "new_confirmed",
                label: "Terkonfirmasi positif harian",
                kind: SeriesKind::Bar,
                color: Rgb(0x47, 0xA1, 0xBF),
                values: column(|c| c.new_confirmed),
            },
            Series {
                column: "new_released",
                label: "Sembuh harian",
                kind: SeriesKind::Bar,
                color: Rgb(0xE3, 0x32, 0xB4),
                values: column(|c| c.new_released),
            },
            Series {
                column: "new_deceased",
                label: "Meninggal harian",
                kind: SeriesKind::Bar,
                color: Rgb(0x99, 0xE3, 0x32),
                values: column(|c| c.new_deceased),
            },
            Series {
                column: "new_tested",
                label: "Tes harian",
                kind: SeriesKind::Bar,
                color: Rgb(0xFF, 0xD0, 0x36),
                values: column(|c| c.new_tested),
            },
            Series {
                column: "being_checked",
                label: "Tes dalam proses",
                kind: SeriesKind::Bar,
                color: Rgb(0xFC, 0x03, 0x39),
                values: column(|c| c.being_checked),
            },
        ];

        Self {
            title: "Jumlah Terkonfirmasi Positif Maret 2020",
            x_label: "Tanggal",
            y_label: "Jumlah kasus",
            dates: cases.iter().map(|c| c.date.clone()).collect(),
            series,
            tooltips: vec![
                ("Total Kasus", "acc_confirmed"),
                ("Kasus baru", "new_confirmed"),
                ("Sembuh", "new_released"),
                ("Meninggal", "new_deceased"),
                ("Jumlah tes baru", "new_tested"),
                ("Dalam proses tes", "being_checked"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Largest value over all series, 0 when there is none.
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0, |acc: f64, &v| acc.max(v))
    }

    /// Date index nearest to plot x coordinate `x`.
    pub fn index_at(&self, x: f64) -> Option<usize> {
        if self.dates.is_empty() || !x.is_finite() {
            return None;
        }
        let idx = x.round().clamp(0.0, (self.dates.len() - 1) as f64) as usize;
        Some(idx)
    }

    /// Hover tooltip text for date index `idx`.
    pub fn tooltip(&self, idx: usize) -> Option<String> {
        let date = self.dates.get(idx)?;
        let mut lines = vec![date.clone()];
        for (label, column) in &self.tooltips {
            let value = self
                .series
                .iter()
                .find(|s| s.column == *column)
                .and_then(|s| s.values.get(idx).copied().flatten());
            lines.push(format!("{}: {}", label, format_count(value)));
        }
        Some(lines.join("\n"))
    }
}

/// One province on the density/confirmed scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub province_name: String,
    pub island: String,
    pub capital_city: String,
    pub confirmed: Option<i64>,
    pub deceased: Option<i64>,
    pub released: Option<i64>,
}

impl ScatterPoint {
    pub fn tooltip(&self) -> String {
        [
            format!("Provinsi: {}", self.province_name),
            format!("Pulau: {}", self.island),
            format!("Ibukota: {}", self.capital_city),
            format!("Kasus positif: {}", format_count(self.confirmed.map(|v| v as f64))),
            format!("Meninggal: {}", format_count(self.deceased.map(|v| v as f64))),
            format!("Sembuh: {}", format_count(self.released.map(|v| v as f64))),
        ]
        .join("\n")
    }
}

/// Population density against confirmed cases, one point per province.
#[derive(Debug, Clone)]
pub struct ScatterData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ScatterPoint>,
}

impl ScatterData {
    /// Provinces missing either coordinate are left off the plot.
    pub fn from_provinces(provinces: &[ProvinceRecord]) -> Self {
        let points = provinces
            .iter()
            .filter_map(|p| {
                let x = p.population_kmsquare.filter(|v| v.is_finite())?;
                let y = p.confirmed? as f64;
                Some(ScatterPoint {
                    x,
                    y,
                    province_name: p.province_name.clone().unwrap_or_default(),
                    island: p.island.clone().unwrap_or_default(),
                    capital_city: p.capital_city.clone().unwrap_or_default(),
                    confirmed: p.confirmed,
                    deceased: p.deceased,
                    released: p.released,
                })
            })
            .collect();

        Self {
            title: "Perbandingan Kasus Positif terhadap Kepadatan Penduduk",
            x_label: "Populasi per KM persegi",
            y_label: "Kasus terkonfirmasi",
            points,
        }
    }

    /// (x_min, x_max, y_min, y_max) over all points.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        let init = (first.x, first.x, first.y, first.y);
        Some(self.points.iter().fold(init, |(x0, x1, y0, y1), p| {
            (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y))
        }))
    }

    /// Index of the point nearest to (x, y), with distances scaled by the
    /// visible axis spans so both axes weigh equally. Points further than
    /// `max_dist` (in span units) are ignored.
    pub fn nearest(&self, x: f64, y: f64, x_span: f64, y_span: f64, max_dist: f64) -> Option<usize> {
        let x_span = if x_span > 0.0 { x_span } else { 1.0 };
        let y_span = if y_span > 0.0 { y_span } else { 1.0 };

        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let dx = (p.x - x) / x_span;
                let dy = (p.y - y) / y_span;
                (i, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(_, d)| *d <= max_dist)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}

fn format_count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(date: &str, acc: i64, new: i64) -> CaseRecord {
        CaseRecord {
            date: date.to_string(),
            acc_confirmed: Some(acc),
            new_confirmed: Some(new),
            new_released: Some(0),
            new_deceased: None,
            new_tested: Some(12),
            being_checked: Some(3),
        }
    }

    fn province(name: &str, density: Option<f64>, confirmed: Option<i64>) -> ProvinceRecord {
        ProvinceRecord {
            province_name: Some(name.to_string()),
            island: Some("Jawa".to_string()),
            population: Some(1000),
            population_kmsquare: density,
            confirmed,
            deceased: Some(1),
            released: Some(2),
            capital_city: Some("Kota".to_string()),
        }
    }

    #[test]
    fn time_series_binds_every_column() {
        let ts = TimeSeries::from_cases(&[case("2020-03-02", 2, 2), case("2020-03-03", 2, 0)]);
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.series.len(), 6);
        assert_eq!(ts.series[0].kind, SeriesKind::Line);
        assert!(ts.series[1..].iter().all(|s| s.kind == SeriesKind::Bar));
        assert_eq!(ts.series[4].values, vec![Some(12.0), Some(12.0)]);
        assert_eq!(ts.y_max(), 12.0);
    }

    #[test]
    fn index_at_clamps_to_axis() {
        let ts = TimeSeries::from_cases(&[case("a", 1, 1), case("b", 2, 1), case("c", 3, 1)]);
        assert_eq!(ts.index_at(1.4), Some(1));
        assert_eq!(ts.index_at(-3.0), Some(0));
        assert_eq!(ts.index_at(10.0), Some(2));
        assert_eq!(TimeSeries::from_cases(&[]).index_at(0.0), None);
    }

    #[test]
    fn tooltip_lists_all_counts() {
        let ts = TimeSeries::from_cases(&[case("2020-03-02", 2, 2)]);
        let tip = ts.tooltip(0).unwrap();
        assert!(tip.starts_with("2020-03-02"));
        assert!(tip.contains("Total Kasus: 2"));
        assert!(tip.contains("Meninggal: -"));
        assert!(tip.contains("Dalam proses tes: 3"));
        assert!(ts.tooltip(5).is_none());
    }

    #[test]
    fn scatter_skips_incomplete_provinces() {
        let data = ScatterData::from_provinces(&[
            province("A", Some(10.0), Some(5)),
            province("B", None, Some(5)),
            province("C", Some(20.0), None),
        ]);
        assert_eq!(data.points.len(), 1);
        assert_eq!(data.points[0].province_name, "A");
        assert!(data.points[0].tooltip().contains("Ibukota: Kota"));
    }

    #[test]
    fn nearest_uses_normalized_distance() {
        let data = ScatterData::from_provinces(&[
            province("A", Some(0.0), Some(0)),
            province("B", Some(1000.0), Some(1)),
        ]);
        // Raw distance favours A, but in span units B is closer.
        assert_eq!(data.nearest(100.0, 1.0, 1000.0, 1.0, 1.0), Some(1));
        assert_eq!(data.nearest(500.0, 0.5, 1000.0, 1.0, 0.1), None);
        assert_eq!(data.bounds(), Some((0.0, 1000.0, 0.0, 1.0)));
    }
}
