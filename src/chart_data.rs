use crate::dataset::BenchmarkGroup;
use crate::model::BenchmarkRecord;
use crate::stats::Signature;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Shape of a chart's category domain, decided once when the data is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    /// Only the x-axis carries categories; every series holds one value.
    SingleCategory,
    /// Both axes carry categories; series values are aligned to the y-axis domain.
    DualCategory,
}

/// One x-axis category and its values across the y-axis domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub x_axis: String,
    pub values: Vec<f64>,
    pub benchmark_id: String,
}

/// Pivoted view of one statistic signature over a group's records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub title: String,
    pub stat_type: String,
    pub stat_unit: String,
    pub y_axis: Vec<String>,
    pub series: Vec<SeriesData>,
    pub layout: Layout,
}

impl ChartData {
    /// Length every series' `values` has.
    pub fn value_len(&self) -> usize {
        self.y_axis.len().max(1)
    }

    pub fn is_dual(&self) -> bool {
        self.layout == Layout::DualCategory
    }

    /// True when at least one series has a non-blank x label.
    pub fn has_x_axis(&self) -> bool {
        self.series.iter().any(|s| !s.x_axis.trim().is_empty())
    }

    pub fn x_labels(&self) -> Vec<String> {
        self.series.iter().map(|s| s.x_axis.clone()).collect()
    }
}

/// Ordered set preserving first appearance.
#[derive(Default)]
struct Domain {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Domain {
    fn insert(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), self.labels.len() - 1);
        self.labels.len() - 1
    }
}

fn collect_signatures(records: &[BenchmarkRecord]) -> Vec<Signature> {
    let mut seen = HashSet::new();
    let mut signatures = Vec::new();

    for stat in records.iter().flat_map(|r| r.stats.iter()) {
        let sig = Signature::of(stat);
        if seen.insert(sig.clone()) {
            signatures.push(sig);
        }
    }

    signatures
}

fn build_for_signature(records: &[BenchmarkRecord], signature: &Signature) -> ChartData {
    let mut x_domain = Domain::default();
    let mut y_domain = Domain::default();
    let mut cells: HashMap<(usize, usize), f64> = HashMap::new();

    for record in records {
        let Some(stat) = record.stats.iter().find(|s| signature.matches(s)) else {
            continue;
        };

        let y = y_domain.insert(&record.y_axis);
        let x = x_domain.insert(&record.x_axis);
        let value = if stat.value.is_finite() { stat.value } else { 0.0 };
        cells.insert((y, x), value);
    }

    let width = y_domain.labels.len().max(1);
    let benchmark_id = records
        .first()
        .map(|r| r.group_name().to_string())
        .unwrap_or_default();

    let series = x_domain
        .labels
        .iter()
        .enumerate()
        .map(|(x, label)| SeriesData {
            x_axis: label.clone(),
            values: (0..width)
                .map(|y| cells.get(&(y, x)).copied().unwrap_or(0.0))
                .collect(),
            benchmark_id: benchmark_id.clone(),
        })
        .collect();

    let layout = if y_domain.labels.iter().any(|y| !y.is_empty()) {
        Layout::DualCategory
    } else {
        Layout::SingleCategory
    };

    ChartData {
        title: signature.title(),
        stat_type: signature.kind.clone(),
        stat_unit: signature.unit.clone(),
        y_axis: y_domain.labels,
        series,
        layout,
    }
}

/// Build one [`ChartData`] per distinct statistic signature, in first-seen order
///
/// Records lacking a signature are skipped for that chart only; unobserved
/// (y, x) combinations are filled with 0.
pub fn build_chart_data(records: &[BenchmarkRecord]) -> Vec<ChartData> {
    collect_signatures(records)
        .iter()
        .map(|sig| build_for_signature(records, sig))
        .collect()
}

pub fn build_group_charts(group: &BenchmarkGroup) -> Vec<ChartData> {
    build_chart_data(&group.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stat;
    use proptest::prelude::*;

    fn time(value: f64) -> Stat {
        Stat::new("time", value, "ns", "")
    }

    #[test]
    fn test_single_category() {
        let records = vec![
            BenchmarkRecord::new("g", "A", "", vec![time(10.0)]),
            BenchmarkRecord::new("g", "B", "", vec![time(5.0)]),
        ];

        let charts = build_chart_data(&records);
        assert_eq!(charts.len(), 1);

        let chart = &charts[0];
        assert_eq!(chart.layout, Layout::SingleCategory);
        assert_eq!(chart.title, "time (ns)");
        assert_eq!(chart.y_axis, vec![""]);
        assert_eq!(chart.series[0].x_axis, "A");
        assert_eq!(chart.series[0].values, vec![10.0]);
        assert_eq!(chart.series[1].x_axis, "B");
        assert_eq!(chart.series[1].values, vec![5.0]);
        assert_eq!(chart.series[0].benchmark_id, "g");
    }

    #[test]
    fn test_dual_category_alignment() {
        let records = vec![
            BenchmarkRecord::new("g", "X", "W1", vec![time(3.0)]),
            BenchmarkRecord::new("g", "X", "W2", vec![time(7.0)]),
        ];

        let chart = &build_chart_data(&records)[0];
        assert_eq!(chart.layout, Layout::DualCategory);
        assert_eq!(chart.y_axis, vec!["W1", "W2"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].values, vec![3.0, 7.0]);
    }

    #[test]
    fn test_missing_combinations_fill_zero() {
        let records = vec![
            BenchmarkRecord::new("g", "A", "W1", vec![time(1.0)]),
            BenchmarkRecord::new("g", "B", "W2", vec![time(2.0)]),
        ];

        let chart = &build_chart_data(&records)[0];
        assert_eq!(chart.series[0].values, vec![1.0, 0.0]);
        assert_eq!(chart.series[1].values, vec![0.0, 2.0]);
    }

    #[test]
    fn test_distinct_signatures_split_charts() {
        let records = vec![
            BenchmarkRecord::new(
                "g",
                "A",
                "",
                vec![time(1.0), Stat::new("mem", 64.0, "b", "op")],
            ),
            BenchmarkRecord::new("g", "B", "", vec![time(2.0)]),
        ];

        let charts = build_chart_data(&records);
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].series.len(), 2);

        assert_eq!(charts[1].title, "mem (b/op)");
        assert_eq!(charts[1].series.len(), 1);
        assert_eq!(charts[1].series[0].x_axis, "A");
    }

    #[test]
    fn test_domains_follow_input_order() {
        let records = vec![
            BenchmarkRecord::new("g", "zeta", "w9", vec![time(1.0)]),
            BenchmarkRecord::new("g", "alpha", "w1", vec![time(1.0)]),
            BenchmarkRecord::new("g", "10", "w5", vec![time(1.0)]),
        ];

        let chart = &build_chart_data(&records)[0];
        assert_eq!(chart.x_labels(), vec!["zeta", "alpha", "10"]);
        assert_eq!(chart.y_axis, vec!["w9", "w1", "w5"]);
    }

    #[test]
    fn test_later_record_overwrites_same_cell() {
        let records = vec![
            BenchmarkRecord::new("g", "A", "", vec![time(1.0)]),
            BenchmarkRecord::new("g", "A", "", vec![time(4.0)]),
        ];

        let chart = &build_chart_data(&records)[0];
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].values, vec![4.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_chart_data(&[]).is_empty());

        let no_stats = vec![BenchmarkRecord::new("g", "A", "", vec![])];
        assert!(build_chart_data(&no_stats).is_empty());
    }

    #[test]
    fn test_has_x_axis() {
        let records = vec![BenchmarkRecord::new("g", " ", "W1", vec![time(1.0)])];
        let chart = &build_chart_data(&records)[0];
        assert!(!chart.has_x_axis());
        assert!(chart.is_dual());
    }

    fn arb_records() -> impl Strategy<Value = Vec<BenchmarkRecord>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["a", "b", "c", "d"]),
                prop::sample::select(vec!["", "w1", "w2", "w3"]),
                any::<bool>(),
                0u32..10_000,
            ),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(x, y, has_time, v)| {
                    let mut stats = vec![Stat::new("mem", 1.0, "b", "")];
                    if has_time {
                        stats.push(time(v as f64));
                    }
                    BenchmarkRecord::new("g", x, y, stats)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_series_length_matches_y_domain(records in arb_records()) {
            for chart in build_chart_data(&records) {
                for series in &chart.series {
                    prop_assert_eq!(series.values.len(), chart.value_len());
                }
            }
        }

        #[test]
        fn prop_totals_match_raw_values(records in arb_records()) {
            let sig = Signature::of(&time(0.0));

            // Last write wins per (y, x) cell.
            let mut cells: HashMap<(String, String), f64> = HashMap::new();
            for r in &records {
                if let Some(stat) = r.stats.iter().find(|s| sig.matches(s)) {
                    cells.insert((r.y_axis.clone(), r.x_axis.clone()), stat.value);
                }
            }
            let expected: f64 = cells.values().sum();

            let charts = build_chart_data(&records);
            let actual: f64 = charts
                .iter()
                .filter(|c| c.stat_type == "time")
                .flat_map(|c| c.series.iter())
                .map(|s| s.values.iter().sum::<f64>())
                .sum();

            prop_assert!((expected - actual).abs() < 1e-6);
        }
    }
}
