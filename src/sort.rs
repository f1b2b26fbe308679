use crate::chart_data::{ChartData, SeriesData};
use crate::model::{SortDirective, SortOrder};
use std::cmp::Ordering;

/// Sum of the finite values; 0 for an empty slice.
pub fn sum_values(values: &[f64]) -> f64 {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0, |acc, v| acc + v)
}

pub fn series_total(series: &SeriesData) -> f64 {
    sum_values(&series.values)
}

pub fn compare_totals(order: SortOrder, a: f64, b: f64) -> Ordering {
    match order {
        SortOrder::Asc => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        SortOrder::Desc => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Indices of `totals` in display order
///
/// Disabled sorting keeps insertion order; ties keep their relative order.
pub fn order_by_totals(totals: &[f64], sort: SortDirective) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    if sort.enabled {
        order.sort_by(|&a, &b| compare_totals(sort.order, totals[a], totals[b]));
    }
    order
}

/// A series paired with its aggregate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSeries<'a> {
    pub series: &'a SeriesData,
    pub total: f64,
}

/// Series-total mode: reorder x-axis series by the sum of their values.
pub fn sort_series(chart: &ChartData, sort: SortDirective) -> Vec<RankedSeries<'_>> {
    let totals: Vec<f64> = chart.series.iter().map(series_total).collect();
    order_by_totals(&totals, sort)
        .into_iter()
        .map(|i| RankedSeries {
            series: &chart.series[i],
            total: totals[i],
        })
        .collect()
}

/// Column totals: the sum over all series for each y-axis category.
pub fn y_axis_totals(chart: &ChartData) -> Vec<f64> {
    (0..chart.y_axis.len())
        .map(|y| {
            chart
                .series
                .iter()
                .filter_map(|s| s.values.get(y))
                .filter(|v| v.is_finite())
                .fold(0.0, |acc, v| acc + v)
        })
        .collect()
}

/// Cross-series axis mode
///
/// y-axis categories are only reordered for dual-category data with exactly
/// one x-axis series; every other shape keeps the y domain order.
pub fn y_axis_order(chart: &ChartData, sort: SortDirective) -> Vec<usize> {
    if chart.is_dual() && chart.series.len() == 1 {
        order_by_totals(&y_axis_totals(chart), sort)
    } else {
        (0..chart.y_axis.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::build_chart_data;
    use crate::model::{BenchmarkRecord, Stat};
    use proptest::collection::vec as prop_vec;
    use proptest::prelude::*;

    fn single(values: &[(&str, f64)]) -> ChartData {
        let records: Vec<BenchmarkRecord> = values
            .iter()
            .map(|(x, v)| BenchmarkRecord::new("g", x, "", vec![Stat::new("time", *v, "ns", "")]))
            .collect();
        build_chart_data(&records).remove(0)
    }

    fn labels(ranked: &[RankedSeries<'_>]) -> Vec<String> {
        ranked.iter().map(|r| r.series.x_axis.clone()).collect()
    }

    #[test]
    fn test_sort_directions() {
        let chart = single(&[("A", 10.0), ("B", 5.0)]);

        let desc = sort_series(&chart, SortDirective::enabled(SortOrder::Desc));
        assert_eq!(labels(&desc), vec!["A", "B"]);

        let asc = sort_series(&chart, SortDirective::enabled(SortOrder::Asc));
        assert_eq!(labels(&asc), vec!["B", "A"]);
        assert_eq!(asc[0].total, 5.0);
    }

    #[test]
    fn test_disabled_keeps_insertion_order() {
        let chart = single(&[("A", 1.0), ("B", 9.0), ("C", 5.0)]);
        let ranked = sort_series(&chart, SortDirective::DISABLED);
        assert_eq!(labels(&ranked), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_ties_are_stable() {
        let chart = single(&[("A", 0.0), ("B", 0.0), ("C", 0.0)]);
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let ranked = sort_series(&chart, SortDirective::enabled(order));
            assert_eq!(labels(&ranked), vec!["A", "B", "C"]);
            assert!(ranked.iter().all(|r| r.total == 0.0));
        }
    }

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(sum_values(&[]), 0.0);
        assert_eq!(sum_values(&[f64::NAN, 2.0]), 2.0);
        assert!(order_by_totals(&[], SortDirective::enabled(SortOrder::Asc)).is_empty());
    }

    #[test]
    fn test_y_axis_reordered_only_for_single_series() {
        let records = vec![
            BenchmarkRecord::new("g", "X", "W1", vec![Stat::new("t", 1.0, "", "")]),
            BenchmarkRecord::new("g", "X", "W2", vec![Stat::new("t", 8.0, "", "")]),
            BenchmarkRecord::new("g", "X", "W3", vec![Stat::new("t", 4.0, "", "")]),
        ];
        let chart = build_chart_data(&records).remove(0);

        assert_eq!(y_axis_totals(&chart), vec![1.0, 8.0, 4.0]);
        assert_eq!(
            y_axis_order(&chart, SortDirective::enabled(SortOrder::Desc)),
            vec![1, 2, 0]
        );
        assert_eq!(y_axis_order(&chart, SortDirective::DISABLED), vec![0, 1, 2]);

        let mut two_series = records.clone();
        two_series.push(BenchmarkRecord::new("g", "Y", "W1", vec![Stat::new("t", 50.0, "", "")]));
        let chart = build_chart_data(&two_series).remove(0);
        assert_eq!(
            y_axis_order(&chart, SortDirective::enabled(SortOrder::Desc)),
            vec![0, 1, 2]
        );
    }

    fn arb_order() -> impl Strategy<Value = SortOrder> {
        prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
    }

    proptest! {
        #[test]
        fn prop_sort_is_idempotent(totals in prop_vec(0u32..50, 0..30), order in arb_order()) {
            let totals: Vec<f64> = totals.into_iter().map(f64::from).collect();
            let sort = SortDirective::enabled(order);

            let once: Vec<f64> = order_by_totals(&totals, sort).iter().map(|&i| totals[i]).collect();
            let twice: Vec<f64> = order_by_totals(&once, sort).iter().map(|&i| once[i]).collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sort_is_total_preserving_permutation(totals in prop_vec(0u32..1000, 0..30), order in arb_order()) {
            let totals: Vec<f64> = totals.into_iter().map(f64::from).collect();
            let order = order_by_totals(&totals, SortDirective::enabled(order));

            let mut seen = order.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..totals.len()).collect::<Vec<_>>());

            let mut before = totals.clone();
            let mut after: Vec<f64> = order.iter().map(|&i| totals[i]).collect();
            before.sort_by(|a, b| a.partial_cmp(b).unwrap());
            after.sort_by(|a, b| a.partial_cmp(b).unwrap());
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_sorted_totals_are_monotonic(totals in prop_vec(0u32..1000, 0..30)) {
            let totals: Vec<f64> = totals.into_iter().map(f64::from).collect();
            let asc: Vec<f64> = order_by_totals(&totals, SortDirective::enabled(SortOrder::Asc))
                .iter()
                .map(|&i| totals[i])
                .collect();
            prop_assert!(asc.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
