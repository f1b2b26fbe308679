use crate::chart_data::{build_group_charts, ChartData};
use crate::color::ColorAssigner;
use crate::dataset::{group_records, BenchmarkGroup};
use crate::model::{Benchmark, ChartType, SortDirective};
use crate::options::schema::ChartOptions;
use crate::options::{build_options, RenderSettings};
use crate::settings::{Settings, UrlParams};
use std::collections::HashMap;
use tracing::debug;

/// Everything a chart's options depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OptionsKey {
    benchmark: usize,
    group: usize,
    chart: usize,
    chart_type: ChartType,
    render: RenderSettings,
}

/// One user's view over a benchmark collection
///
/// Owns the selection, the display settings, the color table and a cache of
/// built options. Colors and cache are dropped together whenever the
/// displayed dataset changes, so a cached entry always equals a fresh build.
#[derive(Debug, Clone)]
pub struct Session {
    benchmarks: Vec<Benchmark>,
    active_benchmark: usize,
    active_group: usize,
    groups: Vec<BenchmarkGroup>,
    settings: Settings,
    colors: ColorAssigner,
    cache: HashMap<OptionsKey, ChartOptions>,
}

impl Session {
    pub fn new(benchmarks: Vec<Benchmark>) -> Self {
        let mut settings = Settings::new();
        let groups = match benchmarks.first() {
            Some(first) => {
                settings.initialize_from_benchmark(&first.settings, false);
                group_records(first)
            }
            None => Vec::new(),
        };

        Self {
            benchmarks,
            active_benchmark: 0,
            active_group: 0,
            groups,
            settings,
            colors: ColorAssigner::new(),
            cache: HashMap::new(),
        }
    }

    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    pub fn active_benchmark_index(&self) -> usize {
        self.active_benchmark
    }

    pub fn active_group_index(&self) -> usize {
        self.active_group
    }

    pub fn active_benchmark(&self) -> Option<&Benchmark> {
        self.benchmarks.get(self.active_benchmark)
    }

    pub fn groups(&self) -> &[BenchmarkGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&BenchmarkGroup> {
        self.groups.get(self.active_group)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings are part of the cache key, so they can change freely.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn colors_mut(&mut self) -> &mut ColorAssigner {
        &mut self.colors
    }

    fn reset_view(&mut self) {
        self.colors.reset();
        self.cache.clear();
    }

    /// Switch benchmark, keeping the same-named group selected when the new
    /// benchmark has one. Out-of-range ids are ignored.
    pub fn select_benchmark(&mut self, id: usize) -> bool {
        let Some(benchmark) = self.benchmarks.get(id) else {
            debug!(id, available = self.benchmarks.len(), "ignoring benchmark selection");
            return false;
        };

        let previous = self.active_group().map(|g| g.name.clone());
        let groups = group_records(benchmark);
        let group = previous
            .and_then(|name| groups.iter().position(|g| g.name == name))
            .unwrap_or(0);
        self.settings.initialize_from_benchmark(&benchmark.settings, true);

        self.reset_view();
        self.active_benchmark = id;
        self.groups = groups;
        self.active_group = group;
        true
    }

    pub fn select_group(&mut self, id: usize) -> bool {
        if id >= self.groups.len() {
            debug!(id, available = self.groups.len(), "ignoring group selection");
            return false;
        }

        self.reset_view();
        self.active_group = id;
        true
    }

    /// One chart per statistic signature of the active group.
    pub fn chart_data(&self) -> Vec<ChartData> {
        self.active_group()
            .map(build_group_charts)
            .unwrap_or_default()
    }

    /// Options for chart `index` of the active group under the current
    /// settings, built once and then served from the cache.
    pub fn chart_options(&mut self, index: usize) -> Option<&ChartOptions> {
        let key = OptionsKey {
            benchmark: self.active_benchmark,
            group: self.active_group,
            chart: index,
            chart_type: self.settings.chart_type(),
            render: self.settings.render_settings(),
        };

        if self.cache.contains_key(&key) {
            debug!(chart = index, "chart options cache hit");
        } else {
            let data = self.chart_data().into_iter().nth(index)?;
            debug!(chart = index, title = %data.title, "building chart options");
            let options = build_options(key.chart_type, &data, &key.render, &mut self.colors);
            self.cache.insert(key, options);
        }

        self.cache.get(&key)
    }

    /// Options for every chart of the active group, in chart order.
    pub fn all_chart_options(&mut self) -> Vec<ChartOptions> {
        let count = self.chart_data().len();
        (0..count)
            .filter_map(|i| self.chart_options(i).cloned())
            .collect()
    }

    /// Apply query parameters: benchmark, then group, then display settings
    /// on top of the benchmark's defaults.
    pub fn apply_params(&mut self, params: &UrlParams) {
        if let Some(b) = params.benchmark {
            self.select_benchmark(b);
        }
        if let Some(g) = params.group {
            self.select_group(g);
        }
        if let Some(order) = params.sort {
            self.settings.set_sort(SortDirective::enabled(order));
        }
        if let Some(show) = params.show_labels {
            self.settings.set_show_labels(show);
        }
        if let Some(chart) = params.chart {
            self.settings.set_chart_type(chart);
        }
    }

    /// Current state as query parameters, omitting defaults.
    pub fn url_params(&self) -> UrlParams {
        let settings = &self.settings;
        UrlParams {
            sort: settings.sort.enabled.then_some(settings.sort.order),
            show_labels: settings.show_labels.then_some(true),
            chart: (settings.active_chart_index != 0).then(|| settings.chart_type()),
            benchmark: (self.active_benchmark > 0).then_some(self.active_benchmark),
            group: (self.active_group > 0).then_some(self.active_group),
        }
    }

    pub fn to_query_string(&self) -> String {
        self.url_params().to_query_string()
    }
}
