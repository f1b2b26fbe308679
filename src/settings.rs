//! View settings, URL query state and persisted preferences.

use crate::error::{VizError, VizResult};
use crate::model::{BenchmarkSettings, ChartType, SortDirective, SortOrder};
use crate::options::RenderSettings;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Preferences key holding the dark-mode flag as `"true"`/`"false"`.
pub const DARK_MODE_KEY: &str = "dark-mode";

/// User-chosen display state for the active benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sort: SortDirective,
    pub show_labels: bool,
    pub charts: Vec<ChartType>,
    pub active_chart_index: usize,
    pub is_dark: bool,
    initialized: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort: SortDirective::DISABLED,
            show_labels: false,
            charts: ChartType::default_list(),
            active_chart_index: 0,
            is_dark: false,
            initialized: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sort(&mut self, sort: SortDirective) {
        self.sort = sort;
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.show_labels = show;
    }

    /// Replace the chart list. Falls back to every chart type when `list` is
    /// empty and resets the active index if it no longer points into the list.
    pub fn set_charts(&mut self, list: &[ChartType]) {
        let mut charts: Vec<ChartType> = Vec::with_capacity(list.len());
        for chart in list {
            if ChartType::all().contains(chart) {
                charts.push(*chart);
            }
        }
        self.charts = if charts.is_empty() {
            ChartType::default_list()
        } else {
            charts
        };

        if self.active_chart_index >= self.charts.len() {
            self.active_chart_index = 0;
        }
    }

    /// Returns false, leaving the selection alone, when `index` is out of range.
    pub fn set_active_chart_index(&mut self, index: usize) -> bool {
        if index < self.charts.len() {
            self.active_chart_index = index;
            true
        } else {
            false
        }
    }

    /// Select the first chart of type `chart_type`; no-op when the list lacks it.
    pub fn set_chart_type(&mut self, chart_type: ChartType) -> bool {
        match self.charts.iter().position(|c| *c == chart_type) {
            Some(index) => {
                self.active_chart_index = index;
                true
            }
            None => false,
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.charts
            .get(self.active_chart_index)
            .copied()
            .unwrap_or(ChartType::Bar)
    }

    pub fn set_dark(&mut self, is_dark: bool) {
        self.is_dark = is_dark;
    }

    /// Flip the theme and record it in `prefs`. The caller saves.
    pub fn toggle_dark(&mut self, prefs: &mut Preferences) -> bool {
        self.is_dark = !self.is_dark;
        prefs.set_dark_mode(self.is_dark);
        self.is_dark
    }

    /// Adopt a benchmark's shipped defaults
    ///
    /// Only the first call takes effect unless `force` is set, so that state
    /// restored from a URL survives the initial load.
    pub fn initialize_from_benchmark(&mut self, defaults: &BenchmarkSettings, force: bool) {
        if self.initialized && !force {
            return;
        }

        self.sort = defaults.sort;
        self.show_labels = defaults.show_labels;
        self.set_charts(&defaults.charts);
        self.set_active_chart_index(0);
        self.initialized = true;
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            sort: self.sort,
            show_labels: self.show_labels,
            is_dark: self.is_dark,
        }
    }
}

/// Display state carried in a query string: `s`, `l`, `c`, `b`, `g`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlParams {
    /// Sort order; its presence implies sorting is enabled.
    pub sort: Option<SortOrder>,
    pub show_labels: Option<bool>,
    pub chart: Option<ChartType>,
    pub benchmark: Option<usize>,
    pub group: Option<usize>,
}

/// Decode one form-encoded query component: `+` is a space and `%XX` is a
/// byte. Malformed escapes stay literal.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let byte = raw
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match byte {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

impl UrlParams {
    /// Parse a query string, with or without the leading `?`
    ///
    /// Keys and values are form-decoded first. Unknown keys and unparseable
    /// values are ignored. A repeated key keeps its first value.
    pub fn parse(query: &str) -> Self {
        let mut params = UrlParams::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (key, value) = (decode_component(key), decode_component(value));
            let value = value.as_str();
            match key.as_str() {
                "s" if params.sort.is_none() => params.sort = SortOrder::parse(value),
                "l" if params.show_labels.is_none() => {
                    params.show_labels = match value.to_ascii_lowercase().as_str() {
                        "true" => Some(true),
                        "false" => Some(false),
                        _ => None,
                    }
                }
                "c" if params.chart.is_none() => params.chart = ChartType::parse(value),
                "b" if params.benchmark.is_none() => params.benchmark = value.parse().ok(),
                "g" if params.group.is_none() => params.group = value.parse().ok(),
                _ => {}
            }
        }

        params
    }

    /// `?k=v&...` for the fields that are set, or `""` when none are.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(order) = self.sort {
            pairs.push(format!("s={}", order.as_str()));
        }
        if let Some(show) = self.show_labels {
            pairs.push(format!("l={}", show));
        }
        if let Some(chart) = self.chart {
            pairs.push(format!("c={}", chart.as_str()));
        }
        if let Some(b) = self.benchmark {
            pairs.push(format!("b={}", b));
        }
        if let Some(g) = self.group {
            pairs.push(format!("g={}", g));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == UrlParams::default()
    }
}

/// Small string key/value store persisted as a JSON object
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Load preferences from `path`; a missing file yields an empty store.
    pub fn load(path: &Path) -> VizResult<Self> {
        let values = match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|err| VizError::Preferences(format!("{}: {}", path.display(), err)))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(VizError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        debug!(path = %path.display(), entries = values.len(), "loaded preferences");
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn save(&self) -> VizResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| VizError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values).map_err(|source| VizError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| VizError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Stored theme, `None` when the user never chose one.
    pub fn dark_mode(&self) -> Option<bool> {
        self.get(DARK_MODE_KEY).map(|v| v == "true")
    }

    pub fn set_dark_mode(&mut self, is_dark: bool) {
        self.set(DARK_MODE_KEY, if is_dark { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_set_charts_filters_and_clamps() {
        let mut settings = Settings::new();
        settings.set_active_chart_index(2);

        settings.set_charts(&[ChartType::Pie]);
        assert_eq!(settings.charts, vec![ChartType::Pie]);
        assert_eq!(settings.active_chart_index, 0);

        settings.set_charts(&[]);
        assert_eq!(settings.charts, ChartType::default_list());
    }

    #[test]
    fn test_chart_selection() {
        let mut settings = Settings::new();
        settings.set_charts(&[ChartType::Line, ChartType::Bar]);

        assert!(!settings.set_active_chart_index(2));
        assert_eq!(settings.chart_type(), ChartType::Line);

        assert!(settings.set_chart_type(ChartType::Bar));
        assert_eq!(settings.active_chart_index, 1);
        assert!(!settings.set_chart_type(ChartType::Pie));
        assert_eq!(settings.chart_type(), ChartType::Bar);
    }

    #[test]
    fn test_initialize_from_benchmark_once_unless_forced() {
        let mut settings = Settings::new();
        let first = BenchmarkSettings {
            sort: SortDirective::enabled(SortOrder::Asc),
            show_labels: true,
            charts: vec![ChartType::Pie, ChartType::Bar],
        };
        settings.initialize_from_benchmark(&first, false);
        settings.set_chart_type(ChartType::Bar);

        settings.initialize_from_benchmark(&BenchmarkSettings::default(), false);
        assert_eq!(settings.sort, SortDirective::enabled(SortOrder::Asc));
        assert_eq!(settings.chart_type(), ChartType::Bar);

        settings.initialize_from_benchmark(&BenchmarkSettings::default(), true);
        assert_eq!(settings.sort, SortDirective::DISABLED);
        assert!(!settings.show_labels);
        assert_eq!(settings.active_chart_index, 0);
        assert_eq!(settings.charts, ChartType::default_list());
    }

    #[test]
    fn test_parse_url_params() {
        let params = UrlParams::parse("?s=ASC&l=true&c=pie&b=2&g=1&x=9");
        assert_eq!(params.sort, Some(SortOrder::Asc));
        assert_eq!(params.show_labels, Some(true));
        assert_eq!(params.chart, Some(ChartType::Pie));
        assert_eq!(params.benchmark, Some(2));
        assert_eq!(params.group, Some(1));
    }

    #[test]
    fn test_invalid_url_params_are_ignored() {
        let params = UrlParams::parse("s=sideways&l=maybe&c=radar&b=-1&g=abc");
        assert!(params.is_empty());
        assert!(UrlParams::parse("").is_empty());
        assert!(UrlParams::parse("?").is_empty());
        assert_eq!(UrlParams::parse("l=false&l=true").show_labels, Some(false));
    }

    #[test]
    fn test_url_params_are_form_decoded() {
        let params = UrlParams::parse("?c=%70ie&%73=asc&l=%74rue&g=%31");
        assert_eq!(params.chart, Some(ChartType::Pie));
        assert_eq!(params.sort, Some(SortOrder::Asc));
        assert_eq!(params.show_labels, Some(true));
        assert_eq!(params.group, Some(1));

        assert_eq!(decode_component("a+b%20c"), "a b c");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz%4"), "%zz%4");
        assert_eq!(decode_component("caf%C3%A9"), "café");
        assert_eq!(UrlParams::parse("c=+line+").chart, Some(ChartType::Line));
    }

    #[test]
    fn test_query_string_round_trip() {
        assert_eq!(UrlParams::default().to_query_string(), "");

        let params = UrlParams {
            sort: Some(SortOrder::Desc),
            show_labels: Some(true),
            chart: Some(ChartType::Line),
            benchmark: None,
            group: Some(3),
        };
        let query = params.to_query_string();
        assert_eq!(query, "?s=desc&l=true&c=line&g=3");
        assert_eq!(UrlParams::parse(&query), params);
    }

    #[test]
    fn test_preferences_persist_dark_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.dark_mode(), None);
        assert_eq!(prefs.path(), path.as_path());

        let mut settings = Settings::new();
        assert!(settings.toggle_dark(&mut prefs));
        prefs.save().unwrap();

        let reloaded = Preferences::load(&path).unwrap();
        assert_eq!(reloaded.get(DARK_MODE_KEY), Some("true"));
        assert_eq!(reloaded.dark_mode(), Some(true));
    }

    #[test]
    fn test_corrupt_preferences() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(matches!(
            Preferences::load(file.path()),
            Err(VizError::Preferences(_))
        ));
    }
}
