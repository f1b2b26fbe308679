use crate::stats::normalize_value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Group label used for records that carry no `name`.
pub const DEFAULT_GROUP_NAME: &str = "Default";

/// One measured statistic of a benchmark record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub kind: String,
    /// Non-numeric and non-finite inputs are coerced to 0.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub unit: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub per: String,
}

impl Stat {
    pub fn new(kind: &str, value: f64, unit: &str, per: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value,
            unit: unit.to_string(),
            per: per.to_string(),
        }
    }
}

/// A single measured data point: one subject (x) under one workload (y)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub x_axis: String,
    /// Empty when the benchmark has no secondary category.
    #[serde(default, deserialize_with = "nullable_string")]
    pub y_axis: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub stats: Vec<Stat>,
}

impl BenchmarkRecord {
    pub fn new(name: &str, x_axis: &str, y_axis: &str, stats: Vec<Stat>) -> Self {
        Self {
            name: name.to_string(),
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            stats,
        }
    }

    /// Grouping key, falling back to [`DEFAULT_GROUP_NAME`].
    pub fn group_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_GROUP_NAME
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cpu {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default)]
    pub cores: u32,
}

/// Top-level dataset as produced by the report generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub cpu: Cpu,
    #[serde(default)]
    pub settings: BenchmarkSettings,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub data: Vec<BenchmarkRecord>,
}

impl Benchmark {
    /// Round every stat value to two decimals. Applied once at ingestion.
    pub fn normalize(&mut self) {
        for record in &mut self.data {
            for stat in &mut record.stats {
                stat.value = normalize_value(stat.value);
            }
        }
    }
}

/// Display defaults shipped with a benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSettings {
    #[serde(default)]
    pub sort: SortDirective,
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default = "ChartType::default_list", deserialize_with = "known_charts")]
    pub charts: Vec<ChartType>,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            sort: SortDirective::default(),
            show_labels: false,
            charts: ChartType::default_list(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortDirective {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortDirective {
    pub const DISABLED: SortDirective = SortDirective {
        enabled: false,
        order: SortOrder::Desc,
    };

    pub fn enabled(order: SortOrder) -> Self {
        Self {
            enabled: true,
            order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive parse; `None` for anything but `asc`/`desc`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

impl ChartType {
    pub fn all() -> &'static [ChartType] {
        &[ChartType::Bar, ChartType::Line, ChartType::Pie]
    }

    pub fn default_list() -> Vec<ChartType> {
        Self::all().to_vec()
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            "pie" => Some(ChartType::Pie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

fn known_charts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ChartType>, D::Error> {
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.iter().filter_map(|s| ChartType::parse(s)).collect())
}
