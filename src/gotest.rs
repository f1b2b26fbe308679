use crate::error::{VizError, VizResult};
use crate::model::{Benchmark, BenchmarkRecord, Stat};
use crate::pattern::NamePattern;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const NAME_PREFIX: &str = "Benchmark";

const NS_PER_US: f64 = 1e3;
const NS_PER_MS: f64 = 1e6;
const NS_PER_S: f64 = 1e9;
const KIB: f64 = 1024.0;

/// Unit for `ns/op` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ns" => Some(TimeUnit::Ns),
            "us" | "μs" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    fn from_ns(&self, ns: f64) -> f64 {
        match self {
            TimeUnit::Ns => ns,
            TimeUnit::Us => ns / NS_PER_US,
            TimeUnit::Ms => ns / NS_PER_MS,
            TimeUnit::S => ns / NS_PER_S,
        }
    }
}

/// Unit for `B/op` values. Bytes are written as `b`, the dataset's byte unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemUnit {
    #[default]
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl MemUnit {
    /// Case-insensitive: `B`, `KB`, `MB`, `GB`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "bytes" => Some(MemUnit::Bytes),
            "kb" => Some(MemUnit::Kilobytes),
            "mb" => Some(MemUnit::Megabytes),
            "gb" => Some(MemUnit::Gigabytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemUnit::Bytes => "b",
            MemUnit::Kilobytes => "KB",
            MemUnit::Megabytes => "MB",
            MemUnit::Gigabytes => "GB",
        }
    }

    fn from_bytes(&self, bytes: f64) -> f64 {
        match self {
            MemUnit::Bytes => bytes,
            MemUnit::Kilobytes => bytes / KIB,
            MemUnit::Megabytes => bytes / (KIB * KIB),
            MemUnit::Gigabytes => bytes / (KIB * KIB * KIB),
        }
    }
}

/// Scale for plain counts (allocations, iterations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountUnit {
    #[default]
    One,
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl CountUnit {
    /// `""` keeps counts as-is; otherwise `K`, `M`, `B` or `T`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "" => Some(CountUnit::One),
            "K" => Some(CountUnit::Thousand),
            "M" => Some(CountUnit::Million),
            "B" => Some(CountUnit::Billion),
            "T" => Some(CountUnit::Trillion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountUnit::One => "",
            CountUnit::Thousand => "K",
            CountUnit::Million => "M",
            CountUnit::Billion => "B",
            CountUnit::Trillion => "T",
        }
    }

    fn scale(&self, count: f64) -> f64 {
        match self {
            CountUnit::One => count,
            CountUnit::Thousand => count / 1e3,
            CountUnit::Million => count / 1e6,
            CountUnit::Billion => count / 1e9,
            CountUnit::Trillion => count / 1e12,
        }
    }
}

/// How `go test -bench` output becomes benchmark records
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub pattern: NamePattern,
    /// Keep only benchmarks whose name (without the `Benchmark` prefix and
    /// the `-N` suffix) matches.
    pub filter: Option<Regex>,
    pub time_unit: TimeUnit,
    pub mem_unit: MemUnit,
    pub alloc_unit: CountUnit,
}

/// One `BenchmarkXxx  <iters>  <value> <unit> ...` line
#[derive(Debug, Clone, PartialEq)]
struct ResultLine<'a> {
    name: &'a str,
    procs: Option<u32>,
    iterations: u64,
    values: Vec<(f64, &'a str)>,
}

/// Split a trailing `-N` GOMAXPROCS suffix off a benchmark name.
fn split_procs(name: &str) -> (&str, Option<u32>) {
    match name.rsplit_once('-') {
        Some((base, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => {
            (base, n.parse().ok())
        }
        _ => (name, None),
    }
}

fn parse_result_line(line: &str) -> Option<ResultLine<'_>> {
    let mut fields = line.split_whitespace();
    let full = fields.next()?.strip_prefix(NAME_PREFIX)?;
    // `Benchmarking...` and friends are not benchmarks
    if full.chars().next().is_some_and(char::is_lowercase) {
        return None;
    }
    let iterations = fields.next()?.parse().ok()?;

    let rest: Vec<&str> = fields.collect();
    let mut values = Vec::with_capacity(rest.len() / 2);
    for pair in rest.chunks_exact(2) {
        values.push((pair[0].parse().ok()?, pair[1]));
    }
    if values.is_empty() {
        return None;
    }

    let (name, procs) = split_procs(full);
    Some(ResultLine {
        name,
        procs,
        iterations,
        values,
    })
}

/// `key: value` header lines such as `cpu:` or `pkg:`.
fn parse_config_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let starts_lower = key.chars().next().is_some_and(char::is_lowercase);
    if !starts_lower || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

fn stat_for(value: f64, unit: &str, options: &IngestOptions) -> Stat {
    match unit {
        "ns/op" => Stat::new(
            "Execution Time",
            options.time_unit.from_ns(value),
            options.time_unit.as_str(),
            "op",
        ),
        "B/op" => Stat::new(
            "Memory Usage",
            options.mem_unit.from_bytes(value),
            options.mem_unit.as_str(),
            "op",
        ),
        "allocs/op" => Stat::new(
            "Allocations",
            options.alloc_unit.scale(value),
            options.alloc_unit.as_str(),
            "op",
        ),
        u if u.ends_with("/s") => Stat::new("Throughput", value, u, ""),
        u => Stat::new("Metric", value, u, ""),
    }
}

/// Parse plain `go test -bench` text into one benchmark
///
/// Non-benchmark lines are ignored. The benchmark is named after the last
/// `pkg:` header; the CPU comes from the `cpu:` header and the first `-N`
/// name suffix. When runs used different iteration counts, every record
/// also gets an `Iterations` stat.
pub fn parse_bench_text(text: &str, options: &IngestOptions) -> Benchmark {
    let mut benchmark = Benchmark::default();
    let mut iterations = Vec::new();
    let mut filtered = 0usize;

    for line in text.lines() {
        if let Some(result) = parse_result_line(line) {
            if !options.filter.as_ref().map_or(true, |re| re.is_match(result.name)) {
                filtered += 1;
                continue;
            }
            if benchmark.cpu.cores == 0 {
                benchmark.cpu.cores = result.procs.unwrap_or(0);
            }

            let parts = options.pattern.split(result.name);
            let stats = result
                .values
                .iter()
                .map(|&(value, unit)| stat_for(value, unit, options))
                .collect();
            benchmark.data.push(BenchmarkRecord {
                name: parts.name,
                x_axis: parts.x_axis,
                y_axis: parts.y_axis,
                stats,
            });
            iterations.push(result.iterations);
        } else if let Some((key, value)) = parse_config_line(line) {
            match key {
                "cpu" => benchmark.cpu.name = value.to_string(),
                "pkg" => benchmark.name = value.to_string(),
                _ => {}
            }
        }
    }

    if iterations.windows(2).any(|w| w[0] != w[1]) {
        let unit = options.alloc_unit;
        for (record, &iters) in benchmark.data.iter_mut().zip(&iterations) {
            record
                .stats
                .push(Stat::new("Iterations", unit.scale(iters as f64), unit.as_str(), ""));
        }
    }

    debug!(records = benchmark.data.len(), filtered, "parsed benchmark output");
    benchmark.normalize();
    benchmark
}

#[derive(Deserialize)]
struct TestEvent {
    #[serde(rename = "Action", default)]
    action: String,
    #[serde(rename = "Output", default)]
    output: String,
}

/// Concatenate the `output` events of a `go test -json` stream.
pub fn test_event_output(json: &str) -> VizResult<String> {
    let mut text = String::new();
    for event in serde_json::Deserializer::from_str(json).into_iter::<TestEvent>() {
        let event = event.map_err(VizError::TestEvents)?;
        if event.action == "output" {
            text.push_str(&event.output);
        }
    }
    Ok(text)
}

/// Parse `go test -bench` output, plain or as a `-json` event stream.
pub fn parse_bench_output(input: &str, options: &IngestOptions) -> VizResult<Benchmark> {
    let benchmark = if input.trim_start().starts_with('{') {
        parse_bench_text(&test_event_output(input)?, options)
    } else {
        parse_bench_text(input, options)
    };

    if benchmark.data.is_empty() {
        warn!("no benchmark results found in input");
    }
    Ok(benchmark)
}

pub fn load_bench_output(path: &Path, options: &IngestOptions) -> VizResult<Benchmark> {
    let input = std::fs::read_to_string(path).map_err(|source| VizError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bench_output(&input, options)
}
