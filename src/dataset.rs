use crate::error::{VizError, VizResult};
use crate::model::{Benchmark, BenchmarkRecord, BenchmarkSettings, Cpu};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A dataset file holds either a list of benchmarks or a single one.
#[derive(Deserialize)]
#[serde(untagged)]
enum BenchmarkDocument {
    Many(Vec<Benchmark>),
    One(Box<Benchmark>),
}

impl BenchmarkDocument {
    fn into_vec(self) -> Vec<Benchmark> {
        match self {
            BenchmarkDocument::Many(list) => list,
            BenchmarkDocument::One(bench) => vec![*bench],
        }
    }
}

fn decode(json: &str) -> serde_json::Result<Vec<Benchmark>> {
    let mut benchmarks = serde_json::from_str::<BenchmarkDocument>(json)?.into_vec();
    for bench in &mut benchmarks {
        bench.normalize();
    }
    Ok(benchmarks)
}

/// Parse a dataset, normalizing stat values
///
/// Unparseable input is treated as an empty dataset and logged.
pub fn parse_benchmarks(json: &str) -> Vec<Benchmark> {
    match decode(json) {
        Ok(benchmarks) => benchmarks,
        Err(err) => {
            warn!(error = %err, "malformed benchmark dataset, rendering nothing");
            Vec::new()
        }
    }
}

/// Read and parse a dataset file. Only I/O failures are errors.
pub fn load_benchmarks(path: &Path) -> VizResult<Vec<Benchmark>> {
    let json = std::fs::read_to_string(path).map_err(|source| VizError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let benchmarks = parse_benchmarks(&json);
    debug!(path = %path.display(), count = benchmarks.len(), "loaded benchmarks");
    Ok(benchmarks)
}

/// Expand directories into their `*.json` files, sorted by name.
fn collect_input_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let entries = match std::fs::read_dir(path) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot scan directory");
                    continue;
                }
            };
            let mut found: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

/// Merge several benchmark files into one collection
///
/// Unreadable or unparseable files are skipped with a warning.
pub fn merge_benchmark_files(paths: &[PathBuf]) -> VizResult<Vec<Benchmark>> {
    if paths.is_empty() {
        return Err(VizError::NoInputFiles);
    }

    let files = collect_input_files(paths);
    let mut merged = Vec::new();
    let mut valid = 0;

    for file in &files {
        let content = match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %file.display(), error = %err, "cannot read file, skipping");
                continue;
            }
        };

        match decode(&content) {
            Ok(benchmarks) => {
                merged.extend(benchmarks);
                valid += 1;
            }
            Err(err) => {
                warn!(path = %file.display(), error = %err, "not benchmark data, skipping");
            }
        }
    }

    if valid == 0 {
        return Err(VizError::NoValidBenchmarks {
            skipped: files.len(),
        });
    }

    Ok(merged)
}

/// Records of one benchmark sharing the same logical name
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkGroup {
    pub name: String,
    pub description: String,
    pub cpu: Cpu,
    pub settings: BenchmarkSettings,
    pub data: Vec<BenchmarkRecord>,
}

/// Group a benchmark's records by name, keeping first-seen order of both
/// group names and records.
pub fn group_records(benchmark: &Benchmark) -> Vec<BenchmarkGroup> {
    let mut groups: Vec<BenchmarkGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in &benchmark.data {
        let name = record.group_name();
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(BenchmarkGroup {
                name: name.to_string(),
                description: benchmark.description.clone(),
                cpu: benchmark.cpu.clone(),
                settings: benchmark.settings.clone(),
                data: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].data.push(record.clone());
    }

    groups
}
