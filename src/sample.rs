use crate::model::{
    Benchmark, BenchmarkRecord, BenchmarkSettings, Cpu, SortDirective, SortOrder, Stat,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

const SUBJECT_NAMES: &[&str] = &[
    "gin", "echo", "chi", "fiber", "mux", "httprouter", "beego", "iris",
];
const WORKLOAD_NAMES: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];
const GROUP_NAMES: &[&str] = &["Static", "Param", "Parse", "Github"];

/// Shape of the generated sample collection
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub benchmarks: usize,
    /// Record groups per benchmark
    pub groups: usize,
    /// x-axis categories per group
    pub subjects: usize,
    /// y-axis categories per group; 0 produces single-category data
    pub workloads: usize,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            benchmarks: 2,
            groups: 2,
            subjects: 4,
            workloads: 3,
            seed: 42,
        }
    }
}

impl SampleConfig {
    pub fn records_per_benchmark(&self) -> usize {
        self.groups * self.subjects * self.workloads.max(1)
    }
}

/// Names from `pool`, suffixed once the pool runs out.
fn pick(pool: &[&str], index: usize) -> String {
    let base = pool[index % pool.len()];
    match index / pool.len() {
        0 => base.to_string(),
        round => format!("{}-{}", base, round + 1),
    }
}

/// Deterministic benchmark dataset generator
pub struct SampleGenerator {
    config: SampleConfig,
}

impl SampleGenerator {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    /// Generate one record (deterministic based on seed + benchmark + index)
    fn generate_record(config: &SampleConfig, bench: usize, index: usize) -> BenchmarkRecord {
        let workloads = config.workloads.max(1);
        let group = index / (config.subjects * workloads);
        let subject = (index / workloads) % config.subjects;
        let workload = index % workloads;

        let mut rng = StdRng::seed_from_u64(
            config
                .seed
                .wrapping_add((bench as u64) << 32)
                .wrapping_add(index as u64),
        );

        // Subjects share a base cost so charts show a stable ranking.
        let base = 50.0 * (subject as f64 + 1.0) * (workload as f64 + 1.0);
        let time = base * rng.gen_range(0.8..1.2);
        let memory = (base * 16.0 * rng.gen_range(0.5..1.5)).round();
        let allocs = rng.gen_range(0..(8 * (subject as u32 + 1))) as f64;

        let y_axis = if config.workloads == 0 {
            String::new()
        } else {
            pick(WORKLOAD_NAMES, workload)
        };

        BenchmarkRecord {
            name: pick(GROUP_NAMES, group),
            x_axis: pick(SUBJECT_NAMES, subject),
            y_axis,
            stats: vec![
                Stat::new("Execution Time", time, "ns", "op"),
                Stat::new("Memory Usage", memory, "b", "op"),
                Stat::new("Allocations", allocs, "", "op"),
            ],
        }
    }

    fn generate_benchmark(&self, bench: usize) -> Benchmark {
        let count = self.config.records_per_benchmark();
        let config = &self.config;

        let data: Vec<BenchmarkRecord> = (0..count)
            .into_par_iter()
            .map(|i| Self::generate_record(config, bench, i))
            .collect();

        let settings = if bench % 2 == 1 {
            BenchmarkSettings {
                sort: SortDirective::enabled(SortOrder::Desc),
                show_labels: true,
                ..Default::default()
            }
        } else {
            BenchmarkSettings::default()
        };

        let mut benchmark = Benchmark {
            name: format!("Sample Benchmark {}", bench + 1),
            description: format!(
                "{} subjects across {} workloads",
                config.subjects, config.workloads
            ),
            cpu: Cpu {
                name: "Sample CPU".to_string(),
                cores: 8,
            },
            settings,
            data,
        };
        benchmark.normalize();
        benchmark
    }

    /// Generate the full collection, records built in parallel.
    pub fn generate(&self) -> Vec<Benchmark> {
        if self.config.subjects == 0 || self.config.groups == 0 {
            return Vec::new();
        }

        info!(
            benchmarks = self.config.benchmarks,
            records = self.config.benchmarks * self.config.records_per_benchmark(),
            seed = self.config.seed,
            "generating sample dataset"
        );

        (0..self.config.benchmarks)
            .map(|b| self.generate_benchmark(b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::group_records;

    #[test]
    fn test_sample_generation() {
        let gen = SampleGenerator::new(SampleConfig::default());
        let benchmarks = gen.generate();

        assert_eq!(benchmarks.len(), 2);
        assert_eq!(benchmarks[0].data.len(), 24); // 2 groups * 4 subjects * 3 workloads

        let groups = group_records(&benchmarks[0]);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Static", "Param"]);
        assert!(benchmarks[1].settings.sort.enabled);

        for record in &benchmarks[0].data {
            assert_eq!(record.stats.len(), 3);
            assert!(!record.y_axis.is_empty());
        }
    }

    #[test]
    fn test_reproducibility() {
        let config = SampleConfig {
            seed: 123,
            ..Default::default()
        };

        let first = SampleGenerator::new(config.clone()).generate();
        let second = SampleGenerator::new(config).generate();
        assert_eq!(first, second);

        let other = SampleGenerator::new(SampleConfig {
            seed: 124,
            ..Default::default()
        })
        .generate();
        assert_ne!(first, other);
    }

    #[test]
    fn test_single_category_samples() {
        let config = SampleConfig {
            benchmarks: 1,
            groups: 1,
            subjects: 10,
            workloads: 0,
            seed: 7,
        };
        let benchmarks = SampleGenerator::new(config).generate();

        assert_eq!(benchmarks[0].data.len(), 10);
        assert!(benchmarks[0].data.iter().all(|r| r.y_axis.is_empty()));
        assert_eq!(benchmarks[0].data[8].x_axis, "gin-2");
    }

    #[test]
    fn test_empty_config() {
        let config = SampleConfig {
            subjects: 0,
            ..Default::default()
        };
        assert!(SampleGenerator::new(config).generate().is_empty());
    }
}
