use anyhow::{bail, Context, Result};
use benchviz::dataset::{group_records, load_benchmarks, merge_benchmark_files};
use benchviz::gotest::{
    load_bench_output, parse_bench_output, CountUnit, IngestOptions, MemUnit, TimeUnit,
};
use benchviz::model::{ChartType, SortOrder};
use benchviz::pattern::NamePattern;
use benchviz::render::render_all;
use benchviz::sample::{SampleConfig, SampleGenerator};
use benchviz::settings::{Preferences, Settings, UrlParams};
use benchviz::Session;
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "benchviz")]
#[command(about = "Turn benchmark result datasets into chart configurations")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List benchmarks and their groups with selection indices
    Groups {
        /// Benchmark dataset (JSON array or single object)
        input: PathBuf,
    },

    /// Write renderer options for every chart of the selected group
    Options {
        #[command(flatten)]
        selection: Selection,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert `go test -bench` output (plain or -json) into a dataset
    Ingest {
        /// Benchmark output file, or "-" for stdin
        input: PathBuf,

        /// Output file for the dataset
        #[arg(short, long, default_value = "./benchmarks.json")]
        output: PathBuf,

        /// How to split benchmark names: parts n, x (s), y (w) joined by _ or /
        #[arg(short, long, default_value = "x", value_parser = parse_pattern)]
        pattern: NamePattern,

        /// Only keep benchmarks whose name matches this regex
        #[arg(short, long, value_parser = parse_filter)]
        filter: Option<Regex>,

        /// Benchmark name (defaults to the package)
        #[arg(short, long)]
        name: Option<String>,

        /// Benchmark description
        #[arg(short, long)]
        description: Option<String>,

        /// Time unit: ns, us, ms or s
        #[arg(short, long, default_value = "ns", value_parser = parse_time_unit)]
        time_unit: TimeUnit,

        /// Memory unit: B, KB, MB or GB
        #[arg(short, long, default_value = "B", value_parser = parse_mem_unit)]
        mem_unit: MemUnit,

        /// Allocation and iteration count unit: K, M, B or T (as-is when omitted)
        #[arg(short, long, value_parser = parse_count_unit)]
        alloc_unit: Option<CountUnit>,
    },

    /// Merge benchmark files and directories into one dataset
    Merge {
        /// Files or directories of *.json files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output file for the merged dataset
        #[arg(short, long, default_value = "./merged.json")]
        output: PathBuf,
    },

    /// Generate a deterministic sample dataset
    Sample {
        /// Output file for the dataset
        #[arg(short, long, default_value = "./sample.json")]
        output: PathBuf,

        /// Random seed for data generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of benchmarks
        #[arg(short, long, default_value = "2")]
        benchmarks: usize,

        /// Groups per benchmark
        #[arg(long, default_value = "2")]
        groups: usize,

        /// x-axis categories per group
        #[arg(long, default_value = "4")]
        subjects: usize,

        /// y-axis categories per group (0 for single-category data)
        #[arg(long, default_value = "3")]
        workloads: usize,
    },

    /// Render SVG previews of the selected group's charts
    Preview {
        #[command(flatten)]
        selection: Selection,

        /// Output directory for SVG files
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// Flip and persist the dark-mode preference
    ToggleDark {
        /// Preferences file
        #[arg(long, default_value = "./.benchviz-prefs.json")]
        prefs: PathBuf,
    },
}

/// Which benchmark, group and display settings to use
#[derive(Args)]
struct Selection {
    /// Benchmark dataset (JSON array or single object)
    input: PathBuf,

    /// URL-style state, e.g. "?s=asc&l=true&c=pie&b=1&g=0"
    #[arg(short, long)]
    query: Option<String>,

    /// Benchmark index
    #[arg(short, long)]
    benchmark: Option<usize>,

    /// Group index within the benchmark
    #[arg(short, long)]
    group: Option<usize>,

    /// Chart type: bar, line or pie
    #[arg(short, long, value_parser = parse_chart_type)]
    chart: Option<ChartType>,

    /// Sort by totals: asc or desc
    #[arg(short, long, value_parser = parse_sort_order)]
    sort: Option<SortOrder>,

    /// Show value labels
    #[arg(short, long, default_value = "false")]
    labels: bool,

    /// Force the dark theme
    #[arg(long, conflicts_with = "light")]
    dark: bool,

    /// Force the light theme
    #[arg(long)]
    light: bool,

    /// Preferences file holding the saved theme
    #[arg(long, default_value = "./.benchviz-prefs.json")]
    prefs: PathBuf,
}

fn parse_chart_type(s: &str) -> Result<ChartType, String> {
    ChartType::parse(s).ok_or_else(|| format!("unknown chart type '{}'", s))
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    SortOrder::parse(s).ok_or_else(|| format!("sort order must be asc or desc, got '{}'", s))
}

fn parse_pattern(s: &str) -> Result<NamePattern, String> {
    NamePattern::parse(s).map_err(|err| err.to_string())
}

fn parse_filter(s: &str) -> Result<Regex, String> {
    Regex::new(s).map_err(|err| format!("invalid filter regex: {}", err))
}

fn parse_time_unit(s: &str) -> Result<TimeUnit, String> {
    TimeUnit::parse(s).ok_or_else(|| format!("time unit must be ns, us, ms or s, got '{}'", s))
}

fn parse_mem_unit(s: &str) -> Result<MemUnit, String> {
    MemUnit::parse(s).ok_or_else(|| format!("memory unit must be B, KB, MB or GB, got '{}'", s))
}

fn parse_count_unit(s: &str) -> Result<CountUnit, String> {
    CountUnit::parse(s).ok_or_else(|| format!("count unit must be K, M, B or T, got '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Groups { input } => list_groups(&input)?,
        Commands::Options { selection, output } => {
            write_options(&selection, output.as_deref())?;
        }
        Commands::Ingest {
            input,
            output,
            pattern,
            filter,
            name,
            description,
            time_unit,
            mem_unit,
            alloc_unit,
        } => {
            let options = IngestOptions {
                pattern,
                filter,
                time_unit,
                mem_unit,
                alloc_unit: alloc_unit.unwrap_or_default(),
            };
            ingest(&input, &output, &options, name, description.unwrap_or_default())?;
        }
        Commands::Merge { paths, output } => merge(&paths, &output)?,
        Commands::Sample {
            output,
            seed,
            benchmarks,
            groups,
            subjects,
            workloads,
        } => {
            let config = SampleConfig {
                benchmarks,
                groups,
                subjects,
                workloads,
                seed,
            };
            write_sample(config, &output)?;
        }
        Commands::Preview { selection, output } => preview(&selection, &output)?,
        Commands::ToggleDark { prefs } => toggle_dark(&prefs)?,
    }

    Ok(())
}

/// Load the dataset, then apply the saved theme, the selection and the
/// theme flags.
fn open_session(selection: &Selection) -> Result<Session> {
    let benchmarks = load_benchmarks(&selection.input)
        .with_context(|| format!("Failed to load {}", selection.input.display()))?;
    if benchmarks.is_empty() {
        warn!(path = %selection.input.display(), "no benchmarks to display");
    }

    let prefs = Preferences::load(&selection.prefs).context("Failed to read preferences")?;
    let mut session = Session::new(benchmarks);
    session
        .settings_mut()
        .set_dark(prefs.dark_mode().unwrap_or(false));

    // Flags override the query string field by field.
    let query = selection
        .query
        .as_deref()
        .map(UrlParams::parse)
        .unwrap_or_default();
    session.apply_params(&UrlParams {
        sort: selection.sort.or(query.sort),
        show_labels: selection.labels.then_some(true).or(query.show_labels),
        chart: selection.chart.or(query.chart),
        benchmark: selection.benchmark.or(query.benchmark),
        group: selection.group.or(query.group),
    });

    if selection.dark {
        session.settings_mut().set_dark(true);
    } else if selection.light {
        session.settings_mut().set_dark(false);
    }

    info!(
        benchmark = session.active_benchmark_index(),
        group = session.active_group_index(),
        chart = session.settings().chart_type().as_str(),
        query = %session.to_query_string(),
        "session ready"
    );
    Ok(session)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn list_groups(input: &Path) -> Result<()> {
    let benchmarks =
        load_benchmarks(input).with_context(|| format!("Failed to load {}", input.display()))?;
    if benchmarks.is_empty() {
        bail!("{} holds no benchmarks", input.display());
    }

    for (b, benchmark) in benchmarks.iter().enumerate() {
        println!("[{}] {} ({} records)", b, benchmark.name, benchmark.data.len());
        if !benchmark.description.is_empty() {
            println!("    {}", benchmark.description);
        }
        for (g, group) in group_records(benchmark).iter().enumerate() {
            println!("    [{}] {} ({} records)", g, group.name, group.data.len());
        }
    }
    Ok(())
}

fn write_options(selection: &Selection, output: Option<&Path>) -> Result<()> {
    let mut session = open_session(selection)?;
    let options = session.all_chart_options();
    let json = to_json(&options)?;

    match output {
        Some(path) => {
            write_file(path, &json)?;
            println!("Generated: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn ingest(
    input: &Path,
    output: &Path,
    options: &IngestOptions,
    name: Option<String>,
    description: String,
) -> Result<()> {
    let mut benchmark = if input == Path::new("-") {
        let text = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
        parse_bench_output(&text, options)?
    } else {
        load_bench_output(input, options)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };
    if benchmark.data.is_empty() {
        bail!("no benchmark results in {}", input.display());
    }

    if let Some(name) = name {
        benchmark.name = name;
    } else if benchmark.name.is_empty() {
        benchmark.name = "Benchmarks".to_string();
    }
    benchmark.description = description;

    info!(
        records = benchmark.data.len(),
        groups = group_records(&benchmark).len(),
        "ingested benchmark output"
    );
    write_file(output, &to_json(&[benchmark])?)?;
    println!("Generated: {}", output.display());
    Ok(())
}

fn merge(paths: &[PathBuf], output: &Path) -> Result<()> {
    let merged = merge_benchmark_files(paths)?;
    write_file(output, &to_json(&merged)?)?;
    println!("Merged {} benchmarks", merged.len());
    println!("Generated: {}", output.display());
    Ok(())
}

fn write_sample(config: SampleConfig, output: &Path) -> Result<()> {
    let benchmarks = SampleGenerator::new(config).generate();
    if benchmarks.is_empty() {
        bail!("sample configuration produces no data");
    }
    write_file(output, &to_json(&benchmarks)?)?;
    println!("Generated: {}", output.display());
    Ok(())
}

fn preview(selection: &Selection, output_dir: &Path) -> Result<()> {
    let mut session = open_session(selection)?;
    let charts = session.chart_data();
    if charts.is_empty() {
        bail!("nothing to render for the selected group");
    }

    let settings = session.settings().render_settings();
    render_all(&charts, &settings, session.colors_mut(), output_dir)?;
    Ok(())
}

fn toggle_dark(path: &Path) -> Result<()> {
    let mut prefs = Preferences::load(path).context("Failed to read preferences")?;
    let mut settings = Settings::new();
    settings.set_dark(prefs.dark_mode().unwrap_or(false));

    let is_dark = settings.toggle_dark(&mut prefs);
    prefs.save().context("Failed to save preferences")?;
    println!("Dark mode: {}", if is_dark { "on" } else { "off" });
    println!("Saved: {}", prefs.path().display());
    Ok(())
}
