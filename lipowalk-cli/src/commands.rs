use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use lipowalk_analysis::Summary;
use lipowalk_config::{LipowalkConfig, Overrides};
use lipowalk_simulator::{RunReport, Simulator, Sweep};
use lipowalk_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser, Debug)]
#[command(version, about = "Random-walk escape from a one-dimensional liposome")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one simulation and write its datasets
    Simulate(SimulateArgs),
    /// Run paired (m, tmax) simulations, each with its own base seed
    Sweep(SweepArgs),
    /// Aggregate the datasets of runs sharing N, m and tmax
    Analyze(AnalyzeArgs),
}

/// Options shared by the commands that run simulations.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of walkers N (default 10000)
    #[arg(allow_negative_numbers = true)]
    pub population: Option<i64>,

    /// Base seed; drawn from the OS entropy source when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads advancing the population
    #[arg(long)]
    pub threads: Option<usize>,

    /// Directory receiving the output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (defaults to ./lipowalk.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print Prometheus metrics after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Interval subdivisions m; the step length is 1/m (default 10000)
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    pub subdivisions: Option<i64>,

    /// Number of rounds (default 200000)
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub tmax: Option<i64>,

    /// Fail unless the run digest equals this value
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Comma-separated interval subdivisions, paired with --tmax
    #[arg(
        short = 'm',
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "10,100,1000,10000"
    )]
    pub subdivisions: Vec<i64>,

    /// Comma-separated round counts, paired with --subdivisions
    #[arg(
        short = 't',
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "1000,30000,50000,200000"
    )]
    pub tmax: Vec<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory holding the run files
    #[arg(short, long, default_value = "files")]
    pub dir: PathBuf,

    /// Number of walkers N of the runs
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub population: usize,

    /// Interval subdivisions m of the runs
    #[arg(short = 'm', long)]
    pub subdivisions: u64,

    /// Number of rounds of the runs
    #[arg(short = 't', long)]
    pub tmax: u64,

    /// Histogram bins over [0, 1]
    #[arg(long, default_value_t = 75)]
    pub bins: usize,

    /// Configuration file (defaults to ./lipowalk.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            population: self.population,
            seed: self.seed,
            threads: self.threads,
            output_directory: self.output_dir.clone(),
            log_level: self.log_level.clone(),
            ..Overrides::default()
        }
    }

    fn settings(&self, overrides: Overrides) -> anyhow::Result<LipowalkConfig> {
        load_settings(self.config.as_deref(), &overrides)
    }
}

impl AnalyzeArgs {
    fn settings(&self) -> anyhow::Result<LipowalkConfig> {
        load_settings(
            self.config.as_deref(),
            &Overrides {
                log_level: self.log_level.clone(),
                ..Overrides::default()
            },
        )
    }
}

/// Layers the command line over the file and environment configuration.
fn load_settings(config: Option<&Path>, overrides: &Overrides) -> anyhow::Result<LipowalkConfig> {
    let base = match config {
        Some(path) => LipowalkConfig::load_from_path(path)?,
        None => LipowalkConfig::load()?,
    };
    Ok(base.with_overrides(overrides)?)
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Simulate(args) => simulate(args),
        Commands::Sweep(args) => sweep(args),
        Commands::Analyze(args) => analyze(args),
    }
}

fn init_logging(settings: &LipowalkConfig) -> anyhow::Result<()> {
    EventLogger::init(&settings.telemetry.log_level)
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let settings = args.run.settings(Overrides {
        subdivisions: args.subdivisions,
        tmax: args.tmax,
        ..args.run.overrides()
    })?;
    init_logging(&settings)?;

    let metrics = MetricsRecorder::new()?;
    let simulator = Simulator::from_settings(&settings)?.with_metrics(metrics.clone());
    let report = simulator.run_and_validate(args.validate_hash.as_deref())?;
    print_report(&report);

    if args.run.metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> anyhow::Result<()> {
    let settings = args.run.settings(args.run.overrides())?;
    init_logging(&settings)?;

    let pairs = Sweep::zip_pairs(&args.subdivisions, &args.tmax)?;
    let metrics = MetricsRecorder::new()?;
    let reports = Sweep::plan(&settings, &pairs, Some(metrics.clone()))?.execute()?;
    info!(runs = reports.len(), "Sweep complete");
    for report in &reports {
        print_report(report);
    }

    if args.run.metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    init_logging(&args.settings()?)?;

    let summary = lipowalk_analysis::summarize(
        &args.dir,
        args.population,
        args.subdivisions,
        args.tmax,
        args.bins,
    )
    .with_context(|| format!("analyzing runs in {}", args.dir.display()))?;
    print_summary(&summary);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "N={} m={} tmax={} seed={} survivors={} digest={}",
        report.config.population(),
        report.config.subdivisions(),
        report.config.tmax(),
        report.config.base_seed(),
        report.outcome.survivors(),
        report.digest
    );
    println!("  {}", report.files.time_series.display());
    println!("  {}", report.files.final_positions.display());
}

fn print_summary(summary: &Summary) {
    println!(
        "# N={} m={} tmax={} | {} time series, {} position files",
        summary.population,
        summary.subdivisions,
        summary.tmax,
        summary.time_series_runs,
        summary.position_runs
    );
    match summary.fitted_decay_time {
        Some(tau) => println!("# fitted tau = {tau:.3}"),
        None => println!("# fitted tau unavailable"),
    }
    println!("# theoretical tau = {:.3}", summary.theoretical_decay_time);
    println!("# bin_center    density");
    for (center, density) in summary.histogram.density() {
        println!("{center}    {density}");
    }
}
