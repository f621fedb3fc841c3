use aq_app::{AppError, AppResult, DemandMode, RunConfiguration, RunPaths, plan};
use aq_results::{BinFile, LinkAttribute, NodeAttribute, ResultReader, ResultSet, RunStore};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aq-cli")]
#[command(about = "aquarun CLI - Hydraulic and water quality run orchestration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation with the EPANET toolkit
    Run {
        /// Network input (.inp) file
        input: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
        /// Do not record the run in the run history
        #[arg(long)]
        no_record: bool,
    },
    /// Show the files and stages a run would use
    Paths {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Summarize a binary output file
    Inspect {
        /// Binary output (.bin) file
        bin_file: PathBuf,
        /// Print the summary as YAML
        #[arg(long)]
        yaml: bool,
    },
    /// List recorded runs in a directory
    Runs {
        /// Directory holding the run files
        dir: PathBuf,
    },
    /// Show details of a recorded run
    ShowRun {
        /// Directory holding the run files
        dir: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one time series from a binary output file as CSV
    ExportSeries {
        /// Binary output (.bin) file
        bin_file: PathBuf,
        /// Node or link ID
        element_id: String,
        /// Attribute name (e.g., pressure, head, flow, velocity)
        attribute: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run configuration from an optional YAML file, overridden by flags.
#[derive(Args)]
struct ConfigArgs {
    /// YAML run configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Prefix for the run files
    #[arg(long)]
    prefix: Option<String>,
    /// Demand mode: DD or PDD
    #[arg(long)]
    mode: Option<DemandMode>,
    /// Minimum pressure for pressure dependent demand
    #[arg(long)]
    pmin: Option<f64>,
    /// Nominal pressure for pressure dependent demand
    #[arg(long)]
    pnom: Option<f64>,
    /// Load hydraulics from the hydraulics file
    #[arg(long)]
    use_hyd: bool,
    /// Save hydraulics to the hydraulics file
    #[arg(long)]
    save_hyd: bool,
    /// Hydraulics file (defaults to <prefix>.hyd)
    #[arg(long)]
    hyd_file: Option<PathBuf>,
    /// Skip remaining stages after the first fatal code
    #[arg(long)]
    fail_fast: bool,
}

impl ConfigArgs {
    fn resolve(&self) -> AppResult<RunConfiguration> {
        let mut config = match &self.config {
            Some(path) => RunConfiguration::load_yaml(path)?,
            None => RunConfiguration::default(),
        };
        if let Some(prefix) = &self.prefix {
            config.file_prefix = prefix.clone();
        }
        if let Some(mode) = self.mode {
            config.demand_mode = mode;
        }
        if let Some(pmin) = self.pmin {
            config.minimum_pressure = pmin;
        }
        if let Some(pnom) = self.pnom {
            config.nominal_pressure = pnom;
        }
        if let Some(hyd) = &self.hyd_file {
            config.hydraulics_file = Some(hyd.clone());
        }
        config.use_hydraulics |= self.use_hyd;
        config.save_hydraulics |= self.save_hyd;
        config.fail_fast |= self.fail_fast;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            no_record,
        } => cmd_run(&input, &config.resolve()?, !no_record),
        Commands::Paths { config } => cmd_paths(&config.resolve()?),
        Commands::Inspect { bin_file, yaml } => cmd_inspect(&bin_file, yaml),
        Commands::Runs { dir } => cmd_runs(&dir),
        Commands::ShowRun { dir, run_id } => cmd_show_run(&dir, &run_id),
        Commands::ExportSeries {
            bin_file,
            element_id,
            attribute,
            output,
        } => cmd_export_series(&bin_file, &element_id, &attribute, output.as_deref()),
    }
}

#[cfg(feature = "native")]
fn cmd_run(input: &Path, config: &RunConfiguration, record: bool) -> AppResult<()> {
    use aq_app::{InpFile, RunRequest, RunStage, record_run, run_with_progress};
    use aq_core::Severity;
    use aq_toolkit::Toolkit;
    use aq_toolkit::native::Epanet;

    println!("Running {} ({} demand)", input.display(), config.demand_mode);

    let toolkit = Epanet::new();
    let reader = BinFile::new();
    let source = InpFile::new(input);
    let request = RunRequest {
        toolkit: &toolkit,
        reader: &reader,
        input: &source,
        config,
    };

    let result = run_with_progress(
        &request,
        Some(&mut |event| {
            if event.stage == RunStage::Running {
                return;
            }
            println!("  {} ({:.2}s)", event.stage.label(), event.elapsed_wall_s);
        }),
    )?;

    println!("\nStages:");
    for outcome in &result.outcomes {
        let marker = match (outcome.skipped, outcome.severity()) {
            (true, _) => "-",
            (false, Severity::Ok) => "✓",
            (false, Severity::Warning) => "!",
            (false, Severity::Fatal) => "✗",
        };
        println!(
            "  {} {:<18} {:>5}  {:.3}s",
            marker,
            outcome.stage.name(),
            outcome.status.code(),
            outcome.elapsed_s
        );
    }
    println!("\nOverall status: {}", result.overall);

    match &result.results {
        Ok(set) => print_result_summary(set),
        Err(e) => println!("Results unavailable: {}", e),
    }
    if !result.results_reliable {
        println!("Warning: results may be stale or incomplete");
    }

    if record {
        let store = RunStore::for_prefix(Path::new(&config.file_prefix))?;
        let manifest = record_run(&store, toolkit.name(), config, &result)?;
        println!("\nRecorded run: {}", manifest.run_id);
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn cmd_run(_input: &Path, _config: &RunConfiguration, _record: bool) -> AppResult<()> {
    Err(aq_toolkit::ToolkitError::Unavailable {
        message: "aq-cli was built without the `native` feature".to_string(),
    }
    .into())
}

fn cmd_paths(config: &RunConfiguration) -> AppResult<()> {
    let paths = RunPaths::resolve(config);
    println!("Input:      {}", paths.input.display());
    println!("Report:     {}", paths.report.display());
    println!("Output:     {}", paths.output.display());
    println!("Hydraulics: {}", paths.hydraulics.display());

    println!("\nStages:");
    for stage in plan(config) {
        println!("  {}", stage);
    }
    Ok(())
}

fn print_result_summary(set: &ResultSet) {
    let summary = set.summary();
    println!("\nResults:");
    println!("  Nodes: {}", summary.node_count);
    println!("  Links: {}", summary.link_count);
    println!("  Periods: {}", summary.period_count);
    println!("  Duration: {} s", summary.duration_s);
    if summary.warning_flag {
        println!("  Solver reported warnings");
    }
}

fn read_results(bin_file: &Path) -> AppResult<ResultSet> {
    Ok(BinFile::new().read(bin_file)?)
}

fn cmd_inspect(bin_file: &Path, yaml: bool) -> AppResult<()> {
    let set = read_results(bin_file)?;
    if yaml {
        print!("{}", serde_yaml::to_string(&set.summary())?);
        return Ok(());
    }

    let net = &set.network;
    println!("File: {}", bin_file.display());
    if !net.titles[0].is_empty() {
        println!("Title: {}", net.titles[0]);
    }
    print_result_summary(&set);
    println!("  Report step: {} s", net.report_step_s);
    println!("  Quality: {:?} ({} {})", net.quality, net.chem_name, net.chem_units);

    println!("\nNodes:");
    for id in &net.node_ids {
        println!("  {}", id);
    }
    println!("\nLinks:");
    for id in &net.link_ids {
        println!("  {}", id);
    }
    Ok(())
}

fn cmd_runs(dir: &Path) -> AppResult<()> {
    let store = RunStore::in_dir(dir)?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        println!("No recorded runs in: {}", dir.display());
    } else {
        println!("Recorded runs in '{}':", dir.display());
        for manifest in runs {
            println!(
                "  {} ({}) status={}",
                manifest.run_id, manifest.timestamp, manifest.overall_code
            );
        }
    }
    Ok(())
}

fn cmd_show_run(dir: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::in_dir(dir)?;
    let manifest = store.load_manifest(run_id)?;

    println!("Run: {}", manifest.run_id);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Toolkit: {}", manifest.toolkit);
    println!("  Prefix: {}", manifest.file_prefix);
    println!("  Demand mode: {}", manifest.demand_mode);
    println!(
        "  Hydraulics: used={} saved={}",
        manifest.used_hydraulics, manifest.saved_hydraulics
    );
    println!("  Overall status: {}", manifest.overall_code);

    println!("\nStages:");
    for record in &manifest.stages {
        let note = if record.skipped { " (skipped)" } else { "" };
        println!(
            "  {:<18} {:>5} {}{}",
            record.stage, record.code, record.severity, note
        );
    }

    if let Some(summary) = &manifest.summary {
        println!("\nResults:");
        println!("  Nodes: {}", summary.node_count);
        println!("  Links: {}", summary.link_count);
        println!("  Periods: {}", summary.period_count);
    }
    if let Some(err) = &manifest.decode_error {
        println!("\nResults unavailable: {}", err);
    }
    Ok(())
}

fn cmd_export_series(
    bin_file: &Path,
    element_id: &str,
    attribute: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let set = read_results(bin_file)?;

    // Try node attribute first
    let series = NodeAttribute::parse(attribute)
        .and_then(|attr| set.node_series(attr, element_id))
        .or_else(|| {
            LinkAttribute::parse(attribute).and_then(|attr| set.link_series(attr, element_id))
        })
        .ok_or_else(|| {
            AppError::Results(format!(
                "no '{}' series for element '{}'",
                attribute, element_id
            ))
        })?;

    let mut csv = String::from("time_s,value\n");
    for (t, val) in set.times.iter().zip(&series) {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
