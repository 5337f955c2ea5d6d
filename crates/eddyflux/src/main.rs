use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use eddyflux_core::{
    config::EddyfluxConfig,
    growth::simulate_batch,
    kinetics::rate_curve,
    outputs::{self, DatasetSummary},
    pipeline::{analyze_datasets, DatasetInput, DatasetOutcome},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod plot;
mod report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Eddy-covariance flux estimation and growth-model runs", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to $EDDYFLUX_CONFIG, then built-in values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate flux from one or more eddy-covariance files
    Flux(FluxArgs),
    /// Run the logistic growth model for one or more initial values
    Growth(GrowthArgs),
    /// Evaluate the Michaelis-Menten rate curve
    Kinetics(KineticsArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug)]
struct FluxArgs {
    /// Delimited input files, one dataset each
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Write a scatter plot with the fitted line per dataset
    #[arg(long)]
    plot_dir: Option<PathBuf>,
    /// Write fluctuations (CSV) and a summary (JSON) per dataset
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Abort on the first failing dataset instead of skipping it
    #[arg(long)]
    fail_fast: bool,
    /// Fit the regression line through the origin
    #[arg(long)]
    force_origin: bool,
}

#[derive(Args, Debug)]
struct GrowthArgs {
    /// Initial value; repeat for several runs (overrides the config list)
    #[arg(long = "initial")]
    initial_values: Vec<f64>,
    /// Series length (overrides growth.step_count)
    #[arg(long)]
    steps: Option<usize>,
    #[arg(long)]
    plot_dir: Option<PathBuf>,
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct KineticsArgs {
    #[arg(long)]
    plot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Flux(args) => handle_flux(&config, args),
        Command::Growth(args) => handle_growth(&config, args),
        Command::Kinetics(args) => handle_kinetics(&config, args),
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(flag: Option<&Path>) -> Result<EddyfluxConfig> {
    dotenvy::dotenv().ok();

    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| env::var_os("EDDYFLUX_CONFIG").map(PathBuf::from));

    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            EddyfluxConfig::load(&path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        }
        None => Ok(EddyfluxConfig::default()),
    }
}

fn handle_flux(config: &EddyfluxConfig, args: FluxArgs) -> Result<()> {
    let mut settings = config.analysis_settings()?;
    if args.force_origin {
        settings.regression.force_origin = true;
    }

    let mut inputs = Vec::with_capacity(args.inputs.len());
    let mut read_failures = Vec::new();
    for path in &args.inputs {
        match DatasetInput::from_path(path) {
            Ok(input) => inputs.push(input),
            Err(err) if args.fail_fast => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable dataset");
                read_failures.push((path.display().to_string(), err.to_string()));
            }
        }
    }

    let names = outputs::unique_names(inputs.iter().map(|input| input.name.as_str()));
    for (input, name) in inputs.iter_mut().zip(names) {
        if input.name != name {
            warn!(dataset = %input.name, renamed = %name, "duplicate dataset name");
            input.name = name;
        }
    }

    let outcomes = analyze_datasets(&inputs, &settings);

    if args.fail_fast {
        let first_failure = outcomes
            .iter()
            .find_map(|outcome| outcome.result.as_ref().err().map(|err| (&outcome.name, err)));
        if let Some((name, err)) = first_failure {
            bail!("dataset '{name}' failed: {err}");
        }
    }

    println!("{}", report::flux_table(&settings, &outcomes));
    for (path, message) in &read_failures {
        println!("{path}: not analysed ({message})");
    }
    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            println!("{}: not analysed ({err})", outcome.name);
        }
    }

    for outcome in &outcomes {
        write_dataset_artifacts(&args, outcome)?;
    }

    let failed = read_failures.len() + outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} dataset(s) failed", args.inputs.len());
    }
    Ok(())
}

fn write_dataset_artifacts(args: &FluxArgs, outcome: &DatasetOutcome) -> Result<()> {
    let Ok(report) = &outcome.result else {
        return Ok(());
    };

    if let Some(dir) = &args.plot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(format!("{}_plot.svg", outcome.name));
        plot::fluctuation_scatter(&path, &outcome.name, report)?;
        info!(path = %path.display(), "wrote scatter plot");
    }

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let mut frame = outputs::fluctuation_frame(report)?;
        outputs::write_csv(&mut frame, &dir.join(format!("{}_fluctuations.csv", outcome.name)))?;
        let summary =
            DatasetSummary::from_report(&outcome.name, outcome.file_hash.as_deref(), report);
        outputs::write_json(&summary, &dir.join(format!("{}_summary.json", outcome.name)))?;
        info!(dir = %dir.display(), dataset = %outcome.name, "exported dataset");
    }

    Ok(())
}

fn handle_growth(config: &EddyfluxConfig, args: GrowthArgs) -> Result<()> {
    let model = config.growth_model();
    let initial_values = if args.initial_values.is_empty() {
        config.growth.initial_values.clone()
    } else {
        args.initial_values
    };
    if initial_values.iter().any(|v| !v.is_finite()) {
        bail!("initial values must be finite");
    }
    let step_count = args.steps.unwrap_or(config.growth.step_count);

    info!(runs = initial_values.len(), step_count, "simulating growth");
    let runs = simulate_batch(&model, &initial_values, step_count);
    println!("{}", report::growth_table(&model, &runs));

    if let Some(dir) = &args.plot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join("growth.svg");
        plot::growth_lines(&path, &runs)?;
        info!(path = %path.display(), "wrote growth plot");
    }

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let mut frame = outputs::growth_frame(&runs)?;
        outputs::write_csv(&mut frame, &dir.join("growth.csv"))?;
    }

    Ok(())
}

fn handle_kinetics(config: &EddyfluxConfig, args: KineticsArgs) -> Result<()> {
    let model = config.kinetics_model();
    let curve = rate_curve(&model, config.kinetics.points, config.kinetics.step);
    println!("{}", report::kinetics_table(&model, &curve));

    if let Some(dir) = &args.plot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join("michaelis_menten.svg");
        plot::rate_curve_line(&path, &curve)?;
        info!(path = %path.display(), "wrote rate curve plot");
    }

    Ok(())
}
