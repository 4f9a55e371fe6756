use std::fs;

use anyhow::{Context, Result, bail};
use cell_reduction::config::ReductionConfig;
use cell_reduction::reduction::{ReductionMode, ReductionResult, reduce, reduce_batch};
use cell_reduction::{UnitCell, is_buerger_cell, is_niggli_cell};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cell-reduce")]
#[command(about = "Niggli and minimum reduction of crystallographic unit cells")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads to use for batches (default: all available cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,
}

#[derive(Args)]
struct CellArgs {
    /// a b c alpha beta gamma (degrees), or g11 g22 g33 g12 g13 g23 with --metrical
    #[arg(num_args = 6, required = true, allow_negative_numbers = true)]
    values: Vec<f64>,

    /// Interpret the six values as metrical matrix entries
    #[arg(short, long)]
    metrical: bool,

    /// Relative epsilon for approximate comparisons
    #[arg(short, long)]
    epsilon: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce a single cell
    Reduce {
        #[command(flatten)]
        cell: CellArgs,

        /// Use the bounded minimum reduction instead of plain Niggli reduction
        #[arg(long)]
        minimum: bool,

        /// Iteration budget (actions for Niggli, steps for minimum reduction)
        #[arg(long)]
        iteration_limit: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a cell is already Buerger / Niggli reduced
    Check {
        #[command(flatten)]
        cell: CellArgs,
    },
    /// Reduce every cell listed in a JSON file
    Batch {
        /// Input file: [{"values": [...], "metrical": false}, ...]
        #[arg(short, long)]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Use the bounded minimum reduction
        #[arg(long)]
        minimum: bool,

        /// Relative epsilon for approximate comparisons
        #[arg(short, long)]
        epsilon: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
struct CellInput {
    values: [f64; 6],
    #[serde(default)]
    metrical: bool,
}

#[derive(Debug, Serialize)]
struct ReductionReport {
    parameters: [f64; 6],
    metrical_matrix: [f64; 6],
    change_of_basis: [[i32; 3]; 3],
    inverse_change_of_basis: [[i32; 3]; 3],
    n_actions: usize,
    n_steps: usize,
    converged: bool,
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ReductionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("Failed to set thread pool size")?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!(
                "Thread count {} specified but parallel feature not enabled. Ignoring.",
                threads
            );
        }
    }

    match cli.command {
        Commands::Reduce {
            cell,
            minimum,
            iteration_limit,
            json,
        } => run_reduce(cell, minimum, iteration_limit, json),
        Commands::Check { cell } => run_check(cell),
        Commands::Batch {
            input,
            output,
            minimum,
            epsilon,
        } => run_batch(input, output, minimum, epsilon),
    }
}

fn parse_cell(args: &CellArgs) -> Result<UnitCell> {
    let values: [f64; 6] = match args.values.as_slice().try_into() {
        Ok(values) => values,
        Err(_) => bail!("Expected exactly six values, got {}", args.values.len()),
    };
    UnitCell::from_six(values, args.metrical).context("Invalid unit cell")
}

fn mode_and_config(
    minimum: bool,
    epsilon: Option<f64>,
    iteration_limit: Option<usize>,
) -> (ReductionMode, ReductionConfig) {
    let (mode, mut config) = if minimum {
        (ReductionMode::Minimum, ReductionConfig::minimum())
    } else {
        (ReductionMode::Niggli, ReductionConfig::default())
    };
    if let Some(epsilon) = epsilon {
        config.relative_epsilon = epsilon;
    }
    if let Some(limit) = iteration_limit {
        config.iteration_limit = limit;
    }
    (mode, config)
}

fn report(result: &ReductionResult) -> Result<ReductionReport> {
    let cell = result.as_unit_cell()?;
    Ok(ReductionReport {
        parameters: cell.parameters(),
        metrical_matrix: cell.metrical_matrix(),
        change_of_basis: result.change_of_basis().rows(),
        inverse_change_of_basis: result.inverse_change_of_basis()?.rows(),
        n_actions: result.n_actions(),
        n_steps: result.n_steps(),
        converged: result.converged(),
    })
}

fn run_reduce(
    args: CellArgs,
    minimum: bool,
    iteration_limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let cell = parse_cell(&args)?;
    let (mode, config) = mode_and_config(minimum, args.epsilon, iteration_limit);
    info!("Reducing {:?} ({:?})", cell.parameters(), mode);

    let result = reduce(&cell, mode, &config).context("Reduction failed")?;
    let report = report(&result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let [a, b, c, alpha, beta, gamma] = report.parameters;
        println!(
            "Reduced cell: {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}",
            a, b, c, alpha, beta, gamma
        );
        println!("Change of basis: {}", result.change_of_basis());
        println!(
            "Actions: {}, steps: {}, converged: {}",
            report.n_actions, report.n_steps, report.converged
        );
    }
    Ok(())
}

fn run_check(args: CellArgs) -> Result<()> {
    let cell = parse_cell(&args)?;
    println!("Buerger cell: {}", is_buerger_cell(&cell, args.epsilon));
    println!("Niggli cell: {}", is_niggli_cell(&cell, args.epsilon));
    Ok(())
}

fn run_batch(
    input: String,
    output: Option<String>,
    minimum: bool,
    epsilon: Option<f64>,
) -> Result<()> {
    let text = fs::read_to_string(&input).with_context(|| format!("Failed to read {}", input))?;
    let inputs: Vec<CellInput> =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", input))?;
    let (mode, config) = mode_and_config(minimum, epsilon, None);

    // Invalid cells are reported per entry instead of aborting the batch
    let mut entries: Vec<BatchEntry> = Vec::with_capacity(inputs.len());
    let mut cells = Vec::with_capacity(inputs.len());
    let mut cell_indices = Vec::with_capacity(inputs.len());
    for (index, cell_input) in inputs.iter().enumerate() {
        match UnitCell::from_six(cell_input.values, cell_input.metrical) {
            Ok(cell) => {
                cells.push(cell);
                cell_indices.push(index);
            }
            Err(err) => entries.push(BatchEntry {
                index,
                result: None,
                error: Some(err.to_string()),
            }),
        }
    }

    info!("Reducing {} cells from {} ({:?})", cells.len(), input, mode);
    for (index, outcome) in cell_indices
        .into_iter()
        .zip(reduce_batch(&cells, mode, &config))
    {
        let entry = match outcome.map_err(anyhow::Error::from).and_then(|r| report(&r)) {
            Ok(report) => BatchEntry {
                index,
                result: Some(report),
                error: None,
            },
            Err(err) => {
                warn!("Cell {} failed: {:#}", index, err);
                BatchEntry {
                    index,
                    result: None,
                    error: Some(format!("{:#}", err)),
                }
            }
        };
        entries.push(entry);
    }
    entries.sort_by_key(|entry| entry.index);

    let json = serde_json::to_string_pretty(&entries)?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {} results to {}", entries.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
