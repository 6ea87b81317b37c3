//! ACO-TSP Solver - Command Line Interface
//!
//! Solves Traveling Salesman instances with Ant Colony Optimization.

use aco_tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use aco_tsp_solver::heuristics::aco::{ACOConfig, AntColony, StartStrategy};
use aco_tsp_solver::instance::TSPInstance;
use clap::{Args, Parser, Subcommand, ValueEnum};

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "aco-tsp")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Ant Colony Optimization solver for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        /// Instance file (.csv matrix, .json matrix or .tsp EUC_2D)
        #[arg(short, long)]
        matrix: PathBuf,

        #[command(flatten)]
        colony: ColonyArgs,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Instance file
        #[arg(short, long)]
        matrix: PathBuf,
    },

    /// Run several seeds and summarize
    Benchmark {
        /// Instance file
        #[arg(short, long)]
        matrix: PathBuf,

        #[command(flatten)]
        colony: ColonyArgs,

        /// Number of seeded runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// First seed; run i uses base_seed + i (wrapping)
        #[arg(long, default_value = "0")]
        base_seed: u64,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

/// Colony hyperparameters shared by `solve` and `benchmark`
#[derive(Args)]
struct ColonyArgs {
    /// Number of ants per iteration
    #[arg(short = 'a', long, default_value = "10")]
    ants: usize,

    /// Number of iterations
    #[arg(short, long, default_value = "100")]
    iterations: usize,

    /// Fraction of pheromone evaporated per iteration, in (0, 1]
    #[arg(short, long, default_value = "0.1")]
    decay: f64,

    /// Pheromone exponent
    #[arg(long, default_value = "1.0")]
    alpha: f64,

    /// Inverse-distance exponent
    #[arg(long, default_value = "1.0")]
    beta: f64,

    /// Deposit factor Q (each tour deposits Q / length per edge)
    #[arg(long, default_value = "1.0")]
    deposit_factor: f64,

    /// Start location policy
    #[arg(long, value_enum, default_value = "fixed")]
    start: Start,

    /// Start location used with `--start fixed`
    #[arg(long, default_value = "0")]
    start_index: usize,

    /// Reinforce both directions of every tour edge
    #[arg(long)]
    symmetric: bool,

    /// Build each iteration's tours in parallel
    #[arg(long)]
    parallel: bool,

    /// Time limit in seconds, checked between iterations
    #[arg(short, long)]
    time_limit: Option<f64>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Start {
    /// Every ant starts at --start-index
    Fixed,
    /// Uniformly random start per ant
    Random,
    /// Ant k starts at location k mod N
    RoundRobin,
}

impl ColonyArgs {
    fn to_config(&self, seed: u64) -> ACOConfig {
        ACOConfig {
            num_ants: self.ants,
            num_iterations: self.iterations,
            decay: self.decay,
            alpha: self.alpha,
            beta: self.beta,
            deposit_factor: self.deposit_factor,
            initial_pheromone: None,
            symmetric_deposit: self.symmetric,
            start: match self.start {
                Start::Fixed => StartStrategy::Fixed(self.start_index),
                Start::Random => StartStrategy::Random,
                Start::RoundRobin => StartStrategy::RoundRobin,
            },
            parallel: self.parallel,
            seed,
            time_limit: self.time_limit,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { matrix, colony, seed, output, verbose } => {
            solve_instance(&matrix, colony.to_config(seed), output, verbose);
        }

        Commands::Analyze { matrix } => {
            analyze_instance(&matrix);
        }

        Commands::Benchmark { matrix, colony, runs, base_seed, output } => {
            run_benchmark(&matrix, colony.to_config(base_seed), runs, base_seed, &output);
        }
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    std::process::exit(1);
}

fn load_instance(path: &Path) -> TSPInstance {
    println!("Loading instance from {:?}...", path);
    TSPInstance::from_file(path).unwrap_or_else(|e| fail("Error loading instance", e))
}

fn solve_instance(path: &Path, config: ACOConfig, output: Option<PathBuf>, verbose: bool) {
    let instance = load_instance(path);

    if verbose {
        println!("{}", instance.statistics());
        println!("{:#?}", config);
    }

    println!(
        "Solving with {} ants x {} iterations...",
        config.num_ants, config.num_iterations
    );
    let start = Instant::now();

    let mut colony = AntColony::new(instance, config)
        .unwrap_or_else(|e| fail("Invalid configuration", e));
    let solution = colony.run();

    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    if solution.is_found() {
        println!("Best distance: {:.4}", solution.cost);
        println!("Tour: {:?}", solution.tour);
    } else {
        println!("No tour found (zero iterations ran)");
    }
    println!("Iterations: {}", solution.iterations.unwrap_or(0));
    println!("Time: {:.4}s", elapsed.as_secs_f64());

    if verbose {
        let pheromone = colony.pheromone();
        println!("\nPheromone: min={:.6} mean={:.6} max={:.6}",
            pheromone.min(), pheromone.mean(), pheromone.max());
        if let (Some(first), Some(last)) = (solution.convergence.first(), solution.convergence.last()) {
            println!("Convergence: {:.4} -> {:.4}", first, last);
        }
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)
            .unwrap_or_else(|e| fail("Failed to serialize solution", e));
        std::fs::write(&out_path, json).unwrap_or_else(|e| fail("Failed to write output", e));
        println!("\nSolution saved to {:?}", out_path);
    }
}

fn analyze_instance(path: &Path) {
    let instance = load_instance(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    // Quick estimate with a short default run
    let config = ACOConfig {
        num_iterations: 20,
        ..Default::default()
    };
    match AntColony::new(instance, config) {
        Ok(mut colony) => {
            let sol = colony.run();
            println!("Quick ACO estimate (20 iterations): {:.2}", sol.cost);
        }
        Err(e) => eprintln!("Quick estimate skipped: {}", e),
    }
}

fn run_benchmark(path: &Path, aco: ACOConfig, runs: usize, base_seed: u64, output: &Path) {
    let instance = load_instance(path);

    std::fs::create_dir_all(output)
        .unwrap_or_else(|e| fail("Failed to create output directory", e));

    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed,
        parallel: true,
        show_progress: true,
        aco,
    };

    let mut benchmark = Benchmark::new(config);
    println!("Running {} seeds on {} (n={})...", runs, instance.name, instance.dimension);
    if let Err(e) = benchmark.run(&instance) {
        fail("Benchmark failed", e);
    }

    let results_path = output.join("results.csv");
    benchmark
        .export_to_csv(&results_path)
        .unwrap_or_else(|e| fail("Failed to export results", e));
    println!("\nResults exported to {:?}", results_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report).unwrap_or_else(|e| fail("Failed to save report", e));
    println!("Report saved to {:?}", report_path);
}
