//! Benchmarking and experimentation module.
//!
//! Runs the colony under several seeds on one instance, collects per-run
//! results and summarizes them.

use crate::error::{ACOError, Result};
use crate::heuristics::aco::{ACOConfig, AntColony};
use crate::instance::TSPInstance;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Seed used for this run
    pub seed: u64,
    /// Best tour length
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Iterations actually performed
    pub iterations: usize,
    /// Best tour, locations joined by '-'
    pub tour: String,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub num_runs: usize,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub mean_cost: f64,
    /// Sample standard deviation, 0 for a single run
    pub std_cost: f64,
    pub mean_time: f64,
    /// Seed of the best run
    pub best_seed: u64,
}

impl RunStatistics {
    /// Summarize runs that found a tour; `None` if there are none
    pub fn from_results(results: &[RunResult]) -> Option<Self> {
        let found: Vec<&RunResult> = results.iter().filter(|r| r.cost.is_finite()).collect();
        if found.is_empty() {
            return None;
        }

        let costs: Vec<f64> = found.iter().map(|r| r.cost).collect();
        let times: Vec<f64> = found.iter().map(|r| r.time).collect();

        let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };
        let best = found
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .map(|r| r.seed)
            .unwrap_or_default();

        Some(RunStatistics {
            num_runs: found.len(),
            best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
            worst_cost: costs.iter().cloned().fold(0.0, f64::max),
            mean_cost: costs.iter().mean(),
            std_cost,
            mean_time: times.iter().mean(),
            best_seed: best,
        })
    }
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs
    pub num_runs: usize,
    /// Run `i` uses seed `base_seed + i`, wrapping past `u64::MAX`
    pub base_seed: u64,
    /// Run the seeds in parallel
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
    /// Colony parameters shared by every run (its `seed` is overridden)
    pub aco: ACOConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            parallel: true,
            show_progress: false,
            aco: ACOConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every seed on `instance` and record the results
    pub fn run(&mut self, instance: &TSPInstance) -> Result<&[RunResult]> {
        if self.config.num_runs == 0 {
            return Err(ACOError::invalid("benchmark needs at least one run"));
        }
        log::info!(
            "Running {} seeds on instance: {}",
            self.config.num_runs,
            instance.name
        );

        let progress = if self.config.show_progress {
            ProgressBar::new(self.config.num_runs as u64)
        } else {
            ProgressBar::hidden()
        };

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|i| self.config.base_seed.wrapping_add(i))
            .collect();
        let single_run = |&seed: &u64| -> Result<RunResult> {
            let config = ACOConfig {
                seed,
                ..self.config.aco.clone()
            };
            let mut colony = AntColony::new(instance.clone(), config)?;
            let solution = colony.run();
            progress.inc(1);

            Ok(RunResult {
                instance: instance.name.clone(),
                dimension: instance.dimension,
                seed,
                cost: solution.cost,
                time: solution.computation_time,
                iterations: solution.iterations.unwrap_or(0),
                tour: format_tour(&solution.tour),
            })
        };

        let runs: Vec<RunResult> = if self.config.parallel {
            seeds.par_iter().map(single_run).collect::<Result<_>>()?
        } else {
            seeds.iter().map(single_run).collect::<Result<_>>()?
        };
        progress.finish_and_clear();

        let start = self.results.len();
        self.results.extend(runs);
        Ok(&self.results[start..])
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn statistics(&self) -> Option<RunStatistics> {
        RunStatistics::from_results(&self.results)
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("         ACO-TSP Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let c = &self.config.aco;
        report.push_str(&format!(
            "Parameters: ants={} iterations={} decay={} alpha={} beta={} Q={}\n\n",
            c.num_ants, c.num_iterations, c.decay, c.alpha, c.beta, c.deposit_factor
        ));

        report.push_str(&format!(
            "{:<8} {:>14} {:>12} {:>10}\n",
            "Seed", "Cost", "Time (s)", "Iters"
        ));
        report.push_str("-".repeat(48).as_str());
        report.push('\n');
        for r in &self.results {
            report.push_str(&format!(
                "{:<8} {:>14.4} {:>12.4} {:>10}\n",
                r.seed, r.cost, r.time, r.iterations
            ));
        }
        report.push_str("-".repeat(48).as_str());
        report.push('\n');

        match self.statistics() {
            Some(stats) => {
                report.push_str(&format!("Runs with a tour: {}\n", stats.num_runs));
                report.push_str(&format!(
                    "Best: {:.4} (seed {})\n",
                    stats.best_cost, stats.best_seed
                ));
                report.push_str(&format!("Worst: {:.4}\n", stats.worst_cost));
                report.push_str(&format!(
                    "Mean: {:.4} +/- {:.4}\n",
                    stats.mean_cost, stats.std_cost
                ));
                report.push_str(&format!("Mean time: {:.4}s\n", stats.mean_time));
            }
            None => report.push_str("No run produced a tour.\n"),
        }

        report
    }
}

fn format_tour(tour: &[usize]) -> String {
    tour.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> TSPInstance {
        TSPInstance::from_coordinates("square", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
            .unwrap()
    }

    fn result(seed: u64, cost: f64) -> RunResult {
        RunResult {
            instance: "t".to_string(),
            dimension: 3,
            seed,
            cost,
            time: 0.5,
            iterations: 10,
            tour: "0-1-2".to_string(),
        }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
    }

    #[test]
    fn test_runs_every_seed() {
        let config = BenchmarkConfig {
            num_runs: 4,
            base_seed: 10,
            aco: ACOConfig {
                num_iterations: 30,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        let results = benchmark.run(&square()).unwrap();

        let seeds: Vec<u64> = results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12, 13]);
        assert!(results.iter().all(|r| r.iterations == 30));

        let stats = benchmark.statistics().unwrap();
        assert_eq!(stats.num_runs, 4);
        assert!((stats.best_cost - 4.0).abs() < 1e-9);
        assert!(benchmark.generate_report().contains("Benchmark Report"));
    }

    #[test]
    fn test_seeds_wrap_at_u64_max() {
        let config = BenchmarkConfig {
            num_runs: 2,
            base_seed: u64::MAX,
            parallel: false,
            aco: ACOConfig {
                num_iterations: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        let results = benchmark.run(&square()).unwrap();

        let seeds: Vec<u64> = results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![u64::MAX, 0]);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let config = BenchmarkConfig {
            num_runs: 0,
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        assert!(matches!(benchmark.run(&square()), Err(ACOError::InvalidInput(_))));
    }

    #[test]
    fn test_statistics_from_results() {
        let results = vec![
            result(0, 3.0),
            result(1, 1.0),
            result(2, 2.0),
            result(3, f64::INFINITY),
        ];
        let stats = RunStatistics::from_results(&results).unwrap();

        assert_eq!(stats.num_runs, 3);
        assert_eq!(stats.best_cost, 1.0);
        assert_eq!(stats.worst_cost, 3.0);
        assert_eq!(stats.best_seed, 1);
        assert!((stats.mean_cost - 2.0).abs() < 1e-12);
        assert!((stats.std_cost - 1.0).abs() < 1e-12);

        let single = RunStatistics::from_results(&[result(0, 5.0)]).unwrap();
        assert_eq!(single.std_cost, 0.0);

        assert!(RunStatistics::from_results(&[result(0, f64::INFINITY)]).is_none());
    }

    #[test]
    fn test_export_to_csv() {
        let config = BenchmarkConfig {
            num_runs: 2,
            parallel: false,
            aco: ACOConfig {
                num_iterations: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        benchmark.run(&square()).unwrap();

        let path = std::env::temp_dir().join(format!("aco_bench_{}.csv", std::process::id()));
        benchmark.export_to_csv(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("instance,dimension,seed,cost"));
    }
}
