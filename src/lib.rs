//! ACO-TSP Solver Library
//!
//! Ant Colony Optimization for the Traveling Salesman Problem over a dense
//! distance matrix.
//!
//! # Features
//!
//! - Ant System tour construction guided by a pheromone matrix
//! - Evaporation + deposition pheromone update, once per iteration
//! - Seeded, reproducible runs (sequential or rayon-parallel construction)
//! - Instance loading from CSV, JSON and TSP-LIB files
//! - Multi-seed benchmarking with CSV export
//!
//! # Example
//!
//! ```no_run
//! use aco_tsp_solver::instance::TSPInstance;
//! use aco_tsp_solver::heuristics::aco::{ACOConfig, AntColony};
//!
//! let instance = TSPInstance::from_file("instance.csv").unwrap();
//! let config = ACOConfig {
//!     num_ants: 10,
//!     num_iterations: 50,
//!     decay: 0.5,
//!     beta: 2.0,
//!     ..Default::default()
//! };
//!
//! let mut colony = AntColony::new(instance, config).unwrap();
//! let solution = colony.run();
//!
//! println!("Best tour {:?} with length {:.2}", solution.tour, solution.cost);
//! ```

pub mod error;
pub mod instance;
pub mod pheromone;
pub mod solution;
pub mod heuristics;
pub mod benchmark;

pub use error::{ACOError, Result};
pub use heuristics::aco::{ACOConfig, AntColony, StartStrategy};
pub use instance::TSPInstance;
pub use solution::Solution;
