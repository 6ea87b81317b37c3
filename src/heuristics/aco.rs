//! Ant Colony Optimization for the TSP.
//!
//! This module implements the Ant System: every iteration, each ant builds a
//! full tour by sampling transitions proportionally to
//! `pheromone^alpha * (1 / distance)^beta`, then the pheromone matrix is
//! evaporated and reinforced by every tour of that iteration. Scores are
//! handled as logarithms so extreme exponents stay comparable.

use crate::error::{ACOError, Result};
use crate::instance::TSPInstance;
use crate::pheromone::PheromoneMatrix;
use crate::solution::Solution;
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Added to distances before inverting them in the transition heuristic
pub const DISTANCE_EPSILON: f64 = 1e-10;

/// Lower bound on a tour length when computing its deposit
pub const DEPOSIT_EPSILON: f64 = 1e-10;

/// `exponent * ln(value)`, with a zero exponent giving weight 1 (log 0)
/// whatever the value
fn log_weight(value: f64, exponent: f64) -> f64 {
    if exponent == 0.0 {
        0.0
    } else {
        exponent * value.ln()
    }
}

/// Where each ant begins its tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartStrategy {
    /// Every ant starts at the same location
    Fixed(usize),
    /// Each ant draws its start uniformly at random
    Random,
    /// Ant `k` starts at location `k mod N`
    RoundRobin,
}

impl Default for StartStrategy {
    fn default() -> Self {
        StartStrategy::Fixed(0)
    }
}

/// ACO configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ACOConfig {
    /// Number of ants (tours built per iteration)
    pub num_ants: usize,
    /// Number of iterations
    pub num_iterations: usize,
    /// Fraction of pheromone evaporated per iteration, in (0, 1]
    pub decay: f64,
    /// Pheromone importance (alpha)
    pub alpha: f64,
    /// Heuristic importance (beta)
    pub beta: f64,
    /// Pheromone deposit factor (Q): each tour deposits `Q / length` per edge
    pub deposit_factor: f64,
    /// Initial pheromone level, `1/N` when unset
    pub initial_pheromone: Option<f64>,
    /// Also reinforce the reverse direction of every tour edge
    pub symmetric_deposit: bool,
    /// Start location of each ant
    pub start: StartStrategy,
    /// Build the tours of an iteration on the rayon thread pool
    pub parallel: bool,
    /// Random seed
    pub seed: u64,
    /// Wall-clock budget in seconds, checked between iterations
    pub time_limit: Option<f64>,
}

impl Default for ACOConfig {
    fn default() -> Self {
        ACOConfig {
            num_ants: 10,
            num_iterations: 100,
            decay: 0.1,
            alpha: 1.0,
            beta: 1.0,
            deposit_factor: 1.0,
            initial_pheromone: None,
            symmetric_deposit: false,
            start: StartStrategy::Fixed(0),
            parallel: false,
            seed: 42,
            time_limit: None,
        }
    }
}

impl ACOConfig {
    /// Check hyperparameters against an instance of `dimension` locations
    pub fn validate(&self, dimension: usize) -> Result<()> {
        if self.num_ants == 0 {
            return Err(ACOError::invalid("num_ants must be positive"));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ACOError::invalid(format!(
                "decay must lie in (0, 1], got {}",
                self.decay
            )));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(ACOError::invalid(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(ACOError::invalid(format!(
                "beta must be finite and >= 0, got {}",
                self.beta
            )));
        }
        if !(self.deposit_factor.is_finite() && self.deposit_factor > 0.0) {
            return Err(ACOError::invalid(format!(
                "deposit_factor must be finite and > 0, got {}",
                self.deposit_factor
            )));
        }
        if let Some(tau0) = self.initial_pheromone {
            if !(tau0.is_finite() && tau0 > 0.0) {
                return Err(ACOError::invalid(format!(
                    "initial_pheromone must be finite and > 0, got {}",
                    tau0
                )));
            }
        }
        if let StartStrategy::Fixed(start) = self.start {
            if start >= dimension {
                return Err(ACOError::invalid(format!(
                    "start location {} is out of range for {} locations",
                    start, dimension
                )));
            }
        }
        if let Some(limit) = self.time_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(ACOError::invalid(format!(
                    "time_limit must be finite and > 0, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// One ant's closed tour and its length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntTour {
    pub path: Vec<usize>,
    pub distance: f64,
}

/// Outcome of a single iteration
#[derive(Debug, Clone)]
pub struct IterationSummary {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Every tour built during the iteration, in ant order
    pub tours: Vec<AntTour>,
    /// Index into `tours` of the shortest one
    pub best_index: usize,
    pub best_distance: f64,
    pub mean_distance: f64,
    /// The iteration best replaced the best-so-far record
    pub improved: bool,
}

impl IterationSummary {
    pub fn best_tour(&self) -> &AntTour {
        &self.tours[self.best_index]
    }
}

/// Ant Colony Optimization solver
pub struct AntColony {
    config: ACOConfig,
    instance: TSPInstance,
    pheromone: PheromoneMatrix,
    /// `beta * ln(1 / (d + eps))`, fixed for the whole run
    log_heuristic: Vec<Vec<f64>>,
    best_tour: Vec<usize>,
    best_cost: f64,
    iteration: usize,
    rng: ChaCha8Rng,
}

impl AntColony {
    /// Validate the configuration and set every pheromone cell to its
    /// initial level.
    pub fn new(instance: TSPInstance, config: ACOConfig) -> Result<Self> {
        let n = instance.dimension;
        config.validate(n)?;

        let tau0 = config.initial_pheromone.unwrap_or(1.0 / n as f64);
        let pheromone = PheromoneMatrix::uniform(n, tau0);

        // Kept in log space so tiny distances with a large beta stay ordered
        let mut log_heuristic = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                let eta = 1.0 / (instance.distance(i, j) + DISTANCE_EPSILON);
                log_heuristic[i][j] = log_weight(eta, config.beta);
            }
        }

        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(AntColony {
            config,
            instance,
            pheromone,
            log_heuristic,
            best_tour: Vec::new(),
            best_cost: f64::INFINITY,
            iteration: 0,
            rng,
        })
    }

    pub fn config(&self) -> &ACOConfig {
        &self.config
    }

    pub fn instance(&self) -> &TSPInstance {
        &self.instance
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    /// Iterations completed so far
    pub fn iterations_done(&self) -> usize {
        self.iteration
    }

    /// Best-so-far tour and its length, `None` before the first iteration
    pub fn best(&self) -> Option<(&[usize], f64)> {
        if self.best_tour.is_empty() {
            None
        } else {
            Some((&self.best_tour, self.best_cost))
        }
    }

    /// Build one tour from `start`, reading the current pheromone levels only.
    pub fn construct_tour<R: Rng>(&self, start: usize, rng: &mut R) -> Vec<usize> {
        let n = self.instance.dimension;
        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(n);

        tour.push(start);
        visited[start] = true;
        let mut current = start;

        while tour.len() < n {
            let next = self.select_next_node(current, &visited, &mut candidates, rng);
            tour.push(next);
            visited[next] = true;
            current = next;
        }

        tour
    }

    /// Sample the next location by roulette wheel over unvisited candidates.
    ///
    /// Scores are computed in log space and shifted by the row maximum, so
    /// the best candidate always weighs 1. Falls back to a uniform draw when
    /// no candidate carries any mass (every pheromone level is zero).
    fn select_next_node<R: Rng>(
        &self,
        current: usize,
        visited: &[bool],
        candidates: &mut Vec<(usize, f64)>,
        rng: &mut R,
    ) -> usize {
        candidates.clear();

        let tau_row = self.pheromone.row(current);
        let log_eta_row = &self.log_heuristic[current];
        let mut max_log = f64::NEG_INFINITY;
        for (j, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let log_score = log_weight(tau_row[j], self.config.alpha) + log_eta_row[j];
            max_log = max_log.max(log_score);
            candidates.push((j, log_score));
        }

        let mut total = 0.0;
        if max_log.is_finite() {
            for candidate in candidates.iter_mut() {
                candidate.1 = (candidate.1 - max_log).exp();
                total += candidate.1;
            }
        }

        if !(total.is_finite() && total > 0.0) {
            log::trace!(
                "degenerate transition from {} (score mass {}), choosing uniformly among {} candidates",
                current,
                total,
                candidates.len()
            );
            return candidates
                .choose(rng)
                .map(|&(j, _)| j)
                .unwrap_or(current);
        }

        let mut pick = rng.gen::<f64>() * total;
        let mut last_positive = None;

        for &(j, score) in candidates.iter() {
            if score <= 0.0 {
                continue;
            }
            last_positive = Some(j);
            pick -= score;
            if pick <= 0.0 {
                return j;
            }
        }

        // Rounding can leave a sliver of `pick` after the last candidate
        last_positive.unwrap_or(current)
    }

    /// Distance Evaluation: closed-cycle length of a tour
    pub fn tour_distance(&self, tour: &[usize]) -> f64 {
        self.instance.tour_length(tour)
    }

    fn start_for(&self, ant: usize, rng: &mut ChaCha8Rng) -> usize {
        match self.config.start {
            StartStrategy::Fixed(start) => start,
            StartStrategy::Random => rng.gen_range(0..self.instance.dimension),
            StartStrategy::RoundRobin => ant % self.instance.dimension,
        }
    }

    /// Build and score every ant's tour against the same pheromone snapshot.
    ///
    /// Starts and per-ant seeds are drawn sequentially from the colony RNG
    /// first, so the result does not depend on `parallel`.
    pub fn construct_tours(&mut self) -> Vec<AntTour> {
        let mut rng = self.rng.clone();
        let plans: Vec<(usize, u64)> = (0..self.config.num_ants)
            .map(|ant| {
                let start = self.start_for(ant, &mut rng);
                (start, rng.gen::<u64>())
            })
            .collect();
        self.rng = rng;

        let colony = &*self;
        let build = |&(start, seed): &(usize, u64)| {
            let mut ant_rng = ChaCha8Rng::seed_from_u64(seed);
            let path = colony.construct_tour(start, &mut ant_rng);
            let distance = colony.tour_distance(&path);
            AntTour { path, distance }
        };

        if self.config.parallel {
            plans.par_iter().map(build).collect()
        } else {
            plans.iter().map(build).collect()
        }
    }

    /// Evaporate, then let every tour deposit `Q / length` on its edges.
    pub fn update_pheromone(&mut self, tours: &[AntTour]) {
        self.pheromone.evaporate(self.config.decay);

        for tour in tours {
            if tour.path.is_empty() {
                continue;
            }
            let length = if tour.distance > DEPOSIT_EPSILON {
                tour.distance
            } else {
                log::debug!(
                    "tour length {} too small to invert, clamping to {}",
                    tour.distance,
                    DEPOSIT_EPSILON
                );
                DEPOSIT_EPSILON
            };
            let delta = (self.config.deposit_factor / length).min(f64::MAX);
            self.pheromone
                .deposit_tour(&tour.path, delta, self.config.symmetric_deposit);
        }
    }

    /// Run one full iteration: construct all tours, update the pheromone
    /// once, then record the best-so-far tour.
    pub fn step(&mut self) -> IterationSummary {
        let tours = self.construct_tours();
        self.update_pheromone(&tours);

        let best_index = tours
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| OrderedFloat(t.distance))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let best_distance = tours[best_index].distance;
        let mean_distance = tours.iter().map(|t| t.distance).sum::<f64>() / tours.len() as f64;

        let improved = self.best_tour.is_empty() || best_distance < self.best_cost;
        if improved {
            log::debug!(
                "iteration {}: new best {:.6} (was {:.6})",
                self.iteration,
                best_distance,
                self.best_cost
            );
            self.best_cost = best_distance;
            self.best_tour = tours[best_index].path.clone();
        }

        let summary = IterationSummary {
            iteration: self.iteration,
            tours,
            best_index,
            best_distance,
            mean_distance,
            improved,
        };
        self.iteration += 1;
        summary
    }

    /// Run ACO algorithm for the configured number of iterations
    pub fn run(&mut self) -> Solution {
        let start = Instant::now();
        let mut convergence = Vec::with_capacity(self.config.num_iterations);

        log::info!(
            "ACO on '{}' (n={}): {} ants, {} iterations, decay={}, alpha={}, beta={}",
            self.instance.name,
            self.instance.dimension,
            self.config.num_ants,
            self.config.num_iterations,
            self.config.decay,
            self.config.alpha,
            self.config.beta
        );

        let mut completed = 0;
        while completed < self.config.num_iterations {
            if let Some(limit) = self.config.time_limit {
                if start.elapsed().as_secs_f64() >= limit {
                    log::info!("time limit of {}s reached after {} iterations", limit, completed);
                    break;
                }
            }

            self.step();
            convergence.push(self.best_cost);
            completed += 1;
        }

        let mut solution = if self.best_tour.is_empty() {
            let mut solution = Solution::new();
            solution.algorithm = "ACO".to_string();
            solution
        } else {
            Solution::from_tour(&self.instance, self.best_tour.clone(), "ACO")
        };
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(completed);
        solution.convergence = convergence;

        log::info!(
            "ACO finished in {:.3}s: best distance {:.6}",
            solution.computation_time,
            solution.cost
        );

        solution
    }

    /// Get best solution found
    pub fn best_solution(&self) -> Solution {
        if self.best_tour.is_empty() {
            return Solution::new();
        }
        Solution::from_tour(&self.instance, self.best_tour.clone(), "ACO")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::is_permutation;

    fn square_instance() -> TSPInstance {
        let d = 2f64.sqrt();
        TSPInstance::new(
            "square",
            vec![
                vec![0.0, 1.0, d, 1.0],
                vec![1.0, 0.0, 1.0, d],
                vec![d, 1.0, 0.0, 1.0],
                vec![1.0, d, 1.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn ring_instance(n: usize) -> TSPInstance {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (10.0 * angle.cos(), 10.0 * angle.sin())
            })
            .collect();
        TSPInstance::from_coordinates("ring", &coords).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad_configs = vec![
            ACOConfig { num_ants: 0, ..Default::default() },
            ACOConfig { decay: 0.0, ..Default::default() },
            ACOConfig { decay: 1.5, ..Default::default() },
            ACOConfig { decay: f64::NAN, ..Default::default() },
            ACOConfig { alpha: -1.0, ..Default::default() },
            ACOConfig { beta: f64::NAN, ..Default::default() },
            ACOConfig { deposit_factor: 0.0, ..Default::default() },
            ACOConfig { initial_pheromone: Some(-0.5), ..Default::default() },
            ACOConfig { start: StartStrategy::Fixed(4), ..Default::default() },
            ACOConfig { time_limit: Some(0.0), ..Default::default() },
        ];

        for config in bad_configs {
            let result = AntColony::new(square_instance(), config.clone());
            assert!(
                matches!(result, Err(ACOError::InvalidInput(_))),
                "accepted {:?}",
                config
            );
        }

        let full_decay = ACOConfig { decay: 1.0, ..Default::default() };
        assert!(AntColony::new(square_instance(), full_decay).is_ok());
    }

    #[test]
    fn test_initial_pheromone_is_one_over_n() {
        let colony = AntColony::new(ring_instance(5), ACOConfig::default()).unwrap();
        assert_eq!(colony.pheromone().dimension(), 5);
        assert_eq!(colony.pheromone().min(), 0.2);
        assert_eq!(colony.pheromone().max(), 0.2);
    }

    #[test]
    fn test_tours_are_permutations() {
        let strategies = [
            StartStrategy::Fixed(0),
            StartStrategy::Fixed(1),
            StartStrategy::Random,
            StartStrategy::RoundRobin,
        ];

        for n in 2..=9 {
            for &start in &strategies {
                let config = ACOConfig {
                    num_ants: 7,
                    start,
                    seed: n as u64,
                    ..Default::default()
                };
                let mut colony = AntColony::new(ring_instance(n), config).unwrap();
                for _ in 0..5 {
                    let summary = colony.step();
                    assert_eq!(summary.tours.len(), 7);
                    for tour in &summary.tours {
                        assert!(is_permutation(&tour.path, n), "bad tour {:?}", tour.path);
                    }
                }
            }
        }
    }

    #[test]
    fn test_start_strategies() {
        let n = 5;
        let fixed = ACOConfig { num_ants: 6, start: StartStrategy::Fixed(3), ..Default::default() };
        let mut colony = AntColony::new(ring_instance(n), fixed).unwrap();
        assert!(colony.construct_tours().iter().all(|t| t.path[0] == 3));

        let round_robin = ACOConfig { num_ants: 6, start: StartStrategy::RoundRobin, ..Default::default() };
        let mut colony = AntColony::new(ring_instance(n), round_robin).unwrap();
        let starts: Vec<usize> = colony.construct_tours().iter().map(|t| t.path[0]).collect();
        assert_eq!(starts, vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_zero_iterations_finds_nothing() {
        let config = ACOConfig { num_iterations: 0, ..Default::default() };
        let mut colony = AntColony::new(square_instance(), config).unwrap();
        let solution = colony.run();

        assert!(!solution.is_found());
        assert_eq!(solution.cost, f64::INFINITY);
        assert_eq!(solution.iterations, Some(0));
        assert!(colony.best().is_none());
    }

    #[test]
    fn test_square_converges_to_perimeter() {
        let config = ACOConfig {
            num_ants: 10,
            num_iterations: 50,
            decay: 0.5,
            alpha: 1.0,
            beta: 2.0,
            ..Default::default()
        };
        let mut colony = AntColony::new(square_instance(), config).unwrap();
        let solution = colony.run();

        assert!((solution.cost - 4.0).abs() < 1e-9);
        let canonical = solution.canonical_tour();
        assert!(
            canonical == vec![0, 1, 2, 3] || canonical == vec![0, 3, 2, 1],
            "unexpected tour {:?}",
            solution.tour
        );
        assert_eq!(solution.iterations, Some(50));
    }

    #[test]
    fn test_single_location() {
        let instance = TSPInstance::new("one", vec![vec![0.0]]).unwrap();
        let config = ACOConfig { num_ants: 3, num_iterations: 20, ..Default::default() };
        let mut colony = AntColony::new(instance, config).unwrap();
        let solution = colony.run();

        assert_eq!(solution.tour, vec![0]);
        assert_eq!(solution.cost, 0.0);
        assert!(colony.pheromone().is_well_formed());
    }

    #[test]
    fn test_zero_distance_edge_stays_finite() {
        let instance = TSPInstance::new(
            "twins",
            vec![
                vec![0.0, 0.0, 3.0, 4.0],
                vec![0.0, 0.0, 3.0, 4.0],
                vec![3.0, 3.0, 0.0, 5.0],
                vec![4.0, 4.0, 5.0, 0.0],
            ],
        )
        .unwrap();
        let config = ACOConfig { num_iterations: 40, beta: 2.0, ..Default::default() };
        let mut colony = AntColony::new(instance.clone(), config).unwrap();
        let solution = colony.run();

        assert!(solution.is_complete(&instance));
        assert!(colony.pheromone().is_well_formed());
        assert!(colony.pheromone().get(0, 1).is_finite());
    }

    #[test]
    fn test_all_zero_distances_clamp_deposit() {
        let instance = TSPInstance::new("flat", vec![vec![0.0; 4]; 4]).unwrap();
        let config = ACOConfig { num_iterations: 100, ..Default::default() };
        let mut colony = AntColony::new(instance.clone(), config).unwrap();
        let solution = colony.run();

        assert_eq!(solution.cost, 0.0);
        assert!(solution.is_complete(&instance));
        assert!(colony.pheromone().is_well_formed());
    }

    #[test]
    fn test_huge_deposit_factor_saturates() {
        let instance = TSPInstance::new("flat", vec![vec![0.0; 3]; 3]).unwrap();
        let config = ACOConfig {
            num_iterations: 5,
            deposit_factor: 1e300,
            ..Default::default()
        };
        let mut colony = AntColony::new(instance, config).unwrap();
        let solution = colony.run();

        assert_eq!(solution.cost, 0.0);
        assert!(colony.pheromone().is_well_formed());
        assert_eq!(colony.pheromone().max(), f64::MAX);
    }

    #[test]
    fn test_max_initial_pheromone_stays_finite() {
        let config = ACOConfig {
            num_iterations: 5,
            decay: 0.01,
            initial_pheromone: Some(f64::MAX),
            symmetric_deposit: true,
            ..Default::default()
        };
        let mut colony = AntColony::new(ring_instance(5), config).unwrap();
        let solution = colony.run();

        assert!(solution.is_complete(colony.instance()));
        assert!(colony.pheromone().is_well_formed());
    }

    #[test]
    fn test_tiny_distances_keep_their_order() {
        // Both candidates from 0 sit within 1e-9, so (1/d)^40 overflows for each
        let instance = TSPInstance::new(
            "close",
            vec![
                vec![0.0, 0.0, 1e-9],
                vec![0.0, 0.0, 1.0],
                vec![1e-9, 1.0, 0.0],
            ],
        )
        .unwrap();
        let config = ACOConfig { beta: 40.0, ..Default::default() };
        let colony = AntColony::new(instance, config).unwrap();
        assert_eq!(colony.config().beta, 40.0);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let path = colony.construct_tour(0, &mut rng);
            assert_eq!(path, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_zero_pheromone_row_falls_back_to_uniform() {
        let config = ACOConfig { decay: 1.0, ..Default::default() };
        let mut colony = AntColony::new(ring_instance(4), config).unwrap();
        // Full decay leaves pheromone on 0 <-> 1 only
        colony.update_pheromone(&[AntTour { path: vec![0, 1], distance: 1.0 }]);
        assert_eq!(colony.pheromone().get(1, 2), 0.0);
        assert_eq!(colony.pheromone().get(1, 3), 0.0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut endings = std::collections::HashSet::new();
        for _ in 0..50 {
            let path = colony.construct_tour(0, &mut rng);
            assert!(is_permutation(&path, 4), "bad tour {:?}", path);
            assert_eq!(path[1], 1);
            endings.insert(path[2]);
        }
        assert_eq!(endings.len(), 2);
    }

    #[test]
    fn test_extreme_exponents_keep_tours_valid() {
        let mut distances = vec![vec![1000.0; 6]; 6];
        for (i, row) in distances.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        let instance = TSPInstance::new("far", distances).unwrap();
        let config = ACOConfig {
            alpha: 300.0,
            beta: 300.0,
            num_iterations: 10,
            ..Default::default()
        };
        let mut colony = AntColony::new(instance, config).unwrap();

        for _ in 0..10 {
            let summary = colony.step();
            for tour in &summary.tours {
                assert!(is_permutation(&tour.path, 6));
            }
        }
        assert!(colony.pheromone().is_well_formed());
    }

    #[test]
    fn test_update_evaporates_then_deposits() {
        let instance = ring_instance(3);
        let config = ACOConfig { decay: 0.5, ..Default::default() };
        let mut colony = AntColony::new(instance, config).unwrap();
        let tau0 = 1.0 / 3.0;

        colony.update_pheromone(&[AntTour { path: vec![0, 1, 2], distance: 4.0 }]);

        let p = colony.pheromone();
        assert!((p.get(0, 1) - (tau0 * 0.5 + 0.25)).abs() < 1e-12);
        assert!((p.get(1, 2) - (tau0 * 0.5 + 0.25)).abs() < 1e-12);
        assert!((p.get(2, 0) - (tau0 * 0.5 + 0.25)).abs() < 1e-12);
        assert!((p.get(1, 0) - tau0 * 0.5).abs() < 1e-12);
        assert!((p.get(0, 0) - tau0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_deposit() {
        let config = ACOConfig {
            decay: 1.0,
            deposit_factor: 2.0,
            symmetric_deposit: true,
            ..Default::default()
        };
        let mut colony = AntColony::new(ring_instance(3), config).unwrap();

        colony.update_pheromone(&[AntTour { path: vec![0, 2, 1], distance: 8.0 }]);

        let p = colony.pheromone();
        assert_eq!(p.get(0, 2), 0.25);
        assert_eq!(p.get(2, 0), 0.25);
        assert_eq!(p.get(1, 0), 0.25);
        assert_eq!(p.get(0, 0), 0.0);
    }

    #[test]
    fn test_same_seed_same_tours() {
        let config = ACOConfig { num_ants: 8, seed: 7, start: StartStrategy::Random, ..Default::default() };
        let mut a = AntColony::new(ring_instance(8), config.clone()).unwrap();
        let mut b = AntColony::new(ring_instance(8), config).unwrap();

        for _ in 0..25 {
            let sa = a.step();
            let sb = b.step();
            assert_eq!(sa.tours, sb.tours);
            assert_eq!(sa.best_tour(), sb.best_tour());
            assert_eq!(sa.best_tour().distance, sa.best_distance);
        }
        assert_eq!(a.pheromone(), b.pheromone());
        assert_eq!(a.best_solution().tour, b.best_solution().tour);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = ACOConfig { num_ants: 12, num_iterations: 30, seed: 3, ..Default::default() };
        let parallel = ACOConfig { parallel: true, ..sequential.clone() };

        let s = AntColony::new(ring_instance(10), sequential).unwrap().run();
        let p = AntColony::new(ring_instance(10), parallel).unwrap().run();

        assert_eq!(s.tour, p.tour);
        assert_eq!(s.cost, p.cost);
        assert_eq!(s.convergence, p.convergence);
    }

    #[test]
    fn test_convergence_is_non_increasing() {
        let config = ACOConfig { num_iterations: 40, ..Default::default() };
        let mut colony = AntColony::new(ring_instance(9), config).unwrap();
        let solution = colony.run();

        assert_eq!(solution.convergence.len(), 40);
        assert!(solution.convergence.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*solution.convergence.last().unwrap(), solution.cost);
    }

    #[test]
    fn test_pheromone_stays_well_formed() {
        let config = ACOConfig {
            num_iterations: 200,
            decay: 0.05,
            alpha: 2.0,
            beta: 5.0,
            symmetric_deposit: true,
            ..Default::default()
        };
        let mut colony = AntColony::new(ring_instance(12), config).unwrap();
        colony.run();
        assert!(colony.pheromone().is_well_formed());
    }

    #[test]
    fn test_time_limit_stops_between_iterations() {
        let config = ACOConfig {
            num_iterations: 10_000_000,
            time_limit: Some(0.05),
            ..Default::default()
        };
        let mut colony = AntColony::new(ring_instance(6), config).unwrap();
        let solution = colony.run();

        let done = solution.iterations.unwrap();
        assert!(done < 10_000_000);
        assert_eq!(done, colony.iterations_done());
    }
}
