//! Solution representation for the TSP.
//!
//! A tour is a permutation of the location indices, read as a closed cycle.

use crate::instance::TSPInstance;
use serde::{Deserialize, Serialize};

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of location indices (implicitly closed)
    pub tour: Vec<usize>,
    /// Total closed-tour length
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Best-so-far cost after each iteration
    #[serde(default)]
    pub convergence: Vec<f64>,
}

impl Solution {
    /// Create a new empty solution ("no tour found")
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            cost: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
            convergence: Vec::new(),
        }
    }

    /// Create a solution from a tour
    pub fn from_tour(instance: &TSPInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.tour_length(&tour);

        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            ..Solution::new()
        }
    }

    /// Whether any tour was recorded
    pub fn is_found(&self) -> bool {
        !self.tour.is_empty()
    }

    /// Check if all locations are visited exactly once
    pub fn is_complete(&self, instance: &TSPInstance) -> bool {
        is_permutation(&self.tour, instance.dimension)
    }

    /// Tour rotated so that it begins at location 0, for stable comparison
    pub fn canonical_tour(&self) -> Vec<usize> {
        canonical_rotation(&self.tour)
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        if self.is_found() {
            writeln!(f, "  Cost: {:.4}", self.cost)?;
        } else {
            writeln!(f, "  Cost: no tour found")?;
        }
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

/// `tour` holds each index of `0..n` exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }

    let mut seen = vec![false; n];
    for &node in tour {
        if node >= n || seen[node] {
            return false;
        }
        seen[node] = true;
    }
    true
}

/// Rotate a cycle so that location 0 comes first
pub fn canonical_rotation(tour: &[usize]) -> Vec<usize> {
    let mut rotated = tour.to_vec();
    if let Some(pos) = tour.iter().position(|&n| n == 0) {
        rotated.rotate_left(pos);
    }
    rotated
}
