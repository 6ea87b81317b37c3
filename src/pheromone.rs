//! Dense pheromone matrix.
//!
//! The only state carried from one iteration to the next. Values stay
//! non-negative and finite as long as the evaporation factor lies in [0, 1)
//! and deposits are finite.

use serde::{Deserialize, Serialize};

/// N×N grid of pheromone levels, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    dimension: usize,
    values: Vec<f64>,
}

impl PheromoneMatrix {
    /// Matrix with every cell set to `level`
    pub fn uniform(dimension: usize, level: f64) -> Self {
        PheromoneMatrix {
            dimension,
            values: vec![level; dimension * dimension],
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.dimension + to]
    }

    /// Outgoing pheromone levels of one location
    #[inline]
    pub fn row(&self, from: usize) -> &[f64] {
        let start = from * self.dimension;
        &self.values[start..start + self.dimension]
    }

    /// Multiply every cell by `1 - decay`
    pub fn evaporate(&mut self, decay: f64) {
        let retain = 1.0 - decay;
        for value in self.values.iter_mut() {
            *value *= retain;
        }
    }

    /// Add `amount` to the directed edge `from -> to`, saturating at `f64::MAX`
    #[inline]
    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        let cell = &mut self.values[from * self.dimension + to];
        *cell = (*cell + amount).min(f64::MAX);
    }

    /// Deposit `amount` on every edge of a closed tour, including the
    /// closing edge back to the first location.
    pub fn deposit_tour(&mut self, tour: &[usize], amount: f64, symmetric: bool) {
        let m = tour.len();
        for i in 0..m {
            let from = tour[i];
            let to = tour[(i + 1) % m];

            self.deposit(from, to, amount);
            if symmetric && from != to {
                self.deposit(to, from, amount);
            }
        }
    }

    /// Every cell is non-negative and finite
    pub fn is_well_formed(&self) -> bool {
        self.values.iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Copy into nested rows, mostly for display and export
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dimension).map(|i| self.row(i).to_vec()).collect()
    }
}
