//! Module for loading and representing TSP instances.
//!
//! An instance is a square matrix of non-negative travel costs between N
//! locations. It can be built directly from a matrix, from 2D coordinates
//! (Euclidean distances), or loaded from CSV, JSON and TSP-LIB files.

use crate::error::{ACOError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A validated TSP instance over a dense distance matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TSPInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of locations
    pub dimension: usize,
    distance_matrix: Vec<Vec<f64>>,
}

/// On-disk JSON layout: either a bare matrix or a named object
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInstance {
    Named {
        #[serde(default)]
        name: String,
        #[serde(default)]
        comment: String,
        distances: Vec<Vec<f64>>,
    },
    Bare(Vec<Vec<f64>>),
}

impl TSPInstance {
    /// Build an instance from a distance matrix.
    ///
    /// Fails with `InvalidInput` if the matrix is empty, not square, or has
    /// negative / NaN entries or infinite off-diagonal entries.
    pub fn new(name: impl Into<String>, distances: Vec<Vec<f64>>) -> Result<Self> {
        Self::validate_matrix(&distances)?;

        Ok(TSPInstance {
            name: name.into(),
            comment: String::new(),
            dimension: distances.len(),
            distance_matrix: distances,
        })
    }

    fn validate_matrix(distances: &[Vec<f64>]) -> Result<()> {
        let n = distances.len();
        if n == 0 {
            return Err(ACOError::invalid("distance matrix is empty"));
        }

        for (i, row) in distances.iter().enumerate() {
            if row.len() != n {
                return Err(ACOError::invalid(format!(
                    "distance matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if d.is_nan() || d < 0.0 {
                    return Err(ACOError::invalid(format!(
                        "distance[{}][{}] = {} is not a non-negative number",
                        i, j, d
                    )));
                }
                if i != j && !d.is_finite() {
                    return Err(ACOError::invalid(format!(
                        "distance[{}][{}] is infinite",
                        i, j
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build a Euclidean instance from 2D coordinates
    pub fn from_coordinates(name: impl Into<String>, coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(name, Self::compute_distance_matrix(coords))
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(coords: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let n = coords.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = coords[i].0 - coords[j].0;
                    let dy = coords[i].1 - coords[j].1;
                    matrix[i][j] = (dx * dx + dy * dy).sqrt();
                }
            }
        }

        matrix
    }

    /// Load an instance, picking the format from the file extension
    /// (`.csv`, `.json`, `.tsp`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let mut instance = match ext.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?)?,
            "json" => Self::from_json_reader(File::open(path)?)?,
            "tsp" => Self::from_tsplib_reader(BufReader::new(File::open(path)?))?,
            other => {
                return Err(ACOError::Parse(format!(
                    "unsupported instance extension '{}' (expected csv, json or tsp)",
                    other
                )))
            }
        };

        if instance.name.is_empty() {
            instance.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
        }

        Ok(instance)
    }

    /// Parse a headerless CSV matrix, one row per line
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut distances = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .filter(|field| !field.is_empty())
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        ACOError::Parse(format!("row {}: invalid distance '{}'", line + 1, field))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            if !row.is_empty() {
                distances.push(row);
            }
        }

        Self::new(String::new(), distances)
    }

    /// Parse a JSON matrix, either `[[...]]` or `{"name": .., "distances": [[...]]}`
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let parsed: JsonInstance = serde_json::from_reader(reader)?;
        match parsed {
            JsonInstance::Named {
                name,
                comment,
                distances,
            } => {
                let mut instance = Self::new(name, distances)?;
                instance.comment = comment;
                Ok(instance)
            }
            JsonInstance::Bare(distances) => Self::new(String::new(), distances),
        }
    }

    /// Parse a TSP-LIB file with EUC_2D node coordinates
    pub fn from_tsplib_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut coords: Vec<(f64, f64)> = Vec::new();
        let mut in_coords = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 3 {
                    let x: f64 = parts[1]
                        .parse()
                        .map_err(|_| ACOError::Parse(format!("invalid x coordinate '{}'", parts[1])))?;
                    let y: f64 = parts[2]
                        .parse()
                        .map_err(|_| ACOError::Parse(format!("invalid y coordinate '{}'", parts[2])))?;
                    coords.push((x, y));
                    continue;
                }
                // Any other section header ends the coordinate block
                in_coords = false;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "NAME" => name = value.to_string(),
                "COMMENT" => comment = value.to_string(),
                "DIMENSION" => {
                    dimension = Some(
                        value
                            .parse()
                            .map_err(|_| ACOError::Parse(format!("invalid dimension '{}'", value)))?,
                    );
                }
                "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                    return Err(ACOError::Parse(format!(
                        "unsupported EDGE_WEIGHT_TYPE '{}' (only EUC_2D)",
                        value
                    )));
                }
                _ => {}
            }
        }

        if let Some(dim) = dimension {
            if dim != coords.len() {
                return Err(ACOError::Parse(format!(
                    "DIMENSION is {} but {} coordinates were read",
                    dim,
                    coords.len()
                )));
            }
        }

        let mut instance = Self::from_coordinates(name, &coords)?;
        instance.comment = comment;
        Ok(instance)
    }

    /// Get the distance between two locations
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Full distance matrix
    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distance_matrix
    }

    /// Calculate total closed-tour length, including the edge back to the start.
    ///
    /// A single-location tour costs its self-loop distance.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        if tour.is_empty() {
            return 0.0;
        }

        let mut length: f64 = tour
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum();

        length += self.distance(tour[tour.len() - 1], tour[0]);

        length
    }

    /// Whether `distance[i][j] == distance[j][i]` for every pair
    pub fn is_symmetric(&self) -> bool {
        let n = self.dimension;
        (0..n).all(|i| (i + 1..n).all(|j| (self.distance(i, j) - self.distance(j, i)).abs() < 1e-9))
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension;
        let mut distances: Vec<f64> = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    distances.push(self.distance(i, j));
                }
            }
        }

        let (min_distance, avg_distance, max_distance) = if distances.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                distances.iter().cloned().fold(f64::INFINITY, f64::min),
                distances.iter().sum::<f64>() / distances.len() as f64,
                distances.iter().cloned().fold(0.0, f64::max),
            )
        };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            symmetric: self.is_symmetric(),
            min_distance,
            avg_distance,
            max_distance,
            zero_edges: distances.iter().filter(|&&d| d == 0.0).count(),
        }
    }
}

/// Statistics about a TSP instance (off-diagonal entries only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub symmetric: bool,
    pub min_distance: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    /// Directed off-diagonal entries equal to zero
    pub zero_edges: usize,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Locations: {}", self.dimension)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Zero-length edges: {}", self.zero_edges)
    }
}
