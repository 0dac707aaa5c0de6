//! Blended similarity over three precomputed matrices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{
    RankingConfig, DEFAULT_FACILITY_WEIGHT, DEFAULT_LOCATION_WEIGHT, DEFAULT_PRICE_WEIGHT,
};
use crate::error::{HearthError, Result};
use crate::types::PropertyName;

/// A square similarity matrix, row-major, one row per property.
pub type SimilarityMatrix = Vec<Vec<f64>>;

/// Weights applied to each similarity signal in the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub facility: f64,
    pub price: f64,
    pub location: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            facility: DEFAULT_FACILITY_WEIGHT,
            price: DEFAULT_PRICE_WEIGHT,
            location: DEFAULT_LOCATION_WEIGHT,
        }
    }
}

impl From<&RankingConfig> for BlendWeights {
    fn from(config: &RankingConfig) -> Self {
        Self {
            facility: config.facility_weight,
            price: config.price_weight,
            location: config.location_weight,
        }
    }
}

/// The three source matrices, all indexed by the same property order.
#[derive(Debug, Clone)]
pub struct SimilaritySignals {
    pub facility: SimilarityMatrix,
    pub price: SimilarityMatrix,
    pub location: SimilarityMatrix,
}

/// Combined similarity over a fixed, ordered set of properties.
///
/// The weighted sum is computed once at construction; lookups are O(1).
#[derive(Debug, Clone)]
pub struct SimilarityStore {
    names: Vec<PropertyName>,
    lookup: HashMap<PropertyName, usize>,
    /// n * n, row-major.
    combined: Vec<f64>,
    weights: BlendWeights,
}

impl SimilarityStore {
    /// # Errors
    /// `HearthError::Integrity` when the matrices are not all `n x n` for
    /// `n = names.len()`, when a name repeats, or when a cell is not finite.
    pub fn new(
        names: Vec<PropertyName>,
        signals: SimilaritySignals,
        weights: BlendWeights,
    ) -> Result<Self> {
        let n = names.len();
        for (label, matrix) in [
            ("facility", &signals.facility),
            ("price", &signals.price),
            ("location", &signals.location),
        ] {
            check_square(label, matrix, n)?;
        }

        let mut lookup = HashMap::with_capacity(n);
        for (i, name) in names.iter().enumerate() {
            if lookup.insert(name.clone(), i).is_some() {
                return Err(HearthError::integrity(
                    "property index",
                    format!("duplicate property name '{name}'"),
                ));
            }
        }

        let mut combined = Vec::with_capacity(n * n);
        for a in 0..n {
            for b in 0..n {
                combined.push(
                    weights.facility * signals.facility[a][b]
                        + weights.price * signals.price[a][b]
                        + weights.location * signals.location[a][b],
                );
            }
        }

        info!(
            properties = n,
            facility = weights.facility,
            price = weights.price,
            location = weights.location,
            "similarity store ready"
        );

        Ok(Self {
            names,
            lookup,
            combined,
            weights,
        })
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| HearthError::not_found("property", name))
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Combined score between two indices. Panics if either is out of range.
    pub fn combined_score(&self, a: usize, b: usize) -> f64 {
        self.combined[a * self.names.len() + b]
    }

    /// All combined scores for one property.
    pub fn row(&self, index: usize) -> &[f64] {
        let n = self.names.len();
        &self.combined[index * n..(index + 1) * n]
    }

    pub fn names(&self) -> &[PropertyName] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn weights(&self) -> BlendWeights {
        self.weights
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn check_square(label: &str, matrix: &SimilarityMatrix, n: usize) -> Result<()> {
    let artifact = format!("{label} similarity");
    if matrix.len() != n {
        return Err(HearthError::integrity(
            artifact,
            format!("{} rows, expected {n}", matrix.len()),
        ));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(HearthError::integrity(
                artifact,
                format!("row {i} has {} columns, expected {n}", row.len()),
            ));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(HearthError::integrity(
                artifact,
                format!("cell [{i}][{j}] is not finite"),
            ));
        }
    }
    Ok(())
}
