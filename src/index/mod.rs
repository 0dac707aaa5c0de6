//! Read-only indexes built from the precomputed artifacts.
//!
//! `DistanceIndex` answers radius queries over the property x location
//! distance table; `SimilarityStore` holds the blended similarity matrix.

pub mod distance;
pub mod similarity;

pub use distance::DistanceIndex;
pub use similarity::{BlendWeights, SimilarityMatrix, SimilaritySignals, SimilarityStore};
