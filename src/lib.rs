//! Hearth: real estate decision support over precomputed artifacts.
//!
//! Radius search over a property-to-location distance table, blended
//! similarity recommendations, and price ranges from a trained pipeline.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod predict;
pub mod recommend;
pub mod server;
pub mod session;
pub mod types;
