//! Startup loading of the precomputed artifacts.
//!
//! Every artifact is read fully into memory, hashed into a single xxh3
//! fingerprint and validated. Any integrity failure aborts startup.

use std::path::Path;

use tracing::{info, instrument, warn};
use xxhash_rust::xxh3::Xxh3;

use crate::config::ArtifactsConfig;
use crate::error::{HearthError, Result};
use crate::index::{BlendWeights, DistanceIndex, SimilarityMatrix, SimilaritySignals, SimilarityStore};
use crate::predict::LinearPipeline;

/// Everything the service serves from, loaded once.
pub struct Artifacts {
    pub distance: DistanceIndex,
    pub similarity: SimilarityStore,
    pub price_model: Option<LinearPipeline>,
    /// xxh3 over the raw bytes of every loaded artifact, in load order.
    pub fingerprint: u64,
}

impl Artifacts {
    #[instrument(skip_all)]
    pub fn load(config: &ArtifactsConfig, weights: BlendWeights) -> Result<Self> {
        let mut hasher = Xxh3::new();

        let raw = read_artifact(&config.distance_table, &mut hasher)?;
        let distance = parse_distance_table(&raw)?;
        info!(
            path = %config.distance_table.display(),
            properties = distance.len(),
            locations = distance.location_count(),
            "loaded distance table"
        );

        let names = match &config.property_index {
            Some(path) => {
                let raw = read_artifact(path, &mut hasher)?;
                serde_json::from_slice::<Vec<String>>(&raw)?
            }
            None => distance.properties().to_vec(),
        };

        let signals = SimilaritySignals {
            facility: load_matrix(&config.facility_similarity, &mut hasher)?,
            price: load_matrix(&config.price_similarity, &mut hasher)?,
            location: load_matrix(&config.location_similarity, &mut hasher)?,
        };
        let similarity = SimilarityStore::new(names, signals, weights)?;

        let unranked = distance
            .properties()
            .iter()
            .filter(|p| !similarity.contains(p))
            .count();
        if unranked > 0 {
            warn!(
                unranked,
                "distance table lists properties missing from the similarity index"
            );
        }

        let price_model = match &config.price_model {
            Some(path) => {
                let raw = read_artifact(path, &mut hasher)?;
                let model = LinearPipeline::from_json(&raw)?;
                info!(path = %path.display(), "loaded price model");
                Some(model)
            }
            None => {
                warn!("no price model configured, prediction disabled");
                None
            }
        };

        let fingerprint = hasher.digest();
        info!(fingerprint = %format!("{fingerprint:016x}"), "artifacts ready");

        Ok(Self {
            distance,
            similarity,
            price_model,
            fingerprint,
        })
    }
}

fn read_artifact(path: &Path, hasher: &mut Xxh3) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|e| {
        HearthError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })?;
    hasher.update(&data);
    Ok(data)
}

fn load_matrix(path: &Path, hasher: &mut Xxh3) -> Result<SimilarityMatrix> {
    let raw = read_artifact(path, hasher)?;
    let matrix = parse_matrix(path, &raw)?;
    info!(path = %path.display(), rows = matrix.len(), "loaded similarity matrix");
    Ok(matrix)
}

/// Decode a matrix: bincode for `.bin` files, JSON otherwise.
pub fn parse_matrix(path: &Path, data: &[u8]) -> Result<SimilarityMatrix> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bin") => Ok(bincode::deserialize(data)?),
        _ => Ok(serde_json::from_slice(data)?),
    }
}

/// Parse the distance table CSV.
///
/// The header's first cell names the property column and is ignored; the
/// remaining header cells are location names. Each row is a property name
/// followed by one distance in meters per location.
pub fn parse_distance_table(data: &[u8]) -> Result<DistanceIndex> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(HearthError::integrity(
            "distance table",
            "header needs a property column and at least one location",
        ));
    }
    let locations: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut properties = Vec::new();
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let name = record.get(0).unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(HearthError::integrity(
                "distance table",
                format!("row {} has an empty property name", line + 1),
            ));
        }
        let row = record
            .iter()
            .skip(1)
            .zip(locations.iter())
            .map(|(cell, location)| {
                cell.parse::<f64>().map_err(|_| {
                    HearthError::integrity(
                        "distance table",
                        format!("'{name}' -> '{location}': cannot parse '{cell}'"),
                    )
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        properties.push(name);
        rows.push(row);
    }

    DistanceIndex::new(properties, locations, rows)
}
