use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hearth::artifacts::Artifacts;
use hearth::config::{ArtifactsConfig, Config};
use hearth::index::{
    BlendWeights, DistanceIndex, SimilarityMatrix, SimilaritySignals, SimilarityStore,
};
use hearth::recommend::RecommendationEngine;

/// A at 500 m, B at 1500 m, C at 2500 m from "L"; reversed from "K".
pub fn scenario_distance_index() -> DistanceIndex {
    DistanceIndex::new(
        vec!["A".into(), "B".into(), "C".into()],
        vec!["L".into(), "K".into()],
        vec![
            vec![500.0, 3000.0],
            vec![1500.0, 2000.0],
            vec![2500.0, 1000.0],
        ],
    )
    .unwrap()
}

/// Only the location signal is non-zero, so combined scores equal it
/// exactly (weight 1.0). Row A is `[1.0, 0.9, 0.3]`.
pub fn scenario_signals() -> SimilaritySignals {
    let zeros = vec![vec![0.0; 3]; 3];
    SimilaritySignals {
        facility: zeros.clone(),
        price: zeros,
        location: vec![
            vec![1.0, 0.9, 0.3],
            vec![0.9, 1.0, 0.4],
            vec![0.3, 0.4, 1.0],
        ],
    }
}

pub fn scenario_engine() -> RecommendationEngine {
    let store = SimilarityStore::new(
        vec!["A".into(), "B".into(), "C".into()],
        scenario_signals(),
        BlendWeights::default(),
    )
    .unwrap();
    RecommendationEngine::new(Arc::new(store))
}

pub fn property_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("apt_{i:03}")).collect()
}

/// Symmetric matrix with unit diagonal and uniform off-diagonal values.
pub fn random_similarity(n: usize, rng: &mut StdRng) -> SimilarityMatrix {
    let mut m = vec![vec![0.0; n]; n];
    for i in 0..n {
        m[i][i] = 1.0;
        for j in (i + 1)..n {
            let v: f64 = rng.gen_range(0.0..1.0);
            m[i][j] = v;
            m[j][i] = v;
        }
    }
    m
}

pub fn random_signals(n: usize, seed: u64) -> SimilaritySignals {
    let mut rng = StdRng::seed_from_u64(seed);
    SimilaritySignals {
        facility: random_similarity(n, &mut rng),
        price: random_similarity(n, &mut rng),
        location: random_similarity(n, &mut rng),
    }
}

pub fn random_engine(n: usize, seed: u64) -> RecommendationEngine {
    let store =
        SimilarityStore::new(property_names(n), random_signals(n, seed), BlendWeights::default())
            .unwrap();
    RecommendationEngine::new(Arc::new(store))
}

/// `n` properties, `locations` reference points, distances within 0..10 km.
pub fn random_distance_index(n: usize, locations: usize, seed: u64) -> DistanceIndex {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|_| (0..locations).map(|_| rng.gen_range(0.0..10_000.0)).collect())
        .collect();
    let location_names = (0..locations).map(|i| format!("sector {i}")).collect();
    DistanceIndex::new(property_names(n), location_names, rows).unwrap()
}

pub fn distance_csv(index: &DistanceIndex) -> String {
    let locations = index.locations();
    let mut out = String::from("property");
    for l in &locations {
        out.push(',');
        out.push_str(l);
    }
    out.push('\n');
    for p in index.properties() {
        out.push_str(p);
        for l in &locations {
            out.push_str(&format!(",{}", index.distance(p, l).unwrap()));
        }
        out.push('\n');
    }
    out
}

pub const PRICE_MODEL_JSON: &str = r#"{
    "intercept": 0.3,
    "numeric": {"bedRoom": 0.12, "bathroom": 0.05, "built_up_area": 0.0002},
    "categorical": {
        "property_type": {"flat": 0.0, "house": 0.35},
        "sector": {"sector 45": 0.2, "sector 12": -0.05}
    },
    "levels": {"bedRoom": [1, 2, 3, 4]}
}"#;

/// Write a full artifact set into `dir`. Matrices are bincode when
/// `binary` is set, JSON otherwise.
pub fn write_artifacts(
    dir: &Path,
    distance: &DistanceIndex,
    signals: &SimilaritySignals,
    binary: bool,
    with_price_model: bool,
) -> ArtifactsConfig {
    std::fs::write(dir.join("distance.csv"), distance_csv(distance)).unwrap();

    let write_matrix = |name: &str, m: &SimilarityMatrix| {
        let path = if binary {
            let p = dir.join(format!("{name}.bin"));
            std::fs::write(&p, bincode::serialize(m).unwrap()).unwrap();
            p
        } else {
            let p = dir.join(format!("{name}.json"));
            std::fs::write(&p, serde_json::to_vec(m).unwrap()).unwrap();
            p
        };
        path
    };

    let price_model = with_price_model.then(|| {
        let p = dir.join("price_model.json");
        std::fs::write(&p, PRICE_MODEL_JSON).unwrap();
        p
    });

    ArtifactsConfig {
        distance_table: dir.join("distance.csv"),
        facility_similarity: write_matrix("facility", &signals.facility),
        price_similarity: write_matrix("price", &signals.price),
        location_similarity: write_matrix("location", &signals.location),
        property_index: None,
        price_model,
    }
}

/// Load the scenario artifacts through the real loader.
pub fn scenario_artifacts(dir: &Path, with_price_model: bool) -> (Config, Artifacts) {
    let mut config = Config::default();
    config.artifacts = write_artifacts(
        dir,
        &scenario_distance_index(),
        &scenario_signals(),
        false,
        with_price_model,
    );
    let artifacts =
        Artifacts::load(&config.artifacts, BlendWeights::from(&config.ranking)).unwrap();
    (config, artifacts)
}
