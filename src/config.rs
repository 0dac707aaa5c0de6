//! Service configuration.
//!
//! Loaded from a TOML file (explicit path, or `HEARTH_CONFIG`), falling back
//! to built-in defaults, then overridden field by field from `HEARTH_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HearthError, Result};

/// Weight of the facility similarity signal in the combined score.
pub const DEFAULT_FACILITY_WEIGHT: f64 = 0.5;
/// Weight of the price similarity signal in the combined score.
pub const DEFAULT_PRICE_WEIGHT: f64 = 0.8;
/// Weight of the location similarity signal in the combined score.
pub const DEFAULT_LOCATION_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub ranking: RankingConfig,
    pub sessions: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub max_top_n: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
            max_top_n: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// CSV: properties as rows, locations as columns, meters as cells.
    pub distance_table: PathBuf,
    pub facility_similarity: PathBuf,
    pub price_similarity: PathBuf,
    pub location_similarity: PathBuf,
    /// JSON array of property names. Defaults to the distance table row order.
    pub property_index: Option<PathBuf>,
    /// Exported linear price pipeline (JSON). Prediction is disabled without it.
    pub price_model: Option<PathBuf>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            distance_table: PathBuf::from("data/location_distance.csv"),
            facility_similarity: PathBuf::from("data/facility_similarity.json"),
            price_similarity: PathBuf::from("data/price_similarity.json"),
            location_similarity: PathBuf::from("data/location_similarity.json"),
            property_index: None,
            price_model: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub facility_weight: f64,
    pub price_weight: f64,
    pub location_weight: f64,
    pub default_top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            facility_weight: DEFAULT_FACILITY_WEIGHT,
            price_weight: DEFAULT_PRICE_WEIGHT,
            location_weight: DEFAULT_LOCATION_WEIGHT,
            default_top_n: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            session_ttl_secs: 30 * 60,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or `HEARTH_CONFIG` when `path` is None.
    ///
    /// A missing file is not an error when no path was given explicitly.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("HEARTH_CONFIG").ok());

        let mut config = match path {
            Some(p) if explicit || Path::new(&p).exists() => Self::from_file(&p)?,
            _ => Config::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| HearthError::Config(format!("failed to read {path}: {e}")))?;
        toml::from_str(&raw).map_err(|e| HearthError::Config(format!("{path}: {e}")))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("HEARTH_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env_parse::<u16>("HEARTH_PORT")? {
            self.server.port = v;
        }
        if let Some(v) = env_parse::<u64>("HEARTH_REQUEST_TIMEOUT_SECS")? {
            self.server.request_timeout_secs = v;
        }
        if let Ok(v) = std::env::var("HEARTH_DISTANCE_TABLE") {
            self.artifacts.distance_table = v.into();
        }
        if let Ok(v) = std::env::var("HEARTH_FACILITY_SIMILARITY") {
            self.artifacts.facility_similarity = v.into();
        }
        if let Ok(v) = std::env::var("HEARTH_PRICE_SIMILARITY") {
            self.artifacts.price_similarity = v.into();
        }
        if let Ok(v) = std::env::var("HEARTH_LOCATION_SIMILARITY") {
            self.artifacts.location_similarity = v.into();
        }
        if let Ok(v) = std::env::var("HEARTH_PROPERTY_INDEX") {
            self.artifacts.property_index = Some(v.into());
        }
        if let Ok(v) = std::env::var("HEARTH_PRICE_MODEL") {
            self.artifacts.price_model = Some(v.into());
        }
        if let Some(v) = env_parse::<f64>("HEARTH_FACILITY_WEIGHT")? {
            self.ranking.facility_weight = v;
        }
        if let Some(v) = env_parse::<f64>("HEARTH_PRICE_WEIGHT")? {
            self.ranking.price_weight = v;
        }
        if let Some(v) = env_parse::<f64>("HEARTH_LOCATION_WEIGHT")? {
            self.ranking.location_weight = v;
        }
        if let Some(v) = env_parse::<u64>("HEARTH_SESSION_TTL_SECS")? {
            self.sessions.session_ttl_secs = v;
        }
        if let Ok(v) = std::env::var("HEARTH_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("HEARTH_LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    /// Reject settings that would make ranking or serving meaningless.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("facility_weight", self.ranking.facility_weight),
            ("price_weight", self.ranking.price_weight),
            ("location_weight", self.ranking.location_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(HearthError::Config(format!(
                    "ranking.{name} must be a finite non-negative number, got {w}"
                )));
            }
        }
        if self.ranking.default_top_n == 0 {
            return Err(HearthError::Config("ranking.default_top_n must be > 0".into()));
        }
        if self.ranking.default_top_n > self.server.max_top_n {
            return Err(HearthError::Config(format!(
                "ranking.default_top_n {} exceeds server.max_top_n {}",
                self.ranking.default_top_n, self.server.max_top_n
            )));
        }
        if self.sessions.max_sessions == 0 {
            return Err(HearthError::Config("sessions.max_sessions must be > 0".into()));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(HearthError::Config(
                "sessions.sweep_interval_secs must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| HearthError::Config(format!("{key}: cannot parse '{raw}'"))),
        Err(_) => Ok(None),
    }
}
