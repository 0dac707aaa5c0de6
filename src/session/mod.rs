//! Per-caller two-stage workflow: radius search, then recommend one of the
//! properties that search surfaced.

pub mod manager;
pub mod sweeper;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

use crate::error::{HearthError, Result};
use crate::index::DistanceIndex;
use crate::recommend::RecommendationEngine;
use crate::types::{
    LocationName, PropertyName, RankingScope, Recommendation, RecommendMode, SearchHit,
};

pub use manager::SessionManager;

/// Where a session is in the search-then-recommend flow.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No search has run yet.
    Idle,
    /// The last search found nothing.
    NoCandidates {
        location: LocationName,
        radius_km: f64,
    },
    /// The last search found these properties, nearest first.
    HasCandidates {
        location: LocationName,
        radius_km: f64,
        candidates: Vec<PropertyName>,
    },
}

/// Serializable view of a session for the API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
    pub candidate_count: usize,
    pub created_at: String,
    pub last_active: String,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    id: Ulid,
    state: SessionState,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl SearchSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new(),
            state: SessionState::Idle,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Run a radius search and replace the candidate list with its result.
    ///
    /// A rejected search leaves the previous candidates in place.
    pub fn search(
        &mut self,
        index: &DistanceIndex,
        location: &str,
        radius_km: f64,
    ) -> Result<Vec<SearchHit>> {
        self.touch();
        let hits = index.query(location, radius_km)?;

        self.state = if hits.is_empty() {
            SessionState::NoCandidates {
                location: location.to_string(),
                radius_km,
            }
        } else {
            SessionState::HasCandidates {
                location: location.to_string(),
                radius_km,
                candidates: hits.iter().map(|h| h.name.clone()).collect(),
            }
        };
        Ok(hits)
    }

    /// Recommend properties similar to `property`, which must be one of the
    /// current candidates.
    pub fn select_and_recommend(
        &mut self,
        engine: &RecommendationEngine,
        property: &str,
        top_n: usize,
        mode: RecommendMode,
    ) -> Result<Vec<Recommendation>> {
        self.touch();
        let candidates = match &self.state {
            SessionState::HasCandidates { candidates, .. } => candidates,
            SessionState::Idle => {
                return Err(HearthError::InvalidArgument(format!(
                    "'{property}' is not a candidate: no search has been run"
                )))
            }
            SessionState::NoCandidates { .. } => {
                return Err(HearthError::InvalidArgument(format!(
                    "'{property}' is not a candidate: the last search found no properties"
                )))
            }
        };
        if !candidates.iter().any(|c| c == property) {
            return Err(HearthError::InvalidArgument(format!(
                "'{property}' is not among the candidates of the last search"
            )));
        }

        let scope = match mode {
            RecommendMode::Universe => RankingScope::Universe,
            RecommendMode::WithinCandidates => RankingScope::Candidates(candidates),
        };
        engine.recommend(property, top_n, scope)
    }

    /// Current candidates sorted by name; empty when there are none.
    pub fn candidates(&self) -> Vec<PropertyName> {
        match &self.state {
            SessionState::HasCandidates { candidates, .. } => {
                let mut sorted = candidates.clone();
                sorted.sort();
                sorted
            }
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let (state, location, radius_km, candidate_count) = match &self.state {
            SessionState::Idle => ("idle", None, None, 0),
            SessionState::NoCandidates {
                location,
                radius_km,
            } => ("no_candidates", Some(location.clone()), Some(*radius_km), 0),
            SessionState::HasCandidates {
                location,
                radius_km,
                candidates,
            } => (
                "has_candidates",
                Some(location.clone()),
                Some(*radius_km),
                candidates.len(),
            ),
        };
        SessionSummary {
            id: self.id.to_string(),
            state,
            location,
            radius_km,
            candidate_count,
            created_at: self.created_at.to_rfc3339(),
            last_active: self.last_active.to_rfc3339(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
