use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, info};
use ulid::Ulid;

use crate::error::{HearthError, Result};
use crate::index::DistanceIndex;
use crate::recommend::RecommendationEngine;
use crate::types::{PropertyName, Recommendation, RecommendMode, SearchHit};

use super::{SearchSession, SessionSummary};

/// Registry of isolated search sessions.
///
/// Each session is only ever mutated under its own map entry, so callers
/// working in different sessions never observe each other's candidates.
pub struct SessionManager {
    sessions: DashMap<Ulid, SearchSession>,
    distance: Arc<DistanceIndex>,
    engine: Arc<RecommendationEngine>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(
        distance: Arc<DistanceIndex>,
        engine: Arc<RecommendationEngine>,
        max_sessions: usize,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            distance,
            engine,
            max_sessions,
        }
    }

    /// Open a new idle session.
    pub fn create(&self) -> Result<SessionSummary> {
        if self.sessions.len() >= self.max_sessions {
            return Err(HearthError::TooManySessions {
                limit: self.max_sessions,
            });
        }
        let session = SearchSession::new();
        let summary = session.summary();
        self.sessions.insert(session.id(), session);
        crate::metrics::ACTIVE_SESSIONS.set(self.sessions.len() as i64);
        debug!(session = %summary.id, "session created");
        Ok(summary)
    }

    pub fn get(&self, id: &str) -> Result<SessionSummary> {
        let key = parse_id(id)?;
        self.sessions
            .get(&key)
            .map(|s| s.summary())
            .ok_or_else(|| HearthError::SessionNotFound { id: id.to_string() })
    }

    pub fn search(&self, id: &str, location: &str, radius_km: f64) -> Result<Vec<SearchHit>> {
        let key = parse_id(id)?;
        let mut session = self
            .sessions
            .get_mut(&key)
            .ok_or_else(|| HearthError::SessionNotFound { id: id.to_string() })?;
        session.search(&self.distance, location, radius_km)
    }

    pub fn recommend(
        &self,
        id: &str,
        property: &str,
        top_n: usize,
        mode: RecommendMode,
    ) -> Result<Vec<Recommendation>> {
        let key = parse_id(id)?;
        let mut session = self
            .sessions
            .get_mut(&key)
            .ok_or_else(|| HearthError::SessionNotFound { id: id.to_string() })?;
        session.select_and_recommend(&self.engine, property, top_n, mode)
    }

    pub fn candidates(&self, id: &str) -> Result<Vec<PropertyName>> {
        let key = parse_id(id)?;
        self.sessions
            .get(&key)
            .map(|s| s.candidates())
            .ok_or_else(|| HearthError::SessionNotFound { id: id.to_string() })
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        let key = parse_id(id)?;
        self.sessions
            .remove(&key)
            .ok_or_else(|| HearthError::SessionNotFound { id: id.to_string() })?;
        crate::metrics::ACTIVE_SESSIONS.set(self.sessions.len() as i64);
        Ok(())
    }

    /// Drop sessions idle for longer than `ttl` as of `now`. Returns how many
    /// were removed.
    pub fn evict_idle(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.signed_duration_since(session.last_active()) <= ttl);
        let evicted = before.saturating_sub(self.sessions.len());

        if evicted > 0 {
            crate::metrics::SESSIONS_EVICTED_TOTAL.inc_by(evicted as u64);
            info!(evicted, remaining = self.sessions.len(), "evicted idle sessions");
        }
        crate::metrics::ACTIVE_SESSIONS.set(self.sessions.len() as i64);
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn parse_id(id: &str) -> Result<Ulid> {
    Ulid::from_str(id).map_err(|_| HearthError::SessionNotFound { id: id.to_string() })
}
