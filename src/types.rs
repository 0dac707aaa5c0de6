use serde::{Deserialize, Serialize};

/// Unique identifier of a listed property. Join key across all artifacts.
pub type PropertyName = String;

/// Unique identifier of a reference location (a sector or landmark).
pub type LocationName = String;

/// A property found within a search radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: PropertyName,
    pub distance_m: f64,
}

impl SearchHit {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }
}

/// A ranked neighbour of a query property with its combined similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: PropertyName,
    pub score: f64,
}

/// Which properties may appear as recommendation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingScope<'a> {
    /// Every property in the similarity space.
    #[default]
    Universe,
    /// Only the listed properties. Names outside the similarity space are skipped.
    Candidates(&'a [PropertyName]),
}

impl RankingScope<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            RankingScope::Universe => "universe",
            RankingScope::Candidates(_) => "candidates",
        }
    }
}

/// Session-level choice between ranking over all properties or only the
/// candidates of the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendMode {
    #[default]
    Universe,
    WithinCandidates,
}

/// Round to two decimals for display.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_reports_kilometers() {
        let hit = SearchHit {
            name: "A".into(),
            distance_m: 1534.0,
        };
        assert_eq!(hit.distance_km(), 1.534);
        assert_eq!(round2(hit.distance_km()), 1.53);
    }

    #[test]
    fn recommend_mode_wire_names() {
        let mode: RecommendMode = serde_json::from_str("\"within_candidates\"").unwrap();
        assert_eq!(mode, RecommendMode::WithinCandidates);
        assert_eq!(RecommendMode::default(), RecommendMode::Universe);
    }
}
