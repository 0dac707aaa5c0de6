use hearth::error::HearthError;
use hearth::types::{Recommendation, SearchHit};

/// Assert hits are nearest-first and all strictly inside the radius.
pub fn assert_within_radius_sorted(hits: &[SearchHit], radius_km: f64) {
    for hit in hits {
        assert!(
            hit.distance_km() < radius_km,
            "hit '{}' at {} km is not inside {radius_km} km",
            hit.name,
            hit.distance_km()
        );
    }
    for pair in hits.windows(2) {
        assert!(
            pair[0].distance_m <= pair[1].distance_m,
            "hits out of order: {} ({}) before {} ({})",
            pair[0].name,
            pair[0].distance_m,
            pair[1].name,
            pair[1].distance_m
        );
    }
}

/// Assert scores never increase along the ranking.
pub fn assert_scores_non_increasing(recs: &[Recommendation]) {
    for pair in recs.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "scores out of order: {} ({}) before {} ({})",
            pair[0].name,
            pair[0].score,
            pair[1].name,
            pair[1].score
        );
    }
}

/// Assert the query property is absent from its own recommendations.
pub fn assert_excludes(recs: &[Recommendation], property: &str) {
    assert!(
        recs.iter().all(|r| r.name != property),
        "'{property}' recommended to itself: {:?}",
        recs.iter().map(|r| &r.name).collect::<Vec<_>>()
    );
}

pub fn assert_not_found<T: std::fmt::Debug>(result: &Result<T, HearthError>) {
    match result {
        Err(HearthError::NotFound { .. }) => {}
        other => panic!("expected NotFound error, got: {other:?}"),
    }
}

pub fn assert_invalid_argument<T: std::fmt::Debug>(result: &Result<T, HearthError>) {
    match result {
        Err(HearthError::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument error, got: {other:?}"),
    }
}
