mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::assertions::{assert_excludes, assert_invalid_argument};
use common::fixtures::{
    random_distance_index, random_engine, scenario_distance_index, scenario_engine,
};

use hearth::error::HearthError;
use hearth::session::{SearchSession, SessionManager, SessionState};
use hearth::types::RecommendMode;

#[test]
fn test_new_session_is_idle() {
    let session = SearchSession::new();
    assert_eq!(session.state(), &SessionState::Idle);
    assert!(session.candidates().is_empty());
    assert_eq!(session.summary().state, "idle");
}

#[test]
fn test_search_then_recommend() {
    let index = scenario_distance_index();
    let engine = scenario_engine();
    let mut session = SearchSession::new();

    let hits = session.search(&index, "L", 2.0).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(session.candidates(), vec!["A".to_string(), "B".to_string()]);

    let recs = session
        .select_and_recommend(&engine, "A", 2, RecommendMode::Universe)
        .unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
    // C lies outside the radius but the universe is ranked.
    assert_eq!(names, vec!["B", "C"]);
}

#[test]
fn test_within_candidates_mode_restricts_results() {
    let index = scenario_distance_index();
    let engine = scenario_engine();
    let mut session = SearchSession::new();
    session.search(&index, "L", 2.0).unwrap();

    let recs = session
        .select_and_recommend(&engine, "A", 5, RecommendMode::WithinCandidates)
        .unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}

#[test]
fn test_recommend_requires_candidate_membership() {
    let index = scenario_distance_index();
    let engine = scenario_engine();
    let mut session = SearchSession::new();

    // Nothing searched yet.
    assert_invalid_argument(&session.select_and_recommend(
        &engine,
        "A",
        2,
        RecommendMode::Universe,
    ));

    session.search(&index, "L", 2.0).unwrap();
    // C is a known property, just not a candidate.
    assert_invalid_argument(&session.select_and_recommend(
        &engine,
        "C",
        2,
        RecommendMode::Universe,
    ));
}

#[test]
fn test_new_search_replaces_candidates_wholesale() {
    let index = scenario_distance_index();
    let mut session = SearchSession::new();

    session.search(&index, "L", 2.0).unwrap();
    assert_eq!(session.candidates(), vec!["A".to_string(), "B".to_string()]);

    session.search(&index, "K", 1.5).unwrap();
    assert_eq!(session.candidates(), vec!["C".to_string()]);
}

#[test]
fn test_empty_search_moves_to_no_candidates() {
    let index = scenario_distance_index();
    let engine = scenario_engine();
    let mut session = SearchSession::new();

    session.search(&index, "L", 2.0).unwrap();
    let hits = session.search(&index, "L", 0.2).unwrap();
    assert!(hits.is_empty());
    assert!(matches!(session.state(), SessionState::NoCandidates { .. }));
    assert!(session.candidates().is_empty());
    assert_invalid_argument(&session.select_and_recommend(
        &engine,
        "A",
        1,
        RecommendMode::Universe,
    ));
}

#[test]
fn test_rejected_search_keeps_previous_candidates() {
    let index = scenario_distance_index();
    let mut session = SearchSession::new();
    session.search(&index, "L", 2.0).unwrap();

    assert!(session.search(&index, "L", -1.0).is_err());
    assert!(session.search(&index, "Nowhere", 1.0).is_err());
    assert_eq!(session.candidates(), vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_candidates_sorted_by_name() {
    let index = scenario_distance_index();
    let mut session = SearchSession::new();
    let hits = session.search(&index, "K", 5.0).unwrap();
    // Hits are nearest first, candidates alphabetical.
    assert_eq!(hits[0].name, "C");
    assert_eq!(
        session.candidates(),
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    );
}

fn manager(max_sessions: usize) -> SessionManager {
    SessionManager::new(
        Arc::new(random_distance_index(50, 3, 99)),
        Arc::new(random_engine(50, 99)),
        max_sessions,
    )
}

#[test]
fn test_sessions_are_isolated() {
    let manager = manager(10);
    let first = manager.create().unwrap().id;
    let second = manager.create().unwrap().id;

    manager.search(&first, "sector 0", 3.0).unwrap();
    manager.search(&second, "sector 1", 6.0).unwrap();

    let first_candidates = manager.candidates(&first).unwrap();
    let second_candidates = manager.candidates(&second).unwrap();
    assert_ne!(first_candidates, second_candidates);

    // Searching again in one session leaves the other untouched.
    manager.search(&first, "sector 2", 0.5).unwrap();
    assert_eq!(manager.candidates(&second).unwrap(), second_candidates);
}

#[test]
fn test_manager_recommend_flow() {
    let manager = manager(10);
    let id = manager.create().unwrap().id;
    let hits = manager.search(&id, "sector 0", 8.0).unwrap();
    let pick = hits[0].name.clone();

    let recs = manager
        .recommend(&id, &pick, 5, RecommendMode::Universe)
        .unwrap();
    assert_eq!(recs.len(), 5);
    assert_excludes(&recs, &pick);
}

#[test]
fn test_unknown_session() {
    let manager = manager(10);
    assert!(matches!(
        manager.candidates("not-a-ulid"),
        Err(HearthError::SessionNotFound { .. })
    ));
    let stale = ulid::Ulid::new().to_string();
    assert!(matches!(
        manager.search(&stale, "sector 0", 1.0),
        Err(HearthError::SessionNotFound { .. })
    ));
}

#[test]
fn test_session_limit() {
    let manager = manager(2);
    manager.create().unwrap();
    manager.create().unwrap();
    assert!(matches!(
        manager.create(),
        Err(HearthError::TooManySessions { limit: 2 })
    ));
}

#[test]
fn test_remove_session() {
    let manager = manager(10);
    let id = manager.create().unwrap().id;
    manager.remove(&id).unwrap();
    assert!(manager.is_empty());
    assert!(manager.remove(&id).is_err());
}

#[test]
fn test_evict_idle_sessions() {
    let manager = manager(10);
    manager.create().unwrap();
    manager.create().unwrap();

    // Nothing is idle yet.
    assert_eq!(manager.evict_idle(Utc::now(), Duration::minutes(5)), 0);
    assert_eq!(manager.len(), 2);

    let later = Utc::now() + Duration::minutes(10);
    assert_eq!(manager.evict_idle(later, Duration::minutes(5)), 2);
    assert!(manager.is_empty());
}

#[tokio::test]
async fn test_sweeper_stops_on_shutdown() {
    let manager = Arc::new(manager(10));
    let (tx, rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(hearth::session::sweeper::session_sweep_loop(
        manager,
        std::time::Duration::from_secs(60),
        std::time::Duration::from_millis(10),
        rx,
    ));

    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(2), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}
