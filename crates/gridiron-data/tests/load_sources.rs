// Loading the fixture sheets from disk and seeding a draft with them.

use std::path::{Path, PathBuf};

use gridiron_core::config::DataPaths;
use gridiron_core::{DraftConfiguration, DraftError, DraftState, Position, ScoreMode, UNRANKED_SENTINEL};
use gridiron_data::{load_player_source, load_rankings, load_stats, LoadError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn paths() -> DataPaths {
    DataPaths {
        rankings: fixture("rankings.csv").display().to_string(),
        projections: Some(fixture("projections.csv").display().to_string()),
        stats: Some(fixture("stats.csv").display().to_string()),
    }
}

#[test]
fn rankings_fixture_with_byte_order_mark() {
    let players = load_rankings(&fixture("rankings.csv")).unwrap();
    assert_eq!(players.len(), 9, "the LB row is skipped");
    assert_eq!(players[0].name, "Christian McCaffrey");
    assert_eq!(players[0].position, Position::RunningBack);

    let flier = players.iter().find(|p| p.name == "Late Flier").unwrap();
    assert_eq!(flier.score, UNRANKED_SENTINEL);
    let defense = players.iter().find(|p| p.team == "SF" && p.position == Position::Defense);
    assert!(defense.is_some());
}

#[test]
fn rank_mode_draft_orders_by_rank() {
    let players = load_player_source(&paths(), ScoreMode::Rank).unwrap();
    let state = DraftState::new(DraftConfiguration::new(4, 1, 3), players).unwrap();

    let best = state.best_available(None, None);
    assert_eq!(best.first().map(|p| p.name.as_str()), Some("Christian McCaffrey"));
    assert_eq!(best.last().map(|p| p.name.as_str()), Some("Late Flier"));
}

#[test]
fn points_mode_joins_projections() {
    let players = load_player_source(&paths(), ScoreMode::Points).unwrap();
    assert_eq!(players.len(), 5);
    let hill = players.iter().find(|p| p.name == "Tyreek Hill").unwrap();
    assert_eq!(hill.score, 310.0);
    assert_eq!(hill.position, Position::WideReceiver);
    assert!(players.iter().all(|p| p.name != "Unknown Rookie"));

    let mut config = DraftConfiguration::new(4, 1, 3);
    config.score_mode = ScoreMode::Points;
    let state = DraftState::new(config, players).unwrap();
    let best = state.best_available(None, Some(2));
    let names: Vec<&str> = best.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Josh Allen", "Christian McCaffrey"]);
}

#[test]
fn points_mode_without_projections_is_rejected() {
    let mut paths = paths();
    paths.projections = None;
    let err = load_player_source(&paths, ScoreMode::Points).unwrap_err();
    assert!(matches!(err, LoadError::Validation(_)));
}

#[test]
fn missing_rankings_file_maps_to_rankings_unavailable() {
    let err = load_rankings(&fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));

    let draft_err: DraftError = err.into();
    match draft_err {
        DraftError::RankingsUnavailable { reason } => assert!(reason.contains("does_not_exist.csv")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn stats_fixture_lookup() {
    let book = load_stats(&fixture("stats.csv")).unwrap();
    assert_eq!(book.len(), 4);

    let results = book.search("mccaffrey");
    assert_eq!(results.len(), 1);
    let years: Vec<u16> = results[0].seasons.iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2023, 2022]);
    assert_eq!(results[0].seasons[0].team, "SFO");

    let allen = &book.search("josh allen")[0];
    assert!(allen.seasons[0].is_quarterback());
    assert!((allen.seasons[0].yards_per_completion() - 4306.0 / 385.0).abs() < 1e-9);
}
