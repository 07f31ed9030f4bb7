mod common;

use common::{combat_app, player_entity, tick};
use std::fs;
use wavebound::{
    components::Health,
    game::{GameState, GAME_MODE},
    persistence::{HighScoreStore, PersistenceError},
    player::CharacterClass,
};

#[test]
fn test_missing_file_reads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().to_path_buf());
    assert_eq!(store.load_high_score("roguelite"), 0);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = HighScoreStore::new(dir.path().join("nested").join("scores"));
    store.save_high_score("roguelite", 4_200).unwrap();
    assert_eq!(store.load_high_score("roguelite"), 4_200);
    assert_eq!(store.load_high_score("other"), 0);
    assert!(store.path_for("roguelite").ends_with("highscore_roguelite.txt"));
}

#[test]
fn test_corrupt_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().to_path_buf());
    fs::write(store.path_for("roguelite"), "not a score").unwrap();
    assert!(matches!(store.try_load("roguelite"), Err(PersistenceError::Parse(_))));
    assert_eq!(store.load_high_score("roguelite"), 0);
}

#[test]
fn test_game_over_saves_a_new_high_score() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("highscore_{GAME_MODE}.txt")), "100").unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Blademaster);
    assert_eq!(app.world.resource::<GameState>().high_score, 100);

    app.world.resource_mut::<GameState>().score = 250;
    let player = player_entity(&mut app);
    app.world.get_mut::<Health>(player).unwrap().current = 0.0;
    tick(&mut app);
    app.update();

    assert_eq!(app.world.resource::<GameState>().high_score, 250);
    let stored = HighScoreStore::new(dir.path().to_path_buf());
    assert_eq!(stored.load_high_score(GAME_MODE), 250);
}

#[test]
fn test_lower_score_leaves_record_alone() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("highscore_{GAME_MODE}.txt")), "900").unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Gunslinger);
    app.world.resource_mut::<GameState>().score = 10;
    let player = player_entity(&mut app);
    app.world.get_mut::<Health>(player).unwrap().current = 0.0;
    tick(&mut app);
    app.update();

    let stored = HighScoreStore::new(dir.path().to_path_buf());
    assert_eq!(stored.load_high_score(GAME_MODE), 900);
}
