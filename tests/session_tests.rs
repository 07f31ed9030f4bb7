mod common;

use bevy::prelude::*;
use common::{combat_app, count, phase, player_entity, spawn_test_enemy, tick};
use wavebound::{
    components::{Health, Hitbox},
    enemy::{Enemy, EnemyKind},
    game::{GameState, RestartRequested, RunPhase},
    player::{CharacterClass, Player},
    projectiles::{EnemyProjectile, EnemyShotKind, Projectile, SHOT_HITBOX},
    waves::WaveDirector,
    weapons::{RangedTuning, ShotDescriptor},
};

fn spawn_player_shot(app: &mut App, at: Vec2, direction: Vec2) -> Entity {
    let projectile = Projectile::from_shot(&ShotDescriptor { origin: at, direction, empowered: false }, &RangedTuning::default());
    app.world.spawn((TransformBundle::from_transform(Transform::from_translation(at.extend(3.0))), projectile, Hitbox(SHOT_HITBOX))).id()
}

fn spawn_enemy_shot(app: &mut App, at: Vec2, direction: Vec2) -> Entity {
    let kind = EnemyShotKind::Bolt;
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_translation(at.extend(3.0))),
        EnemyProjectile { kind, direction, speed: kind.speed(), damage: kind.damage() },
        Hitbox(kind.size()),
    )).id()
}

#[test]
fn test_projectiles_leaving_the_playfield_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Gunslinger);
    let escaping_shot = spawn_player_shot(&mut app, Vec2::new(560.0, 0.0), Vec2::X);
    let live_shot = spawn_player_shot(&mut app, Vec2::new(0.0, 200.0), Vec2::X);
    let escaping_bolt = spawn_enemy_shot(&mut app, Vec2::new(0.0, 310.0), Vec2::Y);
    let live_bolt = spawn_enemy_shot(&mut app, Vec2::new(300.0, 200.0), Vec2::Y);

    tick(&mut app);

    assert!(app.world.get_entity(escaping_shot).is_none());
    assert!(app.world.get_entity(escaping_bolt).is_none());
    assert_eq!(app.world.get::<Transform>(live_shot).unwrap().translation.truncate(), Vec2::new(15.0, 200.0));
    assert_eq!(app.world.get::<Transform>(live_bolt).unwrap().translation.truncate(), Vec2::new(300.0, 205.0));
}

#[test]
fn test_restart_clears_the_run_and_returns_to_class_select() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Gunslinger);
    app.world.resource_mut::<WaveDirector>().begin_next();
    app.world.resource_mut::<RangedTuning>().pierce = 3;
    app.world.resource_mut::<GameState>().score = 120;
    let (enemy, health) = Enemy::new(EnemyKind::Cactling, 0);
    spawn_test_enemy(&mut app, enemy, health, Vec2::new(400.0, 200.0));
    spawn_enemy_shot(&mut app, Vec2::new(-300.0, 200.0), Vec2::Y);

    let player = player_entity(&mut app);
    app.world.get_mut::<Health>(player).unwrap().current = 0.0;
    tick(&mut app);
    app.update();
    assert_eq!(phase(&app), RunPhase::GameOver);

    app.world.send_event(RestartRequested);
    app.update();
    app.update();

    assert_eq!(phase(&app), RunPhase::SelectingClass);
    assert_eq!(count::<Enemy>(&mut app), 0);
    assert_eq!(count::<EnemyProjectile>(&mut app), 0);
    let players: Vec<Option<CharacterClass>> = app.world.query::<&Player>().iter(&app.world).map(|player| player.class).collect();
    assert_eq!(players, vec![None]);
    let game_state = app.world.resource::<GameState>();
    assert_eq!((game_state.score, game_state.high_score), (0, 120));
    assert_eq!(app.world.resource::<WaveDirector>().wave, 0);
    assert_eq!(*app.world.resource::<RangedTuning>(), RangedTuning::default());
}
