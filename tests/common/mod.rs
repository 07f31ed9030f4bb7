#![allow(dead_code)]

use bevy::prelude::*;
use std::path::Path;
use wavebound::{
    components::{ActorState, Health},
    config::GameConfig,
    enemy::Enemy,
    game::{ClassChosen, GamePlugin, GameRng, RunPhase},
    player::{CharacterClass, Player},
};

/// Headless session with a fixed seed, persisting under `data_dir`.
pub fn headless_app(data_dir: &Path) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(GameConfig { data_dir: data_dir.to_path_buf(), ..default() })
        .insert_resource(GameRng::seeded(7))
        .add_plugins(GamePlugin);
    app.update();
    app
}

/// Headless session already in combat with `class` bound.
pub fn combat_app(data_dir: &Path, class: CharacterClass) -> App {
    let mut app = headless_app(data_dir);
    app.world.send_event(ClassChosen(class));
    app.update();
    app.update();
    assert_eq!(phase(&app), RunPhase::Combat);
    app
}

pub fn phase(app: &App) -> RunPhase { *app.world.resource::<State<RunPhase>>().get() }

pub fn tick(app: &mut App) { app.world.run_schedule(FixedUpdate); }

pub fn player_entity(app: &mut App) -> Entity {
    app.world.query_filtered::<Entity, With<Player>>().single(&app.world)
}

pub fn spawn_test_enemy(app: &mut App, enemy: Enemy, health: Health, position: Vec2) -> Entity {
    let hitbox = enemy.hitbox();
    app.world.spawn((TransformBundle::from_transform(Transform::from_translation(position.extend(1.0))), hitbox, health, ActorState::default(), enemy)).id()
}

pub fn count<T: Component>(app: &mut App) -> usize {
    app.world.query_filtered::<(), With<T>>().iter(&app.world).count()
}
