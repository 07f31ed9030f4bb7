use bevy::prelude::*;
use wavebound::{
    config::{GameConfig, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH},
    game::GamePlugin,
    PresentationPlugins,
};

fn main() {
    let config = GameConfig::from_env();
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Wavebound".into(),
                resolution: (PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins((GamePlugin, PresentationPlugins))
        .run();
}
