pub mod audio;
pub mod camera_systems;
pub mod clock;
pub mod combat;
pub mod components;
pub mod config;
pub mod enemy;
pub mod game;
pub mod input;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod projectiles;
pub mod render;
pub mod ui;
pub mod upgrades;
pub mod visual_effects;
pub mod waves;
pub mod weapons;

use bevy::app::{PluginGroup, PluginGroupBuilder};

/// Everything that needs a window, a GPU or an audio device.
pub struct PresentationPlugins;

impl PluginGroup for PresentationPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(camera_systems::CameraSystemsPlugin)
            .add(input::InputCapturePlugin)
            .add(render::RenderPlugin)
            .add(visual_effects::LabelRenderPlugin)
            .add(audio::GameAudioPlugin)
            .add(ui::UiPlugin)
    }
}
