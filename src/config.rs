use bevy::prelude::*;
use std::path::PathBuf;

pub const PLAYFIELD_WIDTH: f32 = 1100.0;
pub const PLAYFIELD_HEIGHT: f32 = 600.0;
pub const TICKS_PER_SECOND: f64 = 30.0;
pub const DATA_DIR_ENV: &str = "WAVEBOUND_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Player-facing toggles from the options screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings { pub music: bool, pub sfx: bool, pub shake: bool }
impl Default for Settings { fn default() -> Self { Self { music: true, sfx: true, shake: true } } }

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub settings: Settings,
    pub data_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { width: PLAYFIELD_WIDTH, height: PLAYFIELD_HEIGHT, settings: Settings::default(), data_dir: PathBuf::from(DEFAULT_DATA_DIR) }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() { config.data_dir = PathBuf::from(dir); }
        }
        config
    }

    /// Playfield rectangle in world space, centred on the origin.
    pub fn playfield(&self) -> Rect { Rect::from_center_size(Vec2::ZERO, Vec2::new(self.width, self.height)) }
    pub fn half_extents(&self) -> Vec2 { Vec2::new(self.width, self.height) / 2.0 }
}
