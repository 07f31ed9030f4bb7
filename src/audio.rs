use bevy::prelude::*;
use crate::config::GameConfig;

#[derive(Event, Debug, Clone, Copy)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    MenuConfirm,
    Shot,
    Swing,
    Special,
    EnemyHit,
    EnemyDeath,
    BossTransform,
    PlayerHit,
    LevelUp,
    WaveStart,
    WaveClear,
    GameOver,
}

impl SoundEffect {
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::MenuConfirm => "audio/menu_confirm.ogg",
            SoundEffect::Shot => "audio/shot.ogg",
            SoundEffect::Swing => "audio/swing.ogg",
            SoundEffect::Special => "audio/special.ogg",
            SoundEffect::EnemyHit => "audio/enemy_hit.ogg",
            SoundEffect::EnemyDeath => "audio/enemy_death.ogg",
            SoundEffect::BossTransform => "audio/boss_transform.ogg",
            SoundEffect::PlayerHit => "audio/player_hit.ogg",
            SoundEffect::LevelUp => "audio/level_up.ogg",
            SoundEffect::WaveStart => "audio/wave_start.ogg",
            SoundEffect::WaveClear => "audio/wave_clear.ogg",
            SoundEffect::GameOver => "audio/game_over.ogg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack { Combat }

impl MusicTrack {
    pub fn asset_path(self) -> &'static str {
        match self { MusicTrack::Combat => "audio/combat_theme.ogg" }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicEvent { Play(MusicTrack), Stop }

/// Registers the audio events so the simulation can emit them without an audio device.
pub struct AudioEventsPlugin;

impl Plugin for AudioEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>().add_event::<MusicEvent>();
    }
}

#[derive(Component)]
struct MusicPlayer;

/// Turns audio events into playing sounds.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (play_sound_system, music_system));
    }
}

fn play_sound_system(
    mut sound_events: EventReader<PlaySoundEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    for event in sound_events.read() {
        if !config.settings.sfx { continue; }
        commands.spawn(AudioBundle {
            source: asset_server.load(event.0.asset_path()),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

fn music_system(
    mut music_events: EventReader<MusicEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    playing: Query<Entity, With<MusicPlayer>>,
) {
    for event in music_events.read() {
        for entity in playing.iter() { commands.entity(entity).despawn_recursive(); }
        let MusicEvent::Play(track) = event else { continue };
        if !config.settings.music { continue; }
        commands.spawn((
            AudioBundle { source: asset_server.load(track.asset_path()), settings: PlaybackSettings::LOOP },
            MusicPlayer,
        ));
    }
}
