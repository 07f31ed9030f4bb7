use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use crate::{
    audio::{AudioEventsPlugin, MusicEvent, PlaySoundEvent, SoundEffect},
    clock::{SessionClock, SessionClockPlugin},
    combat::{CombatPlugin, ScreenShake},
    components::{ActorState, CreditPause},
    config::{GameConfig, TICKS_PER_SECOND},
    enemy::{Enemy, EnemyPlugin},
    input::InputSnapshot,
    persistence::HighScoreStore,
    player::{CharacterClass, Player, PlayerPlugin},
    progression::{ProgressionPlugin, RewardOffer},
    projectiles::{EnemyProjectile, Projectile, ProjectilesPlugin},
    visual_effects::{FloatingLabel, VisualEffectsPlugin},
    waves::{WaveDirector, WavesPlugin},
    weapons::{RangedTuning, SwingHitbox, Weapon},
};

pub const GAME_MODE: &str = "roguelite";

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    #[default]
    SelectingClass,
    Combat,
    RewardChoice,
    Paused,
    GameOver,
}

/// Per-tick simulation stages, run in this order inside `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet { Player, Enemies, Projectiles, Combat, Progression, Waves, Feedback }

#[derive(Resource, Debug, Default, Clone)]
pub struct GameState { pub score: u32, pub high_score: u32 }

#[derive(Resource)]
pub struct GameRng(pub StdRng);
impl Default for GameRng { fn default() -> Self { Self(StdRng::from_entropy()) } }
impl GameRng { pub fn seeded(seed: u64) -> Self { Self(StdRng::seed_from_u64(seed)) } }

#[derive(Event, Debug, Clone, Copy)] pub struct ClassChosen(pub CharacterClass);
#[derive(Event, Debug, Clone, Copy)] pub struct PowerUpChosen(pub usize);
#[derive(Event, Debug, Clone, Copy, Default)] pub struct StartWaveRequested;
#[derive(Event, Debug, Clone, Copy, Default)] pub struct PauseToggled;
#[derive(Event, Debug, Clone, Copy, Default)] pub struct RestartRequested;

/// Simulation ticks only in combat, and not on a tick where a phase change is already queued.
pub fn simulation_active(phase: Res<State<RunPhase>>, next: Res<NextState<RunPhase>>) -> bool {
    *phase.get() == RunPhase::Combat && next.0.is_none()
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        let config = app.world.get_resource::<GameConfig>().cloned().unwrap_or_else(GameConfig::from_env);
        app.insert_resource(HighScoreStore::new(config.data_dir.clone()))
            .insert_resource(config)
            .insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND))
            .init_state::<RunPhase>()
            .init_resource::<GameState>()
            .init_resource::<InputSnapshot>()
            .add_event::<ClassChosen>().add_event::<PowerUpChosen>().add_event::<StartWaveRequested>()
            .add_event::<PauseToggled>().add_event::<RestartRequested>();
        if !app.world.contains_resource::<GameRng>() { app.init_resource::<GameRng>(); }
        app.configure_sets(FixedUpdate, (
                SimulationSet::Player, SimulationSet::Enemies, SimulationSet::Projectiles, SimulationSet::Combat,
                SimulationSet::Progression, SimulationSet::Waves, SimulationSet::Feedback,
            ).chain().run_if(simulation_active))
            .add_plugins((SessionClockPlugin, AudioEventsPlugin, PlayerPlugin, EnemyPlugin, ProjectilesPlugin, CombatPlugin, ProgressionPlugin, WavesPlugin, VisualEffectsPlugin))
            .add_systems(Startup, load_high_score)
            .add_systems(OnEnter(RunPhase::Combat), clear_stale_special)
            .add_systems(OnEnter(RunPhase::RewardChoice), begin_pause)
            .add_systems(OnExit(RunPhase::RewardChoice), credit_paused_time)
            .add_systems(OnEnter(RunPhase::Paused), begin_pause)
            .add_systems(OnExit(RunPhase::Paused), credit_paused_time)
            .add_systems(OnEnter(RunPhase::GameOver), finish_run)
            .add_systems(Update, (
                handle_pause_toggle.run_if(in_state(RunPhase::Combat).or_else(in_state(RunPhase::Paused))),
                handle_restart.run_if(in_state(RunPhase::Paused).or_else(in_state(RunPhase::GameOver))),
            ));
    }
}

fn load_high_score(store: Res<HighScoreStore>, mut game_state: ResMut<GameState>) {
    game_state.high_score = store.load_high_score(GAME_MODE);
}

fn clear_stale_special(mut input: ResMut<InputSnapshot>) { input.special_triggered = false; }

fn begin_pause(mut clock: ResMut<SessionClock>) { clock.begin_pause(); }

/// Shifts every stored wall-clock timestamp forward by the pause that just ended.
pub fn credit_paused_time(
    mut clock: ResMut<SessionClock>,
    mut players: Query<&mut Player>,
    mut weapons: Query<&mut Weapon>,
    mut enemies: Query<&mut Enemy>,
    mut swings: Query<&mut SwingHitbox>,
    mut actors: Query<&mut ActorState>,
    mut labels: Query<&mut FloatingLabel>,
) {
    let paused_ms = clock.end_pause();
    if paused_ms == 0 { return; }
    debug!("crediting {paused_ms} ms of paused time");
    for mut player in players.iter_mut() { player.credit_pause(paused_ms); }
    for mut weapon in weapons.iter_mut() { weapon.credit_pause(paused_ms); }
    for mut enemy in enemies.iter_mut() { enemy.credit_pause(paused_ms); }
    for mut swing in swings.iter_mut() { swing.credit_pause(paused_ms); }
    for mut actor in actors.iter_mut() { actor.credit_pause(paused_ms); }
    for mut label in labels.iter_mut() { label.credit_pause(paused_ms); }
}

fn handle_pause_toggle(mut events: EventReader<PauseToggled>, phase: Res<State<RunPhase>>, mut next_phase: ResMut<NextState<RunPhase>>) {
    if events.read().count() == 0 || next_phase.0.is_some() { return; }
    match phase.get() {
        RunPhase::Combat => next_phase.set(RunPhase::Paused),
        RunPhase::Paused => next_phase.set(RunPhase::Combat),
        _ => {}
    }
}

fn finish_run(mut store: ResMut<HighScoreStore>, mut scores: ResMut<GameState>, mut music: EventWriter<MusicEvent>, mut sound: EventWriter<PlaySoundEvent>) {
    info!("game over with score {}", scores.score);
    music.send(MusicEvent::Stop);
    sound.send(PlaySoundEvent(SoundEffect::GameOver));
    if scores.score > scores.high_score {
        scores.high_score = scores.score;
        match store.save_high_score(GAME_MODE, scores.score) {
            Ok(()) => info!("new high score {} saved", scores.score),
            Err(error) => warn!("could not save high score: {error}"),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_restart(
    mut commands: Commands,
    mut events: EventReader<RestartRequested>,
    mut next_phase: ResMut<NextState<RunPhase>>,
    mut game_state: ResMut<GameState>,
    mut director: ResMut<WaveDirector>,
    mut offer: ResMut<RewardOffer>,
    mut tuning: ResMut<RangedTuning>,
    mut shake: ResMut<ScreenShake>,
    mut music: EventWriter<MusicEvent>,
    session_entities: Query<Entity, Or<(With<Player>, With<Enemy>, With<Projectile>, With<EnemyProjectile>, With<SwingHitbox>, With<FloatingLabel>)>>,
) {
    if events.read().count() == 0 { return; }
    for entity in session_entities.iter() { commands.entity(entity).despawn_recursive(); }
    game_state.score = 0;
    *director = WaveDirector::default();
    *offer = RewardOffer::default();
    *tuning = RangedTuning::default();
    *shake = ScreenShake::default();
    music.send(MusicEvent::Stop);
    info!("run restarted");
    next_phase.set(RunPhase::SelectingClass);
}
