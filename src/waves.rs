use bevy::prelude::*;
use rand::{seq::SliceRandom, Rng};
use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    clock::SessionClock,
    config::GameConfig,
    enemy::{spawn_enemy, Enemy, EnemyKind, RAGE_CHANCE},
    game::{GameRng, RunPhase, SimulationSet, StartWaveRequested},
    player::{CharacterClass, Player},
    projectiles::{EnemyProjectile, Projectile},
};

pub const BASE_ENEMY_COUNT: u32 = 3;
pub const INTRO_WAVES: u32 = 5;
pub const BOSS_WAVE: u32 = 10;
const SPAWN_MARGIN_MIN: f32 = 50.0;
const SPAWN_MARGIN_MAX: f32 = 150.0;
const BOSS_ENTRY_DEPTH: f32 = 150.0;
const BOSS_SPAWN_HEIGHT: f32 = 100.0;

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct WaveDirector {
    pub wave: u32,
    pub in_progress: bool,
    seen_enemies: bool,
}

impl WaveDirector {
    pub fn can_start(&self, live_enemies: usize) -> bool { !self.in_progress && live_enemies == 0 }

    pub fn begin_next(&mut self) -> u32 {
        self.wave += 1;
        self.in_progress = true;
        self.seen_enemies = false;
        self.wave
    }

    /// Feeds the live enemy count. True on the tick the wave clears: empty after having been non-empty.
    pub fn observe(&mut self, live_enemies: usize) -> bool {
        if !self.in_progress { return false; }
        if live_enemies > 0 { self.seen_enemies = true; return false; }
        if !self.seen_enemies { return false; }
        self.in_progress = false;
        self.seen_enemies = false;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder { pub kind: EnemyKind, pub boss: bool }

pub fn enemy_count(wave: u32) -> u32 { BASE_ENEMY_COUNT + wave }

/// Who spawns in `wave`. The boss wave ignores the count formula entirely.
pub fn wave_composition(wave: u32, class: CharacterClass, rng: &mut impl Rng) -> Vec<SpawnOrder> {
    if wave == BOSS_WAVE { return vec![SpawnOrder { kind: EnemyKind::boss(class), boss: true }]; }
    let pool = EnemyKind::pool(class);
    let fixed = (1..=INTRO_WAVES).contains(&wave).then(|| pool.get(wave as usize - 1).copied()).flatten();
    (0..enemy_count(wave))
        .filter_map(|_| fixed.or_else(|| pool.choose(rng).copied()))
        .map(|kind| SpawnOrder { kind, boss: false })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge { Left, Right, Top, Bottom }

/// A point just outside one playfield edge, with a random offset along it.
pub fn spawn_point(field: Rect, rng: &mut impl Rng) -> Vec2 {
    let edge = *[Edge::Left, Edge::Right, Edge::Top, Edge::Bottom].choose(rng).unwrap_or(&Edge::Top);
    let depth = rng.gen_range(SPAWN_MARGIN_MIN..=SPAWN_MARGIN_MAX);
    let along_x = rng.gen_range(field.min.x..=field.max.x);
    let along_y = rng.gen_range(field.min.y..=field.max.y);
    match edge {
        Edge::Left => Vec2::new(field.min.x - depth, along_y),
        Edge::Right => Vec2::new(field.max.x + depth, along_y),
        Edge::Top => Vec2::new(along_x, field.max.y + depth),
        Edge::Bottom => Vec2::new(along_x, field.min.y - depth),
    }
}

pub struct WavesPlugin;

impl Plugin for WavesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveDirector>()
            .add_systems(Update, start_wave_system.run_if(in_state(RunPhase::Combat)))
            .add_systems(FixedUpdate, wave_clear_system.in_set(SimulationSet::Waves));
    }
}

fn start_wave_system(
    mut commands: Commands,
    mut events: EventReader<StartWaveRequested>,
    mut director: ResMut<WaveDirector>,
    mut rng: ResMut<GameRng>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    player_query: Query<&Player>,
    enemy_query: Query<(), With<Enemy>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    if events.read().count() == 0 { return; }
    let Some(class) = player_query.get_single().ok().and_then(|player| player.class) else { return };
    if !director.can_start(enemy_query.iter().count()) { return; }
    let wave = director.begin_next();
    let now = clock.now();
    let field = config.playfield();
    let orders = wave_composition(wave, class, &mut rng.0);
    for order in orders.iter() {
        if order.boss {
            let half = config.half_extents();
            let (enemy, health) = Enemy::boss(order.kind, now, Vec2::new(0.0, half.y - BOSS_ENTRY_DEPTH));
            spawn_enemy(&mut commands, enemy, health, Vec2::new(0.0, half.y + BOSS_SPAWN_HEIGHT));
        } else {
            let (mut enemy, mut health) = Enemy::new(order.kind, now);
            if rng.0.gen_bool(RAGE_CHANCE) { enemy.activate_rage(&mut health); }
            spawn_enemy(&mut commands, enemy, health, spawn_point(field, &mut rng.0));
        }
    }
    if orders.is_empty() {
        warn!("wave {wave} produced no enemies");
        director.in_progress = false;
    }
    sound.send(PlaySoundEvent(SoundEffect::WaveStart));
    info!("wave {wave} started with {} enemies", orders.len());
}

fn wave_clear_system(
    mut commands: Commands,
    mut director: ResMut<WaveDirector>,
    enemy_query: Query<(), With<Enemy>>,
    projectile_query: Query<Entity, Or<(With<Projectile>, With<EnemyProjectile>)>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    if !director.observe(enemy_query.iter().count()) { return; }
    for entity in projectile_query.iter() { commands.entity(entity).despawn_recursive(); }
    sound.send(PlaySoundEvent(SoundEffect::WaveClear));
    info!("wave {} cleared", director.wave);
}
