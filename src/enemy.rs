use bevy::prelude::*;
use rand::Rng;
use crate::{
    clock::SessionClock,
    components::{ActorState, CreditPause, Health, Hitbox},
    config::{GameConfig, TICKS_PER_SECOND},
    game::SimulationSet,
    player::{CharacterClass, Player},
    projectiles::{spawn_enemy_projectile, EnemyShotKind},
};

pub const ENEMY_FLASH_MS: u64 = 100;
pub const RAGE_CHANCE: f64 = 0.1;
pub const RAGE_SPEED_MULTIPLIER: f32 = 1.5;
pub const RAGE_HEALTH_MULTIPLIER: f32 = 1.5;
pub const TRANSFORM_THRESHOLD: f32 = 0.3;
pub const TRANSFORM_DURATION_MS: u64 = 3_000;
pub const ENRAGED_RESISTANCE: f32 = 0.3;
pub const SKILL_COOLDOWN_MS: u64 = 8_000;
pub const CAST_INTERVAL_MS: u64 = 600;
pub const CASTS_PER_SKILL: u32 = 3;
pub const SLAM_DIRECTIONS: u32 = 8;
pub const SLAM_JITTER_DEGREES: f32 = 15.0;
pub const BOSS_HEALTH_MULTIPLIER: f32 = 5.0;
pub const BOSS_DAMAGE_MULTIPLIER: f32 = 2.0;
pub const BOSS_EXP_MULTIPLIER: u32 = 10;
pub const BOSS_SCALE: f32 = 2.0;
const RANGED_HOLD_BAND: f32 = 25.0;
const HITBOX_SCALE: f32 = 0.8;
const ENEMY_Z: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind { Cactling, Thornback, Swooper, Spitter, Bramble, Brute, Scrapper, Sniper, Duelist, Bulwark }

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedProfile { pub cooldown_ms: u64, pub preferred_distance: f32 }

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats { pub health: f32, pub damage: f32, pub speed: f32, pub exp: u32, pub size: Vec2, pub ranged: Option<RangedProfile>, pub color: Color }

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        let s = |health: f32, damage: f32, speed: f32, exp: u32, w: f32, h: f32, color: Color| EnemyStats { health, damage, speed, exp, size: Vec2::new(w, h), ranged: None, color };
        match self {
            EnemyKind::Cactling => s(50.0, 10.0, 2.5, 20, 45.0, 60.0, Color::rgb(0.3, 0.7, 0.3)),
            EnemyKind::Thornback => s(80.0, 15.0, 2.0, 30, 55.0, 70.0, Color::rgb(0.25, 0.55, 0.2)),
            EnemyKind::Swooper => s(40.0, 8.0, 3.2, 25, 70.0, 50.0, Color::rgb(0.6, 0.6, 0.75)),
            EnemyKind::Spitter => EnemyStats { ranged: Some(RangedProfile { cooldown_ms: 2_500, preferred_distance: 350.0 }), ..s(60.0, 10.0, 1.8, 25, 70.0, 50.0, Color::rgb(0.7, 0.5, 0.8)) },
            EnemyKind::Bramble => s(150.0, 20.0, 1.5, 50, 70.0, 85.0, Color::rgb(0.4, 0.5, 0.15)),
            EnemyKind::Brute => s(180.0, 25.0, 2.0, 60, 70.0, 90.0, Color::rgb(0.75, 0.3, 0.25)),
            EnemyKind::Scrapper => s(50.0, 10.0, 2.5, 20, 55.0, 75.0, Color::rgb(0.8, 0.55, 0.3)),
            EnemyKind::Sniper => EnemyStats { ranged: Some(RangedProfile { cooldown_ms: 3_000, preferred_distance: 450.0 }), ..s(60.0, 5.0, 1.2, 30, 55.0, 75.0, Color::rgb(0.85, 0.45, 0.6)) },
            EnemyKind::Duelist => s(120.0, 20.0, 1.8, 35, 55.0, 80.0, Color::rgb(0.55, 0.35, 0.7)),
            EnemyKind::Bulwark => s(250.0, 15.0, 1.0, 50, 80.0, 90.0, Color::rgb(0.45, 0.45, 0.5)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Cactling => "Cactling", EnemyKind::Thornback => "Thornback", EnemyKind::Swooper => "Swooper",
            EnemyKind::Spitter => "Spitter", EnemyKind::Bramble => "Bramble", EnemyKind::Brute => "Brute",
            EnemyKind::Scrapper => "Scrapper", EnemyKind::Sniper => "Sniper", EnemyKind::Duelist => "Duelist", EnemyKind::Bulwark => "Bulwark",
        }
    }

    /// Archetype pool faced by a class; introductory waves walk it in order.
    pub fn pool(class: CharacterClass) -> [EnemyKind; 5] {
        match class {
            CharacterClass::Gunslinger => [EnemyKind::Cactling, EnemyKind::Thornback, EnemyKind::Swooper, EnemyKind::Spitter, EnemyKind::Bramble],
            CharacterClass::Blademaster => [EnemyKind::Brute, EnemyKind::Scrapper, EnemyKind::Sniper, EnemyKind::Duelist, EnemyKind::Bulwark],
        }
    }

    pub fn boss(class: CharacterClass) -> EnemyKind {
        match class { CharacterClass::Gunslinger => EnemyKind::Bramble, CharacterClass::Blademaster => EnemyKind::Brute }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowEffect { pub factor: f32, pub until: u64 }

/// Mutually exclusive enemy activity. Status effects tick alongside whichever is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Entering { target: Vec2 },
    Moving,
    Transforming { started_at: u64 },
    Casting { casts_done: u32, last_cast_at: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedAttack { pub profile: RangedProfile, pub last_shot_at: u64 }

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub is_boss: bool,
    pub enraged: bool,
    pub damage: f32,
    /// Current movement per tick, with any slow applied.
    pub speed: f32,
    pub original_speed: f32,
    pub exp_value: u32,
    pub damage_resistance: f32,
    pub invulnerable: bool,
    pub activity: Activity,
    pub slow: Option<SlowEffect>,
    pub last_skill_at: u64,
    pub ranged: Option<RangedAttack>,
    pub size: Vec2,
    heal_per_second: f32,
    flicker_ticks: u32,
}

/// What one tick of behaviour produced for the caller to apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyIntent { pub position: Vec2, pub shots: Vec<(Vec2, EnemyShotKind)> }

impl Enemy {
    pub fn new(kind: EnemyKind, now: u64) -> (Self, Health) {
        let stats = kind.stats();
        let enemy = Self {
            kind, is_boss: false, enraged: false, damage: stats.damage, speed: stats.speed, original_speed: stats.speed,
            exp_value: stats.exp, damage_resistance: 0.0, invulnerable: false, activity: Activity::Moving, slow: None,
            last_skill_at: now, ranged: stats.ranged.map(|profile| RangedAttack { profile, last_shot_at: now }),
            size: stats.size, heal_per_second: 0.0, flicker_ticks: 0,
        };
        (enemy, Health::new(stats.health))
    }

    /// Boss variant of `kind`: scaled stats, and an entrance walk toward `entry_target`.
    pub fn boss(kind: EnemyKind, now: u64, entry_target: Vec2) -> (Self, Health) {
        let (mut enemy, health) = Self::new(kind, now);
        enemy.is_boss = true;
        enemy.damage *= BOSS_DAMAGE_MULTIPLIER;
        enemy.exp_value *= BOSS_EXP_MULTIPLIER;
        enemy.size *= BOSS_SCALE;
        enemy.ranged = None;
        enemy.activity = Activity::Entering { target: entry_target };
        (enemy, Health::new(health.max * BOSS_HEALTH_MULTIPLIER))
    }

    pub fn hitbox(&self) -> Hitbox { Hitbox(self.size * HITBOX_SCALE) }
    pub fn is_entering(&self) -> bool { matches!(self.activity, Activity::Entering { .. }) }
    pub fn is_transforming(&self) -> bool { matches!(self.activity, Activity::Transforming { .. }) }
    pub fn is_casting(&self) -> bool { matches!(self.activity, Activity::Casting { .. }) }
    pub fn is_slowed(&self) -> bool { self.slow.is_some() }
    /// False on the "off" frames of the transformation flicker.
    pub fn visible(&self) -> bool { !self.is_transforming() || self.flicker_ticks % 10 >= 5 }

    /// Slows by `factor` for `duration_ms`. Ignored while a slow is already running.
    pub fn apply_slow(&mut self, factor: f32, duration_ms: u64, now: u64) {
        if self.slow.is_some() { return; }
        self.slow = Some(SlowEffect { factor, until: now + duration_ms });
        self.speed = self.original_speed * (1.0 - factor);
    }

    pub fn tick_status(&mut self, now: u64) {
        if let Some(slow) = self.slow {
            if now >= slow.until { self.slow = None; self.speed = self.original_speed; }
        }
    }

    /// Permanent buff, applied at most once: faster, and the boosted health becomes the new max.
    pub fn activate_rage(&mut self, health: &mut Health) {
        if self.enraged { return; }
        self.enraged = true;
        self.original_speed *= RAGE_SPEED_MULTIPLIER;
        self.speed = match self.slow { Some(slow) => self.original_speed * (1.0 - slow.factor), None => self.original_speed };
        let boosted = (health.current * RAGE_HEALTH_MULTIPLIER).floor();
        *health = Health { current: boosted, max: boosted };
    }

    /// Returns true when the hit killed the enemy. A boss about to drop to the
    /// transform threshold absorbs the hit instead and starts transforming.
    pub fn take_damage(&mut self, health: &mut Health, actor: &mut ActorState, amount: f32, now: u64) -> bool {
        if self.invulnerable || self.is_transforming() { return false; }
        if self.is_boss && !self.enraged && health.max > 0.0 && (health.current - amount) / health.max <= TRANSFORM_THRESHOLD {
            self.start_transformation(health, now);
            return false;
        }
        health.lose(amount * (1.0 - self.damage_resistance));
        actor.flash(now, ENEMY_FLASH_MS);
        health.is_depleted()
    }

    fn start_transformation(&mut self, health: &Health, now: u64) {
        self.invulnerable = true;
        self.activity = Activity::Transforming { started_at: now };
        self.heal_per_second = health.max / 3.0;
        self.flicker_ticks = 0;
    }

    fn tick_transformation(&mut self, health: &mut Health, started_at: u64, now: u64) {
        health.current = (health.current + self.heal_per_second / TICKS_PER_SECOND as f32).min(health.max);
        self.flicker_ticks += 1;
        if now.saturating_sub(started_at) > TRANSFORM_DURATION_MS {
            health.current = health.max;
            self.damage_resistance = ENRAGED_RESISTANCE;
            self.invulnerable = false;
            self.activity = Activity::Moving;
            self.last_skill_at = now;
            self.activate_rage(health);
            info!("{} finished transforming and is enraged", self.kind.name());
        }
    }

    /// Runs one tick of the state machine and movement AI.
    pub fn think(&mut self, health: &mut Health, position: Vec2, player: Vec2, now: u64, field: Rect, rng: &mut impl Rng) -> EnemyIntent {
        self.tick_status(now);
        let mut intent = EnemyIntent { position, shots: Vec::new() };
        match self.activity {
            Activity::Entering { target } => {
                let offset = target - position;
                let distance = offset.length();
                if distance > self.speed { intent.position = position + offset / distance * self.speed; }
                else { intent.position = target; self.activity = Activity::Moving; }
            }
            Activity::Transforming { started_at } => self.tick_transformation(health, started_at, now),
            Activity::Casting { casts_done, last_cast_at } => {
                if casts_done < CASTS_PER_SKILL && now.saturating_sub(last_cast_at) > CAST_INTERVAL_MS {
                    intent.shots = ground_slam(rng.gen_range(-SLAM_JITTER_DEGREES..=SLAM_JITTER_DEGREES));
                    self.activity = Activity::Casting { casts_done: casts_done + 1, last_cast_at: now };
                } else if casts_done >= CASTS_PER_SKILL {
                    self.activity = Activity::Moving;
                    self.last_skill_at = now;
                }
            }
            Activity::Moving => {
                if self.is_boss && now.saturating_sub(self.last_skill_at) > SKILL_COOLDOWN_MS {
                    self.activity = Activity::Casting { casts_done: 0, last_cast_at: now };
                }
                match self.ranged {
                    Some(_) => self.keep_distance(&mut intent, player, now, field),
                    None => intent.position = position + (player - position).normalize_or_zero() * self.speed,
                }
            }
        }
        intent
    }

    fn keep_distance(&mut self, intent: &mut EnemyIntent, player: Vec2, now: u64, field: Rect) {
        let Some(ranged) = self.ranged.as_mut() else { return };
        let position = intent.position;
        let half = self.size / 2.0;
        let inner = Rect { min: field.min + half, max: field.max - half };
        if !inner.contains(position) {
            // Walk in from the spawn edge before holding range or firing.
            let entry = position.clamp(inner.min, inner.max);
            let offset = entry - position;
            let distance = offset.length();
            intent.position = if distance > self.speed { position + offset / distance * self.speed } else { entry };
            return;
        }
        let offset = player - position;
        let distance = offset.length();
        if distance > 0.0 {
            let heading = offset / distance;
            let preferred = ranged.profile.preferred_distance;
            if distance < preferred - RANGED_HOLD_BAND { intent.position -= heading * self.speed; }
            else if distance > preferred + RANGED_HOLD_BAND { intent.position += heading * self.speed; }
            if now.saturating_sub(ranged.last_shot_at) > ranged.profile.cooldown_ms {
                ranged.last_shot_at = now;
                intent.shots.push((heading, EnemyShotKind::Bolt));
            }
        }
        intent.position = intent.position.clamp(inner.min, inner.max);
    }
}

impl CreditPause for Enemy {
    fn credit_pause(&mut self, paused_ms: u64) {
        self.last_skill_at.credit_pause(paused_ms);
        if let Some(slow) = self.slow.as_mut() { slow.until.credit_pause(paused_ms); }
        if let Some(ranged) = self.ranged.as_mut() { ranged.last_shot_at.credit_pause(paused_ms); }
        match &mut self.activity {
            Activity::Transforming { started_at } => started_at.credit_pause(paused_ms),
            Activity::Casting { last_cast_at, .. } => last_cast_at.credit_pause(paused_ms),
            Activity::Entering { .. } | Activity::Moving => {}
        }
    }
}

/// Eight evenly spaced shard headings, rotated together by `jitter_degrees`.
pub fn ground_slam(jitter_degrees: f32) -> Vec<(Vec2, EnemyShotKind)> {
    (0..SLAM_DIRECTIONS)
        .map(|i| {
            let angle = (i as f32 * 360.0 / SLAM_DIRECTIONS as f32 + jitter_degrees).to_radians();
            (Vec2::new(angle.cos(), angle.sin()), EnemyShotKind::Shard)
        })
        .collect()
}

pub fn spawn_enemy(commands: &mut Commands, enemy: Enemy, health: Health, position: Vec2) {
    let color = enemy.kind.stats().color;
    let name = Name::new(if enemy.is_boss { format!("Boss {}", enemy.kind.name()) } else { enemy.kind.name().to_string() });
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color, custom_size: Some(enemy.size), ..default() },
            transform: Transform::from_translation(position.extend(ENEMY_Z)),
            ..default()
        },
        enemy.hitbox(), health, ActorState::default(), enemy, name,
    ));
}

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, enemy_behavior_system.in_set(SimulationSet::Enemies));
    }
}

fn enemy_behavior_system(
    mut commands: Commands,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    mut rng: ResMut<crate::game::GameRng>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&mut Enemy, &mut Health, &mut ActorState, &mut Transform)>,
) {
    let Ok(player_transform) = player_query.get_single() else { return };
    let player = player_transform.translation.truncate();
    let now = clock.now();
    let field = config.playfield();
    for (mut enemy, mut health, mut actor, mut transform) in enemy_query.iter_mut() {
        let position = transform.translation.truncate();
        let intent = enemy.think(&mut health, position, player, now, field, &mut rng.0);
        transform.translation = intent.position.extend(transform.translation.z);
        actor.face_towards(intent.position, player);
        actor.expire_flash(now);
        for (direction, kind) in intent.shots {
            spawn_enemy_projectile(&mut commands, intent.position, direction, kind);
        }
    }
}
