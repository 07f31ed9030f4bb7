use bevy::{prelude::*, utils::HashSet};
use crate::{
    components::{boxes_overlap, Hitbox},
    config::GameConfig,
    game::SimulationSet,
    weapons::{RangedTuning, ShotDescriptor},
};

pub const SHOT_SIZE: Vec2 = Vec2::new(30.0, 30.0);
pub const SHOT_HITBOX: Vec2 = Vec2::new(10.0, 10.0);
pub const FROST_SLOW_FACTOR: f32 = 0.75;
pub const FROST_SLOW_MS: u64 = 2_000;
const SHOT_COLOR: Color = Color::rgb(1.0, 0.85, 0.3);
const FROST_SHOT_COLOR: Color = Color::rgb(0.45, 0.8, 1.0);
const PROJECTILE_Z: f32 = 3.0;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, (advance_player_projectiles, advance_enemy_projectiles).in_set(SimulationSet::Projectiles));
    }
}

/// Player-fired projectile. Lives in the flat projectile collection, not on the weapon.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub pierce: u32,
    pub bounces: u32,
    /// Frozen shot: slows whatever it hits.
    pub slows: bool,
    pub already_hit: HashSet<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Pierce left; keeps flying on its current heading.
    Continue,
    /// Pierce ran out but a bounce redirected it.
    Retargeted(Vec2),
    Spent,
}

impl Projectile {
    pub fn from_shot(shot: &ShotDescriptor, tuning: &RangedTuning) -> Self {
        Self {
            direction: shot.direction.normalize_or_zero(), speed: tuning.speed, damage: tuning.damage,
            pierce: tuning.pierce.max(1), bounces: tuning.bounces, slows: shot.empowered, already_hit: HashSet::default(),
        }
    }

    pub fn step(&self) -> Vec2 { self.direction * self.speed }
    pub fn can_hit(&self, enemy: Entity) -> bool { !self.already_hit.contains(&enemy) }

    /// Consumes one pierce for `enemy`. When pierce runs out a remaining bounce
    /// retargets toward the nearest candidate not yet struck.
    pub fn register_hit(&mut self, enemy: Entity, position: Vec2, candidates: &[(Entity, Vec2)]) -> HitOutcome {
        self.already_hit.insert(enemy);
        self.pierce = self.pierce.saturating_sub(1);
        if self.pierce > 0 { return HitOutcome::Continue; }
        if self.bounces == 0 { return HitOutcome::Spent; }
        self.bounces -= 1;
        self.pierce = 1;
        let nearest = candidates.iter()
            .filter(|(candidate, _)| !self.already_hit.contains(candidate))
            .min_by(|(_, a), (_, b)| a.distance_squared(position).total_cmp(&b.distance_squared(position)));
        match nearest {
            Some((_, target)) => {
                let heading = (*target - position).normalize_or_zero();
                if heading != Vec2::ZERO { self.direction = heading; }
                HitOutcome::Retargeted(self.direction)
            }
            None => HitOutcome::Spent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyShotKind { Bolt, Shard }

impl EnemyShotKind {
    pub fn damage(self) -> f32 { match self { EnemyShotKind::Bolt => 10.0, EnemyShotKind::Shard => 15.0 } }
    pub fn speed(self) -> f32 { match self { EnemyShotKind::Bolt => 5.0, EnemyShotKind::Shard => 6.0 } }
    pub fn size(self) -> Vec2 { match self { EnemyShotKind::Bolt => Vec2::splat(15.0), EnemyShotKind::Shard => Vec2::splat(20.0) } }
    fn color(self) -> Color { match self { EnemyShotKind::Bolt => Color::rgb(0.9, 0.3, 0.9), EnemyShotKind::Shard => Color::rgb(0.8, 0.4, 0.2) } }
}

#[derive(Component, Debug, Clone)]
pub struct EnemyProjectile { pub kind: EnemyShotKind, pub direction: Vec2, pub speed: f32, pub damage: f32 }

pub fn spawn_player_projectile(commands: &mut Commands, shot: &ShotDescriptor, tuning: &RangedTuning) {
    let projectile = Projectile::from_shot(shot, tuning);
    let color = if projectile.slows { FROST_SHOT_COLOR } else { SHOT_COLOR };
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color, custom_size: Some(SHOT_SIZE), ..default() },
            transform: Transform::from_translation(shot.origin.extend(PROJECTILE_Z)).with_rotation(Quat::from_rotation_z(shot.direction.y.atan2(shot.direction.x))),
            ..default()
        },
        projectile, Hitbox(SHOT_HITBOX), Name::new("PlayerProjectile"),
    ));
}

pub fn spawn_enemy_projectile(commands: &mut Commands, origin: Vec2, direction: Vec2, kind: EnemyShotKind) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: kind.color(), custom_size: Some(kind.size()), ..default() },
            transform: Transform::from_translation(origin.extend(PROJECTILE_Z)),
            ..default()
        },
        EnemyProjectile { kind, direction: direction.normalize_or_zero(), speed: kind.speed(), damage: kind.damage() },
        Hitbox(kind.size()), Name::new("EnemyProjectile"),
    ));
}

fn outside_playfield(config: &GameConfig, position: Vec2, size: Vec2) -> bool {
    !boxes_overlap(config.playfield(), Rect::from_center_size(position, size))
}

fn advance_player_projectiles(mut commands: Commands, config: Res<GameConfig>, mut query: Query<(Entity, &Projectile, &mut Transform)>) {
    for (entity, projectile, mut transform) in query.iter_mut() {
        transform.translation += projectile.step().extend(0.0);
        if outside_playfield(&config, transform.translation.truncate(), SHOT_SIZE) { commands.entity(entity).despawn_recursive(); }
    }
}

fn advance_enemy_projectiles(mut commands: Commands, config: Res<GameConfig>, mut query: Query<(Entity, &EnemyProjectile, &mut Transform)>) {
    for (entity, projectile, mut transform) in query.iter_mut() {
        transform.translation += (projectile.direction * projectile.speed).extend(0.0);
        if outside_playfield(&config, transform.translation.truncate(), projectile.kind.size()) { commands.entity(entity).despawn_recursive(); }
    }
}
