use bevy::prelude::*;
use crate::{
    clock::SessionClock,
    components::{ActorState, Facing, Health, Hitbox},
    config::GameConfig,
    enemy::Enemy,
    player::{Player, PLAYER_COLOR},
    weapons::{SwingHitbox, Weapon},
};

const FLASH_COLOR: Color = Color::rgb(1.0, 0.3, 0.3);
const SLOW_TINT: Color = Color::rgb(0.5, 0.7, 1.0);
const RAGE_TINT: Color = Color::rgb(1.0, 0.45, 0.2);
const SHIELD_TINT: Color = Color::rgb(0.6, 0.9, 1.0);
const ARENA_COLOR: Color = Color::rgb(0.12, 0.1, 0.08);
const SWING_OUTLINE: Color = Color::rgba(1.0, 1.0, 1.0, 0.6);
const HEALTH_BAR_HEIGHT: f32 = 5.0;
const HEALTH_BAR_GAP: f32 = 8.0;

/// Tints and flips the placeholder sprites from simulation state and draws debug overlays.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_arena)
            .add_systems(Update, (tint_player, tint_enemies, draw_swing_hitboxes, draw_enemy_health_bars));
    }
}

fn spawn_arena(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: ARENA_COLOR, custom_size: Some(Vec2::new(config.width, config.height)), ..default() },
            transform: Transform::from_xyz(0.0, 0.0, -10.0),
            ..default()
        },
        Name::new("Arena"),
    ));
}

fn tint(base: Color, over: Color, amount: f32) -> Color {
    let [r, g, b, a] = base.as_rgba_f32();
    let [or, og, ob, _] = over.as_rgba_f32();
    Color::rgba(r + (or - r) * amount, g + (og - g) * amount, b + (ob - b) * amount, a)
}

fn tint_player(clock: Res<SessionClock>, mut query: Query<(&ActorState, Option<&Weapon>, &mut Sprite), With<Player>>) {
    let now = clock.now();
    for (actor, weapon, mut sprite) in query.iter_mut() {
        sprite.flip_x = actor.facing == Facing::Left;
        sprite.color = if actor.is_flashing(now) {
            FLASH_COLOR
        } else if weapon.map_or(false, |w| w.shield_active(now)) {
            tint(PLAYER_COLOR, SHIELD_TINT, 0.6)
        } else {
            PLAYER_COLOR
        };
    }
}

fn tint_enemies(clock: Res<SessionClock>, mut query: Query<(&Enemy, &ActorState, &mut Sprite, &mut Visibility)>) {
    let now = clock.now();
    for (enemy, actor, mut sprite, mut visibility) in query.iter_mut() {
        sprite.flip_x = actor.facing == Facing::Left;
        *visibility = if enemy.visible() { Visibility::Inherited } else { Visibility::Hidden };
        let base = enemy.kind.stats().color;
        sprite.color = if actor.is_flashing(now) {
            Color::WHITE
        } else if enemy.is_slowed() {
            tint(base, SLOW_TINT, 0.5)
        } else if enemy.enraged {
            tint(base, RAGE_TINT, 0.5)
        } else {
            base
        };
    }
}

fn draw_swing_hitboxes(mut gizmos: Gizmos, clock: Res<SessionClock>, query: Query<(&SwingHitbox, &Transform, &Hitbox)>) {
    for (swing, transform, hitbox) in query.iter() {
        if !swing.is_active(clock.now()) { continue; }
        gizmos.rect_2d(transform.translation.truncate(), 0.0, hitbox.0, SWING_OUTLINE);
    }
}

fn draw_enemy_health_bars(mut gizmos: Gizmos, query: Query<(&Enemy, &Health, &Transform)>) {
    for (enemy, health, transform) in query.iter() {
        if !enemy.visible() { continue; }
        let width = enemy.size.x;
        let origin = transform.translation.truncate() + Vec2::new(-width / 2.0, enemy.size.y / 2.0 + HEALTH_BAR_GAP);
        let filled = width * health.ratio();
        let color = if enemy.invulnerable { Color::GRAY } else { Color::RED };
        gizmos.line_2d(origin, origin + Vec2::X * width, Color::DARK_GRAY);
        for row in 0..HEALTH_BAR_HEIGHT as i32 {
            let start = origin + Vec2::Y * row as f32;
            gizmos.line_2d(start, start + Vec2::X * filled, color);
        }
    }
}
