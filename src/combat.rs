use bevy::prelude::*;
use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    clock::SessionClock,
    components::{ActorState, Health, Hitbox},
    config::GameConfig,
    enemy::Enemy,
    game::{GameState, RunPhase, SimulationSet},
    player::{Player, CONTACT_IMMUNITY_MS},
    progression::{grant_experience, RewardOffer},
    projectiles::{EnemyProjectile, HitOutcome, Projectile, FROST_SLOW_FACTOR, FROST_SLOW_MS},
    visual_effects::{spawn_floating_label, LabelKind},
    weapons::{SwingHitbox, Weapon},
};

pub const SHAKE_TICKS: u32 = 15;
pub const BOSS_KILL_SPEED_BONUS: f32 = 5.0;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScreenShake { pub remaining_ticks: u32 }

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScreenShake>()
            .add_systems(FixedUpdate, (
                resolve_melee_hits,
                resolve_contact_damage,
                resolve_player_projectiles,
                resolve_enemy_projectiles,
                resolve_enemy_deaths,
                check_player_death,
            ).chain().in_set(SimulationSet::Combat))
            .add_systems(FixedUpdate, decay_screen_shake.in_set(SimulationSet::Feedback));
    }
}

type PlayerParts = (&'static mut Player, &'static mut Health, &'static mut ActorState, &'static Transform, &'static Hitbox, Option<&'static Weapon>);
type EnemyParts = (Entity, &'static mut Enemy, &'static mut Health, &'static mut ActorState, &'static Transform, &'static Hitbox);

/// Outcome of one player hit on one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike { pub dealt: f32, pub died: bool, pub began_transform: bool }

/// Applies `raw` damage through the enemy's own rules and reports what actually happened.
pub fn strike_enemy(enemy: &mut Enemy, health: &mut Health, actor: &mut ActorState, raw: f32, now: u64) -> Strike {
    let before = health.current;
    let was_transforming = enemy.is_transforming();
    let died = enemy.take_damage(health, actor, raw, now);
    let began_transform = !was_transforming && enemy.is_transforming();
    if began_transform { info!("{} absorbed the blow and began transforming", enemy.kind.name()); }
    Strike { dealt: (before - health.current).max(0.0), died, began_transform }
}

/// Heals by the life-steal share of `dealt`. Health moves fractionally; the label needs at least 1.
pub fn apply_life_steal(player: &Player, health: &mut Health, dealt: f32) -> f32 {
    health.heal(dealt * player.life_steal)
}

#[allow(clippy::too_many_arguments)]
fn report_strike(commands: &mut Commands, sound: &mut EventWriter<PlaySoundEvent>, strike: &Strike, enemy_pos: Vec2, player: &Player, player_health: &mut Health, player_pos: Vec2, now: u64) {
    if strike.began_transform { sound.send(PlaySoundEvent(SoundEffect::BossTransform)); }
    if strike.dealt <= 0.0 { return; }
    debug!("hit for {:.1}{}", strike.dealt, if strike.died { " (killed)" } else { "" });
    spawn_floating_label(commands, enemy_pos, strike.dealt, LabelKind::DamageDealt, now);
    sound.send(PlaySoundEvent(SoundEffect::EnemyHit));
    let healed = apply_life_steal(player, player_health, strike.dealt);
    if healed >= 1.0 { spawn_floating_label(commands, player_pos, healed, LabelKind::Heal, now); }
}

fn resolve_melee_hits(
    mut commands: Commands,
    clock: Res<SessionClock>,
    mut swing_query: Query<(&mut SwingHitbox, &Transform, &Hitbox)>,
    mut player_query: Query<PlayerParts, Without<Enemy>>,
    mut enemy_query: Query<EnemyParts, Without<Player>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    let Ok((player, mut player_health, _, player_transform, _, _)) = player_query.get_single_mut() else { return };
    if player_health.is_depleted() { return; }
    let now = clock.now();
    let player_pos = player_transform.translation.truncate();
    for (mut swing, swing_transform, swing_box) in swing_query.iter_mut() {
        if !swing.is_active(now) { continue; }
        let swing_pos = swing_transform.translation.truncate();
        for (entity, mut enemy, mut health, mut actor, transform, hitbox) in enemy_query.iter_mut() {
            let enemy_pos = transform.translation.truncate();
            if health.is_depleted() || !swing_box.overlaps(swing_pos, hitbox, enemy_pos) { continue; }
            if !swing.register(entity) { continue; }
            let strike = strike_enemy(&mut enemy, &mut health, &mut actor, swing.damage, now);
            report_strike(&mut commands, &mut sound, &strike, enemy_pos, &player, &mut player_health, player_pos, now);
        }
    }
}

fn resolve_contact_damage(
    mut commands: Commands,
    clock: Res<SessionClock>,
    mut player_query: Query<PlayerParts, Without<Enemy>>,
    enemy_query: Query<(&Enemy, &Health, &Transform, &Hitbox), Without<Player>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    let Ok((mut player, mut health, mut actor, transform, hitbox, weapon)) = player_query.get_single_mut() else { return };
    let now = clock.now();
    if health.is_depleted() || now < player.contact_immune_until { return; }
    let player_pos = transform.translation.truncate();
    let toucher = enemy_query.iter().find(|(_, enemy_health, enemy_transform, enemy_box)| {
        !enemy_health.is_depleted() && hitbox.overlaps(player_pos, enemy_box, enemy_transform.translation.truncate())
    });
    let Some((enemy, ..)) = toucher else { return };
    let shielded = weapon.map_or(false, |w| w.shield_active(now));
    let taken = player.take_damage(&mut health, &mut actor, enemy.damage, shielded, now);
    player.contact_immune_until = now + CONTACT_IMMUNITY_MS;
    spawn_floating_label(&mut commands, player_pos, taken, LabelKind::DamageTaken, now);
    if player.claim_hit_sound(now) { sound.send(PlaySoundEvent(SoundEffect::PlayerHit)); }
}

fn resolve_player_projectiles(
    mut commands: Commands,
    clock: Res<SessionClock>,
    mut projectile_query: Query<(Entity, &mut Projectile, &Transform, &Hitbox)>,
    mut player_query: Query<PlayerParts, Without<Enemy>>,
    mut enemy_query: Query<EnemyParts, Without<Player>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    let Ok((player, mut player_health, _, player_transform, _, _)) = player_query.get_single_mut() else { return };
    if player_health.is_depleted() { return; }
    let now = clock.now();
    let player_pos = player_transform.translation.truncate();
    let mut roster: Vec<(Entity, Vec2)> = enemy_query.iter()
        .filter(|(_, _, health, ..)| !health.is_depleted())
        .map(|(entity, _, _, _, transform, _)| (entity, transform.translation.truncate()))
        .collect();

    for (projectile_entity, mut projectile, projectile_transform, projectile_box) in projectile_query.iter_mut() {
        let projectile_pos = projectile_transform.translation.truncate();
        for (entity, mut enemy, mut health, mut actor, transform, hitbox) in enemy_query.iter_mut() {
            let enemy_pos = transform.translation.truncate();
            if health.is_depleted() || !projectile.can_hit(entity) || !projectile_box.overlaps(projectile_pos, hitbox, enemy_pos) { continue; }
            if projectile.slows { enemy.apply_slow(FROST_SLOW_FACTOR, FROST_SLOW_MS, now); }
            let strike = strike_enemy(&mut enemy, &mut health, &mut actor, projectile.damage, now);
            report_strike(&mut commands, &mut sound, &strike, enemy_pos, &player, &mut player_health, player_pos, now);
            if strike.died { roster.retain(|(candidate, _)| *candidate != entity); }
            match projectile.register_hit(entity, projectile_pos, &roster) {
                HitOutcome::Continue => {}
                HitOutcome::Retargeted(_) => break,
                HitOutcome::Spent => { commands.entity(projectile_entity).despawn_recursive(); break; }
            }
        }
    }
}

fn resolve_enemy_projectiles(
    mut commands: Commands,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    mut shake: ResMut<ScreenShake>,
    projectile_query: Query<(Entity, &EnemyProjectile, &Transform, &Hitbox)>,
    mut player_query: Query<PlayerParts, Without<Enemy>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    let Ok((mut player, mut health, mut actor, transform, hitbox, weapon)) = player_query.get_single_mut() else { return };
    let now = clock.now();
    let player_pos = transform.translation.truncate();
    let shielded = weapon.map_or(false, |w| w.shield_active(now));
    for (entity, projectile, projectile_transform, projectile_box) in projectile_query.iter() {
        if health.is_depleted() { return; }
        if !hitbox.overlaps(player_pos, projectile_box, projectile_transform.translation.truncate()) { continue; }
        let taken = player.take_damage(&mut health, &mut actor, projectile.damage, shielded, now);
        spawn_floating_label(&mut commands, player_pos, taken, LabelKind::DamageTaken, now);
        if player.claim_hit_sound(now) { sound.send(PlaySoundEvent(SoundEffect::PlayerHit)); }
        if config.settings.shake { shake.remaining_ticks = SHAKE_TICKS; }
        commands.entity(entity).despawn_recursive();
    }
}

/// Compacts the enemy collection: everything at zero health this tick is scored and removed.
fn resolve_enemy_deaths(
    mut commands: Commands,
    mut game_state: ResMut<GameState>,
    mut offer: ResMut<RewardOffer>,
    mut player_query: Query<(&mut Player, &mut Health), Without<Enemy>>,
    enemy_query: Query<(Entity, &Enemy, &Health), Without<Player>>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    for (entity, enemy, health) in enemy_query.iter() {
        if !health.is_depleted() { continue; }
        game_state.score += health.max.max(0.0) as u32;
        if let Ok((mut player, mut player_health)) = player_query.get_single_mut() {
            // A player already killed this tick gains nothing; the level-up heal would revive them.
            if !player_health.is_depleted() {
                offer.pending += grant_experience(&mut player, &mut player_health, enemy.exp_value);
                if enemy.is_boss {
                    player.speed += BOSS_KILL_SPEED_BONUS;
                    info!("boss {} defeated", enemy.kind.name());
                }
            }
        }
        sound.send(PlaySoundEvent(SoundEffect::EnemyDeath));
        commands.entity(entity).despawn_recursive();
    }
}

fn check_player_death(player_query: Query<&Health, With<Player>>, mut next_phase: ResMut<NextState<RunPhase>>) {
    let Ok(health) = player_query.get_single() else { return };
    if health.is_depleted() && next_phase.0.is_none() { next_phase.set(RunPhase::GameOver); }
}

fn decay_screen_shake(mut shake: ResMut<ScreenShake>) { shake.remaining_ticks = shake.remaining_ticks.saturating_sub(1); }
