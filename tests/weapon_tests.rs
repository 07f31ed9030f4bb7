use bevy::prelude::*;
use wavebound::{
    components::{ActorState, Health},
    player::{CharacterClass, Player},
    projectiles::{HitOutcome, Projectile},
    weapons::{RangedTuning, ShotDescriptor, SwingDescriptor, SwingHitbox, Weapon, WeaponAction, PISTOL_COOLDOWN_MS, SWING_ACTIVE_MS},
};

fn shot(action: Option<WeaponAction>) -> Option<ShotDescriptor> {
    match action { Some(WeaponAction::Shot(shot)) => Some(shot), _ => None }
}

#[test]
fn test_ranged_burst_fires_one_shot_per_interval() {
    let mut pistol = Weapon::for_class(CharacterClass::Gunslinger);
    assert!(pistol.attack(0, Vec2::new(100.0, 0.0), 3));
    assert!(!pistol.ready(10));

    let first = shot(pistol.update(0, Vec2::ZERO)).unwrap();
    assert_eq!(first.direction, Vec2::X);
    assert!(pistol.update(40, Vec2::ZERO).is_none());
    assert!(shot(pistol.update(80, Vec2::ZERO)).is_some());
    assert!(shot(pistol.update(160, Vec2::ZERO)).is_some());
    assert!(pistol.update(240, Vec2::ZERO).is_none());
    assert!(!pistol.burst_pending());
}

#[test]
fn test_burst_keeps_trigger_time_aim() {
    let mut pistol = Weapon::for_class(CharacterClass::Gunslinger);
    pistol.attack(0, Vec2::new(0.0, 100.0), 2);
    pistol.update(0, Vec2::ZERO);
    // The wielder moved, the aim point did not.
    let second = shot(pistol.update(80, Vec2::new(100.0, 100.0))).unwrap();
    assert_eq!(second.direction, Vec2::new(-1.0, 0.0));
}

#[test]
fn test_cooldown_gates_new_triggers() {
    let mut pistol = Weapon::for_class(CharacterClass::Gunslinger);
    pistol.attack(0, Vec2::X, 1);
    pistol.update(0, Vec2::ZERO);
    assert!(!pistol.attack(PISTOL_COOLDOWN_MS - 1, Vec2::X, 1));
    assert!(pistol.attack(PISTOL_COOLDOWN_MS, Vec2::X, 1));
}

#[test]
fn test_zero_cooldown_is_always_ready() {
    let mut pistol = Weapon::for_class(CharacterClass::Gunslinger);
    pistol.set_cooldown_ms(0);
    assert_eq!(pistol.attacks_per_second(), None);
    pistol.attack(0, Vec2::X, 1);
    pistol.update(0, Vec2::ZERO);
    assert!(pistol.ready(0));
}

#[test]
fn test_special_empowers_only_the_next_shot() {
    let mut pistol = Weapon::for_class(CharacterClass::Gunslinger);
    pistol.activate_special(0);
    pistol.attack(0, Vec2::X, 2);
    assert!(shot(pistol.update(0, Vec2::ZERO)).unwrap().empowered);
    assert!(!shot(pistol.update(80, Vec2::ZERO)).unwrap().empowered);
    assert!(!pistol.shield_active(0));
}

#[test]
fn test_melee_swings_toward_aim_point() {
    let mut sword = Weapon::for_class(CharacterClass::Blademaster);
    sword.attack(0, Vec2::new(0.0, 100.0), 2);
    let Some(WeaponAction::Swing(swing)) = sword.update(0, Vec2::ZERO) else { panic!("expected a swing") };
    assert_eq!(swing.offset, Vec2::new(0.0, 50.0));
    assert_eq!(swing.size, Vec2::splat(80.0));
    assert_eq!(swing.damage, 40.0);
    assert!(sword.update(100, Vec2::ZERO).is_none());
    assert!(matches!(sword.update(200, Vec2::ZERO), Some(WeaponAction::Swing(_))));
}

#[test]
fn test_swing_hits_each_enemy_once() {
    let descriptor = SwingDescriptor { offset: Vec2::X * 50.0, size: Vec2::splat(80.0), damage: 40.0 };
    let mut swing = SwingHitbox::new(&descriptor, 1_000);
    let enemy = Entity::from_raw(7);
    assert!(swing.register(enemy));
    assert!(!swing.register(enemy));
    assert!(swing.register(Entity::from_raw(8)));
    assert!(swing.is_active(1_000 + SWING_ACTIVE_MS - 1));
    assert!(!swing.is_active(1_000 + SWING_ACTIVE_MS));
}

#[test]
fn test_shield_mitigates_seventy_percent_for_three_seconds() {
    let mut sword = Weapon::for_class(CharacterClass::Blademaster);
    sword.activate_special(1_000);
    assert!(sword.shield_active(3_999));
    assert!(!sword.shield_active(4_000));

    let player = Player::new();
    let mut health = Health::new(150.0);
    let mut actor = ActorState::default();
    let taken = player.take_damage(&mut health, &mut actor, 100.0, sword.shield_active(2_000), 2_000);
    assert!((taken - 30.0).abs() < 1e-3);
    assert!((health.current - 120.0).abs() < 1e-3);
    assert!(actor.is_flashing(2_000));
}

#[test]
fn test_projectile_pierces_then_spends() {
    let tuning = RangedTuning { pierce: 2, ..default() };
    let mut projectile = Projectile::from_shot(&ShotDescriptor { origin: Vec2::ZERO, direction: Vec2::X, empowered: false }, &tuning);
    let (first, second) = (Entity::from_raw(1), Entity::from_raw(2));
    assert_eq!(projectile.register_hit(first, Vec2::ZERO, &[]), HitOutcome::Continue);
    assert!(!projectile.can_hit(first));
    assert_eq!(projectile.register_hit(second, Vec2::ZERO, &[]), HitOutcome::Spent);
}

#[test]
fn test_projectile_bounces_to_nearest_unhit_enemy() {
    let tuning = RangedTuning { bounces: 1, ..default() };
    let mut projectile = Projectile::from_shot(&ShotDescriptor { origin: Vec2::ZERO, direction: Vec2::X, empowered: true }, &tuning);
    assert!(projectile.slows);
    let (hit, near, far) = (Entity::from_raw(1), Entity::from_raw(2), Entity::from_raw(3));
    let roster = [(hit, Vec2::ZERO), (near, Vec2::new(0.0, 50.0)), (far, Vec2::new(200.0, 0.0))];

    assert_eq!(projectile.register_hit(hit, Vec2::ZERO, &roster), HitOutcome::Retargeted(Vec2::Y));
    assert_eq!(projectile.direction, Vec2::Y);
    assert_eq!(projectile.pierce, 1);
    assert_eq!(projectile.bounces, 0);
    assert_eq!(projectile.register_hit(near, Vec2::new(0.0, 50.0), &roster), HitOutcome::Spent);
}

#[test]
fn test_bounce_without_targets_is_spent() {
    let tuning = RangedTuning { bounces: 2, ..default() };
    let mut projectile = Projectile::from_shot(&ShotDescriptor { origin: Vec2::ZERO, direction: Vec2::X, empowered: false }, &tuning);
    let lone = Entity::from_raw(1);
    assert_eq!(projectile.register_hit(lone, Vec2::ZERO, &[(lone, Vec2::ZERO)]), HitOutcome::Spent);
}
