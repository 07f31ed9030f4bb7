use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use wavebound::{
    components::{ActorState, Health},
    config::GameConfig,
    enemy::{ground_slam, Activity, Enemy, EnemyKind, ENRAGED_RESISTANCE},
    projectiles::EnemyShotKind,
};

fn field() -> Rect { GameConfig::default().playfield() }

#[test]
fn test_boss_hit_below_threshold_is_voided_and_starts_transform() {
    let (mut boss, mut health) = Enemy::boss(EnemyKind::Brute, 0, Vec2::ZERO);
    let mut actor = ActorState::default();
    assert_eq!(health.max, 900.0);

    assert!(!boss.take_damage(&mut health, &mut actor, 500.0, 100));
    assert_eq!(health.current, 400.0);

    assert!(!boss.take_damage(&mut health, &mut actor, 200.0, 100));
    assert_eq!(health.current, 400.0);
    assert!(boss.is_transforming());
    assert!(boss.invulnerable);

    // Further hits are ignored while transforming.
    assert!(!boss.take_damage(&mut health, &mut actor, 1000.0, 200));
    assert_eq!(health.current, 400.0);
}

#[test]
fn test_transformation_heals_then_enrages() {
    let (mut boss, mut health) = Enemy::boss(EnemyKind::Brute, 0, Vec2::ZERO);
    boss.activity = Activity::Moving;
    let mut actor = ActorState::default();
    let mut rng = StdRng::seed_from_u64(1);
    health.current = 400.0;
    boss.take_damage(&mut health, &mut actor, 200.0, 100);

    boss.think(&mut health, Vec2::ZERO, Vec2::new(0.0, -200.0), 133, field(), &mut rng);
    assert_eq!(health.current, 410.0);
    assert!(boss.is_transforming());

    boss.think(&mut health, Vec2::ZERO, Vec2::new(0.0, -200.0), 3_101, field(), &mut rng);
    assert!(!boss.is_transforming());
    assert!(boss.enraged);
    assert!(!boss.invulnerable);
    assert_eq!(health.max, 1350.0);
    assert_eq!(health.current, 1350.0);
    assert_eq!(boss.damage_resistance, ENRAGED_RESISTANCE);
    assert_eq!(boss.speed, 3.0);

    // Enraged bosses take reduced damage and never transform again.
    boss.take_damage(&mut health, &mut actor, 100.0, 4_000);
    assert!((health.current - 1280.0).abs() < 1e-3);
    boss.take_damage(&mut health, &mut actor, 1200.0, 4_000);
    assert!((health.current - 440.0).abs() < 1e-2);
    assert!(!boss.is_transforming());
}

#[test]
fn test_boss_walks_to_entry_point_before_moving() {
    let (mut boss, mut health) = Enemy::boss(EnemyKind::Bramble, 0, Vec2::new(0.0, 150.0));
    let mut rng = StdRng::seed_from_u64(2);
    assert!(boss.is_entering());
    let intent = boss.think(&mut health, Vec2::new(0.0, 400.0), Vec2::ZERO, 33, field(), &mut rng);
    assert_eq!(intent.position, Vec2::new(0.0, 400.0 - boss.speed));

    let intent = boss.think(&mut health, Vec2::new(0.0, 150.5), Vec2::ZERO, 66, field(), &mut rng);
    assert_eq!(intent.position, Vec2::new(0.0, 150.0));
    assert!(!boss.is_entering());
}

#[test]
fn test_boss_casts_three_slams_then_resets_cooldown() {
    let (mut boss, mut health) = Enemy::boss(EnemyKind::Brute, 0, Vec2::ZERO);
    boss.activity = Activity::Moving;
    let mut rng = StdRng::seed_from_u64(3);
    let player = Vec2::new(0.0, -200.0);

    boss.think(&mut health, Vec2::ZERO, player, 8_000, field(), &mut rng);
    assert!(!boss.is_casting());
    boss.think(&mut health, Vec2::ZERO, player, 8_001, field(), &mut rng);
    assert!(boss.is_casting());

    let mut volleys = 0;
    let mut now = 8_001;
    for _ in 0..3 {
        now += 601;
        let intent = boss.think(&mut health, Vec2::ZERO, player, now, field(), &mut rng);
        assert_eq!(intent.shots.len(), 8);
        assert!(intent.shots.iter().all(|(_, kind)| *kind == EnemyShotKind::Shard));
        volleys += 1;
    }
    assert_eq!(volleys, 3);
    boss.think(&mut health, Vec2::ZERO, player, now + 1, field(), &mut rng);
    assert!(!boss.is_casting());
    assert_eq!(boss.last_skill_at, now + 1);
}

#[test]
fn test_ground_slam_spreads_eight_ways() {
    let shots = ground_slam(0.0);
    assert_eq!(shots.len(), 8);
    assert!((shots[0].0 - Vec2::X).length() < 1e-5);
    assert!((shots[2].0 - Vec2::Y).length() < 1e-5);
    let rotated = ground_slam(15.0);
    assert!((rotated[0].0.y.atan2(rotated[0].0.x).to_degrees() - 15.0).abs() < 1e-3);
}

#[test]
fn test_slow_does_not_stack_and_expires() {
    let (mut enemy, _) = Enemy::new(EnemyKind::Cactling, 0);
    enemy.apply_slow(0.75, 2_000, 0);
    assert!(enemy.is_slowed());
    assert_eq!(enemy.speed, 2.5 * 0.25);
    enemy.apply_slow(0.5, 5_000, 100);
    assert_eq!(enemy.speed, 2.5 * 0.25);
    enemy.tick_status(1_999);
    assert!(enemy.is_slowed());
    enemy.tick_status(2_000);
    assert!(!enemy.is_slowed());
    assert_eq!(enemy.speed, 2.5);
}

#[test]
fn test_rage_boosts_once() {
    let (mut enemy, mut health) = Enemy::new(EnemyKind::Cactling, 0);
    enemy.activate_rage(&mut health);
    assert!(enemy.enraged);
    assert_eq!(health, Health { current: 75.0, max: 75.0 });
    assert_eq!(enemy.speed, 3.75);
    enemy.activate_rage(&mut health);
    assert_eq!(health.max, 75.0);
}

#[test]
fn test_regular_enemy_dies_from_heavy_hit() {
    let (mut enemy, mut health) = Enemy::new(EnemyKind::Swooper, 0);
    let mut actor = ActorState::default();
    assert!(enemy.take_damage(&mut health, &mut actor, 100.0, 0));
    assert_eq!(health.current, 0.0);
    assert!(actor.is_flashing(50));
}

#[test]
fn test_ranged_enemy_keeps_distance_and_fires() {
    let (mut spitter, mut health) = Enemy::new(EnemyKind::Spitter, 0);
    let mut rng = StdRng::seed_from_u64(4);
    let intent = spitter.think(&mut health, Vec2::ZERO, Vec2::new(100.0, 0.0), 1_000, field(), &mut rng);
    assert!(intent.position.x < 0.0);
    assert!(intent.shots.is_empty());

    let intent = spitter.think(&mut health, Vec2::ZERO, Vec2::new(100.0, 0.0), 2_501, field(), &mut rng);
    assert_eq!(intent.shots, vec![(Vec2::X, EnemyShotKind::Bolt)]);
}

#[test]
fn test_melee_enemy_chases_player() {
    let (mut enemy, mut health) = Enemy::new(EnemyKind::Thornback, 0);
    let mut rng = StdRng::seed_from_u64(5);
    let intent = enemy.think(&mut health, Vec2::ZERO, Vec2::new(0.0, 100.0), 33, field(), &mut rng);
    assert_eq!(intent.position, Vec2::new(0.0, 2.0));
}

#[test]
fn test_ranged_enemy_walks_in_from_spawn_edge() {
    let (mut sniper, mut health) = Enemy::new(EnemyKind::Sniper, 0);
    let mut rng = StdRng::seed_from_u64(6);
    let player = Vec2::new(0.0, -80.0);
    let mut position = Vec2::new(0.0, 400.0);

    // Already in its preferred band, but off-screen: it still steps in and holds fire.
    let intent = sniper.think(&mut health, position, player, 5_000, field(), &mut rng);
    assert!((intent.position.y - (400.0 - sniper.speed)).abs() < 1e-4);
    assert!(intent.shots.is_empty());

    let mut now = 5_000;
    for _ in 0..600 {
        now += 33;
        position = sniper.think(&mut health, position, player, now, field(), &mut rng).position;
    }
    let half = sniper.size / 2.0;
    assert!(position.y <= field().max.y - half.y);
    assert!(field().contains(position));
}

#[test]
fn test_enraged_boss_waits_a_full_cooldown_before_casting() {
    let (mut boss, mut health) = Enemy::boss(EnemyKind::Brute, 0, Vec2::ZERO);
    boss.activity = Activity::Moving;
    let mut actor = ActorState::default();
    let mut rng = StdRng::seed_from_u64(7);
    let player = Vec2::new(0.0, -200.0);

    boss.think(&mut health, Vec2::ZERO, player, 8_001, field(), &mut rng);
    assert!(boss.is_casting());
    health.current = 400.0;
    boss.take_damage(&mut health, &mut actor, 200.0, 8_100);
    assert!(boss.is_transforming());

    boss.think(&mut health, Vec2::ZERO, player, 11_101, field(), &mut rng);
    assert!(boss.enraged);
    assert_eq!(boss.last_skill_at, 11_101);
    boss.think(&mut health, Vec2::ZERO, player, 11_134, field(), &mut rng);
    assert!(!boss.is_casting());
    boss.think(&mut health, Vec2::ZERO, player, 19_102, field(), &mut rng);
    assert!(boss.is_casting());
}
