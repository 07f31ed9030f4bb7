mod common;

use bevy::prelude::*;
use common::{combat_app, phase, player_entity, spawn_test_enemy, tick};
use wavebound::{
    clock::SessionClock,
    components::{ActorState, CreditPause},
    enemy::{Enemy, EnemyKind},
    game::{PauseToggled, RunPhase},
    player::{CharacterClass, Player},
    weapons::Weapon,
};

#[test]
fn test_clock_reports_pause_length() {
    let mut clock = SessionClock::default();
    clock.advance_ms(1_000);
    assert_eq!(clock.end_pause(), 0);
    clock.begin_pause();
    clock.advance_ms(2_500);
    clock.begin_pause();
    assert!(clock.is_paused());
    assert_eq!(clock.end_pause(), 2_500);
    assert!(!clock.is_paused());
}

#[test]
fn test_credit_shifts_every_stored_timestamp() {
    let mut player = Player::new();
    player.special_ready_at = 10_000;
    player.contact_immune_until = 600;
    player.credit_pause(1_500);
    assert_eq!(player.special_ready_at, 11_500);
    assert_eq!(player.contact_immune_until, 2_100);

    let mut sword = Weapon::for_class(CharacterClass::Blademaster);
    sword.attack(1_000, Vec2::X, 1);
    sword.update(1_000, Vec2::ZERO);
    sword.activate_special(1_000);
    sword.credit_pause(1_500);
    assert!(!sword.ready(1_000 + 399 + 1_500));
    assert!(sword.ready(1_000 + 400 + 1_500));
    assert!(sword.shield_active(3_999 + 1_500));

    let mut actor = ActorState::default();
    actor.flash(0, 100);
    actor.credit_pause(50);
    assert_eq!(actor.flash_until, Some(150));
}

#[test]
fn test_enemy_slow_timer_is_credited() {
    let (mut enemy, _) = Enemy::new(EnemyKind::Cactling, 0);
    enemy.apply_slow(0.75, 2_000, 0);
    enemy.credit_pause(1_000);
    enemy.tick_status(2_500);
    assert!(enemy.is_slowed());
    enemy.tick_status(3_000);
    assert!(!enemy.is_slowed());
}

#[test]
fn test_pausing_does_not_consume_special_cooldown() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Gunslinger);
    let player = player_entity(&mut app);
    let now = app.world.resource::<SessionClock>().now();
    app.world.get_mut::<Player>(player).unwrap().special_ready_at = now + 5_000;

    app.world.send_event(PauseToggled);
    app.update();
    app.update();
    assert_eq!(phase(&app), RunPhase::Paused);
    let paused_at = app.world.resource::<SessionClock>().now();

    app.world.resource_mut::<SessionClock>().advance_ms(4_000);
    app.world.send_event(PauseToggled);
    app.update();
    app.update();
    assert_eq!(phase(&app), RunPhase::Combat);

    // Credited on the resuming frame, after that frame's clock advance.
    let resumed_at = app.world.resource::<SessionClock>().now();
    let paused_for = resumed_at - paused_at;
    assert!(paused_for >= 4_000);
    assert_eq!(app.world.get::<Player>(player).unwrap().special_ready_at, now + 5_000 + paused_for);
}

#[test]
fn test_enemies_are_frozen_while_paused() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = combat_app(dir.path(), CharacterClass::Gunslinger);
    let (enemy, health) = Enemy::new(EnemyKind::Thornback, 0);
    let enemy = spawn_test_enemy(&mut app, enemy, health, Vec2::new(400.0, 200.0));
    app.world.send_event(PauseToggled);
    app.update();
    app.update();

    let before = *app.world.get::<Transform>(enemy).unwrap();
    tick(&mut app);
    tick(&mut app);
    assert_eq!(*app.world.get::<Transform>(enemy).unwrap(), before);
}
