use bevy::prelude::*;
use crate::{
    audio::{MusicEvent, MusicTrack, PlaySoundEvent, SoundEffect},
    clock::SessionClock,
    components::{ActorState, CreditPause, Health, Hitbox},
    config::GameConfig,
    game::{ClassChosen, RunPhase, SimulationSet},
    input::InputSnapshot,
    progression::Experience,
    projectiles::spawn_player_projectile,
    weapons::{RangedTuning, SwingHitbox, Weapon, WeaponAction, SPECIAL_COOLDOWN_MS},
};

pub const PLAYER_SIZE: Vec2 = Vec2::new(80.0, 90.0);
pub const PLAYER_HITBOX: Vec2 = Vec2::new(50.0, 70.0);
pub const PLAYER_START: Vec2 = Vec2::new(0.0, -80.0);
pub const PLAYER_FLASH_MS: u64 = 150;
pub const CONTACT_IMMUNITY_MS: u64 = 600;
pub const HIT_SOUND_COOLDOWN_MS: u64 = 500;
const UNBOUND_SPEED: f32 = 5.0;
const UNBOUND_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_COLOR: Color = Color::rgb(0.35, 0.8, 0.45);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass { Gunslinger, Blademaster }

impl CharacterClass {
    pub const ALL: [CharacterClass; 2] = [CharacterClass::Gunslinger, CharacterClass::Blademaster];
    pub fn base_speed(self) -> f32 { match self { CharacterClass::Gunslinger => 5.0, CharacterClass::Blademaster => 7.0 } }
    pub fn base_max_health(self) -> f32 { match self { CharacterClass::Gunslinger => 100.0, CharacterClass::Blademaster => 150.0 } }
    pub fn name(self) -> &'static str { match self { CharacterClass::Gunslinger => "Gunslinger", CharacterClass::Blademaster => "Blademaster" } }
    pub fn blurb(self) -> &'static str {
        match self {
            CharacterClass::Gunslinger => "Burst-fire pistol. Special: a freezing shot that slows its target.",
            CharacterClass::Blademaster => "Wide sword swings. Special: a shield that absorbs most damage.",
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    /// `None` until the class screen binds one.
    pub class: Option<CharacterClass>,
    pub speed: f32,
    pub experience: Experience,
    pub life_steal: f32,
    pub shot_quantity: u32,
    pub special_ready_at: u64,
    pub contact_immune_until: u64,
    pub hit_sound_ready_at: u64,
}

impl Default for Player { fn default() -> Self { Self::new() } }

impl Player {
    pub fn new() -> Self {
        Self {
            class: None, speed: UNBOUND_SPEED, experience: Experience::new(), life_steal: 0.0, shot_quantity: 1,
            special_ready_at: 0, contact_immune_until: 0, hit_sound_ready_at: 0,
        }
    }

    /// Binds class stats once. Returns the weapon to equip, or `None` if a class is already bound.
    pub fn bind_class(&mut self, class: CharacterClass, health: &mut Health) -> Option<Weapon> {
        if self.class.is_some() { return None; }
        self.class = Some(class);
        self.speed = class.base_speed();
        *health = Health::new(class.base_max_health());
        Some(Weapon::for_class(class))
    }

    pub fn special_ready(&self, now: u64) -> bool { now >= self.special_ready_at }
    pub fn special_remaining_ms(&self, now: u64) -> u64 { self.special_ready_at.saturating_sub(now) }

    /// Applies shield mitigation, flashes the actor and returns the damage taken.
    pub fn take_damage(&self, health: &mut Health, actor: &mut ActorState, raw: f32, shielded: bool, now: u64) -> f32 {
        let amount = if shielded { raw * (1.0 - crate::weapons::SHIELD_MITIGATION) } else { raw };
        health.lose(amount);
        actor.flash(now, PLAYER_FLASH_MS);
        amount
    }

    /// Rate-limits the hurt sound. True when it should play now.
    pub fn claim_hit_sound(&mut self, now: u64) -> bool {
        if now < self.hit_sound_ready_at { return false; }
        self.hit_sound_ready_at = now + HIT_SOUND_COOLDOWN_MS;
        true
    }
}

impl CreditPause for Player {
    fn credit_pause(&mut self, paused_ms: u64) {
        self.special_ready_at.credit_pause(paused_ms);
        self.contact_immune_until.credit_pause(paused_ms);
        self.hit_sound_ready_at.credit_pause(paused_ms);
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(RunPhase::SelectingClass), spawn_player.run_if(no_player_exists))
            .add_systems(Update, handle_class_choice.run_if(in_state(RunPhase::SelectingClass)))
            .add_systems(FixedUpdate, (player_movement, player_weapon_system, follow_wielder, expire_swings).chain().in_set(SimulationSet::Player));
    }
}

fn no_player_exists(player_query: Query<(), With<Player>>) -> bool { player_query.is_empty() }

pub fn spawn_player(mut commands: Commands) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: PLAYER_COLOR, custom_size: Some(PLAYER_SIZE), ..default() },
            transform: Transform::from_translation(PLAYER_START.extend(1.0)),
            ..default()
        },
        Player::new(), Health::new(UNBOUND_MAX_HEALTH), Hitbox(PLAYER_HITBOX), ActorState::default(),
        Name::new("Player"),
    ));
}

fn handle_class_choice(
    mut commands: Commands,
    mut events: EventReader<ClassChosen>,
    mut player_query: Query<(Entity, &mut Player, &mut Health)>,
    mut next_phase: ResMut<NextState<RunPhase>>,
    mut music: EventWriter<MusicEvent>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    for event in events.read() {
        let Ok((entity, mut player, mut health)) = player_query.get_single_mut() else { continue };
        let Some(weapon) = player.bind_class(event.0, &mut health) else { continue };
        info!("class chosen: {}", event.0.name());
        commands.entity(entity).insert(weapon);
        sound.send(PlaySoundEvent(SoundEffect::MenuConfirm));
        music.send(MusicEvent::Play(MusicTrack::Combat));
        next_phase.set(RunPhase::Combat);
        return;
    }
}

fn player_movement(
    input: Res<InputSnapshot>,
    config: Res<GameConfig>,
    mut player_query: Query<(&Player, &Hitbox, &mut Transform, &mut ActorState)>,
) {
    let Ok((player, hitbox, mut transform, mut actor)) = player_query.get_single_mut() else { return };
    let position = transform.translation.truncate();
    let direction = input.movement.normalize_or_zero();
    let field = config.playfield();
    let half = hitbox.0 / 2.0;
    let next = (position + direction * player.speed).clamp(field.min + half, field.max - half);
    transform.translation = next.extend(transform.translation.z);
    actor.face_towards(next, input.aim_point);
}

fn player_weapon_system(
    mut commands: Commands,
    mut input: ResMut<InputSnapshot>,
    clock: Res<SessionClock>,
    tuning: Res<RangedTuning>,
    mut player_query: Query<(&mut Player, &Transform, Option<&mut Weapon>)>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    let special = input.take_special();
    let Ok((mut player, transform, weapon)) = player_query.get_single_mut() else { return };
    let Some(mut weapon) = weapon else { return };
    let now = clock.now();
    let position = transform.translation.truncate();

    if special && player.special_ready(now) {
        weapon.activate_special(now);
        player.special_ready_at = now + SPECIAL_COOLDOWN_MS;
        sound.send(PlaySoundEvent(SoundEffect::Special));
    }
    if input.attack_held && weapon.attack(now, input.aim_point, player.shot_quantity) {
        sound.send(PlaySoundEvent(if weapon.is_melee() { SoundEffect::Swing } else { SoundEffect::Shot }));
    }
    match weapon.update(now, position) {
        Some(WeaponAction::Shot(shot)) => spawn_player_projectile(&mut commands, &shot, &tuning),
        Some(WeaponAction::Swing(swing)) => {
            commands.spawn((
                SwingHitbox::new(&swing, now), Hitbox(swing.size),
                TransformBundle::from_transform(Transform::from_translation((position + swing.offset).extend(2.0))),
                Name::new("SwingHitbox"),
            ));
        }
        None => {}
    }
}

fn follow_wielder(
    player_query: Query<&Transform, (With<Player>, Without<SwingHitbox>)>,
    mut swing_query: Query<(&SwingHitbox, &mut Transform)>,
) {
    let Ok(player_transform) = player_query.get_single() else { return };
    for (swing, mut transform) in swing_query.iter_mut() {
        transform.translation = (player_transform.translation.truncate() + swing.offset).extend(2.0);
    }
}

fn expire_swings(mut commands: Commands, clock: Res<SessionClock>, swing_query: Query<(Entity, &SwingHitbox)>) {
    for (entity, swing) in swing_query.iter() {
        if !swing.is_active(clock.now()) { commands.entity(entity).despawn_recursive(); }
    }
}
