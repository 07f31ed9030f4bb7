use bevy::prelude::*;
use crate::{components::CreditPause, player::CharacterClass};

pub const BURST_INTERVAL_MS: u64 = 80;
pub const SWING_INTERVAL_MS: u64 = 200;
pub const SWING_ACTIVE_MS: u64 = 150;
pub const SWING_REACH: f32 = 50.0;
pub const SWING_BASE_SIZE: f32 = 80.0;
pub const SPECIAL_COOLDOWN_MS: u64 = 10_000;
pub const SHIELD_DURATION_MS: u64 = 3_000;
pub const SHIELD_MITIGATION: f32 = 0.7;
pub const PISTOL_COOLDOWN_MS: u64 = 650;
pub const SWORD_COOLDOWN_MS: u64 = 400;
pub const SWORD_DAMAGE: f32 = 40.0;
pub const BASE_SHOT_DAMAGE: f32 = 15.0;
pub const BASE_SHOT_PIERCE: u32 = 1;
pub const BASE_SHOT_SPEED: f32 = 15.0;

/// Session-wide base stats for every shot fired by a ranged weapon. Power-ups
/// change these, so they apply to all future projectiles rather than one weapon.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RangedTuning { pub damage: f32, pub pierce: u32, pub speed: f32, pub bounces: u32 }

impl Default for RangedTuning {
    fn default() -> Self { Self { damage: BASE_SHOT_DAMAGE, pierce: BASE_SHOT_PIERCE, speed: BASE_SHOT_SPEED, bounces: 0 } }
}

#[derive(Debug, Clone, PartialEq)]
struct Burst { remaining: u32, next_at: u64, interval_ms: u64, target: Vec2 }

impl Burst {
    fn poll(&mut self, now: u64) -> Option<Vec2> {
        if self.remaining == 0 || now < self.next_at { return None; }
        self.remaining -= 1;
        self.next_at = now + self.interval_ms;
        Some(self.target)
    }
}

impl CreditPause for Burst {
    fn credit_pause(&mut self, paused_ms: u64) { self.next_at.credit_pause(paused_ms); }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotDescriptor { pub origin: Vec2, pub direction: Vec2, pub empowered: bool }

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingDescriptor { pub offset: Vec2, pub size: Vec2, pub damage: f32 }

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponAction { Shot(ShotDescriptor), Swing(SwingDescriptor) }

#[derive(Debug, Clone, PartialEq)]
pub struct RangedWeapon {
    pub cooldown_ms: u64,
    pub last_attack_at: Option<u64>,
    pub empowered_next: bool,
    burst: Option<Burst>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeleeWeapon {
    pub damage: f32,
    pub cooldown_ms: u64,
    /// Multiplier on the swing hitbox edge; owned by this instance only.
    pub size: f32,
    pub last_attack_at: Option<u64>,
    pub shield_until: Option<u64>,
    burst: Option<Burst>,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub enum Weapon { Ranged(RangedWeapon), Melee(MeleeWeapon) }

impl Weapon {
    pub fn for_class(class: CharacterClass) -> Self {
        match class {
            CharacterClass::Gunslinger => Weapon::Ranged(RangedWeapon { cooldown_ms: PISTOL_COOLDOWN_MS, last_attack_at: None, empowered_next: false, burst: None }),
            CharacterClass::Blademaster => Weapon::Melee(MeleeWeapon { damage: SWORD_DAMAGE, cooldown_ms: SWORD_COOLDOWN_MS, size: 1.0, last_attack_at: None, shield_until: None, burst: None }),
        }
    }

    pub fn is_melee(&self) -> bool { matches!(self, Weapon::Melee(_)) }

    pub fn cooldown_ms(&self) -> u64 { match self { Weapon::Ranged(w) => w.cooldown_ms, Weapon::Melee(w) => w.cooldown_ms } }
    pub fn set_cooldown_ms(&mut self, cooldown_ms: u64) {
        match self { Weapon::Ranged(w) => w.cooldown_ms = cooldown_ms, Weapon::Melee(w) => w.cooldown_ms = cooldown_ms }
    }

    fn parts(&mut self) -> (&mut Option<u64>, &mut Option<Burst>, u64) {
        match self {
            Weapon::Ranged(w) => (&mut w.last_attack_at, &mut w.burst, w.cooldown_ms),
            Weapon::Melee(w) => (&mut w.last_attack_at, &mut w.burst, w.cooldown_ms),
        }
    }

    pub fn burst_pending(&self) -> bool {
        let burst = match self { Weapon::Ranged(w) => &w.burst, Weapon::Melee(w) => &w.burst };
        burst.as_ref().map_or(false, |b| b.remaining > 0)
    }

    /// True when a new trigger would start an attack. A zero cooldown is always ready.
    pub fn ready(&self, now: u64) -> bool {
        if self.burst_pending() { return false; }
        let (last, cooldown) = match self { Weapon::Ranged(w) => (w.last_attack_at, w.cooldown_ms), Weapon::Melee(w) => (w.last_attack_at, w.cooldown_ms) };
        match last { None => true, Some(_) if cooldown == 0 => true, Some(at) => now.saturating_sub(at) >= cooldown }
    }

    /// Schedules a burst of `quantity` shots or swings aimed at `aim`. Returns whether one started.
    pub fn attack(&mut self, now: u64, aim: Vec2, quantity: u32) -> bool {
        if !self.ready(now) { return false; }
        let interval_ms = if self.is_melee() { SWING_INTERVAL_MS } else { BURST_INTERVAL_MS };
        let (last, burst, _) = self.parts();
        *last = Some(now);
        *burst = Some(Burst { remaining: quantity.max(1), next_at: now, interval_ms, target: aim });
        true
    }

    /// Emits at most one queued action whose sub-interval has elapsed.
    pub fn update(&mut self, now: u64, wielder: Vec2) -> Option<WeaponAction> {
        match self {
            Weapon::Ranged(w) => {
                let target = w.burst.as_mut()?.poll(now)?;
                let empowered = std::mem::take(&mut w.empowered_next);
                Some(WeaponAction::Shot(ShotDescriptor { origin: wielder, direction: aim_direction(wielder, target), empowered }))
            }
            Weapon::Melee(w) => {
                let target = w.burst.as_mut()?.poll(now)?;
                let offset = aim_direction(wielder, target) * SWING_REACH;
                Some(WeaponAction::Swing(SwingDescriptor { offset, size: Vec2::splat(SWING_BASE_SIZE * w.size), damage: w.damage }))
            }
        }
    }

    /// Secondary ability: an empowered next shot for ranged weapons, a shield for melee.
    pub fn activate_special(&mut self, now: u64) {
        match self {
            Weapon::Ranged(w) => w.empowered_next = true,
            Weapon::Melee(w) => w.shield_until = Some(now + SHIELD_DURATION_MS),
        }
    }

    pub fn shield_active(&self, now: u64) -> bool {
        match self { Weapon::Melee(w) => w.shield_until.map_or(false, |until| now < until), Weapon::Ranged(_) => false }
    }

    /// Attacks per second for the stats panel; `None` when the cooldown is zero.
    pub fn attacks_per_second(&self) -> Option<f32> {
        let cooldown = self.cooldown_ms();
        if cooldown == 0 { None } else { Some(1000.0 / cooldown as f32) }
    }
}

impl CreditPause for Weapon {
    fn credit_pause(&mut self, paused_ms: u64) {
        match self {
            Weapon::Ranged(w) => { w.last_attack_at.credit_pause(paused_ms); w.burst.credit_pause(paused_ms); }
            Weapon::Melee(w) => { w.last_attack_at.credit_pause(paused_ms); w.burst.credit_pause(paused_ms); w.shield_until.credit_pause(paused_ms); }
        }
    }
}

fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let direction = (to - from).normalize_or_zero();
    if direction == Vec2::ZERO { Vec2::X } else { direction }
}

/// Live hitbox of one melee swing; follows the wielder at a fixed offset.
#[derive(Component, Debug, Clone)]
pub struct SwingHitbox {
    pub offset: Vec2,
    pub damage: f32,
    pub expires_at: u64,
    pub already_hit: bevy::utils::HashSet<Entity>,
}

impl SwingHitbox {
    pub fn new(descriptor: &SwingDescriptor, now: u64) -> Self {
        Self { offset: descriptor.offset, damage: descriptor.damage, expires_at: now + SWING_ACTIVE_MS, already_hit: Default::default() }
    }
    pub fn is_active(&self, now: u64) -> bool { now < self.expires_at }
    /// Records a hit; false when this swing already struck the entity.
    pub fn register(&mut self, enemy: Entity) -> bool { self.already_hit.insert(enemy) }
}

impl CreditPause for SwingHitbox {
    fn credit_pause(&mut self, paused_ms: u64) { self.expires_at.credit_pause(paused_ms); }
}
