use bevy::prelude::*;
use rand::{seq::SliceRandom, Rng};
use crate::{
    components::Health,
    player::{CharacterClass, Player},
    weapons::{RangedTuning, Weapon},
};

pub const OFFER_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpEffect {
    Damage, FireRate, MaxHealth, LifeSteal, ShotQuantity,
    Pierce, ShotSpeed, Bounce,
    SwingSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerUpId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp { pub id: PowerUpId, pub name: &'static str, pub description: &'static str, pub effect: PowerUpEffect }

#[derive(Resource, Debug, Clone)]
pub struct PowerUpCatalog { pub shared: Vec<PowerUp>, pub ranged: Vec<PowerUp>, pub melee: Vec<PowerUp> }

impl Default for PowerUpCatalog {
    fn default() -> Self {
        let card = |id, name, description, effect| PowerUp { id: PowerUpId(id), name, description, effect };
        Self {
            shared: vec![
                card(0, "Honed Edge", "+5 shot damage, or +8 sword damage.", PowerUpEffect::Damage),
                card(1, "Quick Hands", "Attack cooldown is 10% shorter.", PowerUpEffect::FireRate),
                card(2, "Thick Skin", "+20 max health, healed immediately.", PowerUpEffect::MaxHealth),
                card(3, "Leeching Strikes", "+1% of damage dealt is returned as health.", PowerUpEffect::LifeSteal),
                card(4, "Echo", "Each trigger repeats one more attack.", PowerUpEffect::ShotQuantity),
            ],
            ranged: vec![
                card(100, "Piercing Rounds", "Shots pass through one more enemy.", PowerUpEffect::Pierce),
                card(101, "Hot Powder", "Shots travel 15% faster.", PowerUpEffect::ShotSpeed),
                card(102, "Ricochet", "Spent shots bounce to one more nearby enemy.", PowerUpEffect::Bounce),
            ],
            melee: vec![
                card(200, "Long Reach", "Sword swings cover a larger area.", PowerUpEffect::SwingSize),
            ],
        }
    }
}

impl PowerUpCatalog {
    /// Shared pool plus the pool for the class's weapon archetype.
    pub fn pool_for(&self, class: CharacterClass) -> Vec<&PowerUp> {
        let specific = match class { CharacterClass::Gunslinger => &self.ranged, CharacterClass::Blademaster => &self.melee };
        self.shared.iter().chain(specific.iter()).collect()
    }

    /// Up to `count` distinct cards from the class pool.
    pub fn draw(&self, class: CharacterClass, count: usize, rng: &mut impl Rng) -> Vec<PowerUp> {
        self.pool_for(class).choose_multiple(rng, count).map(|card| (*card).clone()).collect()
    }
}

/// Executes one power-up. Base-stat cards edit the session-wide `RangedTuning`;
/// weapon cards edit only the equipped instance.
pub fn apply_power_up(effect: PowerUpEffect, player: &mut Player, health: &mut Health, weapon: Option<&mut Weapon>, tuning: &mut RangedTuning) {
    match effect {
        PowerUpEffect::Damage => match weapon {
            Some(Weapon::Melee(sword)) => sword.damage += 8.0,
            _ => tuning.damage += 5.0,
        },
        PowerUpEffect::FireRate => if let Some(weapon) = weapon {
            let shorter = weapon.cooldown_ms() * 9 / 10;
            weapon.set_cooldown_ms(shorter);
        },
        PowerUpEffect::MaxHealth => { health.max += 20.0; health.heal(20.0); }
        PowerUpEffect::LifeSteal => player.life_steal += 0.01,
        PowerUpEffect::ShotQuantity => player.shot_quantity += 1,
        PowerUpEffect::Pierce => tuning.pierce += 1,
        PowerUpEffect::ShotSpeed => tuning.speed *= 1.15,
        PowerUpEffect::Bounce => tuning.bounces += 1,
        PowerUpEffect::SwingSize => if let Some(Weapon::Melee(sword)) = weapon { sword.size += 0.2; },
    }
}
