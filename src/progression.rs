use bevy::prelude::*;
use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    components::Health,
    game::{GameRng, PowerUpChosen, RunPhase, SimulationSet},
    player::Player,
    upgrades::{apply_power_up, PowerUp, PowerUpCatalog, OFFER_COUNT},
    weapons::{RangedTuning, Weapon},
};

pub const BASE_EXP_THRESHOLD: u32 = 100;
pub const LEVEL_UP_HEAL: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience { pub level: u32, pub exp: u32, pub to_next: u32 }

impl Default for Experience { fn default() -> Self { Self::new() } }

impl Experience {
    pub fn new() -> Self { Self { level: 1, exp: 0, to_next: BASE_EXP_THRESHOLD } }

    pub fn next_threshold(threshold: u32) -> u32 { ((threshold as u64 * 3) / 2) as u32 }

    /// Adds experience and returns how many levels were gained. Overflow carries into the next level.
    pub fn gain(&mut self, amount: u32) -> u32 {
        self.exp += amount;
        let mut levels = 0;
        while self.exp >= self.to_next {
            self.exp -= self.to_next;
            self.level += 1;
            self.to_next = Self::next_threshold(self.to_next).max(1);
            levels += 1;
        }
        levels
    }
}

/// Grants experience, heals once per level gained and returns the level count.
pub fn grant_experience(player: &mut Player, health: &mut Health, amount: u32) -> u32 {
    let levels = player.experience.gain(amount);
    for _ in 0..levels { health.heal(LEVEL_UP_HEAL); }
    if levels > 0 { info!("level up: now level {}", player.experience.level); }
    levels
}

/// Cards on the reward screen plus level-ups still waiting for a choice.
#[derive(Resource, Debug, Default, Clone)]
pub struct RewardOffer { pub choices: Vec<PowerUp>, pub pending: u32 }

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PowerUpCatalog>()
            .init_resource::<RewardOffer>()
            .init_resource::<RangedTuning>()
            .add_systems(FixedUpdate, open_reward_choice.in_set(SimulationSet::Progression))
            .add_systems(Update, apply_chosen_power_up.run_if(in_state(RunPhase::RewardChoice)));
    }
}

fn open_reward_choice(
    mut offer: ResMut<RewardOffer>,
    catalog: Res<PowerUpCatalog>,
    mut rng: ResMut<GameRng>,
    mut next_phase: ResMut<NextState<RunPhase>>,
    player_query: Query<&Player>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    if offer.pending == 0 || next_phase.0.is_some() { return; }
    let Ok(player) = player_query.get_single() else { return };
    let Some(class) = player.class else { return };
    offer.choices = catalog.draw(class, OFFER_COUNT, &mut rng.0);
    sound.send(PlaySoundEvent(SoundEffect::LevelUp));
    next_phase.set(RunPhase::RewardChoice);
}

fn apply_chosen_power_up(
    mut events: EventReader<PowerUpChosen>,
    mut offer: ResMut<RewardOffer>,
    catalog: Res<PowerUpCatalog>,
    mut tuning: ResMut<RangedTuning>,
    mut rng: ResMut<GameRng>,
    mut next_phase: ResMut<NextState<RunPhase>>,
    mut player_query: Query<(&mut Player, &mut Health, Option<&mut Weapon>)>,
    mut sound: EventWriter<PlaySoundEvent>,
) {
    for event in events.read() {
        if offer.pending == 0 || next_phase.0.is_some() { continue; }
        let Some(card) = offer.choices.get(event.0).cloned() else { continue };
        let Ok((mut player, mut health, weapon)) = player_query.get_single_mut() else { continue };
        apply_power_up(card.effect, &mut player, &mut health, weapon.map(|w| w.into_inner()), &mut tuning);
        info!("power-up applied: {}", card.name);
        sound.send(PlaySoundEvent(SoundEffect::MenuConfirm));
        offer.pending -= 1;
        if offer.pending > 0 {
            if let Some(class) = player.class { offer.choices = catalog.draw(class, OFFER_COUNT, &mut rng.0); }
        } else {
            offer.choices.clear();
            next_phase.set(RunPhase::Combat);
        }
    }
}
