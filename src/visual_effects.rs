use bevy::{prelude::*, transform::TransformSystem};
use crate::{
    clock::SessionClock,
    components::CreditPause,
    game::SimulationSet,
};

pub const LABEL_LIFETIME_MS: u64 = 500;
const LABEL_RISE_PER_TICK: f32 = 2.0;
const LABEL_Z: f32 = 10.0;
const LABEL_FONT_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind { DamageDealt, DamageTaken, Heal }

impl LabelKind {
    pub fn color(self) -> Color {
        match self {
            LabelKind::DamageDealt => Color::rgb(1.0, 1.0, 0.0),
            LabelKind::DamageTaken => Color::rgb(1.0, 0.2, 0.2),
            LabelKind::Heal => Color::rgb(0.2, 1.0, 0.2),
        }
    }
}

/// Cosmetic rising number. Nothing in the simulation reads it back.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FloatingLabel { pub value: u32, pub kind: LabelKind, pub spawned_at: u64 }

impl FloatingLabel {
    /// Shown values never drop below 1.
    pub fn new(amount: f32, kind: LabelKind, now: u64) -> Self { Self { value: (amount as u32).max(1), kind, spawned_at: now } }
    pub fn text(&self) -> String { self.value.to_string() }
    pub fn expired(&self, now: u64) -> bool { now.saturating_sub(self.spawned_at) > LABEL_LIFETIME_MS }
    pub fn alpha(&self, now: u64) -> f32 {
        let progress = now.saturating_sub(self.spawned_at) as f32 / LABEL_LIFETIME_MS as f32;
        (1.0 - progress.powf(2.0)).max(0.0)
    }
}

impl CreditPause for FloatingLabel {
    fn credit_pause(&mut self, paused_ms: u64) { self.spawned_at.credit_pause(paused_ms); }
}

pub fn spawn_floating_label(commands: &mut Commands, position: Vec2, amount: f32, kind: LabelKind, now: u64) {
    commands.spawn((
        TransformBundle::from_transform(Transform::from_translation(position.extend(LABEL_Z))),
        FloatingLabel::new(amount, kind, now),
        Name::new("FloatingLabel"),
    ));
}

pub struct VisualEffectsPlugin;

impl Plugin for VisualEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, animate_floating_labels.in_set(SimulationSet::Feedback));
    }
}

fn animate_floating_labels(mut commands: Commands, clock: Res<SessionClock>, mut query: Query<(Entity, &FloatingLabel, &mut Transform)>) {
    let now = clock.now();
    for (entity, label, mut transform) in query.iter_mut() {
        if label.expired(now) { commands.entity(entity).despawn_recursive(); continue; }
        transform.translation.y += LABEL_RISE_PER_TICK;
    }
}

/// Render side: gives new labels their text and fades them out.
pub struct LabelRenderPlugin;

impl Plugin for LabelRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, (attach_label_text, fade_label_text).chain().before(TransformSystem::TransformPropagate));
    }
}

fn attach_label_text(mut commands: Commands, asset_server: Res<AssetServer>, query: Query<(Entity, &FloatingLabel, &Transform), Added<FloatingLabel>>) {
    for (entity, label, transform) in query.iter() {
        commands.entity(entity).insert(Text2dBundle {
            text: Text::from_section(label.text(), TextStyle { font: asset_server.load("fonts/FiraSans-Bold.ttf"), font_size: LABEL_FONT_SIZE, color: label.kind.color() }),
            transform: *transform,
            ..default()
        });
    }
}

fn fade_label_text(clock: Res<SessionClock>, mut query: Query<(&FloatingLabel, &mut Text)>) {
    for (label, mut text) in query.iter_mut() {
        if let Some(section) = text.sections.get_mut(0) { section.style.color.set_a(label.alpha(clock.now())); }
    }
}
