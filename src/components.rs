use bevy::prelude::*;

/// Shifts every wall-clock timestamp a value owns by the time spent paused.
pub trait CreditPause {
    fn credit_pause(&mut self, paused_ms: u64);
}

impl CreditPause for u64 {
    fn credit_pause(&mut self, paused_ms: u64) { *self = self.saturating_add(paused_ms); }
}

impl<T: CreditPause> CreditPause for Option<T> {
    fn credit_pause(&mut self, paused_ms: u64) { if let Some(inner) = self.as_mut() { inner.credit_pause(paused_ms); } }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health { pub current: f32, pub max: f32 }

impl Health {
    pub fn new(max: f32) -> Self { Self { current: max, max } }
    /// Fraction of health left; an empty pool reads as zero instead of dividing by zero.
    pub fn ratio(&self) -> f32 { if self.max <= 0.0 { 0.0 } else { (self.current / self.max).clamp(0.0, 1.0) } }
    pub fn is_depleted(&self) -> bool { self.current <= 0.0 }
    /// Heals up to `max` and returns how much was actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 { return 0.0; }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }
    pub fn lose(&mut self, amount: f32) { self.current = (self.current - amount).max(0.0); }
}

/// Collision box tracked independently of whatever sprite is drawn for the entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct Hitbox(pub Vec2);

impl Hitbox {
    pub fn rect_at(&self, center: Vec2) -> Rect { Rect::from_center_size(center, self.0) }
    pub fn overlaps(&self, center: Vec2, other: &Hitbox, other_center: Vec2) -> bool {
        boxes_overlap(self.rect_at(center), other.rect_at(other_center))
    }
}

/// Strict AABB overlap; boxes that only share an edge do not collide.
pub fn boxes_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing { Left, #[default] Right }

/// Animation-facing state shared by the player and enemies.
#[derive(Component, Debug, Clone, Default)]
pub struct ActorState {
    pub facing: Facing,
    pub flash_until: Option<u64>,
}

impl ActorState {
    pub fn flash(&mut self, now: u64, duration_ms: u64) { self.flash_until = Some(now + duration_ms); }
    pub fn is_flashing(&self, now: u64) -> bool { self.flash_until.map_or(false, |until| now < until) }
    pub fn face_towards(&mut self, from: Vec2, target: Vec2) {
        self.facing = if target.x >= from.x { Facing::Right } else { Facing::Left };
    }
    pub fn expire_flash(&mut self, now: u64) { if !self.is_flashing(now) { self.flash_until = None; } }
}

impl CreditPause for ActorState {
    fn credit_pause(&mut self, paused_ms: u64) { self.flash_until.credit_pause(paused_ms); }
}
