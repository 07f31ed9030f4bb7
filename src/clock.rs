use bevy::prelude::*;
use std::time::Duration;

/// Millisecond wall clock for every cooldown and status timer in a session.
///
/// It keeps running while the run is paused; `end_pause` reports how long
/// the pause lasted so owners of stored timestamps can shift them forward.
#[derive(Resource, Debug, Default, Clone)]
pub struct SessionClock {
    elapsed: Duration,
    paused_at: Option<u64>,
}

impl SessionClock {
    pub fn now(&self) -> u64 { self.elapsed.as_millis() as u64 }
    pub fn advance(&mut self, delta: Duration) { self.elapsed += delta; }
    pub fn advance_ms(&mut self, ms: u64) { self.advance(Duration::from_millis(ms)); }
    pub fn is_paused(&self) -> bool { self.paused_at.is_some() }

    pub fn begin_pause(&mut self) {
        if self.paused_at.is_none() { self.paused_at = Some(self.now()); }
    }

    /// Closes the current pause and returns its length. Zero when no pause was open.
    pub fn end_pause(&mut self) -> u64 {
        match self.paused_at.take() { Some(start) => self.now().saturating_sub(start), None => 0 }
    }
}

pub struct SessionClockPlugin;

impl Plugin for SessionClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionClock>().add_systems(PreUpdate, advance_session_clock);
    }
}

fn advance_session_clock(time: Res<Time<Real>>, mut clock: ResMut<SessionClock>) { clock.advance(time.delta()); }
