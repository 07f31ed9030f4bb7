use bevy::{prelude::*, window::PrimaryWindow};
use crate::camera_systems::MainCamera;

/// Per-tick view of the player's intent. The simulation only ever reads this.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputSnapshot {
    pub movement: Vec2,
    pub attack_held: bool,
    pub aim_point: Vec2,
    /// One-shot; cleared by the simulation once handled.
    pub special_triggered: bool,
}

impl InputSnapshot {
    pub fn take_special(&mut self) -> bool { std::mem::take(&mut self.special_triggered) }
}

pub struct InputCapturePlugin;

impl Plugin for InputCapturePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, capture_input.after(bevy::input::InputSystem));
    }
}

fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    let mut direction = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) { direction.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) { direction.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) { direction.y += 1.0; }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) { direction.y -= 1.0; }
    snapshot.movement = direction.normalize_or_zero();
    snapshot.attack_held = mouse.pressed(MouseButton::Left);
    if mouse.just_pressed(MouseButton::Right) { snapshot.special_triggered = true; }

    let Ok(window) = window_query.get_single() else { return };
    let Ok((camera, camera_transform)) = camera_query.get_single() else { return };
    if let Some(world) = window.cursor_position().and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor)) {
        snapshot.aim_point = world;
    }
}
