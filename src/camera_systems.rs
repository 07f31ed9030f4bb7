use bevy::prelude::*;
use rand::Rng;
use crate::combat::ScreenShake;

const CAMERA_Z: f32 = 999.0;
const SHAKE_INTENSITY: f32 = 5.0;

#[derive(Component)]
pub struct MainCamera; // Marker component for the main game camera

pub struct CameraSystemsPlugin;

impl Plugin for CameraSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, camera_shake_system);
    }
}

fn spawn_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.transform.translation.z = CAMERA_Z;
    commands.spawn((camera_bundle, MainCamera));
}

/// The playfield is fixed on screen; the camera only jitters while a shake is running.
fn camera_shake_system(
    shake: Res<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut camera_transform) = camera_query.get_single_mut() else { return };
    let offset = if shake.remaining_ticks > 0 {
        let mut rng = rand::thread_rng();
        Vec2::new(rng.gen_range(-SHAKE_INTENSITY..=SHAKE_INTENSITY), rng.gen_range(-SHAKE_INTENSITY..=SHAKE_INTENSITY))
    } else {
        Vec2::ZERO
    };
    camera_transform.translation = offset.extend(CAMERA_Z);
}
