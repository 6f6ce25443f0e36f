use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Query, Res},
};
use glam::{Vec2, Vec3};
use tracing::trace;

use crate::config::SceneConfig;
use crate::error::GameError;
use crate::systems::{
    components::{DeltaTime, Pitch, PlayerControlled, Pose, SessionFlags},
    input::{InputState, MovementIntents},
};

/// Builds the 2D intent from held keys: `x` is strafe (right positive), `y` is forward.
///
/// Opposing keys cancel. The result is normalized, so its length is either 0 or 1.
pub fn intent_vector(intents: MovementIntents) -> Vec2 {
    let axis = |positive: MovementIntents, negative: MovementIntents| -> f32 {
        intents.contains(positive) as i8 as f32 - intents.contains(negative) as i8 as f32
    };

    Vec2::new(
        axis(MovementIntents::RIGHT, MovementIntents::LEFT),
        axis(MovementIntents::FORWARD, MovementIntents::BACKWARD),
    )
    .normalize_or_zero()
}

/// Flattens a view direction onto the ground plane.
///
/// Returns `(forward, right)` unit vectors; `right` is `forward x up`.
pub fn horizontal_basis(view: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(view.x, 0.0, view.z).normalize_or_zero();
    (forward, forward.cross(Vec3::Y))
}

/// World-space displacement for one frame of movement.
pub fn displacement(view: Vec3, intent: Vec2, speed: f32, dt: f32) -> Vec3 {
    let (forward, right) = horizontal_basis(view);
    (forward * intent.y + right * intent.x) * speed * dt
}

/// Applies the pointer look delta to the camera's yaw and pitch.
///
/// Only active while the pointer is captured, the menu is closed and the scripted camera flip is
/// not running.
pub fn look_system(
    input: Res<InputState>,
    flags: Res<SessionFlags>,
    config: Res<SceneConfig>,
    mut camera: Query<(&mut Pose, &mut Pitch), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    if input.look_delta == Vec2::ZERO
        || !flags.contains(SessionFlags::POINTER_CAPTURED)
        || flags.intersects(SessionFlags::MENU_OPEN | SessionFlags::CAMERA_FLIP)
    {
        return;
    }

    let (mut pose, mut pitch) = match camera.single_mut() {
        Ok(camera) => camera,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for look system: {}",
                e
            )));
            return;
        }
    };

    pose.yaw -= input.look_delta.x * config.look_sensitivity;
    pitch.0 = (pitch.0 - input.look_delta.y * config.look_sensitivity).clamp(-config.max_pitch, config.max_pitch);
}

/// Moves the camera along the ground plane according to the held intents.
pub fn motion_system(
    delta_time: Res<DeltaTime>,
    input: Res<InputState>,
    flags: Res<SessionFlags>,
    config: Res<SceneConfig>,
    mut camera: Query<(&mut Pose, &Pitch), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    if flags.intersects(SessionFlags::MOVEMENT_LOCKED | SessionFlags::MENU_OPEN) {
        return;
    }

    let intent = intent_vector(input.intents);
    if intent == Vec2::ZERO {
        return;
    }

    let (mut pose, pitch) = match camera.single_mut() {
        Ok(camera) => camera,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for motion system: {}",
                e
            )));
            return;
        }
    };

    let view = pitch.view_direction(pose.yaw);
    let step = displacement(view, intent, config.move_speed, delta_time.seconds);
    pose.position += step;

    trace!(?step, position = ?pose.position, "Camera moved");
}
