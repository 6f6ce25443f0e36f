//! The peacock gaze payoff: a one-time prop swap and a half-turn of the camera.

use std::f32::consts::PI;

use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::error::GameError;
use crate::events::GameEvent;
use crate::systems::{
    components::{PlayerControlled, Pose, Prop, SessionFlags},
    session::SessionClock,
};

/// Progress of the scripted 180 degree camera turn.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub enum CameraFlip {
    #[default]
    Pending,
    Turning {
        from_yaw: f32,
        started_at: f32,
    },
    Done,
}

pub fn peacock_swap_system(
    mut events: EventReader<GameEvent>,
    mut flags: ResMut<SessionFlags>,
    mut flip: ResMut<CameraFlip>,
    clock: Res<SessionClock>,
    camera: Query<&Pose, With<PlayerControlled>>,
    mut props: Query<&mut Prop>,
    mut errors: EventWriter<GameError>,
) {
    let confirmed = events.read().any(|event| matches!(event, GameEvent::GazeConfirmed));
    if !confirmed || flags.contains(SessionFlags::PEACOCK_SWAPPED) {
        return;
    }

    let pose = match camera.single() {
        Ok(pose) => pose,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for peacock swap: {}",
                e
            )));
            return;
        }
    };

    for mut prop in props.iter_mut() {
        *prop = Prop::Alternate;
    }
    flags.insert(SessionFlags::PEACOCK_SWAPPED);

    if *flip == CameraFlip::Pending {
        *flip = CameraFlip::Turning {
            from_yaw: pose.yaw,
            started_at: clock.elapsed,
        };
        flags.insert(SessionFlags::CAMERA_FLIP);
    }

    info!(yaw = pose.yaw, "Peacock swapped, turning camera around");
}

/// Advances the camera turn, sampled from the session clock.
pub fn camera_flip_system(
    clock: Res<SessionClock>,
    config: Res<SceneConfig>,
    mut flags: ResMut<SessionFlags>,
    mut flip: ResMut<CameraFlip>,
    mut camera: Query<&mut Pose, With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let CameraFlip::Turning { from_yaw, started_at } = *flip else {
        return;
    };

    let mut pose = match camera.single_mut() {
        Ok(pose) => pose,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for camera flip: {}",
                e
            )));
            return;
        }
    };

    let fraction = if config.flip_duration > 0.0 {
        ((clock.elapsed - started_at) / config.flip_duration).clamp(0.0, 1.0)
    } else {
        1.0
    };

    if fraction >= 1.0 {
        pose.yaw = from_yaw + PI;
        *flip = CameraFlip::Done;
        flags.remove(SessionFlags::CAMERA_FLIP);
        debug!(yaw = pose.yaw, "Camera flip finished");
    } else {
        pose.yaw = from_yaw + PI * fraction;
    }
}
