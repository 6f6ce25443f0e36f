use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res},
};
use glam::{Vec2, Vec3};
use tracing::debug;

use crate::config::SceneConfig;
use crate::error::GameError;
use crate::systems::components::{PlayerControlled, Pose};

/// Axis-aligned play area on the ground plane. Fixed for the session.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl BoundaryRect {
    /// Builds the rectangle from two opposite `(x, z)` corners, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_z: a.y.min(b.y),
            max_z: a.y.max(b.y),
        }
    }

    pub fn contains(&self, position: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&position.x) && (self.min_z..=self.max_z).contains(&position.z)
    }

    /// Clamps x and z into the rectangle. y is left alone.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y,
            position.z.clamp(self.min_z, self.max_z),
        )
    }
}

/// Keeps the camera inside the room at eye height.
///
/// Runs every frame regardless of movement lock so that positions injected from outside the
/// motion controller are corrected before anything downstream reads them.
pub fn boundary_system(
    bounds: Res<BoundaryRect>,
    config: Res<SceneConfig>,
    mut camera: Query<&mut Pose, With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let mut pose = match camera.single_mut() {
        Ok(pose) => pose,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for boundary system: {}",
                e
            )));
            return;
        }
    };

    let mut corrected = bounds.clamp(pose.position);
    corrected.y = config.eye_height;

    if corrected != pose.position {
        if !bounds.contains(pose.position) {
            debug!(from = ?pose.position, to = ?corrected, "Camera clamped to room bounds");
        }
        pose.position = corrected;
    }
}
