use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use bitflags::bitflags;
use glam::Vec3;

/// A tag component for the entity the player looks through.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component for the ghost.
#[derive(Default, Component)]
pub struct Ghost;

/// Position plus horizontal facing of an entity in the scene.
///
/// Yaw is measured in radians around the world up axis; a yaw of zero looks down -Z.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Unit vector the entity faces, ignoring pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Unit vector to the entity's right (forward crossed with world up).
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }
}

/// Vertical look angle of the camera, in radians. Positive looks up.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Pitch(pub f32);

impl Pitch {
    /// The full view direction for a camera with the given yaw and this pitch.
    pub fn view_direction(&self, yaw: f32) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.0.sin_cos();
        Vec3::new(-yaw.sin() * cos_pitch, sin_pitch, -yaw.cos() * cos_pitch)
    }
}

/// What the renderer should draw for the ghost.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GhostVisual {
    pub visible: bool,
    /// Red eye light, switched on for the rush.
    pub glowing: bool,
}

/// The swappable decoration on the shelf.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    #[default]
    Peacock,
    /// Shown permanently once the player has stared at the peacock.
    Alternate,
}

#[derive(Bundle)]
pub struct CameraBundle {
    pub player: PlayerControlled,
    pub pose: Pose,
    pub pitch: Pitch,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub pose: Pose,
    pub visual: GhostVisual,
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DeltaTime {
    /// Seconds elapsed since the previous frame
    pub seconds: f32,
}

bitflags! {
    /// Session-wide booleans, each written by exactly one system.
    #[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SessionFlags: u8 {
        /// Written by the encounter and the session lifecycle.
        const MOVEMENT_LOCKED = 1 << 0;
        const FLASHLIGHT_ON = 1 << 1;
        const POINTER_CAPTURED = 1 << 2;
        const MENU_OPEN = 1 << 3;
        const PEACOCK_SWAPPED = 1 << 4;
        const CAMERA_FLIP = 1 << 5;
        const SESSION_STARTED = 1 << 6;
    }
}

/// Overlay signals for the UI collaborator.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiSignals {
    pub near_chair: bool,
    pub near_noticeboard: bool,
    pub peacock_hovering: bool,
    pub subtitle_visible: bool,
    pub objective_visible: bool,
    /// Cosmetic only.
    pub health: u8,
}

impl UiSignals {
    pub fn new(health: u8) -> Self {
        Self {
            near_chair: false,
            near_noticeboard: false,
            peacock_hovering: false,
            subtitle_visible: false,
            objective_visible: false,
            health,
        }
    }
}
