//! Scene configuration.
//!
//! Everything the core needs to know about the room layout and the encounter script, gathered in
//! one resource. [`SceneConfig::default`] reproduces the shipped scene from [`crate::constants`];
//! tests and hosts override individual fields.

use bevy_ecs::resource::Resource;
use glam::{Vec2, Vec3};

use crate::constants;
use crate::systems::encounter::PhaseKind;

/// A reference point and the distance at which its trigger fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPoint {
    pub position: Vec3,
    pub radius: f32,
}

impl TriggerPoint {
    pub const fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }
}

/// Phase lengths and ghost waypoints for the scripted encounter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterTimings {
    /// Seconds from session start until the ghost appears
    pub idle_delay: f32,
    pub approach: f32,
    pub facing: f32,
    pub glow_hold: f32,
    /// Seconds the ghost takes to reach the player
    pub rush: f32,
    /// Seconds the objective banner stays up after the rush lands
    pub rush_dwell: f32,
    pub ghost_start: Vec3,
    pub ghost_rest: Vec3,
}

impl Default for EncounterTimings {
    fn default() -> Self {
        use constants::encounter::*;

        Self {
            idle_delay: IDLE_DELAY,
            approach: APPROACH_DURATION,
            facing: FACING_DURATION,
            glow_hold: GLOW_HOLD,
            rush: RUSH_DURATION,
            rush_dwell: RUSH_DWELL,
            ghost_start: GHOST_START,
            ghost_rest: GHOST_REST,
        }
    }
}

impl EncounterTimings {
    /// How long the given phase lasts. `None` for the terminal phase.
    pub fn duration(&self, phase: PhaseKind) -> Option<f32> {
        match phase {
            PhaseKind::Idle => Some(self.idle_delay),
            PhaseKind::Approaching => Some(self.approach),
            PhaseKind::Facing => Some(self.facing),
            PhaseKind::Glowing => Some(self.glow_hold),
            PhaseKind::Rushing => Some(self.rush + self.rush_dwell),
            PhaseKind::Resolved => None,
        }
    }
}

/// Layout and tuning for a session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub eye_height: f32,
    pub camera_start: Vec3,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub max_pitch: f32,
    pub flip_duration: f32,
    /// Two opposite (x, z) corners of the playable area
    pub room_corners: (Vec2, Vec2),
    pub chair: TriggerPoint,
    pub noticeboard: TriggerPoint,
    pub peacock: TriggerPoint,
    pub gaze_dot_threshold: f32,
    pub encounter: EncounterTimings,
    pub taunt_plays: u8,
    pub taunt_fallback_delay: f32,
    pub ambient_level: f32,
    pub health: u8,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use constants::{audio, camera, room, triggers, ui};

        Self {
            eye_height: camera::EYE_HEIGHT,
            camera_start: camera::START_POSITION,
            move_speed: camera::MOVE_SPEED,
            look_sensitivity: camera::LOOK_SENSITIVITY,
            max_pitch: camera::MAX_PITCH,
            flip_duration: camera::FLIP_DURATION,
            room_corners: (room::CORNER_A, room::CORNER_B),
            chair: TriggerPoint::new(triggers::CHAIR_POSITION, triggers::CHAIR_RADIUS),
            noticeboard: TriggerPoint::new(triggers::NOTICEBOARD_POSITION, triggers::NOTICEBOARD_RADIUS),
            peacock: TriggerPoint::new(triggers::PEACOCK_POSITION, triggers::PEACOCK_HOVER_RADIUS),
            gaze_dot_threshold: triggers::GAZE_DOT_THRESHOLD,
            encounter: EncounterTimings::default(),
            taunt_plays: audio::TAUNT_PLAYS,
            taunt_fallback_delay: audio::TAUNT_FALLBACK_DELAY,
            ambient_level: audio::DEFAULT_AMBIENT_LEVEL,
            health: ui::DEFAULT_HEALTH,
        }
    }
}
