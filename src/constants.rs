//! This module contains all the constants used by the simulation.
//!
//! Distances are in meters, angles in radians and durations in seconds unless noted otherwise.

use std::time::Duration;

/// Target duration of a single frame for the headless driver.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Camera (player) tuning.
pub mod camera {
    use glam::Vec3;

    /// Height the camera is pinned to, every frame.
    pub const EYE_HEIGHT: f32 = 1.6;
    /// Where the camera stands when a session begins.
    pub const START_POSITION: Vec3 = Vec3::new(0.0, EYE_HEIGHT, 5.0);
    /// Walking speed, in meters per second.
    pub const MOVE_SPEED: f32 = 5.0;
    /// Radians of rotation per pixel of pointer movement.
    pub const LOOK_SENSITIVITY: f32 = 0.002;
    /// Pitch is clamped to +/- this value (85 degrees).
    pub const MAX_PITCH: f32 = 1.483_529_8;
    /// How long the gaze-triggered 180 degree turn takes.
    pub const FLIP_DURATION: f32 = 0.6;
}

/// The playable area. Corners are (x, z) pairs; order does not matter.
pub mod room {
    use glam::Vec2;

    pub const CORNER_A: Vec2 = Vec2::new(-9.5, -9.5);
    pub const CORNER_B: Vec2 = Vec2::new(9.5, 9.5);
}

/// Reference points for the spatial triggers.
pub mod triggers {
    use glam::Vec3;

    pub const CHAIR_POSITION: Vec3 = Vec3::new(-3.0, 0.5, -4.0);
    pub const CHAIR_RADIUS: f32 = 1.8;

    pub const NOTICEBOARD_POSITION: Vec3 = Vec3::new(4.0, 1.5, -8.5);
    pub const NOTICEBOARD_RADIUS: f32 = 2.5;

    pub const PEACOCK_POSITION: Vec3 = Vec3::new(6.0, 0.9, -5.0);
    pub const PEACOCK_HOVER_RADIUS: f32 = 3.0;

    /// Minimum dot product between view direction and direction-to-target (roughly a 45 degree cone).
    pub const GAZE_DOT_THRESHOLD: f32 = 0.7;
}

/// Timing and placement of the scripted ghost encounter.
pub mod encounter {
    use glam::Vec3;

    /// Delay between session start and the ghost appearing.
    pub const IDLE_DELAY: f32 = 12.0;
    pub const APPROACH_DURATION: f32 = 12.0;
    pub const FACING_DURATION: f32 = 2.0;
    pub const GLOW_HOLD: f32 = 1.0;
    /// Time the ghost takes to reach the player once it rushes.
    pub const RUSH_DURATION: f32 = 2.0;
    /// The objective banner stays up this long after the rush lands, before the encounter resolves.
    pub const RUSH_DWELL: f32 = 10.0;

    pub const GHOST_START: Vec3 = Vec3::new(0.0, 0.0, -14.0);
    pub const GHOST_REST: Vec3 = Vec3::ZERO;
}

/// Audio cue policy.
pub mod audio {
    /// Number of times the taunt cue plays once the ghost rushes.
    pub const TAUNT_PLAYS: u8 = 3;
    /// Delay between taunt plays when the host cannot report the cue's length.
    pub const TAUNT_FALLBACK_DELAY: f32 = 2.5;
    /// Ambient hum volume at session start, 0..1.
    pub const DEFAULT_AMBIENT_LEVEL: f32 = 0.5;
}

pub mod ui {
    /// Cosmetic health shown by the HUD.
    pub const DEFAULT_HEALTH: u8 = 100;
}
