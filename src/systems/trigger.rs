//! Spatial triggers evaluated against the post-boundary camera pose.
//!
//! Proximity triggers are a pure distance test with no hysteresis, so a camera parked exactly on a
//! threshold may flicker between frames. The gaze trigger adds a view-cone test on top of its
//! hover range and latches, firing once per qualifying approach.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use strum_macros::{Display, EnumIter};
use tracing::{debug, info};

use crate::config::{SceneConfig, TriggerPoint};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::systems::components::{Pitch, PlayerControlled, Pose, SessionFlags, UiSignals};

/// UI signals driven by spatial triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Signal {
    NearChair,
    NearNoticeboard,
    PeacockHovering,
}

/// `true` iff `position` is within `radius` of `point`, inclusive.
pub fn proximity(position: Vec3, point: Vec3, radius: f32) -> bool {
    position.distance(point) <= radius
}

/// Cosine of the angle between the view direction and the direction to `target`.
///
/// Zero when the camera sits on the target or has no view direction.
pub fn gaze_dot(position: Vec3, view: Vec3, target: Vec3) -> f32 {
    let to_target = (target - position).normalize_or_zero();
    to_target.dot(view.normalize_or_zero())
}

#[derive(Debug, Clone, Copy)]
pub struct ProximityTrigger {
    pub signal: Signal,
    pub point: TriggerPoint,
    last: bool,
}

impl ProximityTrigger {
    pub fn new(signal: Signal, point: TriggerPoint) -> Self {
        Self {
            signal,
            point,
            last: false,
        }
    }

    /// Evaluates the trigger and returns the current signal.
    pub fn evaluate(&mut self, position: Vec3) -> bool {
        let active = proximity(position, self.point.position, self.point.radius);
        if active != self.last {
            debug!(signal = %self.signal, active, "Trigger changed");
        }
        self.last = active;
        active
    }

    /// The value reported on the previous evaluation.
    pub fn last(&self) -> bool {
        self.last
    }
}

/// Result of evaluating the gaze trigger for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GazeOutcome {
    pub hovering: bool,
    /// Set on the single frame the gaze is confirmed.
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct GazeTrigger {
    pub point: TriggerPoint,
    pub dot_threshold: f32,
    hovering: bool,
    latched: bool,
}

impl GazeTrigger {
    pub fn new(point: TriggerPoint, dot_threshold: f32) -> Self {
        Self {
            point,
            dot_threshold,
            hovering: false,
            latched: false,
        }
    }

    pub fn evaluate(&mut self, position: Vec3, view: Vec3) -> GazeOutcome {
        let hovering = proximity(position, self.point.position, self.point.radius);
        if hovering != self.hovering {
            debug!(signal = %Signal::PeacockHovering, active = hovering, "Trigger changed");
        }
        self.hovering = hovering;

        let looking = hovering && gaze_dot(position, view, self.point.position) > self.dot_threshold;
        let confirmed = looking && !self.latched;
        self.latched = looking;

        GazeOutcome { hovering, confirmed }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct TriggerSet {
    pub chair: ProximityTrigger,
    pub noticeboard: ProximityTrigger,
    pub peacock: GazeTrigger,
}

impl TriggerSet {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            chair: ProximityTrigger::new(Signal::NearChair, config.chair),
            noticeboard: ProximityTrigger::new(Signal::NearNoticeboard, config.noticeboard),
            peacock: GazeTrigger::new(config.peacock, config.gaze_dot_threshold),
        }
    }
}

pub fn trigger_system(
    flags: Res<SessionFlags>,
    mut triggers: ResMut<TriggerSet>,
    mut ui: ResMut<UiSignals>,
    camera: Query<(&Pose, &Pitch), With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (pose, pitch) = match camera.single() {
        Ok(camera) => camera,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for trigger system: {}",
                e
            )));
            return;
        }
    };

    let position = pose.position;
    let view = pitch.view_direction(pose.yaw);

    let near_chair = triggers.chair.evaluate(position);
    let near_noticeboard = triggers.noticeboard.evaluate(position);
    let gaze = triggers.peacock.evaluate(position, view);

    ui.near_chair = near_chair;
    ui.near_noticeboard = near_noticeboard;
    ui.peacock_hovering = gaze.hovering;

    // The swap is permanent; nothing left to confirm afterwards.
    if gaze.confirmed && !flags.contains(SessionFlags::PEACOCK_SWAPPED) {
        info!(?position, "Gaze on peacock confirmed");
        events.write(GameEvent::GazeConfirmed);
    }
}
