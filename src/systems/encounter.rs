//! The scripted ghost encounter.
//!
//! A strictly sequential phase machine sampled from the session clock every frame. Each phase
//! knows its own duration; when the clock passes the end of the current phase the machine steps
//! forward, carrying the exact end time over as the next phase's entry time, so a long frame can
//! cross several phases and still land on the same poses as a fine-grained run.
//!
//! Interpolations are linear in `(now - entered_at) / duration`, clamped to `[0, 1]`.

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use strum_macros::{Display, EnumDiscriminants, EnumIter};
use tracing::{debug, info};

use crate::audio::Cue;
use crate::config::SceneConfig;
use crate::error::GameError;
use crate::systems::{
    audio::AudioEvent,
    components::{Ghost, GhostVisual, PlayerControlled, Pose, SessionFlags, UiSignals},
    session::SessionClock,
};

#[derive(Debug, Clone, Copy, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(PhaseKind), derive(Display, EnumIter, PartialOrd, Ord, Hash))]
pub enum EncounterPhase {
    Idle,
    /// Ghost drifts from its start point to the middle of the room.
    Approaching,
    /// Ghost turns toward where the camera stood when this phase began.
    Facing { target_yaw: f32 },
    /// Eyes light up; a short hold before the rush.
    Glowing,
    /// Ghost rushes the camera position captured on entry, then the objective banner lingers.
    Rushing { target: Vec3 },
    Resolved,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Encounter {
    pub phase: EncounterPhase,
    /// Session time at which `phase` began.
    pub entered_at: f32,
}

impl Default for Encounter {
    fn default() -> Self {
        Self {
            phase: EncounterPhase::Idle,
            entered_at: 0.0,
        }
    }
}

impl Encounter {
    pub fn kind(&self) -> PhaseKind {
        PhaseKind::from(self.phase)
    }

    /// Whether the ghost is on stage (everything between Idle and Resolved).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, EncounterPhase::Idle | EncounterPhase::Resolved)
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == EncounterPhase::Resolved
    }
}

/// Linear progress through a phase of length `duration`.
pub fn phase_fraction(elapsed: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Yaw that points a ghost at `from` toward `to`, as `atan(dx / dz)` resolved by quadrant.
///
/// The ghost model faces +Z at zero yaw.
pub fn facing_yaw(from: Vec3, to: Vec3) -> f32 {
    let delta = to - from;
    delta.x.atan2(delta.z)
}

/// Applies the terminal side effects and parks the machine in `Resolved`.
pub fn resolve(encounter: &mut Encounter, visual: &mut GhostVisual, ui: &mut UiSignals, flags: &mut SessionFlags) {
    visual.visible = false;
    visual.glowing = false;
    ui.subtitle_visible = false;
    ui.objective_visible = false;
    flags.remove(SessionFlags::MOVEMENT_LOCKED);
    encounter.phase = EncounterPhase::Resolved;
}

#[allow(clippy::too_many_arguments)]
pub fn encounter_system(
    clock: Res<SessionClock>,
    config: Res<SceneConfig>,
    mut encounter: ResMut<Encounter>,
    mut flags: ResMut<SessionFlags>,
    mut ui: ResMut<UiSignals>,
    camera: Query<&Pose, (With<PlayerControlled>, Without<Ghost>)>,
    mut ghost: Query<(&mut Pose, &mut GhostVisual), (With<Ghost>, Without<PlayerControlled>)>,
    mut audio_events: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    if !flags.contains(SessionFlags::SESSION_STARTED) || encounter.is_resolved() {
        return;
    }

    let (camera, (mut ghost_pose, mut visual)) = match (camera.single(), ghost.single_mut()) {
        (Ok(camera), Ok(ghost)) => (camera, ghost),
        (Err(e), _) | (_, Err(e)) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for encounter system: {}",
                e
            )));
            return;
        }
    };

    let timings = config.encounter;
    let now = clock.elapsed;

    // Step through every phase whose end has passed.
    while let Some(duration) = timings.duration(encounter.kind()) {
        let ends_at = encounter.entered_at + duration;
        if now < ends_at {
            break;
        }

        // Snap exact end values before leaving.
        match encounter.phase {
            EncounterPhase::Approaching => ghost_pose.position = timings.ghost_rest,
            EncounterPhase::Facing { target_yaw } => ghost_pose.yaw = target_yaw,
            EncounterPhase::Rushing { target } => ghost_pose.position = target,
            _ => {}
        }

        let old_kind = encounter.kind();
        encounter.entered_at = ends_at;

        match encounter.phase {
            EncounterPhase::Idle => {
                encounter.phase = EncounterPhase::Approaching;
                flags.insert(SessionFlags::MOVEMENT_LOCKED);
                ghost_pose.position = timings.ghost_start;
                ghost_pose.yaw = 0.0;
                visual.visible = true;
                ui.subtitle_visible = true;
                audio_events.write(AudioEvent::Play(Cue::GhostAppears));
            }
            EncounterPhase::Approaching => {
                let target_yaw = facing_yaw(ghost_pose.position, camera.position);
                encounter.phase = EncounterPhase::Facing { target_yaw };
                debug!(target_yaw, camera = ?camera.position, "Ghost facing target captured");
            }
            EncounterPhase::Facing { .. } => {
                encounter.phase = EncounterPhase::Glowing;
                visual.glowing = true;
            }
            EncounterPhase::Glowing => {
                let target = camera.position;
                encounter.phase = EncounterPhase::Rushing { target };
                ui.objective_visible = true;
                audio_events.write(AudioEvent::Repeat {
                    cue: Cue::Taunt,
                    plays: config.taunt_plays,
                });
                debug!(?target, "Ghost rush target captured");
            }
            EncounterPhase::Rushing { .. } => {
                resolve(&mut encounter, &mut visual, &mut ui, &mut flags);
            }
            EncounterPhase::Resolved => {}
        }

        info!(from = %old_kind, to = %encounter.kind(), at = ends_at, "Encounter phase transition");
    }

    let elapsed = now - encounter.entered_at;
    match encounter.phase {
        EncounterPhase::Approaching => {
            let t = phase_fraction(elapsed, timings.approach);
            ghost_pose.position = timings.ghost_start.lerp(timings.ghost_rest, t);
        }
        EncounterPhase::Facing { target_yaw } => {
            ghost_pose.yaw = target_yaw * phase_fraction(elapsed, timings.facing);
        }
        EncounterPhase::Rushing { target } => {
            let t = phase_fraction(elapsed, timings.rush);
            ghost_pose.position = timings.ghost_rest.lerp(target, t);
        }
        EncounterPhase::Idle | EncounterPhase::Glowing | EncounterPhase::Resolved => {}
    }
}
