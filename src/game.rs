//! This module contains the per-session simulation state and its frame loop.

use std::time::Instant;

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use tracing::{debug, info, warn};

use crate::audio::AudioHost;
use crate::config::SceneConfig;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::pointer::PointerHost;
use crate::snapshot::FrameSnapshot;
use crate::systems::{
    audio_system, boundary_system, camera_flip_system, command_system, encounter_system, end_session_system,
    error_log_system, input_system, look_system, motion_system, peacock_swap_system, profile, session_clock_system,
    start_session_system, toggle_system, trigger_system, AudioEvent, AudioResource, AudioState, Bindings, BoundaryRect,
    CameraBundle, CameraFlip, DeltaTime, Encounter, EncounterPhase, Ghost, GhostBundle, GhostVisual, GlobalState,
    InputFrame, InputState, Pitch, PlayerControlled, PointerResource, Pose, Prop, RepeatSchedule, SessionClock,
    SessionFlags, SystemId, SystemTimings, Timing, ToggleHandlers, TriggerSet, UiSignals,
};

/// Stages of a frame, run strictly in this order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum FrameSet {
    /// Raw input, session clock, toggles and commands
    Input,
    /// Look, scripted turn, motion, then the boundary clamp
    Camera,
    /// Everything that reads the settled camera pose
    Respond,
}

/// One play session: an ECS `World` holding the camera, the ghost and all session resources, and
/// the `Schedule` that advances them a frame at a time.
///
/// The audio and pointer hosts are stored as `NonSend` resources, as browser and windowing
/// handles are usually tied to the main thread.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a session with the default scene.
    pub fn new(audio: Box<dyn AudioHost>, pointer: Box<dyn PointerHost>) -> Game {
        Self::with_config(SceneConfig::default(), audio, pointer)
    }

    pub fn with_config(config: SceneConfig, audio: Box<dyn AudioHost>, pointer: Box<dyn PointerHost>) -> Game {
        info!("Initializing session world");
        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);

        debug!("Spawning scene entities");
        Self::spawn_entities(&mut world, &config);

        debug!("Inserting resources into ECS world");
        Self::insert_resources(&mut world, config, audio, pointer);

        debug!("Configuring system execution schedule");
        Self::configure_schedule(&mut schedule);

        Game { world, schedule }
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);
    }

    fn spawn_entities(world: &mut World, config: &SceneConfig) {
        let mut camera_start = config.camera_start;
        camera_start.y = config.eye_height;

        world.spawn(CameraBundle {
            player: PlayerControlled,
            pose: Pose::new(camera_start, 0.0),
            pitch: Pitch::default(),
        });
        world.spawn(GhostBundle {
            ghost: Ghost,
            pose: Pose::new(config.encounter.ghost_start, 0.0),
            visual: GhostVisual::default(),
        });
        world.spawn(Prop::Peacock);
    }

    fn insert_resources(world: &mut World, config: SceneConfig, audio: Box<dyn AudioHost>, pointer: Box<dyn PointerHost>) {
        world.insert_resource(BoundaryRect::from_corners(config.room_corners.0, config.room_corners.1));
        world.insert_resource(TriggerSet::from_config(&config));
        world.insert_resource(UiSignals::new(config.health));
        world.insert_resource(AudioState::new(config.ambient_level));
        world.insert_resource(config);

        // Nothing moves until the session starts.
        world.insert_resource(SessionFlags::MOVEMENT_LOCKED);
        world.insert_resource(SessionClock::default());
        world.insert_resource(Encounter::default());
        world.insert_resource(CameraFlip::default());
        world.insert_resource(RepeatSchedule::default());
        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DeltaTime::default());
        world.insert_resource(InputFrame::default());
        world.insert_resource(InputState::default());
        world.insert_resource(Bindings::default());
        world.insert_resource(ToggleHandlers::default());
        world.insert_resource(SystemTimings::default());
        world.insert_resource(Timing::default());

        world.insert_non_send_resource(AudioResource(audio));
        world.insert_non_send_resource(PointerResource(pointer));
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let input_system = profile(SystemId::Input, input_system);
        let session_clock_system = profile(SystemId::SessionClock, session_clock_system);
        let toggle_system = profile(SystemId::Toggle, toggle_system);
        let command_system = profile(SystemId::Command, command_system);
        let look_system = profile(SystemId::Look, look_system);
        let camera_flip_system = profile(SystemId::CameraFlip, camera_flip_system);
        let motion_system = profile(SystemId::Motion, motion_system);
        let boundary_system = profile(SystemId::Boundary, boundary_system);
        let trigger_system = profile(SystemId::Trigger, trigger_system);
        let peacock_swap_system = profile(SystemId::PeacockSwap, peacock_swap_system);
        let encounter_system = profile(SystemId::Encounter, encounter_system);
        let audio_system = profile(SystemId::Audio, audio_system);
        let error_log_system = profile(SystemId::ErrorLog, error_log_system);

        schedule
            .add_systems((
                (input_system, session_clock_system, toggle_system, command_system)
                    .chain()
                    .in_set(FrameSet::Input),
                (look_system, camera_flip_system, motion_system, boundary_system)
                    .chain()
                    .in_set(FrameSet::Camera),
                (
                    trigger_system,
                    peacock_swap_system,
                    encounter_system,
                    audio_system,
                    error_log_system,
                )
                    .chain()
                    .in_set(FrameSet::Respond),
            ))
            .configure_sets((FrameSet::Input, FrameSet::Camera, FrameSet::Respond).chain());
    }

    /// Starts the session clock, unlocks movement and requests pointer capture.
    ///
    /// Does nothing if the session is already running.
    pub fn start_session(&mut self) -> GameResult<()> {
        self.world
            .run_system_once(start_session_system)
            .map_err(|e| GameError::InvalidState(format!("Could not start session: {}", e)))
    }

    /// Ends the session, cancelling the encounter and any pending audio retriggers.
    pub fn end_session(&mut self) -> GameResult<()> {
        self.world
            .run_system_once(end_session_system)
            .map_err(|e| GameError::InvalidState(format!("Could not end session: {}", e)))
    }

    /// Throws the session away and starts a fresh one on the same hosts and scene.
    pub fn restart(&mut self) -> GameResult<()> {
        self.end_session()?;

        let audio = self
            .world
            .remove_non_send_resource::<AudioResource>()
            .ok_or_else(|| GameError::InvalidState("Audio host missing on restart".to_string()))?;
        let pointer = self
            .world
            .remove_non_send_resource::<PointerResource>()
            .ok_or_else(|| GameError::InvalidState("Pointer host missing on restart".to_string()))?;
        let config = self.world.remove_resource::<SceneConfig>().unwrap_or_default();

        info!("Restarting session");
        *self = Game::with_config(config, audio.0, pointer.0);
        self.start_session()
    }

    /// Queues a host-side command (volume change, exit) for the next frame.
    pub fn send(&mut self, command: GameCommand) {
        self.world.send_event(GameEvent::Command(command));
    }

    /// Runs one frame of the simulation.
    ///
    /// # Arguments
    ///
    /// * `dt` - Seconds since the previous frame
    /// * `input` - Key events and pointer movement gathered by the host this frame
    ///
    /// # Returns
    ///
    /// `true` if an exit has been requested.
    pub fn tick(&mut self, dt: f32, input: InputFrame) -> bool {
        self.world.insert_resource(DeltaTime { seconds: dt });
        self.world.insert_resource(input);

        let start = Instant::now();
        self.schedule.run(&mut self.world);
        let total_duration = start.elapsed();

        Self::update_events(&mut self.world);

        if let (Some(timings), Some(timing)) = (
            self.world.get_resource::<SystemTimings>(),
            self.world.get_resource::<Timing>(),
        ) {
            let tick = timing.increment_tick();
            timings.add_total_timing(total_duration, tick);

            // Allow 20% over the frame's own delta before complaining.
            let frame_budget = std::time::Duration::from_secs_f32((dt * 1.2).max(0.0));
            if total_duration > frame_budget {
                let slowest = timings
                    .get_slowest_systems()
                    .iter()
                    .map(|(id, duration)| format!("{} ({:.2?})", id, duration))
                    .collect::<Vec<String>>()
                    .join(", ");

                warn!(
                    total = format!("{:.3?}", total_duration),
                    tick,
                    systems = slowest,
                    budget = format!("{:.1?}", frame_budget),
                    "Frame took longer than expected"
                );
            }
        }

        self.world.get_resource::<GlobalState>().is_some_and(|state| state.exit)
    }

    /// Swaps the double buffers of every event type so events live for exactly two frames.
    fn update_events(world: &mut World) {
        world.resource_mut::<Events<GameEvent>>().update();
        world.resource_mut::<Events<AudioEvent>>().update();
        world.resource_mut::<Events<GameError>>().update();
    }

    /// Copies out the state the render and UI collaborators draw from.
    pub fn snapshot(&mut self) -> GameResult<FrameSnapshot> {
        let invalid = |what: &str, e: bevy_ecs::query::QuerySingleError| {
            GameError::InvalidState(format!("No/multiple {} entities for snapshot: {}", what, e))
        };

        let (camera, pitch) = self
            .world
            .query_filtered::<(&Pose, &Pitch), With<PlayerControlled>>()
            .single(&self.world)
            .map(|(pose, pitch)| (*pose, pitch.0))
            .map_err(|e| invalid("camera", e))?;
        let (ghost, ghost_visual) = self
            .world
            .query_filtered::<(&Pose, &GhostVisual), With<Ghost>>()
            .single(&self.world)
            .map(|(pose, visual)| (*pose, *visual))
            .map_err(|e| invalid("ghost", e))?;
        let prop = self
            .world
            .query::<&Prop>()
            .single(&self.world)
            .copied()
            .map_err(|e| invalid("prop", e))?;

        Ok(FrameSnapshot {
            camera,
            pitch,
            ghost,
            ghost_visual,
            prop,
            ui: self
                .world
                .get_resource::<UiSignals>()
                .copied()
                .ok_or_else(|| GameError::InvalidState("UI signals missing for snapshot".to_string()))?,
            flags: self.flags(),
            phase: self.phase(),
        })
    }

    pub fn phase(&self) -> EncounterPhase {
        self.world
            .get_resource::<Encounter>()
            .map(|encounter| encounter.phase)
            .unwrap_or(EncounterPhase::Idle)
    }

    pub fn flags(&self) -> SessionFlags {
        self.world.get_resource::<SessionFlags>().copied().unwrap_or_default()
    }

    /// Session time, in seconds, as seen by the encounter.
    pub fn elapsed(&self) -> f32 {
        self.world.get_resource::<SessionClock>().map_or(0.0, |clock| clock.elapsed)
    }
}
