use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::audio::{AudioHost, NullAudio};
use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::formatter;
use crate::game::Game;
use crate::pointer::{GrantingPointer, PointerHost};
use crate::systems::{InputFrame, PhaseKind};

/// Headless driver: owns a session and steps it at a fixed rate until the encounter resolves.
pub struct App {
    pub game: Game,
    last_tick: Instant,
    last_phase: PhaseKind,
}

impl App {
    /// Builds a session on a silent audio host and a pointer host that always grants capture, and
    /// starts it.
    pub fn new() -> GameResult<Self> {
        Self::with_hosts(Box::new(NullAudio), Box::new(GrantingPointer))
    }

    pub fn with_hosts(audio: Box<dyn AudioHost>, pointer: Box<dyn PointerHost>) -> GameResult<Self> {
        let mut game = Game::new(audio, pointer);
        game.start_session()?;

        info!("Application initialization completed successfully");
        Ok(App {
            last_phase: game.phase().into(),
            game,
            last_tick: Instant::now(),
        })
    }

    /// Executes a single frame, then sleeps off whatever remains of `LOOP_TIME`.
    ///
    /// # Returns
    ///
    /// `true` while the loop should keep running; `false` once an exit was requested or the
    /// encounter has resolved.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();
        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = start;

        formatter::advance_frame();

        if self.game.tick(dt, InputFrame::default()) {
            info!("Exit requested, stopping");
            return false;
        }

        let phase = PhaseKind::from(self.game.phase());
        if phase != self.last_phase {
            debug!(%phase, elapsed = self.game.elapsed(), "Driver observed phase change");
            self.last_phase = phase;
        }
        if phase == PhaseKind::Resolved {
            info!(elapsed = self.game.elapsed(), "Encounter resolved, stopping");
            return false;
        }

        let remaining = LOOP_TIME.saturating_sub(start.elapsed());
        if remaining != Duration::ZERO {
            spin_sleep::sleep(remaining);
        } else {
            trace!(behind = ?(start.elapsed() - LOOP_TIME), "Frame ran past its slot");
        }

        true
    }
}
