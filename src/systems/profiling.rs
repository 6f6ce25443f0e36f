//! Per-system frame timing.
//!
//! Every scheduled system is wrapped with [`profile`], which records how long it ran into a small
//! rolling window keyed by [`SystemId`]. `Game::tick` adds the whole-frame total and uses
//! [`SystemTimings::get_slowest_systems`] to explain frames that blow their budget.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bevy_ecs::system::{IntoSystem, System};
use bevy_ecs::{resource::Resource, world::World};
use circular_buffer::CircularBuffer;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use tracing::warn;

const MAX_SYSTEMS: usize = SystemId::COUNT;
/// Frames of history kept per system.
const TIMING_WINDOW_SIZE: usize = 30;
/// A single system taking at least this long is reported on its own.
const SLOW_SYSTEM_THRESHOLD: Duration = Duration::from_millis(2);

/// Rolling window of durations for one system.
///
/// Ticks the system did not run in are filled with zeros, so averages reflect per-frame cost.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    last_tick: u64,
}

impl TimingBuffer {
    fn backfill(&mut self, current_tick: u64) {
        if current_tick > self.last_tick + 1 {
            let skipped = (current_tick - self.last_tick - 1).min(TIMING_WINDOW_SIZE as u64);
            for _ in 0..skipped {
                self.buffer.push_back(Duration::ZERO);
            }
        }
    }

    /// Records `duration` against `current_tick`. Samples from an earlier tick are discarded.
    pub fn add_timing(&mut self, duration: Duration, current_tick: u64) {
        if current_tick < self.last_tick {
            warn!(current_tick, last_tick = self.last_tick, "Discarding timing from an earlier tick");
            return;
        }

        self.backfill(current_tick);
        self.buffer.push_back(duration);
        self.last_tick = current_tick;
    }

    pub fn get_most_recent_timing(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and sample standard deviation over the window, as of `current_tick`.
    pub fn get_stats(&mut self, current_tick: u64) -> (Duration, Duration) {
        if current_tick > self.last_tick {
            self.backfill(current_tick);
            self.last_tick = current_tick;
        }

        // Welford
        let mut count = 0u32;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        for sample in self.buffer.iter() {
            let value = sample.as_secs_f64();
            count += 1;
            let delta = value - mean;
            mean += delta / count as f64;
            m2 += delta * (value - mean);
        }

        match count {
            0 => (Duration::ZERO, Duration::ZERO),
            1 => (Duration::from_secs_f64(mean), Duration::ZERO),
            n => (
                Duration::from_secs_f64(mean),
                Duration::from_secs_f64((m2 / (n - 1) as f64).sqrt()),
            ),
        }
    }
}

/// Frame counter used to line up timing samples.
#[derive(Resource, Debug, Default)]
pub struct Timing {
    current_tick: AtomicU64,
}

impl Timing {
    pub fn get_current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    /// Advances the counter, returning the new tick.
    pub fn increment_tick(&self) -> u64 {
        self.current_tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Input,
    SessionClock,
    Toggle,
    Command,
    Look,
    CameraFlip,
    Motion,
    Boundary,
    Trigger,
    PeacockSwap,
    Encounter,
    Audio,
    ErrorLog,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name.to_ascii_lowercase())
    }
}

#[derive(Resource, Debug)]
pub struct SystemTimings {
    pub timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl SystemTimings {
    pub fn add_timing(&self, id: SystemId, duration: Duration, current_tick: u64) {
        if let Some(buffer) = self.timings.get(&id) {
            buffer.lock().add_timing(duration, current_tick);
        }
    }

    /// Records the whole-frame duration under [`SystemId::Total`].
    pub fn add_total_timing(&self, duration: Duration, current_tick: u64) {
        self.add_timing(SystemId::Total, duration, current_tick);
    }

    pub fn get_stats(&self, current_tick: u64) -> micromap::Map<SystemId, (Duration, Duration), MAX_SYSTEMS> {
        let mut stats = micromap::Map::new();
        for (id, buffer) in self.timings.iter() {
            stats.insert(*id, buffer.lock().get_stats(current_tick));
        }
        stats
    }

    /// Systems most likely responsible for a slow frame, slowest first, at most five.
    ///
    /// Any system whose latest sample reaches 2ms is reported. Otherwise the top systems are
    /// accumulated until they cover 30% of the frame.
    pub fn get_slowest_systems(&self) -> SmallVec<[(SystemId, Duration); 5]> {
        let mut recent: SmallVec<[(SystemId, Duration); MAX_SYSTEMS]> = self
            .timings
            .iter()
            .filter(|(id, _)| **id != SystemId::Total)
            .map(|(id, buffer)| (*id, buffer.lock().get_most_recent_timing()))
            .collect();
        recent.sort_by(|a, b| b.1.cmp(&a.1));

        let over_threshold: SmallVec<[(SystemId, Duration); 5]> = recent
            .iter()
            .filter(|(_, duration)| *duration >= SLOW_SYSTEM_THRESHOLD)
            .take(5)
            .copied()
            .collect();
        if !over_threshold.is_empty() {
            return over_threshold;
        }

        let total: Duration = recent.iter().map(|(_, duration)| *duration).sum();
        let target = total.mul_f64(0.3);
        let mut accumulated = Duration::ZERO;
        let mut result = SmallVec::new();
        for (id, duration) in recent.iter().take(5) {
            result.push((*id, *duration));
            accumulated += *duration;
            if accumulated >= target {
                break;
            }
        }
        result
    }
}

/// Wraps `system` so each run is timed into [`SystemTimings`] under `id`.
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut initialized = false;
    move |world: &mut World| {
        if !initialized {
            system.initialize(world);
            initialized = true;
        }

        let start = Instant::now();
        system.run((), world);
        let elapsed = start.elapsed();

        if let (Some(timings), Some(timing)) = (world.get_resource::<SystemTimings>(), world.get_resource::<Timing>()) {
            timings.add_timing(id, elapsed, timing.get_current_tick());
        }
    }
}
