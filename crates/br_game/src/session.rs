//! Timed shooting session.
//!
//! All authoritative timing comes from wall-clock reads passed in by the
//! caller: `remaining` is `duration - (now - start)`, clamped at zero, and the
//! spawn schedule compares `now` against `next_spawn_due_ms`. Frame deltas are
//! only used to move targets.
//!
//! State machine: `Running -> Ending -> Ended`. `Ending` only exists for the
//! duration of the cleanup inside a single `tick`/`cancel` call; once `Ended`
//! the session never spawns, moves, scores or reports completion again.

use glam::Vec2;

use br_core::time::frames_to_seconds;
use br_core::viewport::ViewportSize;

use crate::config::GameConfig;
use crate::spawn::SpawnPolicy;
use crate::target::{Target, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Ending,
    Ended,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Ending => "ending",
            Self::Ended => "ended",
        }
    }
}

/// What a tick asks of the owning scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Still running; nothing to do.
    Continue,
    /// Time ran out on this tick. Reported exactly once per session.
    Finished { final_score: u32 },
    /// The session already ended; the tick was ignored.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    pub target_id: TargetId,
    pub points: u32,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    pub score: u32,
    pub remaining_ms: f64,
    pub live_targets: usize,
    pub spawned: u32,
    pub hits: u32,
    pub culled: u32,
}

pub struct GameSession {
    state: SessionState,
    score: u32,
    start_ms: f64,
    duration_ms: f64,
    next_spawn_due_ms: f64,
    spawn_interval_ms: f64,
    pre_launch_ms: f64,
    cull_buffer: f32,
    nominal_fps: f32,
    max_frame_delta: f32,
    targets: Vec<Target>,
    next_target_id: TargetId,
    spawner: SpawnPolicy,
    last_remaining_ms: f64,
    spawned: u32,
    hits: u32,
    culled: u32,
}

impl GameSession {
    pub fn start(config: &GameConfig, now_ms: f64) -> Self {
        let session = &config.session;
        log::info!(
            "Session started: {:.0}s, spawn every {:.0}ms",
            session.duration_secs,
            session.spawn_interval_ms
        );
        Self {
            state: SessionState::Running,
            score: 0,
            start_ms: now_ms,
            duration_ms: session.duration_ms(),
            next_spawn_due_ms: now_ms,
            spawn_interval_ms: session.spawn_interval_ms,
            pre_launch_ms: session.pre_launch_ms,
            cull_buffer: session.cull_buffer,
            nominal_fps: session.nominal_fps,
            max_frame_delta: session.max_frame_delta,
            targets: Vec::new(),
            next_target_id: 0,
            spawner: SpawnPolicy::new(config.spawn.clone()),
            last_remaining_ms: session.duration_ms(),
            spawned: 0,
            hits: 0,
            culled: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Live targets in spawn order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Remaining time at `now_ms`. Never negative and never increases, even if
    /// the clock is read out of order.
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        let remaining = (self.duration_ms - (now_ms - self.start_ms)).max(0.0);
        remaining.min(self.last_remaining_ms)
    }

    /// Countdown as shown on the HUD (`ceil` of the remaining seconds).
    pub fn remaining_whole_secs(&self, now_ms: f64) -> u64 {
        (self.remaining_ms(now_ms) / 1000.0).ceil() as u64
    }

    pub fn stats(&self, now_ms: f64) -> SessionStats {
        SessionStats {
            score: self.score,
            remaining_ms: self.remaining_ms(now_ms),
            live_targets: self.targets.len(),
            spawned: self.spawned,
            hits: self.hits,
            culled: self.culled,
        }
    }

    pub fn tick(&mut self, dt_frames: f32, now_ms: f64, viewport: ViewportSize) -> SessionEvent {
        if self.state != SessionState::Running {
            return SessionEvent::Idle;
        }

        let remaining = self.remaining_ms(now_ms);
        self.last_remaining_ms = remaining;
        if remaining <= 0.0 {
            let final_score = self.finish();
            return SessionEvent::Finished { final_score };
        }

        if now_ms >= self.next_spawn_due_ms {
            self.spawn(now_ms, viewport);
            self.next_spawn_due_ms = now_ms + self.spawn_interval_ms;
        }

        let dt_seconds = frames_to_seconds(
            dt_frames.clamp(0.0, self.max_frame_delta),
            self.nominal_fps,
        );
        for target in &mut self.targets {
            target.try_launch(now_ms);
            target.integrate(dt_seconds);
        }

        let buffer = self.cull_buffer;
        let before = self.targets.len();
        self.targets.retain(|t| {
            let outside = t.is_out_of_bounds(viewport.width, viewport.height, buffer);
            if outside {
                log::trace!("Cull #{} at ({:.0},{:.0})", t.id, t.position.x, t.position.y);
            }
            !outside
        });
        self.culled += (before - self.targets.len()) as u32;

        SessionEvent::Continue
    }

    /// Hit-tests a pointer press against the live targets, newest first since
    /// those are drawn on top. At most one target is hit per press.
    pub fn pointer_down(&mut self, point: Vec2) -> Option<HitReport> {
        if self.state != SessionState::Running {
            return None;
        }
        let index = self.targets.iter().rposition(|t| t.contains_point(point))?;
        let target = self.targets.remove(index);
        self.score = self.score.saturating_add(target.point_value);
        self.hits += 1;
        log::debug!(
            "Hit #{} for {} points (score {})",
            target.id,
            target.point_value,
            self.score
        );
        Some(HitReport {
            target_id: target.id,
            points: target.point_value,
            score: self.score,
        })
    }

    /// Ends a running session without reporting completion: live targets are
    /// destroyed and the pending spawn is dropped. Returns whether anything was
    /// cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Ending;
        let dropped = self.clear_targets();
        self.state = SessionState::Ended;
        log::info!("Session cancelled with score {} ({dropped} targets dropped)", self.score);
        true
    }

    /// Ends a running session as if its time had run out. Returns the final
    /// score the first time, `None` once the session is already over.
    pub fn finish_now(&mut self) -> Option<u32> {
        if self.state != SessionState::Running {
            return None;
        }
        self.last_remaining_ms = 0.0;
        Some(self.finish())
    }

    fn finish(&mut self) -> u32 {
        self.state = SessionState::Ending;
        self.clear_targets();
        let final_score = self.score;
        self.state = SessionState::Ended;
        log::info!(
            "Session over: score {final_score} ({} hits, {} spawned, {} culled)",
            self.hits,
            self.spawned,
            self.culled
        );
        final_score
    }

    fn spawn(&mut self, now_ms: f64, viewport: ViewportSize) {
        let id = self.next_target_id;
        self.next_target_id += 1;
        let mut target = self.spawner.spawn(id, viewport);
        if self.pre_launch_ms > 0.0 {
            target = target.with_launch_at(now_ms + self.pre_launch_ms);
        }
        self.targets.push(target);
        self.spawned += 1;
    }

    fn clear_targets(&mut self) -> usize {
        let count = self.targets.len();
        self.targets.clear();
        self.next_spawn_due_ms = f64::INFINITY;
        count
    }

    #[cfg(test)]
    pub(crate) fn insert_target(&mut self, mut target: Target) -> TargetId {
        let id = self.next_target_id;
        self.next_target_id += 1;
        target.id = id;
        self.targets.push(target);
        id
    }
}
