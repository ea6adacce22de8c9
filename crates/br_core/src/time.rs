//! Wall-clock reads and frame-relative deltas.
//!
//! Two notions of time run side by side:
//!
//! - **Wall clock** (`Clock`): millisecond reads that drive everything
//!   authoritative, i.e. the session countdown and the spawn schedule. Scenes
//!   never accumulate frame deltas to decide when something ends.
//!
//! - **Frame delta** (`FrameTimer`): the measured duration of the last frame
//!   expressed in nominal frames (`1.0` at exactly the nominal rate). Motion
//!   integration consumes this, converted back to seconds with
//!   `frames_to_seconds`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

pub const DEFAULT_NOMINAL_FPS: f64 = 60.0;
const FPS_SAMPLE_COUNT: usize = 60;

/// Source of wall-clock time in milliseconds. The origin is arbitrary but
/// fixed for the lifetime of the clock.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same reading, so a
/// test can hold one handle while the code under test holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Converts a frame-relative delta into seconds.
pub fn frames_to_seconds(delta_frames: f32, nominal_fps: f32) -> f32 {
    if nominal_fps <= 0.0 {
        return 0.0;
    }
    delta_frames / nominal_fps
}

pub struct FrameTimer {
    pub nominal_fps: f64,
    /// Largest delta (in nominal frames) handed to the simulation.
    pub max_delta_frames: f64,
    pub real_dt: f64,
    pub delta_frames: f64,
    pub frame_count: u64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameTimer {
    pub fn new(nominal_fps: f64, max_delta_frames: f64) -> Self {
        let nominal_dt = 1.0 / nominal_fps.max(1.0);
        Self {
            nominal_fps,
            max_delta_frames,
            real_dt: 0.0,
            delta_frames: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            fps_samples: [nominal_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: nominal_fps,
            smoothed_frame_time_ms: nominal_dt * 1000.0,
        }
    }

    /// Measures the wall-clock time since the previous call and returns it as
    /// a frame-relative delta.
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.record_frame(real_dt)
    }

    pub fn record_frame(&mut self, real_dt: f64) -> f64 {
        self.real_dt = real_dt.max(0.0);
        self.frame_count += 1;

        let mut delta = self.real_dt * self.nominal_fps;
        if delta > self.max_delta_frames {
            log::warn!(
                "Frame took {:.1}ms -- capping simulation delta to {} frames",
                self.real_dt * 1000.0,
                self.max_delta_frames
            );
            delta = self.max_delta_frames;
        }
        self.delta_frames = delta;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        delta
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINAL_FPS, 15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_reading() {
        let clock = ManualClock::new(100.0);
        let handle = clock.clone();
        handle.advance(250.0);
        assert!((clock.now_ms() - 350.0).abs() < f64::EPSILON);
        clock.set(5.0);
        assert!((handle.now_ms() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn nominal_frame_is_one_delta() {
        let mut timer = FrameTimer::new(60.0, 15.0);
        let delta = timer.record_frame(1.0 / 60.0);
        assert!((delta - 1.0).abs() < 1e-9);
        assert_eq!(timer.frame_count, 1);
    }

    #[test]
    fn slow_frame_is_capped() {
        let mut timer = FrameTimer::new(60.0, 15.0);
        let delta = timer.record_frame(2.0);
        assert!((delta - 15.0).abs() < 1e-9);
        assert!((timer.real_dt - 2.0).abs() < 1e-9);
    }

    #[test]
    fn negative_real_dt_is_clamped_to_zero() {
        let mut timer = FrameTimer::new(60.0, 15.0);
        assert_eq!(timer.record_frame(-0.5), 0.0);
    }

    #[test]
    fn smoothed_fps_tracks_steady_rate() {
        let mut timer = FrameTimer::new(60.0, 15.0);
        for _ in 0..FPS_SAMPLE_COUNT {
            timer.record_frame(1.0 / 30.0);
        }
        assert!((timer.smoothed_fps - 30.0).abs() < 0.01);
        assert!((timer.smoothed_frame_time_ms - 33.333).abs() < 0.01);
    }

    #[test]
    fn frames_to_seconds_uses_nominal_rate() {
        assert!((frames_to_seconds(60.0, 60.0) - 1.0).abs() < 1e-6);
        assert!((frames_to_seconds(1.0, 30.0) - 1.0 / 30.0).abs() < 1e-6);
        assert_eq!(frames_to_seconds(1.0, 0.0), 0.0);
    }
}
