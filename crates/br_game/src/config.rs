//! Gameplay tuning loaded from JSON. Every field has a default, so a partial
//! file only overrides what it names, and a missing file means "play with the
//! defaults".

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::spawn::MAX_TARGET_POINTS;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: f64,
    /// Margin around the viewport a target may drift into before it is culled.
    #[serde(default = "default_cull_buffer")]
    pub cull_buffer: f32,
    #[serde(default = "default_nominal_fps")]
    pub nominal_fps: f32,
    /// Upper bound on a single frame delta, in nominal frames.
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta: f32,
    #[serde(default = "default_pre_launch_ms")]
    pub pre_launch_ms: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpawnConfig {
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Speed needed per awarded point (`points = floor(speed / speed_per_point)`).
    #[serde(default = "default_speed_per_point")]
    pub speed_per_point: f32,
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,
    #[serde(default = "default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "default_center_epsilon")]
    pub center_epsilon: f32,
    #[serde(default = "default_margin_top")]
    pub margin_top: f32,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: f32,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            spawn_interval_ms: default_spawn_interval_ms(),
            cull_buffer: default_cull_buffer(),
            nominal_fps: default_nominal_fps(),
            max_frame_delta: default_max_frame_delta(),
            pre_launch_ms: default_pre_launch_ms(),
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            speed_per_point: default_speed_per_point(),
            acceleration: default_acceleration(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            center_epsilon: default_center_epsilon(),
            margin_top: default_margin_top(),
            margin_bottom: default_margin_bottom(),
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn duration_ms(&self) -> f64 {
        self.duration_secs * 1000.0
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read game config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse game config {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Start-up helper: a missing file is normal, a broken one is loud, and both
/// fall back to the defaults.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::warn!(
            "Game config '{}' not found, using defaults",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Game config loaded from {}", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}; using defaults");
            GameConfig::default()
        }
    }
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let session = &config.session;
    let spawn = &config.spawn;
    if session.duration_secs <= 0.0 {
        return Err("Config validation failed: session.duration_secs must be > 0".to_string());
    }
    if session.spawn_interval_ms <= 0.0 {
        return Err("Config validation failed: session.spawn_interval_ms must be > 0".to_string());
    }
    if session.nominal_fps <= 0.0 {
        return Err("Config validation failed: session.nominal_fps must be > 0".to_string());
    }
    if session.max_frame_delta <= 0.0 {
        return Err("Config validation failed: session.max_frame_delta must be > 0".to_string());
    }
    if session.cull_buffer < 0.0 || session.pre_launch_ms < 0.0 {
        return Err(
            "Config validation failed: cull_buffer and pre_launch_ms must be >= 0".to_string(),
        );
    }
    if spawn.min_speed < 0.0 || spawn.min_speed > spawn.max_speed {
        return Err(format!(
            "Config validation failed: speed range [{}, {}] is invalid",
            spawn.min_speed, spawn.max_speed
        ));
    }
    if spawn.speed_per_point <= 0.0 {
        return Err("Config validation failed: spawn.speed_per_point must be > 0".to_string());
    }
    if spawn.max_speed / spawn.speed_per_point > MAX_TARGET_POINTS as f32 {
        return Err(format!(
            "Config validation failed: max_speed / speed_per_point exceeds {MAX_TARGET_POINTS} points"
        ));
    }
    if spawn.min_radius <= 0.0 || spawn.min_radius > spawn.max_radius {
        return Err(format!(
            "Config validation failed: radius range [{}, {}] is invalid",
            spawn.min_radius, spawn.max_radius
        ));
    }
    if spawn.center_epsilon < 0.0 || spawn.margin_top < 0.0 || spawn.margin_bottom < 0.0 {
        return Err("Config validation failed: spawn margins must be >= 0".to_string());
    }
    Ok(())
}

const fn default_duration_secs() -> f64 {
    20.0
}

const fn default_spawn_interval_ms() -> f64 {
    1000.0
}

const fn default_cull_buffer() -> f32 {
    50.0
}

const fn default_nominal_fps() -> f32 {
    60.0
}

const fn default_max_frame_delta() -> f32 {
    15.0
}

const fn default_pre_launch_ms() -> f64 {
    250.0
}

const fn default_min_speed() -> f32 {
    100.0
}

const fn default_max_speed() -> f32 {
    300.0
}

const fn default_speed_per_point() -> f32 {
    50.0
}

const fn default_acceleration() -> f32 {
    20.0
}

const fn default_min_radius() -> f32 {
    15.0
}

const fn default_max_radius() -> f32 {
    40.0
}

const fn default_center_epsilon() -> f32 {
    10.0
}

const fn default_margin_top() -> f32 {
    20.0
}

const fn default_margin_bottom() -> f32 {
    60.0
}
