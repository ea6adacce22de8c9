//! Scripted sessions: a JSON list of frames, taps and button presses played
//! against a `SceneManager` on a manual clock.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use br_core::time::ManualClock;

use crate::scene::{SceneAction, SceneError, SceneKey, SceneParams};
use crate::scene_manager::SceneManager;

#[derive(Debug, Deserialize, Clone)]
pub struct SessionScript {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    #[serde(default = "default_start_scene")]
    pub start_scene: String,
    #[serde(default)]
    pub weapon_key: Option<String>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScriptStep {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Press the oldest live target, if there is one.
    #[serde(default)]
    pub tap_target: bool,
    #[serde(default)]
    pub tap: Option<[f32; 2]>,
    #[serde(default)]
    pub action: Option<SceneAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub scenes: Vec<SceneKey>,
    pub frames: u32,
    pub hits: u32,
    pub last_score: u32,
}

pub fn load_script_from_path(path: &Path) -> Result<SessionScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let script: SessionScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse session script {}: {e}", path.display()))?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &SessionScript) -> Result<(), String> {
    if script.frame_ms <= 0.0 {
        return Err("Session script validation failed: frame_ms must be > 0".to_string());
    }
    if script.steps.is_empty() {
        return Err("Session script validation failed: steps list is empty".to_string());
    }
    if script.start_scene.parse::<SceneKey>().is_err() {
        return Err(format!(
            "Session script validation failed: unknown start scene '{}'",
            script.start_scene
        ));
    }
    Ok(())
}

/// Plays `script` one nominal frame per repeat. Taps and actions happen after
/// that frame's tick.
pub fn run_script(
    script: &SessionScript,
    manager: &mut SceneManager,
    clock: &ManualClock,
) -> Result<ReplayOutcome, SceneError> {
    manager.change_scene(
        &script.start_scene,
        SceneParams::weapon(script.weapon_key.as_deref()),
    )?;
    let mut outcome = ReplayOutcome {
        scenes: manager.active_key().into_iter().collect(),
        frames: 0,
        hits: 0,
        last_score: 0,
    };

    for step in &script.steps {
        for _ in 0..step.repeat.max(1) {
            clock.advance(script.frame_ms);
            manager.tick(1.0)?;
            outcome.frames += 1;

            if step.tap_target {
                let target = manager
                    .view()
                    .and_then(|view| view.circles.first().map(|c| c.center));
                if let Some(center) = target {
                    manager.pointer_down(center.x, center.y)?;
                }
            }
            if let Some([x, y]) = step.tap {
                manager.pointer_down(x, y)?;
            }
            if let Some(action) = step.action {
                manager.trigger(action)?;
            }

            if let Some(report) = manager.session_report() {
                outcome.hits = report.stats.hits;
                outcome.last_score = report.stats.score;
            }
            if let Some(key) = manager.active_key() {
                if outcome.scenes.last() != Some(&key) {
                    outcome.scenes.push(key);
                }
            }
        }
    }
    Ok(outcome)
}

fn default_frame_ms() -> f64 {
    1000.0 / 60.0
}

fn default_start_scene() -> String {
    SceneKey::Game.as_str().to_string()
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneRegistry;
    use crate::scene_manager::tests::test_env;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "br_script_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn play(script: &SessionScript) -> ReplayOutcome {
        let (env, clock, _) = test_env(800.0, 600.0);
        let mut manager = SceneManager::new(env, SceneRegistry::standard());
        run_script(script, &mut manager, &clock).expect("script should run")
    }

    #[test]
    fn script_file_parses_with_defaults() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "weapon_key": "Volt",
              "steps": [
                { "repeat": 30 },
                { "tap_target": true },
                { "action": "back" }
              ]
            }"#,
        )
        .expect("write script file");

        let script = load_script_from_path(&path).expect("script should load");
        assert_eq!(script.start_scene, "game");
        assert!((script.frame_ms - 1000.0 / 60.0).abs() < 1e-9);
        assert_eq!(script.steps[0].repeat, 30);
        assert_eq!(script.steps[1].repeat, 1);
        assert_eq!(script.steps[2].action, Some(SceneAction::Back));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_scripts_are_rejected() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "frame_ms": 0, "steps": [ {} ] }"#).expect("write");
        let err = load_script_from_path(&path).expect_err("zero frame");
        assert!(err.contains("frame_ms"));

        fs::write(&path, r#"{ "start_scene": "credits", "steps": [ {} ] }"#).expect("write");
        let err = load_script_from_path(&path).expect_err("unknown scene");
        assert!(err.contains("credits"));

        fs::write(&path, r#"{ "steps": [] }"#).expect("write");
        assert!(load_script_from_path(&path).is_err());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn tapping_through_a_session_scores_and_ends_on_game_over() {
        // A tap every tenth frame for 21 seconds, so each target is pressed
        // while still waiting to launch.
        let script = SessionScript {
            frame_ms: default_frame_ms(),
            start_scene: "game".to_string(),
            weapon_key: Some("Shockwave".to_string()),
            steps: (0..126)
                .flat_map(|_| {
                    [
                        ScriptStep {
                            repeat: 9,
                            ..ScriptStep::default()
                        },
                        ScriptStep {
                            repeat: 1,
                            tap_target: true,
                            ..ScriptStep::default()
                        },
                    ]
                })
                .collect(),
        };
        let outcome = play(&script);
        assert_eq!(outcome.scenes, vec![SceneKey::Game, SceneKey::GameOver]);
        assert!(outcome.hits >= 15, "hits {}", outcome.hits);
        assert!(outcome.last_score >= outcome.hits);
    }

    #[test]
    fn same_seed_same_outcome() {
        let script = SessionScript {
            frame_ms: 20.0,
            start_scene: "game".to_string(),
            weapon_key: None,
            steps: vec![
                ScriptStep {
                    repeat: 100,
                    tap_target: true,
                    ..ScriptStep::default()
                },
                ScriptStep {
                    repeat: 1,
                    action: Some(SceneAction::EndSession),
                    ..ScriptStep::default()
                },
                ScriptStep {
                    repeat: 1,
                    action: Some(SceneAction::PlayAgain),
                    ..ScriptStep::default()
                },
            ],
        };
        let first = play(&script);
        let second = play(&script);
        assert_eq!(first, second);
        assert_eq!(
            first.scenes,
            vec![SceneKey::Game, SceneKey::GameOver, SceneKey::Game]
        );
    }

    #[test]
    fn escape_during_play_returns_to_gallery() {
        let script = SessionScript {
            frame_ms: default_frame_ms(),
            start_scene: "game".to_string(),
            weapon_key: Some("Echo".to_string()),
            steps: vec![
                ScriptStep {
                    repeat: 10,
                    ..ScriptStep::default()
                },
                ScriptStep {
                    repeat: 1,
                    action: Some(SceneAction::Back),
                    ..ScriptStep::default()
                },
            ],
        };
        let outcome = play(&script);
        assert_eq!(outcome.scenes, vec![SceneKey::Game, SceneKey::WeaponGallery]);
        assert_eq!(outcome.hits, 0);
    }
}
