//! Scene contract, scene keys and the registry that builds scenes by key.
//!
//! A scene never holds a pointer back to the manager. Anything it needs from
//! the outside world arrives through a `SceneContext` for the duration of one
//! call, and a transition is *requested* on that context; the manager carries
//! it out once the scene call has returned.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use br_core::resources::ResourceProvider;
use br_core::time::Clock;
use br_core::view::SceneView;
use br_core::viewport::ViewportQuery;

use crate::config::GameConfig;
use crate::session::{SessionState, SessionStats};
use crate::weapons::WeaponCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Intro,
    WeaponGallery,
    WeaponDetail,
    Game,
    GameOver,
}

impl SceneKey {
    pub const ALL: &'static [SceneKey] = &[
        SceneKey::Intro,
        SceneKey::WeaponGallery,
        SceneKey::WeaponDetail,
        SceneKey::Game,
        SceneKey::GameOver,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::WeaponGallery => "weapon-gallery",
            Self::WeaponDetail => "weapon-detail",
            Self::Game => "game",
            Self::GameOver => "game-over",
        }
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKey {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SceneError::UnknownScene(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    /// A transition named a scene that does not exist. This is a wiring bug,
    /// not something the player can cause, and is never swallowed.
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
}

/// Per-variant input for a new scene. Every field is optional; each scene
/// documents what it reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneParams {
    pub weapon_key: Option<String>,
    pub score: Option<u32>,
}

impl SceneParams {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn weapon(weapon_key: Option<&str>) -> Self {
        Self {
            weapon_key: weapon_key.map(str::to_string),
            score: None,
        }
    }

    pub fn game_over(score: u32, weapon_key: Option<&str>) -> Self {
        Self {
            weapon_key: weapon_key.map(str::to_string),
            score: Some(score),
        }
    }
}

/// Everything a button can ask for. Scenes ignore actions they do not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneAction {
    PlayMinigame,
    WatchVideo,
    ViewRange,
    VisitSite,
    Previous,
    Next,
    SelectCurrent,
    PlayGame,
    Back,
    PlayAgain,
    BackToMenu,
    /// Debug overlay: let the running session time out right now.
    EndSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneLifecycle {
    Uninitialized,
    Active,
    Destroyed,
}

/// Read-only collaborators shared by every scene.
pub struct SceneEnv {
    pub viewport: Box<dyn ViewportQuery>,
    pub resources: Box<dyn ResourceProvider>,
    pub clock: Box<dyn Clock>,
    pub weapons: WeaponCatalog,
    pub config: GameConfig,
}

pub struct SceneContext<'a> {
    pub env: &'a SceneEnv,
    requested: Option<(SceneKey, SceneParams)>,
}

impl<'a> SceneContext<'a> {
    pub fn new(env: &'a SceneEnv) -> Self {
        Self {
            env,
            requested: None,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.env.clock.now_ms()
    }

    /// Asks the manager to switch scenes after the current call returns. Only
    /// the first request of a call is honoured.
    pub fn request_change(&mut self, key: SceneKey, params: SceneParams) {
        if let Some((pending, _)) = &self.requested {
            log::warn!("Ignoring transition to '{key}': '{pending}' already requested");
            return;
        }
        self.requested = Some((key, params));
    }

    pub fn requested(&self) -> Option<SceneKey> {
        self.requested.as_ref().map(|(key, _)| *key)
    }

    pub fn take_request(&mut self) -> Option<(SceneKey, SceneParams)> {
        self.requested.take()
    }
}

/// Session figures exposed for the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    pub state: SessionState,
    pub stats: SessionStats,
}

/// Lifecycle contract: `init` once, then any number of `tick`/`on_resize`/
/// input calls, then `destroy` once. The manager enforces the ordering.
pub trait Scene {
    fn key(&self) -> SceneKey;

    fn init(&mut self, ctx: &mut SceneContext);

    fn tick(&mut self, _dt: f32, _ctx: &mut SceneContext) {}

    fn on_resize(&mut self, _width: f32, _height: f32) {}

    fn on_pointer_down(&mut self, _x: f32, _y: f32, _ctx: &mut SceneContext) {}

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext);

    fn view(&self) -> SceneView<SceneAction>;

    fn destroy(&mut self) {}

    fn session_report(&self, _now_ms: f64) -> Option<SessionReport> {
        None
    }
}

pub type SceneConstructor = Box<dyn Fn(SceneParams) -> Box<dyn Scene>>;

/// Fixed set of constructible scenes.
pub struct SceneRegistry {
    constructors: HashMap<SceneKey, SceneConstructor>,
}

impl SceneRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// All five application scenes.
    pub fn standard() -> Self {
        use crate::scenes::{GameOverScene, GameScene, IntroScene, WeaponDetailScene, WeaponGalleryScene};

        let mut registry = Self::empty();
        registry.register(SceneKey::Intro, |_| Box::new(IntroScene::new()));
        registry.register(SceneKey::WeaponGallery, |params| {
            Box::new(WeaponGalleryScene::new(params.weapon_key))
        });
        registry.register(SceneKey::WeaponDetail, |params| {
            Box::new(WeaponDetailScene::new(params.weapon_key))
        });
        registry.register(SceneKey::Game, |params| {
            Box::new(GameScene::new(params.weapon_key))
        });
        registry.register(SceneKey::GameOver, |params| {
            Box::new(GameOverScene::new(params.score.unwrap_or(0), params.weapon_key))
        });
        registry
    }

    pub fn register<F>(&mut self, key: SceneKey, constructor: F)
    where
        F: Fn(SceneParams) -> Box<dyn Scene> + 'static,
    {
        self.constructors.insert(key, Box::new(constructor));
    }

    pub fn contains(&self, key: SceneKey) -> bool {
        self.constructors.contains_key(&key)
    }

    pub fn construct(&self, key: SceneKey, params: SceneParams) -> Result<Box<dyn Scene>, SceneError> {
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| SceneError::UnknownScene(key.as_str().to_string()))?;
        Ok(constructor(params))
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
