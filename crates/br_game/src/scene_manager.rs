//! Owns the single active scene and carries out transitions.

use br_core::resources::optional_resource;
use br_core::view::SceneView;

use crate::scene::{
    Scene, SceneAction, SceneContext, SceneEnv, SceneError, SceneKey, SceneLifecycle, SceneParams,
    SceneRegistry, SessionReport,
};

pub const BACKDROP_RESOURCE: &str = "main_bg";

struct ActiveScene {
    scene: Box<dyn Scene>,
    lifecycle: SceneLifecycle,
}

pub struct SceneManager {
    env: SceneEnv,
    registry: SceneRegistry,
    active: Option<ActiveScene>,
    transitions: u32,
    has_backdrop: bool,
}

impl SceneManager {
    pub fn new(env: SceneEnv, registry: SceneRegistry) -> Self {
        let has_backdrop = optional_resource(env.resources.as_ref(), "scene manager", BACKDROP_RESOURCE);
        Self {
            env,
            registry,
            active: None,
            transitions: 0,
            has_backdrop,
        }
    }

    pub fn env(&self) -> &SceneEnv {
        &self.env
    }

    pub fn active_key(&self) -> Option<SceneKey> {
        self.active.as_ref().map(|active| active.scene.key())
    }

    /// Number of completed transitions since start-up.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    /// Switches to the scene registered under `key`. An unknown key is
    /// rejected before the current scene is touched.
    pub fn change_scene(&mut self, key: &str, params: SceneParams) -> Result<(), SceneError> {
        let key: SceneKey = key.parse()?;
        self.change_to(key, params)
    }

    pub fn change_to(&mut self, key: SceneKey, params: SceneParams) -> Result<(), SceneError> {
        let mut next = Some((key, params));
        while let Some((key, params)) = next.take() {
            next = self.transition(key, params)?;
        }
        Ok(())
    }

    /// Forwards one frame to the active scene.
    pub fn tick(&mut self, dt: f32) -> Result<(), SceneError> {
        let mut ctx = SceneContext::new(&self.env);
        if let Some(active) = self.active.as_mut() {
            if active.lifecycle == SceneLifecycle::Active {
                active.scene.tick(dt, &mut ctx);
            }
        }
        let request = ctx.take_request();
        self.apply(request)
    }

    /// Re-reads the viewport and forwards the new size to the active scene.
    pub fn on_viewport_resize(&mut self) {
        let size = self.env.viewport.size();
        if let Some(active) = self.active.as_mut() {
            if active.lifecycle == SceneLifecycle::Active {
                log::debug!("Resize {}: {}x{}", active.scene.key(), size.width, size.height);
                active.scene.on_resize(size.width, size.height);
            }
        }
    }

    /// Delivers a discrete pointer press in viewport coordinates.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<(), SceneError> {
        let mut ctx = SceneContext::new(&self.env);
        if let Some(active) = self.active.as_mut() {
            if active.lifecycle == SceneLifecycle::Active {
                active.scene.on_pointer_down(x, y, &mut ctx);
            }
        }
        let request = ctx.take_request();
        self.apply(request)
    }

    pub fn trigger(&mut self, action: SceneAction) -> Result<(), SceneError> {
        let mut ctx = SceneContext::new(&self.env);
        if let Some(active) = self.active.as_mut() {
            if active.lifecycle == SceneLifecycle::Active {
                log::debug!("Action {action:?} on {}", active.scene.key());
                active.scene.on_action(action, &mut ctx);
            }
        }
        let request = ctx.take_request();
        self.apply(request)
    }

    pub fn view(&self) -> Option<SceneView<SceneAction>> {
        let active = self.active.as_ref()?;
        let mut view = active.scene.view();
        if view.backdrop.is_none() && self.has_backdrop {
            view.backdrop = Some(BACKDROP_RESOURCE.to_string());
        }
        Some(view)
    }

    pub fn session_report(&self) -> Option<SessionReport> {
        let active = self.active.as_ref()?;
        active.scene.session_report(self.env.clock.now_ms())
    }

    /// Destroys the active scene, if any. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut active) = self.active.take() {
            Self::destroy(&mut active);
            log::info!("Scene manager shut down");
        }
    }

    fn apply(&mut self, request: Option<(SceneKey, SceneParams)>) -> Result<(), SceneError> {
        match request {
            Some((key, params)) => self.change_to(key, params),
            None => Ok(()),
        }
    }

    fn destroy(active: &mut ActiveScene) {
        if active.lifecycle != SceneLifecycle::Destroyed {
            active.scene.destroy();
            active.lifecycle = SceneLifecycle::Destroyed;
            log::debug!("Destroyed scene {}", active.scene.key());
        }
    }

    /// One transition. Returns a follow-up request if the new scene asked for
    /// another change from inside `init`.
    fn transition(
        &mut self,
        key: SceneKey,
        params: SceneParams,
    ) -> Result<Option<(SceneKey, SceneParams)>, SceneError> {
        if !self.registry.contains(key) {
            return Err(SceneError::UnknownScene(key.as_str().to_string()));
        }

        let from = self.active_key();
        if let Some(mut previous) = self.active.take() {
            Self::destroy(&mut previous);
        }

        let mut next = ActiveScene {
            scene: self.registry.construct(key, params)?,
            lifecycle: SceneLifecycle::Uninitialized,
        };
        let mut ctx = SceneContext::new(&self.env);
        next.scene.init(&mut ctx);
        next.lifecycle = SceneLifecycle::Active;
        log::debug!("Initialised scene {key}");
        let size = self.env.viewport.size();
        next.scene.on_resize(size.width, size.height);
        let request = ctx.take_request();

        self.active = Some(next);
        self.transitions += 1;
        match from {
            Some(from) => log::info!("Scene {from} -> {key}"),
            None => log::info!("Scene -> {key}"),
        }
        Ok(request)
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
