//! The timed minigame. Wraps a `GameSession` and turns its events into scene
//! transitions.

use glam::Vec2;

use br_core::resources::optional_resource;
use br_core::view::SceneView;
use br_core::viewport::ViewportSize;

use super::LOGO_RESOURCE;
use crate::scene::{Scene, SceneAction, SceneContext, SceneKey, SceneParams, SessionReport};
use crate::session::{GameSession, HitReport, SessionEvent};

/// How long the "+N" reward stays on the HUD.
const REWARD_VISIBLE_MS: f64 = 600.0;

pub struct GameScene {
    weapon_key: Option<String>,
    session: Option<GameSession>,
    viewport: ViewportSize,
    remaining_secs: u64,
    last_reward: Option<(HitReport, f64)>,
    logo: bool,
}

impl GameScene {
    pub fn new(weapon_key: Option<String>) -> Self {
        Self {
            weapon_key,
            session: None,
            viewport: ViewportSize::new(0.0, 0.0),
            remaining_secs: 0,
            last_reward: None,
            logo: false,
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    fn game_over(&self, final_score: u32, ctx: &mut SceneContext) {
        ctx.request_change(
            SceneKey::GameOver,
            SceneParams::game_over(final_score, self.weapon_key.as_deref()),
        );
    }
}

impl Scene for GameScene {
    fn key(&self) -> SceneKey {
        SceneKey::Game
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        let now = ctx.now_ms();
        let session = GameSession::start(&ctx.env.config, now);
        self.remaining_secs = session.remaining_whole_secs(now);
        self.session = Some(session);
        self.viewport = ctx.env.viewport.size();
        self.logo = optional_resource(ctx.env.resources.as_ref(), "game", LOGO_RESOURCE);
        if let Some(key) = &self.weapon_key {
            if ctx.env.weapons.get(key).is_none() {
                log::warn!("game: unknown weapon '{key}'");
            }
        }
    }

    fn tick(&mut self, dt: f32, ctx: &mut SceneContext) {
        let now = ctx.now_ms();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let event = session.tick(dt, now, self.viewport);
        self.remaining_secs = session.remaining_whole_secs(now);
        if matches!(self.last_reward, Some((_, shown_at)) if now - shown_at > REWARD_VISIBLE_MS) {
            self.last_reward = None;
        }
        if let SessionEvent::Finished { final_score } = event {
            self.game_over(final_score, ctx);
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = ViewportSize::new(width, height);
    }

    fn on_pointer_down(&mut self, x: f32, y: f32, ctx: &mut SceneContext) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(hit) = session.pointer_down(Vec2::new(x, y)) {
            self.last_reward = Some((hit, ctx.now_ms()));
        }
    }

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match action {
            SceneAction::Back => {
                session.cancel();
                ctx.request_change(
                    SceneKey::WeaponGallery,
                    SceneParams::weapon(self.weapon_key.as_deref()),
                );
            }
            SceneAction::EndSession => {
                if let Some(final_score) = session.finish_now() {
                    self.game_over(final_score, ctx);
                }
            }
            _ => {}
        }
    }

    fn view(&self) -> SceneView<SceneAction> {
        let score = self.session.as_ref().map_or(0, GameSession::score);
        let mut view = SceneView::new("GAME")
            .with_logo(self.logo.then_some(LOGO_RESOURCE))
            .hud(format!("Time: {}", self.remaining_secs))
            .hud(format!("Score: {score}"));
        if let Some((hit, _)) = &self.last_reward {
            view = view.hud(format!("+{}", hit.points));
        }
        if let Some(session) = &self.session {
            for target in session.targets() {
                view = view.circle(target.position, target.hit_radius, target.point_value.to_string());
            }
        }
        view
    }

    /// Leaving mid-session cancels it: targets are dropped and nothing is
    /// reported.
    fn destroy(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel();
        }
    }

    fn session_report(&self, now_ms: f64) -> Option<SessionReport> {
        self.session.as_ref().map(|session| SessionReport {
            state: session.state(),
            stats: session.stats(now_ms),
        })
    }
}
