use br_core::resources::optional_resource;
use br_core::view::SceneView;

use super::LOGO_RESOURCE;
use crate::scene::{Scene, SceneAction, SceneContext, SceneKey, SceneParams};

pub const SITE_URL: &str = "https://blasters.example.com";
const PROMO_VIDEO: &str = "promo_video";

/// Landing screen.
pub struct IntroScene {
    logo: bool,
    featured_image: Option<String>,
    video_available: bool,
    video_playing: bool,
    first_weapon: Option<String>,
    duration_secs: f64,
}

impl IntroScene {
    pub fn new() -> Self {
        Self {
            logo: false,
            featured_image: None,
            video_available: false,
            video_playing: false,
            first_weapon: None,
            duration_secs: 0.0,
        }
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_playing
    }
}

impl Default for IntroScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for IntroScene {
    fn key(&self) -> SceneKey {
        SceneKey::Intro
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        let resources = ctx.env.resources.as_ref();
        self.logo = optional_resource(resources, "intro", LOGO_RESOURCE);
        self.video_available = resources.has_resource(PROMO_VIDEO);
        self.duration_secs = ctx.env.config.session.duration_secs;

        let first = ctx.env.weapons.first();
        self.first_weapon = first.map(|w| w.key.clone());
        self.featured_image = first
            .filter(|w| optional_resource(resources, "intro", &w.image_resource))
            .map(|w| w.image_resource.clone());
    }

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext) {
        match action {
            SceneAction::PlayMinigame => {
                ctx.request_change(SceneKey::WeaponGallery, SceneParams::none());
            }
            SceneAction::WatchVideo => {
                if self.video_available {
                    self.video_playing = !self.video_playing;
                    log::info!("Promo video {}", if self.video_playing { "opened" } else { "closed" });
                } else {
                    log::warn!("intro: resource '{PROMO_VIDEO}' not loaded, video unavailable");
                }
            }
            SceneAction::Back if self.video_playing => {
                self.video_playing = false;
                log::info!("Promo video closed");
            }
            SceneAction::ViewRange => {
                ctx.request_change(
                    SceneKey::WeaponDetail,
                    SceneParams::weapon(self.first_weapon.as_deref()),
                );
            }
            SceneAction::VisitSite => log::info!("Visit {SITE_URL}"),
            _ => {}
        }
    }

    fn view(&self) -> SceneView<SceneAction> {
        let mut view = SceneView::new("BLASTER RANGE")
            .with_logo(self.logo.then_some(LOGO_RESOURCE))
            .with_image(self.featured_image.as_deref())
            .line(format!(
                "CHOOSE YOUR BLASTER THEN SHOOT AS MANY TARGETS AS YOU CAN WITHIN {} SECONDS",
                self.duration_secs.round() as u64
            ));
        if self.video_playing {
            view = view
                .with_backdrop(Some(PROMO_VIDEO))
                .button("CLOSE VIDEO", SceneAction::WatchVideo);
        } else {
            view = view.button("WATCH VIDEO", SceneAction::WatchVideo);
        }
        view.button("PLAY MINIGAME", SceneAction::PlayMinigame)
            .button("VIEW RANGE", SceneAction::ViewRange)
            .button("VISIT SITE", SceneAction::VisitSite)
    }
}
