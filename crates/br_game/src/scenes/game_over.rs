use br_core::resources::optional_resource;
use br_core::view::SceneView;

use super::LOGO_RESOURCE;
use crate::scene::{Scene, SceneAction, SceneContext, SceneKey, SceneParams};

const GAME_OVER_VIDEO: &str = "range_video";

/// Final score screen.
pub struct GameOverScene {
    score: u32,
    weapon_key: Option<String>,
    weapon_art: Option<String>,
    video: bool,
    logo: bool,
}

impl GameOverScene {
    pub fn new(score: u32, weapon_key: Option<String>) -> Self {
        Self {
            score,
            weapon_key,
            weapon_art: None,
            video: false,
            logo: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

impl Scene for GameOverScene {
    fn key(&self) -> SceneKey {
        SceneKey::GameOver
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        let resources = ctx.env.resources.as_ref();
        self.video = optional_resource(resources, "game over", GAME_OVER_VIDEO);
        self.logo = resources.has_resource(LOGO_RESOURCE);
        self.weapon_art = self
            .weapon_key
            .as_deref()
            .and_then(|key| ctx.env.weapons.get(key))
            .filter(|weapon| optional_resource(resources, "game over", &weapon.image_resource))
            .map(|weapon| weapon.image_resource.clone());
    }

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext) {
        match action {
            SceneAction::PlayAgain => ctx.request_change(
                SceneKey::Game,
                SceneParams::weapon(self.weapon_key.as_deref()),
            ),
            SceneAction::BackToMenu | SceneAction::Back => {
                ctx.request_change(SceneKey::Intro, SceneParams::none())
            }
            _ => {}
        }
    }

    fn view(&self) -> SceneView<SceneAction> {
        SceneView::new("GAME OVER")
            .with_backdrop(self.video.then_some(GAME_OVER_VIDEO))
            .with_logo(self.logo.then_some(LOGO_RESOURCE))
            .with_image(self.weapon_art.as_deref())
            .line(format!("Your Score: {}", self.score))
            .button("PLAY AGAIN", SceneAction::PlayAgain)
            .button("BACK TO MENU", SceneAction::BackToMenu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneRegistry;
    use crate::scene_manager::tests::test_env;
    use crate::scenes::test_support::requested_after;
    use br_core::resources::ResourceCatalog;

    #[test]
    fn missing_score_param_shows_zero() {
        let registry = SceneRegistry::standard();
        let scene = registry
            .construct(SceneKey::GameOver, SceneParams::none())
            .expect("construct");
        assert!(scene.view().lines.contains(&"Your Score: 0".to_string()));
    }

    #[test]
    fn play_again_keeps_the_weapon() {
        let (env, _, _) = test_env(800.0, 600.0);
        let mut scene = GameOverScene::new(42, Some("Volt".to_string()));
        requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
        assert!(scene.view().lines.contains(&"Your Score: 42".to_string()));

        let request = requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::PlayAgain, ctx));
        assert_eq!(request, Some((SceneKey::Game, SceneParams::weapon(Some("Volt")))));
        let request = requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::BackToMenu, ctx));
        assert_eq!(request, Some((SceneKey::Intro, SceneParams::none())));
    }

    #[test]
    fn weapon_art_only_when_loaded() {
        let (mut env, _, _) = test_env(800.0, 600.0);
        let mut scene = GameOverScene::new(3, Some("Echo".to_string()));
        requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
        assert!(scene.view().image.is_none());

        let mut catalog = ResourceCatalog::new();
        catalog.insert_texture("Echo", 300, 120);
        env.resources = Box::new(catalog);
        let mut scene = GameOverScene::new(3, Some("Echo".to_string()));
        requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
        assert_eq!(scene.view().image.as_deref(), Some("Echo"));
    }
}
