use br_core::resources::optional_resource;
use br_core::view::SceneView;

use super::{LOGO_RESOURCE, SITE_URL};
use crate::scene::{Scene, SceneAction, SceneContext, SceneKey, SceneParams};
use crate::weapons::{Weapon, WeaponCatalog};

const DETAIL_BACKDROP: &str = "weapon_bg";

/// Full description page of one weapon.
pub struct WeaponDetailScene {
    requested: Option<String>,
    catalog: WeaponCatalog,
    index: usize,
    backdrop: bool,
    logo: bool,
    art: bool,
}

impl WeaponDetailScene {
    pub fn new(weapon_key: Option<String>) -> Self {
        Self {
            requested: weapon_key,
            catalog: WeaponCatalog::builtin(),
            index: 0,
            backdrop: false,
            logo: false,
            art: false,
        }
    }

    pub fn current(&self) -> Option<&Weapon> {
        self.catalog.at(self.index)
    }

    fn refresh_art(&mut self, ctx: &SceneContext) {
        self.art = match self.catalog.at(self.index) {
            Some(weapon) => optional_resource(ctx.env.resources.as_ref(), "weapon detail", &weapon.image_resource),
            None => false,
        };
    }
}

impl Scene for WeaponDetailScene {
    fn key(&self) -> SceneKey {
        SceneKey::WeaponDetail
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        self.catalog = ctx.env.weapons.clone();
        if self.requested.is_none() {
            log::warn!("weapon detail: no weapon requested, showing the first one");
        }
        self.index = self.catalog.resolve_index(self.requested.as_deref());
        let resources = ctx.env.resources.as_ref();
        self.backdrop = optional_resource(resources, "weapon detail", DETAIL_BACKDROP);
        self.logo = resources.has_resource(LOGO_RESOURCE);
        self.refresh_art(ctx);
    }

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext) {
        match action {
            SceneAction::Previous => {
                self.index = self.catalog.previous_index(self.index);
                self.refresh_art(ctx);
            }
            SceneAction::Next => {
                self.index = self.catalog.next_index(self.index);
                self.refresh_art(ctx);
            }
            SceneAction::Back => ctx.request_change(SceneKey::Intro, SceneParams::none()),
            SceneAction::VisitSite => log::info!("Visit {SITE_URL}"),
            _ => {}
        }
    }

    fn view(&self) -> SceneView<SceneAction> {
        let mut view = SceneView::new("THE RANGE")
            .with_backdrop(self.backdrop.then_some(DETAIL_BACKDROP))
            .with_logo(self.logo.then_some(LOGO_RESOURCE));
        if let Some(weapon) = self.current() {
            view = view
                .with_image(self.art.then_some(weapon.image_resource.as_str()))
                .line(weapon.display_name.clone())
                .line(weapon.description.clone());
            for stat in &weapon.stats {
                view = view.line(format!("{}: {}", stat.name, stat.value));
            }
        }
        view.button("<", SceneAction::Previous)
            .button(">", SceneAction::Next)
            .button("VISIT SITE", SceneAction::VisitSite)
            .button("BACK", SceneAction::Back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_manager::tests::test_env;
    use crate::scenes::test_support::requested_after;
    use crate::weapons::WeaponStat;

    #[test]
    fn unknown_or_missing_key_shows_first_weapon() {
        let (env, _, _) = test_env(800.0, 600.0);
        for requested in [None, Some("Nope".to_string())] {
            let mut scene = WeaponDetailScene::new(requested);
            requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
            assert_eq!(scene.current().map(|w| w.key.as_str()), Some("Volt"));
        }
    }

    #[test]
    fn navigation_wraps_and_back_goes_to_intro() {
        let (env, _, _) = test_env(800.0, 600.0);
        let mut scene = WeaponDetailScene::new(Some("Commander".to_string()));
        requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
        requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::Next, ctx));
        assert_eq!(scene.current().map(|w| w.key.as_str()), Some("Volt"));
        requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::Previous, ctx));
        assert_eq!(scene.current().map(|w| w.key.as_str()), Some("Commander"));

        let request = requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::Back, ctx));
        assert_eq!(request, Some((SceneKey::Intro, SceneParams::none())));
        let request = requested_after(&env, &mut scene, |s, ctx| s.on_action(SceneAction::VisitSite, ctx));
        assert!(request.is_none());
    }

    #[test]
    fn view_lists_description_and_stats() {
        let (mut env, _, _) = test_env(800.0, 600.0);
        env.weapons = WeaponCatalog::new(vec![Weapon {
            key: "Zap".to_string(),
            display_name: "ZAPPER".to_string(),
            image_resource: "zap".to_string(),
            description: "Small.".to_string(),
            stats: vec![WeaponStat {
                name: "Range".to_string(),
                value: "90 ft".to_string(),
            }],
        }])
        .expect("catalog");
        let mut scene = WeaponDetailScene::new(Some("Zap".to_string()));
        requested_after(&env, &mut scene, |s, ctx| s.init(ctx));
        let view = scene.view();
        assert_eq!(view.lines, vec!["ZAPPER", "Small.", "Range: 90 ft"]);
        assert!(view.image.is_none());
        assert!(view.backdrop.is_none());
    }
}
