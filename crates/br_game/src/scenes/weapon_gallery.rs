use br_core::view::SceneView;

use super::LOGO_RESOURCE;
use crate::scene::{Scene, SceneAction, SceneContext, SceneKey, SceneParams};
use crate::weapons::WeaponCatalog;

/// Carousel over the weapon catalog; the player picks a blaster here.
pub struct WeaponGalleryScene {
    requested: Option<String>,
    catalog: WeaponCatalog,
    index: usize,
    available_art: Vec<bool>,
    logo: bool,
}

impl WeaponGalleryScene {
    pub fn new(weapon_key: Option<String>) -> Self {
        Self {
            requested: weapon_key,
            catalog: WeaponCatalog::builtin(),
            index: 0,
            available_art: Vec::new(),
            logo: false,
        }
    }

    pub fn current_key(&self) -> Option<&str> {
        self.catalog.at(self.index).map(|w| w.key.as_str())
    }

    fn play(&self, ctx: &mut SceneContext) {
        ctx.request_change(SceneKey::Game, SceneParams::weapon(self.current_key()));
    }
}

impl Scene for WeaponGalleryScene {
    fn key(&self) -> SceneKey {
        SceneKey::WeaponGallery
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        let resources = ctx.env.resources.as_ref();
        self.catalog = ctx.env.weapons.clone();
        self.index = self.catalog.resolve_index(self.requested.as_deref());
        self.logo = resources.has_resource(LOGO_RESOURCE);
        self.available_art = (0..self.catalog.len())
            .filter_map(|i| self.catalog.at(i))
            .map(|w| resources.has_resource(&w.image_resource))
            .collect();
        let missing = self.available_art.iter().filter(|ok| !**ok).count();
        if missing > 0 {
            log::warn!("weapon gallery: {missing} weapon image(s) not loaded");
        }
    }

    fn on_action(&mut self, action: SceneAction, ctx: &mut SceneContext) {
        match action {
            SceneAction::Previous => self.index = self.catalog.previous_index(self.index),
            SceneAction::Next => self.index = self.catalog.next_index(self.index),
            SceneAction::SelectCurrent | SceneAction::PlayGame => self.play(ctx),
            SceneAction::Back => ctx.request_change(SceneKey::Intro, SceneParams::none()),
            _ => {}
        }
    }

    fn view(&self) -> SceneView<SceneAction> {
        let mut view = SceneView::new("CHOOSE YOUR BLASTER")
            .with_logo(self.logo.then_some(LOGO_RESOURCE));
        if let Some(weapon) = self.catalog.at(self.index) {
            let art = self.available_art.get(self.index).copied().unwrap_or(false);
            view = view
                .with_image(art.then_some(weapon.image_resource.as_str()))
                .line(format!("{} / {}", self.index + 1, self.catalog.len()))
                .button(weapon.display_name.clone(), SceneAction::SelectCurrent);
        }
        view.button("<", SceneAction::Previous)
            .button(">", SceneAction::Next)
            .button("PLAY GAME", SceneAction::PlayGame)
            .button("BACK", SceneAction::Back)
    }
}
