//! Paints a `SceneView` with egui.
//!
//! Backdrop and target circles go on the background layer, which egui does
//! not treat as an interactive area, so presses on the play field fall through
//! to the game. Text and buttons live in anchored areas.

use br_core::resources::ResourceCatalog;
use br_core::view::SceneView;

use crate::textures::TextureCache;

const TITLE_SIZE: f32 = 36.0;
const BODY_SIZE: f32 = 18.0;
const HUD_SIZE: f32 = 24.0;
const LOGO_MAX_WIDTH: f32 = 220.0;
const FEATURE_MAX_HEIGHT: f32 = 220.0;

const TARGET_FILL: egui::Color32 = egui::Color32::from_rgb(255, 106, 0);
const TARGET_RING: egui::Color32 = egui::Color32::WHITE;
const VIDEO_TINT: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 140);

/// Scale-to-cover placement of an image of `image_size` centred in `screen`.
pub fn cover_rect(image_size: egui::Vec2, screen: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return screen;
    }
    let scale = (screen.width() / image_size.x).max(screen.height() / image_size.y);
    egui::Rect::from_center_size(screen.center(), image_size * scale)
}

/// Scales `image_size` down to fit within `max`, keeping the aspect ratio.
pub fn fit_size(image_size: egui::Vec2, max: egui::Vec2) -> egui::Vec2 {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (max.x / image_size.x).min(max.y / image_size.y).min(1.0);
    image_size * scale
}

/// Draws `view` for this frame and returns the actions of clicked buttons.
pub fn paint_scene<A: Clone>(
    ctx: &egui::Context,
    view: &SceneView<A>,
    textures: &mut TextureCache,
    catalog: &ResourceCatalog,
) -> Vec<A> {
    let screen = ctx.screen_rect();
    let points_per_pixel = 1.0 / ctx.pixels_per_point();
    let painter = ctx.layer_painter(egui::LayerId::background());

    if let Some(key) = &view.backdrop {
        match textures.get_or_load(ctx, catalog, key) {
            Some(texture) => {
                let rect = cover_rect(texture.size_vec2(), screen);
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            // Video backdrops are not decoded; dim the field instead.
            None => {
                painter.rect_filled(screen, 0.0, VIDEO_TINT);
            }
        }
    }

    for circle in &view.circles {
        let center = egui::pos2(circle.center.x, circle.center.y) * points_per_pixel;
        let radius = circle.radius * points_per_pixel;
        painter.circle(center, radius, TARGET_FILL, egui::Stroke::new(2.0, TARGET_RING));
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            &circle.label,
            egui::FontId::proportional((radius * 0.9).max(10.0)),
            egui::Color32::WHITE,
        );
    }

    if let Some(key) = &view.logo {
        if let Some(texture) = textures.get_or_load(ctx, catalog, key) {
            let size = fit_size(texture.size_vec2(), egui::vec2(LOGO_MAX_WIDTH, LOGO_MAX_WIDTH));
            let rect = egui::Rect::from_min_size(screen.min + egui::vec2(16.0, 16.0), size);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    if !view.hud.is_empty() {
        egui::Area::new(egui::Id::new("scene_hud"))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
            .interactable(false)
            .show(ctx, |ui| {
                for line in &view.hud {
                    ui.label(egui::RichText::new(line).size(HUD_SIZE).strong().color(egui::Color32::WHITE));
                }
            });
    }

    let mut clicked = Vec::new();
    let has_body = !view.lines.is_empty() || !view.buttons.is_empty() || view.image.is_some();
    let anchor = if has_body {
        egui::Align2::CENTER_CENTER
    } else {
        egui::Align2::CENTER_TOP
    };
    egui::Area::new(egui::Id::new("scene_body"))
        .anchor(anchor, [0.0, if has_body { 0.0 } else { 16.0 }])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&view.title).size(TITLE_SIZE).strong().color(egui::Color32::WHITE));
                if let Some(key) = &view.image {
                    if let Some(texture) = textures.get_or_load(ctx, catalog, key) {
                        let max = egui::vec2(screen.width() * 0.6, FEATURE_MAX_HEIGHT);
                        ui.add(egui::Image::new((texture.id(), fit_size(texture.size_vec2(), max))));
                    }
                }
                for line in &view.lines {
                    ui.label(egui::RichText::new(line).size(BODY_SIZE).color(egui::Color32::WHITE));
                }
                ui.add_space(12.0);
                ui.horizontal_wrapped(|ui| {
                    for button in &view.buttons {
                        let text = egui::RichText::new(&button.label).size(BODY_SIZE).strong();
                        if ui.button(text).clicked() {
                            clicked.push(button.action.clone());
                        }
                    }
                });
            });
        });
    clicked
}
