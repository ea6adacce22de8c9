//! Presentation-neutral description of what a scene wants on screen.
//!
//! Scenes rebuild a `SceneView` every frame; the UI layer paints it and hands
//! back the actions of any buttons that were clicked. The action type is
//! chosen by the game so a click can only ever name something the scene
//! actually offers.

use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSpec<A> {
    pub label: String,
    pub action: A,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleSpec {
    pub center: Vec2,
    pub radius: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneView<A> {
    pub title: String,
    /// Resource key of a full-screen backdrop, if the scene has one loaded.
    pub backdrop: Option<String>,
    /// Resource key of the brand logo drawn in the top-left corner.
    pub logo: Option<String>,
    /// Resource key of a featured image (weapon art).
    pub image: Option<String>,
    pub lines: Vec<String>,
    pub hud: Vec<String>,
    pub buttons: Vec<ButtonSpec<A>>,
    pub circles: Vec<CircleSpec>,
}

impl<A> SceneView<A> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            backdrop: None,
            logo: None,
            image: None,
            lines: Vec::new(),
            hud: Vec::new(),
            buttons: Vec::new(),
            circles: Vec::new(),
        }
    }

    pub fn with_backdrop(mut self, key: Option<&str>) -> Self {
        self.backdrop = key.map(str::to_string);
        self
    }

    pub fn with_logo(mut self, key: Option<&str>) -> Self {
        self.logo = key.map(str::to_string);
        self
    }

    pub fn with_image(mut self, key: Option<&str>) -> Self {
        self.image = key.map(str::to_string);
        self
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn hud(mut self, text: impl Into<String>) -> Self {
        self.hud.push(text.into());
        self
    }

    pub fn button(mut self, label: impl Into<String>, action: A) -> Self {
        self.buttons.push(ButtonSpec {
            label: label.into(),
            action,
        });
        self
    }

    pub fn circle(mut self, center: Vec2, radius: f32, label: impl Into<String>) -> Self {
        self.circles.push(CircleSpec {
            center,
            radius,
            label: label.into(),
        });
        self
    }

    pub fn has_action(&self, action: &A) -> bool
    where
        A: PartialEq,
    {
        self.buttons.iter().any(|b| b.action == *action)
    }
}
