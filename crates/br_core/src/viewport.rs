//! Read-only access to the current render-surface size.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether `point` lies inside the viewport grown by `buffer` on every side.
    pub fn contains_with_buffer(self, point: Vec2, buffer: f32) -> bool {
        point.x >= -buffer
            && point.x <= self.width + buffer
            && point.y >= -buffer
            && point.y <= self.height + buffer
    }
}

pub trait ViewportQuery {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width(), self.height())
    }
}

/// Viewport handle written by the host on resize and read by scenes.
#[derive(Debug, Clone)]
pub struct SharedViewport {
    size: Rc<Cell<ViewportSize>>,
}

impl SharedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new(ViewportSize::new(width, height))),
        }
    }

    pub fn set(&self, width: f32, height: f32) {
        self.size.set(ViewportSize::new(width, height));
    }
}

impl ViewportQuery for SharedViewport {
    fn width(&self) -> f32 {
        self.size.get().width
    }

    fn height(&self) -> f32 {
        self.size.get().height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_viewport_updates_every_handle() {
        let viewport = SharedViewport::new(800.0, 600.0);
        let reader = viewport.clone();
        viewport.set(1024.0, 768.0);
        assert_eq!(reader.size(), ViewportSize::new(1024.0, 768.0));
    }

    #[test]
    fn buffer_extends_bounds_on_all_sides() {
        let size = ViewportSize::new(800.0, 600.0);
        assert!(size.contains_with_buffer(Vec2::new(-50.0, 300.0), 50.0));
        assert!(size.contains_with_buffer(Vec2::new(850.0, 650.0), 50.0));
        assert!(!size.contains_with_buffer(Vec2::new(850.1, 300.0), 50.0));
        assert!(!size.contains_with_buffer(Vec2::new(400.0, -50.1), 50.0));
    }

    #[test]
    fn center_is_half_extent() {
        assert_eq!(ViewportSize::new(800.0, 600.0).center(), Vec2::new(400.0, 300.0));
    }
}
