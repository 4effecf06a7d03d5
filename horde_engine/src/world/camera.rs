/// Viewpoint handed through the World to the render layer.
///
/// Plain data: the simulation stores it and never reads it. Gameplay code
/// moves it to follow the player and uses `visible_region` to restrict
/// queries to what is on screen.

use glam::Vec2;
use crate::geometry::AABB;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(1280.0, 720.0))
    }
}

impl Camera {
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            viewport,
            zoom: 1.0,
        }
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// World-space region shown on screen.
    pub fn visible_region(&self) -> AABB {
        AABB::new(self.position, self.viewport / self.zoom)
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Values at or below zero are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
        }
    }
}
