use crate::message::WorldAnchor;
use crate::services::{MainView, ScreenPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::default(),
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

pub fn world_to_screen(
    world: Vec2,
    camera: &Camera2D,
    viewport: Viewport,
    pixels_per_world: f32,
) -> (i32, i32) {
    let scale = pixels_per_world * camera.zoom;
    let x = (world.x - camera.position.x) * scale + viewport.width as f32 * 0.5;
    let y = viewport.height as f32 * 0.5 - (world.y - camera.position.y) * scale;
    (x.round() as i32, y.round() as i32)
}

/// Main game view squeezed between the toolbar and the status bar.
#[derive(Debug, Clone)]
pub struct ViewportView {
    pub screen_width: u32,
    pub screen_height: u32,
    pub toolbar_height: u32,
    pub statusbar_height: u32,
    pub camera: Camera2D,
    pub pixels_per_world: f32,
    highlight: Option<WorldAnchor>,
}

impl ViewportView {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            toolbar_height: 22,
            statusbar_height: 12,
            camera: Camera2D::default(),
            pixels_per_world: 1.0,
            highlight: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.screen_width,
            height: self
                .screen_height
                .saturating_sub(self.toolbar_height + self.statusbar_height),
        }
    }

    pub fn set_error_highlight(&mut self, anchor: WorldAnchor) {
        self.highlight = Some(anchor);
    }

    pub fn error_highlight(&self) -> Option<WorldAnchor> {
        self.highlight
    }
}

impl MainView for ViewportView {
    fn screen_size(&self) -> (i32, i32) {
        (self.screen_width as i32, self.screen_height as i32)
    }

    fn main_view_top(&self) -> i32 {
        self.toolbar_height as i32
    }

    fn main_view_bottom(&self) -> i32 {
        self.screen_height.saturating_sub(self.statusbar_height) as i32
    }

    fn project(&self, anchor: WorldAnchor) -> Option<ScreenPoint> {
        let viewport = self.viewport();
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let world = Vec2 {
            x: anchor.x as f32,
            y: anchor.y as f32,
        };
        let (x, y) = world_to_screen(world, &self.camera, viewport, self.pixels_per_world);
        Some(ScreenPoint {
            x,
            y: y + self.main_view_top(),
        })
    }

    fn clear_error_highlight(&mut self) {
        self.highlight = None;
    }
}
