pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan & zoom mapping between image pixels and screen points. The image is
/// centered in the canvas rect, offset by `pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub image_size: egui::Vec2,
    pub pan: egui::Vec2,
    pub zoom: f32,
}

impl ViewTransform {
    pub fn new(image_size: egui::Vec2) -> Self {
        Self {
            image_size,
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Convert image-space coords to screen-space
    pub fn image_to_screen(&self, canvas_rect: egui::Rect, img_pos: egui::Pos2) -> egui::Pos2 {
        canvas_rect.center() + self.pan + (img_pos.to_vec2() - self.image_size * 0.5) * self.zoom
    }

    /// Convert screen-space coords to image-space
    pub fn screen_to_image(&self, canvas_rect: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let rel = screen_pos - canvas_rect.center() - self.pan;
        (rel / self.zoom + self.image_size * 0.5).to_pos2()
    }

    pub fn image_rect_on_screen(&self, canvas_rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.image_to_screen(canvas_rect, egui::Pos2::ZERO),
            self.image_to_screen(canvas_rect, self.image_size.to_pos2()),
        )
    }

    /// Zoom about `cursor` so the image point under it stays put.
    pub fn zoom_at(&mut self, canvas_rect: egui::Rect, cursor: Option<egui::Pos2>, scroll: f32) {
        let zoom_factor = 1.0 + scroll * 0.002;
        let new_zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if let Some(cursor) = cursor {
            let cursor_rel = cursor - canvas_rect.center() - self.pan;
            self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
        }
        self.zoom = new_zoom;
    }
}
