use std::collections::HashMap;

use crate::canvas::BoxCanvas;
use crate::shapes::BoundingBox;
use crate::view::ViewTransform;

const TITLE_BAR_HEIGHT: f32 = 10.0;
const LABEL_FONT_SIZE: f32 = 14.0;
const DASH: f32 = 10.0;
const GAP: f32 = 5.0;

#[derive(Clone, Debug)]
pub struct RenderStyle {
    pub colormap: HashMap<String, egui::Color32>,
    pub opacity: f32,
    pub line_width: f32,
}

impl RenderStyle {
    fn color_for(&self, label: &str) -> egui::Color32 {
        self.colormap
            .get(label)
            .copied()
            .unwrap_or(egui::Color32::BLACK)
    }
}

fn with_opacity(c: egui::Color32, opacity: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Paint every committed box, then the proposal on top.
pub fn paint_canvas(
    painter: &egui::Painter,
    canvas_rect: egui::Rect,
    view: &ViewTransform,
    canvas: &BoxCanvas,
    style: &RenderStyle,
) {
    let handle_radius = canvas.point_size() * view.zoom;
    for (i, b) in canvas.annotations().iter().enumerate() {
        let selected = canvas.active() == Some(i);
        draw_box(painter, canvas_rect, view, style, b, selected, false, handle_radius);
    }
    if let Some(proposed) = canvas.proposed() {
        draw_box(painter, canvas_rect, view, style, proposed, false, true, handle_radius);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_box(
    painter: &egui::Painter,
    canvas_rect: egui::Rect,
    view: &ViewTransform,
    style: &RenderStyle,
    b: &BoundingBox,
    selected: bool,
    proposed: bool,
    handle_radius: f32,
) {
    let color = style.color_for(b.label());
    let fill = with_opacity(color, style.opacity);
    let stroke = egui::Stroke::new(style.line_width, color);

    let corners: Vec<egui::Pos2> = b
        .corners()
        .iter()
        .map(|c| view.image_to_screen(canvas_rect, *c))
        .collect();
    let screen_rect = egui::Rect::from_two_pos(corners[0], corners[2]);

    painter.rect_filled(screen_rect, 0.0, fill);
    if proposed {
        let mut outline = corners.clone();
        outline.push(corners[0]);
        painter.extend(egui::Shape::dashed_line(&outline, stroke, DASH, GAP));
    } else {
        painter.add(egui::Shape::closed_line(corners.clone(), stroke));
    }

    // Selected boxes get handles and a title bar inset so it clears them.
    let (inset, bar_fill) = if selected {
        for c in &corners {
            painter.circle_filled(*c, handle_radius, color);
        }
        (handle_radius, color)
    } else {
        (0.0, fill)
    };

    let bar_width = (screen_rect.width() - 2.0 * inset).max(0.0);
    let bar = egui::Rect::from_min_size(
        egui::pos2(screen_rect.min.x + inset, screen_rect.min.y - TITLE_BAR_HEIGHT),
        egui::vec2(bar_width, TITLE_BAR_HEIGHT),
    );
    painter.rect_filled(bar, 0.0, bar_fill);
    painter.text(
        egui::pos2(screen_rect.min.x + inset, screen_rect.min.y),
        egui::Align2::LEFT_BOTTOM,
        b.label(),
        egui::FontId::proportional(LABEL_FONT_SIZE),
        egui::Color32::BLACK,
    );
}
