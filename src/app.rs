use std::path::PathBuf;

use eframe::egui;
use image::DynamicImage;

use crate::canvas::BoxCanvas;
use crate::config::AppConfig;
use crate::history::History;
use crate::persist;
use crate::render::{self, RenderStyle};
use crate::view::ViewTransform;

const FALLBACK_CLASS: &str = "object";

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    image_path: PathBuf,
    texture: Option<egui::TextureHandle>,
    raw_image: Option<DynamicImage>,

    canvas: BoxCanvas,
    view: ViewTransform,
    style: RenderStyle,
    classes: Vec<String>,
    autosave: bool,

    // true while a primary press that began on the canvas is held
    pointer_captured: bool,
    shift_held: bool,
    status: String,
}

impl AnnotatorApp {
    pub fn new(
        image_path: PathBuf,
        config: &AppConfig,
        initial_class: Option<String>,
    ) -> anyhow::Result<Self> {
        let raw_image = match image::open(&image_path) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("could not open {}: {e}", image_path.display());
                None
            }
        };
        let image_size = raw_image
            .as_ref()
            .map(|img| egui::vec2(img.width() as f32, img.height() as f32))
            .unwrap_or(egui::vec2(800.0, 600.0));

        let mut classes = config.class_names();
        if classes.is_empty() {
            classes.push(FALLBACK_CLASS.to_string());
        }
        let current = initial_class.unwrap_or_else(|| classes[0].clone());
        if !classes.contains(&current) {
            classes.push(current.clone());
        }

        let mut canvas = BoxCanvas::new(image_size, current)
            .with_point_size(config.point_size)
            .with_history(History::with_depth(config.undo_depth));
        canvas.set_data(persist::load_annotations(&image_path)?);

        Ok(Self {
            image_path,
            texture: None,
            raw_image,
            canvas,
            view: ViewTransform::new(image_size),
            style: RenderStyle {
                colormap: config.colormap()?,
                opacity: config.opacity,
                line_width: config.line_width,
            },
            classes,
            autosave: config.autosave,
            pointer_captured: false,
            shift_held: false,
            status: String::new(),
        })
    }

    fn save(&mut self) {
        match persist::save_annotations(&self.image_path, &self.canvas.data()) {
            Ok(()) => self.status = format!("Saved {} boxes", self.canvas.annotations().len()),
            Err(e) => {
                log::warn!("save failed: {e:#}");
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn changed(&mut self) {
        if self.autosave {
            self.save();
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));

        if ctx.wants_keyboard_input() {
            self.shift_held = modifiers.shift;
            return;
        }

        // egui doesn't emit key events for modifiers, so Shift alone is an edge.
        if modifiers.shift && !self.shift_held {
            self.canvas.on_key_down(None, modifiers);
        }
        self.shift_held = modifiers.shift;

        let mut changed = false;
        for event in events {
            if let egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } = event
            {
                if modifiers.command && key == egui::Key::S {
                    self.save();
                    continue;
                }
                changed |= self.canvas.on_key_down(Some(key), modifiers);
            }
        }
        if changed {
            self.changed();
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, canvas_rect: egui::Rect) {
        let (pressed, down, released, pos, middle_down, delta) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                i.pointer.middle_down(),
                i.pointer.delta(),
            )
        });
        let img = pos.map(|p| self.view.screen_to_image(canvas_rect, p));

        if let Some(img) = img.filter(|_| pressed && response.hovered()) {
            self.pointer_captured = true;
            self.canvas.on_click(img.x, img.y);
        }

        // A release always ends the gesture, even mid-pan.
        if released && self.pointer_captured {
            self.pointer_captured = false;
            let end = img.unwrap_or(egui::pos2(-1.0, -1.0));
            if self.canvas.on_release(end.x, end.y) {
                self.changed();
            }
            return;
        }

        // Pan with the middle button
        if middle_down {
            self.view.pan += delta;
            return;
        }

        // Zoom with the scroll wheel
        let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 && response.hovered() {
            self.view.zoom_at(canvas_rect, response.hover_pos(), scroll_delta);
        }

        let dragging = down && !pressed && self.pointer_captured && delta != egui::Vec2::ZERO;
        if let Some(img) = img.filter(|_| dragging) {
            self.canvas.on_drag(img.x, img.y);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Class:");
            let mut current = self.canvas.current_class().to_string();
            egui::ComboBox::from_id_salt("class")
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for class in &self.classes {
                        ui.selectable_value(&mut current, class.clone(), class.as_str());
                    }
                });
            if current != self.canvas.current_class() {
                self.canvas.set_current_class(current);
            }

            let mut adding = self.canvas.is_adding();
            if ui.toggle_value(&mut adding, "Add box").changed() {
                self.canvas.set_adding(adding);
            }
            ui.separator();
            if ui
                .add_enabled(self.canvas.can_undo(), egui::Button::new("Undo"))
                .clicked()
                && self.canvas.undo()
            {
                self.changed();
            }
            if ui
                .add_enabled(self.canvas.can_redo(), egui::Button::new("Redo"))
                .clicked()
                && self.canvas.redo()
            {
                self.changed();
            }
            if ui.button("Save").clicked() {
                self.save();
            }
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", self.view.zoom * 100.0));
            ui.label(format!("Boxes: {}", self.canvas.annotations().len()));
            if !self.status.is_empty() {
                ui.separator();
                ui.label(self.status.as_str());
            }
        });
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            self.handle_pointer(ctx, &response, canvas_rect);

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));
            if let Some(ref tex) = self.texture {
                painter.image(
                    tex.id(),
                    self.view.image_rect_on_screen(canvas_rect),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            render::paint_canvas(&painter, canvas_rect, &self.view, &self.canvas, &self.style);
        });
    }
}
