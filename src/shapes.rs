use crate::record::ShapeRecord;

// ── Bounding Box ────────────────────────────────────────────────────────────

/// A labeled rectangle in image pixel coordinates.
///
/// Extents are stored as `[x0, y0, x1, y1]` and are not normalized: `x0/y0`
/// is the corner the box was anchored at, so `x1 < x0` is legal while a
/// corner is being dragged across the anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    xyxy: [f32; 4],
    label: String,
}

impl BoundingBox {
    pub fn new(xyxy: [f32; 4], label: impl Into<String>) -> Self {
        Self {
            xyxy,
            label: label.into(),
        }
    }

    pub fn xyxy(&self) -> [f32; 4] {
        self.xyxy
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Corners in outline order. Index 2 is always opposite the anchor.
    pub fn corners(&self) -> [egui::Pos2; 4] {
        let [x0, y0, x1, y1] = self.xyxy;
        [
            egui::pos2(x0, y0),
            egui::pos2(x1, y0),
            egui::pos2(x1, y1),
            egui::pos2(x0, y1),
        ]
    }

    pub fn center(&self) -> egui::Pos2 {
        let [x0, y0, x1, y1] = self.xyxy;
        egui::pos2((x0 + x1) * 0.5, (y0 + y1) * 0.5)
    }

    pub fn size(&self) -> egui::Vec2 {
        let [x0, y0, x1, y1] = self.xyxy;
        egui::vec2((x1 - x0).abs(), (y1 - y0).abs())
    }

    pub fn rect(&self) -> egui::Rect {
        let [x0, y0, x1, y1] = self.xyxy;
        egui::Rect::from_two_pos(egui::pos2(x0, y0), egui::pos2(x1, y1))
    }

    pub fn is_degenerate(&self) -> bool {
        let [x0, y0, x1, y1] = self.xyxy;
        x0 == x1 && y0 == y1
    }

    /// Strictly inside the box; points on the outline don't count.
    pub fn contains(&self, p: egui::Pos2) -> bool {
        let r = self.rect();
        p.x > r.min.x && p.x < r.max.x && p.y > r.min.y && p.y < r.max.y
    }

    pub fn move_corner(&mut self, index: usize, x: f32, y: f32) {
        let (xi, yi) = match index {
            0 => (0, 1),
            1 => (2, 1),
            2 => (2, 3),
            3 => (0, 3),
            _ => return,
        };
        self.xyxy[xi] = x;
        self.xyxy[yi] = y;
    }

    /// Translate by the pointer movement since `prev`.
    pub fn move_box(&mut self, x: f32, y: f32, prev: Option<egui::Pos2>) {
        let Some(prev) = prev else {
            return;
        };
        let dx = x - prev.x;
        let dy = y - prev.y;
        self.xyxy[0] += dx;
        self.xyxy[1] += dy;
        self.xyxy[2] += dx;
        self.xyxy[3] += dy;
    }

    pub fn to_record(&self) -> ShapeRecord {
        ShapeRecord::Box {
            label: self.label.clone(),
            xyxy: self.xyxy,
        }
    }

    pub fn from_record(record: ShapeRecord) -> Self {
        let ShapeRecord::Box { label, xyxy } = record;
        Self { xyxy, label }
    }
}
