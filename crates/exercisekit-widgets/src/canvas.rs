//! Freehand canvas shared by the drawing and tracing widgets.
//!
//! Ink is kept as strokes and saved as a sketch data URI:
//! `data:application/vnd.exercisekit.sketch+json;base64,<json>`. A saved
//! data URI in any other media type (e.g. a PNG from an older client) is
//! kept verbatim and re-emitted until the learner draws or clears.
//!
//! Tracing coverage is computed by one of two heuristics, chosen by the
//! configured [`CanvasBackend`]:
//! - `raster`: strokes and guide are stamped onto a grid of cells and the
//!   overlapping cells are counted.
//! - `vector`: both paths are sampled and compared point to point.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use exercisekit_core::config::{CanvasBackend, TracingSettings};
use exercisekit_core::data::Point;
use exercisekit_core::scoring::percent;

pub const SKETCH_MEDIA_TYPE: &str = "application/vnd.exercisekit.sketch+json";

const DEFAULT_COLOR: &str = "#000000";
const DEFAULT_BRUSH: f64 = 5.0;
/// Widest brush a stroke may carry.
pub const MAX_BRUSH: f64 = 200.0;
/// Largest canvas side, in pixels, a sketch may claim.
pub const MAX_CANVAS_SIDE: u32 = 4096;
/// Upper bound on samples between two consecutive stroke points.
const MAX_SEGMENT_SAMPLES: usize = 4096;
/// Upper bound on occupancy grid columns and rows.
const MAX_GRID_SIDE: usize = 1024;

/// Errors decoding a canvas data URI.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("not a data URI")]
    NotADataUri,

    #[error("data URI is not sketch data: {0}")]
    ForeignMediaType(String),

    #[error("data URI is not base64 encoded")]
    NotBase64,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid sketch JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Sketch model
// ---------------------------------------------------------------------------

/// One continuous brush stroke, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub points: Vec<Point>,
}

/// Everything drawn on a canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sketch {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl Sketch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
        }
    }

    pub fn has_ink(&self) -> bool {
        self.strokes.iter().any(|s| !s.points.is_empty())
    }

    pub fn to_data_uri(&self) -> Result<String, CanvasError> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("data:{SKETCH_MEDIA_TYPE};base64,{}", STANDARD.encode(json)))
    }

    pub fn from_data_uri(uri: &str) -> Result<Self, CanvasError> {
        let rest = uri.strip_prefix("data:").ok_or(CanvasError::NotADataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(CanvasError::NotADataUri)?;
        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default();
        if media_type != SKETCH_MEDIA_TYPE {
            return Err(CanvasError::ForeignMediaType(media_type.to_string()));
        }
        if !params.any(|p| p == "base64") {
            return Err(CanvasError::NotBase64);
        }
        let bytes = STANDARD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fit decoded geometry to a `width` x `height` canvas.
    ///
    /// Non-finite points are dropped, the rest are clamped onto the canvas,
    /// and stroke widths are kept within `1.0..=MAX_BRUSH`.
    pub fn fit_to(mut self, width: u32, height: u32) -> Self {
        self.width = width.clamp(1, MAX_CANVAS_SIDE);
        self.height = height.clamp(1, MAX_CANVAS_SIDE);
        let (max_x, max_y) = (f64::from(self.width), f64::from(self.height));
        for stroke in &mut self.strokes {
            stroke.width = if stroke.width.is_finite() {
                stroke.width.clamp(1.0, MAX_BRUSH)
            } else {
                DEFAULT_BRUSH
            };
            stroke.points.retain(|p| p.x.is_finite() && p.y.is_finite());
            for p in &mut stroke.points {
                p.x = p.x.clamp(0.0, max_x);
                p.y = p.y.clamp(0.0, max_y);
            }
        }
        self
    }
}

/// A drawing surface with a brush.
#[derive(Debug, Clone)]
pub struct Canvas {
    sketch: Sketch,
    /// A saved data URI this crate cannot decode, re-emitted as is.
    foreign: Option<String>,
    brush_color: String,
    brush_size: f64,
    drawing: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            sketch: Sketch::new(width, height),
            foreign: None,
            brush_color: DEFAULT_COLOR.to_string(),
            brush_size: DEFAULT_BRUSH,
            drawing: false,
        }
    }

    /// Restore from a saved data URI. Empty input leaves a blank canvas.
    pub fn load(&mut self, uri: &str) {
        self.clear();
        if uri.is_empty() {
            return;
        }
        match Sketch::from_data_uri(uri) {
            Ok(sketch) => {
                let (width, height) = self.size();
                self.sketch = sketch.fit_to(width, height);
            }
            Err(e) => {
                tracing::debug!("keeping saved canvas verbatim: {e}");
                self.foreign = Some(uri.to_string());
            }
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.sketch.width, self.sketch.height)
    }

    pub fn set_brush_color(&mut self, color: impl Into<String>) {
        self.brush_color = color.into();
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = if size.is_finite() {
            size.clamp(1.0, MAX_BRUSH)
        } else {
            DEFAULT_BRUSH
        };
    }

    pub fn brush(&self) -> (&str, f64) {
        (&self.brush_color, self.brush_size)
    }

    /// Start a stroke. Drawing over foreign content replaces it.
    pub fn begin_stroke(&mut self, at: Point) {
        self.foreign = None;
        self.sketch.strokes.push(Stroke {
            color: self.brush_color.clone(),
            width: self.brush_size,
            points: vec![at],
        });
        self.drawing = true;
    }

    pub fn extend_stroke(&mut self, to: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.sketch.strokes.last_mut() {
            stroke.points.push(to);
        }
    }

    /// Finish the current stroke. Returns `true` if one was in progress.
    pub fn end_stroke(&mut self) -> bool {
        std::mem::replace(&mut self.drawing, false)
    }

    pub fn clear(&mut self) {
        self.drawing = false;
        self.foreign = None;
        self.sketch.strokes.clear();
    }

    pub fn has_ink(&self) -> bool {
        self.foreign.is_some() || self.sketch.has_ink()
    }

    /// The strokes on the canvas; empty while foreign content is shown.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    pub fn foreign(&self) -> Option<&str> {
        self.foreign.as_deref()
    }

    /// The saved form of the canvas; empty when nothing was drawn.
    pub fn data_uri(&self) -> String {
        if let Some(uri) = &self.foreign {
            return uri.clone();
        }
        if !self.sketch.has_ink() {
            return String::new();
        }
        self.sketch.to_data_uri().unwrap_or_else(|e| {
            tracing::warn!("could not encode sketch: {e}");
            String::new()
        })
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

/// How much of a guide the ink covers, and how much ink is on the guide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Share of the guide within reach of ink, 0..=100.
    pub completion: u32,
    /// Share of ink within reach of the guide, 0..=100.
    pub accuracy: u32,
}

/// Guide-versus-ink comparison for one tracing canvas.
#[derive(Debug, Clone, Copy)]
pub struct CoverageProbe<'a> {
    /// Guide path, normalized to `0.0..=1.0`.
    pub guide: &'a [Point],
    pub width: u32,
    pub height: u32,
    /// Distance, in pixels, at which ink counts as on the guide.
    pub tolerance: f64,
}

impl CoverageProbe<'_> {
    pub fn measure(&self, backend: CanvasBackend, settings: &TracingSettings, sketch: &Sketch) -> Coverage {
        let guide: Vec<Point> = self
            .guide
            .iter()
            .map(|p| Point::new(p.x * f64::from(self.width), p.y * f64::from(self.height)))
            .collect();
        let spacing = f64::from(settings.cell_size.max(1));
        match backend {
            CanvasBackend::Raster => self.raster(&guide, sketch, spacing),
            CanvasBackend::Vector => self.vector(&guide, sketch, spacing),
        }
    }

    fn raster(&self, guide: &[Point], sketch: &Sketch, cell: f64) -> Coverage {
        let mut guide_line = Grid::new(self.width, self.height, cell);
        let mut guide_band = Grid::new(self.width, self.height, cell);
        for p in sample_polyline(guide, cell / 2.0) {
            guide_line.stamp(p, 0.0);
            guide_band.stamp(p, self.tolerance);
        }

        let mut ink = Grid::new(self.width, self.height, cell);
        let mut ink_reach = Grid::new(self.width, self.height, cell);
        for stroke in &sketch.strokes {
            let radius = stroke.width / 2.0;
            for p in sample_polyline(&stroke.points, cell / 2.0) {
                ink.stamp(p, radius);
                ink_reach.stamp(p, radius + self.tolerance);
            }
        }

        Coverage {
            completion: percent(guide_line.overlap(&ink_reach), guide_line.count()),
            accuracy: percent(ink.overlap(&guide_band), ink.count()),
        }
    }

    fn vector(&self, guide: &[Point], sketch: &Sketch, spacing: f64) -> Coverage {
        let guide_samples = sample_polyline(guide, spacing);
        let ink_samples: Vec<(Point, f64)> = sketch
            .strokes
            .iter()
            .flat_map(|s| {
                sample_polyline(&s.points, spacing)
                    .into_iter()
                    .map(move |p| (p, s.width / 2.0))
            })
            .collect();

        let covered = guide_samples
            .iter()
            .filter(|g| {
                ink_samples
                    .iter()
                    .any(|(p, r)| p.distance(g) <= r + self.tolerance)
            })
            .count();
        let on_guide = ink_samples
            .iter()
            .filter(|(p, _)| guide_samples.iter().any(|g| p.distance(g) <= self.tolerance))
            .count();

        Coverage {
            completion: percent(covered, guide_samples.len()),
            accuracy: percent(on_guide, ink_samples.len()),
        }
    }
}

/// Points along a polyline no further than `spacing` apart.
pub fn sample_polyline(points: &[Point], spacing: f64) -> Vec<Point> {
    let spacing = spacing.max(0.5);
    let mut out = Vec::new();
    let Some(first) = points.first() else {
        return out;
    };
    out.push(*first);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let distance = a.distance(&b);
        if !distance.is_finite() {
            continue;
        }
        let steps = ((distance / spacing).ceil().max(1.0) as usize).min(MAX_SEGMENT_SAMPLES);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            out.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
        }
    }
    out
}

/// A coarse occupancy grid over the canvas.
struct Grid {
    cols: usize,
    rows: usize,
    cell: f64,
    cells: Vec<bool>,
}

impl Grid {
    fn new(width: u32, height: u32, cell: f64) -> Self {
        let cell = cell.max(1.0);
        let side = |len: u32| ((f64::from(len) / cell).ceil().max(1.0) as usize).min(MAX_GRID_SIDE);
        let (cols, rows) = (side(width), side(height));
        Self {
            cols,
            rows,
            cell,
            cells: vec![false; cols * rows],
        }
    }

    /// Mark the cell under `p` and every cell whose centre is within `radius`.
    fn stamp(&mut self, p: Point, radius: f64) {
        let to_index = |v: f64, max: usize| ((v / self.cell).floor().max(0.0) as usize).min(max - 1);
        if !(p.x >= 0.0 && p.y >= 0.0) || !radius.is_finite() {
            return;
        }
        let (col, row) = (to_index(p.x, self.cols), to_index(p.y, self.rows));
        if p.x >= self.cols as f64 * self.cell || p.y >= self.rows as f64 * self.cell {
            return;
        }
        let reach = ((radius / self.cell).ceil().max(0.0) as usize).min(self.cols.max(self.rows));
        let (c0, c1) = (col.saturating_sub(reach), col.saturating_add(reach).min(self.cols - 1));
        let (r0, r1) = (row.saturating_sub(reach), row.saturating_add(reach).min(self.rows - 1));
        for r in r0..=r1 {
            for c in c0..=c1 {
                let centre = Point::new((c as f64 + 0.5) * self.cell, (r as f64 + 0.5) * self.cell);
                if (r == row && c == col) || centre.distance(&p) <= radius {
                    self.cells[r * self.cols + c] = true;
                }
            }
        }
    }

    fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    fn overlap(&self, other: &Grid) -> usize {
        self.cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| **a && **b)
            .count()
    }
}
