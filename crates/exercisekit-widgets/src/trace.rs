//! Tracing and letter tracing: follow a guide path with the brush.
//!
//! After every stroke the ink is compared against `guidePoints`: completion
//! is the share of the guide covered, accuracy the share of ink on the guide.
//! Without guide points both fall back to ink presence.

use exercisekit_core::config::{CanvasBackend, TracingSettings};
use exercisekit_core::data::{Difficulty, Point, TracingData};
use exercisekit_core::response::TracingResponse;
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

use crate::canvas::{Canvas, Coverage, CoverageProbe};

/// Colour band for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Medium,
    High,
}

impl ProgressBand {
    pub fn of(percentage: u32) -> Self {
        match percentage {
            80.. => ProgressBand::High,
            50..=79 => ProgressBand::Medium,
            _ => ProgressBand::Low,
        }
    }
}

pub struct TracingExercise {
    data: TracingData,
    props: WidgetProps,
    backend: CanvasBackend,
    settings: TracingSettings,
    canvas: Canvas,
    coverage: Coverage,
}

impl TracingExercise {
    /// The glyph to trace, with the configured case applied.
    pub fn glyph(&self) -> String {
        if self.data.uppercase {
            self.data.letter_or_shape.to_uppercase()
        } else {
            self.data.letter_or_shape.to_lowercase()
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn progress(&self) -> ProgressBand {
        ProgressBand::of(self.coverage.completion)
    }

    pub fn begin_stroke(&mut self, at: Point) {
        if !self.props.read_only {
            self.canvas.begin_stroke(at);
        }
    }

    pub fn extend_stroke(&mut self, to: Point) {
        if !self.props.read_only {
            self.canvas.extend_stroke(to);
        }
    }

    /// Finish a stroke and re-measure coverage.
    pub fn end_stroke(&mut self) {
        if !self.props.read_only && self.canvas.end_stroke() {
            self.coverage = self.measure();
        }
    }

    pub fn clear(&mut self) {
        if !self.props.read_only {
            self.canvas.clear();
            self.coverage = Coverage::default();
        }
    }

    /// How far, in pixels, ink may stray and still count as on the guide.
    fn tolerance(&self) -> f64 {
        let factor = match self.data.difficulty {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 2.0,
            Difficulty::Hard => 1.0,
        };
        f64::from(self.data.stroke_width.max(1)) * factor
    }

    fn measure(&self) -> Coverage {
        if self.data.guide_points.is_empty() {
            let ink = if self.canvas.has_ink() { 100 } else { 0 };
            return Coverage {
                completion: ink,
                accuracy: ink,
            };
        }
        let probe = CoverageProbe {
            guide: &self.data.guide_points,
            width: self.data.canvas_width,
            height: self.data.canvas_height,
            tolerance: self.tolerance(),
        };
        probe.measure(self.backend, &self.settings, self.canvas.sketch())
    }
}

impl Exercise for TracingExercise {
    type Data = TracingData;
    type Response = TracingResponse;

    fn mount(data: TracingData, mount: &Mount<'_>) -> Self {
        let mut canvas = Canvas::new(data.canvas_width, data.canvas_height);
        canvas.set_brush_size(f64::from(data.stroke_width));
        Self {
            data,
            props: mount.props,
            backend: mount.context.canvas_backend,
            settings: mount.context.tracing,
            canvas,
            coverage: Coverage::default(),
        }
    }

    fn restore(&mut self, response: TracingResponse) {
        self.canvas.load(&response.tracing_data);
        self.coverage = Coverage {
            completion: response.completion_percentage.min(100),
            accuracy: response.accuracy.min(100),
        };
    }

    fn response(&self) -> TracingResponse {
        TracingResponse {
            tracing_data: self.canvas.data_uri(),
            completion_percentage: self.coverage.completion,
            accuracy: self.coverage.accuracy,
        }
    }

    fn score(&self) -> Option<Score> {
        None
    }

    fn reset(&mut self) {
        self.canvas.clear();
        self.coverage = Coverage::default();
    }
}
