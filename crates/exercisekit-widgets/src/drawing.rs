//! Free drawing on a blank or background canvas.

use exercisekit_core::data::{DrawingData, Point};
use exercisekit_core::response::DrawingResponse;
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

use crate::canvas::Canvas;

pub struct DrawingExercise {
    data: DrawingData,
    props: WidgetProps,
    canvas: Canvas,
}

impl DrawingExercise {
    pub fn instructions(&self) -> &str {
        &self.data.instructions
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn set_brush_color(&mut self, color: &str) {
        if !self.props.read_only {
            self.canvas.set_brush_color(color);
        }
    }

    pub fn set_brush_size(&mut self, size: f64) {
        if !self.props.read_only {
            self.canvas.set_brush_size(size);
        }
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

    pub fn end_stroke(&mut self) {
        if !self.props.read_only {
            self.canvas.end_stroke();
        }
    }

    pub fn clear(&mut self) {
        if !self.props.read_only {
            self.canvas.clear();
        }
    }

    /// 100 once anything is drawn.
    pub fn completion_percentage(&self) -> u32 {
        if self.canvas.has_ink() {
            100
        } else {
            0
        }
    }
}

impl Exercise for DrawingExercise {
    type Data = DrawingData;
    type Response = DrawingResponse;

    fn mount(data: DrawingData, mount: &Mount<'_>) -> Self {
        let canvas = Canvas::new(data.canvas_width, data.canvas_height);
        Self {
            data,
            props: mount.props,
            canvas,
        }
    }

    fn restore(&mut self, response: DrawingResponse) {
        self.canvas.load(&response.drawing_data);
    }

    fn response(&self) -> DrawingResponse {
        DrawingResponse {
            drawing_data: self.canvas.data_uri(),
            completion_percentage: self.completion_percentage(),
        }
    }

    fn score(&self) -> Option<Score> {
        None
    }

    fn reset(&mut self) {
        self.canvas.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercisekit_core::model::QuestionType;
    use exercisekit_core::traits::RenderContext;

    fn mount(read_only: bool) -> DrawingExercise {
        let context = RenderContext::default();
        DrawingExercise::mount(
            DrawingData::default(),
            &Mount {
                question_type: QuestionType::Drawing,
                props: WidgetProps {
                    read_only,
                    show_answers: false,
                },
                context: &context,
            },
        )
    }

    #[test]
    fn ink_completes_the_drawing() {
        let mut ex = mount(false);
        assert_eq!(ex.response(), DrawingResponse::default());
        assert_eq!(ex.canvas().size(), (600, 400));

        ex.set_brush_color("#FF0000");
        ex.begin_stroke(Point::new(10.0, 10.0));
        ex.extend_stroke(Point::new(20.0, 30.0));
        ex.end_stroke();

        let saved = ex.response();
        assert_eq!(saved.completion_percentage, 100);
        assert_eq!(ex.canvas().sketch().strokes[0].color, "#FF0000");

        let mut restored = mount(false);
        restored.restore(saved.clone());
        assert_eq!(restored.response(), saved);

        ex.clear();
        assert_eq!(ex.completion_percentage(), 0);
        assert!(ex.score().is_none());
    }

    #[test]
    fn foreign_drawing_round_trips_verbatim() {
        let mut ex = mount(true);
        let saved = DrawingResponse {
            drawing_data: "data:image/png;base64,iVBORw0KGgo=".into(),
            completion_percentage: 100,
        };
        ex.restore(saved.clone());
        ex.begin_stroke(Point::new(1.0, 1.0));
        assert_eq!(ex.response(), saved);
    }
}
