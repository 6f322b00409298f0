//! Counting: tap the picture or step the counter.

use exercisekit_core::data::{CountingData, Point};
use exercisekit_core::response::CountingResponse;
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

pub struct CountingExercise {
    data: CountingData,
    props: WidgetProps,
    count: u32,
    markers: Vec<Point>,
}

impl CountingExercise {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }

    /// A click on the image: drop a marker and count it, unless at `maxCount`.
    pub fn mark(&mut self, at: Point) {
        if self.props.read_only || self.count >= self.data.max_count {
            return;
        }
        self.markers.push(at);
        self.count += 1;
    }

    pub fn increment(&mut self) {
        if !self.props.read_only && self.count < self.data.max_count {
            self.count += 1;
        }
    }

    /// Step down and drop the last marker.
    pub fn decrement(&mut self) {
        if !self.props.read_only && self.count > self.data.min_count {
            self.count -= 1;
            self.markers.pop();
        }
    }

    /// Typed input: clamped into range, `minCount` when unparseable.
    pub fn set_count(&mut self, input: &str) {
        if self.props.read_only {
            return;
        }
        self.count = match input.trim().parse::<i64>() {
            Ok(n) => self.clamp(n),
            Err(_) => self.data.min_count,
        };
        self.markers.truncate(self.count as usize);
    }

    pub fn is_correct(&self) -> bool {
        self.count == self.data.correct_count
    }

    fn clamp(&self, n: i64) -> u32 {
        let (min, max) = (self.data.min_count, self.data.max_count.max(self.data.min_count));
        n.clamp(i64::from(min), i64::from(max)) as u32
    }
}

impl Exercise for CountingExercise {
    type Data = CountingData;
    type Response = CountingResponse;

    fn mount(data: CountingData, mount: &Mount<'_>) -> Self {
        Self {
            count: data.min_count,
            data,
            props: mount.props,
            markers: Vec::new(),
        }
    }

    fn restore(&mut self, response: CountingResponse) {
        self.count = self.clamp(i64::from(response.count));
        self.markers = response.markers;
        self.markers.truncate(self.count as usize);
    }

    fn response(&self) -> CountingResponse {
        CountingResponse {
            count: self.count,
            markers: self.markers.clone(),
            is_correct: self.is_correct(),
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::all_or_nothing(self.is_correct()))
    }

    fn envelope_correctness(&self) -> Option<bool> {
        Some(self.is_correct())
    }

    fn reset(&mut self) {
        self.count = self.data.min_count;
        self.markers.clear();
    }
}
