//! Coloring: fill named regions of a picture from a palette.

use exercisekit_core::data::{ColorRegion, ColoringData};
use exercisekit_core::response::{ColoredRegion, ColoringResponse};
use exercisekit_core::scoring::Score;
use exercisekit_core::traits::{Exercise, Mount, WidgetProps};

/// Colour of a region nobody has painted.
pub const UNCOLORED: &str = "#FFFFFF";

pub const PALETTE: [&str; 10] = [
    "#FF0000", "#FF9900", "#FFFF00", "#00FF00", "#0000FF", "#9900FF", "#FF00FF", "#663300",
    "#000000", "#FFFFFF",
];

pub struct ColoringExercise {
    data: ColoringData,
    props: WidgetProps,
    selected_color: String,
    colors: Vec<ColoredRegion>,
}

impl ColoringExercise {
    pub fn regions(&self) -> &[ColorRegion] {
        &self.data.regions
    }

    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }

    pub fn select_color(&mut self, color: &str) {
        if !self.props.read_only {
            self.selected_color = color.to_string();
        }
    }

    /// Paint a region with the selected colour.
    pub fn paint(&mut self, region_id: &str) {
        if self.props.read_only || !self.data.regions.iter().any(|r| r.id == region_id) {
            return;
        }
        let color = self.selected_color.clone();
        match self.colors.iter_mut().find(|c| c.id == region_id) {
            Some(region) => region.color = color,
            None => self.colors.push(ColoredRegion {
                id: region_id.to_string(),
                color,
            }),
        }
    }

    pub fn color_of(&self, region_id: &str) -> &str {
        self.colors
            .iter()
            .find(|c| c.id == region_id)
            .map(|c| c.color.as_str())
            .unwrap_or(UNCOLORED)
    }

    pub fn region_status(&self, region_id: &str) -> Option<bool> {
        if !self.props.show_answers {
            return None;
        }
        let region = self.data.regions.iter().find(|r| r.id == region_id)?;
        let expected = region.expected_color.as_deref()?;
        Some(self.color_of(region_id).eq_ignore_ascii_case(expected))
    }
}

impl Exercise for ColoringExercise {
    type Data = ColoringData;
    type Response = ColoringResponse;

    fn mount(data: ColoringData, mount: &Mount<'_>) -> Self {
        Self {
            data,
            props: mount.props,
            selected_color: PALETTE[0].to_string(),
            colors: Vec::new(),
        }
    }

    fn restore(&mut self, response: ColoringResponse) {
        self.colors = response.regions;
    }

    fn response(&self) -> ColoringResponse {
        ColoringResponse {
            regions: self.colors.clone(),
        }
    }

    fn score(&self) -> Option<Score> {
        Some(Score::from_checks(self.data.regions.iter().filter_map(|r| {
            r.expected_color
                .as_deref()
                .map(|expected| self.color_of(&r.id).eq_ignore_ascii_case(expected))
        })))
    }

    fn reset(&mut self) {
        self.colors.clear();
    }
}
