//! Typed `questionData` payloads.
//!
//! One struct per widget kind. Every field carries a default so that a
//! partially-authored payload still decodes; [`QuestionData`] is the tagged
//! union the normalizer produces once per question.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::model::QuestionType;

/// A point on an exercise surface.
///
/// Identification coordinates and tracing guide points are normalized to
/// `0.0..=1.0`; counting markers and puzzle pieces are in surface pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// How a matching side is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Text,
    Image,
}

/// Difficulty hint used by tracing and puzzle exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingPair {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub left: String,
    pub right: String,
    pub left_type: MediaKind,
    pub right_type: MediaKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingData {
    pub pairs: Vec<MatchingPair>,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blank {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// The expected answer.
    pub answer: String,
    /// Either the `N` of a `[blankN]` token or a character offset into the text.
    #[serde(deserialize_with = "lenient_u32")]
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionData {
    pub text: String,
    pub blanks: Vec<Blank>,
}

// ---------------------------------------------------------------------------
// Multiple choice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceOption {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleChoiceData {
    pub options: Vec<ChoiceOption>,
    pub allow_multiple: bool,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderingItem {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub text: String,
    /// Zero-based target position.
    #[serde(deserialize_with = "lenient_u32")]
    pub correct_position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderingData {
    pub items: Vec<OrderingItem>,
}

// ---------------------------------------------------------------------------
// Sorting / categorization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortCategory {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortItem {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub correct_category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortingData {
    pub categories: Vec<SortCategory>,
    pub items: Vec<SortItem>,
    pub sorting_criteria: String,
}

// ---------------------------------------------------------------------------
// Drawing / tracing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingData {
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub canvas_width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub canvas_height: u32,
}

impl Default for DrawingData {
    fn default() -> Self {
        Self {
            instructions: String::new(),
            background_image_url: None,
            canvas_width: 600,
            canvas_height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TracingData {
    /// The letter, digit, or shape name being traced.
    pub letter_or_shape: String,
    pub uppercase: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    /// Guide path, normalized to the canvas.
    pub guide_points: Vec<Point>,
    #[serde(deserialize_with = "lenient_u32")]
    pub canvas_width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub canvas_height: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub stroke_width: u32,
    pub difficulty: Difficulty,
}

impl Default for TracingData {
    fn default() -> Self {
        Self {
            letter_or_shape: String::new(),
            uppercase: true,
            background_image_url: None,
            guide_points: Vec::new(),
            canvas_width: 400,
            canvas_height: 400,
            stroke_width: 5,
            difficulty: Difficulty::Medium,
        }
    }
}

// ---------------------------------------------------------------------------
// Coloring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorRegion {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    /// Hex colour the region should end up with; `None` means any colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColoringData {
    pub image_url: String,
    pub regions: Vec<ColorRegion>,
}

// ---------------------------------------------------------------------------
// Audio reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComprehensionQuestion {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub question: String,
    /// Choices for a multiple-choice question; `None` for free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioReadingData {
    pub text: String,
    pub audio_url: String,
    pub highlight_words: bool,
    pub comprehension_questions: Vec<ComprehensionQuestion>,
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountingData {
    pub image_url: String,
    /// What the learner is counting, e.g. "apples".
    pub items_to_count: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub correct_count: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub min_count: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_count: u32,
    pub show_numbers: bool,
}

impl Default for CountingData {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            items_to_count: String::new(),
            correct_count: 0,
            min_count: 0,
            max_count: 20,
            show_numbers: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Identification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifiableItem {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    /// Normalized centre of the item on the image.
    pub coordinates: Point,
    /// Hit radius, in the same normalized units as `coordinates`.
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentificationData {
    pub image_url: String,
    pub items_to_identify: Vec<IdentifiableItem>,
}

// ---------------------------------------------------------------------------
// Puzzle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleData {
    pub image_url: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub pieces: u32,
    pub difficulty: Difficulty,
    pub preview_enabled: bool,
    /// Authoring-side record of pieces already placed in a preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_pieces: Option<Vec<String>>,
}

impl Default for PuzzleData {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            pieces: 9,
            difficulty: Difficulty::Medium,
            preview_enabled: true,
            correct_pieces: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// A decoded `questionData` payload, one variant per widget kind.
///
/// `SORTING` and `CATEGORIZATION` share [`QuestionData::Sorting`];
/// `TRACING` and `LETTER_TRACING` share [`QuestionData::Tracing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuestionData {
    Matching(MatchingData),
    Completion(CompletionData),
    MultipleChoice(MultipleChoiceData),
    Ordering(OrderingData),
    Sorting(SortingData),
    Drawing(DrawingData),
    Tracing(TracingData),
    Coloring(ColoringData),
    AudioReading(AudioReadingData),
    Counting(CountingData),
    Identification(IdentificationData),
    Puzzle(PuzzleData),
}

impl QuestionData {
    /// The empty payload for a type tag.
    pub fn empty(kind: QuestionType) -> Self {
        match kind.widget_kind() {
            QuestionType::Matching => QuestionData::Matching(Default::default()),
            QuestionType::Completion => QuestionData::Completion(Default::default()),
            QuestionType::MultipleChoice => QuestionData::MultipleChoice(Default::default()),
            QuestionType::Ordering => QuestionData::Ordering(Default::default()),
            QuestionType::Drawing => QuestionData::Drawing(Default::default()),
            QuestionType::Coloring => QuestionData::Coloring(Default::default()),
            QuestionType::AudioReading => QuestionData::AudioReading(Default::default()),
            QuestionType::Counting => QuestionData::Counting(Default::default()),
            QuestionType::Identification => QuestionData::Identification(Default::default()),
            QuestionType::Puzzle => QuestionData::Puzzle(Default::default()),
            QuestionType::Tracing | QuestionType::LetterTracing => {
                QuestionData::Tracing(Default::default())
            }
            QuestionType::Sorting | QuestionType::Categorization => {
                QuestionData::Sorting(Default::default())
            }
        }
    }

    /// Decode a payload that is already camelCase and repaired.
    pub fn from_value(kind: QuestionType, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind.widget_kind() {
            QuestionType::Matching => QuestionData::Matching(serde_json::from_value(value)?),
            QuestionType::Completion => QuestionData::Completion(serde_json::from_value(value)?),
            QuestionType::MultipleChoice => {
                QuestionData::MultipleChoice(serde_json::from_value(value)?)
            }
            QuestionType::Ordering => QuestionData::Ordering(serde_json::from_value(value)?),
            QuestionType::Drawing => QuestionData::Drawing(serde_json::from_value(value)?),
            QuestionType::Coloring => QuestionData::Coloring(serde_json::from_value(value)?),
            QuestionType::AudioReading => {
                QuestionData::AudioReading(serde_json::from_value(value)?)
            }
            QuestionType::Counting => QuestionData::Counting(serde_json::from_value(value)?),
            QuestionType::Identification => {
                QuestionData::Identification(serde_json::from_value(value)?)
            }
            QuestionType::Puzzle => QuestionData::Puzzle(serde_json::from_value(value)?),
            QuestionType::Tracing | QuestionType::LetterTracing => {
                QuestionData::Tracing(serde_json::from_value(value)?)
            }
            QuestionType::Sorting | QuestionType::Categorization => {
                QuestionData::Sorting(serde_json::from_value(value)?)
            }
        })
    }

    /// The widget kind this payload feeds.
    pub fn kind(&self) -> QuestionType {
        match self {
            QuestionData::Matching(_) => QuestionType::Matching,
            QuestionData::Completion(_) => QuestionType::Completion,
            QuestionData::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionData::Ordering(_) => QuestionType::Ordering,
            QuestionData::Sorting(_) => QuestionType::Sorting,
            QuestionData::Drawing(_) => QuestionType::Drawing,
            QuestionData::Tracing(_) => QuestionType::Tracing,
            QuestionData::Coloring(_) => QuestionType::Coloring,
            QuestionData::AudioReading(_) => QuestionType::AudioReading,
            QuestionData::Counting(_) => QuestionType::Counting,
            QuestionData::Identification(_) => QuestionType::Identification,
            QuestionData::Puzzle(_) => QuestionType::Puzzle,
        }
    }

    /// Identifier lists that must be unique, keyed by a label for messages.
    pub fn id_lists(&self) -> Vec<(&'static str, Vec<&str>)> {
        fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<&str> {
            items.iter().map(id).collect()
        }
        match self {
            QuestionData::Matching(d) => vec![("pairs", ids(&d.pairs, |p| p.id.as_str()))],
            QuestionData::Completion(d) => vec![("blanks", ids(&d.blanks, |b| b.id.as_str()))],
            QuestionData::MultipleChoice(d) => vec![("options", ids(&d.options, |o| o.id.as_str()))],
            QuestionData::Ordering(d) => vec![("items", ids(&d.items, |i| i.id.as_str()))],
            QuestionData::Sorting(d) => vec![
                ("categories", ids(&d.categories, |c| c.id.as_str())),
                ("items", ids(&d.items, |i| i.id.as_str())),
            ],
            QuestionData::Coloring(d) => vec![("regions", ids(&d.regions, |r| r.id.as_str()))],
            QuestionData::AudioReading(d) => vec![(
                "comprehensionQuestions",
                ids(&d.comprehension_questions, |q| q.id.as_str()),
            )],
            QuestionData::Identification(d) => vec![(
                "itemsToIdentify",
                ids(&d.items_to_identify, |i| i.id.as_str()),
            )],
            QuestionData::Drawing(_)
            | QuestionData::Tracing(_)
            | QuestionData::Counting(_)
            | QuestionData::Puzzle(_) => Vec::new(),
        }
    }

    /// Serialize back to the camelCase wire shape.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A payload struct that can be pulled out of [`QuestionData`].
pub trait QuestionPayload: Sized + Default + Clone + Serialize + DeserializeOwned {
    /// The widget kind this payload belongs to.
    const KIND: QuestionType;

    fn from_question_data(data: QuestionData) -> Option<Self>;

    fn into_question_data(self) -> QuestionData;
}

macro_rules! question_payload {
    ($ty:ty, $variant:ident) => {
        impl QuestionPayload for $ty {
            const KIND: QuestionType = QuestionType::$variant;

            fn from_question_data(data: QuestionData) -> Option<Self> {
                match data {
                    QuestionData::$variant(d) => Some(d),
                    _ => None,
                }
            }

            fn into_question_data(self) -> QuestionData {
                QuestionData::$variant(self)
            }
        }
    };
}

question_payload!(MatchingData, Matching);
question_payload!(CompletionData, Completion);
question_payload!(MultipleChoiceData, MultipleChoice);
question_payload!(OrderingData, Ordering);
question_payload!(SortingData, Sorting);
question_payload!(DrawingData, Drawing);
question_payload!(TracingData, Tracing);
question_payload!(ColoringData, Coloring);
question_payload!(AudioReadingData, AudioReading);
question_payload!(CountingData, Counting);
question_payload!(IdentificationData, Identification);
question_payload!(PuzzleData, Puzzle);

// ---------------------------------------------------------------------------
// Lenient scalar decoding
// ---------------------------------------------------------------------------

/// Accept a string, number, bool, or null where an identifier is expected.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string identifier, found {other}"
        ))),
    }
}

/// Accept a non-negative integer, a float (rounded), or a numeric string.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => Ok(n.round() as u32),
        _ => Err(de::Error::custom(format!(
            "expected a non-negative number, found {value}"
        ))),
    }
}
