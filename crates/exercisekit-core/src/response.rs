//! The response contract.
//!
//! Every exercise type saves into the same [`Response`] envelope. The
//! `responseData` payload is type-dependent; the structs in this module are
//! the exact shapes each widget writes and reads back, so that a saved
//! response fed in again as the initial response reproduces the same state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::Point;

/// The learner's answer to one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Assigned by the persistence layer; empty for a response not yet stored.
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "submission_id")]
    pub submission_id: String,
    #[serde(default, alias = "question_id")]
    pub question_id: String,
    /// Type-dependent payload.
    #[serde(default, alias = "response_data")]
    pub response_data: Value,
    /// Local, advisory correctness. Never authoritative.
    #[serde(default, alias = "is_correct", skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl Response {
    /// A fresh envelope for a question, with no persistence identifiers.
    pub fn for_question(question_id: impl Into<String>, response_data: Value) -> Self {
        Self {
            id: String::new(),
            submission_id: String::new(),
            question_id: question_id.into(),
            response_data,
            is_correct: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-type payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchedPair {
    pub left_id: String,
    pub right_id: String,
}

/// `MATCHING`: `{ pairs: [{leftId, rightId}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingResponse {
    pub pairs: Vec<MatchedPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlankAnswer {
    pub blank_id: String,
    pub answer: String,
}

/// `COMPLETION`: `{ answers: [{blankId, answer}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionResponse {
    pub answers: Vec<BlankAnswer>,
}

/// `MULTIPLE_CHOICE`: `{ selectedOptions: [id] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleChoiceResponse {
    pub selected_options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderedItem {
    pub id: String,
    pub position: u32,
}

/// `ORDERING`: `{ orderedItems: [{id, position}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderingResponse {
    pub ordered_items: Vec<OrderedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortedItem {
    pub item_id: String,
    pub category_id: String,
}

/// `SORTING` / `CATEGORIZATION`: `{ sortedItems: [{itemId, categoryId}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortingResponse {
    pub sorted_items: Vec<SortedItem>,
}

/// `COUNTING`: `{ count, markers: [{x,y}], isCorrect }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountingResponse {
    pub count: u32,
    pub markers: Vec<Point>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifiedItem {
    pub id: String,
}

/// `IDENTIFICATION`: `{ identifiedItems: [{id}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentificationResponse {
    pub identified_items: Vec<IdentifiedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacedPiece {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub is_correct: bool,
}

/// `PUZZLE`: `{ pieces: [{id,x,y,isCorrect}], completionPercentage }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleResponse {
    pub pieces: Vec<PlacedPiece>,
    pub completion_percentage: u32,
}

/// `DRAWING`: `{ drawingData, completionPercentage }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingResponse {
    /// A data URI.
    pub drawing_data: String,
    pub completion_percentage: u32,
}

/// `TRACING` / `LETTER_TRACING`: `{ tracingData, completionPercentage, accuracy }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TracingResponse {
    /// A data URI.
    pub tracing_data: String,
    pub completion_percentage: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColoredRegion {
    pub id: String,
    pub color: String,
}

/// `COLORING`: `{ regions: [{id, color}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColoringResponse {
    pub regions: Vec<ColoredRegion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComprehensionAnswer {
    pub id: String,
    pub answer: String,
}

/// `AUDIO_READING`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioReadingResponse {
    /// Reference to the stored recording (URL or data URI).
    pub recorded_audio: Option<String>,
    pub answers: Vec<ComprehensionAnswer>,
    pub completion_percentage: u32,
    pub comprehension_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_serializes_camel_case_and_omits_unset_correctness() {
        let response = Response::for_question("q1", json!({ "selectedOptions": ["a"] }));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "id": "",
                "submissionId": "",
                "questionId": "q1",
                "responseData": { "selectedOptions": ["a"] }
            })
        );
    }

    #[test]
    fn envelope_accepts_snake_case() {
        let response: Response = serde_json::from_value(json!({
            "id": "r1",
            "submission_id": "s1",
            "question_id": "q1",
            "response_data": { "count": 3 },
            "is_correct": false
        }))
        .unwrap();
        assert_eq!(response.submission_id, "s1");
        assert_eq!(response.question_id, "q1");
        assert_eq!(response.is_correct, Some(false));
    }

    #[test]
    fn payload_shapes_match_the_wire_contract() {
        let matching = MatchingResponse {
            pairs: vec![MatchedPair {
                left_id: "1".into(),
                right_id: "2".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&matching).unwrap(),
            json!({ "pairs": [{ "leftId": "1", "rightId": "2" }] })
        );

        let counting = CountingResponse {
            count: 2,
            markers: vec![Point::new(1.0, 2.0)],
            is_correct: false,
        };
        assert_eq!(
            serde_json::to_value(&counting).unwrap(),
            json!({ "count": 2, "markers": [{ "x": 1.0, "y": 2.0 }], "isCorrect": false })
        );
    }

    #[test]
    fn partial_payloads_decode_with_defaults() {
        let audio: AudioReadingResponse =
            serde_json::from_value(json!({ "recordedAudio": "blob:1" })).unwrap();
        assert_eq!(audio.recorded_audio.as_deref(), Some("blob:1"));
        assert!(audio.answers.is_empty());
    }
}
