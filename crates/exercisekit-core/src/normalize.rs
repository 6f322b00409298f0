//! Question normalization and typed payload decoding.
//!
//! Upstream question records arrive with mixed field casing (`questionText`
//! next to `question_text`) and loosely-shaped `questionData`. This module
//! is the single boundary where both are reconciled: [`normalize_question`]
//! produces the canonical camelCase view, and [`decode_question_data`]
//! turns the payload into a typed [`QuestionData`] with defined fallbacks.
//! Neither ever fails.

use serde_json::{Map, Value};

use crate::data::QuestionData;
use crate::model::{NormalizedQuestion, QuestionType};

/// Top-level fields reconciled by the normalizer, as (camelCase, snake_case).
pub const CASED_FIELDS: [(&str, &str); 9] = [
    ("questionType", "question_type"),
    ("questionText", "question_text"),
    ("questionData", "question_data"),
    ("questionOrder", "question_order"),
    ("audioInstructions", "audio_instructions"),
    ("hintText", "hint_text"),
    ("hintImageUrl", "hint_image_url"),
    ("feedbackCorrect", "feedback_correct"),
    ("feedbackIncorrect", "feedback_incorrect"),
];

/// Produce the canonical view of a raw question.
///
/// The camelCase field wins when both spellings are present; the snake_case
/// field is used only when the camelCase one is absent or null. Anything
/// that is not an object normalizes to an empty question.
pub fn normalize_question(raw: &Value) -> NormalizedQuestion {
    let Some(obj) = raw.as_object() else {
        return NormalizedQuestion::default();
    };

    let pick = |camel: &str, snake: &str| -> Option<&Value> {
        present(obj, camel).or_else(|| present(obj, snake))
    };
    let pick_string = |camel: &str, snake: &str| pick(camel, snake).and_then(scalar_string);

    let extra = obj
        .iter()
        .filter(|(key, _)| {
            key.as_str() != "id"
                && !CASED_FIELDS
                    .iter()
                    .any(|(camel, snake)| key == camel || key == snake)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    NormalizedQuestion {
        id: obj.get("id").and_then(scalar_string).unwrap_or_default(),
        question_type: pick_string("questionType", "question_type"),
        question_text: pick_string("questionText", "question_text"),
        question_data: pick("questionData", "question_data").cloned(),
        question_order: pick("questionOrder", "question_order").and_then(integer),
        audio_instructions: pick_string("audioInstructions", "audio_instructions"),
        hint_text: pick_string("hintText", "hint_text"),
        hint_image_url: pick_string("hintImageUrl", "hint_image_url"),
        feedback_correct: pick_string("feedbackCorrect", "feedback_correct"),
        feedback_incorrect: pick_string("feedbackIncorrect", "feedback_incorrect"),
        extra,
    }
}

/// Normalize every entry of a JSON array. Anything else yields an empty list.
pub fn normalize_questions(raw: &Value) -> Vec<NormalizedQuestion> {
    raw.as_array()
        .map(|items| items.iter().map(normalize_question).collect())
        .unwrap_or_default()
}

/// A field present in both casings with different values.
#[derive(Debug, Clone, PartialEq)]
pub struct CasingMismatch {
    pub camel: &'static str,
    pub snake: &'static str,
    pub camel_value: Value,
    pub snake_value: Value,
}

/// List the top-level fields whose two spellings disagree.
///
/// This is a data-quality signal for the debug overlay, not an error.
pub fn casing_mismatches(raw: &Value) -> Vec<CasingMismatch> {
    let Some(obj) = raw.as_object() else {
        return Vec::new();
    };
    CASED_FIELDS
        .iter()
        .filter_map(|&(camel, snake)| {
            let camel_value = present(obj, camel)?;
            let snake_value = present(obj, snake)?;
            (camel_value != snake_value).then(|| CasingMismatch {
                camel,
                snake,
                camel_value: camel_value.clone(),
                snake_value: snake_value.clone(),
            })
        })
        .collect()
}

/// A typed payload plus the repairs and fallbacks applied to get it.
#[derive(Debug, Clone)]
pub struct DecodedData {
    pub data: QuestionData,
    pub warnings: Vec<String>,
}

/// Decode `questionData` for a type tag.
///
/// Keys are converted to camelCase (camelCase wins on conflict) and nulls
/// are treated as absent. Known legacy shapes are repaired:
/// `choices` is read as `options` for multiple choice, ordering items
/// without an id get `item-{index}`, `letter` is read as `letterOrShape`,
/// and `categorizationCriteria` as `sortingCriteria`. A payload that still
/// does not decode falls back to the type's empty payload.
pub fn decode_question_data(kind: QuestionType, data: Option<&Value>) -> DecodedData {
    let mut warnings = Vec::new();

    let value = match data {
        None | Some(Value::Null) => {
            warnings.push("questionData is missing; using an empty payload".to_string());
            return DecodedData {
                data: QuestionData::empty(kind),
                warnings,
            };
        }
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) if parsed.is_object() => {
                warnings.push("questionData was a JSON string; decoded it".to_string());
                parsed
            }
            _ => {
                warnings.push("questionData is a string that is not a JSON object".to_string());
                return DecodedData {
                    data: QuestionData::empty(kind),
                    warnings,
                };
            }
        },
        Some(v) if v.is_object() => v.clone(),
        Some(_) => {
            warnings.push("questionData is not an object; using an empty payload".to_string());
            return DecodedData {
                data: QuestionData::empty(kind),
                warnings,
            };
        }
    };

    let mut value = camel_case_keys(value, &mut warnings);
    if let Value::Object(map) = &mut value {
        repair_legacy_shape(kind, map, &mut warnings);
    }

    let data = match QuestionData::from_value(kind, value) {
        Ok(data) => data,
        Err(e) => {
            warnings.push(format!(
                "questionData does not match the {kind} shape ({e}); using an empty payload"
            ));
            QuestionData::empty(kind)
        }
    };

    for (list, ids) in data.id_lists() {
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                warnings.push(format!("duplicate id in {list}: {id}"));
            }
        }
    }

    DecodedData { data, warnings }
}

/// A raw question after normalization and decoding.
#[derive(Debug, Clone)]
pub struct PreparedQuestion {
    pub question: NormalizedQuestion,
    /// `None` when the tag is absent or unknown.
    pub kind: Option<QuestionType>,
    /// Present exactly when `kind` is.
    pub data: Option<QuestionData>,
    pub warnings: Vec<String>,
}

/// Normalize a raw question and decode its payload, if its type is known.
pub fn prepare_question(raw: &Value) -> PreparedQuestion {
    let question = normalize_question(raw);
    let kind = question.kind();
    let mut warnings = Vec::new();

    let data = match kind {
        Some(kind) => {
            let decoded = decode_question_data(kind, question.question_data.as_ref());
            warnings.extend(decoded.warnings);
            Some(decoded.data)
        }
        None => {
            match &question.question_type {
                Some(tag) => warnings.push(format!("unknown question type: {tag}")),
                None => warnings.push("question has no type".to_string()),
            }
            None
        }
    };

    PreparedQuestion {
        question,
        kind,
        data,
        warnings,
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `hint_image_url` → `hintImageUrl`. Keys without an inner underscore are
/// returned unchanged.
fn camel_case(key: &str) -> String {
    if !key.contains('_') || key.starts_with('_') {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_case_keys(value: Value, warnings: &mut Vec<String>) -> Value {
    match value {
        Value::Object(map) => {
            let (snake, camel): (Vec<_>, Vec<_>) = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .partition(|(k, _)| camel_case(k) != *k);

            let mut out = Map::new();
            for (key, value) in camel {
                out.insert(key, camel_case_keys(value, warnings));
            }
            for (key, value) in snake {
                let canonical = camel_case(&key);
                let value = camel_case_keys(value, warnings);
                match out.get(&canonical) {
                    Some(existing) if *existing != value => warnings.push(format!(
                        "both {canonical} and {key} are set; using {canonical}"
                    )),
                    Some(_) => {}
                    None => {
                        out.insert(canonical, value);
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| camel_case_keys(item, warnings))
                .collect(),
        ),
        other => other,
    }
}

fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str, warnings: &mut Vec<String>) {
    if map.contains_key(to) {
        return;
    }
    if let Some(value) = map.remove(from) {
        warnings.push(format!("read legacy field {from} as {to}"));
        map.insert(to.to_string(), value);
    }
}

fn repair_legacy_shape(kind: QuestionType, map: &mut Map<String, Value>, warnings: &mut Vec<String>) {
    match kind.widget_kind() {
        QuestionType::MultipleChoice => rename_key(map, "choices", "options", warnings),
        QuestionType::Sorting => {
            rename_key(map, "categorizationCriteria", "sortingCriteria", warnings)
        }
        QuestionType::Tracing => rename_key(map, "letter", "letterOrShape", warnings),
        QuestionType::Ordering => {
            if let Some(Value::Array(items)) = map.get_mut("items") {
                for (index, item) in items.iter_mut().enumerate() {
                    let Value::Object(item) = item else { continue };
                    let missing = match item.get("id") {
                        None => true,
                        Some(Value::String(s)) => s.is_empty(),
                        Some(_) => false,
                    };
                    if missing {
                        warnings.push(format!("ordering item {index} has no id; using item-{index}"));
                        item.insert("id".to_string(), Value::String(format!("item-{index}")));
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MultipleChoiceData, OrderingData, QuestionPayload, TracingData};
    use serde_json::json;

    #[test]
    fn snake_case_fields_fill_missing_camel_case() {
        let q = normalize_question(&json!({
            "id": "q1",
            "question_type": "MATCHING",
            "question_text": "Match the animals",
            "question_data": { "pairs": [] },
            "hint_text": "Listen"
        }));
        assert_eq!(q.id, "q1");
        assert_eq!(q.question_type.as_deref(), Some("MATCHING"));
        assert_eq!(q.text(), "Match the animals");
        assert_eq!(q.question_data, Some(json!({ "pairs": [] })));
        assert_eq!(q.hint_text.as_deref(), Some("Listen"));
        assert!(q.extra.is_empty());
    }

    #[test]
    fn camel_case_wins_when_both_present() {
        let raw = json!({
            "id": 3,
            "questionText": "camel",
            "question_text": "snake",
            "questionType": null,
            "question_type": "COUNTING"
        });
        let q = normalize_question(&raw);
        assert_eq!(q.id, "3");
        assert_eq!(q.text(), "camel");
        assert_eq!(q.kind(), Some(QuestionType::Counting));

        let mismatches = casing_mismatches(&raw);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].camel, "questionText");
    }

    #[test]
    fn absent_fields_stay_absent() {
        let q = normalize_question(&json!({ "id": "q1" }));
        assert!(q.question_type.is_none());
        assert!(q.question_text.is_none());
        assert!(q.question_data.is_none());
        assert_eq!(normalize_question(&json!("not an object")), NormalizedQuestion::default());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "id": "q1",
            "question_type": "COMPLETION",
            "questionText": "Fill in",
            "question_data": { "text": "[blank1]", "blanks": [] },
            "question_order": 2,
            "assignment_id": "a1",
            "createdAt": "2026-01-01"
        });
        let once = normalize_question(&raw);
        let twice = normalize_question(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(once.question_order, Some(2));
        assert_eq!(once.extra.get("assignment_id"), Some(&json!("a1")));
    }

    #[test]
    fn normalize_questions_requires_an_array() {
        assert_eq!(normalize_questions(&json!([{ "id": "a" }, { "id": "b" }])).len(), 2);
        assert!(normalize_questions(&json!({ "id": "a" })).is_empty());
    }

    #[test]
    fn decode_reads_choices_as_options() {
        let decoded = decode_question_data(
            QuestionType::MultipleChoice,
            Some(&json!({
                "choices": [{ "id": "a", "text": "Paris", "is_correct": true }],
                "allow_multiple": false
            })),
        );
        let data = MultipleChoiceData::from_question_data(decoded.data).unwrap();
        assert_eq!(data.options.len(), 1);
        assert!(data.options[0].is_correct);
        assert!(decoded.warnings.iter().any(|w| w.contains("choices")));
    }

    #[test]
    fn decode_prefers_options_over_choices() {
        let decoded = decode_question_data(
            QuestionType::MultipleChoice,
            Some(&json!({
                "options": [{ "id": "a" }, { "id": "b" }],
                "choices": [{ "id": "z" }]
            })),
        );
        let data = MultipleChoiceData::from_question_data(decoded.data).unwrap();
        assert_eq!(data.options.len(), 2);
    }

    #[test]
    fn decode_fills_missing_ordering_ids() {
        let decoded = decode_question_data(
            QuestionType::Ordering,
            Some(&json!({ "items": [{ "text": "first" }, { "id": "b", "text": "second", "correctPosition": 1 }] })),
        );
        let data = OrderingData::from_question_data(decoded.data).unwrap();
        assert_eq!(data.items[0].id, "item-0");
        assert_eq!(data.items[0].correct_position, 0);
        assert_eq!(data.items[1].id, "b");
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn decode_reads_letter_for_letter_tracing() {
        let decoded = decode_question_data(
            QuestionType::LetterTracing,
            Some(&json!({ "letter": "A", "guide_points": [{ "x": 0.1, "y": 0.2 }] })),
        );
        let data = TracingData::from_question_data(decoded.data).unwrap();
        assert_eq!(data.letter_or_shape, "A");
        assert_eq!(data.guide_points.len(), 1);
        assert_eq!(data.canvas_width, 400);
    }

    #[test]
    fn malformed_payload_falls_back_to_empty() {
        let decoded = decode_question_data(QuestionType::Matching, Some(&json!({ "pairs": "nope" })));
        assert_eq!(decoded.data, QuestionData::empty(QuestionType::Matching));
        assert!(decoded.warnings[0].contains("does not match"));

        let decoded = decode_question_data(QuestionType::Counting, Some(&json!([1, 2])));
        assert_eq!(decoded.data, QuestionData::empty(QuestionType::Counting));

        let decoded = decode_question_data(QuestionType::Puzzle, None);
        assert_eq!(decoded.data, QuestionData::empty(QuestionType::Puzzle));
    }

    #[test]
    fn string_payload_is_parsed() {
        let decoded = decode_question_data(
            QuestionType::Counting,
            Some(&json!("{\"correct_count\": 5, \"max_count\": 10}")),
        );
        match decoded.data {
            QuestionData::Counting(d) => {
                assert_eq!(d.correct_count, 5);
                assert_eq!(d.max_count, 10);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn null_fields_use_defaults() {
        let decoded = decode_question_data(
            QuestionType::Coloring,
            Some(&json!({ "imageUrl": null, "regions": [{ "id": "r1", "name": "sky", "expectedColor": null }] })),
        );
        assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let decoded = decode_question_data(
            QuestionType::Matching,
            Some(&json!({ "pairs": [{ "id": "1" }, { "id": "1" }] })),
        );
        assert!(decoded.warnings.iter().any(|w| w == "duplicate id in pairs: 1"));
    }

    #[test]
    fn prepare_reports_unknown_types() {
        let prepared = prepare_question(&json!({ "id": "q", "questionType": "NOT_A_REAL_TYPE" }));
        assert!(prepared.kind.is_none());
        assert!(prepared.data.is_none());
        assert_eq!(prepared.warnings, vec!["unknown question type: NOT_A_REAL_TYPE"]);
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("hint_image_url"), "hintImageUrl");
        assert_eq!(camel_case("leftType"), "leftType");
        assert_eq!(camel_case("_private"), "_private");
    }
}
