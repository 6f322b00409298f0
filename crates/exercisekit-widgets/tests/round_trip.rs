//! Saved responses restore the widget state they were saved from.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use exercisekit_core::config::ExerciseConfig;
use exercisekit_core::data::Point;
use exercisekit_core::dispatch::{DispatchProps, Dispatcher, MountedExercise, SaveOutcome};
use exercisekit_core::grading::grade_submission;
use exercisekit_core::model::Submission;
use exercisekit_core::response::Response;
use exercisekit_core::scoring::{OutcomeStatus, Score, SubmissionSummary};
use exercisekit_widgets::*;

fn dispatcher() -> Dispatcher {
    let config = ExerciseConfig {
        shuffle_seed: Some(42),
        ..Default::default()
    };
    standard_dispatcher(&config)
}

fn mount(raw: &Value, props: DispatchProps) -> MountedExercise {
    dispatcher()
        .dispatch(raw, props)
        .into_exercise()
        .expect("question should mount")
}

/// Save, restore into a fresh widget, and check the payload survives.
fn assert_round_trip(raw: &Value, mounted: &mut MountedExercise) -> Response {
    let SaveOutcome::Saved(saved) = mounted.save() else {
        panic!("save refused for {}", raw["questionType"]);
    };
    let restored = mount(raw, DispatchProps::default().initial_response(saved.clone()));
    assert_eq!(
        restored.response_data().unwrap(),
        saved.response_data,
        "{}",
        raw["questionType"]
    );
    saved
}

#[test]
fn matching_round_trip() {
    let raw = json!({
        "id": "m1",
        "questionType": "MATCHING",
        "questionData": { "pairs": [
            { "id": "1", "left": "Dog", "right": "Woof" },
            { "id": "2", "left": "Cat", "right": "Meow" }
        ] }
    });
    let mut mounted = mount(&raw, DispatchProps::default());
    let ex = mounted.downcast_mut::<MatchingExercise>().unwrap();
    ex.select_left("1");
    ex.select_right("2");
    ex.select_left("2");
    ex.select_right("1");
    let saved = assert_round_trip(&raw, &mut mounted);
    assert_eq!(
        saved.response_data,
        json!({ "pairs": [
            { "leftId": "1", "rightId": "2" },
            { "leftId": "2", "rightId": "1" }
        ] })
    );
}

#[test]
fn completion_round_trip_and_single_save() {
    let raw = json!({
        "id": "c1",
        "question_type": "COMPLETION",
        "question_data": {
            "text": "[blank1] is the capital of [blank2].",
            "blanks": [
                { "id": "b1", "answer": "Paris", "position": 1 },
                { "id": "b2", "answer": "France", "position": 2 }
            ]
        }
    });
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let mut mounted = mount(
        &raw,
        DispatchProps::default().on_save(move |r| sink.lock().unwrap().push(r)),
    );

    mounted
        .downcast_mut::<CompletionExercise>()
        .unwrap()
        .set_answer("b1", "paris");
    assert!(matches!(mounted.save(), SaveOutcome::Rejected(_)));
    assert!(calls.lock().unwrap().is_empty());

    mounted
        .downcast_mut::<CompletionExercise>()
        .unwrap()
        .set_answer("b2", "France");
    let saved = assert_round_trip(&raw, &mut mounted);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let answers = saved.response_data["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 2);
}

#[test]
fn choice_ordering_and_sorting_round_trip() {
    let mc = json!({
        "id": "mc",
        "questionType": "MULTIPLE_CHOICE",
        "questionData": { "allowMultiple": true, "options": [
            { "id": "a", "text": "2", "isCorrect": true },
            { "id": "b", "text": "3", "isCorrect": true },
            { "id": "c", "text": "4", "isCorrect": false }
        ] }
    });
    let mut mounted = mount(&mc, DispatchProps::default());
    let ex = mounted.downcast_mut::<MultipleChoiceExercise>().unwrap();
    ex.select("a");
    ex.select("b");
    assert_round_trip(&mc, &mut mounted);

    let ordering = json!({
        "id": "o",
        "questionType": "ORDERING",
        "questionData": { "items": [
            { "id": "x", "text": "one", "correctPosition": 0 },
            { "id": "y", "text": "two", "correctPosition": 1 },
            { "id": "z", "text": "three", "correctPosition": 2 }
        ] }
    });
    let mut mounted = mount(&ordering, DispatchProps::default());
    mounted
        .downcast_mut::<OrderingExercise>()
        .unwrap()
        .move_item(2, 0);
    assert_round_trip(&ordering, &mut mounted);

    let sorting = json!({
        "id": "s",
        "questionType": "CATEGORIZATION",
        "questionData": {
            "categories": [{ "id": "fruit", "name": "Fruit" }, { "id": "veg", "name": "Veg" }],
            "items": [
                { "id": "apple", "name": "Apple", "correctCategoryId": "fruit" },
                { "id": "leek", "name": "Leek", "correct_category_id": "veg" }
            ]
        }
    });
    let mut mounted = mount(&sorting, DispatchProps::default());
    let ex = mounted.downcast_mut::<SortingExercise>().unwrap();
    ex.place("apple", Some("fruit"));
    ex.place("leek", Some("fruit"));
    assert_round_trip(&sorting, &mut mounted);
}

#[test]
fn counting_scenario() {
    let raw = json!({
        "id": "n",
        "questionType": "COUNTING",
        "questionData": { "correctCount": 5, "minCount": 0, "maxCount": 10 }
    });
    let mut mounted = mount(&raw, DispatchProps::default());
    let ex = mounted.downcast_mut::<CountingExercise>().unwrap();
    for _ in 0..5 {
        ex.increment();
    }
    let saved = assert_round_trip(&raw, &mut mounted);
    assert_eq!(saved.response_data["isCorrect"], json!(true));
    assert_eq!(saved.is_correct, Some(true));
}

#[test]
fn spatial_widgets_round_trip() {
    let identification = json!({
        "id": "i",
        "questionType": "IDENTIFICATION",
        "questionData": { "imageUrl": "farm.png", "itemsToIdentify": [
            { "id": "cow", "name": "Cow", "coordinates": { "x": 0.2, "y": 0.2 }, "radius": 0.1 }
        ] }
    });
    let mut mounted = mount(&identification, DispatchProps::default());
    let ex = mounted.downcast_mut::<IdentificationExercise>().unwrap();
    ex.select("cow");
    ex.click(Point::new(0.21, 0.2));
    assert_round_trip(&identification, &mut mounted);

    let puzzle = json!({
        "id": "p",
        "questionType": "PUZZLE",
        "questionData": { "imageUrl": "cat.png", "pieces": 4 }
    });
    let mut mounted = mount(&puzzle, DispatchProps::default());
    mounted
        .downcast_mut::<PuzzleExercise>()
        .unwrap()
        .show_solution();
    let saved = assert_round_trip(&puzzle, &mut mounted);
    assert_eq!(saved.response_data["completionPercentage"], json!(100));

    let coloring = json!({
        "id": "col",
        "questionType": "COLORING",
        "questionData": { "imageUrl": "house.svg", "regions": [{ "id": "roof", "name": "Roof" }] }
    });
    let mut mounted = mount(&coloring, DispatchProps::default());
    mounted
        .downcast_mut::<ColoringExercise>()
        .unwrap()
        .paint("roof");
    assert_round_trip(&coloring, &mut mounted);
}

#[test]
fn canvas_widgets_round_trip() {
    for tag in ["DRAWING", "TRACING", "LETTER_TRACING"] {
        let raw = json!({
            "id": tag,
            "questionType": tag,
            "questionData": { "guidePoints": [{ "x": 0.5, "y": 0.1 }, { "x": 0.5, "y": 0.9 }] }
        });
        let mut mounted = mount(&raw, DispatchProps::default());
        if let Some(ex) = mounted.downcast_mut::<DrawingExercise>() {
            ex.begin_stroke(Point::new(10.0, 10.0));
            ex.extend_stroke(Point::new(50.0, 50.0));
            ex.end_stroke();
        } else {
            let ex = mounted.downcast_mut::<TracingExercise>().unwrap();
            ex.begin_stroke(Point::new(200.0, 40.0));
            ex.extend_stroke(Point::new(200.0, 360.0));
            ex.end_stroke();
        }
        let saved = assert_round_trip(&raw, &mut mounted);
        assert_eq!(saved.response_data["completionPercentage"], json!(100), "{tag}");
    }
}

#[test]
fn audio_reading_round_trip() {
    let raw = json!({
        "id": "a",
        "questionType": "AUDIO_READING",
        "questionData": {
            "text": "The cat sat.",
            "comprehensionQuestions": [{ "id": "q1", "question": "Who sat?", "correctAnswer": "cat" }]
        }
    });
    let mut mounted = mount(&raw, DispatchProps::default());
    mounted
        .downcast_mut::<AudioReadingExercise>()
        .unwrap()
        .set_answer("q1", "Cat");
    let saved = assert_round_trip(&raw, &mut mounted);
    assert_eq!(saved.response_data["comprehensionScore"], json!(100));
}

#[test]
fn grading_replays_saved_responses() {
    let questions = vec![
        json!({
            "id": "m1",
            "questionType": "MATCHING",
            "questionData": { "pairs": [
                { "id": "1", "left": "Dog", "right": "Woof" },
                { "id": "2", "left": "Cat", "right": "Meow" }
            ] }
        }),
        json!({
            "id": "n1",
            "questionType": "COUNTING",
            "questionData": { "correctCount": 3 }
        }),
        json!({ "id": "mc1", "questionType": "MULTIPLE_CHOICE", "questionData": {
            "options": [{ "id": "a", "isCorrect": true }, { "id": "b" }]
        } }),
        json!({ "id": "x1", "questionType": "NOT_A_REAL_TYPE" }),
    ];
    let submission: Submission = serde_json::from_value(json!({
        "id": "s1",
        "startedAt": "2026-03-01T09:00:00Z",
        "responses": [
            { "questionId": "m1", "responseData": { "pairs": [{ "leftId": "1", "rightId": "1" }] } },
            { "questionId": "n1", "responseData": { "count": 3 } }
        ]
    }))
    .unwrap();

    let outcomes = grade_submission(&dispatcher(), &questions, &submission);
    let statuses: Vec<OutcomeStatus> = outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            OutcomeStatus::Incomplete,
            OutcomeStatus::Answered,
            OutcomeStatus::Unanswered,
            OutcomeStatus::Unsupported
        ]
    );
    assert_eq!(
        outcomes[0].notice.as_deref(),
        Some("Please match all items before saving")
    );
    assert_eq!(outcomes[0].score, Some(Score::new(1, 2)));
    assert_eq!(outcomes[1].is_correct, Some(true));
    assert_eq!(outcomes[2].score, Some(Score::new(0, 1)));

    let summary = SubmissionSummary::from_outcomes(&outcomes);
    assert_eq!(summary.points, Score::new(2, 4));
    assert_eq!(summary.percentage, 50);
    assert_eq!(summary.unsupported, 1);
}
