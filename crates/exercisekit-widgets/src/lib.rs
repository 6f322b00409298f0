//! exercisekit-widgets — Answer-state machines for every exercise type.
//!
//! Each widget implements [`exercisekit_core::traits::Exercise`]. Use
//! [`standard_registry`] to get a dispatcher registry covering every
//! supported type tag.

pub mod audio_reading;
pub mod canvas;
pub mod coloring;
pub mod completion;
pub mod counting;
pub mod drawing;
pub mod identification;
pub mod matching;
pub mod multiple_choice;
pub mod ordering;
pub mod puzzle;
mod rng;
pub mod sorting;
pub mod trace;

use exercisekit_core::config::ExerciseConfig;
use exercisekit_core::dispatch::{Dispatcher, WidgetRegistry};
use exercisekit_core::model::QuestionType;

pub use audio_reading::{AudioReadingExercise, AudioRecorder};
pub use coloring::ColoringExercise;
pub use completion::CompletionExercise;
pub use counting::CountingExercise;
pub use drawing::DrawingExercise;
pub use identification::IdentificationExercise;
pub use matching::MatchingExercise;
pub use multiple_choice::MultipleChoiceExercise;
pub use ordering::OrderingExercise;
pub use puzzle::PuzzleExercise;
pub use sorting::SortingExercise;
pub use trace::TracingExercise;

/// A registry with every built-in widget.
pub fn standard_registry() -> WidgetRegistry {
    let mut registry = WidgetRegistry::new();
    registry
        .register::<MatchingExercise>(&[QuestionType::Matching])
        .register::<CompletionExercise>(&[QuestionType::Completion])
        .register::<MultipleChoiceExercise>(&[QuestionType::MultipleChoice])
        .register::<OrderingExercise>(&[QuestionType::Ordering])
        .register::<SortingExercise>(&[QuestionType::Sorting, QuestionType::Categorization])
        .register::<CountingExercise>(&[QuestionType::Counting])
        .register::<IdentificationExercise>(&[QuestionType::Identification])
        .register::<PuzzleExercise>(&[QuestionType::Puzzle])
        .register::<DrawingExercise>(&[QuestionType::Drawing])
        .register::<TracingExercise>(&[QuestionType::Tracing, QuestionType::LetterTracing])
        .register::<ColoringExercise>(&[QuestionType::Coloring])
        .register::<AudioReadingExercise>(&[QuestionType::AudioReading]);
    registry
}

/// A dispatcher over [`standard_registry`].
pub fn standard_dispatcher(config: &ExerciseConfig) -> Dispatcher {
    Dispatcher::new(standard_registry(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_tag_has_a_widget() {
        let registry = standard_registry();
        for tag in QuestionType::ALL {
            assert!(registry.contains(tag), "{tag} has no widget");
        }
    }
}
