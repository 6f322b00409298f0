//! One authoring form per supported question type.

pub mod audio_reading;
pub mod completion;
pub mod drawing;
pub mod matching;
pub mod multiple_choice;
pub mod ordering;
pub mod puzzle;

pub use audio_reading::AudioReadingForm;
pub use completion::CompletionForm;
pub use drawing::DrawingForm;
pub use matching::MatchingForm;
pub use multiple_choice::MultipleChoiceForm;
pub use ordering::OrderingForm;
pub use puzzle::PuzzleForm;
