//! exercisekit-authoring — Teacher-facing question configuration forms.
//!
//! Each form edits the `questionData` of one question type and emits it in
//! exactly the shape the matching widget reads. Structural edits are emitted
//! at once; free-text edits go through a per-form [`debounce::Debouncer`].

pub mod debounce;
pub mod error;
pub mod form;
pub mod forms;
pub mod selector;

pub use debounce::Debouncer;
pub use error::FormError;
pub use form::{AuthoringForm, ChangeSink, Emitter, FormWarning};
pub use selector::{form_for, form_for_config, supports, AnyForm};
