//! Models module
//!
//! Event tree and the musical parameters (pitch, volume, phonemes)
//! the converters read from it.

pub mod event;
pub mod note_like;
pub mod pitch;
pub mod serde_helpers;
pub mod volume;

// Re-export commonly used types
pub use event::{Duration, Event, SimpleEvent};
pub use note_like::NoteLike;
pub use pitch::Pitch;
pub use volume::Volume;
