//! ISiS converter
//!
//! Turns musical events into score files for the ISiS singing synthesizer
//! and renders them to sound files by calling the ISiS executable.

pub mod config;
pub mod converters;
pub mod input;
pub mod models;

// Re-export commonly used types
pub use config::IsisConfig;
pub use converters::isis::{
    EventToIsisScore, EventToSingingSynthesis, IsisError, IsisScore, Result, ScoreSettings,
};
pub use models::{Duration, Event, NoteLike, Pitch, SimpleEvent, Volume};
