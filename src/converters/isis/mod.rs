//! ISiS singing synthesis frontend
//!
//! Converts monophonic event sequences to ISiS score files and renders
//! them with the ISiS command line (IRCAM Singing Synthesis), a
//! "command line application for singing synthesis that can be used to
//! generate singing signals by means of synthesizing them from melody
//! and lyrics".
//!
//! Two converters build on each other:
//! - [`EventToIsisScore`]: event → [`IsisScore`] → score file
//! - [`EventToSingingSynthesis`]: event → score file → ISiS → sound file

pub mod constants;
pub mod errors;
pub mod event_to_score;
pub mod score;
pub mod synthesis;

pub use constants::{SILENT_FLAG, XSAMPA};
pub use errors::{IsisError, Result};
pub use event_to_score::{EventToIsisScore, ScoreSettings};
pub use score::{IsisScore, Syllable};
pub use synthesis::EventToSingingSynthesis;
