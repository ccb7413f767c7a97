//! Event tree fed into the converters
//!
//! Events are either simple (a single sounding or silent event with a
//! duration) or containers. A sequential container plays its children one
//! after another, a simultaneous container plays them at the same time.

use crate::converters::isis::errors::{IsisError, Result};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};

/// Duration in beats
pub type Duration = Rational64;

/// Anything with a duration that can sit at a leaf of an [`Event`] tree
pub trait SimpleEvent {
    fn duration(&self) -> Duration;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event<T> {
    Simple(T),
    Sequential { events: Vec<Event<T>> },
    Simultaneous { events: Vec<Event<T>> },
}

impl<T: SimpleEvent> Event<T> {
    pub fn sequential(events: Vec<Event<T>>) -> Self {
        Event::Sequential { events }
    }

    pub fn simultaneous(events: Vec<Event<T>>) -> Self {
        Event::Simultaneous { events }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Event::Simple(event) => event.duration(),
            Event::Sequential { events } => events
                .iter()
                .fold(Duration::from_integer(0), |total, event| total + event.duration()),
            Event::Simultaneous { events } => events
                .iter()
                .map(Event::duration)
                .max()
                .unwrap_or_else(|| Duration::from_integer(0)),
        }
    }

    /// Simple events in playing order
    ///
    /// Fails on any simultaneous event: ISiS is a monophonic synthesizer
    /// and can't read multiple simultaneous voices.
    pub fn flatten_monophonic(&self) -> Result<Vec<&T>> {
        let mut out = Vec::new();
        self.collect_monophonic(&mut out)?;
        Ok(out)
    }

    fn collect_monophonic<'a>(&'a self, out: &mut Vec<&'a T>) -> Result<()> {
        match self {
            Event::Simple(event) => out.push(event),
            Event::Sequential { events } => {
                for event in events {
                    event.collect_monophonic(out)?;
                }
            }
            Event::Simultaneous { .. } => {
                return Err(IsisError::UnsupportedEvent(
                    "Can't convert simultaneous events to an ISiS score: \
                     ISiS is a monophonic synthesizer"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl<T> From<T> for Event<T> {
    fn from(event: T) -> Self {
        Event::Simple(event)
    }
}
