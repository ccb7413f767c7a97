use serde::{Deserialize, Serialize};

use crate::models::event::{Duration, SimpleEvent};
use crate::models::pitch::Pitch;
use crate::models::serde_helpers::{deserialize_duration, serialize_duration};
use crate::models::volume::Volume;

/// A sung note: pitches, volume and the syllable sung on it
///
/// An empty `pitch_list` marks the event as a rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteLike {
    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub duration: Duration,

    #[serde(default)]
    pub pitch_list: Vec<Pitch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vowel: Option<String>,

    /// Consonants sung before the vowel
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consonants: Vec<String>,
}

impl NoteLike {
    pub fn new(
        pitch_list: Vec<Pitch>,
        duration: Duration,
        volume: Volume,
        consonants: &[&str],
        vowel: &str,
    ) -> Self {
        NoteLike {
            duration,
            pitch_list,
            volume: Some(volume),
            vowel: Some(vowel.to_string()),
            consonants: consonants.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn rest(duration: Duration) -> Self {
        NoteLike {
            duration,
            pitch_list: Vec::new(),
            volume: None,
            vowel: None,
            consonants: Vec::new(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch_list.is_empty()
    }
}

impl SimpleEvent for NoteLike {
    fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
duration: 3/2
pitch_list: [c4]
volume: 0.5
vowel: a
consonants: [t]
"#;
        let note: NoteLike = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(note.duration, Duration::new(3, 2));
        assert_eq!(note.pitch_list[0].midi_pitch_number(), 60.0);
        assert_eq!(note.volume, Some(Volume::Direct(0.5)));
        assert_eq!(note.vowel.as_deref(), Some("a"));
        assert_eq!(note.consonants, vec!["t".to_string()]);
        assert!(!note.is_rest());
    }

    #[test]
    fn test_rest_needs_only_duration() {
        let note: NoteLike = serde_json::from_str(r#"{"duration": 4}"#).unwrap();
        assert_eq!(note, NoteLike::rest(Duration::from_integer(4)));
        assert!(note.is_rest());
    }

    #[test]
    fn test_serialize_fractional_duration() {
        let json = serde_json::to_value(NoteLike::rest(Duration::new(1, 3))).unwrap();
        assert_eq!(json["duration"], "1/3");
        let json = serde_json::to_value(NoteLike::rest(Duration::from_integer(2))).unwrap();
        assert_eq!(json["duration"], 2);
    }
}
