//! Reading event trees from YAML or JSON files
//!
//! ```yaml
//! type: sequential
//! events:
//!   - type: simple
//!     duration: 1/2
//!     pitch_list: [c4]
//!     volume: 0.8
//!     consonants: [l]
//!     vowel: a
//!   - type: simple
//!     duration: 1
//! ```

use std::fs;
use std::path::Path;

use crate::converters::isis::errors::{IsisError, Result};
use crate::models::{Event, NoteLike};

pub fn parse_events_yaml(yaml: &str) -> Result<Event<NoteLike>> {
    serde_yaml::from_str(yaml).map_err(|e| IsisError::Input(e.to_string()))
}

pub fn parse_events_json(json: &str) -> Result<Event<NoteLike>> {
    serde_json::from_str(json).map_err(|e| IsisError::Input(e.to_string()))
}

/// Load events, choosing the format from the file extension
pub fn load_events(path: impl AsRef<Path>) -> Result<Event<NoteLike>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    let parse: fn(&str) -> Result<Event<NoteLike>> = match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_events_yaml,
        Some("json") => parse_events_json,
        _ => {
            return Err(IsisError::Input(format!(
                "Unsupported event file {}: expected .yaml, .yml or .json",
                path.display()
            )))
        }
    };

    let text = fs::read_to_string(path).map_err(|e| IsisError::io(path, e))?;
    let event = parse(&text).map_err(|e| match e {
        IsisError::Input(message) => IsisError::Input(format!("{}: {}", path.display(), message)),
        other => other,
    })?;
    log::debug!("Loaded events from {}", path.display());
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, SimpleEvent};

    #[test]
    fn test_parse_yaml_sequence() {
        let yaml = r#"
type: sequential
events:
  - type: simple
    duration: 1/2
    pitch_list: [c4]
    volume: 0.8
    consonants: [l]
    vowel: a
  - type: simple
    duration: 1
"#;
        let event = parse_events_yaml(yaml).unwrap();
        assert_eq!(event.duration(), Duration::new(3, 2));
        let flat = event.flatten_monophonic().unwrap();
        assert_eq!(flat.len(), 2);
        assert!(!flat[0].is_rest());
        assert!(flat[1].is_rest());
        assert_eq!(flat[1].duration(), Duration::from_integer(1));
    }

    #[test]
    fn test_parse_json_simple() {
        let event =
            parse_events_json(r#"{"type": "simple", "duration": 2, "pitch_list": [60]}"#).unwrap();
        match event {
            Event::Simple(note) => assert_eq!(note.pitch_list[0].midi_pitch_number(), 60.0),
            other => panic!("Expected simple event, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            parse_events_yaml("type: chord\n"),
            Err(IsisError::Input(_))
        ));
        assert!(matches!(
            load_events("events.txt"),
            Err(IsisError::Input(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, r#"{"type": "simple", "duration": "3/4"}"#).unwrap();
        let event = load_events(&path).unwrap();
        assert_eq!(event.duration(), Duration::new(3, 4));
    }
}
