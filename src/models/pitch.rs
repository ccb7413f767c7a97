/// Pitch representations accepted by the ISiS score converter
///
/// ISiS only needs a (possibly fractional) MIDI note number per event,
/// so every variant knows how to reduce itself to one.
///
/// Western pitch names use lowercase letters and suffixes:
/// - Natural: c
/// - Sharp / double-sharp: cs / css
/// - Flat / double-flat: cf / cff
/// - Quarter-tone sharp / flat: cqs / cqf
///
/// followed by an optional octave (4 = middle C octave, the default).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Reference frequency of a4 in Hz
pub const CONCERT_PITCH: f64 = 440.0;

/// MIDI number of a4
const CONCERT_PITCH_MIDI: f64 = 69.0;

const DEFAULT_OCTAVE: i8 = 4;

static PITCH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-g])(ss|s|ff|f|qs|qf)?(-?\d+)?$").expect("pitch name pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PitchSpec", into = "PitchSpec")]
pub enum Pitch {
    /// MIDI note number, fractional values for microtones
    Midi(f64),
    /// Named pitch, e.g. name "fs" in octave 3
    Western { name: String, octave: i8 },
    /// Frequency in Hz
    Frequency(f64),
}

impl Pitch {
    /// Parse a western pitch name like "c", "fs3" or "bqf-1"
    pub fn parse(s: &str) -> Result<Pitch, String> {
        let captures = PITCH_NAME
            .captures(s.trim())
            .ok_or_else(|| format!("Invalid pitch name: '{}'", s))?;
        let letter = &captures[1];
        let accidental = captures.get(2).map_or("", |m| m.as_str());
        let octave = match captures.get(3) {
            Some(m) => m
                .as_str()
                .parse::<i8>()
                .map_err(|_| format!("Invalid octave in pitch name: '{}'", s))?,
            None => DEFAULT_OCTAVE,
        };
        Ok(Pitch::Western {
            name: format!("{}{}", letter, accidental),
            octave,
        })
    }

    pub fn midi_pitch_number(&self) -> f64 {
        match self {
            Pitch::Midi(number) => *number,
            Pitch::Western { name, octave } => western_to_midi(name, *octave),
            Pitch::Frequency(hz) => CONCERT_PITCH_MIDI + 12.0 * (hz / CONCERT_PITCH).log2(),
        }
    }
}

/// Convert a pitch class name and octave to a MIDI note number
///
/// MIDI note 0 = c-1, so c4 (middle C) = 60
fn western_to_midi(name: &str, octave: i8) -> f64 {
    let mut chars = name.chars();
    let base = match chars.next() {
        Some('c') => 0.0,
        Some('d') => 2.0,
        Some('e') => 4.0,
        Some('f') => 5.0,
        Some('g') => 7.0,
        Some('a') => 9.0,
        Some('b') => 11.0,
        _ => 0.0,
    };
    let alteration = match chars.as_str() {
        "s" => 1.0,
        "ss" => 2.0,
        "f" => -1.0,
        "ff" => -2.0,
        "qs" => 0.5,
        "qf" => -0.5,
        _ => 0.0,
    };
    base + alteration + (octave as f64 + 1.0) * 12.0
}

/// Wire shape: "fs3", 61.5 or {frequency: 440}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PitchSpec {
    Name(String),
    Midi(f64),
    Frequency { frequency: f64 },
}

impl TryFrom<PitchSpec> for Pitch {
    type Error = String;

    fn try_from(spec: PitchSpec) -> Result<Self, Self::Error> {
        match spec {
            PitchSpec::Name(name) => Pitch::parse(&name),
            PitchSpec::Midi(number) => Ok(Pitch::Midi(number)),
            PitchSpec::Frequency { frequency } if frequency > 0.0 => {
                Ok(Pitch::Frequency(frequency))
            }
            PitchSpec::Frequency { frequency } => {
                Err(format!("Frequency must be positive, got {}", frequency))
            }
        }
    }
}

impl From<Pitch> for PitchSpec {
    fn from(pitch: Pitch) -> Self {
        match pitch {
            Pitch::Midi(number) => PitchSpec::Midi(number),
            Pitch::Western { name, octave } => PitchSpec::Name(format!("{}{}", name, octave)),
            Pitch::Frequency(frequency) => PitchSpec::Frequency { frequency },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midi(name: &str) -> f64 {
        Pitch::parse(name).unwrap().midi_pitch_number()
    }

    #[test]
    fn test_default_octave_is_middle_c_octave() {
        assert_eq!(midi("c"), 60.0);
        assert_eq!(midi("a"), 69.0);
    }

    #[test]
    fn test_c_major_scale() {
        assert_eq!(midi("c4"), 60.0);
        assert_eq!(midi("d4"), 62.0);
        assert_eq!(midi("e4"), 64.0);
        assert_eq!(midi("f4"), 65.0);
        assert_eq!(midi("g4"), 67.0);
        assert_eq!(midi("a4"), 69.0);
        assert_eq!(midi("b4"), 71.0);
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(midi("cs4"), 61.0);
        assert_eq!(midi("df4"), 61.0); // enharmonic with cs
        assert_eq!(midi("css4"), 62.0);
        assert_eq!(midi("cff4"), 58.0);
        assert_eq!(midi("eqf4"), 63.5);
        assert_eq!(midi("eqs4"), 64.5);
    }

    #[test]
    fn test_octaves() {
        assert_eq!(midi("b3"), 59.0);
        assert_eq!(midi("c5"), 72.0);
        assert_eq!(midi("c-1"), 0.0);
    }

    #[test]
    fn test_invalid_names() {
        assert!(Pitch::parse("h4").is_err());
        assert!(Pitch::parse("C4").is_err());
        assert!(Pitch::parse("cx4").is_err());
        assert!(Pitch::parse("").is_err());
    }

    #[test]
    fn test_frequency_to_midi() {
        assert!((Pitch::Frequency(440.0).midi_pitch_number() - 69.0).abs() < 1e-9);
        assert!((Pitch::Frequency(880.0).midi_pitch_number() - 81.0).abs() < 1e-9);
        assert!((Pitch::Frequency(261.6256).midi_pitch_number() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_deserialize_variants() {
        let pitches: Vec<Pitch> =
            serde_json::from_str(r#"["fs3", 61.5, {"frequency": 440.0}]"#).unwrap();
        assert_eq!(
            pitches,
            vec![
                Pitch::Western { name: "fs".to_string(), octave: 3 },
                Pitch::Midi(61.5),
                Pitch::Frequency(440.0),
            ]
        );

        assert!(serde_json::from_str::<Pitch>(r#""q4""#).is_err());
        assert!(serde_json::from_str::<Pitch>(r#"{"frequency": -1.0}"#).is_err());
    }
}
