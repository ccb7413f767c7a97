//! Event → ISiS score conversion
//!
//! The converter is generic over the simple event type. Five functions
//! pull what ISiS needs out of each simple event: pitch, volume, vowel,
//! consonants and whether the event is a rest. An extractor returning
//! `None` means the event lacks that attribute and is treated as a rest.
//!
//! # Usage
//! ```rust,ignore
//! use isis_converter::{Event, EventToIsisScore, NoteLike};
//!
//! let converter = EventToIsisScore::<NoteLike>::default();
//! let score = converter.convert(&Event::sequential(notes))?;
//! score.write("song.isis_score", 5)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::errors::{IsisError, Result};
use super::score::{IsisScore, Syllable};
use crate::models::{Duration, Event, NoteLike, Pitch, SimpleEvent, Volume};

pub type PitchExtractor<T> = Box<dyn Fn(&T) -> Option<Pitch> + Send + Sync>;
pub type VolumeExtractor<T> = Box<dyn Fn(&T) -> Option<Volume> + Send + Sync>;
pub type VowelExtractor<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;
pub type ConsonantsExtractor<T> = Box<dyn Fn(&T) -> Option<Vec<String>> + Send + Sync>;
pub type RestPredicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Global score parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    /// Tempo in beats per minute
    pub tempo: f64,

    /// Transposition of all notes in MIDI semitones
    pub global_transposition: i32,

    /// Overall loudness ISiS applies to the sentence (0.0 - 1.0)
    pub default_sentence_loudness: Option<f64>,

    /// How many events are written per line of the score file
    pub n_events_per_line: usize,

    /// Reject consonants and vowels missing from XSAMPA
    pub validate_phonemes: bool,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO_BPM,
            global_transposition: DEFAULT_GLOBAL_TRANSPOSITION,
            default_sentence_loudness: None,
            n_events_per_line: DEFAULT_N_EVENTS_PER_LINE,
            validate_phonemes: false,
        }
    }
}

impl ScoreSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(IsisError::InvalidSettings(format!(
                "tempo must be a positive number, got {}",
                self.tempo
            )));
        }
        if self.n_events_per_line == 0 {
            return Err(IsisError::InvalidSettings(
                "n_events_per_line must be at least 1".to_string(),
            ));
        }
        if let Some(loudness) = self.default_sentence_loudness {
            if !(0.0..=1.0).contains(&loudness) {
                return Err(IsisError::InvalidSettings(format!(
                    "default_sentence_loudness must be within 0.0 - 1.0, got {}",
                    loudness
                )));
            }
        }
        Ok(())
    }
}

/// Everything ISiS needs to know about one event
#[derive(Debug, Clone, PartialEq)]
struct ExtractedData {
    /// Position of the (first) simple event this came from
    index: usize,
    /// Set when the event is sung as a rest, whatever its syllable says
    rest: bool,
    duration: Duration,
    syllable: Syllable,
    midi_pitch: f64,
    amplitude: f64,
}

impl ExtractedData {
    fn rest(index: usize, duration: Duration) -> Self {
        ExtractedData {
            index,
            rest: true,
            duration,
            syllable: Syllable::rest(),
            midi_pitch: 0.0,
            amplitude: 0.0,
        }
    }
}

/// Converts events to [`IsisScore`]s
pub struct EventToIsisScore<T> {
    simple_event_to_pitch: PitchExtractor<T>,
    simple_event_to_volume: VolumeExtractor<T>,
    simple_event_to_vowel: VowelExtractor<T>,
    simple_event_to_consonants: ConsonantsExtractor<T>,
    is_simple_event_rest: RestPredicate<T>,
    settings: ScoreSettings,
}

impl EventToIsisScore<NoteLike> {
    /// Converter reading the attributes of [`NoteLike`] events
    pub fn new(settings: ScoreSettings) -> Self {
        EventToIsisScore::with_extractors(
            Box::new(|note: &NoteLike| note.pitch_list.first().cloned()),
            Box::new(|note: &NoteLike| note.volume),
            Box::new(|note: &NoteLike| note.vowel.clone()),
            Box::new(|note: &NoteLike| Some(note.consonants.clone())),
            Box::new(NoteLike::is_rest),
            settings,
        )
    }
}

impl Default for EventToIsisScore<NoteLike> {
    fn default() -> Self {
        EventToIsisScore::new(ScoreSettings::default())
    }
}

impl<T: SimpleEvent> EventToIsisScore<T> {
    pub fn with_extractors(
        simple_event_to_pitch: PitchExtractor<T>,
        simple_event_to_volume: VolumeExtractor<T>,
        simple_event_to_vowel: VowelExtractor<T>,
        simple_event_to_consonants: ConsonantsExtractor<T>,
        is_simple_event_rest: RestPredicate<T>,
        settings: ScoreSettings,
    ) -> Self {
        EventToIsisScore {
            simple_event_to_pitch,
            simple_event_to_volume,
            simple_event_to_vowel,
            simple_event_to_consonants,
            is_simple_event_rest,
            settings,
        }
    }

    pub fn with_pitch_extractor(
        mut self,
        f: impl Fn(&T) -> Option<Pitch> + Send + Sync + 'static,
    ) -> Self {
        self.simple_event_to_pitch = Box::new(f);
        self
    }

    pub fn with_volume_extractor(
        mut self,
        f: impl Fn(&T) -> Option<Volume> + Send + Sync + 'static,
    ) -> Self {
        self.simple_event_to_volume = Box::new(f);
        self
    }

    pub fn with_vowel_extractor(
        mut self,
        f: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.simple_event_to_vowel = Box::new(f);
        self
    }

    pub fn with_consonants_extractor(
        mut self,
        f: impl Fn(&T) -> Option<Vec<String>> + Send + Sync + 'static,
    ) -> Self {
        self.simple_event_to_consonants = Box::new(f);
        self
    }

    pub fn with_rest_predicate(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.is_simple_event_rest = Box::new(f);
        self
    }

    pub fn settings(&self) -> &ScoreSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ScoreSettings {
        &mut self.settings
    }

    /// Convert an event to an ISiS score
    ///
    /// Adjacent rests are tied into a single rest because ISiS can't
    /// handle two sequential rests.
    pub fn convert(&self, event: &Event<T>) -> Result<IsisScore> {
        self.settings.validate()?;

        let simple_events = event.flatten_monophonic()?;
        if simple_events.is_empty() {
            return Err(IsisError::EmptyEvent);
        }

        let mut extracted: Vec<ExtractedData> = Vec::with_capacity(simple_events.len());
        for (index, simple_event) in simple_events.into_iter().enumerate() {
            let data = self.extract(index, simple_event);
            if data.rest {
                if let Some(previous) = extracted.last_mut().filter(|previous| previous.rest) {
                    previous.duration += data.duration;
                    continue;
                }
            }
            extracted.push(data);
        }

        if self.settings.validate_phonemes {
            validate_phonemes(&extracted)?;
        }

        log::debug!(
            "Extracted {} ISiS events ({} rests)",
            extracted.len(),
            extracted.iter().filter(|data| data.rest).count()
        );

        Ok(IsisScore {
            syllables: extracted.iter().map(|data| data.syllable.clone()).collect(),
            midi_notes: extracted.iter().map(|data| data.midi_pitch).collect(),
            rhythm: extracted
                .iter()
                .map(|data| duration_to_beats(data.duration))
                .collect(),
            loud_accents: extracted.iter().map(|data| data.amplitude).collect(),
            tempo: self.settings.tempo,
            global_transposition: self.settings.global_transposition,
            default_sentence_loudness: self.settings.default_sentence_loudness,
        })
    }

    /// Convert an event and write the score file to `path`
    pub fn convert_to_file(&self, event: &Event<T>, path: impl AsRef<Path>) -> Result<IsisScore> {
        let score = self.convert(event)?;
        score.write(path, self.settings.n_events_per_line)?;
        Ok(score)
    }

    fn extract(&self, index: usize, simple_event: &T) -> ExtractedData {
        let duration = simple_event.duration();
        if (self.is_simple_event_rest)(simple_event) {
            return ExtractedData::rest(index, duration);
        }
        self.extract_sounding(index, simple_event, duration)
            .unwrap_or_else(|| ExtractedData::rest(index, duration))
    }

    fn extract_sounding(
        &self,
        index: usize,
        simple_event: &T,
        duration: Duration,
    ) -> Option<ExtractedData> {
        let consonants = (self.simple_event_to_consonants)(simple_event)?;
        // An empty vowel has nothing to sing
        let vowel = (self.simple_event_to_vowel)(simple_event).filter(|v| !v.trim().is_empty())?;
        let pitch = (self.simple_event_to_pitch)(simple_event)?;
        let volume = (self.simple_event_to_volume)(simple_event)?;
        Some(ExtractedData {
            index,
            rest: false,
            duration,
            syllable: Syllable { consonants, vowel },
            midi_pitch: pitch.midi_pitch_number(),
            amplitude: volume.amplitude(),
        })
    }
}

/// Reported indices refer to the flattened simple events, before tying
fn validate_phonemes(extracted: &[ExtractedData]) -> Result<()> {
    for data in extracted {
        let syllable = &data.syllable;
        for phoneme in syllable.consonants.iter().chain(std::iter::once(&syllable.vowel)) {
            if !is_supported_phoneme(phoneme) {
                return Err(IsisError::UnsupportedPhoneme {
                    phoneme: phoneme.clone(),
                    event_index: data.index,
                });
            }
        }
    }
    Ok(())
}

fn duration_to_beats(duration: Duration) -> f64 {
    *duration.numer() as f64 / *duration.denom() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(duration: i64, volume: f64, consonants: &[&str], vowel: &str) -> Event<NoteLike> {
        NoteLike::new(
            vec![Pitch::Midi(60.0)],
            Duration::from_integer(duration),
            Volume::Direct(volume),
            consonants,
            vowel,
        )
        .into()
    }

    fn rest(duration: i64) -> Event<NoteLike> {
        NoteLike::rest(Duration::from_integer(duration)).into()
    }

    #[test]
    fn test_default_settings() {
        let settings = ScoreSettings::default();
        assert_eq!(settings.tempo, 60.0);
        assert_eq!(settings.global_transposition, 0);
        assert_eq!(settings.n_events_per_line, 5);
        assert!(settings.default_sentence_loudness.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        for settings in [
            ScoreSettings { tempo: 0.0, ..Default::default() },
            ScoreSettings { tempo: f64::NAN, ..Default::default() },
            ScoreSettings { n_events_per_line: 0, ..Default::default() },
            ScoreSettings { default_sentence_loudness: Some(1.5), ..Default::default() },
        ] {
            let converter = EventToIsisScore::new(settings);
            assert!(matches!(
                converter.convert(&note(1, 1.0, &[], "a")),
                Err(IsisError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn test_adjacent_rests_are_tied() {
        let event = Event::sequential(vec![
            rest(1),
            rest(2),
            note(1, 0.5, &["l"], "a"),
            rest(3),
            rest(1),
            rest(1),
        ]);
        let score = EventToIsisScore::<NoteLike>::default().convert(&event).unwrap();
        assert_eq!(score.rhythm, vec![3.0, 1.0, 5.0]);
        assert_eq!(score.midi_notes, vec![0.0, 60.0, 0.0]);
        assert_eq!(score.loud_accents, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_missing_attribute_becomes_rest() {
        let mut without_vowel = NoteLike::rest(Duration::from_integer(2));
        without_vowel.pitch_list.push(Pitch::Midi(62.0));
        without_vowel.volume = Some(Volume::Direct(1.0));

        let event = Event::sequential(vec![rest(1), without_vowel.into()]);
        let score = EventToIsisScore::<NoteLike>::default().convert(&event).unwrap();

        // Both count as rests and get tied
        assert_eq!(score.len(), 1);
        assert_eq!(score.rhythm, vec![3.0]);
        assert!(score.syllables[0].is_rest());
    }

    #[test]
    fn test_custom_extractors() {
        let converter = EventToIsisScore::<NoteLike>::default()
            .with_pitch_extractor(|_| Some(Pitch::Midi(48.0)))
            .with_volume_extractor(|_| Some(Volume::MidiVelocity(127)))
            .with_vowel_extractor(|_| Some("o".to_string()))
            .with_consonants_extractor(|_| Some(vec!["m".to_string()]))
            .with_rest_predicate(|_| false);

        let score = converter.convert(&rest(2)).unwrap();
        assert_eq!(score.syllables, vec![Syllable { consonants: vec!["m".to_string()], vowel: "o".to_string() }]);
        assert_eq!(score.midi_notes, vec![48.0]);
        assert_eq!(score.loud_accents, vec![1.0]);
    }

    #[test]
    fn test_fractional_durations() {
        let third = |n| -> Event<NoteLike> { NoteLike::rest(Duration::new(n, 3)).into() };
        let event = Event::sequential(vec![third(1), third(1), third(1), note(1, 1.0, &[], "a")]);
        let score = EventToIsisScore::<NoteLike>::default().convert(&event).unwrap();
        assert_eq!(score.rhythm, vec![1.0, 1.0]);

        let half = NoteLike::new(
            vec![Pitch::Midi(60.0)],
            Duration::new(1, 2),
            Volume::Direct(1.0),
            &[],
            "a",
        );
        let score = EventToIsisScore::<NoteLike>::default().convert(&half.into()).unwrap();
        assert_eq!(score.rhythm, vec![0.5]);
    }

    #[test]
    fn test_empty_event() {
        let event: Event<NoteLike> = Event::sequential(vec![Event::sequential(vec![])]);
        assert!(matches!(
            EventToIsisScore::<NoteLike>::default().convert(&event),
            Err(IsisError::EmptyEvent)
        ));
    }

    #[test]
    fn test_phoneme_validation() {
        let settings = ScoreSettings { validate_phonemes: true, ..Default::default() };
        let converter = EventToIsisScore::new(settings);

        let valid = Event::sequential(vec![note(1, 1.0, &["tS"], "a"), rest(1)]);
        assert!(converter.convert(&valid).is_ok());

        let invalid = Event::sequential(vec![note(1, 1.0, &["t"], "a"), rest(1), note(1, 1.0, &["th"], "e")]);
        match converter.convert(&invalid) {
            Err(IsisError::UnsupportedPhoneme { phoneme, event_index }) => {
                assert_eq!(phoneme, "th");
                assert_eq!(event_index, 2);
            }
            other => panic!("Expected UnsupportedPhoneme, got {:?}", other),
        }

        // Without validation anything goes
        assert!(EventToIsisScore::<NoteLike>::default().convert(&invalid).is_ok());
    }

    #[test]
    fn test_phoneme_error_index_counts_tied_rests() {
        let settings = ScoreSettings { validate_phonemes: true, ..Default::default() };
        let event = Event::sequential(vec![rest(1), rest(1), note(1, 1.0, &["th"], "a")]);
        match EventToIsisScore::new(settings).convert(&event) {
            Err(IsisError::UnsupportedPhoneme { phoneme, event_index }) => {
                assert_eq!(phoneme, "th");
                assert_eq!(event_index, 2);
            }
            other => panic!("Expected UnsupportedPhoneme, got {:?}", other),
        }
    }

    #[test]
    fn test_sung_rest_vowel_is_not_tied() {
        let event = Event::sequential(vec![note(1, 0.5, &[], "_"), rest(2)]);
        let score = EventToIsisScore::<NoteLike>::default().convert(&event).unwrap();
        assert_eq!(score.rhythm, vec![1.0, 2.0]);
        assert_eq!(score.midi_notes, vec![60.0, 0.0]);
        assert_eq!(score.loud_accents, vec![0.5, 0.0]);
    }

    #[test]
    fn test_empty_vowel_is_rest() {
        let event = Event::sequential(vec![note(1, 0.5, &["t"], ""), rest(2), note(1, 0.5, &[], " ")]);
        let score = EventToIsisScore::<NoteLike>::default().convert(&event).unwrap();
        assert_eq!(score.len(), 1);
        assert_eq!(score.rhythm, vec![4.0]);
        assert_eq!(score.syllables, vec![Syllable::rest()]);
        assert_eq!(score.midi_notes, vec![0.0]);
    }

    #[test]
    fn test_global_settings_are_copied() {
        let settings = ScoreSettings {
            tempo: 120.0,
            global_transposition: -12,
            default_sentence_loudness: Some(0.7),
            ..Default::default()
        };
        let score = EventToIsisScore::new(settings).convert(&note(1, 1.0, &[], "i")).unwrap();
        assert_eq!(score.tempo, 120.0);
        assert_eq!(score.global_transposition, -12);
        assert_eq!(score.default_sentence_loudness, Some(0.7));
    }
}
