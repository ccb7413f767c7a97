//! ISiS score file model
//!
//! An ISiS score is an INI-style config file with two sections:
//!
//! ```text
//! [lyrics]
//! xsampa : t a _ t a
//!
//! [score]
//! globalTransposition : 0
//! tempo : 60
//! midiNotes : 60, 0, 60
//! rhythm : 2, 7, 2
//! loud_accents : 0.5, 0, 0.5
//! ```
//!
//! See https://isis-documentation.readthedocs.io/en/latest/score.html

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::constants::*;
use super::errors::{IsisError, Result};

/// Phonemes sung on one event: leading consonants, then the vowel
#[derive(Debug, Clone, PartialEq)]
pub struct Syllable {
    pub consonants: Vec<String>,
    pub vowel: String,
}

impl Syllable {
    pub fn rest() -> Self {
        Syllable {
            consonants: Vec::new(),
            vowel: REST_VOWEL.to_string(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.vowel == REST_VOWEL && self.consonants.is_empty()
    }

    /// First phoneme that would not read back as part of this syllable.
    /// Only the vowel may close a syllable in the xsampa line.
    fn unreadable_phoneme(&self) -> Option<&str> {
        let malformed = |phoneme: &str| phoneme.is_empty() || phoneme.contains(char::is_whitespace);
        self.consonants
            .iter()
            .map(String::as_str)
            .find(|consonant| malformed(consonant) || is_xsampa_vowel(consonant))
            .or_else(|| {
                let vowel = self.vowel.as_str();
                (malformed(vowel) || !is_xsampa_vowel(vowel)).then_some(vowel)
            })
    }

    fn phonemes(&self) -> impl Iterator<Item = &str> {
        self.consonants
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.vowel.as_str()))
    }
}

/// One ISiS score: per-event lists plus global settings
///
/// The per-event lists (`syllables`, `midi_notes`, `rhythm`,
/// `loud_accents`) always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct IsisScore {
    pub syllables: Vec<Syllable>,
    pub midi_notes: Vec<f64>,
    /// Duration of each event in beats
    pub rhythm: Vec<f64>,
    /// Amplitude of each event, 0.0 - 1.0
    pub loud_accents: Vec<f64>,
    pub tempo: f64,
    pub global_transposition: i32,
    pub default_sentence_loudness: Option<f64>,
}

impl IsisScore {
    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    pub fn total_beats(&self) -> f64 {
        self.rhythm.iter().sum()
    }

    /// Render the score file text
    ///
    /// Values wrap onto a tab-indented continuation line after every
    /// `n_events_per_line` events. Fails with
    /// [`IsisError::UnsupportedPhoneme`] if a syllable can't be split back
    /// out of the xsampa line, i.e. its vowel isn't an XSAMPA vowel or a
    /// consonant is one.
    pub fn write_to_string(&self, n_events_per_line: usize) -> Result<String> {
        if n_events_per_line == 0 {
            return Err(IsisError::InvalidSettings(
                "n_events_per_line must be at least 1".to_string(),
            ));
        }

        for (event_index, syllable) in self.syllables.iter().enumerate() {
            if let Some(phoneme) = syllable.unreadable_phoneme() {
                return Err(IsisError::UnsupportedPhoneme {
                    phoneme: phoneme.to_string(),
                    event_index,
                });
            }
        }

        let syllable_texts: Vec<String> = self
            .syllables
            .iter()
            .map(|syllable| syllable.phonemes().collect::<Vec<_>>().join(" "))
            .collect();

        let mut out = String::new();
        write_section_header(&mut out, SECTION_LYRIC_NAME);
        write_entry(
            &mut out,
            KEY_XSAMPA,
            &join_wrapped(&syllable_texts, " ", n_events_per_line),
        );
        out.push('\n');

        write_section_header(&mut out, SECTION_SCORE_NAME);
        write_entry(
            &mut out,
            KEY_GLOBAL_TRANSPOSITION,
            &self.global_transposition.to_string(),
        );
        write_entry(&mut out, KEY_TEMPO, &format_number(self.tempo));
        if let Some(loudness) = self.default_sentence_loudness {
            write_entry(&mut out, KEY_DEFAULT_SENTENCE_LOUDNESS, &format_number(loudness));
        }
        for (key, values) in [
            (KEY_MIDI_NOTES, &self.midi_notes),
            (KEY_RHYTHM, &self.rhythm),
            (KEY_LOUD_ACCENTS, &self.loud_accents),
        ] {
            let formatted: Vec<String> = values.iter().copied().map(format_number).collect();
            write_entry(&mut out, key, &join_wrapped(&formatted, ", ", n_events_per_line));
        }
        out.push('\n');

        Ok(out)
    }

    pub fn write(&self, path: impl AsRef<Path>, n_events_per_line: usize) -> Result<()> {
        let path = path.as_ref();
        let text = self.write_to_string(n_events_per_line)?;
        fs::write(path, text).map_err(|e| IsisError::io(path, e))?;
        log::debug!("Wrote ISiS score with {} events to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<IsisScore> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| IsisError::io(path, e))?;
        IsisScore::parse(&text)
    }

    /// Parse score file text
    ///
    /// Keys are matched case-insensitively, `:` and `=` both work as
    /// delimiter and indented lines continue the previous value.
    pub fn parse(text: &str) -> Result<IsisScore> {
        let sections = parse_sections(text)?;

        let lyrics = section(&sections, SECTION_LYRIC_NAME)?;
        let score = section(&sections, SECTION_SCORE_NAME)?;

        let syllables = group_syllables(value(lyrics, SECTION_LYRIC_NAME, KEY_XSAMPA)?);
        let midi_notes = parse_number_list(value(score, SECTION_SCORE_NAME, KEY_MIDI_NOTES)?)?;
        let rhythm = parse_number_list(value(score, SECTION_SCORE_NAME, KEY_RHYTHM)?)?;
        let loud_accents =
            parse_number_list(value(score, SECTION_SCORE_NAME, KEY_LOUD_ACCENTS)?)?;

        let n = syllables.len();
        for (key, len) in [
            (KEY_MIDI_NOTES, midi_notes.len()),
            (KEY_RHYTHM, rhythm.len()),
            (KEY_LOUD_ACCENTS, loud_accents.len()),
        ] {
            if len != n {
                return Err(IsisError::MalformedScore(format!(
                    "'{}' has {} values but lyrics have {} syllables",
                    key, len, n
                )));
            }
        }

        let tempo = parse_number(value(score, SECTION_SCORE_NAME, KEY_TEMPO)?)?;
        let global_transposition = match lookup(score, KEY_GLOBAL_TRANSPOSITION) {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
                IsisError::MalformedScore(format!("Invalid globalTransposition: '{}'", raw))
            })?,
            None => DEFAULT_GLOBAL_TRANSPOSITION,
        };
        let default_sentence_loudness = lookup(score, KEY_DEFAULT_SENTENCE_LOUDNESS)
            .map(parse_number)
            .transpose()?;

        Ok(IsisScore {
            syllables,
            midi_notes,
            rhythm,
            loud_accents,
            tempo,
            global_transposition,
            default_sentence_loudness,
        })
    }
}

/// Format a number the way ISiS example scores do: no trailing ".0"
/// on whole numbers, shortest decimal otherwise
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn write_section_header(out: &mut String, name: &str) {
    let _ = writeln!(out, "[{}]", name);
}

fn write_entry(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{} : {}", key, value);
}

/// Join items, breaking onto a tab-indented line after every `per_line` items.
/// The separator is kept before the break, minus trailing whitespace.
fn join_wrapped(items: &[String], separator: &str, per_line: usize) -> String {
    items
        .chunks(per_line)
        .map(|chunk| chunk.join(separator))
        .collect::<Vec<_>>()
        .join(&format!("{}\n\t", separator.trim_end()))
}

type Section = HashMap<String, String>;

fn parse_sections(text: &str) -> Result<HashMap<String, Section>> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current_section: Option<String> = None;
    let mut current_key: Option<String> = None;

    for (line_index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Continuation of the previous value
        if line.starts_with(char::is_whitespace) {
            if let (Some(section_name), Some(key)) = (&current_section, &current_key) {
                if let Some(value) = sections
                    .get_mut(section_name)
                    .and_then(|section| section.get_mut(key))
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
            return Err(IsisError::MalformedScore(format!(
                "Unexpected continuation line {}: '{}'",
                line_index + 1,
                trimmed
            )));
        }

        if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let name = name.trim().to_lowercase();
            sections.entry(name.clone()).or_default();
            current_section = Some(name);
            current_key = None;
            continue;
        }

        let section_name = current_section.as_ref().ok_or_else(|| {
            IsisError::MalformedScore(format!(
                "Entry outside of any section on line {}",
                line_index + 1
            ))
        })?;
        let delimiter = trimmed.find([':', '=']).ok_or_else(|| {
            IsisError::MalformedScore(format!(
                "Missing delimiter on line {}: '{}'",
                line_index + 1,
                trimmed
            ))
        })?;
        let key = trimmed[..delimiter].trim().to_lowercase();
        let value = trimmed[delimiter + 1..].trim().to_string();
        if let Some(section) = sections.get_mut(section_name) {
            section.insert(key.clone(), value);
        }
        current_key = Some(key);
    }

    Ok(sections)
}

fn section<'a>(sections: &'a HashMap<String, Section>, name: &str) -> Result<&'a Section> {
    sections
        .get(name)
        .ok_or_else(|| IsisError::MalformedScore(format!("Missing [{}] section", name)))
}

fn lookup<'a>(section: &'a Section, key: &str) -> Option<&'a str> {
    section.get(&key.to_lowercase()).map(String::as_str)
}

fn value<'a>(section: &'a Section, section_name: &str, key: &str) -> Result<&'a str> {
    lookup(section, key).ok_or_else(|| {
        IsisError::MalformedScore(format!("Missing '{}' in [{}]", key, section_name))
    })
}

fn parse_number(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| IsisError::MalformedScore(format!("Invalid number: '{}'", raw.trim())))
}

fn parse_number_list(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_number)
        .collect()
}

/// Split the xsampa line into syllables; each vowel (or rest) closes one
fn group_syllables(raw: &str) -> Vec<Syllable> {
    let mut syllables = Vec::new();
    let mut consonants = Vec::new();
    for phoneme in raw.split_whitespace() {
        if is_xsampa_vowel(phoneme) {
            syllables.push(Syllable {
                consonants: std::mem::take(&mut consonants),
                vowel: phoneme.to_string(),
            });
        } else {
            consonants.push(phoneme.to_string());
        }
    }
    if !consonants.is_empty() {
        log::warn!(
            "Dropping trailing consonants without vowel: {}",
            consonants.join(" ")
        );
    }
    syllables
}
