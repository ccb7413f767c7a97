//! Constants for ISiS score files and the ISiS command line
//!
//! Flag definitions follow the ISiS command line documentation
//! (https://isis-documentation.readthedocs.io/en/latest/CmdLineArgs.html).

/// Path to the ISiS shell script as installed by `Install_ISiS_commandline.sh`
pub const DEFAULT_ISIS_EXECUTABLE_PATH: &str = "isis.sh";

/// Environment variable overriding the executable path
pub const ISIS_EXECUTABLE_PATH_ENV: &str = "ISIS_EXECUTABLE_PATH";

/// Prevents ISiS from printing progress during rendering
pub const SILENT_FLAG: &str = "--quiet";

/// Flag preceding the score file path
pub const SCORE_FLAG: &str = "-m";

/// Flag preceding the output sound file path
pub const OUTPUT_FLAG: &str = "-o";

/// Appended to the sound file path to name the intermediate score file
pub const SCORE_FILE_SUFFIX: &str = ".isis_score";

/// Section name for lyrics in score config file
pub const SECTION_LYRIC_NAME: &str = "lyrics";

/// Section name for score in score config file
pub const SECTION_SCORE_NAME: &str = "score";

pub const KEY_XSAMPA: &str = "xsampa";
pub const KEY_MIDI_NOTES: &str = "midiNotes";
pub const KEY_RHYTHM: &str = "rhythm";
pub const KEY_LOUD_ACCENTS: &str = "loud_accents";
pub const KEY_GLOBAL_TRANSPOSITION: &str = "globalTransposition";
pub const KEY_TEMPO: &str = "tempo";
pub const KEY_DEFAULT_SENTENCE_LOUDNESS: &str = "defaultSentenceLoudness";

/// Default tempo in beats per minute
pub const DEFAULT_TEMPO_BPM: f64 = 60.0;

pub const DEFAULT_GLOBAL_TRANSPOSITION: i32 = 0;

/// How many events are written per line before a value wraps
pub const DEFAULT_N_EVENTS_PER_LINE: usize = 5;

/// Vowel ISiS reads as silence
pub const REST_VOWEL: &str = "_";

/// Vowels (including nasals and schwa) ISiS can sing
pub const XSAMPA_VOWELS: &[&str] = &[
    "a", "e", "E", "i", "o", "O", "u", "y", "2", "9", "@", "a~", "e~", "o~", "9~",
];

/// Consonants and semi-vowels
pub const XSAMPA_CONSONANTS: &[&str] = &[
    "p", "b", "t", "d", "k", "g", "f", "v", "s", "z", "S", "Z", "m", "n", "J", "N", "l", "R",
    "r", "h", "x", "j", "w", "H", "tS", "dZ",
];

/// Every phoneme symbol ISiS accepts in the `xsampa` lyric line
pub const XSAMPA: &[&str] = &[
    "a", "e", "E", "i", "o", "O", "u", "y", "2", "9", "@", "a~", "e~", "o~", "9~", "p", "b",
    "t", "d", "k", "g", "f", "v", "s", "z", "S", "Z", "m", "n", "J", "N", "l", "R", "r", "h",
    "x", "j", "w", "H", "tS", "dZ",
];

/// True for XSAMPA vowels and the rest marker; these close a syllable
pub fn is_xsampa_vowel(phoneme: &str) -> bool {
    phoneme == REST_VOWEL || XSAMPA_VOWELS.contains(&phoneme)
}

/// True if ISiS understands the symbol
pub fn is_supported_phoneme(phoneme: &str) -> bool {
    phoneme == REST_VOWEL || XSAMPA.contains(&phoneme)
}
