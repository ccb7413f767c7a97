/// Singing synthesis by running the ISiS command line
///
/// Writes the score next to the requested sound file (`<path>.isis_score`)
/// and calls `<isis> -m <score> -o <path> <flags...>`.
///
/// ISiS has to be installed separately; see
/// https://forum.ircam.fr/projects/detail/isis/

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::constants::*;
use super::errors::{IsisError, Result};
use super::event_to_score::EventToIsisScore;
use crate::config::IsisConfig;
use crate::models::{Event, NoteLike, SimpleEvent};

pub struct EventToSingingSynthesis<T> {
    pub score_converter: EventToIsisScore<T>,
    /// Extra flags appended to the ISiS call, e.g. [`SILENT_FLAG`]
    pub flags: Vec<String>,
    /// Delete the intermediate score file once ISiS has run
    pub remove_score_file: bool,
    pub isis_executable_path: PathBuf,
}

impl EventToSingingSynthesis<NoteLike> {
    /// Synthesizer for [`NoteLike`] events built from a config
    pub fn from_config(config: &IsisConfig) -> Self {
        EventToSingingSynthesis {
            score_converter: EventToIsisScore::new(config.score.clone()),
            flags: config.flags.clone(),
            remove_score_file: config.remove_score_file,
            isis_executable_path: config.isis_executable_path.clone(),
        }
    }
}

impl<T: SimpleEvent> EventToSingingSynthesis<T> {
    /// Synthesizer with default options; the executable honours
    /// `ISIS_EXECUTABLE_PATH`
    pub fn new(score_converter: EventToIsisScore<T>) -> Self {
        EventToSingingSynthesis {
            score_converter,
            flags: Vec::new(),
            remove_score_file: false,
            isis_executable_path: IsisConfig::default().with_env_overrides().isis_executable_path,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn with_remove_score_file(mut self, remove_score_file: bool) -> Self {
        self.remove_score_file = remove_score_file;
        self
    }

    pub fn with_isis_executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.isis_executable_path = path.into();
        self
    }

    /// Where the intermediate score for `output_path` is written
    pub fn score_path(output_path: &Path) -> PathBuf {
        let mut score_path = OsString::from(output_path.as_os_str());
        score_path.push(SCORE_FILE_SUFFIX);
        PathBuf::from(score_path)
    }

    /// The ISiS invocation rendering `score_path` into `output_path`
    pub fn command(&self, score_path: &Path, output_path: &Path) -> Command {
        let mut command = Command::new(&self.isis_executable_path);
        command
            .arg(SCORE_FLAG)
            .arg(score_path)
            .arg(OUTPUT_FLAG)
            .arg(output_path)
            .args(&self.flags);
        command
    }

    /// Render a sound file at `path` from the event
    pub fn convert(&self, event: &Event<T>, path: impl AsRef<Path>) -> Result<()> {
        let output_path = path.as_ref();
        let score_path = Self::score_path(output_path);

        self.score_converter.convert_to_file(event, &score_path)?;

        let result = self.run_isis(&score_path, output_path);

        if self.remove_score_file {
            if let Err(e) = fs::remove_file(&score_path) {
                if result.is_ok() {
                    return Err(IsisError::io(&score_path, e));
                }
                log::warn!("Couldn't remove score file {}: {}", score_path.display(), e);
            }
        }

        result
    }

    fn run_isis(&self, score_path: &Path, output_path: &Path) -> Result<()> {
        let mut command = self.command(score_path, output_path);
        log::debug!("Running {:?}", command);

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    IsisError::ExecutableNotFound(self.isis_executable_path.clone())
                }
                _ => IsisError::Spawn {
                    executable: self.isis_executable_path.clone(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(IsisError::SynthesisFailed {
                code: output.status.code(),
                stderr,
            });
        }

        log::info!("ISiS rendered {}", output_path.display());
        Ok(())
    }
}
