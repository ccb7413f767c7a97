//! # isis-render
//!
//! Command-line interface for converting event files to ISiS scores
//! and rendering them with ISiS.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use isis_converter::converters::isis::constants::{SILENT_FLAG, XSAMPA_CONSONANTS, XSAMPA_VOWELS};
use isis_converter::input::load_events;
use isis_converter::{EventToIsisScore, EventToSingingSynthesis, IsisConfig, IsisScore};

#[derive(Parser)]
#[command(name = "isis-render")]
#[command(about = "Convert event files to ISiS scores and render them with ISiS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an ISiS score file from an event file
    Score(ScoreCommand),
    /// Render a sound file with ISiS from an event file
    Render(RenderCommand),
    /// Summarize an existing ISiS score file
    Inspect(InspectCommand),
    /// List the XSAMPA phonemes ISiS accepts
    Phonemes,
}

/// Options shared by `score` and `render`
#[derive(Args)]
struct ScoreOptions {
    /// Event file (.yaml, .yml or .json)
    input: PathBuf,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tempo in BPM
    #[arg(long)]
    tempo: Option<f64>,

    /// Global transposition in semitones
    #[arg(long, allow_hyphen_values = true)]
    transposition: Option<i32>,

    /// Events per line in the score file
    #[arg(long)]
    events_per_line: Option<usize>,

    /// Reject phonemes ISiS doesn't know
    #[arg(long)]
    validate_phonemes: bool,
}

impl ScoreOptions {
    fn resolve_config(&self) -> Result<IsisConfig> {
        let mut config = IsisConfig::resolve(self.config.as_deref())?;
        if let Some(tempo) = self.tempo {
            config.score.tempo = tempo;
        }
        if let Some(transposition) = self.transposition {
            config.score.global_transposition = transposition;
        }
        if let Some(n) = self.events_per_line {
            config.score.n_events_per_line = n;
        }
        if self.validate_phonemes {
            config.score.validate_phonemes = true;
        }
        Ok(config)
    }
}

#[derive(Args)]
struct ScoreCommand {
    #[command(flatten)]
    options: ScoreOptions,

    /// Output score file
    #[arg(short, long)]
    output: PathBuf,
}

impl ScoreCommand {
    fn execute(self) -> Result<()> {
        let config = self.options.resolve_config()?;
        let event = load_events(&self.options.input)?;
        let converter = EventToIsisScore::new(config.score);
        let score = converter
            .convert_to_file(&event, &self.output)
            .with_context(|| format!("Failed to write score {}", self.output.display()))?;
        info!("Wrote {} events to {}", score.len(), self.output.display());
        Ok(())
    }
}

#[derive(Args)]
struct RenderCommand {
    #[command(flatten)]
    options: ScoreOptions,

    /// Output sound file
    #[arg(short, long)]
    output: PathBuf,

    /// ISiS executable, overrides config and environment
    #[arg(long)]
    isis: Option<PathBuf>,

    /// Extra flag passed to ISiS (repeatable)
    #[arg(long = "flag", allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Silence ISiS output
    #[arg(short, long)]
    quiet: bool,

    /// Delete the intermediate score file afterwards
    #[arg(long)]
    remove_score_file: bool,
}

impl RenderCommand {
    fn execute(self) -> Result<()> {
        let mut config = self.options.resolve_config()?;
        if let Some(isis) = self.isis {
            config.isis_executable_path = isis;
        }
        config.flags.extend(self.flags);
        if self.quiet && !config.flags.iter().any(|flag| flag == SILENT_FLAG) {
            config.flags.push(SILENT_FLAG.to_string());
        }
        if self.remove_score_file {
            config.remove_score_file = true;
        }

        let event = load_events(&self.options.input)?;
        let synthesis = EventToSingingSynthesis::from_config(&config);
        synthesis
            .convert(&event, &self.output)
            .with_context(|| format!("Failed to render {}", self.output.display()))?;
        info!("Rendered {}", self.output.display());
        Ok(())
    }
}

#[derive(Args)]
struct InspectCommand {
    /// ISiS score file
    score: PathBuf,
}

impl InspectCommand {
    fn execute(self) -> Result<()> {
        let score = IsisScore::read(&self.score)?;
        let rests = score.syllables.iter().filter(|s| s.is_rest()).count();
        let seconds = score.total_beats() * 60.0 / score.tempo;
        println!("{}", self.score.display());
        println!("  events:        {} ({} rests)", score.len(), rests);
        println!("  beats:         {}", score.total_beats());
        println!("  tempo:         {} BPM", score.tempo);
        println!("  duration:      {:.2} s", seconds);
        println!("  transposition: {}", score.global_transposition);
        Ok(())
    }
}

fn print_phonemes() {
    println!("vowels:     {}", XSAMPA_VOWELS.join(" "));
    println!("consonants: {}", XSAMPA_CONSONANTS.join(" "));
    println!("rest:       _");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Score(cmd) => cmd.execute(),
        Commands::Render(cmd) => cmd.execute(),
        Commands::Inspect(cmd) => cmd.execute(),
        Commands::Phonemes => {
            print_phonemes();
            Ok(())
        }
    }
}
