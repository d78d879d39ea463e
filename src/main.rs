//! chordhound - chord voicings, voice leading and Roman numeral analysis
//!
//! Subcommands:
//! - `chordhound notes C major` - Pitch classes of a chord
//! - `chordhound voice C major --reference E4 --inversion first` - Octave-qualified voicing
//! - `chordhound transpose G major I IV V` - Numerals to chords
//! - `chordhound analyze C major D:minor G:7 C:major` - Chords to numerals
//! - `chordhound progression C major I IV V I` - Voice a whole progression
//! - `chordhound blues C C dominant7` - Blue-note overlay for one chord

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use chordhound::blue_notes::blue_note_overlay;
use chordhound::progression::{parse_progression, Key};
use chordhound::{ChordConfig, ChordError, ChordService, ChordSpec, EngineKind, Pitch, ProgressionChord};

#[derive(Parser)]
#[command(name = "chordhound")]
#[command(about = "Chord calculation engine for ChordHound")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Engine to use (legacy or mathematical); overrides the config file
    #[arg(short, long, global = true)]
    engine: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pitch classes of a chord, no octaves
    Notes {
        root: String,
        quality: String,
        #[arg(short, long, default_value = "root")]
        inversion: String,
    },

    /// Octave-qualified voicing from the selected engine
    Voice {
        root: String,
        quality: String,
        #[arg(short, long, default_value = "root")]
        inversion: String,
        /// Pitch the voicing is placed around
        #[arg(short, long, default_value = "C4")]
        reference: String,
    },

    /// Roman numerals to concrete chords
    Transpose {
        key: String,
        mode: String,
        #[arg(required = true)]
        numerals: Vec<String>,
    },

    /// Chords (`D:minor`, `G:7` or plain symbols like `Dm`) to Roman numerals
    Analyze {
        key: String,
        mode: String,
        #[arg(required = true)]
        chords: Vec<String>,
    },

    /// Transpose and voice a progression
    Progression {
        key: String,
        mode: String,
        #[arg(required = true)]
        numerals: Vec<String>,
        #[arg(short, long, default_value = "C4")]
        reference: String,
    },

    /// Mark the blue notes of a key inside a chord
    Blues {
        key: String,
        root: String,
        quality: String,
        #[arg(short, long, default_value = "C4")]
        reference: String,
    },
}

fn load_config(cli: &Cli) -> Result<ChordConfig, ChordError> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(|e| ChordError::Config(format!("reading '{}': {}", path, e)))?;
            ChordConfig::from_yaml(&source)?
        }
        None => ChordConfig::default(),
    };
    if let Some(engine) = &cli.engine {
        config.engine = EngineKind::from_setting(Some(engine.as_str()));
    }
    Ok(config)
}

/// `Root:quality`, falling back to a plain chord symbol
fn parse_chord(input: &str) -> Result<ChordSpec, ChordError> {
    match input.split_once(':') {
        Some((root, quality)) => ChordSpec::parse(root, quality, "root", None),
        None => ChordSpec::from_symbol(input),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) {
    if !json {
        println!("{}", text());
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error writing JSON: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(), ChordError> {
    let service = ChordService::new(load_config(cli)?);

    match &cli.command {
        Commands::Notes {
            root,
            quality,
            inversion,
        } => {
            let spec = ChordSpec::parse(root, quality, inversion, None)?;
            let notes = service.chord_notes(spec.root, spec.quality, spec.inversion)?;
            emit(cli.json, &notes, || {
                notes.iter().map(|n| n.name()).collect::<Vec<_>>().join(" ")
            });
        }
        Commands::Voice {
            root,
            quality,
            inversion,
            reference,
        } => {
            let spec = ChordSpec::parse(root, quality, inversion, Some(reference.as_str()))?;
            let chord = service.calculate(&spec)?;
            emit(cli.json, &chord, || chord.to_string());
        }
        Commands::Transpose {
            key,
            mode,
            numerals,
        } => {
            let key = Key::parse(key, mode)?;
            let steps = parse_progression(&numerals.join(" "))?;
            let chords = service.transpose_progression(key, &steps)?;
            emit(cli.json, &chords, || {
                chords.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
            });
        }
        Commands::Analyze { key, mode, chords } => {
            let key = Key::parse(key, mode)?;
            let chords = chords
                .iter()
                .map(|s| parse_chord(s).map(|c| ProgressionChord::new(c.root, c.quality)))
                .collect::<Result<Vec<_>, _>>()?;
            let numerals = service.analyze_progression(&chords, key);
            emit(cli.json, &numerals, || {
                numerals.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
            });
        }
        Commands::Progression {
            key,
            mode,
            numerals,
            reference,
        } => {
            let key = Key::parse(key, mode)?;
            let steps = parse_progression(&numerals.join(" "))?;
            let reference: Pitch = reference.parse()?;
            let voiced = service.voice_progression(key, &steps, reference)?;
            emit(cli.json, &voiced, || {
                steps
                    .iter()
                    .zip(&voiced)
                    .map(|(step, chord)| format!("{:<6} {:<7} {}", step.to_string(), chord.inversion.name(), chord))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }
        Commands::Blues {
            key,
            root,
            quality,
            reference,
        } => {
            let key: Key = key.parse()?;
            let spec = ChordSpec::parse(root, quality, "root", Some(reference.as_str()))?;
            let voiced = service.calculate(&spec)?;
            let overlay = blue_note_overlay(key, &voiced);
            emit(cli.json, &overlay, || {
                overlay
                    .iter()
                    .map(|n| {
                        if n.is_blue {
                            format!("[{}]", n.pitch)
                        } else {
                            n.pitch.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            });
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
