//! Orrery command line — play text, go live, bounce to WAV, share, gallery.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};

use orrery::gallery::{self, Piece};
use orrery::melody::parse;
use orrery::sched::offline::bounce;
use orrery::sched::{sequence_duration, PerformanceId, ToneScheduler, WORD_DECAY_SECS};
use orrery::share;
use orrery::tui;

/// Default playback volume.
const VOLUME: f64 = 0.6;

/// Fade applied when playback is interrupted or finishes.
const EXIT_FADE_SECS: f64 = 0.3;

#[derive(Parser)]
#[command(name = "orrery", version, about = "Typed words become orbiting melodies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play text once through the speakers.
    Play {
        /// Text to sonify. Digits bend the next note's octave; newlines start
        /// parallel lines.
        text: String,
        /// Playback volume, 0.0–1.0.
        #[arg(long, default_value_t = VOLUME)]
        volume: f64,
    },
    /// Interactive live mode: type, hear, commit orbiting words.
    Live,
    /// Bounce text to a mono WAV file.
    Render {
        text: String,
        /// Output path.
        #[arg(short, long, default_value = "orrery.wav")]
        out: PathBuf,
        /// Sample rate of the rendered file.
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
        #[arg(long, default_value_t = VOLUME)]
        volume: f64,
    },
    /// Encode words into a compact share code, or decode one back.
    Share {
        /// Words to encode (one melody each).
        words: Vec<String>,
        /// Decode this share code instead of encoding.
        #[arg(long, conflicts_with = "words")]
        decode: Option<String>,
    },
    /// The local gallery of saved pieces.
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List saved pieces.
    List,
    /// Save a piece.
    Save {
        name: String,
        words: Vec<String>,
        #[arg(long, default_value = "Anonymous")]
        composer: String,
        #[arg(long, default_value = "Nothing of note.")]
        description: String,
    },
    /// Play a saved piece by name.
    Play { name: String },
    /// Publish a saved piece to a catalog service.
    #[cfg(feature = "catalog")]
    Publish {
        name: String,
        /// Catalog base URL.
        #[arg(long, default_value = "http://localhost:5000")]
        url: String,
    },
    /// List pieces published on a catalog service.
    #[cfg(feature = "catalog")]
    Browse {
        #[arg(long, default_value = "http://localhost:5000")]
        url: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Play { text, volume } => cmd_play(&text, volume),
        Command::Live => {
            if let Err(e) = tui::run_live() {
                eprintln!("live mode failed: {e}");
                process::exit(1);
            }
        }
        Command::Render {
            text,
            out,
            sample_rate,
            volume,
        } => cmd_render(&text, &out, sample_rate, volume),
        Command::Share { words, decode } => cmd_share(words, decode),
        Command::Gallery { action } => cmd_gallery(action),
    }
}

/// Play one melody and wait for it to finish (or for ctrl-c).
fn cmd_play(text: &str, volume: f64) {
    let tokens = parse(text);
    if tokens.is_empty() {
        return;
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            eprintln!("failed to set interrupt handler: {e}");
        }
    }

    let mut scheduler = ToneScheduler::new();
    scheduler.schedule_sequence(&tokens, Some(PerformanceId(1)), volume, WORD_DECAY_SECS);

    // Spacing length plus the last note's decay tail.
    let total = sequence_duration(&tokens) + WORD_DECAY_SECS + 0.2;
    let deadline = std::time::Instant::now() + Duration::from_secs_f64(total);
    while std::time::Instant::now() < deadline {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }

    scheduler.fade_out_master(EXIT_FADE_SECS);
    thread::sleep(Duration::from_secs_f64(EXIT_FADE_SECS + 0.1));
}

fn cmd_render(text: &str, out: &PathBuf, sample_rate: u32, volume: f64) {
    let samples = bounce(&parse(text), volume, WORD_DECAY_SECS, sample_rate);
    if samples.is_empty() {
        eprintln!("nothing to render");
        process::exit(1);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let result = hound::WavWriter::create(out, spec).and_then(|mut writer| {
        for s in &samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)?;
        }
        writer.finalize()
    });
    if let Err(e) = result {
        eprintln!("failed to write {}: {e}", out.display());
        process::exit(1);
    }

    println!(
        "wrote {} ({:.2}s at {} Hz)",
        out.display(),
        samples.len() as f64 / f64::from(sample_rate),
        sample_rate
    );
}

fn cmd_share(words: Vec<String>, decode: Option<String>) {
    match decode {
        Some(code) => match share::decode(&code) {
            Ok(words) => {
                for word in words {
                    println!("{word}");
                }
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => println!("{}", share::encode(&words)),
    }
}

fn cmd_gallery(action: GalleryAction) {
    let path = gallery::default_gallery_path();
    match action {
        GalleryAction::List => {
            let pieces = load_or_exit(&path);
            if pieces.is_empty() {
                println!("gallery is empty");
                return;
            }
            for piece in &pieces {
                println!("{} — {} ({} words)", piece.name, piece.composer, piece.words.len());
            }
        }
        GalleryAction::Save {
            name,
            words,
            composer,
            description,
        } => {
            let mut pieces = load_or_exit(&path);
            pieces.push(Piece {
                name,
                composer,
                description,
                words,
                theme: "#8daabf".to_string(),
            });
            if let Err(e) = gallery::save_gallery(&path, &pieces) {
                eprintln!("failed to save gallery: {e}");
                process::exit(1);
            }
        }
        GalleryAction::Play { name } => {
            let pieces = load_or_exit(&path);
            let Some(piece) = pieces.iter().find(|p| p.name == name) else {
                eprintln!("no piece named {name:?}");
                process::exit(1);
            };
            // One performance per word, all starting together — the static
            // rendition of the orbit.
            cmd_play(&piece.words.join("\n"), VOLUME);
        }
        #[cfg(feature = "catalog")]
        GalleryAction::Publish { name, url } => {
            let pieces = load_or_exit(&path);
            let Some(piece) = pieces.iter().find(|p| p.name == name) else {
                eprintln!("no piece named {name:?}");
                process::exit(1);
            };
            match gallery::catalog::CatalogClient::new(url).publish(piece) {
                Ok(entry) => println!("published {} as id {}", entry.name, entry.id),
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
        #[cfg(feature = "catalog")]
        GalleryAction::Browse { url } => {
            match gallery::catalog::CatalogClient::new(url).list() {
                Ok(entries) => {
                    for entry in entries {
                        println!(
                            "#{} {} — {} ({} views)",
                            entry.id, entry.name, entry.composer, entry.clicks
                        );
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
    }
}

fn load_or_exit(path: &std::path::Path) -> Vec<Piece> {
    match gallery::load_gallery(path) {
        Ok(pieces) => pieces,
        Err(e) => {
            eprintln!("failed to load gallery: {e}");
            process::exit(1);
        }
    }
}
