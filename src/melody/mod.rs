//! Melody layer — typed text → tokens → frequencies.
//!
//! Text is the score: every character the user types is a note, a rest, or an
//! octave modifier. [`parse`] turns raw text into [`Token`]s; [`pitch`] maps a
//! character to its frequency on the fixed pentatonic table.

pub mod parser;
pub mod pitch;
pub mod token;

pub use parser::parse;
pub use pitch::{frequency, pitch_index, SCALE_TABLE};
pub use token::{Token, DEFAULT_OCTAVE};
