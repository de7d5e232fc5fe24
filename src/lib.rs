//! Orrery — a terminal-native generative ambient-music toy.
//!
//! Typed text is the score: characters map onto a pentatonic scale, digits
//! bend octaves, and committed words keep replaying their own melodies like
//! planets in orbit.

pub mod audio;
pub mod gallery;
pub mod melody;
pub mod orbit;
pub mod sched;
pub mod share;
pub mod tui;
pub mod voice;
