//! Character → frequency mapping.
//!
//! Letters index a fixed 16-entry C-minor-pentatonic table directly (a = 0);
//! every other character indexes by its code point. The two schemes coexist
//! on purpose — digits land high on the table via their ASCII values, and
//! that asymmetry is part of the instrument's sound. Do not unify them.

/// Fixed scale table: C minor pentatonic from C3 to C6, 16 entries.
pub const SCALE_TABLE: [f64; 16] = [
    130.81, // C3
    155.56, // Eb3
    174.61, // F3
    196.00, // G3
    233.08, // Bb3
    261.63, // C4
    311.13, // Eb4
    349.23, // F4
    392.00, // G4
    466.16, // Bb4
    523.25, // C5
    622.25, // Eb5
    698.46, // F5
    783.99, // G5
    932.33, // Bb5
    1046.50, // C6
];

/// Table wraps fold back after this many octave doublings.
const WRAP_CAP: u64 = 4;

/// Octave value that leaves the table frequency unshifted.
pub const NEUTRAL_OCTAVE: u8 = 5;

fn lowercased(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Raw pitch index for a character: 0–25 for letters, code point otherwise.
pub fn pitch_index(ch: char) -> u64 {
    let lower = lowercased(ch);
    if lower.is_ascii_lowercase() {
        lower as u64 - 'a' as u64
    } else {
        lower as u64
    }
}

/// Frequency in Hz for a character at the given octave.
///
/// Index wraps around the 16-entry table, doubling once per wrap (capped at
/// `wraps % 4`); uppercase doubles once more; the octave shifts by powers of
/// two around octave 5.
pub fn frequency(ch: char, octave: u8) -> f64 {
    let index = pitch_index(ch);
    let base = SCALE_TABLE[(index % 16) as usize];
    let wraps = (index / 16) % WRAP_CAP;

    let mut freq = base * f64::from(1u32 << wraps);
    if ch != lowercased(ch) {
        freq *= 2.0;
    }
    freq * 2.0_f64.powi(i32::from(octave) - i32::from(NEUTRAL_OCTAVE))
}
