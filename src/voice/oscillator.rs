//! Waveform generation.
//!
//! Two shapes only: triangle carries alphanumeric notes, sine carries
//! everything else (and the pop effect).

use std::f64::consts::PI;

/// The instrument's two timbres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Primary timbre — alphanumeric characters, full amplitude.
    Triangle,
    /// Secondary, softer timbre — punctuation and symbols.
    Sine,
}

/// Sample the waveform at `phase` in `[0.0, 1.0)`. Returns a value in
/// `[-1.0, 1.0]`.
pub fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (phase * 2.0 * PI).sin(),
        Waveform::Triangle => {
            if phase < 0.25 {
                4.0 * phase
            } else if phase < 0.75 {
                2.0 - 4.0 * phase
            } else {
                4.0 * phase - 4.0
            }
        }
    }
}
