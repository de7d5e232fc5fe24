//! The "pop" — a fixed percussive one-shot used for delete/clear feedback.
//!
//! Sine with an exponential pitch sweep from 2093 Hz down to 1000 Hz over the
//! first 50 ms, exponential amplitude decay over the full 100 ms. Unrelated
//! to the note model; it is pre-rendered and mixed in as-is.

use std::f64::consts::PI;

const DURATION_SECS: f64 = 0.1;
const SWEEP_SECS: f64 = 0.05;
const FREQ_START: f64 = 2093.0;
const FREQ_END: f64 = 1000.0;
const PEAK: f64 = 0.4;
const FLOOR: f64 = 0.001;

/// Render the pop into a mono buffer at the given sample rate.
pub fn render_pop(sample_rate: u32) -> Vec<f32> {
    let sr = f64::from(sample_rate);
    let num_samples = (sr * DURATION_SECS) as usize;
    let mut output = Vec::with_capacity(num_samples);
    let mut phase = 0.0_f64;

    for i in 0..num_samples {
        let t = i as f64 / sr;

        // Pitch sweep holds at its end value once the ramp completes.
        let freq = if t < SWEEP_SECS {
            FREQ_START * (FREQ_END / FREQ_START).powf(t / SWEEP_SECS)
        } else {
            FREQ_END
        };

        let amp = PEAK * (FLOOR / PEAK).powf(t / DURATION_SECS);

        phase = (phase + freq / sr).fract();
        output.push(((phase * 2.0 * PI).sin() * amp) as f32);
    }

    output
}
