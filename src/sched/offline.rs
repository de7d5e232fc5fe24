//! Offline bounce — render a token sequence straight to samples.
//!
//! Uses the same plan → spec → voice path as live playback, minus the device
//! and the live attenuation feedback, so tests and the `render` subcommand
//! hear exactly what the scheduler would play.

use crate::audio::SoftClip;
use crate::melody::Token;
use crate::voice::{Voice, VoiceSpec, ATTACK_SECS};

use super::{plan_note, sequence_duration, STEP_SECS};

/// Render `tokens` to a mono buffer at `sample_rate`.
///
/// The buffer covers every line's steps plus the tail of the last decaying
/// note; a sequence of rests renders as silence of its step length.
pub fn bounce(tokens: &[Token], volume: f64, decay: f64, sample_rate: u32) -> Vec<f32> {
    let mut specs = Vec::new();
    let mut step = 0u32;
    for token in tokens {
        match token {
            Token::LineBreak => step = 0,
            Token::PendingDigit { .. } => {}
            Token::Note { character, octave } => {
                let offset = f64::from(step) * STEP_SECS;
                step += 1;
                if let Some(note) = plan_note(*character, *octave) {
                    specs.push(VoiceSpec {
                        performance: None,
                        waveform: note.waveform,
                        frequency: note.frequency,
                        gain: volume * note.amplitude,
                        delay: offset,
                        attack: ATTACK_SECS,
                        decay,
                    });
                }
            }
        }
    }

    let mut end_secs = sequence_duration(tokens);
    for spec in &specs {
        end_secs = end_secs.max(spec.delay + spec.attack + spec.decay);
    }

    let frames = (end_secs * f64::from(sample_rate)).ceil() as usize;
    let mut buffer = vec![0.0f32; frames];

    for spec in &specs {
        Voice::from_spec(spec, sample_rate).render(&mut buffer, 1);
    }

    SoftClip::default().process_block(&mut buffer);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::parse;

    const SR: u32 = 44100;

    fn rms(buffer: &[f32]) -> f32 {
        if buffer.is_empty() {
            return 0.0;
        }
        (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(bounce(&parse(""), 0.5, 0.4, SR).is_empty());
    }

    #[test]
    fn letters_render_sound() {
        let out = bounce(&parse("abc"), 0.5, 0.4, SR);
        assert!(!out.is_empty());
        assert!(rms(&out) > 0.001);
    }

    #[test]
    fn rests_render_timed_silence() {
        for text in [".", " "] {
            let out = bounce(&parse(text), 0.5, 0.4, SR);
            assert_eq!(out.len(), (0.15 * SR as f64).ceil() as usize);
            assert!(out.iter().all(|&s| s == 0.0), "{text:?} made sound");
        }
    }

    #[test]
    fn rest_between_notes_leaves_a_gap() {
        // "a.b": step 1 (0.15–0.30s) has only a's decay tail, which is well
        // below the onset level of a fresh note.
        let out = bounce(&parse("a.b"), 0.5, 0.15, SR);
        let step = (0.15 * SR as f64) as usize;
        let gap_rms = rms(&out[step + step / 2..2 * step]);
        let onset_rms = rms(&out[..step / 2]);
        assert!(gap_rms < onset_rms * 0.5, "gap {gap_rms} vs onset {onset_rms}");
    }

    #[test]
    fn parallel_lines_are_shorter_than_serial() {
        let serial = bounce(&parse("abcd"), 0.5, 0.4, SR);
        let parallel = bounce(&parse("ab\ncd"), 0.5, 0.4, SR);
        assert!(parallel.len() < serial.len());
    }

    #[test]
    fn bounce_is_deterministic() {
        let a = bounce(&parse("hello world"), 0.5, 0.4, SR);
        let b = bounce(&parse("hello world"), 0.5, 0.4, SR);
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_bounded() {
        // Many simultaneous loud lines push the mix into the clipper.
        let out = bounce(&parse("zz\nzz\nzz\nzz\nzz"), 1.0, 0.4, SR);
        for &s in &out {
            assert!(s.abs() < 1.0, "sample escaped the clipper: {s}");
        }
    }

    #[test]
    fn octave_shifts_are_audible_as_different_buffers() {
        let low = bounce(&parse("2a"), 0.5, 0.4, SR);
        let high = bounce(&parse("8a"), 0.5, 0.4, SR);
        assert_eq!(low.len(), high.len());
        assert_ne!(low, high);
    }
}
