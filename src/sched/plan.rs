//! Pure per-note parameter computation: character + octave → timbre,
//! frequency, relative amplitude. Rests plan to nothing.

use crate::melody::pitch::frequency;
use crate::voice::Waveform;

/// Relative amplitude of the softer secondary timbre.
const SECONDARY_AMPLITUDE: f64 = 0.4;

/// Everything the scheduler needs to sound one character, before volume and
/// attenuation are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePlan {
    pub waveform: Waveform,
    pub frequency: f64,
    /// Timbre-relative amplitude (1.0 primary, 0.4 secondary).
    pub amplitude: f64,
}

/// Plan one note. Returns `None` for the rest characters (`.` and space),
/// which occupy a timing step but never sound.
pub fn plan_note(character: char, octave: u8) -> Option<NotePlan> {
    if character == '.' || character == ' ' {
        return None;
    }

    let (waveform, amplitude) = if character.is_ascii_alphanumeric() {
        (Waveform::Triangle, 1.0)
    } else {
        (Waveform::Sine, SECONDARY_AMPLITUDE)
    };

    Some(NotePlan {
        waveform,
        frequency: frequency(character, octave),
        amplitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn rests_plan_to_nothing() {
        assert_eq!(plan_note('.', 5), None);
        assert_eq!(plan_note(' ', 5), None);
        // Octave and case make no difference to a rest.
        assert_eq!(plan_note('.', 9), None);
    }

    #[test]
    fn alphanumerics_use_primary_timbre() {
        let plan = plan_note('a', 5).unwrap();
        assert_eq!(plan.waveform, Waveform::Triangle);
        assert_approx_eq!(plan.amplitude, 1.0, 1e-12);

        let digit = plan_note('7', 5).unwrap();
        assert_eq!(digit.waveform, Waveform::Triangle);
    }

    #[test]
    fn punctuation_uses_soft_secondary_timbre() {
        let plan = plan_note('!', 5).unwrap();
        assert_eq!(plan.waveform, Waveform::Sine);
        assert_approx_eq!(plan.amplitude, 0.4, 1e-12);
    }

    #[test]
    fn frequency_follows_pitch_mapping() {
        assert_approx_eq!(plan_note('a', 5).unwrap().frequency, 130.81, 1e-6);
        assert_approx_eq!(plan_note('A', 5).unwrap().frequency, 261.62, 1e-6);
        assert_approx_eq!(plan_note('a', 6).unwrap().frequency, 261.62, 1e-6);
        assert_approx_eq!(plan_note('a', 4).unwrap().frequency, 65.405, 1e-6);
    }

    #[test]
    fn non_ascii_characters_still_sound() {
        let plan = plan_note('ö', 5).unwrap();
        assert_eq!(plan.waveform, Waveform::Sine);
        assert!(plan.frequency > 0.0);
    }
}
