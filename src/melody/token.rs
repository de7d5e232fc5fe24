//! Token types for parsed melody text.

/// Octave used when a note carries no digit modifier.
pub const DEFAULT_OCTAVE: u8 = 5;

/// One parsed unit of melody text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A sounding (or silent, for `.` and space) character with its effective
    /// octave.
    Note { character: char, octave: u8 },

    /// A trailing digit at end of input that never got a note to modify.
    /// Display-only; it never sounds.
    PendingDigit { character: char },

    /// A newline. Resets the timing position so following notes start over
    /// at offset zero, in parallel with earlier lines.
    LineBreak,
}

impl Token {
    /// Convenience constructor for a note at the default octave.
    pub fn note(character: char) -> Self {
        Token::Note {
            character,
            octave: DEFAULT_OCTAVE,
        }
    }

    /// Whether this token occupies a timing step when scheduled.
    pub fn is_step(&self) -> bool {
        matches!(self, Token::Note { .. })
    }
}
