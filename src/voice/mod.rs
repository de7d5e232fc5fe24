//! Voice synthesis — oscillator and envelope primitives plus the per-note
//! voice state machine shared by the live audio thread and the offline
//! bounce.

pub mod envelope;
pub mod oscillator;
pub mod pop;
pub mod voice;

pub use envelope::PluckEnvelope;
pub use oscillator::{oscillator, Waveform};
pub use pop::render_pop;
pub use voice::{Voice, VoiceSpec};

/// Fixed envelope attack applied to every note.
pub const ATTACK_SECS: f64 = 0.02;

/// Near-zero gain floor the exponential decay approaches.
pub const MIN_GAIN: f64 = 0.001;

/// Fixed length of the linear kill ramp applied when a performance is
/// stopped early.
pub const RELEASE_SECS: f64 = 0.2;
