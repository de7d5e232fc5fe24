//! Pluck envelope — short linear attack, exponential decay toward a floor.
//!
//! This is the gain automation every note gets: ramp from silence to the peak
//! over the attack, then decay exponentially so that the level sits at
//! [`MIN_GAIN`](super::MIN_GAIN) when the decay duration has elapsed.

use super::MIN_GAIN;

/// Per-note gain envelope.
#[derive(Debug, Clone, Copy)]
pub struct PluckEnvelope {
    /// Attack length in seconds (linear ramp 0 → peak).
    pub attack: f64,
    /// Decay length in seconds (exponential ramp peak → floor).
    pub decay: f64,
    /// Target gain reached at the end of the attack.
    pub peak: f64,
}

impl PluckEnvelope {
    pub fn new(attack: f64, decay: f64, peak: f64) -> Self {
        Self {
            attack,
            decay,
            peak,
        }
    }

    /// Gain at time `t` seconds after the note starts.
    pub fn level(&self, t: f64) -> f64 {
        if t < 0.0 || self.peak <= 0.0 {
            return 0.0;
        }
        if t < self.attack {
            if self.attack <= 0.0 {
                return self.peak;
            }
            return self.peak * (t / self.attack);
        }
        if self.decay <= 0.0 {
            return 0.0;
        }
        let ratio = (MIN_GAIN / self.peak).min(1.0);
        let progress = (t - self.attack) / self.decay;
        self.peak * ratio.powf(progress)
    }

    /// Time after which the envelope has fully decayed to the floor.
    pub fn total_duration(&self) -> f64 {
        self.attack + self.decay
    }
}
