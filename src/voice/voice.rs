//! The per-note voice — a small state machine the audio thread steps through
//! sample by sample.
//!
//! A [`VoiceSpec`] is the control-thread description of one scheduled note; a
//! [`Voice`] is its running form: delay countdown, oscillator phase, envelope
//! position, and (after an early stop) a linear kill ramp.

use crate::sched::PerformanceId;

use super::envelope::PluckEnvelope;
use super::oscillator::{oscillator, Waveform};
use super::RELEASE_SECS;

/// Control-side description of one note to sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    /// Performance this note belongs to; `None` for untracked typing blips.
    pub performance: Option<PerformanceId>,
    pub waveform: Waveform,
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak gain after attack, volume and attenuation already applied.
    pub gain: f64,
    /// Seconds from "now" until the note starts sounding.
    pub delay: f64,
    /// Attack length in seconds.
    pub attack: f64,
    /// Decay length in seconds.
    pub decay: f64,
}

/// Early-stop ramp state.
#[derive(Debug, Clone, Copy)]
struct Release {
    from_level: f64,
    ramp_total: u64,
    ramp_remaining: u64,
    kill_remaining: u64,
}

/// A sounding (or about-to-sound) note on the audio thread.
#[derive(Debug)]
pub struct Voice {
    performance: Option<PerformanceId>,
    waveform: Waveform,
    phase_step: f64,
    envelope: PluckEnvelope,
    sample_rate: f64,
    delay_remaining: u64,
    position: u64,
    end_position: u64,
    phase: f64,
    release: Option<Release>,
    finished: bool,
}

impl Voice {
    /// Build a running voice from its spec at the given sample rate.
    pub fn from_spec(spec: &VoiceSpec, sample_rate: u32) -> Self {
        let sr = f64::from(sample_rate);
        let envelope = PluckEnvelope::new(spec.attack, spec.decay, spec.gain);
        Self {
            performance: spec.performance,
            waveform: spec.waveform,
            phase_step: spec.frequency / sr,
            envelope,
            sample_rate: sr,
            delay_remaining: (spec.delay * sr).round() as u64,
            position: 0,
            end_position: (envelope.total_duration() * sr).ceil() as u64,
            phase: 0.0,
            release: None,
            finished: false,
        }
    }

    /// Performance this voice belongs to.
    pub fn performance(&self) -> Option<PerformanceId> {
        self.performance
    }

    /// Whether the voice has ended (naturally or via kill ramp) and can be
    /// dropped.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Begin the early-stop ramp: snapshot the current level, ramp linearly
    /// to silence over [`RELEASE_SECS`], and hard-stop `kill_after_secs`
    /// from now.
    ///
    /// A voice still inside its start delay has nothing sounding to ramp; it
    /// is dropped immediately.
    pub fn release(&mut self, kill_after_secs: f64) {
        if self.release.is_some() {
            return;
        }
        if self.delay_remaining > 0 {
            self.finished = true;
            return;
        }
        let t = self.position as f64 / self.sample_rate;
        let ramp = (RELEASE_SECS * self.sample_rate).round().max(1.0) as u64;
        self.release = Some(Release {
            from_level: self.envelope.level(t),
            ramp_total: ramp,
            ramp_remaining: ramp,
            kill_remaining: (kill_after_secs * self.sample_rate).round() as u64,
        });
    }

    fn current_level(&mut self) -> f64 {
        match &mut self.release {
            Some(release) => {
                if release.kill_remaining == 0 {
                    self.finished = true;
                    return 0.0;
                }
                release.kill_remaining -= 1;
                if release.ramp_remaining == 0 {
                    return 0.0;
                }
                release.ramp_remaining -= 1;
                release.from_level * release.ramp_remaining as f64 / release.ramp_total as f64
            }
            None => {
                if self.position >= self.end_position {
                    self.finished = true;
                    return 0.0;
                }
                self.envelope.level(self.position as f64 / self.sample_rate)
            }
        }
    }

    /// Mix this voice additively into an interleaved output buffer.
    pub fn render(&mut self, out: &mut [f32], channels: u16) {
        let channels = channels.max(1) as usize;
        for frame in out.chunks_mut(channels) {
            if self.finished {
                return;
            }
            if self.delay_remaining > 0 {
                self.delay_remaining -= 1;
                continue;
            }

            let level = self.current_level();
            if level > 0.0 {
                let sample = (oscillator(self.waveform, self.phase) * level) as f32;
                for slot in frame {
                    *slot += sample;
                }
            }

            self.phase = (self.phase + self.phase_step).fract();
            self.position += 1;
        }
    }
}
