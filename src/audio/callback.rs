//! Audio callback — runs on the cpal audio thread.
//!
//! Drains commands from the ring buffer, mixes all live voices and one-shot
//! buffers, applies the master gain automation and the output clipper. All
//! state here is touched only from the audio thread.

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use crate::voice::Voice;

use super::clip::SoftClip;
use super::command::AudioCommand;

/// Length of the ramp used by a master reset.
const RESET_RAMP_SECS: f64 = 0.05;

/// Master bus gain with linear ramp automation.
#[derive(Debug)]
pub struct MasterGain {
    value: f32,
    target: f32,
    remaining: u64,
    step: f32,
    sample_rate: f64,
}

impl MasterGain {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            value: 1.0,
            target: 1.0,
            remaining: 0,
            step: 0.0,
            sample_rate: f64::from(sample_rate),
        }
    }

    /// Current gain value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Ramp linearly from the current value to `target` over `secs`.
    pub fn ramp_to(&mut self, target: f32, secs: f64) {
        let frames = (secs * self.sample_rate).round().max(1.0) as u64;
        self.target = target;
        self.remaining = frames;
        self.step = (target - self.value) / frames as f32;
    }

    /// Jump to `value` with no ramp.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.remaining = 0;
        self.step = 0.0;
    }

    /// Advance one frame and return the gain to apply.
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.value += self.step;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.value = self.target;
            }
        }
        self.value
    }
}

/// A pre-rendered mono buffer being mixed out.
struct OneShot {
    samples: Vec<f32>,
    pos: usize,
}

/// State that lives on the audio thread. Accessed only from the cpal
/// callback.
pub struct AudioCallback {
    consumer: HeapCons<AudioCommand>,
    voices: Vec<Voice>,
    one_shots: Vec<OneShot>,
    master: MasterGain,
    clip: SoftClip,
    channels: u16,
    sample_rate: u32,
}

impl AudioCallback {
    pub fn new(consumer: HeapCons<AudioCommand>, channels: u16, sample_rate: u32) -> Self {
        Self {
            consumer,
            voices: Vec::new(),
            one_shots: Vec::new(),
            master: MasterGain::new(sample_rate),
            clip: SoftClip::default(),
            channels,
            sample_rate,
        }
    }

    /// Called by cpal for each output block.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.consumer.try_pop() {
            match cmd {
                AudioCommand::Spawn(spec) => {
                    self.voices.push(Voice::from_spec(&spec, self.sample_rate));
                }
                AudioCommand::OneShot(samples) => {
                    self.one_shots.push(OneShot { samples, pos: 0 });
                }
                AudioCommand::Release {
                    performance,
                    kill_after_secs,
                } => {
                    for voice in self
                        .voices
                        .iter_mut()
                        .filter(|v| v.performance() == Some(performance))
                    {
                        voice.release(kill_after_secs);
                    }
                }
                AudioCommand::MasterFade { secs } => {
                    self.master.ramp_to(0.0, secs);
                }
                AudioCommand::MasterReset => {
                    self.master.snap(0.0);
                    self.master.ramp_to(1.0, RESET_RAMP_SECS);
                }
                AudioCommand::StopAll => {
                    self.voices.clear();
                    self.one_shots.clear();
                }
            }
        }

        output.fill(0.0);

        for voice in &mut self.voices {
            voice.render(output, self.channels);
        }
        self.voices.retain(|v| !v.is_finished());

        let channels = self.channels.max(1) as usize;
        for shot in &mut self.one_shots {
            for frame in output.chunks_mut(channels) {
                if shot.pos >= shot.samples.len() {
                    break;
                }
                let sample = shot.samples[shot.pos];
                for slot in frame {
                    *slot += sample;
                }
                shot.pos += 1;
            }
        }
        self.one_shots.retain(|s| s.pos < s.samples.len());

        for frame in output.chunks_mut(channels) {
            let gain = self.master.advance();
            for slot in frame {
                *slot *= gain;
            }
        }

        self.clip.process_block(output);
    }

    /// Number of live (spawned, unfinished) voices.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}
