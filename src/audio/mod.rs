//! Audio engine — cpal output stream fed through a lock-free command ring.
//!
//! The engine lives on the control thread and owns the stream plus the ring
//! buffer producer; [`AudioCallback`] drains commands on the audio thread and
//! renders voices into the output. The engine is the crate's only contact
//! with audio hardware, and everything above it degrades to no-ops when no
//! device is available.

pub mod callback;
pub mod clip;
pub mod command;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapRb,
};

pub use clip::SoftClip;
pub use command::AudioCommand;

use crate::sched::{AudioSink, PerformanceId};
use crate::voice::VoiceSpec;
use callback::AudioCallback;

/// Ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 1024;

/// Audio engine errors.
#[derive(Debug)]
pub enum AudioError {
    /// No audio output device found.
    NoOutputDevice,
    /// Failed to query device configuration.
    DeviceConfig(String),
    /// Failed to build the audio stream.
    StreamBuild(String),
    /// Failed to start the audio stream.
    StreamPlay(String),
    /// Ring buffer is full — audio thread is not draining fast enough.
    BufferFull,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "no audio output device found"),
            AudioError::DeviceConfig(e) => write!(f, "device config error: {e}"),
            AudioError::StreamBuild(e) => write!(f, "stream build error: {e}"),
            AudioError::StreamPlay(e) => write!(f, "stream play error: {e}"),
            AudioError::BufferFull => write!(f, "audio command ring buffer is full"),
        }
    }
}

impl std::error::Error for AudioError {}

/// The audio engine. Owns the cpal stream and the ring buffer producer.
pub struct AudioEngine {
    // Held for its Drop: dropping the stream tears the device context down.
    _stream: cpal::Stream,
    producer: ringbuf::HeapProd<AudioCommand>,
    sample_rate: u32,
    channels: u16,
}

impl AudioEngine {
    /// Create and start the audio engine with the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let rb = HeapRb::<AudioCommand>::new(RING_BUFFER_CAPACITY);
        let (producer, consumer) = rb.split();

        let mut audio_callback = AudioCallback::new(consumer, channels, sample_rate);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            eprintln!("audio stream error: {err}");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    audio_callback.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            producer,
            sample_rate,
            channels,
        })
    }

    fn push(&mut self, command: AudioCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(command)
            .map_err(|_| AudioError::BufferFull)
    }

    /// Enqueue a voice.
    pub fn spawn_voice(&mut self, spec: VoiceSpec) -> Result<(), AudioError> {
        self.push(AudioCommand::Spawn(spec))
    }

    /// Enqueue a pre-rendered mono buffer.
    pub fn play_one_shot(&mut self, samples: Vec<f32>) -> Result<(), AudioError> {
        self.push(AudioCommand::OneShot(samples))
    }

    /// Ramp a performance's current voices out and hard-stop them later.
    pub fn release_performance(
        &mut self,
        performance: PerformanceId,
        kill_after_secs: f64,
    ) -> Result<(), AudioError> {
        self.push(AudioCommand::Release {
            performance,
            kill_after_secs,
        })
    }

    /// Ramp the master bus to silence.
    pub fn fade_master(&mut self, secs: f64) -> Result<(), AudioError> {
        self.push(AudioCommand::MasterFade { secs })
    }

    /// Snap the master bus to zero and ramp back to full.
    pub fn reset_master(&mut self) -> Result<(), AudioError> {
        self.push(AudioCommand::MasterReset)
    }

    /// Drop every live voice and one-shot.
    pub fn stop_everything(&mut self) -> Result<(), AudioError> {
        self.push(AudioCommand::StopAll)
    }

    /// Sample rate of the output stream.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// The scheduler talks to the engine through this seam; command failures
// (ring full) degrade to dropped sound, never errors.
impl AudioSink for AudioEngine {
    fn spawn(&mut self, spec: VoiceSpec) {
        let _ = self.spawn_voice(spec);
    }

    fn one_shot(&mut self, samples: Vec<f32>) {
        let _ = self.play_one_shot(samples);
    }

    fn release(&mut self, performance: PerformanceId, kill_after_secs: f64) {
        let _ = self.release_performance(performance, kill_after_secs);
    }

    fn master_fade(&mut self, secs: f64) {
        let _ = self.fade_master(secs);
    }

    fn master_reset(&mut self) {
        let _ = self.reset_master();
    }

    fn stop_all(&mut self) {
        let _ = self.stop_everything();
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires audio device — run manually with `cargo test -- --ignored`
    fn engine_creation() {
        let engine = AudioEngine::new();
        assert!(engine.is_ok(), "AudioEngine::new() failed: {:?}", engine.err());
        let engine = engine.unwrap();
        assert!(engine.sample_rate() > 0);
        assert!(engine.channels() > 0);
    }

    #[test]
    #[ignore] // Requires audio device
    fn engine_accepts_commands() {
        let mut engine = AudioEngine::new().expect("no audio device");
        assert!(engine
            .spawn_voice(VoiceSpec {
                performance: Some(PerformanceId(1)),
                waveform: crate::voice::Waveform::Sine,
                frequency: 440.0,
                gain: 0.2,
                delay: 0.0,
                attack: 0.02,
                decay: 0.1,
            })
            .is_ok());
        assert!(engine.fade_master(0.1).is_ok());
        assert!(engine.stop_everything().is_ok());
    }

    #[test]
    fn audio_error_display() {
        assert_eq!(
            AudioError::NoOutputDevice.to_string(),
            "no audio output device found"
        );
        assert_eq!(
            AudioError::BufferFull.to_string(),
            "audio command ring buffer is full"
        );
        assert_eq!(
            AudioError::StreamBuild("x".to_string()).to_string(),
            "stream build error: x"
        );
    }
}
