//! Tone scheduler — token sequences → timed voice spawns, with per-
//! performance bookkeeping.
//!
//! The scheduler does **not** own audio hardware directly: it talks to an
//! [`AudioSink`], created lazily and dropped by [`ToneScheduler::stop_all_audio`].
//! When no sink can be opened every operation is a silent no-op. This keeps
//! all scheduling logic testable without a device.

pub mod offline;
pub mod plan;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::melody::Token;
use crate::voice::{render_pop, VoiceSpec, ATTACK_SECS};

pub use plan::{plan_note, NotePlan};

/// Seconds between consecutive steps of a sequence.
pub const STEP_SECS: f64 = 0.15;

/// Default decay for a committed word's notes.
pub const WORD_DECAY_SECS: f64 = 0.4;

/// Default decay for live typing feedback.
pub const TYPING_DECAY_SECS: f64 = 0.15;

/// Slack added after a note's decay before its bookkeeping entry expires,
/// and after a requested fade before released voices are hard-stopped.
const SLACK_SECS: f64 = 0.2;

/// Attenuation never drives gain below this multiplier.
const ATTENUATION_FLOOR: f64 = 0.4;

/// Attenuation lost per concurrently active note.
const ATTENUATION_PER_NOTE: f64 = 0.05;

/// Opaque identity of one performance — typically the owning word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerformanceId(pub u64);

/// The seam between the scheduler and the audio engine.
pub trait AudioSink {
    fn spawn(&mut self, spec: VoiceSpec);
    fn one_shot(&mut self, samples: Vec<f32>);
    fn release(&mut self, performance: PerformanceId, kill_after_secs: f64);
    fn master_fade(&mut self, secs: f64);
    fn master_reset(&mut self);
    fn stop_all(&mut self);
    fn sample_rate(&self) -> u32;
}

/// Opens a sink on demand; returns `None` when no backend is available.
pub type SinkFactory = Box<dyn FnMut() -> Option<Box<dyn AudioSink>>>;

/// A tracked note: its handle is just the time its bookkeeping expires.
#[derive(Debug, Clone, Copy)]
struct NoteHandle {
    expires_at: Instant,
}

/// Scheduler state: the sink, plus who is currently sounding what.
pub struct ToneScheduler {
    sink: Option<Box<dyn AudioSink>>,
    open_sink: SinkFactory,
    tracked: HashMap<PerformanceId, Vec<NoteHandle>>,
    untracked: Vec<NoteHandle>,
}

impl ToneScheduler {
    /// Scheduler that lazily opens the default cpal engine.
    pub fn new() -> Self {
        Self::with_factory(Box::new(|| {
            crate::audio::AudioEngine::new()
                .ok()
                .map(|engine| Box::new(engine) as Box<dyn AudioSink>)
        }))
    }

    /// Scheduler with a custom sink factory (used by tests and the offline
    /// paths).
    pub fn with_factory(open_sink: SinkFactory) -> Self {
        Self {
            sink: None,
            open_sink,
            tracked: HashMap::new(),
            untracked: Vec::new(),
        }
    }

    /// Schedule a token sequence for playback.
    ///
    /// Notes are spaced [`STEP_SECS`] apart; a [`Token::LineBreak`] resets
    /// the spacing to zero so lines overlap. Notes scheduled under
    /// `Some(id)` are tracked and can be stopped as a unit; `None` marks
    /// fire-and-forget typing feedback.
    pub fn schedule_sequence(
        &mut self,
        tokens: &[Token],
        performance: Option<PerformanceId>,
        volume: f64,
        decay: f64,
    ) {
        let now = Instant::now();
        self.prune(now);
        if !self.ensure_sink() {
            return;
        }

        let mut step = 0u32;
        for token in tokens {
            match token {
                Token::LineBreak => step = 0,
                Token::PendingDigit { .. } => {}
                Token::Note { character, octave } => {
                    let offset = f64::from(step) * STEP_SECS;
                    step += 1;

                    let Some(note) = plan_note(*character, *octave) else {
                        continue;
                    };

                    // Sampled once, before this note is registered, so each
                    // note in a dense sequence lands a little softer than
                    // the one before it.
                    let gain = volume * note.amplitude * self.attenuation();

                    let handle = NoteHandle {
                        expires_at: now
                            + Duration::from_secs_f64(offset + decay + SLACK_SECS),
                    };
                    match performance {
                        Some(id) => self.tracked.entry(id).or_default().push(handle),
                        None => self.untracked.push(handle),
                    }

                    if let Some(sink) = self.sink.as_mut() {
                        sink.spawn(VoiceSpec {
                            performance,
                            waveform: note.waveform,
                            frequency: note.frequency,
                            gain,
                            delay: offset,
                            attack: ATTACK_SECS,
                            decay,
                        });
                    }
                }
            }
        }
    }

    /// Stop a performance: fade its live notes over a fixed 0.2 s ramp and
    /// hard-stop them `fade_secs` + slack later. Removes the bookkeeping
    /// entry immediately; stopping an unknown id is a no-op.
    pub fn stop_performance(&mut self, id: PerformanceId, fade_secs: f64) {
        self.prune(Instant::now());
        if self.tracked.remove(&id).is_none() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.release(id, fade_secs + SLACK_SECS);
        }
    }

    /// Play the percussive pop used for delete/clear feedback.
    pub fn play_pop(&mut self) {
        if !self.ensure_sink() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            let samples = render_pop(sink.sample_rate());
            sink.one_shot(samples);
        }
    }

    /// Ramp the shared output bus to silence over `secs`.
    pub fn fade_out_master(&mut self, secs: f64) {
        if let Some(sink) = self.sink.as_mut() {
            sink.master_fade(secs);
        }
    }

    /// Snap the bus to zero, then ramp back to full over 50 ms.
    pub fn reset_master_volume(&mut self) {
        if !self.ensure_sink() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.master_reset();
        }
    }

    /// Tear the audio backend down entirely. The next sounding operation
    /// lazily reopens it.
    pub fn stop_all_audio(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.stop_all();
        }
        self.sink = None;
        self.tracked.clear();
        self.untracked.clear();
    }

    /// Number of notes currently sounding (tracked and untracked).
    pub fn active_note_count(&mut self) -> usize {
        self.prune(Instant::now());
        self.count_active()
    }

    /// Whether a performance currently has tracked notes.
    pub fn is_performing(&mut self, id: PerformanceId) -> bool {
        self.prune(Instant::now());
        self.tracked.contains_key(&id)
    }

    fn ensure_sink(&mut self) -> bool {
        if self.sink.is_none() {
            self.sink = (self.open_sink)();
        }
        self.sink.is_some()
    }

    fn count_active(&self) -> usize {
        self.tracked.values().map(Vec::len).sum::<usize>() + self.untracked.len()
    }

    fn attenuation(&self) -> f64 {
        let active = self.count_active() as f64;
        (1.0 - ATTENUATION_PER_NOTE * active).max(ATTENUATION_FLOOR)
    }

    /// Self-expiry: drop every handle whose scheduled stop time has passed.
    fn prune(&mut self, now: Instant) {
        self.untracked.retain(|h| h.expires_at > now);
        self.tracked.retain(|_, handles| {
            handles.retain(|h| h.expires_at > now);
            !handles.is_empty()
        });
    }
}

impl Default for ToneScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spacing-based length of a sequence in seconds: the widest line's step
/// count times [`STEP_SECS`]. Callers use this to time replays.
pub fn sequence_duration(tokens: &[Token]) -> f64 {
    let mut widest = 0u32;
    let mut step = 0u32;
    for token in tokens {
        match token {
            Token::LineBreak => step = 0,
            Token::Note { .. } => {
                step += 1;
                widest = widest.max(step);
            }
            Token::PendingDigit { .. } => {}
        }
    }
    f64::from(widest) * STEP_SECS
}
