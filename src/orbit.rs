//! The orbit — committed words and their replay cadence.
//!
//! Every committed word keeps replaying its melody. Each word's cadence is
//! seeded from its own text, so the same word always orbits with the same
//! rhythm, whatever else is playing around it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::melody::{parse, Token};
use crate::sched::{sequence_duration, PerformanceId};

/// Quiet gap added between a word's replays, low..high seconds.
const REST_RANGE_SECS: (f64, f64) = (2.0, 6.0);

/// One committed word.
pub struct OrbitWord {
    pub text: String,
    pub id: PerformanceId,
    tokens: Vec<Token>,
    rng: ChaCha8Rng,
    next_play: Instant,
}

impl OrbitWord {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn reschedule(&mut self, now: Instant) {
        let gap = self.rng.gen_range(REST_RANGE_SECS.0..REST_RANGE_SECS.1);
        let period = sequence_duration(&self.tokens) + gap;
        self.next_play = now + Duration::from_secs_f64(period);
    }
}

/// All committed words, with monotonically increasing performance ids.
pub struct Orbit {
    words: Vec<OrbitWord>,
    next_id: u64,
}

impl Orbit {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            next_id: 1,
        }
    }

    /// Commit a word. Returns its performance id; the caller plays the first
    /// pass itself, replays are produced by [`Orbit::due`].
    pub fn commit(&mut self, text: &str, now: Instant) -> PerformanceId {
        let id = PerformanceId(self.next_id);
        self.next_id += 1;

        let mut word = OrbitWord {
            text: text.to_string(),
            id,
            tokens: parse(text),
            rng: ChaCha8Rng::seed_from_u64(word_seed(text)),
            next_play: now,
        };
        word.reschedule(now);
        self.words.push(word);
        id
    }

    /// Words whose replay time has come. Each is rescheduled for its next
    /// pass.
    pub fn due(&mut self, now: Instant) -> Vec<(PerformanceId, Vec<Token>)> {
        let mut ready = Vec::new();
        for word in &mut self.words {
            if word.next_play <= now {
                ready.push((word.id, word.tokens.clone()));
                word.reschedule(now);
            }
        }
        ready
    }

    /// Remove and return the most recently committed word.
    pub fn remove_last(&mut self) -> Option<OrbitWord> {
        self.words.pop()
    }

    /// Drop every word, returning their ids so the caller can stop them.
    pub fn clear(&mut self) -> Vec<PerformanceId> {
        self.words.drain(..).map(|w| w.id).collect()
    }

    pub fn words(&self) -> &[OrbitWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new()
    }
}

fn word_seed(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
