//! Commands sent from the control thread to the audio thread via ring buffer.

use crate::sched::PerformanceId;
use crate::voice::VoiceSpec;

/// Commands drained by the audio callback at the start of each block.
///
/// Ring order is the ordering guarantee: a `Release` only affects voices
/// spawned by commands that entered the ring before it.
#[derive(Debug)]
pub enum AudioCommand {
    /// Start a new voice (it begins sounding after its delay elapses).
    Spawn(VoiceSpec),

    /// Mix a pre-rendered mono buffer starting now (the pop effect).
    OneShot(Vec<f32>),

    /// Ramp every current voice of a performance to silence and hard-stop
    /// them `kill_after_secs` from now.
    Release {
        performance: PerformanceId,
        kill_after_secs: f64,
    },

    /// Ramp the master bus linearly from its current value to zero.
    MasterFade { secs: f64 },

    /// Snap the master bus to zero, then ramp to full over 50 ms.
    MasterReset,

    /// Drop all voices and one-shots immediately.
    StopAll,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Waveform;
    use ringbuf::{
        traits::{Consumer, Producer, Split},
        HeapRb,
    };

    fn spawn_cmd() -> AudioCommand {
        AudioCommand::Spawn(VoiceSpec {
            performance: Some(PerformanceId(7)),
            waveform: Waveform::Triangle,
            frequency: 440.0,
            gain: 0.5,
            delay: 0.0,
            attack: 0.02,
            decay: 0.4,
        })
    }

    #[test]
    fn commands_cross_the_ring_in_order() {
        let rb = HeapRb::<AudioCommand>::new(8);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(spawn_cmd()).unwrap();
        prod.try_push(AudioCommand::Release {
            performance: PerformanceId(7),
            kill_after_secs: 0.6,
        })
        .unwrap();
        prod.try_push(spawn_cmd()).unwrap();
        prod.try_push(AudioCommand::StopAll).unwrap();

        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::Spawn(_)));
        assert!(matches!(
            cons.try_pop().unwrap(),
            AudioCommand::Release { .. }
        ));
        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::Spawn(_)));
        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::StopAll));
        assert!(cons.try_pop().is_none());
    }

    #[test]
    fn one_shot_carries_samples() {
        let rb = HeapRb::<AudioCommand>::new(4);
        let (mut prod, mut cons) = rb.split();
        prod.try_push(AudioCommand::OneShot(vec![0.1, -0.1]))
            .unwrap();
        match cons.try_pop().unwrap() {
            AudioCommand::OneShot(samples) => assert_eq!(samples, vec![0.1, -0.1]),
            other => panic!("expected OneShot, got {other:?}"),
        }
    }
}
