//! Full-screen hit flash
//!
//! A sequence of one or more white pulses. Each pulse follows a half-sine
//! envelope over `flash_duration_ms`; consecutive pulses are separated by a
//! dark gap of `flash_gap_ms`. Time advances a fixed `flash_frame_ms` per
//! frame so the sequence length is a whole number of frames.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Outcome of advancing a flash sequence by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    /// A pulse is in progress
    Pulsing,
    /// Between pulses
    Gap,
    /// The gap ended and a new pulse began this frame
    PulseStarted,
    /// The last pulse completed; the sequence is over
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashSequence {
    /// Time into the current pulse
    elapsed_ms: f32,
    /// Time into the current gap (0 when not in a gap)
    gap_ms: f32,
    /// Pulses that have fully played
    completed: u32,
    /// Pulses to play in total
    total: u32,
}

impl FlashSequence {
    /// A single pulse, used for ordinary hits
    pub fn single() -> Self {
        Self::repeated(1)
    }

    pub fn repeated(total: u32) -> Self {
        Self {
            elapsed_ms: 0.0,
            gap_ms: 0.0,
            completed: 0,
            total: total.max(1),
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn in_gap(&self) -> bool {
        self.gap_ms > 0.0
    }

    pub fn advance(&mut self, tuning: &Tuning) -> FlashStep {
        if self.in_gap() {
            self.gap_ms += tuning.flash_frame_ms;
            if self.gap_ms >= tuning.flash_gap_ms {
                self.gap_ms = 0.0;
                self.elapsed_ms = 0.0;
                return FlashStep::PulseStarted;
            }
            return FlashStep::Gap;
        }

        self.elapsed_ms += tuning.flash_frame_ms;
        if self.elapsed_ms < tuning.flash_duration_ms {
            return FlashStep::Pulsing;
        }

        self.completed += 1;
        if self.completed >= self.total {
            FlashStep::Finished
        } else {
            // Gap time counts from the frame that ended the pulse
            self.gap_ms = tuning.flash_frame_ms;
            FlashStep::Gap
        }
    }

    /// Overlay opacity for the current frame
    pub fn alpha(&self, tuning: &Tuning) -> f32 {
        if self.in_gap() {
            return 0.0;
        }
        let progress = (self.elapsed_ms / tuning.flash_duration_ms).clamp(0.0, 1.0);
        (progress * std::f32::consts::PI).sin() * tuning.flash_max_alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(flash: &mut FlashSequence, tuning: &Tuning) -> (u32, u32) {
        let mut frames = 0;
        let mut pulses = 1;
        loop {
            frames += 1;
            match flash.advance(tuning) {
                FlashStep::PulseStarted => pulses += 1,
                FlashStep::Finished => return (frames, pulses),
                _ => {}
            }
            assert!(frames < 10_000, "flash never finished");
        }
    }

    #[test]
    fn test_single_flash_length() {
        let tuning = Tuning::default();
        let mut flash = FlashSequence::single();
        let (frames, pulses) = run_to_end(&mut flash, &tuning);
        // 120ms at 16ms/frame
        assert_eq!(frames, 8);
        assert_eq!(pulses, 1);
        assert_eq!(flash.completed(), 1);
    }

    #[test]
    fn test_terminal_sequence_pulses() {
        let tuning = Tuning::default();
        let mut flash = FlashSequence::repeated(5);
        let (frames, pulses) = run_to_end(&mut flash, &tuning);
        assert_eq!(pulses, 5);
        // 5 pulses of 8 frames, 4 gaps of 9 frames
        assert_eq!(frames, 5 * 8 + 4 * 9);
    }

    #[test]
    fn test_alpha_envelope() {
        let tuning = Tuning::default();
        let mut flash = FlashSequence::single();
        assert_eq!(flash.alpha(&tuning), 0.0);

        let mut peak: f32 = 0.0;
        for _ in 0..7 {
            flash.advance(&tuning);
            let alpha = flash.alpha(&tuning);
            assert!((0.0..=tuning.flash_max_alpha).contains(&alpha));
            peak = peak.max(alpha);
        }
        assert!(peak > 0.9);
    }

    #[test]
    fn test_gap_is_dark() {
        let tuning = Tuning::default();
        let mut flash = FlashSequence::repeated(2);
        for _ in 0..8 {
            flash.advance(&tuning);
        }
        assert!(flash.in_gap());
        assert_eq!(flash.alpha(&tuning), 0.0);
    }
}
