//! Reference pose playback lookup.
//!
//! A reference recording is a collection of timestamped pose frames. The
//! comparison loop replays it against a virtual clock: given the elapsed
//! time since playback started, the sequence yields the frame the coach
//! would be showing at that instant, optionally looping when the recording
//! runs out.

use crate::types::PoseFrame;

/// A reference pose recording, sorted ascending by timestamp.
///
/// Construction takes ownership of an unordered frame collection and sorts
/// it once; lookups afterwards are read-only and cheap.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    frames: Vec<PoseFrame>,
}

impl ReferenceSequence {
    /// Creates a sequence from an unordered collection of frames.
    #[must_use]
    pub fn new(mut frames: Vec<PoseFrame>) -> Self {
        frames.sort_by_key(|frame| frame.timestamp_ms);
        Self { frames }
    }

    /// Returns the sorted frames.
    #[must_use]
    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the sequence holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total playback duration in milliseconds, never less than 1 so that
    /// modulo arithmetic over it is always defined.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) if self.frames.len() > 1 => {
                (last.timestamp_ms - first.timestamp_ms).max(1)
            }
            _ => 1,
        }
    }

    /// Selects the frame being shown at `elapsed_ms` into playback.
    ///
    /// Elapsed time wraps modulo the total duration when `looped`, and
    /// saturates at the final frame otherwise. The selected frame is the
    /// last one whose timestamp is at or before the resulting instant; if
    /// none qualifies, or the sequence has fewer than two frames, the first
    /// frame is used. Returns `None` only for an empty sequence.
    #[must_use]
    pub fn frame_at(&self, elapsed_ms: u64, looped: bool) -> Option<&PoseFrame> {
        let first = self.frames.first()?;
        if self.frames.len() == 1 {
            return Some(first);
        }

        let duration = self.duration_ms();
        let offset = if looped {
            elapsed_ms % duration
        } else {
            elapsed_ms.min(duration)
        };
        let instant = first.timestamp_ms + offset;

        let frame = self
            .frames
            .iter()
            .rev()
            .find(|frame| frame.timestamp_ms <= instant)
            .unwrap_or(first);
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Keypoint, KeypointName};

    fn frame(timestamp_ms: u64) -> PoseFrame {
        PoseFrame::new(
            timestamp_ms,
            vec![Keypoint::named(KeypointName::Nose, 0.5, 0.1, 0.9)],
        )
    }

    fn sequence() -> ReferenceSequence {
        // Deliberately unordered input
        ReferenceSequence::new(vec![frame(2000), frame(0), frame(1000), frame(3000)])
    }

    #[test]
    fn test_construction_sorts_frames() {
        let timestamps: Vec<u64> = sequence()
            .frames()
            .iter()
            .map(|frame| frame.timestamp_ms)
            .collect();
        assert_eq!(timestamps, vec![0, 1000, 2000, 3000]);
    }

    #[test]
    fn test_empty_sequence_has_no_frame() {
        let empty = ReferenceSequence::new(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.frame_at(0, true).is_none());
        assert_eq!(empty.duration_ms(), 1);
    }

    #[test]
    fn test_single_frame_always_selected() {
        let single = ReferenceSequence::new(vec![frame(500)]);
        for elapsed in [0, 250, 500, 10_000] {
            assert_eq!(single.frame_at(elapsed, true).unwrap().timestamp_ms, 500);
            assert_eq!(single.frame_at(elapsed, false).unwrap().timestamp_ms, 500);
        }
    }

    #[test]
    fn test_selects_last_frame_at_or_before_elapsed() {
        let seq = sequence();
        assert_eq!(seq.frame_at(0, false).unwrap().timestamp_ms, 0);
        assert_eq!(seq.frame_at(999, false).unwrap().timestamp_ms, 0);
        assert_eq!(seq.frame_at(1000, false).unwrap().timestamp_ms, 1000);
        assert_eq!(seq.frame_at(2500, false).unwrap().timestamp_ms, 2000);
        assert_eq!(seq.frame_at(3000, false).unwrap().timestamp_ms, 3000);
    }

    #[test]
    fn test_saturates_past_the_end_without_looping() {
        let seq = sequence();
        assert_eq!(seq.frame_at(99_999, false).unwrap().timestamp_ms, 3000);
    }

    #[test]
    fn test_loops_modulo_duration() {
        let seq = sequence();
        assert_eq!(seq.duration_ms(), 3000);
        // One full cycle later the playback is back at the start
        assert_eq!(seq.frame_at(3000, true).unwrap().timestamp_ms, 0);
        assert_eq!(seq.frame_at(3000 + 1500, true).unwrap().timestamp_ms, 1000);
        assert_eq!(seq.frame_at(2 * 3000 + 2999, true).unwrap().timestamp_ms, 2000);
    }

    #[test]
    fn test_nonzero_first_timestamp() {
        let seq = ReferenceSequence::new(vec![frame(10_000), frame(11_000), frame(12_000)]);
        assert_eq!(seq.duration_ms(), 2000);
        // Elapsed time is relative to playback start, not to raw timestamps
        assert_eq!(seq.frame_at(0, true).unwrap().timestamp_ms, 10_000);
        assert_eq!(seq.frame_at(1200, true).unwrap().timestamp_ms, 11_000);
        assert_eq!(seq.frame_at(2100, true).unwrap().timestamp_ms, 10_000);
    }
}
