//! Per-session comparison loop.
//!
//! One [`ComparisonSession`] exists per active coaching session. It owns the
//! pieces the stateless comparator cannot: the reference recording, the
//! configured weights, and the score smoother whose "previous value" must
//! persist across ticks. The hosting application drives it at whatever
//! cadence new detections arrive; the session itself enforces no rate.

use thiserror::Error;
use tracing::{debug, trace};

use crate::compare::{compare_poses, CompareConfig, ConfigError};
use crate::reference::ReferenceSequence;
use crate::smoothing::{Language, ScoreLabel, ScoreSmoother};
use crate::types::{ComparisonResult, Keypoint};
use crate::DEFAULT_SMOOTHING_FACTOR;

/// Session-level configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Parameters forwarded to every comparison
    pub compare: CompareConfig,
    /// EMA smoothing factor applied to the score stream
    pub smoothing_factor: f32,
    /// Whether reference playback wraps around at the end
    pub looped: bool,
    /// Locale for label display text
    pub language: Language,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            compare: CompareConfig::default(),
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            looped: true,
            language: Language::default(),
        }
    }
}

/// Errors raised when constructing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The reference recording holds no frames to compare against
    #[error("reference sequence has no frames")]
    EmptyReference,
    /// The comparison configuration is defective
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Everything produced by one evaluation tick.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionUpdate {
    /// Full comparison output for this tick
    pub comparison: ComparisonResult,
    /// Timestamp of the reference frame that was compared against
    pub reference_timestamp_ms: u64,
    /// Smoothed overall score after this tick
    pub smoothed_score: f32,
    /// Qualitative rating of the smoothed score
    pub label: ScoreLabel,
    /// Display text for the label in the session's locale
    pub label_text: &'static str,
}

/// Live comparison loop over one reference recording.
#[derive(Debug)]
pub struct ComparisonSession {
    reference: ReferenceSequence,
    config: SessionConfig,
    smoother: ScoreSmoother,
}

impl ComparisonSession {
    /// Creates a session over a reference recording.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyReference`] for a recording without
    /// frames, or [`SessionError::InvalidConfig`] when the comparison
    /// configuration would silently degrade (surfacing misconfiguration is
    /// the caller's job; the comparator itself never fails on it).
    pub fn new(
        reference: ReferenceSequence,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if reference.is_empty() {
            return Err(SessionError::EmptyReference);
        }
        config.compare.validate()?;

        debug!(
            frames = reference.len(),
            duration_ms = reference.duration_ms(),
            looped = config.looped,
            "starting comparison session"
        );

        Ok(Self {
            reference,
            config,
            smoother: ScoreSmoother::new(config.smoothing_factor),
        })
    }

    /// Runs one evaluation tick.
    ///
    /// Selects the reference frame for `elapsed_ms`, compares the user's
    /// keypoints against it, and feeds the overall score through the
    /// smoother exactly once. Returns `None` when no keypoints were
    /// detected this tick; smoother state is left untouched in that case so
    /// a brief detection dropout does not distort the stream.
    pub fn tick(&mut self, user: &[Keypoint], elapsed_ms: u64) -> Option<SessionUpdate> {
        if user.is_empty() {
            trace!(elapsed_ms, "tick skipped, no keypoints detected");
            return None;
        }

        let frame = self.reference.frame_at(elapsed_ms, self.config.looped)?;
        let reference_timestamp_ms = frame.timestamp_ms;
        let comparison = compare_poses(user, &frame.keypoints, &self.config.compare);

        let smoothed_score = self.smoother.update(comparison.overall_score);
        let label = ScoreLabel::from_score(smoothed_score);

        trace!(
            elapsed_ms,
            reference_timestamp_ms,
            raw_score = comparison.overall_score,
            smoothed_score,
            label = label.as_str(),
            "scored tick"
        );

        Some(SessionUpdate {
            comparison,
            reference_timestamp_ms,
            smoothed_score,
            label,
            label_text: label.text(self.config.language),
        })
    }

    /// Clears smoother state, as when the user switches exercises.
    pub fn reset(&mut self) {
        debug!("resetting comparison session");
        self.smoother.reset();
    }

    /// Returns the last smoothed score, if any tick has completed.
    #[must_use]
    pub fn smoothed_score(&self) -> Option<f32> {
        self.smoother.last()
    }

    /// Returns the reference recording this session compares against.
    #[must_use]
    pub fn reference(&self) -> &ReferenceSequence {
        &self.reference
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
