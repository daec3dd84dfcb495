//! Temporal score smoothing and qualitative labels.
//!
//! Raw per-tick scores jitter with detection noise. An exponential moving
//! average damps the stream before display, and a small label mapper turns
//! the smoothed value into coaching feedback text.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::clamp;

/// Applies one step of exponential moving average to a score stream.
///
/// `alpha` is clamped to [0.01, 1] and `next` to [0, 100]. The first sample
/// (absent `previous`) passes through unsmoothed. Repeated application with
/// a constant `next` converges monotonically toward it without overshoot.
#[must_use]
pub fn exponential_moving_average(previous: Option<f32>, next: f32, alpha: f32) -> f32 {
    let clamped_alpha = clamp(alpha, 0.01, 1.0);
    let clamped_next = clamp(next, 0.0, 100.0);

    match previous {
        None => clamped_next,
        Some(previous) => clamp(
            previous + clamped_alpha * (clamped_next - previous),
            0.0,
            100.0,
        ),
    }
}

/// Stateful smoother for one comparison session's score stream.
///
/// Owns the "previous score" so the calling loop does not have to. One
/// instance per active session; sharing across concurrent sessions needs
/// external synchronization.
#[derive(Debug, Clone)]
pub struct ScoreSmoother {
    alpha: f32,
    previous: Option<f32>,
}

impl ScoreSmoother {
    /// Creates a smoother with the given smoothing factor.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            previous: None,
        }
    }

    /// Feeds the next raw score and returns the smoothed value.
    pub fn update(&mut self, next: f32) -> f32 {
        let smoothed = exponential_moving_average(self.previous, next, self.alpha);
        self.previous = Some(smoothed);
        smoothed
    }

    /// Returns the last smoothed value, if any sample has been seen.
    #[must_use]
    pub fn last(&self) -> Option<f32> {
        self.previous
    }

    /// Forgets accumulated state; the next sample passes through unsmoothed.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Two-valued locale flag for label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Language {
    /// English
    En,
    /// Japanese
    #[default]
    Ja,
}

/// Qualitative rating of a smoothed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoreLabel {
    /// Score of 90 or above
    Excellent,
    /// Score in [75, 90)
    Good,
    /// Score in [55, 75)
    Fair,
    /// Anything below 55
    NeedsWork,
}

impl ScoreLabel {
    /// Maps a score to its label. The score is clamped to [0, 100] first.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        let safe_score = clamp(score, 0.0, 100.0);

        if safe_score >= 90.0 {
            Self::Excellent
        } else if safe_score >= 75.0 {
            Self::Good
        } else if safe_score >= 55.0 {
            Self::Fair
        } else {
            Self::NeedsWork
        }
    }

    /// Returns the stable identifier for this label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsWork => "needs_work",
        }
    }

    /// Returns display text for this label in the given language.
    #[must_use]
    pub fn text(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Excellent, Language::En) => "Excellent",
            (Self::Good, Language::En) => "Good",
            (Self::Fair, Language::En) => "Fair",
            (Self::NeedsWork, Language::En) => "Needs Work",
            (Self::Excellent, Language::Ja) => "素晴らしい",
            (Self::Good, Language::Ja) => "良好",
            (Self::Fair, Language::Ja) => "まずまず",
            (Self::NeedsWork, Language::Ja) => "要改善",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
