//! Water quality bands
//!
//! Maps a 0-100 quality score to the three bands that drive the status badge
//! and the marker/history colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores at or above this are good
pub const GOOD_FROM: f64 = 60.0;

/// Scores at or above this (and not good) call for caution
pub const CAUTION_FROM: f64 = 40.0;

/// Qualitative band of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    /// 60 and above
    Good,
    /// 40 up to (not including) 60
    Caution,
    /// Below 40
    Poor,
}

/// Classify a score on the 0-100 scale.
///
/// Exactly 60 is good and exactly 40 is caution. Non-finite scores are poor.
pub fn classify(score: f64) -> QualityBand {
    if !score.is_finite() {
        QualityBand::Poor
    } else if score >= GOOD_FROM {
        QualityBand::Good
    } else if score >= CAUTION_FROM {
        QualityBand::Caution
    } else {
        QualityBand::Poor
    }
}

impl QualityBand {
    /// Classify a normalized `[0, 1]` reading
    pub fn from_normalized(normalized: f64) -> Self {
        classify(normalized * 100.0)
    }

    /// Color token for bar, marker and history points
    pub fn color(&self) -> &'static str {
        match self {
            QualityBand::Good => "#34C70A",
            QualityBand::Caution => "#FFD400",
            QualityBand::Poor => "#E51A1A",
        }
    }

    /// Text shown on the status badge
    pub fn badge_label(&self) -> &'static str {
        match self {
            QualityBand::Good => "Fresh",
            QualityBand::Caution => "Warning",
            QualityBand::Poor => "Urgent",
        }
    }

    /// Badge text color, dark on the yellow badge
    pub fn badge_text_color(&self) -> &'static str {
        match self {
            QualityBand::Caution => "#000000",
            QualityBand::Good | QualityBand::Poor => "#FFFFFF",
        }
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityBand::Good => "good",
            QualityBand::Caution => "caution",
            QualityBand::Poor => "poor",
        };
        f.write_str(name)
    }
}
