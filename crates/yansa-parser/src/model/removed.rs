//! Audit records for text removed before tokenization.

use serde::{Deserialize, Serialize};

/// Float-based confidence score (0.0-1.0).
///
/// Attached to every removed token so a reviewer can tell a resolution tag
/// (almost always noise) from a misc marker (occasionally a real word).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Default for Confidence {
    fn default() -> Self {
        Self::CERTAIN
    }
}

impl Confidence {
    /// Synthetic records such as the underscore review flag.
    pub const CERTAIN: Confidence = Confidence(1.0);

    /// Resolution markers (`720p`, `4K`).
    pub const RESOLUTION: Confidence = Confidence(0.95);

    /// Quality markers (`HD`, `UHD`).
    pub const QUALITY: Confidence = Confidence(0.9);

    /// Source markers (`WEB-DL`, `DVDRip`).
    pub const SOURCE: Confidence = Confidence(0.85);

    /// Format markers (`3D-SBS`).
    pub const FORMAT: Confidence = Confidence(0.8);

    /// Everything else from the misc list.
    pub const MISC: Confidence = Confidence(0.75);

    /// Creates a new confidence value, clamping to the valid range [0.0, 1.0].
    ///
    /// # Example
    /// ```
    /// # use yansa_parser::model::Confidence;
    /// let conf = Confidence::new(0.85);
    /// assert_eq!(conf.value(), 0.85);
    ///
    /// let clamped = Confidence::new(1.5);
    /// assert_eq!(clamped.value(), 1.0);
    /// ```
    pub fn new(value: f32) -> Self {
        Confidence(value.clamp(0.0, 1.0))
    }

    /// Returns the raw confidence value.
    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Something the pre-tokenizer took out of the filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedToken {
    pub value: String,
    /// `"<kind>_<marker>"` for early-removal hits, `whitespace_handling`
    /// for the underscore review flag.
    pub category: String,
    /// Byte offset in the string as it stood when the removal happened.
    pub position: usize,
    pub confidence: Confidence,
}

impl RemovedToken {
    /// Value of the synthetic record that asks for manual review.
    pub const REVIEW_FLAG: &'static str = "REVIEW_FLAG";

    /// The record emitted when underscores next to whitespace were deleted.
    pub fn review_flag() -> Self {
        Self {
            value: Self::REVIEW_FLAG.to_string(),
            category: "whitespace_handling".to_string(),
            position: 0,
            confidence: Confidence::CERTAIN,
        }
    }

    pub fn is_review_flag(&self) -> bool {
        self.value == Self::REVIEW_FLAG && self.category == "whitespace_handling"
    }
}
