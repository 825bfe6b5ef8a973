/*!
 * Output format emitters.
 *
 * Every emitter consumes an `AlignedSequence` together with the resolved
 * `RenderConfig` and produces one artifact (or, for images, one artifact per
 * entry):
 * - `styled_track`: Advanced SubStation Alpha with stacked ruby runs
 * - `image_layout` / `raster`: per-sentence layouts and PNG images
 * - `phonetic_track`: romanized SRT
 * - `timeline`: XMEML project referencing the images
 */

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod color;
pub mod image_layout;
pub mod phonetic_track;
pub mod raster;
pub mod styled_track;
pub mod timeline;

pub use color::Color;
pub use image_layout::{EstimatedMetrics, SentenceLayout, TextExtent, TextMeasure};
pub use phonetic_track::emit_phonetic_track;
pub use raster::{GlyphRenderer, render_images};
pub use styled_track::emit_styled_track;
pub use timeline::emit_timeline;

/// Output formats that can be produced from an aligned sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Ass,
    Images,
    Romaji,
    Timeline,
}

impl OutputFormat {
    /// Stage name used in error messages
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Ass => "emit styled track",
            Self::Images => "emit images",
            Self::Romaji => "emit phonetic track",
            Self::Timeline => "emit timeline",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ass => "ass",
            Self::Images => "images",
            Self::Romaji => "romaji",
            Self::Timeline => "timeline",
        };
        write!(f, "{}", name)
    }
}
