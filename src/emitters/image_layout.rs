/*!
 * Image layout for rendered subtitle sentences.
 *
 * The layout is computed independently of any pixel drawing: base runs are
 * laid out left to right with a fixed spacing, the whole line is centred on
 * the canvas, and each reading is centred over its own base run. The result
 * can be rasterized (see `raster`) or written out as a JSON descriptor for an
 * external renderer.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::alignment::{AlignedEntry, AlignedSequence};
use crate::app_config::RenderConfig;
use crate::file_utils::FileManager;

/// Horizontal gap after every base run, in px
pub const SEGMENT_SPACING: f32 = 20.0;

/// Width and height of a measured text run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Text measurement used by the layout
pub trait TextMeasure {
    /// Extent of `text` rendered at `font_size` px
    fn measure(&self, text: &str, font_size: f32) -> TextExtent;
}

/// Font-free measurement: full-width glyphs are one em, half-width ones half
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMeasure for EstimatedMetrics {
    fn measure(&self, text: &str, font_size: f32) -> TextExtent {
        let ems: f32 = text
            .chars()
            .map(|c| if is_half_width(c) { 0.5 } else { 1.0 })
            .sum();

        TextExtent {
            width: ems * font_size,
            height: if text.is_empty() { 0.0 } else { font_size },
        }
    }
}

fn is_half_width(c: char) -> bool {
    c.is_ascii() || ('\u{ff61}'..='\u{ff9f}').contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Base,
    Reading,
}

/// A positioned run of text; `x`/`y` is the top-left corner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedRun {
    pub kind: RunKind,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

/// Layout of one aligned entry on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceLayout {
    pub index: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub line_width: f32,
    pub runs: Vec<PlacedRun>,
}

/// `sentence_<index>.<extension>`
pub fn artifact_name(index: usize, extension: &str) -> String {
    format!("sentence_{}.{}", index, extension)
}

/// Lay out one entry
pub fn layout_entry(entry: &AlignedEntry, config: &RenderConfig, measure: &dyn TextMeasure) -> SentenceLayout {
    let base_size = config.base_font_size as f32;
    let reading_size = config.reading_font_size as f32;
    let segments = entry.unit.segments();

    let base_extents: Vec<TextExtent> = segments
        .iter()
        .map(|segment| measure.measure(&segment.base, base_size))
        .collect();
    let line_width: f32 = base_extents.iter().map(|e| e.width + SEGMENT_SPACING).sum();

    let mut x = ((config.canvas_width as f32 - line_width) / 2.0).floor();
    let y = config.canvas_height.saturating_sub(config.vertical_margin) as f32;
    let mut runs = Vec::with_capacity(segments.len() * 2);

    for (segment, base) in segments.iter().zip(&base_extents) {
        if let Some(reading) = &segment.reading {
            let extent = measure.measure(reading, reading_size);
            runs.push(PlacedRun {
                kind: RunKind::Reading,
                text: reading.clone(),
                x: x + (base.width - extent.width) / 2.0,
                y: y - extent.height,
                width: extent.width,
                height: extent.height,
                font_size: reading_size,
            });
        }

        runs.push(PlacedRun {
            kind: RunKind::Base,
            text: segment.base.clone(),
            x,
            y,
            width: base.width,
            height: base.height,
            font_size: base_size,
        });

        x += base.width + SEGMENT_SPACING;
    }

    SentenceLayout {
        index: entry.index,
        canvas_width: config.canvas_width,
        canvas_height: config.canvas_height,
        line_width,
        runs,
    }
}

/// Lay out every entry of the sequence
pub fn layout_sequence(sequence: &AlignedSequence, config: &RenderConfig, measure: &dyn TextMeasure) -> Vec<SentenceLayout> {
    sequence
        .iter()
        .map(|entry| layout_entry(entry, config, measure))
        .collect()
}

/// Write one `sentence_<index>.json` layout descriptor per entry
pub fn write_layout_descriptors(
    sequence: &AlignedSequence,
    config: &RenderConfig,
    measure: &dyn TextMeasure,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    FileManager::ensure_dir(output_dir)?;

    let mut written = Vec::with_capacity(sequence.len());
    for layout in layout_sequence(sequence, config, measure) {
        let path = output_dir.join(artifact_name(layout.index, "json"));
        let json = serde_json::to_string_pretty(&layout)
            .with_context(|| format!("Failed to serialize layout {}", layout.index))?;
        FileManager::write_to_file(&path, &json)?;
        debug!("Saved: {}", path.display());
        written.push(path);
    }

    Ok(written)
}
