/*!
 * Glyph rasterization of sentence layouts into transparent PNG images.
 *
 * Each run is drawn twice: first the outline by stamping the glyphs at every
 * offset within the stroke radius, then the fill on top. Pixels are
 * alpha-composited onto a fully transparent canvas.
 */

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, info};

use crate::alignment::AlignedSequence;
use crate::app_config::RenderConfig;
use crate::emitters::color::Color;
use crate::emitters::image_layout::{SentenceLayout, TextExtent, TextMeasure, artifact_name, layout_entry};
use crate::errors::EmitError;
use crate::file_utils::FileManager;

/// Font-backed renderer
pub struct GlyphRenderer {
    font: FontVec,
}

impl GlyphRenderer {
    /// Load a font from raw TrueType/OpenType bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, EmitError> {
        let font = FontVec::try_from_vec(data).map_err(|e| EmitError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Load the configured font
    ///
    /// `font` is tried as a path first, then as `<font>.ttf`.
    pub fn load(font: &str) -> Result<Self, EmitError> {
        let path = resolve_font_path(font)
            .ok_or_else(|| EmitError::Font(format!("Font not found: {}", font)))?;
        let data = fs::read(&path).map_err(|e| EmitError::Font(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded font {}", path.display());
        Self::from_bytes(data)
    }

    /// Rasterize one layout
    pub fn render(&self, layout: &SentenceLayout, fill: Color, stroke: Color, stroke_width: u32) -> RgbaImage {
        let mut canvas = RgbaImage::new(layout.canvas_width, layout.canvas_height);
        let radius = stroke_width as i32;

        for run in &layout.runs {
            if radius > 0 {
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        if (dx != 0 || dy != 0) && dx * dx + dy * dy <= radius * radius {
                            self.draw_text(
                                &mut canvas,
                                &run.text,
                                run.font_size,
                                run.x + dx as f32,
                                run.y + dy as f32,
                                stroke,
                            );
                        }
                    }
                }
            }
            self.draw_text(&mut canvas, &run.text, run.font_size, run.x, run.y, fill);
        }

        canvas
    }

    fn draw_text(&self, canvas: &mut RgbaImage, text: &str, font_size: f32, x: f32, y: f32, color: Color) {
        let scale = PxScale::from(font_size);
        let scaled = self.font.as_scaled(scale);
        let baseline = y + scaled.ascent();
        let mut caret = x;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars() {
            let id = self.font.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    blend(canvas, px, py, color, coverage);
                });
            }
        }
    }
}

impl TextMeasure for GlyphRenderer {
    fn measure(&self, text: &str, font_size: f32) -> TextExtent {
        if text.is_empty() {
            return TextExtent { width: 0.0, height: 0.0 };
        }

        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = self.font.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        TextExtent {
            width,
            height: scaled.height(),
        }
    }
}

fn resolve_font_path(font: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(font);
    if direct.is_file() {
        return Some(direct);
    }
    let with_extension = PathBuf::from(format!("{}.ttf", font));
    with_extension.is_file().then_some(with_extension)
}

/// Source-over compositing of `color` scaled by `coverage`
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }

    let src_a = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel(x as u32, y as u32).0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mix = |s: u8, d: u8| -> u8 {
        let value = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    let pixel = Rgba([
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
    canvas.put_pixel(x as u32, y as u32, pixel);
}

/// Render one `sentence_<index>.png` per entry
pub fn render_images(
    sequence: &AlignedSequence,
    config: &RenderConfig,
    renderer: &GlyphRenderer,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let fill = config.text_rgba()?;
    let stroke = config.stroke_rgba()?;
    FileManager::ensure_dir(output_dir)?;

    let mut written = Vec::with_capacity(sequence.len());
    for entry in sequence {
        let layout = layout_entry(entry, config, renderer);
        let image = renderer.render(&layout, fill, stroke, config.stroke_width);
        let path = output_dir.join(artifact_name(entry.index, "png"));

        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| EmitError::Image(format!("{}: {}", path.display(), e)))
            .with_context(|| format!("Failed to save image for entry {}", entry.index))?;
        debug!("Saved: {}", path.display());
        written.push(path);
    }

    info!("Rendered {} images into {}", written.len(), output_dir.display());
    Ok(written)
}
