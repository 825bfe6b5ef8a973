/*!
 * Styled-track (Advanced SubStation Alpha) emitter.
 *
 * Every ruby segment is written as two stacked runs: the reading at the
 * reading size, a forced line break, then the base at the base size. Both
 * runs are pinned to one fixed anchor per line. Plain segments are written
 * as bare text, space-separated from one another.
 */

use std::fmt::Write as FmtWrite;

use anyhow::Result;

use crate::alignment::{AlignedEntry, AlignedSequence};
use crate::app_config::RenderConfig;
use crate::ruby_parser::ContentUnit;

/// Name of the base text style
pub const BASE_STYLE: &str = "Default";

/// Name of the reading style
pub const READING_STYLE: &str = "Ruby";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Screen position shared by every ruby segment of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubyAnchor {
    pub x: u32,
    pub reading_y: u32,
    pub base_y: u32,
}

impl RubyAnchor {
    /// Horizontal centre; readings at 5/12 of the height, bases 5/72 below
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let reading_y = height * 5 / 12;
        Self {
            x: width / 2,
            reading_y,
            base_y: reading_y + height * 5 / 72,
        }
    }
}

/// Render the whole styled track
pub fn emit_styled_track(sequence: &AlignedSequence, config: &RenderConfig) -> Result<String> {
    let mut ass = String::with_capacity(sequence.len() * 120 + 1024);
    write_header(&mut ass, config)?;

    let anchor = RubyAnchor::for_canvas(config.canvas_width, config.canvas_height);
    for entry in sequence {
        write_event(&mut ass, entry, config, anchor)?;
    }

    Ok(ass)
}

fn write_header(ass: &mut String, config: &RenderConfig) -> Result<()> {
    let primary = config.text_rgba()?.to_ass();
    let outline = config.stroke_rgba()?.to_ass();
    let font = config.font_family();
    let reading_outline = config.stroke_width.div_ceil(2);

    writeln!(ass, "[Script Info]")?;
    writeln!(ass, "Title: Converted Subtitles")?;
    writeln!(ass, "ScriptType: v4.00+")?;
    writeln!(ass, "PlayDepth: 0")?;
    writeln!(ass, "ScaledBorderAndShadow: yes")?;
    writeln!(ass, "Collisions: Normal")?;
    writeln!(ass, "PlayResX: {}", config.canvas_width)?;
    writeln!(ass, "PlayResY: {}", config.canvas_height)?;
    writeln!(ass)?;

    writeln!(ass, "[V4+ Styles]")?;
    writeln!(ass, "{}", STYLE_FORMAT)?;
    // Base text sits bottom-centre (alignment 2), readings top-centre (8)
    writeln!(
        ass,
        "Style: {},{},{},{},&H000000FF,{},&H64000000,-1,0,0,0,100,100,0,0,1,{},0,2,10,10,{},1",
        BASE_STYLE, font, config.base_font_size, primary, outline, config.stroke_width, config.vertical_margin
    )?;
    writeln!(
        ass,
        "Style: {},{},{},{},&H000000FF,{},&H64000000,-1,0,0,0,100,100,0,0,1,{},0,8,10,10,{},1",
        READING_STYLE, font, config.reading_font_size, primary, outline, reading_outline, config.vertical_margin
    )?;
    writeln!(ass)?;

    writeln!(ass, "[Events]")?;
    writeln!(ass, "{}", EVENT_FORMAT)?;
    Ok(())
}

fn write_event(ass: &mut String, entry: &AlignedEntry, config: &RenderConfig, anchor: RubyAnchor) -> Result<()> {
    writeln!(
        ass,
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        entry.interval.start_canonical(),
        entry.interval.end_canonical(),
        BASE_STYLE,
        dialogue_text(&entry.unit, config, anchor)?
    )?;
    Ok(())
}

/// The text field of one dialogue line
///
/// Adjacent plain segments are separated by a single space.
pub fn dialogue_text(unit: &ContentUnit, config: &RenderConfig, anchor: RubyAnchor) -> Result<String> {
    let mut text = String::new();
    let mut previous_plain = false;

    for segment in unit.segments() {
        match &segment.reading {
            Some(reading) => {
                write!(
                    text,
                    "{{\\fs{}\\pos({},{})}}{}\\N{{\\fs{}\\pos({},{})}}{}",
                    config.reading_font_size,
                    anchor.x,
                    anchor.reading_y,
                    reading,
                    config.base_font_size,
                    anchor.x,
                    anchor.base_y,
                    segment.base
                )?;
                previous_plain = false;
            }
            None => {
                if previous_plain {
                    text.push(' ');
                }
                text.push_str(&segment.base);
                previous_plain = true;
            }
        }
    }

    Ok(text)
}
