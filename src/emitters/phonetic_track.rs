//! Phonetic-track emitter: romanized SRT reusing the original timing lines.

use std::fmt::Write as FmtWrite;

use anyhow::Result;
use log::trace;

use crate::alignment::AlignedSequence;
use crate::ruby_parser::ContentUnit;
use crate::transliteration;

/// Romanize one unit: readings (or bases) transliterated and space-joined
pub fn romanize_unit(unit: &ContentUnit) -> String {
    unit.segments()
        .iter()
        .map(|segment| {
            transliteration::transliterate_reporting(segment.phonetic_text(), |d| trace!("Romaji: {}", d))
        })
        .filter(|romaji| !romaji.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the whole phonetic track
pub fn emit_phonetic_track(sequence: &AlignedSequence) -> Result<String> {
    let mut srt = String::with_capacity(sequence.len() * 64);

    for entry in sequence {
        write!(
            srt,
            "{}\n{}\n{}\n\n",
            entry.index,
            entry.interval.timing_line,
            romanize_unit(&entry.unit)
        )?;
    }

    Ok(srt)
}
