/*!
 * Content track handling.
 *
 * The content track is a JSON array of markup strings, one per subtitle line.
 * This module loads it, and also builds it from a plain text file holding
 * one markup line per line.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::errors::InputError;
use crate::file_utils::FileManager;
use crate::ruby_parser::{self, ContentUnit};

/// Parse the JSON content track into raw markup strings
pub fn parse_content_track(json: &str, path: &Path) -> Result<Vec<String>, InputError> {
    serde_json::from_str::<Vec<String>>(json).map_err(|e| InputError::MalformedDocument {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read the content track from disk
pub fn read_content_track<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let json = FileManager::read_to_string(path)?;
    Ok(parse_content_track(&json, path)?)
}

/// Parse every raw markup string into a content unit, preserving order
pub fn parse_units(markup: &[String]) -> Vec<ContentUnit> {
    markup.iter().map(|m| ruby_parser::parse_markup(m)).collect()
}

/// Convert plain text lines into content track entries
///
/// Double quotes become single quotes. A trailing newline does not create an
/// extra empty entry; blank lines elsewhere are kept.
pub fn lines_to_content_track(text: &str) -> Vec<String> {
    let converted = text.replace('"', "'");
    let mut lines: Vec<String> = converted
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Output path used by [`prepare_content_track`]: `<stem>_converted.json`
pub fn converted_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_converted.json", stem))
}

/// Convert a plain text file into a JSON content track next to it
pub fn prepare_content_track<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();
    let text = FileManager::read_to_string(input)?;
    let entries = lines_to_content_track(&text);

    let output = converted_path(input);
    let json = serde_json::to_string_pretty(&entries)?;
    FileManager::write_to_file(&output, &json)?;

    info!("Converted {} lines into {}", entries.len(), output.display());
    Ok(output)
}
