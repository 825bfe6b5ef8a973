/*!
 * Common test utilities for the furisub test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use furisub::alignment::{AlignedSequence, align};
use furisub::ruby_parser::parse_markup;
use furisub::timing::TimeInterval;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Three-entry SRT timing track
pub const SAMPLE_TIMING: &str = "1
00:00:01,000 --> 00:00:02,000
first

2
00:00:03,500 --> 00:00:05,000
second

3
00:00:06,000 --> 00:00:08,250
third
";

/// Content track matching [`SAMPLE_TIMING`]
pub const SAMPLE_CONTENT: &str = r#"[
  "<ruby>犬<rt>いぬ</rt></ruby>",
  "<ruby>学校<rt>がっこう</rt></ruby>へ 行く",
  "<ruby>東京<rt>とうきょう</rt></ruby>"
]"#;

/// Creates the sample timing and content tracks, returning (timing, content)
pub fn create_sample_tracks(dir: &Path, stem: &str) -> Result<(PathBuf, PathBuf)> {
    let timing = create_test_file(dir, &format!("{}.srt", stem), SAMPLE_TIMING)?;
    let content = create_test_file(dir, &format!("{}.json", stem), SAMPLE_CONTENT)?;
    Ok((timing, content))
}

/// Builds an aligned sequence from markup strings and (start, end) pairs in ms
pub fn sequence_of(markup: &[&str], times: &[(u64, u64)]) -> AlignedSequence {
    let units = markup.iter().map(|m| parse_markup(m)).collect();
    let intervals = times
        .iter()
        .map(|(start, end)| TimeInterval::new(*start, *end).unwrap())
        .collect();
    align(units, intervals)
}

/// Creates `count` empty numbered PNG placeholders in `dir`
pub fn create_placeholder_images(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    (1..=count)
        .map(|i| create_test_file(dir, &format!("sentence_{}.png", i), ""))
        .collect()
}
