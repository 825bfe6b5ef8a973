/*!
 * Timeline-descriptor emitter: an XMEML v5 project placing one still image
 * per aligned entry on a single video track.
 *
 * Times are converted to whole frames and every clip is shifted so the first
 * clip starts at frame 0.
 */

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::alignment::AlignedSequence;
use crate::app_config::RenderConfig;
use crate::errors::EmitError;
use crate::file_utils::FileManager;

/// Sequence name written into the project
pub const SEQUENCE_NAME: &str = "Subtitle Project";

/// One clip of the timeline, in frames relative to the first clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPlacement {
    /// 1-based clip number
    pub index: usize,
    pub start: i64,
    pub end: i64,
    pub artifact: PathBuf,
}

impl ClipPlacement {
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// Whole frames elapsed at `ms` (truncating)
pub fn frames_for_ms(ms: u64, fps: u32) -> i64 {
    (ms as u128 * fps as u128 / 1000) as i64
}

/// The raster artifacts of a directory, ordered by their trailing number
pub fn discover_artifacts<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    FileManager::find_numbered_files(dir, "png")
}

/// Place every entry on the timeline
///
/// Fails before anything is produced when `artifacts` does not hold exactly
/// one file per entry.
pub fn place_clips(sequence: &AlignedSequence, artifacts: &[PathBuf], fps: u32) -> Result<Vec<ClipPlacement>, EmitError> {
    if artifacts.len() != sequence.len() {
        return Err(EmitError::ArtifactCountMismatch {
            expected: sequence.len(),
            actual: artifacts.len(),
        });
    }

    let offset = sequence
        .first()
        .map(|entry| frames_for_ms(entry.interval.start_ms, fps))
        .unwrap_or(0);

    Ok(sequence
        .iter()
        .zip(artifacts)
        .map(|(entry, artifact)| ClipPlacement {
            index: entry.index,
            start: frames_for_ms(entry.interval.start_ms, fps) - offset,
            end: frames_for_ms(entry.interval.end_ms, fps) - offset,
            artifact: artifact.clone(),
        })
        .collect())
}

/// Render the XMEML project for `sequence` using `artifacts` as clip media
pub fn emit_timeline(sequence: &AlignedSequence, artifacts: &[PathBuf], config: &RenderConfig) -> Result<String> {
    let clips = place_clips(sequence, artifacts, config.frame_rate)?;
    let clips = clips
        .into_iter()
        .map(|clip| {
            let url = path_url(&clip.artifact)?;
            Ok((clip, url))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, &clips, config).map_err(|e| EmitError::Xml(e.to_string()))?;

    let xml = String::from_utf8(writer.into_inner()).map_err(|e| EmitError::Xml(e.to_string()))?;
    debug!("Timeline holds {} clips", clips.len());
    Ok(xml)
}

/// `file://` URL on Unix-likes, forward-slash absolute path on Windows
fn path_url(artifact: &Path) -> Result<String> {
    let absolute = FileManager::absolute(artifact)?;
    let normalized = absolute.to_string_lossy().replace('\\', "/");

    if cfg!(windows) {
        Ok(normalized)
    } else {
        Ok(format!("file://{}", normalized))
    }
}

fn write_document(writer: &mut Writer<Vec<u8>>, clips: &[(ClipPlacement, String)], config: &RenderConfig) -> io::Result<()> {
    let fps = config.frame_rate;
    let duration = clips.last().map(|(clip, _)| clip.end).unwrap_or(0);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("xmeml")))?;

    writer
        .create_element("xmeml")
        .with_attribute(("version", "5"))
        .write_inner_content(|xmeml| -> io::Result<()> {
            xmeml.create_element("sequence").write_inner_content(|sequence| -> io::Result<()> {
                text_element(sequence, "name", SEQUENCE_NAME)?;
                text_element(sequence, "duration", &duration.to_string())?;
                write_rate(sequence, fps)?;

                sequence.create_element("media").write_inner_content(|media| -> io::Result<()> {
                    media.create_element("video").write_inner_content(|video| -> io::Result<()> {
                        write_format(video, config)?;
                        video.create_element("track").write_inner_content(|track| -> io::Result<()> {
                            for (clip, url) in clips {
                                write_clip(track, clip, url, fps)?;
                            }
                            Ok(())
                        })?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;

    Ok(())
}

fn write_format(writer: &mut Writer<Vec<u8>>, config: &RenderConfig) -> io::Result<()> {
    writer.create_element("format").write_inner_content(|format| -> io::Result<()> {
        format
            .create_element("samplecharacteristics")
            .write_inner_content(|sample| -> io::Result<()> {
                text_element(sample, "width", &config.canvas_width.to_string())?;
                text_element(sample, "height", &config.canvas_height.to_string())?;
                text_element(sample, "pixelaspectratio", "square")?;
                text_element(sample, "fielddominance", "none")?;
                write_rate(sample, config.frame_rate)?;
                Ok(())
            })?;
        Ok(())
    })?;
    Ok(())
}

fn write_clip(writer: &mut Writer<Vec<u8>>, clip: &ClipPlacement, url: &str, fps: u32) -> io::Result<()> {
    let clip_id = format!("Clip-{}", clip.index);
    let file_id = format!("file-{}", clip.index);
    let duration = clip.duration().to_string();
    let file_name = clip
        .artifact
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    writer
        .create_element("clipitem")
        .with_attribute(("id", clip_id.as_str()))
        .write_inner_content(|item| -> io::Result<()> {
            text_element(item, "name", &clip_id)?;
            text_element(item, "start", &clip.start.to_string())?;
            text_element(item, "end", &clip.end.to_string())?;
            text_element(item, "in", "0")?;
            text_element(item, "out", &duration)?;

            item.create_element("file")
                .with_attribute(("id", file_id.as_str()))
                .write_inner_content(|file| -> io::Result<()> {
                    text_element(file, "name", &file_name)?;
                    text_element(file, "pathurl", url)?;
                    write_rate(file, fps)?;
                    text_element(file, "duration", &duration)?;
                    file.create_element("media").write_inner_content(|media| -> io::Result<()> {
                        media.create_element("video").write_inner_content(|video| -> io::Result<()> {
                            text_element(video, "duration", &duration)?;
                            Ok(())
                        })?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

fn write_rate(writer: &mut Writer<Vec<u8>>, fps: u32) -> io::Result<()> {
    writer.create_element("rate").write_inner_content(|rate| -> io::Result<()> {
        text_element(rate, "timebase", &fps.to_string())?;
        text_element(rate, "ntsc", "false")?;
        Ok(())
    })?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> io::Result<()> {
    writer.create_element(name).write_text_content(BytesText::new(text))?;
    Ok(())
}
