/*!
 * Tests for app controller functionality
 */

use anyhow::Result;
use std::fs;

use furisub::app_config::Config;
use furisub::app_controller::{ConversionJob, ConversionOutcome, Controller};
use furisub::emitters::OutputFormat;

use crate::common;

#[test]
fn test_with_config_withValidConfig_shouldCreateController() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().render.frame_rate, 24);
    Ok(())
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.render.canvas_width = 0;
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_load_shouldAlignBothTracks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (timing, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let controller = Controller::with_config(Config::default())?;

    let sequence = controller.load(&timing, &content)?;

    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.entries()[2].unit.visible_text(), "東京");
    Ok(())
}

#[test]
fn test_load_withMissingTiming_shouldNameStage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (_, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let controller = Controller::with_config(Config::default())?;

    let error = controller.load(&temp_dir.path().join("missing.srt"), &content).unwrap_err();
    assert!(error.to_string().starts_with("load:"));
    Ok(())
}

#[test]
fn test_convert_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (timing, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let output = common::create_test_file(temp_dir.path(), "episode.ass", "keep me")?;
    let controller = Controller::with_config(Config::default())?;

    let job = ConversionJob::new(OutputFormat::Ass, &timing, &content, &output);
    let outcome = controller.convert(&job, false)?;

    assert_eq!(outcome, ConversionOutcome::Skipped(output.clone()));
    assert_eq!(fs::read_to_string(&output)?, "keep me");
    Ok(())
}

#[test]
fn test_convert_withExistingOutputAndForce_shouldOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (timing, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let output = common::create_test_file(temp_dir.path(), "episode.ass", "old")?;
    let controller = Controller::with_config(Config::default())?;

    let job = ConversionJob::new(OutputFormat::Ass, &timing, &content, &output);
    let outcome = controller.convert(&job, true)?;

    assert_eq!(outcome, ConversionOutcome::Written(vec![output.clone()]));
    assert!(fs::read_to_string(&output)?.starts_with("[Script Info]"));
    Ok(())
}

#[test]
fn test_convert_timelineWithoutImagesDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (timing, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let controller = Controller::with_config(Config::default())?;

    let job = ConversionJob::new(OutputFormat::Timeline, &timing, &content, temp_dir.path().join("t.xml"));
    let error = controller.convert(&job, false).unwrap_err();

    assert!(error.to_string().starts_with("emit timeline"));
    Ok(())
}

#[test]
fn test_convert_imagesWithMissingFont_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (timing, content) = common::create_sample_tracks(temp_dir.path(), "episode")?;
    let mut config = Config::default();
    config.render.font = temp_dir.path().join("no_such_font.ttf").to_string_lossy().to_string();
    let controller = Controller::with_config(config)?;

    let output_dir = temp_dir.path().join("images");
    let job = ConversionJob::new(OutputFormat::Images, &timing, &content, &output_dir);

    assert!(controller.convert(&job, false).is_err());
    assert!(!output_dir.exists());
    Ok(())
}

#[test]
fn test_prepare_shouldWriteConvertedTrackAndSkipSecondRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "lines.txt", "<ruby>犬<rt>いぬ</rt></ruby>\n")?;
    let controller = Controller::with_config(Config::default())?;

    let first = controller.prepare(&input, false)?;
    let expected = temp_dir.path().join("lines_converted.json");
    assert_eq!(first, ConversionOutcome::Written(vec![expected.clone()]));

    let second = controller.prepare(&input, false)?;
    assert_eq!(second, ConversionOutcome::Skipped(expected));
    Ok(())
}

#[test]
fn test_prepare_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert!(controller.prepare(std::path::Path::new("missing_lines.txt"), false).is_err());
    Ok(())
}

#[test]
fn test_plan_batch_shouldPairJsonWithSiblingSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    fs::create_dir(&input_dir)?;
    common::create_sample_tracks(&input_dir, "ep1")?;
    common::create_sample_tracks(&input_dir, "ep2")?;
    common::create_test_file(&input_dir, "orphan.json", "[]")?;
    let output_dir = temp_dir.path().join("out");
    let controller = Controller::with_config(Config::default())?;

    let jobs = controller.plan_batch(OutputFormat::Romaji, &input_dir, &output_dir, false)?;

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].timing, input_dir.join("ep1.srt"));
    assert_eq!(jobs[0].output, output_dir.join("ep1.romaji.srt"));
    assert_eq!(jobs[1].content, input_dir.join("ep2.json"));
    Ok(())
}

#[test]
fn test_plan_batch_forTimeline_shouldPointAtPerStemImages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_sample_tracks(temp_dir.path(), "ep1")?;
    let output_dir = temp_dir.path().join("out");
    let controller = Controller::with_config(Config::default())?;

    let jobs = controller.plan_batch(OutputFormat::Timeline, temp_dir.path(), &output_dir, false)?;

    assert_eq!(jobs[0].output, output_dir.join("ep1.xml"));
    assert_eq!(jobs[0].images_dir, Some(output_dir.join("ep1")));
    Ok(())
}

#[test]
fn test_output_format_shouldDisplayLowercaseName() {
    assert_eq!(OutputFormat::Timeline.to_string(), "timeline");
    assert_eq!(OutputFormat::Ass.stage(), "emit styled track");
}
