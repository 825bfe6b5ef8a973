/*!
 * Tests for sentence image layout and layout descriptors
 */

use anyhow::Result;
use std::fs;

use furisub::app_config::RenderConfig;
use furisub::emitters::image_layout::{
    EstimatedMetrics, RunKind, SEGMENT_SPACING, layout_entry, layout_sequence, write_layout_descriptors,
};

use crate::common;

#[test]
fn test_layout_entry_withSingleRuby_shouldCenterLineAndReading() {
    let sequence = common::sequence_of(&["<ruby>犬<rt>いぬ</rt></ruby>"], &[(1000, 2000)]);
    let layout = layout_entry(&sequence.entries()[0], &RenderConfig::default(), &EstimatedMetrics);

    assert_eq!(layout.index, 1);
    assert_eq!(layout.line_width, 48.0 + SEGMENT_SPACING);
    assert_eq!(layout.runs.len(), 2);

    let reading = &layout.runs[0];
    assert_eq!(reading.kind, RunKind::Reading);
    assert_eq!(reading.text, "いぬ");
    assert_eq!((reading.x, reading.y), (926.0, 956.0));

    let base = &layout.runs[1];
    assert_eq!(base.kind, RunKind::Base);
    assert_eq!((base.x, base.y), (926.0, 980.0));
    assert_eq!(base.font_size, 48.0);
}

#[test]
fn test_layout_entry_withWideReading_shouldCenterOverItsOwnBase() {
    let sequence = common::sequence_of(&["<ruby>東京<rt>とうきょう</rt></ruby>は"], &[(0, 1000)]);
    let layout = layout_entry(&sequence.entries()[0], &RenderConfig::default(), &EstimatedMetrics);

    assert_eq!(layout.line_width, 184.0);
    let xs: Vec<(RunKind, f32)> = layout.runs.iter().map(|r| (r.kind, r.x)).collect();
    assert_eq!(
        xs,
        vec![(RunKind::Reading, 856.0), (RunKind::Base, 868.0), (RunKind::Base, 984.0)]
    );
}

#[test]
fn test_layout_entry_withPlainText_shouldHaveNoReadingRuns() {
    let sequence = common::sequence_of(&["abc"], &[(0, 1000)]);
    let layout = layout_entry(&sequence.entries()[0], &RenderConfig::default(), &EstimatedMetrics);

    assert!(layout.runs.iter().all(|r| r.kind == RunKind::Base));
    assert_eq!(layout.runs[0].width, 72.0);
}

#[test]
fn test_layout_sequence_shouldProduceOneLayoutPerEntry() {
    let sequence = common::sequence_of(&["a", "b"], &[(0, 1), (1, 2)]);
    let layouts = layout_sequence(&sequence, &RenderConfig::default(), &EstimatedMetrics);

    let indices: Vec<usize> = layouts.iter().map(|l| l.index).collect();
    assert_eq!(indices, vec![1, 2]);
}

#[test]
fn test_write_layout_descriptors_shouldWriteNumberedJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("layouts");
    let sequence = common::sequence_of(
        &["<ruby>犬<rt>いぬ</rt></ruby>", "ねこ"],
        &[(1000, 2000), (2000, 3000)],
    );

    let written = write_layout_descriptors(&sequence, &RenderConfig::default(), &EstimatedMetrics, &output_dir)?;

    assert_eq!(written, vec![output_dir.join("sentence_1.json"), output_dir.join("sentence_2.json")]);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0])?)?;
    assert_eq!(json["index"], 1);
    assert_eq!(json["canvasWidth"], 1920);
    assert_eq!(json["runs"][0]["kind"], "reading");
    assert_eq!(json["runs"][0]["text"], "いぬ");
    assert_eq!(json["runs"][1]["fontSize"], 48.0);
    Ok(())
}
