/*!
 * Tests for positional alignment
 */

use furisub::alignment::{align, align_with_diagnostics};
use furisub::errors::Diagnostic;
use furisub::ruby_parser::parse_markup;
use furisub::timing::TimeInterval;

fn intervals(count: u64) -> Vec<TimeInterval> {
    (0..count)
        .map(|i| TimeInterval::new(i * 1000, i * 1000 + 500).unwrap())
        .collect()
}

#[test]
fn test_align_withEqualLengths_shouldPairByPosition() {
    let units = vec![parse_markup("a"), parse_markup("b")];
    let sequence = align(units, intervals(2));

    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.entries()[0].unit.visible_text(), "a");
    assert_eq!(sequence.entries()[1].interval.start_ms, 1000);
}

#[test]
fn test_align_shouldUseOneBasedIndices() {
    let units = vec![parse_markup("a"), parse_markup("b"), parse_markup("c")];
    let sequence = align(units, intervals(3));

    let indices: Vec<usize> = sequence.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn test_align_withMoreUnits_shouldTruncateToIntervals() {
    let units = vec![parse_markup("a"), parse_markup("b"), parse_markup("c")];
    let (sequence, mismatch) = align_with_diagnostics(units, intervals(2));

    assert_eq!(sequence.len(), 2);
    assert_eq!(
        mismatch,
        Some(Diagnostic::LengthMismatch { content_units: 3, intervals: 2 })
    );
}

#[test]
fn test_align_withMoreIntervals_shouldTruncateToUnits() {
    let units = vec![parse_markup("a")];
    let (sequence, mismatch) = align_with_diagnostics(units, intervals(4));

    assert_eq!(sequence.len(), 1);
    assert!(mismatch.is_some());
}

#[test]
fn test_align_withEqualLengths_shouldReportNoMismatch() {
    let (_, mismatch) = align_with_diagnostics(vec![parse_markup("a")], intervals(1));
    assert!(mismatch.is_none());
}

#[test]
fn test_align_withEmptyInputs_shouldReturnEmptySequence() {
    let sequence = align(Vec::new(), intervals(2));
    assert!(sequence.is_empty());
    assert!(sequence.first().is_none());
    assert!(sequence.last().is_none());
}
