/*!
 * Positional alignment of content units with timing intervals.
 *
 * Unit *i* is paired with interval *i*. When the two inputs differ in length
 * the result is truncated to the shorter one; nothing is fabricated.
 */

use log::info;

use crate::errors::Diagnostic;
use crate::ruby_parser::ContentUnit;
use crate::timing::TimeInterval;

/// One content unit with its interval and 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedEntry {
    /// 1-based sequence index
    pub index: usize,
    pub unit: ContentUnit,
    pub interval: TimeInterval,
}

/// Ordered aligned entries, the input of every emitter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedSequence {
    entries: Vec<AlignedEntry>,
}

impl AlignedSequence {
    pub fn entries(&self) -> &[AlignedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignedEntry> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&AlignedEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&AlignedEntry> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &'a AlignedSequence {
    type Item = &'a AlignedEntry;
    type IntoIter = std::slice::Iter<'a, AlignedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Pair units and intervals by position, logging a note on length mismatch
pub fn align(units: Vec<ContentUnit>, intervals: Vec<TimeInterval>) -> AlignedSequence {
    let (sequence, mismatch) = align_with_diagnostics(units, intervals);
    if let Some(diagnostic) = mismatch {
        info!("Alignment: {}", diagnostic);
    }
    sequence
}

/// Pair units and intervals by position, returning the mismatch note if any
pub fn align_with_diagnostics(
    units: Vec<ContentUnit>,
    intervals: Vec<TimeInterval>,
) -> (AlignedSequence, Option<Diagnostic>) {
    let mismatch = (units.len() != intervals.len()).then(|| Diagnostic::LengthMismatch {
        content_units: units.len(),
        intervals: intervals.len(),
    });

    let entries = units
        .into_iter()
        .zip(intervals)
        .enumerate()
        .map(|(i, (unit, interval))| AlignedEntry {
            index: i + 1,
            unit,
            interval,
        })
        .collect();

    (AlignedSequence { entries }, mismatch)
}
