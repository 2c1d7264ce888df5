//! Mapping byte offsets to rows and columns

use crate::types::{Location, Range};

/// Precomputed line starts for a source text.
///
/// The reader builds one of these per document so each node's location can
/// be resolved without rescanning the text from the beginning.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(idx, _)| idx + 1),
        );
        LineIndex {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte offset. Returns `None` past the end of the text or
    /// inside a multi-byte character.
    pub fn location(&self, offset: usize) -> Option<Location> {
        if offset > self.source.len() || !self.source.is_char_boundary(offset) {
            return None;
        }

        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[row];
        let column = self.source[line_start..offset].chars().count();

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Resolve a pair of byte offsets into a range.
    pub fn range(&self, start: usize, end: usize) -> Option<Range> {
        Some(Range {
            start: self.location(start)?,
            end: self.location(end)?,
        })
    }
}

/// Convert a byte offset to a Location with line and column info
///
/// Returns None if the offset is out of bounds. Prefer [`LineIndex`] when
/// resolving many offsets in the same text.
pub fn offset_to_location(source: &str, offset: usize) -> Option<Location> {
    LineIndex::new(source).location(offset)
}
