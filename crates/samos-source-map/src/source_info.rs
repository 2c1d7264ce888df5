//! Source information attached to parsed nodes

use crate::types::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a value came from: an optional file name plus a range in its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File the text was read from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// The range in that text
    pub range: Range,
}

impl SourceInfo {
    pub fn new(range: Range) -> Self {
        SourceInfo { file: None, range }
    }

    /// Attach a file name.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }
}

/// Renders as `file:row:column` with 1-indexed row and column.
impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.range.start;
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, start.row + 1, start.column + 1),
            None => write!(f, "{}:{}", start.row + 1, start.column + 1),
        }
    }
}
