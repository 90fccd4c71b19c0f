use swc_common::BytePos;

use crate::core::backend::SourceText;

/// Number of lines above a node that are scanned for the ignore marker.
const MARKER_LOOKBACK_LINES: usize = 2;

/// Ignore-marker lookups for one file.
///
/// A node is ignored when its own leading comments, or its parent's, start with the
/// marker, or when the marker appears anywhere on the node's first line or the two
/// lines above it.
pub struct IgnoreMarkers<'a> {
    source: &'a SourceText,
    marker: &'a str,
}

impl<'a> IgnoreMarkers<'a> {
    pub fn new(source: &'a SourceText, marker: &'a str) -> Self {
        Self { source, marker }
    }

    /// Leading comment attached at `pos` is the marker, or starts with it.
    pub fn has_leading_marker(&self, pos: BytePos) -> bool {
        self.source
            .comments
            .leading_at(pos)
            .iter()
            .any(|c| c.text.trim().starts_with(self.marker))
    }

    /// The marker appears on `line` (1-based) or on one of the lines just above it.
    pub fn marked_near_line(&self, line: usize) -> bool {
        let first = line.saturating_sub(MARKER_LOOKBACK_LINES).max(1);
        (first..=line).any(|l| {
            self.source
                .line(l)
                .is_some_and(|text| text.contains(self.marker))
        })
    }

    pub fn is_ignored(&self, node_lo: BytePos, parent_lo: Option<BytePos>) -> bool {
        if self.has_leading_marker(node_lo) {
            return true;
        }
        if parent_lo.is_some_and(|lo| self.has_leading_marker(lo)) {
            return true;
        }
        let (line, _) = self.source.line_col(node_lo);
        self.marked_near_line(line)
    }
}
