//! Byte-range edits recorded against the original source text.
//!
//! Every change the transformer makes to the tree is mirrored here, so printing is a
//! splice of the original text: bytes outside edited ranges come through untouched.

use std::ops::Range;

use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Edit {
    fn is_insert(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditLog {
    edits: Vec<Edit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Replace `range` of the original text.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit {
            start: range.start,
            end: range.end,
            text: text.into(),
        });
    }

    /// Insert text at `pos`. Inserts at the same position keep their recording order.
    pub fn insert(&mut self, pos: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            start: pos,
            end: pos,
            text: text.into(),
        });
    }

    /// Render `range` of `source` with the edits inside it applied, and remove those
    /// edits from the log.
    ///
    /// Used when an enclosing node is replaced wholesale: its new text embeds the
    /// already-rewritten text of its children.
    pub fn render_range(&mut self, source: &str, range: Range<usize>) -> Result<String> {
        let Some(slice) = source.get(range.clone()) else {
            bail!("range {:?} is outside the source text", range);
        };

        let (inner, rest): (Vec<Edit>, Vec<Edit>) = self.edits.drain(..).partition(|e| {
            e.start >= range.start && e.end <= range.end && !(e.is_insert() && e.start == range.end)
        });
        self.edits = rest;

        let shifted = inner
            .into_iter()
            .map(|e| Edit {
                start: e.start - range.start,
                end: e.end - range.start,
                text: e.text,
            })
            .collect();

        splice(slice, shifted)
    }

    /// Apply all edits to `source`.
    pub fn apply(&self, source: &str) -> Result<String> {
        splice(source, self.edits.clone())
    }
}

fn splice(source: &str, mut edits: Vec<Edit>) -> Result<String> {
    // Stable: inserts sharing a position keep their order, and go before a replacement
    // that starts there.
    edits.sort_by_key(|e| (e.start, !e.is_insert()));

    let extra: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;

    for edit in edits {
        if edit.start < cursor {
            bail!(
                "overlapping edits at byte {} (previous edit ends at {})",
                edit.start,
                cursor
            );
        }
        let Some(kept) = source.get(cursor..edit.start) else {
            bail!("edit at byte {} is outside the source text", edit.start);
        };
        out.push_str(kept);
        out.push_str(&edit.text);
        cursor = edit.end;
    }

    match source.get(cursor..) {
        Some(rest) => out.push_str(rest),
        None => bail!("edit ends at byte {} past the source text", cursor),
    }

    Ok(out)
}
