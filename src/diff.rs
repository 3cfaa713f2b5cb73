//! Before/after snapshots and unified diffs for formatters.
//!
//! Lines are the pieces between `\n` bytes, so a file ending in a newline has
//! a trailing empty line and a file without one does not. Rendering follows
//! the hook's established layout:
//!
//! ```text
//! {path}
//! ====================
//! --- original
//!
//! +++ formatted
//!
//! @@ -1,2 +1,5 @@
//!
//!  #include <stdio.h>
//! -int main(){int i;return;}
//! +int main() {
//! ...
//! ```

use similar::{Algorithm, DiffOp, DiffTag, capture_diff_slices, group_diff_ops};
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Lines of context around each change.
pub const CONTEXT_LINES: usize = 3;

const HEADER_RULE: &[u8] = b"====================";

/// Contents of a target file taken immediately before the tool runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    path: PathBuf,
    content: Vec<u8>,
}

impl FileSnapshot {
    pub fn take(path: &Path) -> io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            content: fs::read(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Read the file again after the tool has run.
    pub fn reread(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// One line of a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Context(&'a [u8]),
    Removed(&'a [u8]),
    Added(&'a [u8]),
}

/// A group of changes with surrounding context. Ranges are 0-based line
/// indices into the original and formatted sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<'a> {
    pub original: Range<usize>,
    pub formatted: Range<usize>,
    pub lines: Vec<DiffLine<'a>>,
}

/// Line diff between a file's original and formatted contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff<'a> {
    path: &'a Path,
    hunks: Vec<Hunk<'a>>,
}

impl<'a> FileDiff<'a> {
    pub fn compute(path: &'a Path, original: &'a [u8], formatted: &'a [u8]) -> Self {
        if original == formatted {
            return Self {
                path,
                hunks: Vec::new(),
            };
        }

        let old = split_lines(original);
        let new = split_lines(formatted);
        let ops = capture_diff_slices(Algorithm::Myers, &old, &new);

        let hunks = group_diff_ops(ops, CONTEXT_LINES)
            .into_iter()
            .filter_map(|group| build_hunk(&group, &old, &new))
            .collect();

        Self { path, hunks }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn hunks(&self) -> &[Hunk<'a>] {
        &self.hunks
    }

    /// Render as bytes; empty when there is nothing to report.
    pub fn render(&self) -> Vec<u8> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut entries: Vec<Vec<u8>> = vec![b"--- original\n".to_vec(), b"+++ formatted\n".to_vec()];
        for hunk in &self.hunks {
            entries.push(
                format!(
                    "@@ -{} +{} @@\n",
                    format_range(&hunk.original),
                    format_range(&hunk.formatted)
                )
                .into_bytes(),
            );
            for line in &hunk.lines {
                let (marker, text) = match line {
                    DiffLine::Context(text) => (b' ', *text),
                    DiffLine::Removed(text) => (b'-', *text),
                    DiffLine::Added(text) => (b'+', *text),
                };
                let mut entry = Vec::with_capacity(text.len() + 1);
                entry.push(marker);
                entry.extend_from_slice(text);
                entries.push(entry);
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(self.path.to_string_lossy().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(HEADER_RULE);
        out.push(b'\n');
        out.extend_from_slice(&entries.join(&b'\n'));
        out.push(b'\n');
        out
    }
}

/// Split on `\n`, keeping a trailing empty piece after a final newline.
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split(|&b| b == b'\n').collect()
}

fn build_hunk<'a>(group: &[DiffOp], old: &[&'a [u8]], new: &[&'a [u8]]) -> Option<Hunk<'a>> {
    let first = group.first()?;
    let last = group.last()?;
    let original = first.old_range().start..last.old_range().end;
    let formatted = first.new_range().start..last.new_range().end;

    let mut lines = Vec::new();
    for op in group {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => lines.extend(old[old_range].iter().copied().map(DiffLine::Context)),
            DiffTag::Delete => lines.extend(old[old_range].iter().copied().map(DiffLine::Removed)),
            DiffTag::Insert => lines.extend(new[new_range].iter().copied().map(DiffLine::Added)),
            DiffTag::Replace => {
                lines.extend(old[old_range].iter().copied().map(DiffLine::Removed));
                lines.extend(new[new_range].iter().copied().map(DiffLine::Added));
            }
        }
    }

    Some(Hunk {
        original,
        formatted,
        lines,
    })
}

/// Unified range: `start,len`, bare `start` for one line, `start-1,0` for none.
fn format_range(range: &Range<usize>) -> String {
    let mut start = range.start + 1;
    let len = range.len();
    if len == 1 {
        return start.to_string();
    }
    if len == 0 {
        start -= 1;
    }
    format!("{start},{len}")
}
