//! Opaque source locations and the source-map collaborator interface
//! (spec §6, "Consumed"): `get_line_column`, `extract_text`,
//! `loc_for_end_of_token`, `loc_for_end_of_line`, `indentation_for_line`.
//!
//! `SourceLoc`/`SourceRange` are deliberately opaque byte-offset handles —
//! line/column recovery is the source map's job, not baked into the
//! handle itself, matching spec §1's framing of source-location
//! management as an external collaborator the core only consumes.

use serde::{Deserialize, Serialize};

/// An opaque position within one source buffer. `NONE` represents the
/// absence of a location (synthesized decls, builtins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    file: u32,
    offset: u32,
}

impl SourceLoc {
    pub const NONE: SourceLoc = SourceLoc {
        file: u32::MAX,
        offset: 0,
    };

    pub fn new(file: u32, offset: u32) -> Self {
        Self { file, offset }
    }

    pub fn is_valid(self) -> bool {
        self.file != u32::MAX
    }

    pub fn file_id(self) -> u32 {
        self.file
    }

    pub fn offset(self) -> u32 {
        self.offset
    }
}

/// A half-open `[start, end)` range of [`SourceLoc`]s within the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: SourceLoc,
    pub end: SourceLoc,
}

impl SourceRange {
    pub fn new(start: SourceLoc, end: SourceLoc) -> Self {
        Self { start, end }
    }

    pub fn unknown() -> Self {
        Self {
            start: SourceLoc::NONE,
            end: SourceLoc::NONE,
        }
    }

    pub fn is_valid(self) -> bool {
        self.start.is_valid()
    }
}

/// (line, column), both 1-based, as returned by `get_line_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

/// One registered source buffer.
struct SourceFile {
    name: String,
    text: String,
    /// Byte offset of the start of each line, for O(log n) line lookup.
    line_starts: Vec<u32>,
}

fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

/// The source-map collaborator: owns buffer text keyed by a small integer
/// file id and answers the location-recovery queries the core consumes.
/// This is intentionally the whole of the "out of scope" collaborator —
/// no diagnostic rendering lives here, see [`crate::diag`].
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer, returning the file id used to build `SourceLoc`s
    /// into it.
    pub fn add_file(&mut self, name: impl Into<String>, text: impl Into<String>) -> u32 {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        self.files.push(SourceFile {
            name: name.into(),
            text,
            line_starts,
        });
        (self.files.len() - 1) as u32
    }

    fn file(&self, id: u32) -> Option<&SourceFile> {
        self.files.get(id as usize)
    }

    pub fn file_name(&self, loc: SourceLoc) -> Option<&str> {
        self.file(loc.file_id()).map(|f| f.name.as_str())
    }

    /// `get_line_column(loc) -> (line, col)`.
    pub fn get_line_column(&self, loc: SourceLoc) -> Option<LineColumn> {
        let file = self.file(loc.file_id())?;
        let offset = loc.offset();
        let line_idx = match file.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = *file.line_starts.get(line_idx)?;
        Some(LineColumn {
            line: (line_idx + 1) as u32,
            column: offset - line_start + 1,
        })
    }

    /// `extract_text(range) -> bytes`.
    pub fn extract_text(&self, range: SourceRange) -> Option<&str> {
        if range.start.file_id() != range.end.file_id() {
            return None;
        }
        let file = self.file(range.start.file_id())?;
        file.text
            .get(range.start.offset() as usize..range.end.offset() as usize)
    }

    /// `loc_for_end_of_token(loc) -> loc`. A token boundary is the next
    /// run of non-identifier/non-whitespace transition; the core never
    /// needs tokenization details, only the resulting offset, so this
    /// scans forward past one contiguous run of identifier characters.
    pub fn loc_for_end_of_token(&self, loc: SourceLoc) -> SourceLoc {
        let Some(file) = self.file(loc.file_id()) else {
            return loc;
        };
        let bytes = file.text.as_bytes();
        let mut i = loc.offset() as usize;
        let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
        while i < bytes.len() && is_ident(bytes[i]) {
            i += 1;
        }
        if i == loc.offset() as usize && i < bytes.len() {
            i += 1;
        }
        SourceLoc::new(loc.file_id(), i as u32)
    }

    /// `loc_for_end_of_line(loc) -> loc`.
    pub fn loc_for_end_of_line(&self, loc: SourceLoc) -> SourceLoc {
        let Some(file) = self.file(loc.file_id()) else {
            return loc;
        };
        let bytes = file.text.as_bytes();
        let mut i = loc.offset() as usize;
        while i < bytes.len() && bytes[i] != b'\n' {
            i += 1;
        }
        SourceLoc::new(loc.file_id(), i as u32)
    }

    /// `indentation_for_line(loc) -> bytes`.
    pub fn indentation_for_line(&self, loc: SourceLoc) -> Option<&str> {
        let file = self.file(loc.file_id())?;
        let line = self.get_line_column(loc)?.line as usize;
        let start = *file.line_starts.get(line - 1)? as usize;
        let bytes = file.text.as_bytes();
        let mut end = start;
        while end < bytes.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
            end += 1;
        }
        file.text.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_of_first_and_later_lines() {
        let mut map = SourceMap::new();
        let id = map.add_file("t.vx", "fn main() {\n  let x = 1;\n}\n");
        let loc0 = SourceLoc::new(id, 0);
        assert_eq!(map.get_line_column(loc0), Some(LineColumn { line: 1, column: 1 }));
        let loc1 = SourceLoc::new(id, 14); // inside "let x = 1;"
        let lc = map.get_line_column(loc1).unwrap();
        assert_eq!(lc.line, 2);
    }

    #[test]
    fn extract_text_round_trips() {
        let mut map = SourceMap::new();
        let id = map.add_file("t.vx", "abcdef");
        let range = SourceRange::new(SourceLoc::new(id, 1), SourceLoc::new(id, 4));
        assert_eq!(map.extract_text(range), Some("bcd"));
    }

    #[test]
    fn indentation_for_line_reads_leading_whitespace() {
        let mut map = SourceMap::new();
        let id = map.add_file("t.vx", "fn f() {\n    let y = 2;\n}\n");
        let loc = SourceLoc::new(id, 9);
        assert_eq!(map.indentation_for_line(loc), Some("    "));
    }
}
