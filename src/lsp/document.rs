//! Document management for the ClassPad language server
//!
//! Keeps the text of every open document and maps between byte offsets and
//! protocol positions. Positions use UTF-16 columns, as LSP requires.

use ropey::{Rope, RopeSlice};
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

/// An open ClassPad program
#[derive(Debug, Clone)]
pub struct ClasspadDocument {
    /// Document URI
    pub uri: Url,
    /// Document version as reported by the client
    pub version: i32,
    /// Document content as a rope (efficient for edits)
    content: Rope,
}

impl ClasspadDocument {
    pub fn new(uri: Url, text: &str, version: i32) -> Self {
        Self {
            uri,
            version,
            content: Rope::from_str(text),
        }
    }

    /// Apply the content changes of one `didChange` notification in order.
    pub fn apply_changes(&mut self, changes: Vec<TextDocumentContentChangeEvent>, version: i32) {
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = self.char_index_at(range.start);
                    let end = self.char_index_at(range.end).max(start);
                    self.content.remove(start..end);
                    self.content.insert(start, &change.text);
                }
                None => self.content = Rope::from_str(&change.text),
            }
        }
        self.version = version;
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Convert a byte offset into `text()` to a protocol position.
    ///
    /// Offsets past the end clamp to the end of the document.
    pub fn position_at(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.content.len_bytes());
        let char_index = self.content.byte_to_char(byte_offset);
        let line = self.content.char_to_line(char_index);
        let line_start = self.content.line_to_char(line);
        let column =
            self.content.char_to_utf16_cu(char_index) - self.content.char_to_utf16_cu(line_start);
        Position::new(line as u32, column as u32)
    }

    /// Char index of a protocol position.
    ///
    /// A line past the end maps to the end of the document; a column past the
    /// end of its line maps to the end of that line.
    pub fn char_index_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.content.len_lines() {
            return self.content.len_chars();
        }
        let line_start = self.content.line_to_char(line);
        let slice = self.content.line(line);
        let visible = visible_len_chars(slice);
        let max_column = slice.char_to_utf16_cu(visible);
        let column = (position.character as usize).min(max_column);
        line_start + slice.utf16_cu_to_char(column)
    }
}

/// Length of a line without its terminator (`\n`, `\r\n` or `\r`).
fn visible_len_chars(line: RopeSlice<'_>) -> usize {
    let mut len = line.len_chars();
    if len > 0 && line.char(len - 1) == '\n' {
        len -= 1;
    }
    if len > 0 && line.char(len - 1) == '\r' {
        len -= 1;
    }
    len
}
