//! Line/column bookkeeping
//!
//! sqlparser reports token locations as 1-based line and character column.
//! [`LineIndex`] converts between those and UTF-8 byte offsets so statement
//! ranges can be sliced from the original text.

use serde::Serialize;

/// A 1-based line and character column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Character column, starting at 1
    pub column: usize,
}

impl Position {
    /// Create a position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Byte offsets of line starts in a text
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index `text`
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Byte offset of a 1-based line and character column.
    ///
    /// Columns past the end of a line clamp to the line end; lines past the
    /// end of the text clamp to the text length.
    pub fn offset(&self, line: usize, column: usize) -> usize {
        let Some(&start) = self.line_starts.get(line.saturating_sub(1)) else {
            return self.text.len();
        };
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len());
        let line_text = &self.text[start..end];
        line_text
            .char_indices()
            .nth(column.saturating_sub(1))
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    /// Position of the character starting at byte `offset`
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.line_starts[line_idx];
        let column = self.text[start..offset].chars().count() + 1;
        Position::new(line_idx + 1, column)
    }

    /// Position of the last character before byte `end`
    pub fn last_char_position(&self, end: usize) -> Position {
        let end = end.min(self.text.len());
        match self.text[..end].char_indices().next_back() {
            Some((i, _)) => self.position(i),
            None => Position::new(1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_ascii() {
        let index = LineIndex::new("SELECT 1;\nSELECT 2;");
        assert_eq!(index.offset(1, 1), 0);
        assert_eq!(index.offset(2, 1), 10);
        assert_eq!(index.offset(2, 8), 17);
    }

    #[test]
    fn test_offset_multibyte() {
        let text = "SELECT 'é';\nx";
        let index = LineIndex::new(text);
        // column 10 is the closing quote, after the two-byte character
        assert_eq!(index.offset(1, 10), 10);
        assert_eq!(&text[index.offset(1, 10)..index.offset(1, 11)], "'");
    }

    #[test]
    fn test_offset_clamps() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(1, 10), 3);
        assert_eq!(index.offset(9, 1), 5);
    }

    #[test]
    fn test_position_round_trip() {
        let text = "a\nbé c\n";
        let index = LineIndex::new(text);
        let offset = text.find('c').unwrap();
        let pos = index.position(offset);
        assert_eq!(pos, Position::new(2, 4));
        assert_eq!(index.offset(pos.line, pos.column), offset);
    }

    #[test]
    fn test_last_char_position() {
        let index = LineIndex::new("ab\nc;");
        assert_eq!(index.last_char_position(5), Position::new(2, 2));
        assert_eq!(index.last_char_position(3), Position::new(1, 3));
    }
}
