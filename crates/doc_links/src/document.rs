//! Immutable text documents and offset/position mapping.

/// Zero-based line and UTF-16 code-unit column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A markup document as seen by the link extractor.
///
/// Invariant: `line_starts[0] == 0` and every entry is the byte offset just
/// past a `\n`, `\r\n` or lone `\r` terminator.
#[derive(Clone, Debug)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            text,
            line_starts,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset to a position.
    ///
    /// Offsets past the end clamp to the end; offsets inside a multi-byte
    /// character snap back to its first byte.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let character = utf16_len(&self.text[line_start..offset]);
        Position {
            line: saturating_u32(line),
            character: saturating_u32(character),
        }
    }

    /// Map a position back to a byte offset, clamping to the line's content.
    pub fn offset_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        let line_end = self.content_end_of_line(line);
        let mut remaining = position.character as usize;
        for (idx, ch) in self.text[line_start..line_end].char_indices() {
            if remaining == 0 {
                return line_start + idx;
            }
            remaining = remaining.saturating_sub(ch.len_utf16());
        }
        line_end
    }

    pub fn range_at(&self, start: usize, end: usize) -> Range {
        Range {
            start: self.position_at(start),
            end: self.position_at(end),
        }
    }

    fn content_end_of_line(&self, line: usize) -> usize {
        let next = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let bytes = self.text.as_bytes();
        let mut end = next;
        if line + 1 < self.line_starts.len() {
            if end > 0 && bytes[end - 1] == b'\n' {
                end -= 1;
            }
            if end > 0 && bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }
        end.max(self.line_starts[line])
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut line_starts = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                    i += 1;
                }
                line_starts.push(i + 1);
            }
            b'\n' => line_starts.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    line_starts
}

fn utf16_len(text: &str) -> usize {
    if text.is_ascii() {
        return text.len();
    }
    text.chars().map(char::len_utf16).sum()
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{Position, TextDocument};

    fn doc(text: &str) -> TextDocument {
        TextDocument::new("file:///t.html", "html", text)
    }

    #[test]
    fn positions_are_line_based() {
        let d = doc("a\nb\n");
        assert_eq!(d.line_count(), 3);
        assert_eq!(d.position_at(0), Position::new(0, 0));
        assert_eq!(d.position_at(2), Position::new(1, 0));
        assert_eq!(d.position_at(4), Position::new(2, 0));
    }

    #[test]
    fn crlf_and_lone_cr_terminate_lines() {
        let d = doc("a\r\nb\rc");
        assert_eq!(d.line_count(), 3);
        assert_eq!(d.position_at(3), Position::new(1, 0));
        assert_eq!(d.position_at(5), Position::new(2, 0));
    }

    #[test]
    fn characters_count_utf16_units() {
        // 'é' is one UTF-16 unit, '😊' is two.
        let d = doc("é😊x");
        assert_eq!(d.position_at(2), Position::new(0, 1));
        assert_eq!(d.position_at(6), Position::new(0, 3));
    }

    #[test]
    fn offsets_inside_chars_snap_back() {
        let d = doc("é");
        assert_eq!(d.position_at(1), Position::new(0, 0));
    }

    #[test]
    fn offsets_past_end_clamp() {
        let d = doc("abc");
        assert_eq!(d.position_at(99), Position::new(0, 3));
    }

    #[test]
    fn offset_at_inverts_position_at() {
        let d = doc("line one\r\nsé😊cond\nthird");
        for offset in [0, 4, 10, 11, 13, 17, 22, d.text().len()] {
            let position = d.position_at(offset);
            assert_eq!(d.offset_at(position), offset, "offset {offset}");
        }
    }

    #[test]
    fn offset_at_clamps_to_line_content() {
        let d = doc("ab\r\ncd");
        assert_eq!(d.offset_at(Position::new(0, 50)), 2);
        assert_eq!(d.offset_at(Position::new(9, 0)), d.text().len());
    }
}
