// ✏️ Text Buffer - the editable one-id-per-line serialization
//
// Cursor columns count chars, not bytes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content; cursor goes to the start
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = 0;
        self.col = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (row, col) of the cursor
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(offset, _)| offset)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let offset = self.byte_offset();
        self.lines[self.row].insert(offset, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let offset = self.byte_offset();
        let rest = self.lines[self.row].split_off(offset);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Delete before the cursor, joining lines at column 0.
    /// Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            let offset = self.byte_offset();
            self.lines[self.row].remove(offset);
            true
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    /// Delete under the cursor, joining the next line at end of line
    pub fn delete(&mut self) -> bool {
        if self.col < self.line_len(self.row) {
            let offset = self.byte_offset();
            self.lines[self.row].remove(offset);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let buffer = TextBuffer::from_text("1\n2\n3");
        assert_eq!(buffer.lines().len(), 3);
        assert_eq!(buffer.text(), "1\n2\n3");
        assert_eq!(TextBuffer::new().text(), "");
    }

    #[test]
    fn test_typing_and_newlines() {
        let mut buffer = TextBuffer::from_text("1\n3");
        buffer.move_end();
        buffer.insert_newline();
        buffer.insert_char('2');

        assert_eq!(buffer.text(), "1\n2\n3");
        assert_eq!(buffer.cursor(), (1, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = TextBuffer::from_text("12\n34");
        buffer.move_down();
        buffer.move_home();

        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "1234");
        assert_eq!(buffer.cursor(), (0, 2));

        buffer.move_home();
        assert!(!buffer.backspace());
    }

    #[test]
    fn test_delete_at_end_of_line() {
        let mut buffer = TextBuffer::from_text("1\n2");
        buffer.move_end();
        assert!(buffer.delete());
        assert_eq!(buffer.text(), "12");
        buffer.move_end();
        assert!(!buffer.delete());
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut buffer = TextBuffer::from_text("é1");
        buffer.move_right();
        buffer.insert_char('x');
        assert_eq!(buffer.text(), "éx1");
        assert!(buffer.backspace());
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "1");
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut buffer = TextBuffer::from_text("151\n2");
        buffer.move_end();
        buffer.move_down();
        assert_eq!(buffer.cursor(), (1, 1));
        buffer.move_up();
        assert_eq!(buffer.cursor(), (0, 1));
    }
}
