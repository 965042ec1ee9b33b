//! Cursor navigation.
//!
//! Moves are sequences of single steps that stop at line or buffer
//! boundaries. Each move returns the number of steps actually taken, so
//! "move until blocked" loops need no knowledge of line lengths.

use super::Buffer;

impl Buffer {
    /// Move the cursor horizontally by `dx` glyphs.
    ///
    /// Stops at the beginning or end of the line without wrapping. The
    /// remembered column is resynchronized to the new `cursor_x`.
    /// Returns the number of steps taken.
    pub fn move_x(&mut self, dx: isize) -> usize {
        let mut steps = 0;
        for _ in 0..dx.unsigned_abs() {
            let node = &self.chars[self.current_char];
            let target = if dx > 0 {
                if self.is_eol() {
                    break;
                }
                node.next_char
            } else {
                if self.is_bol() {
                    break;
                }
                node.prev_char
            };
            let Some(target) = target else { break };
            self.current_char = target;
            if dx > 0 {
                self.cursor_x += 1;
            } else {
                self.cursor_x -= 1;
            }
            steps += 1;
        }
        self.update_real_x();
        steps
    }

    /// Move the cursor vertically by `dy` lines.
    ///
    /// Stops at the first or last line. On the new line the cursor lands
    /// on the remembered column, clamped to the line length; the
    /// remembered column itself is left untouched.
    /// Returns the number of steps taken.
    pub fn move_y(&mut self, dy: isize) -> usize {
        let mut steps = 0;
        for _ in 0..dy.unsigned_abs() {
            if dy > 0 {
                if self.is_eob() {
                    break;
                }
                self.current_line = self.lines[self.current_line].next_line;
                self.cursor_y += 1;
            } else {
                if self.is_bob() {
                    break;
                }
                self.current_line = self.lines[self.current_line].prev_line;
                self.cursor_y -= 1;
            }
            steps += 1;
        }
        if steps > 0 {
            self.seek_column(self.cursor_real_x);
        }
        steps
    }

    /// Move to the end of the line. Returns the steps taken.
    pub fn move_x_end(&mut self) -> usize {
        let mut total = 0;
        loop {
            match self.move_x(1) {
                0 => break total,
                n => total += n,
            }
        }
    }

    /// Move to the beginning of the line. Returns the steps taken.
    pub fn move_x_home(&mut self) -> usize {
        let mut total = 0;
        loop {
            match self.move_x(-1) {
                0 => break total,
                n => total += n,
            }
        }
    }

    /// Move to the last line. Returns the steps taken.
    pub fn move_y_bottom(&mut self) -> usize {
        let mut total = 0;
        loop {
            match self.move_y(1) {
                0 => break total,
                n => total += n,
            }
        }
    }

    /// Move to the first line. Returns the steps taken.
    pub fn move_y_top(&mut self) -> usize {
        let mut total = 0;
        loop {
            match self.move_y(-1) {
                0 => break total,
                n => total += n,
            }
        }
    }

    /// Make the current column the remembered column.
    #[inline]
    pub const fn update_real_x(&mut self) {
        self.cursor_real_x = self.cursor_x;
    }

    /// Place the cursor at `column` on the current line, clamped to its length.
    fn seek_column(&mut self, column: usize) {
        let line = &self.lines[self.current_line];
        let mut ch = line.first_char;
        let mut x = 0;
        while x < column && ch != line.last_char {
            match self.chars[ch].next_char {
                Some(next) => ch = next,
                None => break,
            }
            x += 1;
        }
        self.current_char = ch;
        self.cursor_x = x;
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Set the scroll offsets directly.
    pub const fn set_displacement(&mut self, x: usize, y: usize) {
        self.displacement_x = x;
        self.displacement_y = y;
    }

    /// Scroll as little as possible so the cursor is inside a viewport of
    /// `width` x `height` cells. Returns whether the displacement changed.
    pub const fn scroll_to_cursor(&mut self, width: usize, height: usize) -> bool {
        let (old_x, old_y) = (self.displacement_x, self.displacement_y);
        self.displacement_x = Self::scroll_axis(self.cursor_x, self.displacement_x, width);
        self.displacement_y = Self::scroll_axis(self.cursor_y, self.displacement_y, height);
        old_x != self.displacement_x || old_y != self.displacement_y
    }

    /// Cursor position relative to the viewport origin.
    pub const fn screen_cursor(&self) -> (usize, usize) {
        (
            self.cursor_x.saturating_sub(self.displacement_x),
            self.cursor_y.saturating_sub(self.displacement_y),
        )
    }

    const fn scroll_axis(pos: usize, offset: usize, size: usize) -> usize {
        if size == 0 {
            offset
        } else if pos < offset {
            pos
        } else if pos >= offset + size {
            pos + 1 - size
        } else {
            offset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(text: &str) -> Buffer {
        let mut buffer = Buffer::new("test");
        buffer.load_text(text);
        buffer
    }

    #[test]
    fn test_move_x_steps_and_clamps() {
        let mut buffer = buffer_with("hello");
        assert_eq!(buffer.move_x(2), 2);
        assert_eq!(buffer.cursor_x(), 2);
        assert_eq!(buffer.current_glyph().unwrap().primary(), 'l');

        // Asking for more than the line holds stops at end of line
        assert_eq!(buffer.move_x(10), 3);
        assert!(buffer.is_eol());
        assert_eq!(buffer.cursor_x(), 5);
        assert_eq!(buffer.move_x(1), 0);

        assert_eq!(buffer.move_x(-7), 5);
        assert!(buffer.is_bol());
        assert_eq!(buffer.move_x(-1), 0);
        buffer.validate();
    }

    #[test]
    fn test_move_x_does_not_wrap() {
        let mut buffer = buffer_with("ab\ncd");
        buffer.move_x_end();
        assert_eq!(buffer.move_x(1), 0);
        assert_eq!(buffer.cursor_y(), 0);
        buffer.move_y(1);
        buffer.move_x_home();
        assert_eq!(buffer.move_x(-1), 0);
        assert_eq!(buffer.cursor_y(), 1);
    }

    #[test]
    fn test_move_x_end_and_home() {
        let mut buffer = buffer_with("abcdef");
        assert_eq!(buffer.move_x_end(), 6);
        assert!(buffer.is_eol());
        assert_eq!(buffer.cursor_real_x(), 6);
        assert_eq!(buffer.move_x_home(), 6);
        assert!(buffer.is_bol());
        assert_eq!(buffer.cursor_real_x(), 0);
    }

    #[test]
    fn test_move_x_on_empty_line() {
        let mut buffer = Buffer::new("test");
        assert_eq!(buffer.move_x(1), 0);
        assert_eq!(buffer.move_x(-1), 0);
        assert_eq!(buffer.move_x(0), 0);
        assert!(buffer.is_bol() && buffer.is_eol());
    }

    #[test]
    fn test_move_y_stops_at_buffer_bounds() {
        let mut buffer = buffer_with("a\nb\nc");
        assert_eq!(buffer.move_y(-1), 0);
        assert_eq!(buffer.move_y(5), 2);
        assert!(buffer.is_eob());
        assert_eq!(buffer.cursor_y(), 2);
        assert_eq!(buffer.move_y(1), 0);
        assert_eq!(buffer.move_y_top(), 2);
        assert!(buffer.is_bob());
        assert_eq!(buffer.move_y_bottom(), 2);
        assert!(buffer.is_eob());
        buffer.validate();
    }

    #[test]
    fn test_remembered_column_survives_short_line() {
        let mut buffer = buffer_with("0123456789\nabc\n0123456789");
        buffer.move_x(8);
        assert_eq!(buffer.cursor_x(), 8);

        buffer.move_y(1);
        assert_eq!(buffer.cursor_x(), 3);
        assert!(buffer.is_eol());
        assert_eq!(buffer.cursor_real_x(), 8);

        buffer.move_y(-1);
        assert_eq!(buffer.cursor_x(), 8);
        assert_eq!(buffer.current_glyph().unwrap().primary(), '8');

        // Passing over the short line keeps the column too
        buffer.move_y(2);
        assert_eq!(buffer.cursor_x(), 8);
        buffer.validate();
    }

    #[test]
    fn test_horizontal_move_resets_remembered_column() {
        let mut buffer = buffer_with("0123456789\nabc\n0123456789");
        buffer.move_x(8);
        buffer.move_y(1);
        buffer.move_x(-1);
        assert_eq!(buffer.cursor_real_x(), 2);
        buffer.move_y(1);
        assert_eq!(buffer.cursor_x(), 2);
    }

    #[test]
    fn test_blocked_move_y_keeps_column() {
        let mut buffer = buffer_with("abc");
        buffer.move_x(2);
        assert_eq!(buffer.move_y(1), 0);
        assert_eq!(buffer.cursor_x(), 2);
    }

    #[test]
    fn test_scroll_to_cursor() {
        let mut buffer = buffer_with(&"line\n".repeat(50));
        assert!(!buffer.scroll_to_cursor(10, 20));

        buffer.move_y(30);
        assert!(buffer.scroll_to_cursor(10, 20));
        assert_eq!(buffer.displacement_y(), 11);
        assert_eq!(buffer.screen_cursor(), (0, 19));

        buffer.move_y(-25);
        buffer.scroll_to_cursor(10, 20);
        assert_eq!(buffer.displacement_y(), 5);
        assert_eq!(buffer.screen_cursor(), (0, 0));

        buffer.move_x_end();
        buffer.scroll_to_cursor(3, 20);
        assert_eq!(buffer.displacement_x(), 2);
        assert_eq!(buffer.screen_cursor(), (2, 0));
    }

    #[test]
    fn test_scroll_zero_sized_viewport() {
        let mut buffer = buffer_with("abc\ndef");
        buffer.move_y(1);
        buffer.set_displacement(4, 4);
        assert!(!buffer.scroll_to_cursor(0, 0));
        assert_eq!(buffer.screen_cursor(), (0, 0));
    }
}
