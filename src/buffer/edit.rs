//! Edit operations at the cursor.
//!
//! Every operation leaves the cursor on a live line and char; deleting the
//! node under the cursor moves the cursor to a surviving neighbour. Single
//! glyph edits are O(1); splitting and joining lines relink whole char
//! runs in O(1) as well.

use super::glyph::Glyph;
use super::Buffer;
use log::trace;

impl Buffer {
    /// Insert a character before the cursor and advance past it.
    ///
    /// `'\n'` splits the line instead. A lone `'\r'` is stored as content,
    /// so callers translating key input should map Enter to `'\n'`.
    pub fn insert_char(&mut self, c: char) {
        self.insert_glyph(Glyph::new(c));
    }

    /// Insert a glyph before the cursor and advance past it.
    ///
    /// A line break glyph splits the line. A glyph that pairs a line feed
    /// with another unit is inserted unit by unit, so no line ever holds a
    /// line feed.
    pub fn insert_glyph(&mut self, glyph: Glyph) {
        if glyph.is_line_break() {
            self.split_line();
            return;
        }
        if glyph.has_line_feed() {
            for &unit in glyph.units() {
                self.insert_char(unit);
            }
            return;
        }
        self.link_char_before(self.current_line, self.current_char, glyph);
        self.cursor_x += 1;
        self.update_real_x();
        self.touch();
    }

    /// Insert text at the cursor, splitting lines at line breaks.
    ///
    /// The cursor ends up right after the inserted text.
    pub fn insert_str(&mut self, text: &str) {
        for glyph in Glyph::split(text) {
            self.insert_glyph(glyph);
        }
    }

    /// Delete the glyph under the cursor.
    ///
    /// The cursor stays in the same column and now points at the following
    /// glyph. Nothing happens at end of line; joining with the next line is
    /// [`Buffer::join_line`]. Returns whether a glyph was deleted.
    pub fn delete_char(&mut self) -> bool {
        if self.is_eol() {
            return false;
        }
        let target = self.current_char;
        let Some(node) = self.chars.free(target) else {
            return false;
        };
        let Some(next) = node.next_char else {
            unreachable!("non-marker char without successor");
        };
        self.chars[next].prev_char = node.prev_char;
        match node.prev_char {
            Some(prev) => self.chars[prev].next_char = Some(next),
            None => self.lines[self.current_line].first_char = next,
        }
        self.lines[self.current_line].len -= 1;
        self.current_char = next;
        self.touch();
        true
    }

    /// Delete the glyph before the cursor, joining with the previous line
    /// at the beginning of a line. Returns whether anything changed.
    pub fn delete_backward(&mut self) -> bool {
        if !self.is_bol() {
            self.move_x(-1);
            self.delete_char()
        } else if !self.is_bob() {
            self.move_y(-1);
            self.move_x_end();
            self.join_line()
        } else {
            false
        }
    }

    /// Delete the line holding the cursor.
    ///
    /// The cursor moves to the start of the following line, or of the line
    /// above when the last line is deleted. A sole line is emptied instead
    /// of removed, so the buffer never loses its last line.
    pub fn delete_line(&mut self) {
        let target = self.current_line;
        let changed = if self.line_count == 1 {
            trace!("emptying sole line of {}", self.name);
            let had_content = !self.lines[target].is_empty();
            self.clear_line(target);
            had_content
        } else {
            trace!("deleting line {} of {}", self.cursor_y, self.name);
            if self.is_eob() {
                self.current_line = self.lines[target].prev_line;
                self.cursor_y -= 1;
            } else {
                self.current_line = self.lines[target].next_line;
            }
            self.unlink_line(target);
            self.free_line(target);
            true
        };
        self.current_char = self.lines[self.current_line].first_char;
        self.cursor_x = 0;
        self.update_real_x();
        if changed {
            self.touch();
        }
    }

    /// Move everything from the cursor to the end of the line onto a new
    /// line below, and put the cursor at the start of that line.
    pub fn split_line(&mut self) {
        let line = self.current_line;
        let at = self.current_char;
        trace!("splitting line {} at column {}", self.cursor_y, self.cursor_x);

        // The tail keeps the old marker; the head gets the new one.
        let tail = self.new_line();
        let spare_marker = self.lines[tail].first_char;
        let old_marker = self.lines[line].last_char;
        let moved = self.lines[line].len - self.cursor_x;

        let head_end = self.chars[at].prev_char.take();
        match head_end {
            Some(prev) => {
                self.chars[prev].next_char = Some(spare_marker);
                self.chars[spare_marker].prev_char = Some(prev);
            }
            None => self.lines[line].first_char = spare_marker,
        }
        self.lines[line].last_char = spare_marker;
        self.lines[line].len = self.cursor_x;

        let tail_node = &mut self.lines[tail];
        tail_node.first_char = at;
        tail_node.last_char = old_marker;
        tail_node.len = moved;

        self.link_line_after(line, tail);
        self.current_line = tail;
        self.current_char = at;
        self.cursor_x = 0;
        self.cursor_y += 1;
        self.update_real_x();
        self.touch();
    }

    /// Append the next line to the current one and remove it.
    ///
    /// The cursor keeps its column. Nothing happens on the last line.
    /// Returns whether the lines were joined.
    pub fn join_line(&mut self) -> bool {
        if self.is_eob() {
            return false;
        }
        let line = self.current_line;
        let below = self.lines[line].next_line;
        trace!("joining line {} with the next", self.cursor_y);

        let marker = self.lines[line].last_char;
        let below_first = self.lines[below].first_char;
        let below_last = self.lines[below].last_char;
        let below_len = self.lines[below].len;

        let head_end = self.chars[marker].prev_char;
        match head_end {
            Some(prev) => {
                self.chars[prev].next_char = Some(below_first);
                self.chars[below_first].prev_char = Some(prev);
            }
            None => self.lines[line].first_char = below_first,
        }
        if self.current_char == marker {
            self.current_char = below_first;
        }
        self.chars.free(marker);
        self.lines[line].last_char = below_last;
        self.lines[line].len += below_len;

        // The chars now belong to `line`; release only the emptied line node.
        self.unlink_line(below);
        self.lines.free(below);
        self.touch();
        true
    }
}
