//! Buffer: The linked-line text store with its cursor.
//!
//! Lines form a doubly-linked list bounded by two permanent sentinel
//! lines. Every line owns a doubly-linked list of char nodes ending in a
//! terminal marker. The cursor is tracked twice: logically as a
//! (line, char) node pair and visually as `cursor_x`/`cursor_y`.
//!
//! ```text
//!   beg_sentinel ⇄ line 0 ⇄ line 1 ⇄ … ⇄ line n-1 ⇄ end_sentinel
//!                    │
//!                    └─ 'h' ⇄ 'e' ⇄ 'l' ⇄ 'l' ⇄ 'o' ⇄ ⏎ (marker)
//! ```
//!
//! Navigation lives in `navigate.rs`, edits in `edit.rs` and file I/O in
//! `io.rs`; all of them are `impl Buffer` blocks over the state below.

use super::flags::BufferFlags;
use super::glyph::Glyph;
use super::node::{Arena, CharId, CharNode, LineId, LineNode, NodeId};
use crate::config::{BufferConfig, LineEnding};
use std::fmt;

/// Name given to scratch buffers.
pub const SCRATCH_NAME: &str = "*scratch*";

/// An editable, cursor-addressable text buffer.
///
/// A buffer always holds at least one real line, and the cursor always
/// sits on a real line, never on a sentinel.
#[derive(Clone)]
pub struct Buffer {
    /// Char node storage for every line, sentinels included.
    pub(super) chars: Arena<CharId, CharNode>,
    /// Line node storage, sentinels included.
    pub(super) lines: Arena<LineId, LineNode>,
    /// Leading sentinel line.
    pub(super) beg_sentinel: LineId,
    /// Trailing sentinel line.
    pub(super) end_sentinel: LineId,
    /// Line holding the cursor.
    pub(super) current_line: LineId,
    /// Char the cursor points at (the marker at end of line).
    pub(super) current_char: CharId,
    /// Cursor column, counted in glyphs.
    pub(super) cursor_x: usize,
    /// Cursor row, counted in lines.
    pub(super) cursor_y: usize,
    /// Column to restore when moving onto a long-enough line.
    pub(super) cursor_real_x: usize,
    /// Horizontal scroll offset of the viewport.
    pub(super) displacement_x: usize,
    /// Vertical scroll offset of the viewport.
    pub(super) displacement_y: usize,
    /// Number of real lines.
    pub(super) line_count: usize,
    /// Buffer state.
    pub(super) flags: BufferFlags,
    /// Display name; the file path for file-backed buffers.
    pub(super) name: String,
    /// Configuration.
    pub(super) config: BufferConfig,
    /// Ending written between lines on save.
    pub(super) line_ending: LineEnding,
    /// Whether the last line is followed by a line break on save.
    pub(super) trailing_newline: bool,
}

impl Buffer {
    /// Create a buffer with one empty line and the default configuration.
    ///
    /// No I/O happens here; `name` only identifies the buffer until a file
    /// is read or saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, BufferConfig::default())
    }

    /// Create a buffer with one empty line and the given configuration.
    pub fn with_config(name: impl Into<String>, config: BufferConfig) -> Self {
        let mut chars = Arena::new();
        let mut lines = Arena::new();
        let beg_sentinel = Self::alloc_line(&mut chars, &mut lines);
        let end_sentinel = Self::alloc_line(&mut chars, &mut lines);
        let first = Self::alloc_line(&mut chars, &mut lines);

        lines[beg_sentinel].next_line = first;
        lines[first].prev_line = beg_sentinel;
        lines[first].next_line = end_sentinel;
        lines[end_sentinel].prev_line = first;
        let current_char = lines[first].first_char;

        Self {
            chars,
            lines,
            beg_sentinel,
            end_sentinel,
            current_line: first,
            current_char,
            cursor_x: 0,
            cursor_y: 0,
            cursor_real_x: 0,
            displacement_x: 0,
            displacement_y: 0,
            line_count: 1,
            flags: BufferFlags::empty(),
            name: name.into(),
            line_ending: config.line_ending,
            trailing_newline: config.trailing_newline,
            config,
        }
    }

    /// Create an anonymous scratch buffer with no backing file.
    pub fn scratch() -> Self {
        let mut buffer = Self::new(SCRATCH_NAME);
        buffer.flags.insert(BufferFlags::MEMORY);
        buffer
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Get the buffer name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the buffer flags.
    #[inline]
    pub const fn flags(&self) -> BufferFlags {
        self.flags
    }

    /// Check whether this is a scratch buffer with no backing file.
    #[inline]
    pub const fn is_memory(&self) -> bool {
        self.flags.contains(BufferFlags::MEMORY)
    }

    /// Check whether the content changed since the last load or save.
    #[inline]
    pub const fn is_modified(&self) -> bool {
        self.flags.contains(BufferFlags::MODIFIED)
    }

    /// Get the configuration.
    #[inline]
    pub const fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Line ending used on save.
    #[inline]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line ending used on save.
    pub fn set_line_ending(&mut self, ending: LineEnding) {
        if self.line_ending != ending {
            self.line_ending = ending;
            self.flags.insert(BufferFlags::MODIFIED);
        }
    }

    /// Whether the saved text ends with a line break.
    #[inline]
    pub const fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Choose whether the saved text ends with a line break.
    pub fn set_trailing_newline(&mut self, trailing: bool) {
        if self.trailing_newline != trailing {
            self.trailing_newline = trailing;
            self.flags.insert(BufferFlags::MODIFIED);
        }
    }

    /// Cursor column in glyphs.
    #[inline]
    pub const fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    /// Cursor row in lines.
    #[inline]
    pub const fn cursor_y(&self) -> usize {
        self.cursor_y
    }

    /// Remembered column for vertical moves.
    #[inline]
    pub const fn cursor_real_x(&self) -> usize {
        self.cursor_real_x
    }

    /// Horizontal scroll offset.
    #[inline]
    pub const fn displacement_x(&self) -> usize {
        self.displacement_x
    }

    /// Vertical scroll offset.
    #[inline]
    pub const fn displacement_y(&self) -> usize {
        self.displacement_y
    }

    /// Number of real lines (always at least one).
    #[inline]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    // ------------------------------------------------------------------
    // Cursor predicates
    // ------------------------------------------------------------------

    /// Cursor is at the beginning of its line.
    #[inline]
    pub fn is_bol(&self) -> bool {
        self.current_char == self.lines[self.current_line].first_char
    }

    /// Cursor is at the end of its line.
    #[inline]
    pub fn is_eol(&self) -> bool {
        self.current_char == self.lines[self.current_line].last_char
    }

    /// Cursor is on the first line of the buffer.
    #[inline]
    pub fn is_bob(&self) -> bool {
        self.lines[self.current_line].prev_line == self.beg_sentinel
    }

    /// Cursor is on the last line of the buffer.
    #[inline]
    pub fn is_eob(&self) -> bool {
        self.lines[self.current_line].next_line == self.end_sentinel
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// The line holding the cursor.
    pub fn current_line(&self) -> LineRef<'_> {
        LineRef::new(self, self.current_line)
    }

    /// The first real line.
    pub fn first_line(&self) -> LineRef<'_> {
        LineRef::new(self, self.lines[self.beg_sentinel].next_line)
    }

    /// The last real line.
    pub fn last_line(&self) -> LineRef<'_> {
        LineRef::new(self, self.lines[self.end_sentinel].prev_line)
    }

    /// The glyph under the cursor, `None` at end of line.
    pub fn current_glyph(&self) -> Option<Glyph> {
        if self.is_eol() {
            None
        } else {
            Some(self.chars[self.current_char].elem)
        }
    }

    /// Iterate over the real lines from top to bottom.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            next: self.lines[self.beg_sentinel].next_line,
            remaining: self.line_count,
        }
    }

    /// The whole content as saved, line endings included.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Node counts and estimated memory usage.
    pub fn stats(&self) -> BufferStats {
        let glyphs = self.lines().map(|line| line.len()).sum();
        BufferStats {
            lines: self.line_count,
            glyphs,
            char_nodes: self.chars.len(),
            line_nodes: self.lines.len(),
            bytes_estimated: self.chars.capacity() * std::mem::size_of::<Option<CharNode>>()
                + self.lines.capacity() * std::mem::size_of::<Option<LineNode>>()
                + self.name.capacity(),
        }
    }

    // ------------------------------------------------------------------
    // Structural helpers shared by edits and I/O
    // ------------------------------------------------------------------

    /// Allocate an unlinked empty line with its terminal marker.
    ///
    /// An unlinked line points at itself in both directions.
    pub(super) fn alloc_line(
        chars: &mut Arena<CharId, CharNode>,
        lines: &mut Arena<LineId, LineNode>,
    ) -> LineId {
        let marker = chars.alloc(CharNode::new(Glyph::EOL));
        let id = lines.alloc(LineNode {
            first_char: marker,
            last_char: marker,
            prev_line: LineId::from_slot(0),
            next_line: LineId::from_slot(0),
            len: 0,
        });
        lines[id].prev_line = id;
        lines[id].next_line = id;
        id
    }

    /// Allocate an empty line owned by this buffer.
    pub(super) fn new_line(&mut self) -> LineId {
        Self::alloc_line(&mut self.chars, &mut self.lines)
    }

    /// Link an unlinked line right after `at`.
    pub(super) fn link_line_after(&mut self, at: LineId, line: LineId) {
        let next = self.lines[at].next_line;
        self.lines[line].prev_line = at;
        self.lines[line].next_line = next;
        self.lines[at].next_line = line;
        self.lines[next].prev_line = line;
        self.line_count += 1;
    }

    /// Detach a real line from the list without freeing it.
    pub(super) fn unlink_line(&mut self, line: LineId) {
        debug_assert!(line != self.beg_sentinel && line != self.end_sentinel);
        let prev = self.lines[line].prev_line;
        let next = self.lines[line].next_line;
        self.lines[prev].next_line = next;
        self.lines[next].prev_line = prev;
        self.lines[line].prev_line = line;
        self.lines[line].next_line = line;
        self.line_count -= 1;
    }

    /// Free an unlinked line together with every char it owns.
    pub(super) fn free_line(&mut self, line: LineId) {
        debug_assert!(line != self.beg_sentinel && line != self.end_sentinel);
        if let Some(node) = self.lines.free(line) {
            let mut cursor = Some(node.first_char);
            while let Some(id) = cursor {
                cursor = self.chars.free(id).and_then(|c| c.next_char);
            }
        }
    }

    /// Free every glyph of a line, keeping its marker.
    pub(super) fn clear_line(&mut self, line: LineId) {
        let marker = self.lines[line].last_char;
        let mut cursor = self.lines[line].first_char;
        while cursor != marker {
            match self.chars.free(cursor).and_then(|c| c.next_char) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        self.chars[marker].prev_char = None;
        let node = &mut self.lines[line];
        node.first_char = marker;
        node.len = 0;
    }

    /// Link a new char holding `elem` right before `at` on `line`.
    pub(super) fn link_char_before(&mut self, line: LineId, at: CharId, elem: Glyph) -> CharId {
        let prev = self.chars[at].prev_char;
        let id = self.chars.alloc(CharNode {
            elem,
            prev_char: prev,
            next_char: Some(at),
        });
        self.chars[at].prev_char = Some(id);
        match prev {
            Some(prev) => self.chars[prev].next_char = Some(id),
            None => self.lines[line].first_char = id,
        }
        self.lines[line].len += 1;
        id
    }

    /// Put the cursor on the first glyph of the first line and reset the
    /// viewport.
    pub(super) fn reset_cursor(&mut self) {
        self.current_line = self.lines[self.beg_sentinel].next_line;
        self.current_char = self.lines[self.current_line].first_char;
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.cursor_real_x = 0;
        self.displacement_x = 0;
        self.displacement_y = 0;
    }

    /// Record that the content changed.
    #[inline]
    pub(super) fn touch(&mut self) {
        self.flags.insert(BufferFlags::MODIFIED);
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ending = self.line_ending.as_str();
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                f.write_str(ending)?;
            }
            for glyph in line.glyphs() {
                write!(f, "{glyph}")?;
            }
        }
        if self.trailing_newline {
            f.write_str(ending)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("lines", &self.line_count)
            .field("cursor", &(self.cursor_x, self.cursor_y))
            .field("cursor_real_x", &self.cursor_real_x)
            .field("displacement", &(self.displacement_x, self.displacement_y))
            .finish_non_exhaustive()
    }
}

/// Read-only view of one real line.
#[derive(Clone, Copy)]
pub struct LineRef<'a> {
    buffer: &'a Buffer,
    id: LineId,
}

impl<'a> LineRef<'a> {
    const fn new(buffer: &'a Buffer, id: LineId) -> Self {
        Self { buffer, id }
    }

    fn node(&self) -> &'a LineNode {
        &self.buffer.lines[self.id]
    }

    /// The line's handle.
    #[inline]
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// Number of glyphs on the line.
    #[inline]
    pub fn len(&self) -> usize {
        self.node().len
    }

    /// Check whether the line holds no glyphs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node().is_empty()
    }

    /// Iterate over the line's glyphs.
    pub fn glyphs(&self) -> Glyphs<'a> {
        let node = self.node();
        Glyphs {
            chars: &self.buffer.chars,
            next: node.first_char,
            end: node.last_char,
        }
    }

    /// The line content as a string, without a line ending.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        for glyph in self.glyphs() {
            glyph.push_to(&mut out);
        }
        out
    }

    /// Display width of the line in terminal cells.
    pub fn display_width(&self) -> usize {
        self.glyphs().map(|g| g.width()).sum()
    }

    /// The previous real line, `None` on the first line.
    pub fn prev(&self) -> Option<Self> {
        let prev = self.node().prev_line;
        (prev != self.buffer.beg_sentinel).then(|| Self::new(self.buffer, prev))
    }

    /// The next real line, `None` on the last line.
    pub fn next(&self) -> Option<Self> {
        let next = self.node().next_line;
        (next != self.buffer.end_sentinel).then(|| Self::new(self.buffer, next))
    }
}

impl fmt::Debug for LineRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineRef({:?})", self.text())
    }
}

/// Iterator over the glyphs of a line.
pub struct Glyphs<'a> {
    chars: &'a Arena<CharId, CharNode>,
    next: CharId,
    end: CharId,
}

impl Iterator for Glyphs<'_> {
    type Item = Glyph;

    fn next(&mut self) -> Option<Glyph> {
        if self.next == self.end {
            return None;
        }
        let node = &self.chars[self.next];
        self.next = node.next_char.unwrap_or(self.end);
        Some(node.elem)
    }
}

/// Iterator over the real lines of a buffer.
pub struct Lines<'a> {
    buffer: &'a Buffer,
    next: LineId,
    remaining: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineRef<'a>;

    fn next(&mut self) -> Option<LineRef<'a>> {
        if self.next == self.buffer.end_sentinel {
            return None;
        }
        let line = LineRef::new(self.buffer, self.next);
        self.next = self.buffer.lines[self.next].next_line;
        self.remaining = self.remaining.saturating_sub(1);
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}

/// Node counts and memory usage of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferStats {
    /// Number of real lines.
    pub lines: usize,
    /// Number of glyphs across all lines.
    pub glyphs: usize,
    /// Live char nodes, markers included.
    pub char_nodes: usize,
    /// Live line nodes, sentinels included.
    pub line_nodes: usize,
    /// Estimated memory usage in bytes.
    pub bytes_estimated: usize,
}

#[cfg(test)]
impl Buffer {
    /// Walk the whole structure and check every link and cached value.
    pub(crate) fn validate(&self) {
        let beg = &self.lines[self.beg_sentinel];
        let end = &self.lines[self.end_sentinel];
        assert_eq!(beg.prev_line, self.beg_sentinel, "leading sentinel outer link");
        assert_eq!(end.next_line, self.end_sentinel, "trailing sentinel outer link");
        assert!(beg.is_empty() && end.is_empty(), "sentinels hold content");

        let mut prev = self.beg_sentinel;
        let mut line = beg.next_line;
        let mut row = 0;
        let mut glyph_total = 0;
        let mut cursor_seen = false;
        while line != self.end_sentinel {
            assert_ne!(line, self.beg_sentinel, "line list loops back");
            let node = &self.lines[line];
            assert_eq!(node.prev_line, prev, "broken prev_line at row {row}");

            let mut prev_char = None;
            let mut ch = node.first_char;
            let mut col = 0;
            loop {
                let c = &self.chars[ch];
                assert_eq!(c.prev_char, prev_char, "broken prev_char at {row}:{col}");
                if line == self.current_line && ch == self.current_char {
                    assert_eq!(self.cursor_x, col, "cursor_x out of sync");
                    assert_eq!(self.cursor_y, row, "cursor_y out of sync");
                    cursor_seen = true;
                }
                if ch == node.last_char {
                    assert!(c.next_char.is_none(), "marker has a successor");
                    assert_eq!(c.elem, Glyph::EOL, "last_char is not a marker");
                    break;
                }
                assert!(!c.elem.has_line_feed(), "line feed stored as content at {row}:{col}");
                prev_char = Some(ch);
                ch = c.next_char.expect("char list ends before marker");
                col += 1;
            }
            assert_eq!(node.len, col, "cached length at row {row}");
            glyph_total += col;
            prev = line;
            line = node.next_line;
            row += 1;
        }
        assert_eq!(end.prev_line, prev, "trailing sentinel prev link");
        assert!(row >= 1, "buffer has no lines");
        assert_eq!(row, self.line_count, "cached line count");
        assert!(cursor_seen, "cursor is not on a real line");
        assert_eq!(self.lines.len(), row + 2, "leaked line nodes");
        assert_eq!(self.chars.len(), row + 2 + glyph_total, "leaked char nodes");
    }

    /// Lines as strings, for assertions.
    pub(crate) fn line_texts(&self) -> Vec<String> {
        self.lines().map(|line| line.text()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = Buffer::new("notes.txt");
        buffer.validate();
        assert_eq!(buffer.name(), "notes.txt");
        assert_eq!(buffer.line_count(), 1);
        assert!(buffer.current_line().is_empty());
        assert!(buffer.is_bol() && buffer.is_eol());
        assert!(buffer.is_bob() && buffer.is_eob());
        assert_eq!((buffer.cursor_x(), buffer.cursor_y()), (0, 0));
        assert_eq!(buffer.cursor_real_x(), 0);
        assert_eq!((buffer.displacement_x(), buffer.displacement_y()), (0, 0));
        assert!(!buffer.is_memory());
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_scratch_buffer() {
        let buffer = Buffer::scratch();
        assert_eq!(buffer.name(), SCRATCH_NAME);
        assert!(buffer.is_memory());
        assert!(buffer.flags().contains(BufferFlags::MEMORY));
    }

    #[test]
    fn test_empty_line_uses_one_marker() {
        let buffer = Buffer::new("a");
        let stats = buffer.stats();
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.glyphs, 0);
        // One marker per sentinel plus one for the real line
        assert_eq!(stats.char_nodes, 3);
        assert_eq!(stats.line_nodes, 3);
        assert!(stats.bytes_estimated > 0);
    }

    #[test]
    fn test_line_navigation_stops_at_sentinels() {
        let mut buffer = Buffer::new("a");
        buffer.load_text("one\ntwo\nthree");
        let first = buffer.first_line();
        assert!(first.prev().is_none());
        let second = first.next().unwrap();
        assert_eq!(second.text(), "two");
        let third = second.next().unwrap();
        assert!(third.next().is_none());
        assert_eq!(third.id(), buffer.last_line().id());
        assert_eq!(buffer.lines().len(), 3);
    }

    #[test]
    fn test_display_width() {
        let mut buffer = Buffer::new("a");
        buffer.load_text("漢字ab");
        let line = buffer.current_line();
        assert_eq!(line.len(), 4);
        assert_eq!(line.display_width(), 6);
    }

    #[test]
    fn test_current_glyph() {
        let mut buffer = Buffer::new("a");
        buffer.load_text("xy");
        assert_eq!(buffer.current_glyph(), Some(Glyph::new('x')));
        buffer.move_x_end();
        assert_eq!(buffer.current_glyph(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buffer = Buffer::new("a");
        buffer.load_text("abc");
        let copy = buffer.clone();
        buffer.delete_char();
        assert_eq!(buffer.line_texts(), vec!["bc"]);
        assert_eq!(copy.line_texts(), vec!["abc"]);
        copy.validate();
    }
}
