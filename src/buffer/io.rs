//! Loading and saving buffer content.
//!
//! Files are read whole and validated before the buffer is touched, so a
//! failed read leaves the buffer exactly as it was. The detected line
//! ending and the presence of a final line break are remembered, which
//! makes an untouched load/save reproduce the file byte for byte.

use super::flags::BufferFlags;
use super::glyph::Glyph;
use super::Buffer;
use crate::config::LineEnding;
use crate::error::{BufferError, Result};
use log::debug;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

impl Buffer {
    /// Replace the content with the file at `path` and adopt its name.
    ///
    /// On success the cursor and viewport return to the origin and the
    /// buffer becomes a clean, file-backed buffer. On failure nothing
    /// changes.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| BufferError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;

        self.load_text(&text);
        self.name = path.to_string_lossy().into_owned();
        self.flags.remove(BufferFlags::MEMORY);
        debug!(
            "read {} lines ({} bytes, {}) from {}",
            self.line_count,
            text.len(),
            self.line_ending,
            self.name
        );
        Ok(())
    }

    /// Replace the content with everything `reader` yields.
    ///
    /// Fails with [`io::ErrorKind::InvalidData`] on non UTF-8 input, in
    /// which case the buffer is unchanged.
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> io::Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.load_text(&text);
        Ok(())
    }

    /// Replace the content with `text`.
    ///
    /// Produces one line per line break (an empty text gives one empty
    /// line). The cursor and viewport return to the origin and the buffer
    /// is marked unmodified.
    pub fn load_text(&mut self, text: &str) {
        let detected = LineEnding::detect(text);
        self.line_ending = if self.config.detect_line_ending {
            detected.unwrap_or(self.config.line_ending)
        } else {
            self.config.line_ending
        };
        let split_ending = detected.unwrap_or(LineEnding::Lf);

        let body = text.strip_suffix(split_ending.as_str());
        self.trailing_newline = body.is_some();
        let body = body.unwrap_or(text);

        self.clear_lines();
        let mut at = self.beg_sentinel;
        let mut pieces = body.split('\n').peekable();
        while let Some(raw) = pieces.next() {
            // The last piece has no line feed after it, so a '\r' there is content
            let content = match split_ending {
                LineEnding::CrLf if pieces.peek().is_some() => {
                    raw.strip_suffix('\r').unwrap_or(raw)
                }
                _ => raw,
            };
            let line = self.new_line();
            let marker = self.lines[line].last_char;
            for glyph in Glyph::split(content) {
                self.link_char_before(line, marker, glyph);
            }
            self.link_line_after(at, line);
            at = line;
        }

        self.reset_cursor();
        self.flags.remove(BufferFlags::MODIFIED);
    }

    /// Write the content to the file named by the buffer.
    pub fn save_file(&mut self) -> Result<()> {
        if self.is_memory() {
            return Err(BufferError::NoBackingFile {
                name: self.name.clone(),
            });
        }
        self.write_path(Path::new(&self.name))?;
        self.flags.remove(BufferFlags::MODIFIED);
        Ok(())
    }

    /// Write the content to `path` and make it the buffer's file.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_path(path)?;
        self.name = path.to_string_lossy().into_owned();
        self.flags.remove(BufferFlags::MEMORY | BufferFlags::MODIFIED);
        Ok(())
    }

    /// Write the content, line endings included, to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    fn write_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| BufferError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|e| BufferError::io(path, e))?;
        debug!(
            "wrote {} lines ({}) to {}",
            self.line_count,
            self.line_ending,
            path.display()
        );
        Ok(())
    }

    /// Free every real line, leaving only the linked sentinels.
    ///
    /// The cursor dangles until the caller links a line and resets it.
    fn clear_lines(&mut self) {
        let mut line = self.lines[self.beg_sentinel].next_line;
        while line != self.end_sentinel {
            let next = self.lines[line].next_line;
            self.unlink_line(line);
            self.free_line(line);
            line = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BufferConfig;

    #[test]
    fn test_load_text_lines() {
        let mut buffer = Buffer::new("test");
        buffer.load_text("alpha\nbeta\n\ngamma\n");
        buffer.validate();
        assert_eq!(buffer.line_texts(), vec!["alpha", "beta", "", "gamma"]);
        assert!(buffer.trailing_newline());
        assert_eq!(buffer.line_ending(), LineEnding::Lf);
        assert_eq!((buffer.cursor_x(), buffer.cursor_y()), (0, 0));
    }

    #[test]
    fn test_load_empty_text() {
        let mut buffer = Buffer::new("test");
        buffer.insert_str("junk\nmore");
        buffer.load_text("");
        buffer.validate();
        assert_eq!(buffer.line_count(), 1);
        assert!(buffer.current_line().is_empty());
        assert!(!buffer.trailing_newline());
        assert!(!buffer.is_modified());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_load_crlf() {
        let mut buffer = Buffer::new("test");
        buffer.load_text("one\r\ntwo\r\n");
        buffer.validate();
        assert_eq!(buffer.line_texts(), vec!["one", "two"]);
        assert_eq!(buffer.line_ending(), LineEnding::CrLf);
        assert_eq!(buffer.text(), "one\r\ntwo\r\n");
    }

    #[test]
    fn test_text_round_trip() {
        for text in [
            "",
            "\n",
            "a",
            "a\n",
            "a\n\nb",
            "a\r\nb",
            "\r\n\r\n",
            "x\u{301}y\n",
            "a\r\nb\r",
            "a\r\r\n",
            "a\r\nb\r\r\n",
        ] {
            let mut buffer = Buffer::new("test");
            buffer.load_text(text);
            buffer.validate();
            assert_eq!(buffer.text(), text, "round trip of {text:?}");
        }
    }

    #[test]
    fn test_crlf_keeps_carriage_return_without_line_feed() {
        let mut buffer = Buffer::new("test");
        buffer.load_text("a\r\nb\r");
        assert_eq!(buffer.line_ending(), LineEnding::CrLf);
        assert!(!buffer.trailing_newline());
        assert_eq!(buffer.line_texts(), vec!["a", "b\r"]);

        buffer.load_text("a\r\r\n");
        assert!(buffer.trailing_newline());
        assert_eq!(buffer.line_texts(), vec!["a\r"]);
    }

    #[test]
    fn test_forced_line_ending() {
        let config = BufferConfig {
            line_ending: LineEnding::CrLf,
            detect_line_ending: false,
            ..BufferConfig::default()
        };
        let mut buffer = Buffer::with_config("test", config);
        buffer.load_text("a\nb\n");
        assert_eq!(buffer.line_texts(), vec!["a", "b"]);
        assert_eq!(buffer.text(), "a\r\nb\r\n");
    }

    #[test]
    fn test_new_buffer_text_uses_config() {
        let mut buffer = Buffer::new("test");
        buffer.insert_str("hi");
        assert_eq!(buffer.text(), "hi\n");
        buffer.set_trailing_newline(false);
        assert_eq!(buffer.text(), "hi");
        buffer.split_line();
        buffer.set_line_ending(LineEnding::CrLf);
        assert_eq!(buffer.text(), "hi\r\n");
    }

    #[test]
    fn test_read_from_and_write_to() {
        let mut buffer = Buffer::new("test");
        buffer.read_from("first\nsecond\n".as_bytes()).unwrap();
        buffer.move_y(1);
        buffer.insert_str(">> ");

        let mut out = Vec::new();
        buffer.write_to(&mut out).unwrap();
        assert_eq!(out, b"first\n>> second\n");
    }

    #[test]
    fn test_read_from_invalid_utf8_keeps_buffer() {
        let mut buffer = Buffer::new("test");
        buffer.load_text("keep me");
        buffer.move_x(2);
        let err = buffer.read_from(&[0xff, 0xfe, b'\n'][..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        buffer.validate();
        assert_eq!(buffer.line_texts(), vec!["keep me"]);
        assert_eq!(buffer.cursor_x(), 2);
    }

    #[test]
    fn test_save_scratch_fails() {
        let mut buffer = Buffer::scratch();
        buffer.insert_str("data");
        let err = buffer.save_file().unwrap_err();
        assert!(matches!(err, BufferError::NoBackingFile { .. }));
        assert!(buffer.is_modified());
    }
}
