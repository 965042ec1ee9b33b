//! Buffer configuration.

use std::fmt;

/// Line terminator written between lines on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator as a string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Detect the ending used by the first line break in `text`.
    ///
    /// Returns `None` when the text has no line break.
    pub fn detect(text: &str) -> Option<Self> {
        let at = text.find('\n')?;
        if text[..at].ends_with('\r') {
            Some(Self::CrLf)
        } else {
            Some(Self::Lf)
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
        }
    }
}

/// Configuration for a buffer.
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Line ending for new buffers, and for loaded files when detection is off.
    pub line_ending: LineEnding,
    /// Whether new buffers end with a line break when saved.
    pub trailing_newline: bool,
    /// Whether loading a file adopts the file's own line ending.
    pub detect_line_ending: bool,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            trailing_newline: true,
            detect_line_ending: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ending_detect() {
        assert_eq!(LineEnding::detect("a\nb"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::detect("a\r\nb\n"), Some(LineEnding::CrLf));
        assert_eq!(LineEnding::detect("no break"), None);
        assert_eq!(LineEnding::detect("\r\n"), Some(LineEnding::CrLf));
    }

    #[test]
    fn test_config_default() {
        let config = BufferConfig::default();
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert!(config.trailing_newline);
        assert!(config.detect_line_ending);
    }
}
