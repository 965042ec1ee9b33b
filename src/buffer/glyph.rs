//! Glyph: The atomic editable unit of a line.
//!
//! # Storage
//!
//! A glyph holds one or two `char` units inline:
//! - a primary code point
//! - an optional continuation unit (typically a combining mark)
//!
//! ```text
//! ┌──────────────────────────────┬────────┐
//! │  units                       │  len   │
//! │  [char; 2]                   │  u8    │
//! │  8 bytes                     │  1 b   │
//! └──────────────────────────────┴────────┘
//! ```
//!
//! Grapheme clusters longer than two code points (emoji ZWJ sequences,
//! stacked diacritics) are stored as consecutive glyphs by [`Glyph::split`].
//! Cursor movement treats every glyph as one column regardless of its
//! unit count or display width.

use std::fmt;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Maximum number of code points stored inline in a glyph.
pub const MAX_UNITS: usize = 2;

/// One editable character: a primary code point plus an optional
/// continuation unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// Inline code point storage. Only `units[..len]` is meaningful.
    units: [char; MAX_UNITS],
    /// Number of stored units (1 or 2).
    len: u8,
}

impl Glyph {
    /// Marker stored in every line's terminal node. Never written out.
    pub(crate) const EOL: Self = Self::new('\n');

    /// Create a single-unit glyph.
    #[inline]
    pub const fn new(c: char) -> Self {
        Self {
            units: [c, '\0'],
            len: 1,
        }
    }

    /// Create a two-unit glyph from a base character and a continuation.
    #[inline]
    pub const fn with_combining(base: char, mark: char) -> Self {
        Self {
            units: [base, mark],
            len: 2,
        }
    }

    /// Create a glyph from a grapheme string.
    ///
    /// Returns `None` if the string is empty or holds more than
    /// [`MAX_UNITS`] code points; use [`Glyph::split`] for arbitrary text.
    pub fn from_grapheme(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let first = chars.next()?;
        match (chars.next(), chars.next()) {
            (None, _) => Some(Self::new(first)),
            (Some(second), None) => Some(Self::with_combining(first, second)),
            (Some(_), Some(_)) => None,
        }
    }

    /// Split text into glyphs along extended grapheme cluster boundaries.
    ///
    /// Clusters that exceed the inline capacity are chunked into several
    /// glyphs, so no code point is ever dropped.
    pub fn split(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.graphemes(true).flat_map(|g| {
            let chars: Vec<char> = g.chars().collect();
            chars
                .chunks(MAX_UNITS)
                .map(|chunk| match chunk {
                    &[base, mark] => Self::with_combining(base, mark),
                    &[c] => Self::new(c),
                    _ => unreachable!("chunks never exceed MAX_UNITS"),
                })
                .collect::<Vec<_>>()
        })
    }

    /// The primary code point.
    #[inline]
    pub const fn primary(&self) -> char {
        self.units[0]
    }

    /// The continuation unit, if any.
    #[inline]
    pub const fn secondary(&self) -> Option<char> {
        if self.len > 1 {
            Some(self.units[1])
        } else {
            None
        }
    }

    /// The stored code points.
    #[inline]
    pub fn units(&self) -> &[char] {
        &self.units[..usize::from(self.len)]
    }

    /// Check whether this glyph carries a continuation unit.
    #[inline]
    pub const fn is_composite(&self) -> bool {
        self.len > 1
    }

    /// Check whether this glyph is exactly a line break (`\n` or `\r\n`).
    ///
    /// A lone `\r` is ordinary content.
    #[inline]
    pub const fn is_line_break(&self) -> bool {
        matches!(
            (self.len, self.units[0], self.units[1]),
            (1, '\n', _) | (2, '\r', '\n')
        )
    }

    /// Check whether any unit is a line feed.
    #[inline]
    pub fn has_line_feed(&self) -> bool {
        self.units().contains(&'\n')
    }

    /// Terminal display width in cells (0, 1 or 2).
    ///
    /// Control characters report 0.
    pub fn width(&self) -> usize {
        self.units()
            .iter()
            .map(|&c| UnicodeWidthChar::width(c).unwrap_or(0))
            .sum()
    }

    /// Encoded UTF-8 length in bytes.
    pub fn len_utf8(&self) -> usize {
        self.units().iter().map(|c| c.len_utf8()).sum()
    }

    /// Append this glyph's code points to a string.
    #[inline]
    pub fn push_to(&self, out: &mut String) {
        out.extend(self.units());
    }
}

impl From<char> for Glyph {
    #[inline]
    fn from(c: char) -> Self {
        Self::new(c)
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.units() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glyph({:?})", self.to_string())
    }
}
