//! # Linebuf
//!
//! The in-memory text buffer of a line-oriented terminal editor.
//!
//! Linebuf stores a file as a doubly-linked list of lines, each holding a
//! doubly-linked list of glyphs, and keeps a cursor that is tracked both as
//! node identity and as visual coordinates.
//!
//! ## Core Concepts
//!
//! - **Sentinel-bounded lines**: Two permanent boundary lines remove every
//!   end-of-list special case
//! - **Terminal markers**: Each line ends in a marker node the cursor can
//!   rest on, so "end of line" is a node like any other
//! - **Remembered column**: Vertical moves restore the column the cursor had
//!   before crossing shorter lines
//! - **O(1) edits near the cursor**: Inserting, deleting, splitting and
//!   joining relink nodes instead of shifting arrays
//!
//! ## Example
//!
//! ```rust
//! use linebuf::Buffer;
//!
//! let mut buffer = Buffer::new("notes.txt");
//! buffer.insert_str("hello");
//! buffer.move_x_home();
//! buffer.move_x(2);
//! buffer.split_line();
//!
//! assert_eq!(buffer.text(), "he\nllo\n");
//! assert_eq!((buffer.cursor_x(), buffer.cursor_y()), (0, 1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use buffer::{Buffer, BufferFlags, BufferStats, Glyph, LineRef};
pub use config::{BufferConfig, LineEnding};
pub use error::{BufferError, Result};
