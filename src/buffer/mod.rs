//! Buffer module: The linked-line text store and its cursor.
//!
//! This module contains:
//! - [`Glyph`]: The atomic editable character unit
//! - [`CharId`] / [`LineId`]: Handles to the arena-allocated list nodes
//! - [`Buffer`]: Sentinel-bounded line list with cursor state
//! - Navigation, edit and file I/O operations on [`Buffer`]

mod glyph;
mod node;
mod flags;
#[allow(clippy::module_inception)]
mod buffer;
mod navigate;
mod edit;
mod io;

pub use glyph::{Glyph, MAX_UNITS};
pub use node::{CharId, LineId};
pub use flags::BufferFlags;
pub use buffer::{Buffer, BufferStats, Glyphs, LineRef, Lines, SCRATCH_NAME};
