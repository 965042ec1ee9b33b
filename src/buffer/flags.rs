//! Buffer state flags.

use bitflags::bitflags;

bitflags! {
    /// Buffer-level state.
    ///
    /// # Example
    /// ```
    /// use linebuf::BufferFlags;
    /// let flags = BufferFlags::MEMORY | BufferFlags::MODIFIED;
    /// assert!(flags.contains(BufferFlags::MEMORY));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u8 {
        /// Scratch buffer with no backing file
        const MEMORY = 0b0000_0001;
        /// Content changed since the last load or save
        const MODIFIED = 0b0000_0010;
    }
}

impl std::fmt::Debug for BufferFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}
