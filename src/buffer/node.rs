//! Nodes: Slot arenas holding the line list and each line's char list.
//!
//! Nodes refer to each other through typed indices instead of pointers.
//! The node types stay inside the crate; callers only see the ids and the
//! read-only views built on top of them.
//! Freed slots are recycled through a free list, so a long editing
//! session does not grow the arenas beyond their peak population.

use super::glyph::Glyph;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Typed index into an [`Arena`].
pub trait NodeId: Copy + Eq {
    /// Build an id from a raw slot index.
    fn from_slot(slot: u32) -> Self;
    /// The raw slot index.
    fn slot(self) -> usize;
}

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub struct $name(u32);

        impl NodeId for $name {
            #[inline]
            fn from_slot(slot: u32) -> Self {
                Self(slot)
            }

            #[inline]
            fn slot(self) -> usize {
                self.0 as usize
            }
        }
    };
}

node_id!(
    /// Handle to a char node owned by a buffer.
    CharId
);
node_id!(
    /// Handle to a line node owned by a buffer.
    LineId
);

/// One editable character position inside a line.
#[derive(Debug, Clone)]
pub struct CharNode {
    /// The glyph stored at this position.
    pub elem: Glyph,
    /// Previous char on the same line, `None` before `first_char`.
    pub prev_char: Option<CharId>,
    /// Next char on the same line, `None` after `last_char`.
    pub next_char: Option<CharId>,
}

impl CharNode {
    /// Create an unlinked node.
    pub const fn new(elem: Glyph) -> Self {
        Self {
            elem,
            prev_char: None,
            next_char: None,
        }
    }
}

/// One line: bounds of a char list plus links to sibling lines.
///
/// `last_char` is always the line's terminal marker, so the line is empty
/// exactly when `first_char == last_char`.
#[derive(Debug, Clone)]
pub struct LineNode {
    /// First char of the line (the marker when empty).
    pub first_char: CharId,
    /// Terminal marker of the line.
    pub last_char: CharId,
    /// Previous line. The leading sentinel links to itself.
    pub prev_line: LineId,
    /// Next line. The trailing sentinel links to itself.
    pub next_line: LineId,
    /// Number of glyphs, excluding the marker.
    pub len: usize,
}

impl LineNode {
    /// Check whether the line holds no glyphs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_char == self.last_char
    }
}

/// Slot storage for nodes of one kind.
#[derive(Debug, Clone)]
#[allow(clippy::len_without_is_empty)]
pub struct Arena<I, T> {
    /// Slots; `None` marks a freed slot.
    slots: Vec<Option<T>>,
    /// Freed slot indices ready for reuse.
    free: Vec<u32>,
    /// Number of occupied slots.
    live: usize,
    _id: PhantomData<I>,
}

impl<I: NodeId, T> Arena<I, T> {
    /// Create an empty arena.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            _id: PhantomData,
        }
    }

    /// Store a value and return its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` slots.
    pub fn alloc(&mut self, value: T) -> I {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(value);
            return I::from_slot(slot);
        }
        let slot = u32::try_from(self.slots.len()).expect("node arena exhausted");
        self.slots.push(Some(value));
        I::from_slot(slot)
    }

    /// Release a slot and return its value.
    pub fn free(&mut self, id: I) -> Option<T> {
        let value = self.slots.get_mut(id.slot())?.take()?;
        self.live -= 1;
        #[allow(clippy::cast_possible_truncation)]
        let slot = id.slot() as u32;
        self.free.push(slot);
        Some(value)
    }

    /// Number of live nodes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Number of allocated slots, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<I: NodeId, T> Index<I> for Arena<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, id: I) -> &T {
        match self.slots.get(id.slot()) {
            Some(Some(value)) => value,
            _ => panic!("dangling node id {}", id.slot()),
        }
    }
}

impl<I: NodeId, T> IndexMut<I> for Arena<I, T> {
    #[inline]
    fn index_mut(&mut self, id: I) -> &mut T {
        match self.slots.get_mut(id.slot()) {
            Some(Some(value)) => value,
            _ => panic!("dangling node id {}", id.slot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_alloc_free() {
        let mut arena: Arena<CharId, CharNode> = Arena::new();
        let a = arena.alloc(CharNode::new(Glyph::new('a')));
        let b = arena.alloc(CharNode::new(Glyph::new('b')));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[b].elem, Glyph::new('b'));

        let freed = arena.free(a).unwrap();
        assert_eq!(freed.elem, Glyph::new('a'));
        assert_eq!(arena.len(), 1);
        assert!(arena.free(a).is_none());
    }

    #[test]
    fn test_arena_reuses_slots() {
        let mut arena: Arena<CharId, CharNode> = Arena::new();
        let a = arena.alloc(CharNode::new(Glyph::new('a')));
        arena.alloc(CharNode::new(Glyph::new('b')));
        arena.free(a);

        let c = arena.alloc(CharNode::new(Glyph::new('c')));
        assert_eq!(c, a);
        assert_eq!(arena.capacity(), 2);
        assert_eq!(arena[c].elem, Glyph::new('c'));
    }

    #[test]
    #[should_panic(expected = "dangling node id")]
    fn test_arena_dangling_index() {
        let mut arena: Arena<CharId, CharNode> = Arena::new();
        let a = arena.alloc(CharNode::new(Glyph::new('a')));
        arena.free(a);
        let _ = &arena[a];
    }
}
