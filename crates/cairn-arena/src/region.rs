//! Regions and spans.
//!
//! A [`Region`] is the result of a successful allocation: a mutable byte
//! slice borrowed from the arena, tagged with its offset. A [`Span`] is the
//! plain `(offset, len)` record behind it, `Copy` and free of lifetimes,
//! for bookkeeping after the region itself has been dropped.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Location of an allocation within the arena's backing block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    /// Create a span.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// One past the last byte.
    ///
    /// An empty span from a full arena may sit past the arena's capacity,
    /// so `end()` is only bounded by capacity for non-empty spans.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether this is a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the two spans share at least one byte.
    ///
    /// Empty spans never overlap anything.
    pub fn overlaps(&self, other: &Span) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.offset < other.end()
            && other.offset < self.end()
    }

    /// Whether the start offset is a multiple of `align`.
    pub fn is_aligned_to(&self, align: usize) -> bool {
        align != 0 && self.offset % align == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

/// A region of arena memory handed out by an allocation.
///
/// The region borrows the arena, so the arena cannot be reset or destroyed
/// while the region is alive. Contents are whatever the block held before:
/// zeroes on a fresh arena, stale bytes after a reset. Never assume zeroed
/// memory.
pub struct Region<'a> {
    offset: usize,
    bytes: &'a mut [u8],
}

impl<'a> Region<'a> {
    pub(crate) fn new(offset: usize, bytes: &'a mut [u8]) -> Self {
        Self { offset, bytes }
    }

    /// Byte offset of this region within the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One past the last byte, as an arena offset.
    ///
    /// Can exceed the arena's capacity for an empty region: a zero-size
    /// allocation on a full arena still lands on its aligned offset.
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// The `(offset, len)` record for this region.
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.bytes.len())
    }

    /// Give up the offset tag and keep the slice for the full borrow.
    pub fn into_slice(self) -> &'a mut [u8] {
        self.bytes
    }
}

impl Deref for Region<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for Region<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("offset", &self.offset)
            .field("len", &self.bytes.len())
            .finish()
    }
}
