//! Low-level backing block for the arena.
//!
//! This is the only module that touches the system allocator. [`RawBlock`]
//! owns one zero-filled heap block and hands out byte slices by offset;
//! the caller is responsible for never handing out two live slices that
//! overlap. Every `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::ArenaError;

/// A fixed-size, heap-allocated byte block.
///
/// The block is allocated once, zero-filled, and released exactly once in
/// `Drop`. A zero-length block does not allocate at all.
pub(crate) struct RawBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: `RawBlock` owns its allocation outright (like `Box<[u8]>`). Shared
// access only produces slices through `slice_mut`, whose contract requires
// disjoint ranges, which the arena guarantees under its cursor lock.
unsafe impl Send for RawBlock {}
// SAFETY: see `Send` above.
unsafe impl Sync for RawBlock {}

impl RawBlock {
    /// Allocate a zero-filled block of exactly `len` bytes aligned to `align`.
    ///
    /// Returns `OutOfMemory` if the layout is unrepresentable (e.g. `len`
    /// exceeds `isize::MAX`) or the system allocator refuses the request.
    pub(crate) fn zeroed(len: usize, align: usize) -> Result<Self, ArenaError> {
        let out_of_memory = ArenaError::OutOfMemory {
            requested: len,
            available: 0,
        };
        let layout = Layout::from_size_align(len, align).map_err(|_| out_of_memory.clone())?;

        if len == 0 {
            // A dangling pointer with the block alignment is valid for
            // zero-length slices and never passed to `dealloc`.
            let ptr = NonNull::new(std::ptr::without_provenance_mut(align)).ok_or(out_of_memory)?;
            return Ok(Self { ptr, layout });
        }

        // SAFETY: `layout` has a non-zero size, checked above.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(out_of_memory)?;
        Ok(Self { ptr, layout })
    }

    /// Length of the block in bytes.
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Base address of the block.
    #[cfg(test)]
    pub(crate) fn base(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Borrow `len` bytes starting at `offset` mutably.
    ///
    /// # Safety
    ///
    /// - `offset + len` must not exceed [`RawBlock::len`] unless `len` is 0.
    /// - No other slice overlapping `[offset, offset + len)` may be alive
    ///   for the returned lifetime.
    ///
    /// An empty slice still points at `base + offset`, so its address keeps
    /// whatever alignment the offset has relative to the block.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn slice_mut(&self, offset: usize, len: usize) -> &mut [u8] {
        if len == 0 {
            // SAFETY: a zero-length slice never reads or writes memory; it
            // only needs a non-null pointer aligned for `u8`. `wrapping_add`
            // keeps the address computation defined even when `offset` lies
            // past the end of the block.
            return unsafe {
                std::slice::from_raw_parts_mut(self.ptr.as_ptr().wrapping_add(offset), 0)
            };
        }
        debug_assert!(offset.checked_add(len).is_some_and(|end| end <= self.len()));
        // SAFETY: the range is in bounds of one live allocation (caller
        // contract), the bytes were initialised by `alloc_zeroed`, and no
        // overlapping slice exists (caller contract).
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(offset), len) }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        if self.layout.size() == 0 {
            return;
        }
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact
        // layout, and `drop` runs once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
