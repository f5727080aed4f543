//! The fixed-capacity bump arena.
//!
//! An [`Arena`] owns one backing block and a cursor. Allocation rounds the
//! cursor up to the requested alignment, checks the end against capacity,
//! and bumps the cursor. The cursor lives behind a per-instance `Mutex`,
//! so any number of threads may allocate through `&Arena` at once.
//!
//! Reset and destroy need exclusive access (`&mut self` / `self`), which
//! the borrow checker only grants once every [`Region`] has been dropped.
//! Stale regions are therefore a compile error rather than a runtime check.

use std::alloc::Layout;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::align::{align_up, is_valid_alignment};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::metrics::ArenaStats;
use crate::raw::RawBlock;
use crate::region::{Region, Span};

/// Cursor state guarded by the arena's lock.
#[derive(Debug, Default)]
struct Cursor {
    /// Next free byte. Invariant: `offset <= capacity`.
    offset: usize,
    high_water: usize,
    allocations: u64,
    failed_allocations: u64,
    resets: u64,
}

/// A fixed-size bump allocator.
///
/// # Example
///
/// ```
/// use cairn_arena::{Arena, ArenaError};
///
/// let mut arena = Arena::new(1024).unwrap();
///
/// let region = arena.alloc_aligned(100, 8).unwrap();
/// assert_eq!(region.offset(), 0);
/// assert_eq!(arena.used(), 100);
///
/// let err = arena.alloc_aligned(1000, 8).unwrap_err();
/// assert!(matches!(err, ArenaError::OutOfMemory { .. }));
/// assert_eq!(arena.used(), 100);
///
/// arena.reset();
/// assert_eq!(arena.alloc_aligned(1000, 8).unwrap().offset(), 0);
/// ```
pub struct Arena {
    /// Backing storage. Allocated once, never resized.
    block: RawBlock,
    /// Bump cursor and counters. One lock per arena.
    cursor: Mutex<Cursor>,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena with `capacity` bytes and default alignments.
    ///
    /// Returns `OutOfMemory` if the backing block cannot be obtained.
    /// A capacity of zero is accepted; every non-empty allocation from
    /// such an arena fails.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from an explicit configuration.
    ///
    /// Returns `InvalidArgument` if the configuration fails validation,
    /// or `OutOfMemory` if the backing block cannot be obtained.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let block = RawBlock::zeroed(config.capacity, config.block_align).inspect_err(|e| {
            debug!(capacity = config.capacity, error = %e, "arena backing block unavailable");
        })?;
        debug!(
            capacity = config.capacity,
            block_align = config.block_align,
            "arena created"
        );
        Ok(Self {
            block,
            cursor: Mutex::new(Cursor::default()),
            config,
        })
    }

    /// Allocate `size` bytes at the configured default alignment.
    pub fn alloc(&self, size: usize) -> Result<Region<'_>, ArenaError> {
        self.alloc_aligned(size, self.config.default_align)
    }

    /// Allocate space for `layout`.
    ///
    /// Unlike [`Arena::alloc_aligned`], this also guarantees the *address*
    /// alignment, so `layout.align()` may not exceed the block alignment.
    pub fn alloc_layout(&self, layout: Layout) -> Result<Region<'_>, ArenaError> {
        if layout.align() > self.config.block_align {
            return Err(ArenaError::InvalidArgument {
                reason: format!(
                    "layout alignment {} exceeds block alignment {}",
                    layout.align(),
                    self.config.block_align
                ),
            });
        }
        self.alloc_aligned(layout.size(), layout.align())
    }

    /// Allocate `size` bytes whose offset is a multiple of `align`.
    ///
    /// On success the cursor moves to the end of the returned region. On
    /// failure the cursor does not move.
    ///
    /// - `align` must be a non-zero power of two, else `InvalidArgument`.
    /// - If `round_up(used, align) + size > capacity`, returns `OutOfMemory`.
    /// - `size == 0` always succeeds. If the aligned offset falls past the
    ///   end of the block, the empty region sits there and the cursor is
    ///   left alone.
    ///
    /// The region's contents are unspecified. Do not assume zeroes.
    pub fn alloc_aligned(&self, size: usize, align: usize) -> Result<Region<'_>, ArenaError> {
        if !is_valid_alignment(align) {
            return Err(ArenaError::invalid_alignment(align));
        }
        let span = self.reserve(size, align)?;

        // SAFETY: `reserve` handed out `span` under the cursor lock and moved
        // the cursor past it, so no other live region overlaps it until the
        // next `reset`, which needs `&mut self` and so cannot run while this
        // region borrows `self`. Non-empty spans end at or before capacity.
        #[allow(unsafe_code)]
        let bytes = unsafe { self.block.slice_mut(span.offset, span.len) };
        Ok(Region::new(span.offset, bytes))
    }

    /// Claim `[round_up(offset, align), +size)` and bump the cursor.
    fn reserve(&self, size: usize, align: usize) -> Result<Span, ArenaError> {
        let capacity = self.block.len();
        let mut cursor = self.lock();

        let start = align_up(cursor.offset, align);
        let end = start
            .and_then(|s| s.checked_add(size))
            .filter(|&end| end <= capacity);

        match (start, end) {
            (Some(start), Some(end)) => {
                cursor.offset = end;
                cursor.high_water = cursor.high_water.max(end);
                cursor.allocations += 1;
                trace!(offset = start, size, align, "arena alloc");
                Ok(Span::new(start, size))
            }
            (Some(start), None) if size == 0 => {
                cursor.allocations += 1;
                Ok(Span::new(start, 0))
            }
            _ => {
                cursor.failed_allocations += 1;
                let available = capacity - cursor.offset;
                debug!(size, align, available, "arena alloc failed: out of memory");
                Err(ArenaError::OutOfMemory {
                    requested: size,
                    available,
                })
            }
        }
    }

    /// Rewind the cursor to zero. Backing bytes are not cleared.
    ///
    /// Taking `&mut self` means no region from before the reset can still
    /// be alive:
    ///
    /// ```compile_fail
    /// let mut arena = cairn_arena::Arena::new(64).unwrap();
    /// let region = arena.alloc(8).unwrap();
    /// arena.reset();
    /// drop(region);
    /// ```
    pub fn reset(&mut self) {
        let cursor = self
            .cursor
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let released = cursor.offset;
        cursor.offset = 0;
        cursor.resets += 1;
        debug!(released, resets = cursor.resets, "arena reset");
    }

    /// Release the backing block and return the final counters.
    ///
    /// Consumes the arena, so it runs at most once and nothing can use the
    /// arena afterwards. Simply dropping the arena releases the block too.
    ///
    /// ```compile_fail
    /// let arena = cairn_arena::Arena::new(64).unwrap();
    /// arena.destroy();
    /// arena.alloc(8).unwrap();
    /// ```
    pub fn destroy(self) -> ArenaStats {
        let stats = self.stats();
        debug!(
            capacity = stats.capacity,
            high_water = stats.high_water,
            allocations = stats.allocations,
            "arena destroyed"
        );
        stats
    }

    /// Bytes still available at alignment 1 (`capacity - used`).
    pub fn remaining(&self) -> usize {
        self.block.len() - self.lock().offset
    }

    /// Current cursor position, padding included.
    pub fn used(&self) -> usize {
        self.lock().offset
    }

    /// Size of the backing block in bytes.
    pub fn capacity(&self) -> usize {
        self.block.len()
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Consistent snapshot of usage counters.
    pub fn stats(&self) -> ArenaStats {
        let capacity = self.block.len();
        let cursor = self.lock();
        ArenaStats {
            capacity,
            used: cursor.offset,
            remaining: capacity - cursor.offset,
            high_water: cursor.high_water,
            allocations: cursor.allocations,
            failed_allocations: cursor.failed_allocations,
            resets: cursor.resets,
        }
    }

    /// Lock the cursor. The critical sections are plain arithmetic and
    /// leave the cursor consistent at every step, so a poisoned lock still
    /// holds valid state.
    fn lock(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lifecycle_scenario() {
        let mut arena = Arena::new(1024).unwrap();

        let first = arena.alloc_aligned(100, 8).unwrap();
        assert_eq!(first.offset(), 0);
        assert_eq!(first.len(), 100);
        assert_eq!(arena.used(), 100);

        let err = arena.alloc_aligned(1000, 8).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: 1000,
                available: 924,
            }
        );
        assert_eq!(arena.used(), 100);

        arena.reset();
        let again = arena.alloc_aligned(1000, 8).unwrap();
        assert_eq!(again.offset(), 0);
        assert_eq!(arena.used(), 1000);
    }

    #[test]
    fn sequential_allocs_are_aligned_and_disjoint() {
        let arena = Arena::new(256).unwrap();
        let a = arena.alloc_aligned(3, 1).unwrap().span();
        let b = arena.alloc_aligned(10, 8).unwrap().span();
        let c = arena.alloc_aligned(1, 16).unwrap().span();

        assert_eq!(a, Span::new(0, 3));
        assert_eq!(b, Span::new(8, 10));
        assert_eq!(c, Span::new(32, 1));
        assert!(!a.overlaps(&b) && !b.overlaps(&c) && !a.overlaps(&c));
        assert_eq!(arena.used(), 33);
    }

    #[test]
    fn exact_fit_succeeds_then_full() {
        let arena = Arena::new(64).unwrap();
        arena.alloc_aligned(64, 1).unwrap();
        assert_eq!(arena.remaining(), 0);
        assert!(arena.alloc_aligned(1, 1).unwrap_err().is_out_of_memory());
    }

    #[test]
    fn padding_counts_against_capacity() {
        let arena = Arena::new(16).unwrap();
        arena.alloc_aligned(1, 1).unwrap();
        // round_up(1, 8) + 9 = 17 > 16
        let err = arena.alloc_aligned(9, 8).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: 9,
                available: 15,
            }
        );
        assert_eq!(arena.used(), 1);
        assert_eq!(arena.alloc_aligned(8, 8).unwrap().offset(), 8);
    }

    #[test]
    fn non_power_of_two_alignment_is_rejected() {
        let arena = Arena::new(64).unwrap();
        arena.alloc_aligned(5, 1).unwrap();
        for align in [0, 3, 6, 12, 100] {
            let err = arena.alloc_aligned(4, align).unwrap_err();
            assert!(matches!(err, ArenaError::InvalidArgument { .. }));
        }
        assert_eq!(arena.used(), 5);
        assert_eq!(arena.stats().failed_allocations, 0);
    }

    #[test]
    fn zero_size_alloc_advances_only_to_alignment() {
        let arena = Arena::new(64).unwrap();
        arena.alloc_aligned(3, 1).unwrap();
        let empty = arena.alloc_aligned(0, 8).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.offset(), 8);
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn zero_size_alloc_succeeds_on_full_arena() {
        let arena = Arena::new(10).unwrap();
        arena.alloc_aligned(10, 1).unwrap();
        let empty = arena.alloc_aligned(0, 16).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.offset(), 16);
        assert!(empty.end() > arena.capacity());
        assert_eq!(arena.used(), 10);
    }

    #[test]
    fn zero_capacity_arena() {
        let arena = Arena::new(0).unwrap();
        assert_eq!(arena.capacity(), 0);
        assert!(arena.alloc_aligned(0, 8).unwrap().is_empty());
        assert!(arena.alloc_aligned(1, 1).unwrap_err().is_out_of_memory());
    }

    #[test]
    fn huge_capacity_is_out_of_memory() {
        let result = Arena::new(usize::MAX);
        assert!(matches!(result, Err(ArenaError::OutOfMemory { .. })));
    }

    #[test]
    fn oversized_request_does_not_overflow() {
        let arena = Arena::new(64).unwrap();
        arena.alloc_aligned(1, 1).unwrap();
        let err = arena.alloc_aligned(usize::MAX, 8).unwrap_err();
        assert!(err.is_out_of_memory());
        assert_eq!(arena.used(), 1);
    }

    #[test]
    fn reset_does_not_clear_bytes() {
        let mut arena = Arena::new(32).unwrap();
        arena.alloc_aligned(16, 1).unwrap().fill(0xAB);
        arena.reset();
        assert_eq!(arena.used(), 0);
        let region = arena.alloc_aligned(16, 1).unwrap();
        assert!(region.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn writes_land_in_distinct_regions() {
        let arena = Arena::new(64).unwrap();
        let mut a = arena.alloc(8).unwrap();
        let mut b = arena.alloc(8).unwrap();
        a.fill(1);
        b.fill(2);
        assert!(a.iter().all(|&v| v == 1));
        assert!(b.iter().all(|&v| v == 2));
    }

    #[test]
    fn alloc_uses_default_alignment() {
        let config = ArenaConfig::new(64).with_default_align(4);
        let arena = Arena::with_config(config).unwrap();
        arena.alloc(1).unwrap();
        assert_eq!(arena.alloc(1).unwrap().offset(), 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ArenaConfig::new(64).with_block_align(3);
        assert!(matches!(
            Arena::with_config(config),
            Err(ArenaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn alloc_layout_aligns_addresses() {
        let arena = Arena::new(256).unwrap();
        arena.alloc_aligned(1, 1).unwrap();
        let region = arena.alloc_layout(Layout::new::<u64>()).unwrap();
        assert_eq!(region.len(), 8);
        assert_eq!(region.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
    }

    #[test]
    fn zero_size_alloc_layout_keeps_address_alignment() {
        let layout = Layout::from_size_align(0, 8).unwrap();

        let fresh = Arena::new(256).unwrap();
        let region = fresh.alloc_layout(layout).unwrap();
        assert!(region.is_empty());
        assert_eq!(region.as_ptr() as usize % 8, 0);

        let offset_one = Arena::new(256).unwrap();
        offset_one.alloc_aligned(1, 1).unwrap();
        let region = offset_one.alloc_layout(layout).unwrap();
        assert_eq!(region.offset(), 8);
        assert_eq!(region.as_ptr() as usize % 8, 0);

        let full = Arena::new(10).unwrap();
        full.alloc_aligned(10, 1).unwrap();
        let region = full.alloc_layout(layout).unwrap();
        assert_eq!(region.offset(), 16);
        assert_eq!(region.as_ptr() as usize % 8, 0);
    }

    #[test]
    fn alloc_layout_rejects_over_aligned() {
        let arena = Arena::new(256).unwrap();
        let layout = Layout::from_size_align(8, 64).unwrap();
        let err = arena.alloc_layout(layout).unwrap_err();
        assert!(err.to_string().contains("exceeds block alignment"));
    }

    #[test]
    fn stats_track_counters() {
        let mut arena = Arena::new(100).unwrap();
        arena.alloc_aligned(60, 1).unwrap();
        arena.alloc_aligned(60, 1).unwrap_err();
        arena.reset();
        arena.alloc_aligned(10, 1).unwrap();

        let stats = arena.stats();
        assert_eq!(
            stats,
            ArenaStats {
                capacity: 100,
                used: 10,
                remaining: 90,
                high_water: 60,
                allocations: 2,
                failed_allocations: 1,
                resets: 1,
            }
        );
    }

    #[test]
    fn destroy_returns_final_stats() {
        let arena = Arena::new(128).unwrap();
        arena.alloc(40).unwrap();
        let stats = arena.destroy();
        assert_eq!(stats.used, 40);
        assert_eq!(stats.allocations, 1);
    }

    #[test]
    fn arena_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arena>();
    }

    #[test]
    fn debug_shows_usage() {
        let arena = Arena::new(32).unwrap();
        arena.alloc(4).unwrap();
        let text = format!("{arena:?}");
        assert!(text.contains("capacity: 32"));
        assert!(text.contains("used: 4"));
    }

    fn arb_request() -> impl Strategy<Value = (usize, usize)> {
        (0usize..300, 0u32..7).prop_map(|(size, shift)| (size, 1usize << shift))
    }

    proptest! {
        #[test]
        fn alloc_matches_model(
            capacity in 0usize..2048,
            requests in prop::collection::vec(arb_request(), 1..40),
        ) {
            let arena = Arena::new(capacity).unwrap();
            let mut spans: Vec<Span> = Vec::new();

            for (size, align) in requests {
                let before = arena.used();
                let expected_start = align_up(before, align).unwrap();
                let fits = expected_start + size <= capacity;

                match arena.alloc_aligned(size, align) {
                    Ok(region) => {
                        prop_assert!(fits || size == 0);
                        prop_assert_eq!(region.offset(), expected_start);
                        prop_assert!(region.span().is_aligned_to(align));
                        prop_assert_eq!(region.len(), size);
                        spans.push(region.span());
                    }
                    Err(err) => {
                        prop_assert!(!fits);
                        prop_assert!(err.is_out_of_memory());
                        prop_assert_eq!(arena.used(), before);
                    }
                }

                let after = arena.used();
                prop_assert!(after >= before);
                prop_assert!(after <= capacity);
            }

            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    prop_assert!(!a.overlaps(b), "{} overlaps {}", a, b);
                }
            }
        }

        #[test]
        fn reset_makes_full_capacity_available(
            capacity in 0usize..4096,
            fill in 0usize..4096,
        ) {
            let mut arena = Arena::new(capacity).unwrap();
            let _ = arena.alloc_aligned(fill.min(capacity), 1);
            arena.reset();
            let region = arena.alloc_aligned(capacity, 1).unwrap();
            prop_assert_eq!(region.offset(), 0);
            prop_assert_eq!(region.len(), capacity);
            prop_assert!(arena.alloc_aligned(1, 1).unwrap_err().is_out_of_memory());
        }
    }
}
