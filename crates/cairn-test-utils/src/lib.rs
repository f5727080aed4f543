//! Test utilities for cairn development.
//!
//! Span assertions shared by the integration tests of the arena, the
//! benchmark workloads, and the CLI session tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use cairn_arena::Span;

/// Panic if any two non-empty spans overlap.
///
/// Sorts a copy of the input, so this is O(n log n) and suitable for the
/// thousands of spans produced by the concurrency tests.
pub fn assert_disjoint(spans: &[Span]) {
    let mut sorted: Vec<Span> = spans.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort();
    for pair in sorted.windows(2) {
        assert!(
            pair[0].end() <= pair[1].offset,
            "spans overlap: {} and {}",
            pair[0],
            pair[1]
        );
    }
}

/// Panic if any span's offset is not a multiple of `align`.
pub fn assert_all_aligned(spans: &[Span], align: usize) {
    for span in spans {
        assert!(
            span.is_aligned_to(align),
            "span {span} is not aligned to {align}"
        );
    }
}

/// Sum of span lengths.
pub fn total_len(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.len).sum()
}

/// Panic unless the spans tile `[0, end)` exactly, with no gaps.
pub fn assert_tiles(spans: &[Span], end: usize) {
    assert_disjoint(spans);
    assert_eq!(total_len(spans), end, "spans do not cover [0, {end})");
    assert!(
        spans.iter().all(|s| s.end() <= end),
        "span extends past {end}"
    );
}
