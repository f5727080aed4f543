//! Workload generators for benchmarking and stress-testing cairn arenas.
//!
//! All generators are deterministic for a given seed:
//!
//! - [`request_sizes`]: uniformly distributed sizes at a single alignment
//! - [`mixed_requests`]: sizes paired with random power-of-two alignments
//! - [`fill`]: replay a request list against an arena and collect spans

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cairn_arena::{Arena, ArenaError, Span};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Capacity of the reference benchmark arena: 1 MiB.
pub const REFERENCE_CAPACITY: usize = 1 << 20;

/// A single allocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Bytes requested.
    pub size: usize,
    /// Requested alignment (power of two).
    pub align: usize,
}

/// Result of replaying a request list with [`fill`].
#[derive(Clone, Debug, Default)]
pub struct FillOutcome {
    /// Spans granted, in request order.
    pub granted: Vec<Span>,
    /// Requests refused with out-of-memory.
    pub refused: usize,
}

/// `count` sizes drawn uniformly from `1..=max_size`.
pub fn request_sizes(seed: u64, count: usize, max_size: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.random_range(1..=max_size.max(1)))
        .collect()
}

/// `count` requests with sizes in `0..=max_size` and alignments in
/// `1, 2, 4, ..., 1 << max_align_shift`.
pub fn mixed_requests(seed: u64, count: usize, max_size: usize, max_align_shift: u32) -> Vec<Request> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Request {
            size: rng.random_range(0..=max_size),
            align: 1usize << rng.random_range(0..=max_align_shift),
        })
        .collect()
}

/// Replay `requests` against `arena`, continuing past failures.
///
/// Only out-of-memory failures are counted; any other error (an invalid
/// alignment in the request list) is returned immediately.
pub fn fill(arena: &Arena, requests: &[Request]) -> Result<FillOutcome, ArenaError> {
    let mut outcome = FillOutcome::default();
    for req in requests {
        match arena.alloc_aligned(req.size, req.align) {
            Ok(region) => outcome.granted.push(region.span()),
            Err(ArenaError::OutOfMemory { .. }) => outcome.refused += 1,
            Err(err) => return Err(err),
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_sizes_deterministic_and_bounded() {
        let a = request_sizes(42, 500, 64);
        let b = request_sizes(42, 500, 64);
        assert_eq!(a, b);
        assert!(a.iter().all(|&s| (1..=64).contains(&s)));
        assert_ne!(a, request_sizes(43, 500, 64));
    }

    #[test]
    fn mixed_requests_use_power_of_two_alignments() {
        let reqs = mixed_requests(7, 1000, 128, 6);
        assert!(reqs.iter().all(|r| r.align.is_power_of_two() && r.align <= 64));
        assert!(reqs.iter().all(|r| r.size <= 128));
    }

    #[test]
    fn fill_counts_refusals() {
        let arena = Arena::new(100).unwrap();
        let reqs = vec![Request { size: 60, align: 1 }; 3];
        let outcome = fill(&arena, &reqs).unwrap();
        assert_eq!(outcome.granted, vec![Span::new(0, 60)]);
        assert_eq!(outcome.refused, 2);
    }

    #[test]
    fn fill_propagates_invalid_alignment() {
        let arena = Arena::new(100).unwrap();
        let reqs = [Request { size: 1, align: 3 }];
        assert!(matches!(
            fill(&arena, &reqs),
            Err(ArenaError::InvalidArgument { .. })
        ));
    }
}
