//! Cairn: a fixed-capacity bump arena allocator.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Cairn sub-crates. For most users, adding `cairn` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cairn::prelude::*;
//!
//! let mut arena = Arena::new(1024)?;
//!
//! let mut header = arena.alloc_aligned(16, 8)?;
//! header.fill(0);
//! assert_eq!(header.offset(), 0);
//!
//! match arena.alloc_aligned(4096, 8) {
//!     Err(ArenaError::OutOfMemory { available, .. }) => assert_eq!(available, 1008),
//!     other => panic!("unexpected: {other:?}"),
//! }
//!
//! arena.reset();
//! assert_eq!(arena.remaining(), 1024);
//!
//! let stats = arena.destroy();
//! assert_eq!(stats.allocations, 1);
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `cairn-arena` | `Arena`, regions, spans, config, errors, stats |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena allocator, regions, and configuration (`cairn-arena`).
///
/// Alignment helpers live in [`arena::align`].
pub use cairn_arena as arena;

/// Common imports for typical Cairn usage.
///
/// ```rust
/// use cairn::prelude::*;
/// ```
pub mod prelude {
    pub use cairn_arena::{Arena, ArenaConfig, ArenaError, ArenaStats, Region, Span};
}
