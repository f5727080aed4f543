//! Fixed-capacity bump arena.
//!
//! An [`Arena`] owns one contiguous block of bytes, allocated once and never
//! resized. Callers carve aligned [`Region`]s out of it in O(1) by bumping a
//! cursor, and reclaim everything at once with [`Arena::reset`]. There is no
//! per-region free, no compaction, and no growth.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── RawBlock        (one heap block, zero-filled at creation, freed on drop)
//! ├── Mutex<Cursor>   (per-instance lock: offset + counters)
//! └── ArenaConfig     (capacity, default alignment, block alignment)
//!
//!   0                    offset                         capacity
//!   ├──────┬──┬──────────┼──────────────────────────────────┤
//!   │  R1  │▒▒│    R2    │              free                │
//!   └──────┴──┴──────────┴──────────────────────────────────┘
//!           ▲ alignment padding
//! ```
//!
//! # Ownership rules
//!
//! - Allocation takes `&self`, so threads can share an arena and allocate
//!   concurrently. The cursor update is serialised by the arena's own lock.
//! - A [`Region`] borrows the arena. [`Arena::reset`] takes `&mut self` and
//!   [`Arena::destroy`] takes `self`, so neither compiles while a region is
//!   alive.
//! - Failures come back as [`ArenaError`]. Running out of space is
//!   [`ArenaError::OutOfMemory`], never a panic or an empty region.
//!
//! # Safety
//!
//! `unsafe` is confined to `raw.rs` plus the single slice hand-off in
//! [`Arena::alloc_aligned`], each with a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod align;
pub mod arena;
pub mod config;
pub mod error;
pub mod metrics;
mod raw;
pub mod region;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use metrics::ArenaStats;
pub use region::{Region, Span};
