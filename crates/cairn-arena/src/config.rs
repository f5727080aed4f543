//! Arena configuration parameters.

use crate::align::is_valid_alignment;
use crate::error::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Controls the backing block size and the alignment defaults.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing block in bytes. Never grows.
    ///
    /// Default: 1024.
    pub capacity: usize,

    /// Alignment used by [`Arena::alloc`](crate::Arena::alloc).
    ///
    /// Default: 8. Must be a power of two and no larger than `block_align`.
    pub default_align: usize,

    /// Alignment of the backing block's base address.
    ///
    /// Offsets are always aligned as requested; addresses are aligned as
    /// well only for requests with `align <= block_align`.
    /// Default: 16. Must be a power of two.
    pub block_align: usize,
}

impl ArenaConfig {
    /// Default capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Default alignment for [`Arena::alloc`](crate::Arena::alloc).
    pub const DEFAULT_ALIGN: usize = 8;

    /// Default alignment of the backing block.
    pub const DEFAULT_BLOCK_ALIGN: usize = 16;

    /// Create a config for the given capacity with default alignments.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            default_align: Self::DEFAULT_ALIGN,
            block_align: Self::DEFAULT_BLOCK_ALIGN,
        }
    }

    /// Override the alignment used by `Arena::alloc`.
    pub fn with_default_align(mut self, align: usize) -> Self {
        self.default_align = align;
        self
    }

    /// Override the backing block alignment.
    pub fn with_block_align(mut self, align: usize) -> Self {
        self.block_align = align;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !is_valid_alignment(self.block_align) {
            return Err(ArenaError::InvalidArgument {
                reason: format!(
                    "block_align must be a non-zero power of two (got {})",
                    self.block_align
                ),
            });
        }
        if !is_valid_alignment(self.default_align) {
            return Err(ArenaError::InvalidArgument {
                reason: format!(
                    "default_align must be a non-zero power of two (got {})",
                    self.default_align
                ),
            });
        }
        if self.default_align > self.block_align {
            return Err(ArenaError::InvalidArgument {
                reason: format!(
                    "default_align ({}) exceeds block_align ({})",
                    self.default_align, self.block_align
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
