//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// There is no "used after destroy" variant: [`Arena::destroy`] consumes
/// the arena, so calling anything on a destroyed arena does not compile.
///
/// [`Arena::destroy`]: crate::Arena::destroy
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Not enough memory to satisfy the request.
    ///
    /// Returned by allocation when the aligned request does not fit in the
    /// remaining capacity, and by construction when the backing block
    /// cannot be obtained from the system allocator (`available` is 0).
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left between the cursor and the end of the block.
        available: usize,
    },
    /// A caller-supplied argument is invalid (non-power-of-two alignment,
    /// inconsistent configuration).
    InvalidArgument {
        /// Description of what was wrong.
        reason: String,
    },
}

impl ArenaError {
    pub(crate) fn invalid_alignment(align: usize) -> Self {
        Self::InvalidArgument {
            reason: format!("alignment must be a non-zero power of two (got {align})"),
        }
    }

    /// Whether this error means the arena ran out of space.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                available,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes, {available} bytes available"
                )
            }
            Self::InvalidArgument { reason } => {
                write!(f, "invalid argument: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
