//! Arena usage counters.
//!
//! [`ArenaStats`] is a point-in-time snapshot taken under the arena's
//! cursor lock, so every field is consistent with every other.

/// Usage snapshot of a single arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Size of the backing block in bytes.
    pub capacity: usize,
    /// Bytes between the start of the block and the cursor (including
    /// alignment padding).
    pub used: usize,
    /// `capacity - used`.
    pub remaining: usize,
    /// Highest cursor position seen since creation, across resets.
    pub high_water: usize,
    /// Cumulative number of successful allocations.
    pub allocations: u64,
    /// Cumulative number of allocations rejected for lack of space.
    pub failed_allocations: u64,
    /// Cumulative number of resets.
    pub resets: u64,
}

impl ArenaStats {
    /// Fraction of the capacity in use, in `[0.0, 1.0]`.
    ///
    /// A zero-capacity arena reports `1.0` (nothing more fits).
    pub fn utilisation(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.used as f64 / self.capacity as f64
    }
}
