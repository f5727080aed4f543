//! Alignment arithmetic.

/// Whether `align` is usable as an alignment (non-zero power of two).
pub const fn is_valid_alignment(align: usize) -> bool {
    align.is_power_of_two()
}

/// Round `value` up to the next multiple of `align`.
///
/// `align` must be a power of two. Returns `None` if the rounded value
/// does not fit in `usize`.
///
/// # Examples
///
/// ```
/// use cairn_arena::align::align_up;
///
/// assert_eq!(align_up(13, 8), Some(16));
/// assert_eq!(align_up(16, 8), Some(16));
/// assert_eq!(align_up(usize::MAX, 2), None);
/// ```
pub const fn align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    match value.checked_add(mask) {
        Some(bumped) => Some(bumped & !mask),
        None => None,
    }
}
