//! Alignment arithmetic for extent planning
//!
//! Unbuffered (direct) I/O requires offsets, lengths and buffer addresses to be
//! multiples of the device block size. Buffered I/O has no such constraint, but
//! extents are still kept on record boundaries so that every transfer covers
//! whole records. The helpers here are pure and used by the planner, the
//! executor and the buffer sizing code.

/// Map a ratio in `[0, 1]` to `round(ratio * (max - min)) + min`
#[inline]
pub fn round_in_range(ratio: f64, min: u64, max: u64) -> u64 {
    (ratio * max.saturating_sub(min) as f64).round() as u64 + min
}

/// Map a ratio in `[0, 1]` to `floor(ratio * (max - min)) + min`
#[inline]
pub fn floor_in_range(ratio: f64, min: u64, max: u64) -> u64 {
    (ratio * max.saturating_sub(min) as f64).floor() as u64 + min
}

/// Map a ratio in `[0, 1]` to `ceil(ratio * (max - min)) + min`
#[inline]
pub fn ceil_in_range(ratio: f64, min: u64, max: u64) -> u64 {
    (ratio * max.saturating_sub(min) as f64).ceil() as u64 + min
}

/// Largest multiple of `unit` that is `<= x`
#[inline]
pub fn align_down(x: u64, unit: u64) -> u64 {
    debug_assert!(unit > 0);
    x - x % unit
}

/// Smallest multiple of `unit` that is `>= x`
#[inline]
pub fn align_up(x: u64, unit: u64) -> u64 {
    debug_assert!(unit > 0);
    x.div_ceil(unit) * unit
}

/// Size of the per-worker I/O buffer
///
/// The smallest multiple of `block_size` that holds one record, and never less
/// than one block.
pub fn buffer_size(record_size: u64, block_size: u64) -> u64 {
    align_up(record_size, block_size).max(block_size)
}

/// Unit that extent offsets and lengths are aligned to
pub fn alignment_unit(buffered: bool, record_size: u64, block_size: u64) -> u64 {
    if buffered {
        record_size
    } else {
        block_size
    }
}
