//! Modular cursor arithmetic over a ring of `capacity` frames.
//!
//! All positions are frame indices in `[0, capacity)`. Offsets may be any
//! size; they are reduced modulo `capacity` before use so no intermediate
//! value can underflow.

/// Advance `pos` by `delta` frames, wrapping at `capacity`
#[inline]
pub fn advance(pos: usize, delta: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0 && pos < capacity);
    (pos + delta % capacity) % capacity
}

/// Move `pos` back by `delta` frames, wrapping at `capacity`
#[inline]
pub fn retreat(pos: usize, delta: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0 && pos < capacity);
    (pos + capacity - delta % capacity) % capacity
}

/// Number of frames from `from` forward to `to`, in `[0, capacity)`
#[inline]
pub fn distance(from: usize, to: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0 && from < capacity && to < capacity);
    (to + capacity - from) % capacity
}

/// Read position that trails `write_pos` by the live delay plus the shift
///
/// `(write_pos - live_delay - shift) mod capacity`
#[inline]
pub fn live_read_position(
    write_pos: usize,
    live_delay: usize,
    shift: usize,
    capacity: usize,
) -> usize {
    retreat(retreat(write_pos, live_delay, capacity), shift, capacity)
}

/// Split a run of `len` frames starting at `start` into at most two
/// contiguous ranges: `(start..start + first)` and `(0..second)`.
#[inline]
pub fn split_run(start: usize, len: usize, capacity: usize) -> (usize, usize) {
    debug_assert!(len <= capacity);
    let first = len.min(capacity - start);
    (first, len - first)
}
