//! Ring Index Arithmetic
//!
//! All modulo/wraparound bookkeeping for the circular trace backend lives in
//! this one helper, so random access, iteration and bulk copy share a single
//! logical-to-physical mapping instead of three chances at an off-by-one.

use std::ops::Range;

/// Head/tail bookkeeping for a fixed-capacity ring of slots
///
/// Logical index 0 is the oldest retained slot; physical slot of logical `i`
/// is `(tail + i) % capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RingIndex {
    capacity: usize,
    /// Physical index of the oldest retained slot
    tail: usize,
    len: usize,
    /// Slots ever appended, monotonic across overwrites
    appended: u64,
}

impl RingIndex {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        RingIndex {
            capacity,
            tail: 0,
            len: 0,
            appended: 0,
        }
    }

    /// A ring holding `len` slots laid out contiguously from physical 0
    pub fn with_len(capacity: usize, len: usize) -> Self {
        assert!(len <= capacity);
        let mut r = Self::new(capacity);
        r.len = len;
        r.appended = len as u64;
        r
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Total slots ever appended (keeps advancing after saturation)
    pub fn total_appended(&self) -> u64 {
        self.appended
    }

    /// Physical slot of logical index `i` (caller checks `i < len`)
    pub fn physical(&self, i: usize) -> usize {
        debug_assert!(i < self.len);
        (self.tail + i) % self.capacity
    }

    /// Physical slot the next append will write to
    pub fn next_slot(&self) -> usize {
        if self.is_full() {
            self.tail
        } else {
            (self.tail + self.len) % self.capacity
        }
    }

    /// Commit an append to [`Self::next_slot`]; overwrites the oldest slot
    /// once full
    pub fn advance(&mut self) {
        if self.is_full() {
            self.tail = (self.tail + 1) % self.capacity;
        } else {
            self.len += 1;
        }
        self.appended += 1;
    }

    pub fn clear(&mut self) {
        self.tail = 0;
        self.len = 0;
        self.appended = 0;
    }

    /// Discard the `n` oldest slots (`n <= len`)
    pub fn drop_front(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.tail = (self.tail + n) % self.capacity;
        self.len -= n;
    }

    /// Discard the `n` newest slots (`n <= len`)
    pub fn drop_back(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.len -= n;
    }

    /// Physical ranges of the logical sub-range `logical`, split at the
    /// wraparound point; the second range is empty when contiguous
    pub fn physical_ranges(&self, logical: Range<usize>) -> (Range<usize>, Range<usize>) {
        debug_assert!(logical.end <= self.len);
        let n = logical.len();
        if n == 0 {
            return (0..0, 0..0);
        }
        let start = (self.tail + logical.start) % self.capacity;
        if start + n <= self.capacity {
            (start..start + n, 0..0)
        } else {
            (start..self.capacity, 0..start + n - self.capacity)
        }
    }

    /// Physical ranges of the full logical contents
    pub fn as_ranges(&self) -> (Range<usize>, Range<usize>) {
        self.physical_ranges(0..self.len)
    }
}
