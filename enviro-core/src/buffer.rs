//! Fixed-Size Circular Buffer for Sliding Windows
//!
//! ## Overview
//!
//! Both stateful parts of the engine keep a bounded, FIFO-evicting window:
//! - the CPU temperature history (5 readings) used by the self-heating correction
//! - the trend window (1000 pressure samples) used by the regression
//!
//! Both are served by [`CircularBuffer`], a ring buffer sized at compile time
//! through const generics. Pushing into a full buffer overwrites the oldest
//! element, so the length can never exceed `N`.
//!
//! ### Memory Layout
//!
//! ```text
//! CircularBuffer<f32, 5> after 7 pushes (values 0..=6):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  2  │  3  │  4  │  ← physical slots
//! └─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── write_pos = 2, also the oldest element
//!
//! Logical (oldest → newest): [2, 3, 4, 5, 6]
//! ```
//!
//! ### Performance Characteristics
//!
//! - `push()`: O(1), no allocation
//! - `first()` / `get()`: O(1)
//! - `iter()`: O(n), oldest to newest
//!
//! ## Usage Example
//!
//! ```rust
//! use enviro_core::buffer::CircularBuffer;
//!
//! let mut history: CircularBuffer<f32, 3> = CircularBuffer::new();
//! for reading in [40.0, 41.0, 42.0, 43.0] {
//!     history.push(reading);
//! }
//!
//! // Oldest reading (40.0) was evicted
//! let values: Vec<f32> = history.iter().copied().collect();
//! assert_eq!(values, vec![41.0, 42.0, 43.0]);
//! ```

/// Fixed-size circular buffer for time-ordered samples
///
/// ## Internal Invariants
///
/// - `write_pos < N` (next write position is always valid)
/// - `len <= N` (never claim to have more items than capacity)
/// - Iteration yields items in insertion order
///
/// Not thread-safe; the engine owns its buffers exclusively.
#[derive(Clone)]
pub struct CircularBuffer<T: Copy, const N: usize> {
    /// Storage array using Option for uninitialized slots
    data: [Option<T>; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid items
    len: usize,
}

impl<T: Copy, const N: usize> CircularBuffer<T, N> {
    /// Creates a new empty circular buffer
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds an item, overwriting the oldest one when full
    pub fn push(&mut self, item: T) {
        self.data[self.write_pos] = Some(item);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Get number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Get the oldest item
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Iterate over items from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Gets an item by its logical index (0 = oldest, len-1 = newest)
    ///
    /// When full, the oldest element sits at `write_pos`:
    ///
    /// ```text
    /// Physical array:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical view:    [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % N]
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }
}

/// Iterator over circular buffer contents, oldest first
pub struct CircularBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy, const N: usize> ExactSizeIterator for CircularBufferIter<'a, T, N> {}

impl<T: Copy, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + core::fmt::Debug, const N: usize> core::fmt::Debug for CircularBuffer<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: CircularBuffer<f32, 5> = CircularBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.first().is_none());
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = CircularBuffer::<(u64, f32), 5>::new();

        buffer.push((1000, 25.0));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());

        buffer.push((2000, 26.0));
        assert_eq!(buffer.first(), Some(&(1000, 25.0)));
        assert_eq!(buffer.get(1), Some(&(2000, 26.0)));
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn circular_overwrite() {
        let mut buffer = CircularBuffer::<f32, 3>::new();

        for i in 0..5 {
            buffer.push(i as f32);
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());

        // Oldest 0 and 1 were overwritten
        let values: Vec<f32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.first(), Some(&2.0));
        assert_eq!(buffer.get(2), Some(&4.0));
    }

    #[test]
    fn iterator_reports_exact_size() {
        let mut buffer = CircularBuffer::<u32, 4>::new();
        for i in 0..6 {
            buffer.push(i);
        }
        let iter = buffer.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }
}
