//! Buffer configuration and the growth policy.

/// Configuration for creating a [`RawBuf`](crate::RawBuf).
///
/// `element_size` is fixed for the lifetime of the buffer. A non-zero
/// `initial_capacity` reserves storage up front using the normal growth
/// policy, so the first allocation is never below [`MIN_GROWTH_CAPACITY`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufConfig {
    /// Size of one element in bytes.
    pub element_size: usize,

    /// Minimum capacity to reserve at creation.
    ///
    /// Default: 0 (header-only block, no element storage).
    pub initial_capacity: usize,
}

/// Factor applied to the current capacity when a buffer must grow.
pub const GROWTH_FACTOR: usize = 2;

/// Smallest capacity a growing buffer moves to.
pub const MIN_GROWTH_CAPACITY: usize = 16;

impl BufConfig {
    /// Config for elements of `element_size` bytes with no reserved storage.
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            initial_capacity: 0,
        }
    }

    /// Reserve room for at least `capacity` elements at creation.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

/// Capacity a buffer holding `current` elements grows to when it must fit
/// `required`.
///
/// `max(GROWTH_FACTOR * current, max(required, MIN_GROWTH_CAPACITY))`. The
/// doubling saturates instead of overflowing; the resulting byte size is
/// checked separately.
pub fn grown_capacity(current: usize, required: usize) -> usize {
    current
        .saturating_mul(GROWTH_FACTOR)
        .max(required.max(MIN_GROWTH_CAPACITY))
}
