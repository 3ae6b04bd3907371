//! Error type for `SpanMap` operations.

/// Contract violations reported by [`SpanMap`](crate::SpanMap).
///
/// Lookups and removals never fail; only storing a value or building a map
/// from a bad configuration can.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An absent value was passed to [`SpanMap::set`](crate::SpanMap::set).
    ///
    /// Every slot either holds a value or is empty, so there is no way to
    /// store "nothing" under a key. Nothing was stored.
    #[error("cannot store an absent value at key {key}")]
    InvalidValue { key: u64 },

    /// Placing `key` would need a slot array larger than the configured
    /// maximum.
    ///
    /// This happens when a live key shares its low bits with `key` over
    /// the whole mask width, which only sparse key sets produce. Nothing
    /// was stored; the map may keep the capacity it reached before the
    /// limit.
    #[error("capacity overflow placing key {key}: would exceed {capacity} slots")]
    CapacityOverflow { key: u64, capacity: usize },

    /// Shrink threshold outside `1..=50` percent.
    #[error("shrink threshold must be within 1..=50 percent, got {0}")]
    InvalidShrinkPercent(u8),

    /// Maximum capacity is zero or not a power of two.
    #[error("maximum capacity must be a non-zero power of two, got {0}")]
    InvalidMaxCapacity(usize),
}
