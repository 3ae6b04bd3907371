//! Tuning knobs for a [`SpanMap`](crate::SpanMap).

use crate::Error;

/// Live-span fraction of the capacity, in percent, at or below which a
/// removal shrinks the slot array.
pub const DEFAULT_SHRINK_PERCENT: u8 = 30;

/// Default upper bound on the slot array length.
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 31;

/// Configuration for a [`SpanMap`](crate::SpanMap).
///
/// ```rust
/// use spanmap::{SpanMap, SpanMapConfig};
///
/// let config = SpanMapConfig::default()
///     .with_shrink_percent(25)
///     .with_max_capacity(1 << 20);
/// let mut map: SpanMap<&str> = SpanMap::with_config(config).unwrap();
/// map.insert(7, "seven");
/// assert_eq!(map.get(7), Some(&"seven"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanMapConfig {
    /// Shrink once `max - min + 1` drops to this percentage of the capacity.
    pub shrink_percent: u8,
    /// Collision-driven growth stops with
    /// [`Error::CapacityOverflow`] instead of doubling past this.
    pub max_capacity: usize,
}

impl SpanMapConfig {
    pub fn with_shrink_percent(mut self, percent: u8) -> Self {
        self.shrink_percent = percent;
        self
    }

    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(1..=50).contains(&self.shrink_percent) {
            return Err(Error::InvalidShrinkPercent(self.shrink_percent));
        }
        if !self.max_capacity.is_power_of_two() {
            return Err(Error::InvalidMaxCapacity(self.max_capacity));
        }
        Ok(())
    }

    /// Shrink threshold for a slot array of `capacity` slots.
    #[inline]
    pub(crate) fn shrink_at(&self, capacity: usize) -> usize {
        let percent = self.shrink_percent as usize;
        // Split to stay clear of overflow near `usize::MAX`.
        capacity / 100 * percent + capacity % 100 * percent / 100
    }
}

impl Default for SpanMapConfig {
    fn default() -> Self {
        Self {
            shrink_percent: DEFAULT_SHRINK_PERCENT,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}
