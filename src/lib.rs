//! # spanmap
//!
//! A map for `u64` keys that cluster into a dense range: sequential IDs, log
//! offsets, slot indices.
//!
//! Keys are placed directly at `key & mask` in a power-of-two slot array. A
//! collision between two live keys doubles the array until they separate, and
//! removals shrink it once the live span `[min, max]` falls to a fraction of
//! the capacity. Costs therefore follow the span of live keys rather than a
//! hash distribution.
//!
//! ## Example
//!
//! ```rust
//! use spanmap::SpanMap;
//!
//! let mut map: SpanMap<&str> = SpanMap::new();
//! map.insert(1000, "a");
//! map.insert(1001, "b");
//! map.insert(1003, "d");
//!
//! assert_eq!(map.get(1001), Some(&"b"));
//! assert_eq!(map.get(1002), None);
//! assert_eq!((map.min(), map.max()), (1000, 1003));
//!
//! assert_eq!(map.remove(1000), Some("a"));
//! assert_eq!(map.min(), 1001);
//! ```
//!
//! ## Sparse keys
//!
//! Growth and shrink walk every integer in `[min, max]`, and two live keys
//! that agree on many low bits force the array to double until the mask
//! tells them apart. Both are cheap for dense keys and expensive for sparse
//! ones. Collision growth is capped by [`SpanMapConfig::max_capacity`].
//!
//! ## Concurrency
//!
//! `SpanMap` does no internal synchronization. Mutation takes `&mut self`;
//! share one across threads behind a `Mutex` or keep it single-owner.

mod config;
mod error;
mod slots;

pub use config::{SpanMapConfig, DEFAULT_MAX_CAPACITY, DEFAULT_SHRINK_PERCENT};
pub use error::Error;
pub use slots::Slots;

#[derive(Clone)]
pub(crate) struct Entry<V> {
    key: u64,
    value: V,
}

// =============================================================================
// SpanMap
// =============================================================================

/// A map from `u64` keys to `V`, sized by the span of its live keys.
///
/// Invariants while non-empty:
/// - the slot array length is a power of two and `mask == len - 1`
/// - every occupied slot `p` holds a key with `key & mask == p`
/// - `min` and `max` are live, and no key outside `[min, max]` is
///
/// An empty map owns no slot array and reports `min() == max() == 0`.
#[derive(Clone)]
pub struct SpanMap<V> {
    slots: Vec<Option<Entry<V>>>,
    mask: u64,
    min: u64,
    max: u64,
    len: usize,
    /// Shrink once `max - min + 1` is at most this.
    shrink_at: usize,
    config: SpanMapConfig,
}

impl<V> SpanMap<V> {
    pub fn new() -> Self {
        Self::from_valid_config(SpanMapConfig::default())
    }

    /// Creates an empty map, rejecting an out-of-range configuration.
    pub fn with_config(config: SpanMapConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SpanMapConfig) -> Self {
        Self {
            slots: Vec::new(),
            mask: 0,
            min: 0,
            max: 0,
            len: 0,
            shrink_at: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SpanMapConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest live key, or 0 when empty.
    #[inline]
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Largest live key, or 0 when empty.
    #[inline]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Length of the slot array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drops every entry and releases the slot array.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.mask = 0;
        self.min = 0;
        self.max = 0;
        self.len = 0;
        self.shrink_at = 0;
    }

    /// Walks the raw slot array. See [`Slots`].
    pub fn slots(&self) -> Slots<'_, V> {
        Slots {
            inner: self.slots.iter().enumerate(),
        }
    }

    #[inline]
    fn slot_index(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }

    /// Is `key` the occupant of its slot? Requires a non-empty array.
    #[inline]
    fn holds(&self, key: u64) -> bool {
        matches!(&self.slots[self.slot_index(key)], Some(e) if e.key == key)
    }

    fn alloc(capacity: usize) -> Vec<Option<Entry<V>>> {
        std::iter::repeat_with(|| None).take(capacity).collect()
    }

    /// Moves every live key into a fresh array of `capacity` slots.
    ///
    /// Walks the key span `[min, max]` rather than the old array, so the
    /// caller must guarantee that span fits: `max - min < capacity`, or
    /// the keys still separate under the new mask.
    fn rehash(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        let old_mask = self.mask;
        let mut old = std::mem::replace(&mut self.slots, Self::alloc(capacity));
        self.mask = capacity as u64 - 1;
        self.shrink_at = self.config.shrink_at(capacity);

        let mut moved = 0usize;
        for key in self.min..=self.max {
            if moved == self.len {
                break;
            }
            let slot = &mut old[(key & old_mask) as usize];
            if slot.as_ref().is_some_and(|e| e.key == key) {
                let pos = self.slot_index(key);
                self.slots[pos] = slot.take();
                moved += 1;
            }
        }
    }

    /// Doubles the array until the slot for `key` is free.
    fn grow_for(&mut self, key: u64) -> Result<(), Error> {
        while self.slots[self.slot_index(key)].is_some() {
            let capacity = self.slots.len();
            if capacity >= self.config.max_capacity {
                return Err(Error::CapacityOverflow {
                    key,
                    capacity: self.config.max_capacity,
                });
            }
            self.rehash(capacity * 2);
        }
        Ok(())
    }

    fn shrink(&mut self) {
        // `0.next_power_of_two()` is 1.
        let capacity = self.shrink_at.next_power_of_two();
        self.rehash(capacity);
    }
}

impl<V> SpanMap<V> {
    pub fn get(&self, key: u64) -> Option<&V> {
        if self.slots.is_empty() {
            return None;
        }
        match &self.slots[self.slot_index(key)] {
            Some(e) if e.key == key => Some(&e.value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        if self.slots.is_empty() {
            return None;
        }
        let pos = self.slot_index(key);
        match &mut self.slots[pos] {
            Some(e) if e.key == key => Some(&mut e.value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` at `key`, returning the value it replaced.
    ///
    /// `None` cannot be stored: the call fails with
    /// [`Error::InvalidValue`] and leaves the map untouched. Callers holding
    /// a plain `V` should use [`insert`](Self::insert) or
    /// [`try_insert`](Self::try_insert).
    pub fn set(&mut self, key: u64, value: Option<V>) -> Result<Option<V>, Error> {
        let value = value.ok_or(Error::InvalidValue { key })?;
        self.try_insert(key, value)
    }

    /// Inserts or overwrites, returning the previous value.
    ///
    /// # Panics
    ///
    /// If placing `key` needs more than [`SpanMapConfig::max_capacity`]
    /// slots. Use [`try_insert`](Self::try_insert) to handle that instead.
    pub fn insert(&mut self, key: u64, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(prev) => prev,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts or overwrites, returning the previous value, or
    /// [`Error::CapacityOverflow`] if `key` cannot be placed within the
    /// configured maximum capacity.
    pub fn try_insert(&mut self, key: u64, value: V) -> Result<Option<V>, Error> {
        if self.slots.is_empty() {
            self.slots = Self::alloc(1);
            self.mask = 0;
            self.shrink_at = self.config.shrink_at(1);
            self.min = key;
            self.max = key;
            self.slots[0] = Some(Entry { key, value });
            self.len = 1;
            return Ok(None);
        }

        let pos = self.slot_index(key);
        if let Some(entry) = self.slots[pos].as_mut().filter(|e| e.key == key) {
            return Ok(Some(std::mem::replace(&mut entry.value, value)));
        }
        if self.slots[pos].is_some() {
            self.grow_for(key)?;
        }

        if key < self.min {
            self.min = key;
        } else if key > self.max {
            self.max = key;
        }
        let pos = self.slot_index(key);
        self.slots[pos] = Some(Entry { key, value });
        self.len += 1;
        Ok(None)
    }

    pub fn remove(&mut self, key: u64) -> Option<V> {
        if self.slots.is_empty() || !self.holds(key) {
            return None;
        }
        let pos = self.slot_index(key);
        let entry = self.slots[pos].take()?;
        self.len -= 1;

        if key == self.min && key == self.max {
            self.clear();
            return Some(entry.value);
        }

        // Bounds are recovered by walking successive integers, not slots: a
        // slot at `k & mask` may belong to a key other than `k`.
        if key == self.min {
            // `max` is still live, so this stops at or before it.
            let mut k = key + 1;
            while !self.holds(k) {
                k += 1;
            }
            self.min = k;
        } else if key == self.max {
            let mut k = key - 1;
            while k > self.min && !self.holds(k) {
                k -= 1;
            }
            self.max = k;
        }

        // Span `max - min + 1` is at most `shrink_at`.
        if self.max - self.min < self.shrink_at as u64 {
            self.shrink();
        }
        Some(entry.value)
    }
}

impl<V> Default for SpanMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for SpanMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanMap")
            .field("len", &self.len)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("capacity", &self.slots.len())
            .field("shrink_at", &self.shrink_at)
            .finish()
    }
}


#[cfg(test)]
mod proptests;
