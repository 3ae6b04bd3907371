//! Read-only view of the slot array, for visualization and debugging.

use crate::Entry;

/// Iterator over every slot of a [`SpanMap`](crate::SpanMap), in slot order.
///
/// Yields `(position, occupant)` where `occupant` is `Some((key, &value))`
/// for an occupied slot. Slot order says nothing about key order: keys wrap
/// around the array through the mask.
///
/// Created by [`SpanMap::slots`](crate::SpanMap::slots).
pub struct Slots<'a, V> {
    pub(crate) inner: std::iter::Enumerate<std::slice::Iter<'a, Option<Entry<V>>>>,
}

impl<'a, V> Iterator for Slots<'a, V> {
    type Item = (usize, Option<(u64, &'a V)>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (pos, slot) = self.inner.next()?;
        Some((pos, slot.as_ref().map(|e| (e.key, &e.value))))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Slots<'_, V> {}

impl<V> DoubleEndedIterator for Slots<'_, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let (pos, slot) = self.inner.next_back()?;
        Some((pos, slot.as_ref().map(|e| (e.key, &e.value))))
    }
}

impl<V> Clone for Slots<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
