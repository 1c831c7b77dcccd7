// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! The (cached, working) pair carried through every paired pipeline stage.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SequenceError, SequenceResult};

/// An immutable pair of a cached value and a working value.
///
/// The working slot is what filters, mappers and terminal consumers see. The
/// cached slot rides along untouched until it is swapped back in.
///
/// Equality, hashing and ordering look at the working slot only: two pairs
/// holding different cached values but equal working values are equal, even
/// when their cached types differ.
///
/// # Examples
/// ```
/// use cachestream_structures::PairedElement;
///
/// let a = PairedElement::new("apple", 5);
/// let b = PairedElement::new(String::from("grape"), 5);
/// assert_eq!(a, b);
///
/// let loaded = a.map_working(|len| len * 2).swap_to_cache();
/// assert_eq!(*loaded.working(), "apple");
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairedElement<C, V> {
    cached: C,
    working: V,
}

impl<C, V> PairedElement<C, V> {
    pub const fn new(cached: C, working: V) -> Self {
        Self { cached, working }
    }

    pub fn cached(&self) -> &C {
        &self.cached
    }

    pub fn working(&self) -> &V {
        &self.working
    }

    pub fn into_cached(self) -> C {
        self.cached
    }

    pub fn into_working(self) -> V {
        self.working
    }

    /// Split into `(cached, working)`.
    pub fn into_parts(self) -> (C, V) {
        (self.cached, self.working)
    }

    /// Replace the working value; the cached value is moved across untouched
    /// and never shown to `f`.
    pub fn map_working<R>(self, f: impl FnOnce(V) -> R) -> PairedElement<C, R> {
        PairedElement::new(self.cached, f(self.working))
    }

    /// Pair a new working value with a copy of this element's cached value.
    pub fn with_working<R>(&self, working: R) -> PairedElement<C, R>
    where
        C: Clone,
    {
        PairedElement::new(self.cached.clone(), working)
    }

    /// Re-cache: the current working value becomes the cached value too.
    /// Whatever was cached before is dropped.
    pub fn recache(self) -> PairedElement<V, V>
    where
        V: Clone,
    {
        PairedElement::new(self.working.clone(), self.working)
    }

    /// Load: the cached value replaces the working value. The cache keeps its
    /// copy so the pair can round-trip again.
    pub fn swap_to_cache(self) -> PairedElement<C, C>
    where
        C: Clone,
    {
        PairedElement::new(self.cached.clone(), self.cached)
    }

    /// Compare working values, failing when the working type leaves the pair
    /// unordered (`partial_cmp` returns `None`).
    pub fn try_cmp<D>(&self, other: &PairedElement<D, V>) -> SequenceResult<Ordering>
    where
        V: PartialOrd,
    {
        self.working
            .partial_cmp(&other.working)
            .ok_or(SequenceError::NotOrderable {
                type_name: std::any::type_name::<V>(),
            })
    }
}

impl<C1, C2, V: PartialEq> PartialEq<PairedElement<C2, V>> for PairedElement<C1, V> {
    fn eq(&self, other: &PairedElement<C2, V>) -> bool {
        self.working == other.working
    }
}

impl<C, V: Eq> Eq for PairedElement<C, V> {}

impl<C, V: Hash> Hash for PairedElement<C, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.working.hash(state);
    }
}

impl<C1, C2, V: PartialOrd> PartialOrd<PairedElement<C2, V>> for PairedElement<C1, V> {
    fn partial_cmp(&self, other: &PairedElement<C2, V>) -> Option<Ordering> {
        self.working.partial_cmp(&other.working)
    }
}

impl<C, V: Ord> Ord for PairedElement<C, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.working.cmp(&other.working)
    }
}

impl<V: Clone> From<V> for PairedElement<V, V> {
    /// A freshly cached element: the value paired with itself.
    fn from(value: V) -> Self {
        PairedElement::new(value.clone(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recache_discards_previous_cache() {
        let element = PairedElement::new("old", 3).recache();
        assert_eq!(*element.cached(), 3);
        assert_eq!(*element.working(), 3);
    }

    #[test]
    fn test_map_working_keeps_cache() {
        let element = PairedElement::from("code").map_working(str::len);
        assert_eq!(element.into_parts(), ("code", 4));
    }

    #[test]
    fn test_swap_to_cache_of_absent_cache_is_absent_working() {
        let element: PairedElement<Option<&str>, usize> = PairedElement::new(None, 7);
        let loaded = element.swap_to_cache();
        assert_eq!(loaded.working(), &None);
    }

    #[test]
    fn test_try_cmp_reports_unordered_values() {
        let nan = PairedElement::new((), f64::NAN);
        let one = PairedElement::new((), 1.0);
        assert_eq!(
            nan.try_cmp(&one),
            Err(SequenceError::NotOrderable { type_name: "f64" })
        );
        assert_eq!(one.try_cmp(&one), Ok(Ordering::Equal));
    }
}
