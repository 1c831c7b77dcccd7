// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Optional single value with a cache attached.

use std::fmt;
use std::hash::{Hash, Hasher};

use cachestream_structures::{PairedElement, SequenceError, SequenceResult};

use crate::lazy_sequence::LazySequence;
use crate::paired_sequence::PairedSequence;

/// Either empty or a single [`PairedElement`].
///
/// Transformations apply to the working value and carry the cached value
/// along. An empty optional stays empty through every transformation.
///
/// Equality and hashing follow the working value only: two present
/// optionals are equal when their working values are, two empty ones are
/// always equal.
///
/// # Example
/// ```
/// use cachestream_pipeline::PairedOptional;
///
/// let word = PairedOptional::of("bells")
///     .map(|w| w.len())
///     .filter(|len| *len == 5)
///     .swap_to_cache()
///     .or_else("none");
/// assert_eq!(word, "bells");
/// ```
#[derive(Debug, Clone)]
pub struct PairedOptional<C, V> {
    element: Option<PairedElement<C, V>>,
}

impl<V: Clone> PairedOptional<V, V> {
    /// Present optional with `value` in both slots.
    ///
    /// Presence is decided by the optional itself, not by the value: `of(None)`
    /// is present with a `None` working value. Use [`of_absentable`] to make
    /// `None` mean empty, or [`flatten`] on an existing optional.
    ///
    /// [`of_absentable`]: PairedOptional::of_absentable
    /// [`flatten`]: PairedOptional::flatten
    pub fn of(value: V) -> Self {
        PairedOptional::from_element(PairedElement::new(value.clone(), value))
    }

    /// Present when `value` is `Some`, otherwise empty
    pub fn of_absentable(value: Option<V>) -> Self {
        value.map_or_else(PairedOptional::empty, PairedOptional::of)
    }
}

impl<C, V> PairedOptional<C, V> {
    pub const fn empty() -> Self {
        PairedOptional { element: None }
    }

    pub fn from_element(element: PairedElement<C, V>) -> Self {
        PairedOptional {
            element: Some(element),
        }
    }

    pub fn is_present(&self) -> bool {
        self.element.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.element.is_none()
    }

    /// Borrow the working value; `AbsentElement` when empty.
    pub fn get(&self) -> SequenceResult<&V> {
        self.element
            .as_ref()
            .map(PairedElement::working)
            .ok_or(SequenceError::AbsentElement)
    }

    /// Take the working value; `AbsentElement` when empty.
    pub fn into_value(self) -> SequenceResult<V> {
        self.into_option().ok_or(SequenceError::AbsentElement)
    }

    pub fn element(&self) -> Option<&PairedElement<C, V>> {
        self.element.as_ref()
    }

    pub fn into_element(self) -> Option<PairedElement<C, V>> {
        self.element
    }

    pub fn map<R>(self, mapper: impl FnOnce(V) -> R) -> PairedOptional<C, R> {
        PairedOptional {
            element: self.element.map(|element| element.map_working(mapper)),
        }
    }

    /// Map through a function that may produce nothing. A `None` result
    /// leaves the optional empty and drops the cached value.
    pub fn and_then<R>(self, mapper: impl FnOnce(V) -> Option<R>) -> PairedOptional<C, R> {
        PairedOptional {
            element: self.element.and_then(|element| {
                let (cached, working) = element.into_parts();
                mapper(working).map(|value| PairedElement::new(cached, value))
            }),
        }
    }

    pub fn filter(self, predicate: impl FnOnce(&V) -> bool) -> Self {
        PairedOptional {
            element: self
                .element
                .filter(|element| predicate(element.working())),
        }
    }

    /// Re-cache: the working value replaces the cached one.
    pub fn begin_caching(self) -> PairedOptional<V, V>
    where
        V: Clone,
    {
        PairedOptional {
            element: self.element.map(PairedElement::recache),
        }
    }

    /// Load the cached value into the working slot.
    ///
    /// The cached value is moved as it is: with `C = Option<X>` and a `None`
    /// cache the result is present with a `None` working value. Call
    /// [`swap_to_absentable_cache`] instead to get an empty optional there.
    ///
    /// [`swap_to_absentable_cache`]: PairedOptional::swap_to_absentable_cache
    pub fn swap_to_cache(self) -> PairedOptional<C, C>
    where
        C: Clone,
    {
        PairedOptional {
            element: self.element.map(PairedElement::swap_to_cache),
        }
    }

    pub fn if_present(&self, action: impl FnOnce(&V)) {
        if let Some(element) = &self.element {
            action(element.working());
        }
    }

    pub fn if_present_or_else(&self, present: impl FnOnce(&V), absent: impl FnOnce()) {
        match &self.element {
            Some(element) => present(element.working()),
            None => absent(),
        }
    }

    /// Run `action` only when empty.
    pub fn or_else_do(&self, action: impl FnOnce()) {
        if self.element.is_none() {
            action();
        }
    }

    /// This optional if present, otherwise the one `supplier` builds.
    pub fn or(self, supplier: impl FnOnce() -> PairedOptional<C, V>) -> Self {
        match self.element {
            Some(_) => self,
            None => supplier(),
        }
    }

    pub fn or_else(self, default: V) -> V {
        self.into_option().unwrap_or(default)
    }

    pub fn or_else_compute(self, supplier: impl FnOnce() -> V) -> V {
        self.into_option().unwrap_or_else(supplier)
    }

    /// The working value, or the error `error` builds when empty.
    pub fn or_else_fail<E>(self, error: impl FnOnce() -> E) -> Result<V, E> {
        self.into_option().ok_or_else(error)
    }

    pub fn into_option(self) -> Option<V> {
        self.element.map(PairedElement::into_working)
    }

    /// Zero- or one-element pipeline that keeps the cache.
    pub fn into_sequence<'a>(self) -> PairedSequence<'a, C, V>
    where
        C: Send + 'a,
        V: Send + 'a,
    {
        PairedSequence::from_sequence(LazySequence::from_collection(self.element))
    }
}

impl<C: Clone, V> PairedOptional<Option<C>, V> {
    /// Load an absentable cache: a `None` cache leaves the optional empty.
    pub fn swap_to_absentable_cache(self) -> PairedOptional<C, C> {
        PairedOptional {
            element: self
                .element
                .and_then(PairedElement::into_cached)
                .map(|cached| PairedElement::new(cached.clone(), cached)),
        }
    }
}

impl<C, V> PairedOptional<C, Option<V>> {
    /// Empty when the working value is `None`, otherwise unwrapped. The
    /// cached value is kept.
    pub fn flatten(self) -> PairedOptional<C, V> {
        self.and_then(|value| value)
    }
}

impl<C, V> Default for PairedOptional<C, V> {
    fn default() -> Self {
        PairedOptional::empty()
    }
}

impl<V: Clone> From<Option<V>> for PairedOptional<V, V> {
    fn from(value: Option<V>) -> Self {
        PairedOptional::of_absentable(value)
    }
}

impl<C1, C2, V: PartialEq> PartialEq<PairedOptional<C2, V>> for PairedOptional<C1, V> {
    fn eq(&self, other: &PairedOptional<C2, V>) -> bool {
        match (&self.element, &other.element) {
            (Some(left), Some(right)) => left == right,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<C, V: Eq> Eq for PairedOptional<C, V> {}

impl<C, V: Hash> Hash for PairedOptional<C, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.as_ref().map(PairedElement::working).hash(state);
    }
}

impl<C: fmt::Display, V: fmt::Display> fmt::Display for PairedOptional<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(
                f,
                "PairedOptional[{}, {}]",
                element.cached(),
                element.working()
            ),
            None => f.write_str("PairedOptional.empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_on_empty() {
        let empty = PairedOptional::<u8, u8>::empty();
        assert_eq!(empty.get(), Err(SequenceError::AbsentElement));
        assert_eq!(empty.into_value(), Err(SequenceError::AbsentElement));
    }

    #[test]
    fn test_and_then_collapses_to_empty() {
        let parsed = PairedOptional::of("twelve").and_then(|text| text.parse::<u32>().ok());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_swap_to_absentable_cache() {
        let present = PairedOptional::of(Some(4)).map(|_| "x").swap_to_absentable_cache();
        assert_eq!(present.get(), Ok(&4));

        let absent = PairedOptional::<Option<i32>, Option<i32>>::of(None).swap_to_absentable_cache();
        assert!(absent.is_empty());
    }

    #[test]
    fn test_absent_working_value_needs_flatten() {
        let wrapped = PairedOptional::of(None::<u8>);
        assert!(wrapped.is_present());
        assert!(wrapped.flatten().is_empty());

        let parsed = PairedOptional::of("7")
            .map(|text| text.parse::<u8>().ok())
            .flatten();
        assert_eq!(parsed.get(), Ok(&7));
        assert_eq!(parsed.swap_to_cache().into_option(), Some("7"));
    }

    #[test]
    fn test_absent_cache_with_plain_and_absentable_swap() {
        let plain = PairedOptional::of(None::<&str>).map(|_| 1).swap_to_cache();
        assert_eq!(plain.get(), Ok(&None));

        let absentable = PairedOptional::of(None::<&str>)
            .map(|_| 1)
            .swap_to_absentable_cache();
        assert!(absentable.is_empty());
    }

    #[test]
    fn test_display() {
        let present = PairedOptional::of("a").map(str::len);
        assert_eq!(present.to_string(), "PairedOptional[a, 1]");
        assert_eq!(
            PairedOptional::<u8, u8>::empty().to_string(),
            "PairedOptional.empty"
        );
    }

    #[test]
    fn test_equality_ignores_cache() {
        let left = PairedOptional::of("abc").map(str::len);
        let right = PairedOptional::of(3usize);
        assert_eq!(left, right);
        assert_ne!(left, PairedOptional::<&str, usize>::empty());
    }
}
