// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Plain value pipeline, the entry point for every cached pipeline.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use cachestream_structures::{ExecutionMode, PairedElement, SequenceResult};
use rayon::ThreadPool;

use crate::lazy_sequence::{LazySequence, SequenceIter};
use crate::paired_sequence::PairedSequence;

/// A lazy pipeline of plain values with no cache attached.
///
/// Every intermediate operation returns a new `UnpairedSequence`; nothing
/// runs until a terminal operation is called. [`begin_caching`] turns it
/// into a [`PairedSequence`] whose cached slot holds each value as it was at
/// that moment.
///
/// # Example
/// ```
/// use cachestream_pipeline::UnpairedSequence;
///
/// let words = UnpairedSequence::of(["paper", "bells", "monkey"])
///     .begin_caching()
///     .map(|word| word.len())
///     .filter(|len| *len == 5)
///     .swap_to_cache()
///     .to_vec()
///     .unwrap();
/// assert_eq!(words, vec!["paper", "bells"]);
/// ```
///
/// [`begin_caching`]: UnpairedSequence::begin_caching
pub struct UnpairedSequence<'a, V> {
    inner: LazySequence<'a, V>,
}

impl<'a, V: Send + 'a> UnpairedSequence<'a, V> {
    /// Sequential pipeline over any collection or iterator
    pub fn from_collection<I>(collection: I) -> Self
    where
        I: IntoIterator<Item = V>,
        I::IntoIter: Send + 'a,
    {
        Self::from_sequence(LazySequence::from_collection(collection))
    }

    /// Wrap an existing lazy sequence, keeping its mode and thread pool
    pub fn from_sequence(sequence: LazySequence<'a, V>) -> Self {
        UnpairedSequence { inner: sequence }
    }

    /// Parallel pipeline over a collection
    pub fn from_parallel<I>(collection: I) -> Self
    where
        I: IntoIterator<Item = V> + Send + 'a,
    {
        Self::from_sequence(LazySequence::from_parallel(collection))
    }

    pub fn of<const N: usize>(values: [V; N]) -> Self {
        Self::from_collection(values)
    }

    pub fn empty() -> Self {
        Self::from_sequence(LazySequence::empty())
    }

    /// Pair every value with a copy of itself in the cached slot.
    pub fn begin_caching(self) -> PairedSequence<'a, V, V>
    where
        V: Clone,
    {
        PairedSequence::from_sequence(
            self.inner
                .map(|value: V| PairedElement::new(value.clone(), value)),
        )
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.filter(predicate))
    }

    pub fn map<R, F>(self, mapper: F) -> UnpairedSequence<'a, R>
    where
        R: Send + 'a,
        F: Fn(V) -> R + Send + Sync + 'a,
    {
        UnpairedSequence::from_sequence(self.inner.map(mapper))
    }

    /// Replace every value with the values `expand` yields for it, in order.
    pub fn flat_expand<R, I, F>(self, expand: F) -> UnpairedSequence<'a, R>
    where
        R: Send + 'a,
        I: IntoIterator<Item = R>,
        I::IntoIter: Send + 'a,
        F: Fn(V) -> I + Send + Sync + 'a,
    {
        UnpairedSequence::from_sequence(
            self.inner
                .flat_map(move |value| LazySequence::from_collection(expand(value))),
        )
    }

    pub fn distinct(self) -> Self
    where
        V: Eq + Hash + Clone,
    {
        Self::from_sequence(self.inner.distinct())
    }

    /// Stable sort by natural order. Values without a defined ordering make
    /// the terminal operation fail with `NotOrderable`.
    pub fn sorted(self) -> Self
    where
        V: PartialOrd,
    {
        Self::from_sequence(self.inner.sorted())
    }

    pub fn sorted_by<F>(self, compare: F) -> Self
    where
        F: Fn(&V, &V) -> Ordering + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.sorted_by(compare))
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: Fn(&V) + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.peek(action))
    }

    pub fn limit(self, max_size: usize) -> Self {
        Self::from_sequence(self.inner.limit(max_size))
    }

    pub fn skip(self, count: usize) -> Self {
        Self::from_sequence(self.inner.skip(count))
    }

    pub fn parallel(self) -> Self {
        Self::from_sequence(self.inner.parallel())
    }

    pub fn sequential(self) -> Self {
        Self::from_sequence(self.inner.sequential())
    }

    pub fn with_thread_pool(self, pool: Arc<ThreadPool>) -> Self {
        Self::from_sequence(self.inner.with_thread_pool(pool))
    }

    pub fn for_each<F>(self, action: F) -> SequenceResult<()>
    where
        F: Fn(V) + Send + Sync,
    {
        self.inner.for_each(action)
    }

    pub fn for_each_ordered<F>(self, action: F) -> SequenceResult<()>
    where
        F: FnMut(V),
    {
        self.inner.for_each_ordered(action)
    }

    pub fn count(self) -> SequenceResult<usize> {
        self.inner.count()
    }

    pub fn to_vec(self) -> SequenceResult<Vec<V>> {
        self.inner.to_vec()
    }

    pub fn reduce<F>(self, accumulator: F) -> SequenceResult<Option<V>>
    where
        F: Fn(V, V) -> V + Send + Sync,
    {
        self.inner.reduce(accumulator)
    }

    pub fn reduce_with_identity<F>(self, identity: V, accumulator: F) -> SequenceResult<V>
    where
        V: Clone + Sync,
        F: Fn(V, V) -> V + Send + Sync,
    {
        self.inner.reduce_with_identity(identity, accumulator)
    }

    pub fn reduce_with_combiner<U, A, B>(
        self,
        identity: U,
        accumulator: A,
        combiner: B,
    ) -> SequenceResult<U>
    where
        U: Clone + Send + Sync,
        A: Fn(U, V) -> U + Send + Sync,
        B: Fn(U, U) -> U + Send + Sync,
    {
        self.inner
            .reduce_with_combiner(identity, accumulator, combiner)
    }

    pub fn find_first(self) -> SequenceResult<Option<V>> {
        self.inner.find_first()
    }

    pub fn collect<B>(self) -> SequenceResult<B>
    where
        B: FromIterator<V>,
    {
        self.inner.collect()
    }

    /// Unwrap into the underlying lazy sequence
    pub fn to_sequence(self) -> LazySequence<'a, V> {
        self.inner
    }
}

impl<V> UnpairedSequence<'_, V> {
    pub fn is_parallel(&self) -> bool {
        self.inner.is_parallel()
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.inner.execution_mode()
    }
}

impl<'a, V: Send + 'a> From<Vec<V>> for UnpairedSequence<'a, V> {
    fn from(values: Vec<V>) -> Self {
        UnpairedSequence::from_collection(values)
    }
}

impl<'a, V: Send + 'a> From<LazySequence<'a, V>> for UnpairedSequence<'a, V> {
    fn from(sequence: LazySequence<'a, V>) -> Self {
        UnpairedSequence::from_sequence(sequence)
    }
}

impl<'a, V: Send + 'a> IntoIterator for UnpairedSequence<'a, V> {
    type Item = SequenceResult<V>;
    type IntoIter = SequenceIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<V> fmt::Debug for UnpairedSequence<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnpairedSequence")
            .field("mode", &self.execution_mode())
            .finish()
    }
}
