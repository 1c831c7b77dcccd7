// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Pipeline of (cached, working) pairs.

use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use cachestream_structures::{ExecutionMode, PairedElement, SequenceResult};
use rayon::ThreadPool;

use crate::lazy_sequence::LazySequence;
use crate::paired_optional::PairedOptional;
use crate::unpaired_sequence::UnpairedSequence;

/// A lazy pipeline whose elements carry a cached value of type `C` next to
/// the working value of type `V`.
///
/// Filters, mappers, sorts and terminal operations only ever see the working
/// value. The cached value follows its element through every stage and
/// comes back with [`swap_to_cache`], or is replaced with the current
/// working value by [`begin_caching`].
///
/// [`swap_to_cache`]: PairedSequence::swap_to_cache
/// [`begin_caching`]: PairedSequence::begin_caching
pub struct PairedSequence<'a, C, V> {
    inner: LazySequence<'a, PairedElement<C, V>>,
}

impl<'a, C: Send + 'a, V: Send + 'a> PairedSequence<'a, C, V> {
    /// Wrap a lazy sequence of pairs, keeping its mode and thread pool
    pub fn from_sequence(sequence: LazySequence<'a, PairedElement<C, V>>) -> Self {
        PairedSequence { inner: sequence }
    }

    /// Sequential pipeline over pairs built elsewhere
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = PairedElement<C, V>>,
        I::IntoIter: Send + 'a,
    {
        Self::from_sequence(LazySequence::from_collection(elements))
    }

    /// Re-cache: the current working value replaces the cached one.
    pub fn begin_caching(self) -> PairedSequence<'a, V, V>
    where
        V: Clone,
    {
        PairedSequence::from_sequence(self.inner.map(PairedElement::recache))
    }

    /// Load the cached value into the working slot. The cache keeps its
    /// copy, so the pipeline can keep transforming and swap again later.
    pub fn swap_to_cache(self) -> PairedSequence<'a, C, C>
    where
        C: Clone,
    {
        PairedSequence::from_sequence(self.inner.map(PairedElement::swap_to_cache))
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.filter(move |element| predicate(element.working())))
    }

    pub fn map<R, F>(self, mapper: F) -> PairedSequence<'a, C, R>
    where
        R: Send + 'a,
        F: Fn(V) -> R + Send + Sync + 'a,
    {
        PairedSequence::from_sequence(
            self.inner
                .map(move |element| element.map_working(&mapper)),
        )
    }

    /// Replace every element with one element per value `expand` yields for
    /// its working value. Each child carries a copy of its parent's cache.
    pub fn flat_expand<R, I, F>(self, expand: F) -> PairedSequence<'a, C, R>
    where
        C: Clone,
        R: Send + 'a,
        I: IntoIterator<Item = R>,
        I::IntoIter: Send + 'a,
        F: Fn(V) -> I + Send + Sync + 'a,
    {
        PairedSequence::from_sequence(self.inner.flat_map(move |element| {
            let (cached, working) = element.into_parts();
            LazySequence::from_collection(
                expand(working)
                    .into_iter()
                    .map(move |value| PairedElement::new(cached.clone(), value)),
            )
        }))
    }

    /// Like [`flat_expand`](Self::flat_expand), for mappers that return a
    /// whole plain pipeline. Children inherit their parent's cache.
    pub fn flat_expand_sequence<R, F>(self, expand: F) -> PairedSequence<'a, C, R>
    where
        C: Clone + Sync,
        R: Send + 'a,
        F: Fn(V) -> UnpairedSequence<'a, R> + Send + Sync + 'a,
    {
        PairedSequence::from_sequence(self.inner.flat_map(move |element| {
            let (cached, working) = element.into_parts();
            expand(working)
                .to_sequence()
                .map(move |value| PairedElement::new(cached.clone(), value))
        }))
    }

    /// Splice in the cached pipelines `expand` returns. The children keep the
    /// cache of the sub-pipeline that produced them, so the parent's cached
    /// values are dropped.
    pub fn flat_expand_paired<D, R, F>(self, expand: F) -> PairedSequence<'a, D, R>
    where
        D: Send + 'a,
        R: Send + 'a,
        F: Fn(V) -> PairedSequence<'a, D, R> + Send + Sync + 'a,
    {
        PairedSequence::from_sequence(
            self.inner
                .flat_map(move |element| expand(element.into_working()).inner),
        )
    }

    /// Keep the first element for every distinct working value.
    pub fn distinct(self) -> Self
    where
        V: Eq + Hash + Clone,
    {
        Self::from_sequence(self.inner.distinct_by(|element| element.working().clone()))
    }

    /// Stable sort by working value. Values without a defined ordering make
    /// the terminal operation fail with `NotOrderable`.
    pub fn sorted(self) -> Self
    where
        V: PartialOrd,
    {
        Self::from_sequence(self.inner.sorted_with(
            |a: &PairedElement<C, V>, b: &PairedElement<C, V>| a.partial_cmp(b),
            type_name::<V>(),
        ))
    }

    pub fn sorted_by<F>(self, compare: F) -> Self
    where
        F: Fn(&V, &V) -> Ordering + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.sorted_with(
            move |a: &PairedElement<C, V>, b: &PairedElement<C, V>| {
                Some(compare(a.working(), b.working()))
            },
            type_name::<V>(),
        ))
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: Fn(&V) + Send + Sync + 'a,
    {
        Self::from_sequence(self.inner.peek(move |element| action(element.working())))
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

    pub fn count(self) -> SequenceResult<usize> {
        self.inner.count()
    }

    pub fn for_each<F>(self, action: F) -> SequenceResult<()>
    where
        F: Fn(V) + Send + Sync,
    {
        self.inner
            .for_each(move |element| action(element.into_working()))
    }

    pub fn for_each_ordered<F>(self, mut action: F) -> SequenceResult<()>
    where
        F: FnMut(V),
    {
        self.inner
            .for_each_ordered(move |element| action(element.into_working()))
    }

    /// Working values, in encounter order
    pub fn to_vec(self) -> SequenceResult<Vec<V>> {
        self.to_sequence().to_vec()
    }

    /// Every element with both slots, in encounter order
    pub fn to_elements(self) -> SequenceResult<Vec<PairedElement<C, V>>> {
        self.inner.to_vec()
    }

    pub fn reduce<F>(self, accumulator: F) -> SequenceResult<Option<V>>
    where
        F: Fn(V, V) -> V + Send + Sync,
    {
        self.to_sequence().reduce(accumulator)
    }

    pub fn reduce_with_identity<F>(self, identity: V, accumulator: F) -> SequenceResult<V>
    where
        V: Clone + Sync,
        F: Fn(V, V) -> V + Send + Sync,
    {
        self.to_sequence().reduce_with_identity(identity, accumulator)
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
        self.to_sequence()
            .reduce_with_combiner(identity, accumulator, combiner)
    }

    /// Working value of the first element
    pub fn find_first(self) -> SequenceResult<Option<V>> {
        self.to_sequence().find_first()
    }

    /// First element with its cache still attached
    pub fn find_first_paired(self) -> SequenceResult<PairedOptional<C, V>> {
        Ok(self
            .inner
            .find_first()?
            .map_or_else(PairedOptional::empty, PairedOptional::from_element))
    }

    pub fn collect<B>(self) -> SequenceResult<B>
    where
        B: FromIterator<V>,
    {
        self.to_sequence().collect()
    }

    /// Strip the cache, leaving a lazy sequence of working values.
    pub fn to_sequence(self) -> LazySequence<'a, V> {
        self.inner.map(PairedElement::into_working)
    }

    /// Strip the cache, leaving a plain pipeline.
    pub fn drop_cache(self) -> UnpairedSequence<'a, V> {
        UnpairedSequence::from_sequence(self.to_sequence())
    }
}

impl<'a, C: Send + 'a, V: Send + 'a> PairedSequence<'a, C, Option<V>> {
    /// Drop elements whose working value is absent and unwrap the rest.
    pub fn filter_present(self) -> PairedSequence<'a, C, V> {
        PairedSequence::from_sequence(self.inner.filter_map(|element| {
            let (cached, working) = element.into_parts();
            working.map(|value| PairedElement::new(cached, value))
        }))
    }
}

impl<C, V> PairedSequence<'_, C, V> {
    pub fn is_parallel(&self) -> bool {
        self.inner.is_parallel()
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.inner.execution_mode()
    }
}

impl<C, V> fmt::Debug for PairedSequence<'_, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairedSequence")
            .field("mode", &self.execution_mode())
            .finish()
    }
}
