// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Lazy sequence engine shared by every pipeline wrapper.
//!
//! A [`LazySequence`] is either a boxed [`Iterator`] (sequential mode) or a
//! deferred producer whose stages run on rayon (parallel mode). Nothing is
//! evaluated until a terminal operation consumes the sequence.
//!
//! In parallel mode each intermediate stage is composed onto the producer and
//! executed as one data-parallel pass over the previous stage's output, so
//! encounter order is preserved by every stage.
//!
//! Items travel as [`SequenceResult`]: a sort stage that meets unordered
//! values injects its failure into the stream and the next terminal operation
//! returns it.

use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::iter;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use ahash::AHashSet;
use cachestream_structures::{ExecutionMode, SequenceError, SequenceResult};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Boxed iterator behind a sequential sequence
pub type SequenceIter<'a, T> = Box<dyn Iterator<Item = SequenceResult<T>> + Send + 'a>;

type Producer<'a, T> = Box<dyn FnOnce() -> SequenceResult<Vec<T>> + Send + 'a>;

enum Evaluation<'a, T> {
    Sequential(SequenceIter<'a, T>),
    Parallel(Producer<'a, T>),
}

/// A single-use lazy sequence of `T`, evaluated sequentially or in parallel.
///
/// Every operation takes `self` by value: once a terminal operation has run
/// the sequence is gone, so it cannot be consumed twice.
///
/// Caller-supplied functions must be `Send + Sync` because the same pipeline
/// may be switched to parallel evaluation at any point before the terminal
/// operation.
pub struct LazySequence<'a, T> {
    evaluation: Evaluation<'a, T>,
    pool: Option<Arc<ThreadPool>>,
}

fn producer<'a, T, F>(produce: F) -> Producer<'a, T>
where
    F: FnOnce() -> SequenceResult<Vec<T>> + Send + 'a,
{
    Box::new(produce)
}

/// Compose one more parallel step onto a producer.
fn stage<'a, T, R, F>(produce: Producer<'a, T>, step: F) -> Producer<'a, R>
where
    T: Send + 'a,
    R: Send + 'a,
    F: FnOnce(Vec<T>) -> SequenceResult<Vec<R>> + Send + 'a,
{
    producer(move || {
        let items = produce()?;
        tracing::trace!(items = items.len(), "running parallel stage");
        step(items)
    })
}

/// Iterator that runs `produce` on first pull and then yields its output.
fn deferred<'a, T, F>(produce: F) -> SequenceIter<'a, T>
where
    T: Send + 'a,
    F: FnOnce() -> SequenceResult<Vec<T>> + Send + 'a,
{
    Box::new(
        iter::once_with(produce).flat_map(|outcome| -> SequenceIter<'a, T> {
            match outcome {
                Ok(items) => Box::new(items.into_iter().map(Ok)),
                Err(err) => Box::new(iter::once(Err(err))),
            }
        }),
    )
}

fn install<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Stable sort with a partial comparator. Unordered pairs are treated as
/// equal while sorting and reported once the sort has finished.
///
/// Treating them as equal breaks transitivity, and the slice sorts may panic
/// when they detect that. Such a panic is reported as `NotOrderable` too; a
/// panic with every comparison defined is raised again.
fn sort_items<T, F>(
    items: &mut [T],
    compare: &F,
    parallel: bool,
    type_name: &'static str,
) -> SequenceResult<()>
where
    T: Send,
    F: Fn(&T, &T) -> Option<Ordering> + Sync,
{
    let unordered = AtomicBool::new(false);
    let total = |a: &T, b: &T| {
        compare(a, b).unwrap_or_else(|| {
            unordered.store(true, AtomicOrdering::Relaxed);
            Ordering::Equal
        })
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        if parallel {
            items.par_sort_by(total);
        } else {
            items.sort_by(total);
        }
    }));

    let unordered = unordered.load(AtomicOrdering::Relaxed);
    match outcome {
        Ok(()) if !unordered => Ok(()),
        Err(payload) if !unordered => panic::resume_unwind(payload),
        _ => {
            tracing::warn!(type_name, "sort met working values without a defined ordering");
            Err(SequenceError::NotOrderable { type_name })
        }
    }
}

impl<'a, T> LazySequence<'a, T> {
    pub fn execution_mode(&self) -> ExecutionMode {
        match self.evaluation {
            Evaluation::Sequential(_) => ExecutionMode::Sequential,
            Evaluation::Parallel(_) => ExecutionMode::Parallel,
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.execution_mode().is_parallel()
    }

    /// The dedicated worker pool parallel stages run on, if one was bound
    pub fn thread_pool(&self) -> Option<&Arc<ThreadPool>> {
        self.pool.as_ref()
    }
}

impl<'a, T: Send + 'a> LazySequence<'a, T> {
    /// Sequential sequence over a collection or any iterator
    pub fn from_collection<I>(collection: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'a,
    {
        LazySequence {
            evaluation: Evaluation::Sequential(Box::new(collection.into_iter().map(Ok))),
            pool: None,
        }
    }

    /// Parallel sequence over a collection
    pub fn from_parallel<I>(collection: I) -> Self
    where
        I: IntoIterator<Item = T> + Send + 'a,
    {
        LazySequence {
            evaluation: Evaluation::Parallel(producer(move || {
                Ok(collection.into_iter().collect())
            })),
            pool: None,
        }
    }

    pub fn empty() -> Self {
        LazySequence {
            evaluation: Evaluation::Sequential(Box::new(iter::empty())),
            pool: None,
        }
    }

    /// Switch to parallel evaluation. Stages declared so far still run in
    /// encounter order; the ones declared after this call run on rayon.
    pub fn parallel(self) -> Self {
        match self.evaluation {
            Evaluation::Sequential(items) => {
                tracing::debug!("switching sequence to parallel evaluation");
                LazySequence {
                    evaluation: Evaluation::Parallel(producer(move || items.collect())),
                    pool: self.pool,
                }
            }
            evaluation => LazySequence {
                evaluation,
                pool: self.pool,
            },
        }
    }

    /// Switch to sequential evaluation. Pending parallel stages run on first
    /// pull.
    pub fn sequential(self) -> Self {
        match self.evaluation {
            Evaluation::Parallel(produce) => {
                tracing::debug!("switching sequence to sequential evaluation");
                let pool = self.pool.clone();
                LazySequence {
                    evaluation: Evaluation::Sequential(deferred(move || {
                        install(pool.as_deref(), produce)
                    })),
                    pool: self.pool,
                }
            }
            evaluation => LazySequence {
                evaluation,
                pool: self.pool,
            },
        }
    }

    /// Run parallel stages on `pool` instead of rayon's global pool.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        tracing::debug!(
            threads = pool.current_num_threads(),
            "binding sequence to dedicated thread pool"
        );
        self.pool = Some(pool);
        self
    }

    pub fn map<R, F>(self, mapper: F) -> LazySequence<'a, R>
    where
        R: Send + 'a,
        F: Fn(T) -> R + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => {
                Evaluation::Sequential(Box::new(items.map(move |item| item.map(&mapper))))
            }
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                Ok(items.into_par_iter().map(&mapper).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => Evaluation::Sequential(Box::new(
                items.filter(move |item| item.as_ref().map_or(true, |value| predicate(value))),
            )),
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                Ok(items.into_par_iter().filter(|value| predicate(value)).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    /// Map and drop in one step: `None` results are removed.
    pub fn filter_map<R, F>(self, mapper: F) -> LazySequence<'a, R>
    where
        R: Send + 'a,
        F: Fn(T) -> Option<R> + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => {
                Evaluation::Sequential(Box::new(items.filter_map(move |item| match item {
                    Ok(value) => mapper(value).map(Ok),
                    Err(err) => Some(Err(err)),
                })))
            }
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                Ok(items.into_par_iter().filter_map(&mapper).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    /// Replace every value with the contents of the sub-sequence `expand`
    /// returns for it, in order.
    pub fn flat_map<R, F>(self, expand: F) -> LazySequence<'a, R>
    where
        R: Send + 'a,
        F: Fn(T) -> LazySequence<'a, R> + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => Evaluation::Sequential(Box::new(items.flat_map(
                move |item| -> SequenceIter<'a, R> {
                    match item {
                        Ok(value) => expand(value).into_iter(),
                        Err(err) => Box::new(iter::once(Err(err))),
                    }
                },
            ))),
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                let expanded = items
                    .into_par_iter()
                    .map(|value| expand(value).to_vec())
                    .collect::<SequenceResult<Vec<Vec<R>>>>()?;
                Ok(expanded.into_iter().flatten().collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    /// Keep the first value seen for every distinct key.
    pub fn distinct_by<K, F>(self, key: F) -> Self
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => {
                let mut seen = AHashSet::new();
                Evaluation::Sequential(Box::new(items.filter(move |item| match item {
                    Ok(value) => seen.insert(key(value)),
                    Err(_) => true,
                })))
            }
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                let mut seen = AHashSet::with_capacity(items.len());
                Ok(items.into_iter().filter(|value| seen.insert(key(value))).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    /// Stable sort with a partial comparator. Evaluation fails with
    /// [`SequenceError::NotOrderable`] naming `type_name` if any comparison
    /// is undefined; the check happens only when the sort runs.
    pub(crate) fn sorted_with<F>(self, compare: F, type_name: &'static str) -> Self
    where
        F: Fn(&T, &T) -> Option<Ordering> + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => Evaluation::Sequential(deferred(move || {
                let mut collected = items.collect::<SequenceResult<Vec<T>>>()?;
                sort_items(&mut collected, &compare, false, type_name)?;
                Ok(collected)
            })),
            Evaluation::Parallel(produce) => {
                Evaluation::Parallel(stage(produce, move |mut items| {
                    sort_items(&mut items, &compare, true, type_name)?;
                    Ok(items)
                }))
            }
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    pub fn sorted_by<F>(self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'a,
    {
        self.sorted_with(move |a, b| Some(compare(a, b)), type_name::<T>())
    }

    pub fn peek<F>(self, action: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'a,
    {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => {
                Evaluation::Sequential(Box::new(items.inspect(move |item| {
                    if let Ok(value) = item {
                        action(value);
                    }
                })))
            }
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                Ok(items.into_par_iter().inspect(|value| action(value)).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    pub fn limit(self, max_size: usize) -> Self {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => Evaluation::Sequential(Box::new(items.take(max_size))),
            Evaluation::Parallel(produce) => {
                Evaluation::Parallel(stage(produce, move |mut items| {
                    items.truncate(max_size);
                    Ok(items)
                }))
            }
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    pub fn skip(self, count: usize) -> Self {
        let evaluation = match self.evaluation {
            Evaluation::Sequential(items) => Evaluation::Sequential(Box::new(items.skip(count))),
            Evaluation::Parallel(produce) => Evaluation::Parallel(stage(produce, move |items| {
                Ok(items.into_iter().skip(count).collect())
            })),
        };
        LazySequence {
            evaluation,
            pool: self.pool,
        }
    }

    pub fn count(self) -> SequenceResult<usize> {
        match self.evaluation {
            Evaluation::Sequential(mut items) => {
                items.try_fold(0usize, |count, item| item.map(|_| count + 1))
            }
            Evaluation::Parallel(produce) => {
                install(self.pool.as_deref(), produce).map(|items| items.len())
            }
        }
    }

    /// Run `action` on every value. In parallel mode the calls happen on
    /// worker threads in no particular order.
    pub fn for_each<F>(self, action: F) -> SequenceResult<()>
    where
        F: Fn(T) + Send + Sync,
    {
        match self.evaluation {
            Evaluation::Sequential(items) => {
                for item in items {
                    action(item?);
                }
                Ok(())
            }
            Evaluation::Parallel(produce) => {
                install(self.pool.as_deref(), move || -> SequenceResult<()> {
                    produce()?.into_par_iter().for_each(action);
                    Ok(())
                })
            }
        }
    }

    /// Run `action` on every value, one at a time, in encounter order.
    pub fn for_each_ordered<F>(self, mut action: F) -> SequenceResult<()>
    where
        F: FnMut(T),
    {
        for item in self {
            action(item?);
        }
        Ok(())
    }

    /// Materialize every value, in encounter order.
    pub fn to_vec(self) -> SequenceResult<Vec<T>> {
        match self.evaluation {
            Evaluation::Sequential(items) => items.collect(),
            Evaluation::Parallel(produce) => install(self.pool.as_deref(), produce),
        }
    }

    /// Gather every value into any [`FromIterator`] container.
    pub fn collect<B>(self) -> SequenceResult<B>
    where
        B: FromIterator<T>,
    {
        self.into_iter().collect()
    }

    /// Combine all values with an associative `accumulator`. `None` when the
    /// sequence is empty.
    pub fn reduce<F>(self, accumulator: F) -> SequenceResult<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        match self.evaluation {
            Evaluation::Sequential(items) => {
                let mut reduced = None;
                for item in items {
                    let value = item?;
                    reduced = Some(match reduced {
                        Some(previous) => accumulator(previous, value),
                        None => value,
                    });
                }
                Ok(reduced)
            }
            Evaluation::Parallel(produce) => {
                install(self.pool.as_deref(), move || -> SequenceResult<Option<T>> {
                    Ok(produce()?.into_par_iter().reduce_with(accumulator))
                })
            }
        }
    }

    /// Combine all values starting from `identity`, which must be a true
    /// identity for `accumulator` since parallel evaluation may use it once
    /// per split.
    pub fn reduce_with_identity<F>(self, identity: T, accumulator: F) -> SequenceResult<T>
    where
        T: Clone + Sync,
        F: Fn(T, T) -> T + Send + Sync,
    {
        match self.evaluation {
            Evaluation::Sequential(items) => {
                let mut reduced = identity;
                for item in items {
                    reduced = accumulator(reduced, item?);
                }
                Ok(reduced)
            }
            Evaluation::Parallel(produce) => {
                install(self.pool.as_deref(), move || -> SequenceResult<T> {
                    Ok(produce()?
                        .into_par_iter()
                        .reduce(|| identity.clone(), accumulator))
                })
            }
        }
    }

    /// Fold values into a `U`. Parallel evaluation folds each split from
    /// `identity` and merges the partial results with `combiner`.
    pub fn reduce_with_combiner<U, A, B>(
        self,
        identity: U,
        accumulator: A,
        combiner: B,
    ) -> SequenceResult<U>
    where
        U: Clone + Send + Sync,
        A: Fn(U, T) -> U + Send + Sync,
        B: Fn(U, U) -> U + Send + Sync,
    {
        match self.evaluation {
            Evaluation::Sequential(items) => {
                let mut reduced = identity;
                for item in items {
                    reduced = accumulator(reduced, item?);
                }
                Ok(reduced)
            }
            Evaluation::Parallel(produce) => {
                install(self.pool.as_deref(), move || -> SequenceResult<U> {
                    Ok(produce()?
                        .into_par_iter()
                        .fold(|| identity.clone(), &accumulator)
                        .reduce(|| identity.clone(), &combiner))
                })
            }
        }
    }

    /// First value in encounter order. Sequential evaluation stops pulling
    /// as soon as it has one. Parallel evaluation does not short-circuit:
    /// every pending stage runs over the whole input before the head is
    /// taken.
    pub fn find_first(self) -> SequenceResult<Option<T>> {
        match self.evaluation {
            Evaluation::Sequential(mut items) => items.next().transpose(),
            Evaluation::Parallel(produce) => install(self.pool.as_deref(), produce)
                .map(|items| items.into_iter().next()),
        }
    }
}

impl<'a, T> LazySequence<'a, T>
where
    T: Eq + Hash + Clone + Send + 'a,
{
    /// Keep the first occurrence of every value.
    pub fn distinct(self) -> Self {
        self.distinct_by(T::clone)
    }
}

impl<'a, T> LazySequence<'a, T>
where
    T: PartialOrd + Send + 'a,
{
    /// Stable sort by natural order. Fails at evaluation time with
    /// [`SequenceError::NotOrderable`] if two values cannot be compared.
    pub fn sorted(self) -> Self {
        self.sorted_with(|a: &T, b: &T| a.partial_cmp(b), type_name::<T>())
    }
}

impl<'a, T: Send + 'a> IntoIterator for LazySequence<'a, T> {
    type Item = SequenceResult<T>;
    type IntoIter = SequenceIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        match self.evaluation {
            Evaluation::Sequential(items) => items,
            Evaluation::Parallel(produce) => {
                let pool = self.pool;
                deferred(move || install(pool.as_deref(), produce))
            }
        }
    }
}

impl<'a, T: Send + 'a> From<Vec<T>> for LazySequence<'a, T> {
    fn from(values: Vec<T>) -> Self {
        LazySequence::from_collection(values)
    }
}

impl<T> fmt::Debug for LazySequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("mode", &self.execution_mode())
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}
