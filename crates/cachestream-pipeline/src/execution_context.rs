// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Execution settings applied to new pipelines.

use std::sync::Arc;

use cachestream_config::ExecutionConfig;
use cachestream_structures::{ExecutionMode, SequenceError, SequenceResult};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::lazy_sequence::LazySequence;
use crate::unpaired_sequence::UnpairedSequence;

/// Mode and optional dedicated rayon pool for the pipelines it creates.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    mode: ExecutionMode,
    pool: Option<Arc<ThreadPool>>,
}

impl ExecutionContext {
    pub fn sequential() -> Self {
        ExecutionContext {
            mode: ExecutionMode::Sequential,
            pool: None,
        }
    }

    /// Parallel pipelines on rayon's global pool
    pub fn parallel() -> Self {
        ExecutionContext {
            mode: ExecutionMode::Parallel,
            pool: None,
        }
    }

    /// Build a context from configuration. A non-zero worker count gets a
    /// dedicated pool whose threads are named `{prefix}-{index}`.
    pub fn from_config(config: &ExecutionConfig) -> SequenceResult<Self> {
        if !config.wants_dedicated_pool() {
            tracing::debug!(mode = %config.mode, "using global rayon pool");
            return Ok(ExecutionContext {
                mode: config.mode,
                pool: None,
            });
        }

        let prefix = config.thread_name_prefix.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(move |index| format!("{}-{}", prefix, index))
            .build()
            .map_err(|err| SequenceError::ThreadPool(err.to_string()))?;

        tracing::info!(
            mode = %config.mode,
            threads = config.worker_threads,
            "built dedicated worker pool"
        );

        Ok(ExecutionContext {
            mode: config.mode,
            pool: Some(Arc::new(pool)),
        })
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn has_dedicated_pool(&self) -> bool {
        self.pool.is_some()
    }

    /// Worker threads parallel stages will run on
    pub fn worker_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Put `sequence` into this context's mode and bind its pool.
    pub fn apply<'a, T: Send + 'a>(&self, sequence: LazySequence<'a, T>) -> LazySequence<'a, T> {
        let sequence = match &self.pool {
            Some(pool) => sequence.with_thread_pool(Arc::clone(pool)),
            None => sequence,
        };
        match self.mode {
            ExecutionMode::Sequential => sequence.sequential(),
            ExecutionMode::Parallel => sequence.parallel(),
        }
    }

    /// A new plain pipeline over `collection` in this context.
    pub fn sequence<'a, V, I>(&self, collection: I) -> UnpairedSequence<'a, V>
    where
        V: Send + 'a,
        I: IntoIterator<Item = V> + Send + 'a,
        I::IntoIter: Send + 'a,
    {
        let sequence = match self.mode {
            ExecutionMode::Sequential => LazySequence::from_collection(collection),
            ExecutionMode::Parallel => LazySequence::from_parallel(collection),
        };
        let sequence = match &self.pool {
            Some(pool) => sequence.with_thread_pool(Arc::clone(pool)),
            None => sequence,
        };
        UnpairedSequence::from_sequence(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        let context = ExecutionContext::default();
        assert_eq!(context.mode(), ExecutionMode::Sequential);
        assert!(!context.has_dedicated_pool());
        assert!(!context.sequence(vec![1, 2]).is_parallel());
    }

    #[test]
    fn test_from_config_without_workers_uses_global_pool() {
        let config = ExecutionConfig {
            mode: ExecutionMode::Parallel,
            ..ExecutionConfig::default()
        };
        let context = ExecutionContext::from_config(&config).unwrap();
        assert!(!context.has_dedicated_pool());
        assert!(context.sequence(0..4).is_parallel());
    }

    #[test]
    fn test_from_config_builds_named_pool() {
        let config = ExecutionConfig {
            mode: ExecutionMode::Parallel,
            worker_threads: 2,
            thread_name_prefix: String::from("pipe"),
        };
        let context = ExecutionContext::from_config(&config).unwrap();
        assert_eq!(context.worker_threads(), 2);

        let names = context
            .sequence(0..8)
            .map(|_| std::thread::current().name().map(str::to_owned))
            .to_vec()
            .unwrap();
        assert!(names
            .iter()
            .all(|name| name.as_deref().map_or(false, |n| n.starts_with("pipe-"))));
    }

    #[test]
    fn test_apply_switches_mode() {
        let parallel = ExecutionContext::parallel().apply(LazySequence::from_collection(vec![1]));
        assert!(parallel.is_parallel());
        let sequential = ExecutionContext::sequential().apply(parallel);
        assert!(!sequential.is_parallel());
    }
}
