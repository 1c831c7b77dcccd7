// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Lazy pipelines that carry a cached value alongside every working value.
//!
//! - [`UnpairedSequence`]: plain values, the entry point
//! - [`PairedSequence`]: `(cached, working)` pairs; stages see the working value
//! - [`PairedOptional`]: zero or one pair
//! - [`LazySequence`]: the sequential/parallel engine underneath
//! - [`ExecutionContext`]: configured mode and worker pool for new pipelines
//!
//! Pipelines are single-use and lazy: intermediate operations only describe
//! work, terminal operations run it and return a [`SequenceResult`].

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod execution_context;
mod lazy_sequence;
mod paired_optional;
mod paired_sequence;
mod unpaired_sequence;

pub use cachestream_structures::{ExecutionMode, PairedElement, SequenceError, SequenceResult};
pub use execution_context::ExecutionContext;
pub use lazy_sequence::{LazySequence, SequenceIter};
pub use paired_optional::PairedOptional;
pub use paired_sequence::PairedSequence;
pub use unpaired_sequence::UnpairedSequence;

/// Prelude with the types most pipelines need
pub mod prelude {
    pub use crate::{
        ExecutionContext, ExecutionMode, LazySequence, PairedElement, PairedOptional,
        PairedSequence, SequenceError, SequenceResult, UnpairedSequence,
    };
}
