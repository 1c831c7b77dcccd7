// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! # cachestream
//!
//! Lazy sequence pipelines where every element carries a cached value next
//! to the working value that filters, mappers and sorts operate on. Work on
//! a derived value (a length, a parsed field, a child record) and swap the
//! original back in at the end.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! cachestream = "0.1"
//! ```
//!
//! ```rust
//! use cachestream::prelude::*;
//!
//! let five_letter_words = UnpairedSequence::of(["paper", "bells", "tree"])
//!     .begin_caching()
//!     .map(|word| word.len())
//!     .filter(|len| *len == 5)
//!     .swap_to_cache()
//!     .to_vec()?;
//! assert_eq!(five_letter_words, vec!["paper", "bells"]);
//! # Ok::<(), SequenceError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`observability`** (default): console logging setup and per-crate
//!   debug flags
//! - **`serde`**: `Serialize`/`Deserialize` for `PairedElement` and
//!   `ExecutionMode`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: cachestream-structures                     │
//! │  (PairedElement, ExecutionMode, SequenceError)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Configuration: cachestream-config                      │
//! │  (cachestream.toml, env and CLI overrides)              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Pipelines: cachestream-pipeline                        │
//! │  (Unpaired/Paired sequences, PairedOptional, rayon)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export foundation
pub use cachestream_structures as structures;

// Re-export configuration
pub use cachestream_config as config;

// Re-export pipelines
pub use cachestream_pipeline as pipeline;

// Re-export infrastructure
#[cfg(feature = "observability")]
pub use cachestream_observability as observability;

pub use cachestream_pipeline::{
    ExecutionContext, LazySequence, PairedOptional, PairedSequence, UnpairedSequence,
};
pub use cachestream_structures::{ExecutionMode, PairedElement, SequenceError, SequenceResult};

/// Prelude - commonly used types
pub mod prelude {
    pub use cachestream_pipeline::prelude::*;

    pub use cachestream_config::{load_config, CacheStreamConfig};

    #[cfg(feature = "observability")]
    pub use cachestream_observability::{init_logging, CrateDebugFlags};
}
