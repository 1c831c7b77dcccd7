// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! The core crate for cachestream. Defines the data types shared by every
//! pipeline stage: the [`PairedElement`] primitive, the [`ExecutionMode`] a
//! sequence runs in, and the [`SequenceError`] failures a pipeline can raise.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod execution_mode;
mod paired_element;

pub use error::{SequenceError, SequenceResult};
pub use execution_mode::ExecutionMode;
pub use paired_element::PairedElement;
