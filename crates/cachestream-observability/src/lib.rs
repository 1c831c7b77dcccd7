// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! # cachestream-observability
//!
//! Logging setup shared by binaries, benches and tests that use cachestream.
//!
//! Every cachestream crate logs through `tracing`; this crate installs the
//! subscriber. Per-crate debug output is switched on with `--debug-{crate}`
//! arguments or the `CACHESTREAM_DEBUG` environment variable.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Crate names accepted by the debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "cachestream",
    "cachestream-structures",
    "cachestream-config",
    "cachestream-pipeline",
    "cachestream-observability",
];
