// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the lazy computation behind a sequence is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExecutionMode {
    /// Pull-based, element at a time, short-circuiting
    #[default]
    Sequential,
    /// Data-parallel on a worker pool, stage at a time
    Parallel,
}

impl ExecutionMode {
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionMode::Parallel)
    }

    /// Parse a mode name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sequential" => Some(ExecutionMode::Sequential),
            "parallel" => Some(ExecutionMode::Parallel),
            _ => None,
        }
    }
}

impl Display for ExecutionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel => write!(f, "parallel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ExecutionMode::parse("Parallel"), Some(ExecutionMode::Parallel));
        assert_eq!(ExecutionMode::parse(" sequential "), Some(ExecutionMode::Sequential));
        assert_eq!(ExecutionMode::parse("threaded"), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            assert_eq!(ExecutionMode::parse(&mode.to_string()), Some(mode));
        }
    }
}
