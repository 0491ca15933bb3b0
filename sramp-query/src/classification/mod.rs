// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Classification resolution
//!
//! Queries name classifications by label (`'Europe'`) or by a URI. The
//! repository stores canonical classification identifiers, so the compiler
//! asks a [`ClassificationResolver`] to translate every name before it emits
//! a constraint. Resolution is synchronous and all-or-nothing.

use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Classification lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unknown classification: {0}")]
    UnknownClassification(String),

    #[error("Classification resolver unavailable: {0}")]
    Unavailable(String),
}

/// Translates classification names into canonical identifiers
pub trait ClassificationResolver: Send + Sync {
    /// Resolve every name in `names`, failing if any one is unknown
    fn resolve_all(&self, names: &BTreeSet<String>) -> Result<BTreeSet<String>, ResolutionError>;
}

/// Resolver backed by an in-memory label → identifier table
///
/// A name that is already a canonical identifier resolves to itself.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClassificationResolver {
    by_label: HashMap<String, String>,
}

impl InMemoryClassificationResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `label` as a name for the canonical `identifier`
    pub fn with_classifier(mut self, label: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.insert(label, identifier);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, identifier: impl Into<String>) {
        self.by_label.insert(label.into(), identifier.into());
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(identifier) = self.by_label.get(name) {
            return Some(identifier);
        }
        self.by_label
            .values()
            .find(|identifier| identifier.as_str() == name)
            .map(String::as_str)
    }
}

impl ClassificationResolver for InMemoryClassificationResolver {
    fn resolve_all(&self, names: &BTreeSet<String>) -> Result<BTreeSet<String>, ResolutionError> {
        names
            .iter()
            .map(|name| {
                self.resolve(name)
                    .map(str::to_string)
                    .ok_or_else(|| ResolutionError::UnknownClassification(name.clone()))
            })
            .collect()
    }
}
