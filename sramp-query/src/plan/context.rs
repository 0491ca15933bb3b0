// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-compilation state
//!
//! One [`CompileState`] is created for every query and dropped when the
//! compilation ends. It owns the alias counters, the source under
//! construction and the deferred errors; nothing outlives the call.

use std::collections::BTreeMap;

use crate::error::CompileError;
use crate::plan::structural::{Constraint, JoinCondition, JoinType, Selector, Source};

/// Hands out unique selector aliases, one counter per role
#[derive(Debug, Clone, Default)]
pub struct AliasGenerator {
    artifact: usize,
    relationship: usize,
    target: usize,
    content: usize,
}

impl AliasGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_artifact(&mut self) -> String {
        self.artifact += 1;
        format!("artifact{}", self.artifact)
    }

    pub fn next_relationship(&mut self) -> String {
        self.relationship += 1;
        format!("relationship{}", self.relationship)
    }

    pub fn next_target(&mut self) -> String {
        self.target += 1;
        format!("target{}", self.target)
    }

    pub fn next_content(&mut self) -> String {
        self.content += 1;
        format!("content{}", self.content)
    }
}

/// Selectors a predicate compiles against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Artifact selector that unqualified properties resolve to
    pub selector: String,
    /// Relationship entry selector, inside a relationship predicate
    pub relationship: Option<String>,
    /// Relationship target selector, inside a relationship predicate
    pub target: Option<String>,
}

impl Scope {
    pub fn artifact(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            relationship: None,
            target: None,
        }
    }

    pub fn relationship(
        selector: impl Into<String>,
        relationship: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            relationship: Some(relationship.into()),
            target: Some(target.into()),
        }
    }
}

/// A join source under construction
#[derive(Debug, Clone)]
pub struct SourceFrame {
    source: Source,
    /// Artifact selector → its joined content selector
    content_selectors: BTreeMap<String, String>,
}

impl SourceFrame {
    pub fn new(root: Selector) -> Self {
        Self {
            source: Source::Selector(root),
            content_selectors: BTreeMap::new(),
        }
    }

    /// Join `selector` as a child node of `parent`
    pub fn join_child(&mut self, selector: Selector, parent: &str, join_type: JoinType) {
        let condition = JoinCondition::child_node(selector.alias.clone(), parent);
        self.join(join_type, selector, condition);
    }

    /// Join `selector` where `left.[left_property] = selector.[right_property]`
    pub fn join_eq(&mut self, selector: Selector, left: &str, left_property: &str, right_property: &str) {
        let condition =
            JoinCondition::equi(left, left_property, selector.alias.clone(), right_property);
        self.join(JoinType::Inner, selector, condition);
    }

    /// Join `parent` such that `child` is one of its child nodes
    pub fn join_parent(&mut self, parent: Selector, child: &str) {
        let condition = JoinCondition::child_node(child, parent.alias.clone());
        self.join(JoinType::Inner, parent, condition);
    }

    fn join(&mut self, join_type: JoinType, right: Selector, condition: JoinCondition) {
        // Placeholder swapped straight back; Source has no cheap default
        let left = std::mem::replace(&mut self.source, Source::selector("", ""));
        self.source = left.join(join_type, right, condition);
    }

    /// Content selector already joined under `artifact`, if any
    pub fn content_selector(&self, artifact: &str) -> Option<&str> {
        self.content_selectors.get(artifact).map(String::as_str)
    }

    pub fn set_content_selector(&mut self, artifact: impl Into<String>, alias: String) {
        self.content_selectors.insert(artifact.into(), alias);
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn into_source(self) -> Source {
        self.source
    }
}

/// Mutable state of one compilation
#[derive(Debug)]
pub struct CompileState {
    pub aliases: AliasGenerator,
    pub frame: SourceFrame,
    deferred: Vec<CompileError>,
}

impl CompileState {
    pub fn new(aliases: AliasGenerator, frame: SourceFrame) -> Self {
        Self {
            aliases,
            frame,
            deferred: Vec::new(),
        }
    }

    /// Record a non-fatal error; compilation carries on
    pub fn defer(&mut self, error: CompileError) {
        log::debug!("Deferred compile error: {}", error);
        self.deferred.push(error);
    }

    /// Swap in a fresh source frame, returning the one that was active
    pub fn enter_frame(&mut self, frame: SourceFrame) -> SourceFrame {
        std::mem::replace(&mut self.frame, frame)
    }

    /// Restore `saved`, returning the frame that was active
    pub fn leave_frame(&mut self, saved: SourceFrame) -> SourceFrame {
        std::mem::replace(&mut self.frame, saved)
    }

    pub fn deferred(&self) -> &[CompileError] {
        &self.deferred
    }

    pub fn into_parts(self) -> (Source, Vec<CompileError>) {
        (self.frame.into_source(), self.deferred)
    }
}

/// Fold constraints right-recursively: `[a, b, c]` becomes `combine(a, combine(b, c))`
pub fn fold_constraints(
    constraints: Vec<Constraint>,
    combine: fn(Constraint, Constraint) -> Constraint,
) -> Option<Constraint> {
    let mut items = constraints.into_iter().rev();
    let last = items.next()?;
    Some(items.fold(last, |acc, item| combine(item, acc)))
}

pub fn and_all(constraints: Vec<Constraint>) -> Option<Constraint> {
    fold_constraints(constraints, Constraint::and)
}

pub fn or_all(constraints: Vec<Constraint>) -> Option<Constraint> {
    fold_constraints(constraints, Constraint::or)
}
