// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Structural validation of query ASTs
//!
//! The node enums already rule out most malformed trees. This pass checks
//! what the types cannot: names must be XML NCNames, an artifact type needs
//! a model, and decimals must be finite.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::*;
use super::visitor::*;
use crate::error::CompileError;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{N}\p{Mn}\p{Mc}_.\-]*$").expect("valid NCName pattern")
});

/// True when `name` is a valid XML non-colonized name
pub fn is_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Collects structural problems found in a tree
#[derive(Debug, Default)]
pub struct QueryValidator {
    problems: Vec<String>,
}

impl QueryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `query`, reporting the first problem found
    pub fn validate(query: &Query) -> Result<(), CompileError> {
        let mut validator = Self::new();
        query.accept(&mut validator);
        match validator.problems.into_iter().next() {
            Some(problem) => Err(CompileError::Structural(problem)),
            None => Ok(()),
        }
    }

    /// Every problem found so far, in traversal order
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    fn check_name(&mut self, what: &str, name: &str) {
        if name.is_empty() {
            self.problems.push(format!("empty {}", what));
        } else if !is_ncname(name) {
            self.problems.push(format!("invalid {} '{}'", what, name));
        }
    }
}

impl Visitor for QueryValidator {
    fn visit_query(&mut self, node: &Query) {
        walk_query(self, node);
    }

    fn visit_artifact_set(&mut self, node: &ArtifactSet) {
        walk_artifact_set(self, node);
    }

    fn visit_location_path(&mut self, node: &LocationPath) {
        match (&node.artifact_model, &node.artifact_type) {
            (None, Some(artifact_type)) => self.problems.push(format!(
                "artifact type '{}' given without an artifact model",
                artifact_type
            )),
            (Some(model), artifact_type) => {
                self.check_name("artifact model", model);
                if let Some(artifact_type) = artifact_type {
                    self.check_name("artifact type", artifact_type);
                }
            }
            (None, None) => {}
        }
    }

    fn visit_predicate(&mut self, node: &Predicate) {
        walk_predicate(self, node);
    }

    fn visit_expr(&mut self, node: &Expr) {
        walk_expr(self, node);
    }

    fn visit_and_expr(&mut self, node: &AndExpr) {
        walk_and_expr(self, node);
    }

    fn visit_or_expr(&mut self, node: &OrExpr) {
        walk_or_expr(self, node);
    }

    fn visit_equality_expr(&mut self, node: &EqualityExpr) {
        walk_equality_expr(self, node);
    }

    fn visit_subartifact_set(&mut self, node: &SubartifactSet) {
        walk_subartifact_set(self, node);
    }

    fn visit_relationship_path(&mut self, node: &RelationshipPath) {
        if !node.is_context_item() {
            self.check_name("relationship type", &node.relationship_type);
        }
    }

    fn visit_function_call(&mut self, node: &FunctionCall) {
        self.check_name("function name", &node.function_name.local_part);
        walk_function_call(self, node);
    }

    fn visit_argument(&mut self, node: &Argument) {
        walk_argument(self, node);
    }

    fn visit_primary_expr(&mut self, node: &PrimaryExpr) {
        match node {
            PrimaryExpr::Number(Number::Decimal(value)) if !value.is_finite() => {
                self.problems.push(format!("non-finite number {}", value));
            }
            PrimaryExpr::PropertyRef(qname) => self.check_name("property name", &qname.local_part),
            _ => {}
        }
    }

    fn visit_forward_property_step(&mut self, node: &ForwardPropertyStep) {
        self.check_name("property name", &node.property_qname.local_part);
    }
}
