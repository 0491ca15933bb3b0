// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Canonical text rendering of query ASTs
//!
//! The serializer is a [`Visitor`] that appends tokens to an internal buffer.
//! Output follows the grammar
//! `/s-ramp[/model[/type]][predicate][/relationship[predicate]]`, so feeding
//! the text back through the parser yields the same tree.

use super::ast::*;
use super::visitor::{Visitable, Visitor};
use crate::schema::namespaces::NamespaceContext;
use crate::schema::properties::ROOT_PATH;

/// Serializes query ASTs back to query text
#[derive(Debug, Clone, Default)]
pub struct XPathSerializer {
    buffer: String,
    namespaces: NamespaceContext,
}

impl XPathSerializer {
    /// Create a serializer with the default namespace bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer that writes prefixes from `namespaces`
    pub fn with_namespaces(namespaces: NamespaceContext) -> Self {
        Self {
            buffer: String::new(),
            namespaces,
        }
    }

    /// Clear the buffer so the serializer can be reused
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Text produced so far
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn into_text(self) -> String {
        self.buffer
    }

    /// Serialize a whole query into a fresh string
    pub fn serialize(&mut self, query: &Query) -> String {
        self.reset();
        query.accept(self);
        self.buffer.clone()
    }

    fn push_predicate(&mut self, predicate: &Predicate) {
        self.buffer.push('[');
        predicate.accept(self);
        self.buffer.push(']');
    }

    fn push_qname(&mut self, qname: &QName) {
        let prefix = match qname.prefix() {
            Some(prefix) if self.namespaces.is_default_prefix(prefix) => None,
            Some(prefix) if self.namespaces.namespace_uri(prefix).is_some() => {
                Some(prefix.to_string())
            }
            // Missing or unbound prefix: use the registered alias of a non-default namespace
            _ => qname
                .namespace_uri()
                .filter(|ns| !self.namespaces.is_default_namespace(ns))
                .and_then(|ns| self.namespaces.prefix_for(ns))
                .map(str::to_string),
        };
        if let Some(prefix) = prefix {
            self.buffer.push_str(&prefix);
            self.buffer.push(':');
        }
        self.buffer.push_str(&qname.local_part);
    }
}

impl Visitor for XPathSerializer {
    fn visit_query(&mut self, node: &Query) {
        node.artifact_set.accept(self);
        if let Some(predicate) = &node.predicate {
            self.push_predicate(predicate);
        }
        if let Some(subartifact_set) = &node.subartifact_set {
            self.buffer.push('/');
            subartifact_set.accept(self);
        }
    }

    fn visit_artifact_set(&mut self, node: &ArtifactSet) {
        node.location_path.accept(self);
    }

    fn visit_location_path(&mut self, node: &LocationPath) {
        self.buffer.push_str(ROOT_PATH);
        if let Some(model) = &node.artifact_model {
            self.buffer.push('/');
            self.buffer.push_str(model);
            if let Some(artifact_type) = &node.artifact_type {
                self.buffer.push('/');
                self.buffer.push_str(artifact_type);
            }
        }
    }

    fn visit_predicate(&mut self, node: &Predicate) {
        node.expr.accept(self);
    }

    fn visit_expr(&mut self, node: &Expr) {
        node.and_expr.accept(self);
    }

    fn visit_and_expr(&mut self, node: &AndExpr) {
        node.left.accept(self);
        if let Some(right) = &node.right {
            self.buffer.push_str(" and ");
            right.accept(self);
        }
    }

    fn visit_or_expr(&mut self, node: &OrExpr) {
        node.left.accept(self);
        if let Some(right) = &node.right {
            self.buffer.push_str(" or ");
            right.accept(self);
        }
    }

    fn visit_equality_expr(&mut self, node: &EqualityExpr) {
        match node {
            EqualityExpr::SubartifactSet(set) => set.accept(self),
            EqualityExpr::Grouped(expr) => {
                self.buffer.push('(');
                expr.accept(self);
                self.buffer.push(')');
            }
            EqualityExpr::Comparison {
                left,
                operator,
                right,
            } => {
                left.accept(self);
                self.buffer.push(' ');
                self.buffer.push_str(operator.symbol());
                self.buffer.push(' ');
                right.accept(self);
            }
            EqualityExpr::Exists(operand) => operand.accept(self),
        }
    }

    fn visit_subartifact_set(&mut self, node: &SubartifactSet) {
        match node {
            SubartifactSet::Function(call) => call.accept(self),
            SubartifactSet::Relationship {
                path,
                predicate,
                subartifact_set,
            } => {
                path.accept(self);
                if let Some(predicate) = predicate {
                    self.push_predicate(predicate);
                }
                if let Some(nested) = subartifact_set {
                    self.buffer.push('/');
                    nested.accept(self);
                }
            }
        }
    }

    fn visit_relationship_path(&mut self, node: &RelationshipPath) {
        self.buffer.push_str(&node.relationship_type);
    }

    fn visit_function_call(&mut self, node: &FunctionCall) {
        self.push_qname(&node.function_name);
        self.buffer.push('(');
        for (i, argument) in node.arguments.iter().enumerate() {
            if i > 0 {
                self.buffer.push_str(", ");
            }
            argument.accept(self);
        }
        self.buffer.push(')');
    }

    fn visit_argument(&mut self, node: &Argument) {
        match node {
            Argument::Primary(primary) => primary.accept(self),
            Argument::Expr(expr) => expr.accept(self),
        }
    }

    fn visit_primary_expr(&mut self, node: &PrimaryExpr) {
        match node {
            PrimaryExpr::Literal(value) => {
                self.buffer.push('\'');
                self.buffer.push_str(&value.replace('\'', "''"));
                self.buffer.push('\'');
            }
            PrimaryExpr::Number(number) => self.buffer.push_str(&number.to_string()),
            PrimaryExpr::PropertyRef(qname) => {
                self.buffer.push('$');
                self.push_qname(qname);
            }
        }
    }

    fn visit_forward_property_step(&mut self, node: &ForwardPropertyStep) {
        self.buffer.push('@');
        self.push_qname(&node.property_qname);
    }
}
