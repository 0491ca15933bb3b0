// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Double-dispatch traversal over the query AST
//!
//! `node.accept(visitor)` calls the visitor method for that node type. Every
//! method of [`Visitor`] is required, so a visitor handles the whole node set
//! or fails to compile. Composite nodes are not descended automatically: a
//! visitor decides which children to visit, either by calling `accept` on them
//! or by delegating to the matching `walk_*` function.

use super::ast::*;

pub trait Visitor {
    fn visit_query(&mut self, node: &Query);
    fn visit_artifact_set(&mut self, node: &ArtifactSet);
    fn visit_location_path(&mut self, node: &LocationPath);
    fn visit_predicate(&mut self, node: &Predicate);
    fn visit_expr(&mut self, node: &Expr);
    fn visit_and_expr(&mut self, node: &AndExpr);
    fn visit_or_expr(&mut self, node: &OrExpr);
    fn visit_equality_expr(&mut self, node: &EqualityExpr);
    fn visit_subartifact_set(&mut self, node: &SubartifactSet);
    fn visit_relationship_path(&mut self, node: &RelationshipPath);
    fn visit_function_call(&mut self, node: &FunctionCall);
    fn visit_argument(&mut self, node: &Argument);
    fn visit_primary_expr(&mut self, node: &PrimaryExpr);
    fn visit_forward_property_step(&mut self, node: &ForwardPropertyStep);
}

/// A node that can be handed to a [`Visitor`]
pub trait Visitable {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
}

macro_rules! visitable {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl Visitable for $node {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                    visitor.$method(self)
                }
            }
        )*
    };
}

visitable! {
    Query => visit_query,
    ArtifactSet => visit_artifact_set,
    LocationPath => visit_location_path,
    Predicate => visit_predicate,
    Expr => visit_expr,
    AndExpr => visit_and_expr,
    OrExpr => visit_or_expr,
    EqualityExpr => visit_equality_expr,
    SubartifactSet => visit_subartifact_set,
    RelationshipPath => visit_relationship_path,
    FunctionCall => visit_function_call,
    Argument => visit_argument,
    PrimaryExpr => visit_primary_expr,
    ForwardPropertyStep => visit_forward_property_step,
}

impl Visitable for Operand {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Operand::Property(step) => step.accept(visitor),
            Operand::Function(call) => call.accept(visitor),
        }
    }
}

// Default descent, in source order

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, node: &Query) {
    node.artifact_set.accept(visitor);
    if let Some(predicate) = &node.predicate {
        predicate.accept(visitor);
    }
    if let Some(subartifact_set) = &node.subartifact_set {
        subartifact_set.accept(visitor);
    }
}

pub fn walk_artifact_set<V: Visitor + ?Sized>(visitor: &mut V, node: &ArtifactSet) {
    node.location_path.accept(visitor);
}

pub fn walk_predicate<V: Visitor + ?Sized>(visitor: &mut V, node: &Predicate) {
    node.expr.accept(visitor);
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &Expr) {
    node.and_expr.accept(visitor);
}

pub fn walk_and_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &AndExpr) {
    node.left.accept(visitor);
    if let Some(right) = &node.right {
        right.accept(visitor);
    }
}

pub fn walk_or_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &OrExpr) {
    node.left.accept(visitor);
    if let Some(right) = &node.right {
        right.accept(visitor);
    }
}

pub fn walk_equality_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &EqualityExpr) {
    match node {
        EqualityExpr::SubartifactSet(set) => set.accept(visitor),
        EqualityExpr::Grouped(expr) => expr.accept(visitor),
        EqualityExpr::Comparison { left, right, .. } => {
            left.accept(visitor);
            right.accept(visitor);
        }
        EqualityExpr::Exists(operand) => operand.accept(visitor),
    }
}

pub fn walk_subartifact_set<V: Visitor + ?Sized>(visitor: &mut V, node: &SubartifactSet) {
    match node {
        SubartifactSet::Function(call) => call.accept(visitor),
        SubartifactSet::Relationship {
            path,
            predicate,
            subartifact_set,
        } => {
            path.accept(visitor);
            if let Some(predicate) = predicate {
                predicate.accept(visitor);
            }
            if let Some(nested) = subartifact_set {
                nested.accept(visitor);
            }
        }
    }
}

pub fn walk_function_call<V: Visitor + ?Sized>(visitor: &mut V, node: &FunctionCall) {
    for argument in &node.arguments {
        argument.accept(visitor);
    }
}

pub fn walk_argument<V: Visitor + ?Sized>(visitor: &mut V, node: &Argument) {
    match node {
        Argument::Primary(primary) => primary.accept(visitor),
        Argument::Expr(expr) => expr.accept(visitor),
    }
}
