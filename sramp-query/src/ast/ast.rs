// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! AST node definitions for S-RAMP XPath queries
//!
//! The grammar is a small subset of XPath 2.0:
//!
//! ```text
//! /s-ramp[/model[/type]][predicate][/relationship[predicate]]
//! ```
//!
//! Nodes are produced by an external parser and are never mutated once
//! built. Every "exactly one of" shape in the grammar is an enum, so a tree
//! that type-checks already satisfies those invariants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship name used by the parser for the context item `.`
pub const CONTEXT_ITEM: &str = ".";

/// Qualified name (namespace URI + local part, with the prefix it was written with)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub local_part: String,
    pub prefix: Option<String>,
}

impl QName {
    /// Unqualified name
    pub fn local(local_part: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_part: local_part.into(),
            prefix: None,
        }
    }

    /// Name in `namespace`, written with `prefix`
    pub fn new(
        namespace: impl Into<String>,
        local_part: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_part: local_part.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Name in `namespace` without a recorded prefix
    pub fn in_namespace(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_part: local_part.into(),
            prefix: None,
        }
    }

    /// Namespace URI, treating an empty string as absent
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Prefix, treating blank prefixes as absent
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Same namespace and local part; the prefix is presentation only
    pub fn same_name(&self, namespace: &str, local_part: &str) -> bool {
        self.namespace_uri() == Some(namespace) && self.local_part == local_part
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix() {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => write!(f, "{}", self.local_part),
        }
    }
}

/// Root of a query: `/s-ramp/...[predicate]/subartifactSet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub artifact_set: ArtifactSet,
    pub predicate: Option<Predicate>,
    pub subartifact_set: Option<SubartifactSet>,
}

impl Query {
    pub fn new(artifact_set: ArtifactSet) -> Self {
        Self {
            artifact_set,
            predicate: None,
            subartifact_set: None,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_subartifact_set(mut self, subartifact_set: SubartifactSet) -> Self {
        self.subartifact_set = Some(subartifact_set);
        self
    }

    /// `/s-ramp/{model}/{type}`
    pub fn of_type(model: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self::new(ArtifactSet::new(LocationPath::artifact_type(
            model,
            artifact_type,
        )))
    }

    /// `/s-ramp/{model}`
    pub fn of_model(model: impl Into<String>) -> Self {
        Self::new(ArtifactSet::new(LocationPath::model(model)))
    }

    /// `/s-ramp`
    pub fn all() -> Self {
        Self::new(ArtifactSet::new(LocationPath::root()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub location_path: LocationPath,
}

impl ArtifactSet {
    pub fn new(location_path: LocationPath) -> Self {
        Self { location_path }
    }
}

/// `[/model[/type]]` below the repository root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPath {
    pub artifact_model: Option<String>,
    pub artifact_type: Option<String>,
}

impl LocationPath {
    pub fn root() -> Self {
        Self {
            artifact_model: None,
            artifact_type: None,
        }
    }

    pub fn model(model: impl Into<String>) -> Self {
        Self {
            artifact_model: Some(model.into()),
            artifact_type: None,
        }
    }

    pub fn artifact_type(model: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self {
            artifact_model: Some(model.into()),
            artifact_type: Some(artifact_type.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub expr: Expr,
}

impl Predicate {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self { expr: expr.into() }
    }
}

/// Top of a boolean expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub and_expr: AndExpr,
}

impl Expr {
    pub fn new(and_expr: AndExpr) -> Self {
        Self { and_expr }
    }

    /// `left and right`
    pub fn and(left: impl Into<OrExpr>, right: impl Into<AndExpr>) -> Self {
        Self::new(AndExpr::new(left.into(), Some(right.into())))
    }

    /// `left or right`
    pub fn or(left: impl Into<EqualityExpr>, right: impl Into<OrExpr>) -> Self {
        Self::from(OrExpr::new(left.into(), Some(right.into())))
    }

    /// The single equality expression this expression reduces to, if it has no connectives
    pub fn as_single_equality(&self) -> Option<&EqualityExpr> {
        let and_expr = &self.and_expr;
        if and_expr.right.is_some() || and_expr.left.right.is_some() {
            return None;
        }
        Some(&and_expr.left.left)
    }
}

/// `left [and right]`; without a right operand this is a pass-through of `left`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndExpr {
    pub left: OrExpr,
    pub right: Option<Box<AndExpr>>,
}

impl AndExpr {
    pub fn new(left: OrExpr, right: Option<AndExpr>) -> Self {
        Self {
            left,
            right: right.map(Box::new),
        }
    }
}

/// `left [or right]`; without a right operand this is a pass-through of `left`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrExpr {
    pub left: EqualityExpr,
    pub right: Option<Box<OrExpr>>,
}

impl OrExpr {
    pub fn new(left: EqualityExpr, right: Option<OrExpr>) -> Self {
        Self {
            left,
            right: right.map(Box::new),
        }
    }
}

/// Comparison operators of an [`EqualityExpr`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::Like => "like",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "=" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            "<" => ComparisonOperator::LessThan,
            "<=" => ComparisonOperator::LessThanOrEqual,
            ">" => ComparisonOperator::GreaterThan,
            ">=" => ComparisonOperator::GreaterThanOrEqual,
            s if s.eq_ignore_ascii_case("like") => ComparisonOperator::Like,
            _ => return None,
        };
        Some(operator)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Left-hand side of a comparison or existence test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// `@name`
    Property(ForwardPropertyStep),
    /// Attribute functions such as `s-ramp:getRelationshipAttribute(., 'key')`
    Function(FunctionCall),
}

impl From<ForwardPropertyStep> for Operand {
    fn from(step: ForwardPropertyStep) -> Self {
        Operand::Property(step)
    }
}

impl From<FunctionCall> for Operand {
    fn from(call: FunctionCall) -> Self {
        Operand::Function(call)
    }
}

/// Leaf of the boolean tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EqualityExpr {
    /// Relationship sub-predicate or function call
    SubartifactSet(Box<SubartifactSet>),
    /// `( expr )`
    Grouped(Box<Expr>),
    /// `left op right`
    Comparison {
        left: Operand,
        operator: ComparisonOperator,
        right: PrimaryExpr,
    },
    /// `left` alone: the property must exist
    Exists(Operand),
}

impl EqualityExpr {
    pub fn comparison(
        left: impl Into<Operand>,
        operator: ComparisonOperator,
        right: impl Into<PrimaryExpr>,
    ) -> Self {
        EqualityExpr::Comparison {
            left: left.into(),
            operator,
            right: right.into(),
        }
    }

    /// `@property = 'value'`
    pub fn property_equals(property: &str, value: impl Into<PrimaryExpr>) -> Self {
        Self::comparison(
            ForwardPropertyStep::local(property),
            ComparisonOperator::Equal,
            value,
        )
    }

    pub fn exists(operand: impl Into<Operand>) -> Self {
        EqualityExpr::Exists(operand.into())
    }

    pub fn grouped(expr: impl Into<Expr>) -> Self {
        EqualityExpr::Grouped(Box::new(expr.into()))
    }

    pub fn subartifact_set(set: SubartifactSet) -> Self {
        EqualityExpr::SubartifactSet(Box::new(set))
    }

    pub fn function(call: FunctionCall) -> Self {
        Self::subartifact_set(SubartifactSet::Function(call))
    }
}

/// Relationship traversal or function call following a `/` or inside a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubartifactSet {
    Function(FunctionCall),
    Relationship {
        path: RelationshipPath,
        predicate: Option<Predicate>,
        subartifact_set: Option<Box<SubartifactSet>>,
    },
}

impl SubartifactSet {
    /// Bare relationship step, e.g. `wsdlService`
    pub fn relationship(relationship_type: impl Into<String>) -> Self {
        SubartifactSet::Relationship {
            path: RelationshipPath::new(relationship_type),
            predicate: None,
            subartifact_set: None,
        }
    }

    /// Relationship step with a predicate, e.g. `wsdlService[@name = 'Foo']`
    pub fn relationship_where(relationship_type: impl Into<String>, predicate: Predicate) -> Self {
        SubartifactSet::Relationship {
            path: RelationshipPath::new(relationship_type),
            predicate: Some(predicate),
            subartifact_set: None,
        }
    }

    /// Append a nested step (`this/next`)
    pub fn then(self, next: SubartifactSet) -> Self {
        match self {
            SubartifactSet::Relationship {
                path, predicate, ..
            } => SubartifactSet::Relationship {
                path,
                predicate,
                subartifact_set: Some(Box::new(next)),
            },
            function => function,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipPath {
    pub relationship_type: String,
}

impl RelationshipPath {
    pub fn new(relationship_type: impl Into<String>) -> Self {
        Self {
            relationship_type: relationship_type.into(),
        }
    }

    pub fn is_context_item(&self) -> bool {
        self.relationship_type == CONTEXT_ITEM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function_name: QName,
    pub arguments: Vec<Argument>,
}

impl FunctionCall {
    pub fn new(function_name: QName, arguments: Vec<Argument>) -> Self {
        Self {
            function_name,
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Primary(PrimaryExpr),
    Expr(Expr),
}

impl Argument {
    pub fn literal(value: impl Into<String>) -> Self {
        Argument::Primary(PrimaryExpr::Literal(value.into()))
    }

    /// `@name` as an argument
    pub fn property(local_part: &str) -> Self {
        Argument::Expr(Expr::from(EqualityExpr::exists(ForwardPropertyStep::local(
            local_part,
        ))))
    }

    /// The context item `.`, as the parser represents it
    pub fn context_item() -> Self {
        Argument::Expr(Expr::from(EqualityExpr::subartifact_set(
            SubartifactSet::relationship(CONTEXT_ITEM),
        )))
    }

    /// True when this argument is the context item `.`
    pub fn is_context_item(&self) -> bool {
        let Argument::Expr(expr) = self else {
            return false;
        };
        match expr.as_single_equality() {
            Some(EqualityExpr::SubartifactSet(set)) => matches!(
                set.as_ref(),
                SubartifactSet::Relationship {
                    path,
                    predicate: None,
                    subartifact_set: None,
                } if path.is_context_item()
            ),
            _ => false,
        }
    }

    /// String literal value of a primary argument
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Argument::Primary(PrimaryExpr::Literal(value)) => Some(value),
            _ => None,
        }
    }

    /// Property step this argument reduces to, if it is a lone `@name`
    pub fn as_property_step(&self) -> Option<&ForwardPropertyStep> {
        let Argument::Expr(expr) = self else {
            return None;
        };
        match expr.as_single_equality() {
            Some(EqualityExpr::Exists(Operand::Property(step))) => Some(step),
            _ => None,
        }
    }
}

impl From<PrimaryExpr> for Argument {
    fn from(primary: PrimaryExpr) -> Self {
        Argument::Primary(primary)
    }
}

impl From<Expr> for Argument {
    fn from(expr: Expr) -> Self {
        Argument::Expr(expr)
    }
}

/// Numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            // Debug keeps the decimal point on whole values ("2.0")
            Number::Decimal(d) => write!(f, "{:?}", d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimaryExpr {
    Literal(String),
    Number(Number),
    /// `$prefix:name`
    PropertyRef(QName),
}

impl From<&str> for PrimaryExpr {
    fn from(value: &str) -> Self {
        PrimaryExpr::Literal(value.to_string())
    }
}

impl From<String> for PrimaryExpr {
    fn from(value: String) -> Self {
        PrimaryExpr::Literal(value)
    }
}

impl From<i64> for PrimaryExpr {
    fn from(value: i64) -> Self {
        PrimaryExpr::Number(Number::Integer(value))
    }
}

impl From<f64> for PrimaryExpr {
    fn from(value: f64) -> Self {
        PrimaryExpr::Number(Number::Decimal(value))
    }
}

/// `@name` / `@prefix:name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForwardPropertyStep {
    pub property_qname: QName,
}

impl ForwardPropertyStep {
    pub fn new(property_qname: QName) -> Self {
        Self { property_qname }
    }

    pub fn local(local_part: &str) -> Self {
        Self::new(QName::local(local_part))
    }
}

// Conversions used to assemble boolean trees without spelling out every wrapper level

impl From<EqualityExpr> for OrExpr {
    fn from(left: EqualityExpr) -> Self {
        OrExpr::new(left, None)
    }
}

impl From<OrExpr> for AndExpr {
    fn from(left: OrExpr) -> Self {
        AndExpr::new(left, None)
    }
}

impl From<EqualityExpr> for AndExpr {
    fn from(left: EqualityExpr) -> Self {
        AndExpr::from(OrExpr::from(left))
    }
}

impl From<AndExpr> for Expr {
    fn from(and_expr: AndExpr) -> Self {
        Expr::new(and_expr)
    }
}

impl From<OrExpr> for Expr {
    fn from(or_expr: OrExpr) -> Self {
        Expr::new(AndExpr::from(or_expr))
    }
}

impl From<EqualityExpr> for Expr {
    fn from(equality: EqualityExpr) -> Self {
        Expr::new(AndExpr::from(equality))
    }
}

impl From<FunctionCall> for Expr {
    fn from(call: FunctionCall) -> Self {
        Expr::from(EqualityExpr::function(call))
    }
}

impl From<Expr> for Predicate {
    fn from(expr: Expr) -> Self {
        Predicate { expr }
    }
}

impl From<EqualityExpr> for Predicate {
    fn from(equality: EqualityExpr) -> Self {
        Predicate::new(equality)
    }
}
